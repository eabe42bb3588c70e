//! Login, logout and patient signup.
//!
//! Logins hand back the raw response; this controller reads the token out of the body and stores
//! it together with the role the token was issued for.

use api_client::{
    ActionResult, AdminCredentials, ApiError, ApiResult, DoctorCredentials, Patient,
    PatientCredentials, Response, TokenBody,
};
use clinic_types::NonEmptyText;

use crate::context::PageContext;
use crate::role::Role;
use crate::PortalResult;

/// Tracing target for authentication flows.
pub const TRACING_TARGET: &str = "clinic_core::login";

pub const INVALID_CREDENTIALS: &str = "Invalid credentials!";

pub const ADMIN_HOME: &str = "/adminDashboard";
pub const DOCTOR_HOME: &str = "/doctorDashboard";
pub const PATIENT_HOME: &str = "/pages/loggedPatientDashboard.html";

/// Values collected by the signup form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SignupForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub address: String,
}

impl SignupForm {
    /// # Errors
    ///
    /// Returns `InvalidInput` if name, email, password or phone is blank.
    pub fn into_patient(self) -> PortalResult<Patient> {
        let address = self.address.trim();
        Ok(Patient {
            id: None,
            name: NonEmptyText::new(&self.name)?.into_inner(),
            email: NonEmptyText::new(&self.email)?.into_inner(),
            password: Some(NonEmptyText::new(&self.password)?.into_inner()),
            phone: NonEmptyText::new(&self.phone)?.into_inner(),
            address: (!address.is_empty()).then(|| address.to_string()),
        })
    }
}

pub struct LoginController {
    ctx: PageContext,
}

impl LoginController {
    pub fn new(ctx: PageContext) -> Self {
        Self { ctx }
    }

    /// Returns whether the login succeeded. Rejections are alerted, not returned as errors.
    ///
    /// # Errors
    ///
    /// Returns `Api` if the backend could not be reached and `Session*` if the token could not be
    /// stored.
    pub async fn admin_login(&self, username: &str, password: &str) -> PortalResult<bool> {
        let credentials = AdminCredentials {
            username: username.trim().to_string(),
            password: password.to_string(),
        };
        let response = self.ctx.api.auth().admin_login(&credentials).await;
        self.complete(response, Role::Admin, ADMIN_HOME).await
    }

    pub async fn doctor_login(&self, email: &str, password: &str) -> PortalResult<bool> {
        let credentials = DoctorCredentials {
            identifier: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = self.ctx.api.auth().doctor_login(&credentials).await;
        self.complete(response, Role::Doctor, DOCTOR_HOME).await
    }

    pub async fn patient_login(&self, email: &str, password: &str) -> PortalResult<bool> {
        let credentials = PatientCredentials {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let response = self.ctx.api.patients().login(&credentials).await;
        self.complete(response, Role::AuthenticatedPatient, PATIENT_HOME)
            .await
    }

    /// Forgets the stored token and role.
    pub fn logout(&self) -> PortalResult<()> {
        self.ctx.session.sign_out()?;
        tracing::info!(target: TRACING_TARGET, "Signed out");
        Ok(())
    }

    /// Registers a patient and alerts the outcome.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the form is incomplete; nothing is sent in that case.
    pub async fn signup(&self, form: SignupForm) -> PortalResult<ActionResult> {
        let patient = form.into_patient()?;
        let result = self.ctx.api.patients().signup(&patient).await;
        self.ctx.alert(result.message.as_str());
        if result.success {
            tracing::info!(target: TRACING_TARGET, email = %patient.email, "Patient signed up");
        }
        Ok(result)
    }

    async fn complete(
        &self,
        response: ApiResult<Response>,
        role: Role,
        home: &str,
    ) -> PortalResult<bool> {
        let response = response?;
        let status = response.status();
        let bytes = response.bytes().await.map_err(ApiError::from)?;
        let body: TokenBody = serde_json::from_slice(&bytes).unwrap_or_default();

        let token = body.token.as_deref().map(str::trim).filter(|t| !t.is_empty());
        match token {
            Some(token) if status.is_success() => {
                self.ctx.session.sign_in(token, role)?;
                tracing::info!(target: TRACING_TARGET, role = %role, "Signed in");
                self.ctx.prompter.redirect(home);
                Ok(true)
            }
            _ => {
                tracing::warn!(
                    target: TRACING_TARGET,
                    role = %role,
                    status = status.as_u16(),
                    "Login rejected"
                );
                let message = body
                    .error
                    .or(body.message)
                    .filter(|m| !m.trim().is_empty())
                    .unwrap_or_else(|| INVALID_CREDENTIALS.to_string());
                self.ctx.alert(message);
                Ok(false)
            }
        }
    }
}
