//! Admin dashboard: the doctor grid plus the add-doctor form.

use std::sync::Arc;

use api_client::{ActionResult, Doctor};
use clinic_types::NonEmptyText;

use super::doctor_list::DoctorListController;
use crate::adapters::ListView;
use crate::context::PageContext;
use crate::PortalResult;

/// Tracing target for admin operations.
pub const TRACING_TARGET: &str = "clinic_core::admin";

pub const ADMIN_UNAUTHORIZED: &str = "Unauthorized! Please log in as admin.";

/// Values collected by the add-doctor form.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DoctorForm {
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: String,
    pub specialty: String,
    pub available_times: Vec<String>,
}

impl DoctorForm {
    /// Trims every field and builds the record sent to the backend.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if name, email, password or specialty is blank.
    pub fn into_doctor(self) -> PortalResult<Doctor> {
        let name = NonEmptyText::new(&self.name)?;
        let email = NonEmptyText::new(&self.email)?;
        let password = NonEmptyText::new(&self.password)?;
        let specialty = NonEmptyText::new(&self.specialty)?;

        Ok(Doctor {
            id: None,
            name: name.into_inner(),
            specialty: specialty.into_inner(),
            email: email.into_inner(),
            password: Some(password.into_inner()),
            phone: self.phone.trim().to_string(),
            available_times: self
                .available_times
                .into_iter()
                .map(|t| t.trim().to_string())
                .filter(|t| !t.is_empty())
                .collect(),
        })
    }
}

pub struct AdminDashboard {
    list: DoctorListController,
}

impl AdminDashboard {
    pub fn new(ctx: PageContext, view: Arc<dyn ListView>) -> Self {
        Self {
            list: DoctorListController::new(ctx, view),
        }
    }

    pub fn doctors(&self) -> &DoctorListController {
        &self.list
    }

    pub async fn load(&self) {
        self.list.load().await
    }

    /// Submits the add-doctor form.
    ///
    /// Without a token nothing is sent. On success the grid is reloaded. Either way the outcome
    /// is alerted and returned.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the form is incomplete; nothing is sent in that case.
    pub async fn add_doctor(&self, form: DoctorForm) -> PortalResult<ActionResult> {
        let ctx = self.list.context();
        let Some(token) = ctx.session.token() else {
            return Ok(ActionResult::failure(ctx.alert(ADMIN_UNAUTHORIZED)));
        };

        let doctor = form.into_doctor()?;
        let result = ctx.api.doctors().create(&doctor, &token).await;
        ctx.alert(result.message.as_str());

        if result.success {
            tracing::info!(target: TRACING_TARGET, email = %doctor.email, "Doctor added");
            self.list.load().await;
        }
        Ok(result)
    }
}
