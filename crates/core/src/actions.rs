//! Activation of the controls bound by the view builders.
//!
//! Each activation runs to completion: an optional precondition check, an optional confirmation,
//! at most one backend call, then a view update. Failures are reported through the prompter and
//! leave the view untouched.

use std::sync::Arc;

use api_client::Doctor;

use crate::adapters::ListView;
use crate::context::PageContext;
use crate::view::CardAction;

/// Tracing target for card actions.
pub const TRACING_TARGET: &str = "clinic_core::actions";

pub const PATIENT_LOGIN_PAGE: &str = "/pages/patientLogin.html";
pub const PRESCRIPTION_PAGE: &str = "/pages/addPrescription.html";

pub const ADMIN_REQUIRED: &str = "You must be logged in as admin to perform this action.";
pub const LOGIN_TO_BOOK: &str = "Please log in or sign up to book an appointment.";
pub const SESSION_EXPIRED: &str = "Session expired. Please log in again.";
pub const PATIENT_LOOKUP_FAILED: &str = "Failed to retrieve patient information.";

/// What an activation did to the page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ActionOutcome {
    /// Nothing changed, whether by refusal, cancellation or failure.
    Unchanged,
    /// The node with this key was detached.
    Removed(String),
    Redirected(String),
    OverlayOpened,
}

/// Dispatches [`CardAction`]s for nodes rendered into `view`.
#[derive(Clone)]
pub struct CardActions {
    ctx: PageContext,
    view: Arc<dyn ListView>,
}

impl CardActions {
    pub fn new(ctx: PageContext, view: Arc<dyn ListView>) -> Self {
        Self { ctx, view }
    }

    pub async fn activate(&self, action: &CardAction) -> ActionOutcome {
        match action {
            CardAction::DeleteDoctor { id, name } => self.delete_doctor(*id, name).await,
            CardAction::PromptLogin => {
                self.ctx.alert(LOGIN_TO_BOOK);
                ActionOutcome::Unchanged
            }
            CardAction::BookAppointment(doctor) => self.book(doctor).await,
            CardAction::AddPrescription { appointment_id } => {
                let location = format!("{PRESCRIPTION_PAGE}?appointmentId={appointment_id}");
                self.ctx.prompter.redirect(&location);
                ActionOutcome::Redirected(location)
            }
        }
    }

    async fn delete_doctor(&self, id: i64, name: &str) -> ActionOutcome {
        let Some(token) = self.ctx.session.token() else {
            self.ctx.alert(ADMIN_REQUIRED);
            return ActionOutcome::Unchanged;
        };

        if !self
            .ctx
            .prompter
            .confirm(&format!("Are you sure you want to delete Dr. {name}?"))
        {
            tracing::debug!(target: TRACING_TARGET, doctor_id = id, "Delete cancelled");
            return ActionOutcome::Unchanged;
        }

        let result = self.ctx.api.doctors().remove(id, &token).await;
        if !result.success {
            self.ctx.alert(format!("Failed to delete doctor: {}", result.message));
            return ActionOutcome::Unchanged;
        }

        self.ctx.alert(format!("Doctor {name} deleted successfully."));
        let key = id.to_string();
        if !self.view.remove(&key) {
            tracing::warn!(target: TRACING_TARGET, doctor_id = id, "Deleted doctor had no card attached");
        }
        tracing::info!(target: TRACING_TARGET, doctor_id = id, "Doctor deleted");
        ActionOutcome::Removed(key)
    }

    async fn book(&self, doctor: &Doctor) -> ActionOutcome {
        let Some(token) = self.ctx.session.token() else {
            self.ctx.alert(SESSION_EXPIRED);
            self.ctx.prompter.redirect(PATIENT_LOGIN_PAGE);
            return ActionOutcome::Redirected(PATIENT_LOGIN_PAGE.to_string());
        };

        let Some(patient) = self.ctx.api.patients().get_by_token(&token).await else {
            self.ctx.alert(PATIENT_LOOKUP_FAILED);
            return ActionOutcome::Unchanged;
        };

        self.ctx.overlay.open(doctor, &patient).await;
        ActionOutcome::OverlayOpened
    }
}
