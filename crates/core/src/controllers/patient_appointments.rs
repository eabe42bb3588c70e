//! A logged-in patient's own appointment list.

use std::sync::Arc;

use api_client::{Appointment, ApiResult, Patient};

use super::sequence::{RequestSequencer, Ticket};
use crate::actions::{PATIENT_LOGIN_PAGE, SESSION_EXPIRED};
use crate::adapters::ListView;
use crate::builders::{build_appointment_row, placeholder_row};
use crate::context::PageContext;
use crate::role::Role;

/// Tracing target for the patient appointment list.
pub const TRACING_TARGET: &str = "clinic_core::patient_appointments";

pub const NO_PATIENT_APPOINTMENTS: &str = "No appointments found.";
pub const PATIENT_FILTER_FAILED: &str = "Something went wrong!";
const TABLE_COLUMNS: u32 = 4;

pub struct PatientAppointments {
    ctx: PageContext,
    view: Arc<dyn ListView>,
    sequencer: RequestSequencer,
}

impl PatientAppointments {
    pub fn new(ctx: PageContext, view: Arc<dyn ListView>) -> Self {
        Self {
            ctx,
            view,
            sequencer: RequestSequencer::new(),
        }
    }

    /// Resolves the patient behind the stored token and renders all of their appointments.
    ///
    /// Returns the patient, or `None` after sending the visitor back to the login page.
    pub async fn load(&self) -> Option<Patient> {
        let token = self.signed_in_token()?;

        let Some(patient) = self.ctx.api.patients().get_by_token(&token).await else {
            self.expire_session();
            return None;
        };
        let Some(id) = patient.id else {
            tracing::warn!(target: TRACING_TARGET, "Patient record has no id");
            self.view
                .replace(vec![placeholder_row(NO_PATIENT_APPOINTMENTS, TABLE_COLUMNS)]);
            return Some(patient);
        };

        let ticket = self.sequencer.issue();
        let result = self
            .ctx
            .api
            .patients()
            .try_appointments(id, Role::AuthenticatedPatient.api_user(), &token)
            .await;
        self.render(ticket, result, false);
        Some(patient)
    }

    /// Narrows the list by `condition` (`past`, `future` or blank) and doctor name.
    pub async fn on_filter_change(&self, condition: &str, doctor_name: &str) {
        let Some(token) = self.signed_in_token() else {
            return;
        };

        let ticket = self.sequencer.issue();
        let result = self
            .ctx
            .api
            .patients()
            .try_filter_appointments(condition, doctor_name, &token)
            .await;
        self.render(ticket, result, true);
    }

    fn signed_in_token(&self) -> Option<String> {
        let token = self.ctx.session.token();
        if token.is_none() {
            self.expire_session();
        }
        token
    }

    fn expire_session(&self) {
        self.ctx.alert(SESSION_EXPIRED);
        self.ctx.prompter.redirect(PATIENT_LOGIN_PAGE);
    }

    fn render(
        &self,
        ticket: Ticket,
        result: ApiResult<Vec<Appointment>>,
        alert_on_error: bool,
    ) {
        let rows = match result {
            Ok(list) if list.is_empty() => {
                vec![placeholder_row(NO_PATIENT_APPOINTMENTS, TABLE_COLUMNS)]
            }
            Ok(list) => list.iter().map(build_appointment_row).collect(),
            Err(err) => {
                tracing::error!(target: TRACING_TARGET, error = %err, "Error loading appointments");
                if alert_on_error && self.sequencer.is_current(ticket) {
                    self.ctx.alert(PATIENT_FILTER_FAILED);
                }
                vec![placeholder_row(NO_PATIENT_APPOINTMENTS, TABLE_COLUMNS)]
            }
        };
        self.sequencer.commit(ticket, || self.view.replace(rows));
    }
}
