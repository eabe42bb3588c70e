//! Doctor card grid with name, time-of-day and specialty filters.

use std::sync::Arc;

use api_client::Doctor;
use clinic_types::FilterValue;

use super::sequence::RequestSequencer;
use crate::actions::CardActions;
use crate::adapters::ListView;
use crate::builders::{build_doctor_card, placeholder};
use crate::context::PageContext;

/// Tracing target for the doctor list.
pub const TRACING_TARGET: &str = "clinic_core::doctor_list";

pub const NO_DOCTORS_FOUND: &str = "No doctors found with the given filters.";
pub const FILTER_FAILED: &str = "Something went wrong while filtering doctors.";

/// Raw filter inputs as typed or selected by the user.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DoctorFilter {
    pub name: String,
    /// `AM`, `PM` or blank.
    pub time: String,
    pub specialty: String,
}

impl DoctorFilter {
    pub fn new(
        name: impl Into<String>,
        time: impl Into<String>,
        specialty: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            time: time.into(),
            specialty: specialty.into(),
        }
    }
}

pub struct DoctorListController {
    ctx: PageContext,
    view: Arc<dyn ListView>,
    sequencer: RequestSequencer,
}

impl DoctorListController {
    pub fn new(ctx: PageContext, view: Arc<dyn ListView>) -> Self {
        Self {
            ctx,
            view,
            sequencer: RequestSequencer::new(),
        }
    }

    pub fn context(&self) -> &PageContext {
        &self.ctx
    }

    /// Dispatcher for the controls on the rendered cards.
    pub fn actions(&self) -> CardActions {
        CardActions::new(self.ctx.clone(), self.view.clone())
    }

    /// Renders every doctor. Failures are logged by the client and render an empty grid.
    pub async fn load(&self) {
        let ticket = self.sequencer.issue();
        let doctors = self.ctx.api.doctors().list().await;
        tracing::debug!(target: TRACING_TARGET, count = doctors.len(), "Doctors loaded");
        self.sequencer.commit(ticket, || self.render_cards(&doctors));
    }

    /// Re-queries with the current filter inputs. Blank inputs place no constraint.
    pub async fn on_filter_change(&self, filter: &DoctorFilter) {
        let name = FilterValue::from_input(&filter.name);
        let time = FilterValue::from_input(&filter.time);
        let specialty = FilterValue::from_input(&filter.specialty);
        tracing::debug!(
            target: TRACING_TARGET,
            name = %name,
            time = %time,
            specialty = %specialty,
            "Filtering doctors"
        );

        let ticket = self.sequencer.issue();
        let result = self
            .ctx
            .api
            .doctors()
            .try_filter(
                name.value().unwrap_or_default(),
                time.value().unwrap_or_default(),
                specialty.value().unwrap_or_default(),
            )
            .await;

        match result {
            Ok(doctors) if !doctors.is_empty() => {
                self.sequencer.commit(ticket, || self.render_cards(&doctors));
            }
            Ok(_) => {
                self.sequencer.commit(ticket, || {
                    self.view.replace(vec![placeholder(NO_DOCTORS_FOUND)])
                });
            }
            Err(err) => {
                tracing::error!(target: TRACING_TARGET, error = %err, "Error filtering doctors");
                self.sequencer.commit(ticket, || {
                    self.ctx.alert(FILTER_FAILED);
                    self.view.replace(vec![placeholder(NO_DOCTORS_FOUND)]);
                });
            }
        }
    }

    fn render_cards(&self, doctors: &[Doctor]) {
        let role = self.ctx.session.role();
        self.view.replace(
            doctors
                .iter()
                .map(|doctor| build_doctor_card(doctor, role))
                .collect(),
        );
    }
}
