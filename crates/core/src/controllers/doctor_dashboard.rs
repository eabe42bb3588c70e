//! The doctor's appointment table, scoped to one date and optionally one patient name.

use std::sync::{Arc, Mutex, MutexGuard};

use chrono::{NaiveDate, Utc};
use clinic_types::{FilterValue, NULL_SEGMENT};

use super::sequence::RequestSequencer;
use crate::actions::CardActions;
use crate::adapters::ListView;
use crate::builders::{build_patient_row, placeholder_row};
use crate::context::PageContext;

/// Tracing target for the doctor dashboard.
pub const TRACING_TARGET: &str = "clinic_core::doctor_dashboard";

pub const NO_APPOINTMENTS: &str = "No Appointments found for selected date.";
pub const APPOINTMENTS_FAILED: &str = "Error loading appointments. Try again later.";
pub const TABLE_COLUMNS: u32 = 4;

/// Source of "today".
pub type Clock = Arc<dyn Fn() -> NaiveDate + Send + Sync>;

/// Today's date in UTC.
pub fn utc_today() -> NaiveDate {
    Utc::now().date_naive()
}

#[derive(Clone, Debug)]
struct Query {
    date: NaiveDate,
    patient_name: FilterValue,
}

pub struct DoctorDashboard {
    ctx: PageContext,
    view: Arc<dyn ListView>,
    clock: Clock,
    query: Mutex<Query>,
    sequencer: RequestSequencer,
}

impl DoctorDashboard {
    pub fn new(ctx: PageContext, view: Arc<dyn ListView>) -> Self {
        Self::with_clock(ctx, view, Arc::new(utc_today))
    }

    pub fn with_clock(ctx: PageContext, view: Arc<dyn ListView>, clock: Clock) -> Self {
        let today = clock();
        Self {
            ctx,
            view,
            clock,
            query: Mutex::new(Query {
                date: today,
                patient_name: FilterValue::Any,
            }),
            sequencer: RequestSequencer::new(),
        }
    }

    fn query(&self) -> MutexGuard<'_, Query> {
        self.query.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn selected_date(&self) -> NaiveDate {
        self.query().date
    }

    /// The patient-name criterion as sent to the backend (`null` when unset).
    pub fn patient_name(&self) -> String {
        self.query().patient_name.as_segment().to_string()
    }

    /// Dispatcher for the prescription controls on the rendered rows.
    pub fn actions(&self) -> CardActions {
        CardActions::new(self.ctx.clone(), self.view.clone())
    }

    pub async fn on_search_input(&self, input: &str) {
        self.query().patient_name = FilterValue::from_input(input);
        self.load().await
    }

    pub async fn on_today(&self) {
        self.query().date = (self.clock)();
        self.load().await
    }

    pub async fn on_date_change(&self, date: NaiveDate) {
        self.query().date = date;
        self.load().await
    }

    /// Clears the table and rebuilds it for the current date and name.
    pub async fn load(&self) {
        // Snapshot and ticket under one lock, so the newest ticket always carries the newest query.
        let (query, ticket) = {
            let query = self.query();
            (query.clone(), self.sequencer.issue())
        };
        let token = self
            .ctx
            .session
            .token()
            .unwrap_or_else(|| NULL_SEGMENT.to_string());

        let result = self
            .ctx
            .api
            .appointments()
            .try_for_doctor(
                query.date,
                query.patient_name.value().unwrap_or_default(),
                &token,
            )
            .await;

        let rows = match result {
            Ok(appointments) if appointments.is_empty() => {
                vec![placeholder_row(NO_APPOINTMENTS, TABLE_COLUMNS)]
            }
            Ok(appointments) => appointments
                .iter()
                .map(|a| build_patient_row(&a.patient(), a))
                .collect(),
            Err(err) => {
                tracing::error!(
                    target: TRACING_TARGET,
                    date = %query.date,
                    error = %err,
                    "Error loading appointments"
                );
                vec![placeholder_row(APPOINTMENTS_FAILED, TABLE_COLUMNS)]
            }
        };

        if !self.sequencer.commit(ticket, || self.view.replace(rows)) {
            tracing::debug!(
                target: TRACING_TARGET,
                date = %query.date,
                patient_name = %query.patient_name,
                "Dropped stale appointment listing"
            );
        }
    }
}
