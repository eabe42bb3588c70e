//! Terminal implementations of the portal seams.

use std::io::{self, BufRead, Write};
use std::sync::{Arc, Mutex, MutexGuard};

use api_client::{AppointmentRequest, ClinicApi, Doctor, Patient, RecordRef, STATUS_SCHEDULED};
use chrono::{NaiveDate, NaiveTime};
use clinic_core::{render_text, BookingOverlay, ListView, Prompter, Session, ViewNode};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// Holds the rendered nodes until the command prints them.
#[derive(Debug, Default)]
pub struct TerminalView {
    nodes: Mutex<Vec<ViewNode>>,
}

impl TerminalView {
    /// Prints every node, separating nodes with `separator`.
    pub fn print(&self, separator: &str) {
        let nodes = lock(&self.nodes);
        let rendered: Vec<String> = nodes.iter().map(render_text).collect();
        if !rendered.is_empty() {
            println!("{}", rendered.join(separator));
        }
    }
}

impl ListView for TerminalView {
    fn replace(&self, nodes: Vec<ViewNode>) {
        *lock(&self.nodes) = nodes;
    }

    fn remove(&self, key: &str) -> bool {
        let mut nodes = lock(&self.nodes);
        let before = nodes.len();
        nodes.retain(|n| n.key() != Some(key));
        nodes.len() < before
    }

    fn nodes(&self) -> Vec<ViewNode> {
        lock(&self.nodes).clone()
    }
}

/// Prompts on stdout and reads answers from stdin. `assume_yes` skips the question.
#[derive(Debug)]
pub struct TerminalPrompter {
    assume_yes: bool,
}

impl TerminalPrompter {
    pub fn new(assume_yes: bool) -> Self {
        Self { assume_yes }
    }
}

impl Prompter for TerminalPrompter {
    fn alert(&self, message: &str) {
        println!("{message}");
    }

    fn confirm(&self, message: &str) -> bool {
        if self.assume_yes {
            println!("{message} [y/N] y");
            return true;
        }

        print!("{message} [y/N] ");
        if io::stdout().flush().is_err() {
            return false;
        }
        let mut answer = String::new();
        match io::stdin().lock().read_line(&mut answer) {
            Ok(_) => matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(e) => {
                tracing::warn!("Could not read confirmation: {e}");
                false
            }
        }
    }

    fn redirect(&self, location: &str) {
        println!("Next: {location}");
    }
}

/// The slot a `doctors book` invocation asked for.
#[derive(Clone, Debug, Default)]
pub struct SlotChoice {
    pub date: Option<NaiveDate>,
    /// A slot label such as `09:00 AM`.
    pub time: Option<String>,
}

/// Booking overlay that books the chosen slot, or lists the free ones when none was chosen.
pub struct SlotBooking {
    api: ClinicApi,
    session: Session,
    prompter: Arc<dyn Prompter>,
    choice: SlotChoice,
    today: NaiveDate,
}

impl SlotBooking {
    pub fn new(
        api: ClinicApi,
        session: Session,
        prompter: Arc<dyn Prompter>,
        choice: SlotChoice,
        today: NaiveDate,
    ) -> Self {
        Self {
            api,
            session,
            prompter,
            choice,
            today,
        }
    }
}

#[async_trait::async_trait]
impl BookingOverlay for SlotBooking {
    async fn open(&self, doctor: &Doctor, patient: &Patient) {
        let (Some(doctor_id), Some(patient_id)) = (doctor.id, patient.id) else {
            self.prompter.alert("Doctor or patient record is incomplete.");
            return;
        };
        let Some(token) = self.session.token() else {
            self.prompter.alert("Session expired. Please log in again.");
            return;
        };

        let date = self.choice.date.unwrap_or(self.today);
        let slots = self
            .api
            .doctors()
            .availability("patient", doctor_id, date, &token)
            .await;

        let Some(time) = self.choice.time.as_deref().map(str::trim) else {
            if slots.is_empty() {
                self.prompter
                    .alert(&format!("Dr. {} has no free slots on {date}.", doctor.name));
            } else {
                self.prompter.alert(&format!(
                    "Free slots with Dr. {} on {date}: {}",
                    doctor.name,
                    slots.join(", ")
                ));
            }
            return;
        };

        if !slots.iter().any(|s| s.eq_ignore_ascii_case(time)) {
            self.prompter
                .alert(&format!("{time} is not available on {date}."));
            return;
        }
        let Ok(slot) = NaiveTime::parse_from_str(time, "%I:%M %p") else {
            self.prompter.alert(&format!("Unrecognised time slot: {time}"));
            return;
        };

        if !self.prompter.confirm(&format!(
            "Book {} with Dr. {} on {date} at {time}?",
            patient.name, doctor.name
        )) {
            return;
        }

        let request = AppointmentRequest {
            id: None,
            doctor: RecordRef { id: doctor_id },
            patient: RecordRef { id: patient_id },
            appointment_time: date.and_time(slot),
            status: STATUS_SCHEDULED,
        };
        let result = self.api.appointments().book(&request, &token).await;
        self.prompter.alert(&result.message);
    }
}
