//! Pure builders from domain records to [`ViewNode`]s.

use api_client::{Appointment, Doctor, PatientSummary};

use crate::role::Role;
use crate::view::{CardAction, Element, ViewNode};

pub const NO_AVAILABLE_TIMES: &str = "No available times";

/// A doctor card with the actions `role` is allowed to use.
///
/// The card is keyed by the doctor id so it can be detached from its list after a delete.
pub fn build_doctor_card(doctor: &Doctor, role: Role) -> ViewNode {
    let times = if doctor.available_times.is_empty() {
        NO_AVAILABLE_TIMES.to_string()
    } else {
        doctor.available_times.join(", ")
    };

    let info = Element::new("div")
        .class("doctor-info")
        .child(Element::new("h3").text(doctor.name.as_str()))
        .child(Element::new("p").text(format!("Specialization: {}", doctor.specialty)))
        .child(Element::new("p").text(format!("Email: {}", doctor.email)))
        .child(Element::new("p").text(format!("Available Times: {times}")));

    let mut actions = Element::new("div").class("doctor-card-actions");
    match role {
        Role::Admin => {
            let button = Element::new("button")
                .class("delete-doctor-btn")
                .text("Delete Doctor");
            actions = actions.child(match doctor.id {
                Some(id) => button.action(CardAction::DeleteDoctor {
                    id,
                    name: doctor.name.clone(),
                }),
                None => button.attr("disabled", "true"),
            });
        }
        Role::AnonymousOrPatient => {
            actions = actions.child(
                Element::new("button")
                    .class("book-now-btn")
                    .text("Book Now")
                    .action(CardAction::PromptLogin),
            );
        }
        Role::AuthenticatedPatient => {
            actions = actions.child(
                Element::new("button")
                    .class("book-now-btn")
                    .text("Book Now")
                    .action(CardAction::BookAppointment(Box::new(doctor.clone()))),
            );
        }
        Role::Doctor => {}
    }

    let mut card = Element::new("div").class("doctor-card");
    if let Some(id) = doctor.id {
        card = card.key(id.to_string());
    }
    card.child(info).child(actions).into()
}

/// A row of the doctor's appointment table: patient id, name, phone, email and a prescription
/// control.
pub fn build_patient_row(patient: &PatientSummary, appointment: &Appointment) -> ViewNode {
    let id = patient.id.map(|id| id.to_string()).unwrap_or_default();

    let mut button = Element::new("button")
        .class("prescription-btn")
        .text("Add Prescription");
    if let Some(appointment_id) = appointment.id {
        button = button.action(CardAction::AddPrescription { appointment_id });
    }

    let mut row = Element::new("tr")
        .child(Element::new("td").class("patient-id").text(id))
        .child(Element::new("td").text(patient.name.as_str()))
        .child(Element::new("td").text(patient.phone.as_str()))
        .child(Element::new("td").text(patient.email.as_str()))
        .child(Element::new("td").child(button));
    if let Some(id) = appointment.id {
        row = row.key(id.to_string());
    }
    row.into()
}

/// A row of a patient's own appointment list: doctor, date, time and status.
pub fn build_appointment_row(appointment: &Appointment) -> ViewNode {
    let (date, time) = match appointment.appointment_time {
        Some(at) => (
            at.format("%Y-%m-%d").to_string(),
            at.format("%I:%M %p").to_string(),
        ),
        None => ("-".to_string(), "-".to_string()),
    };

    let mut row = Element::new("tr")
        .child(Element::new("td").text(appointment.doctor_name.as_str()))
        .child(Element::new("td").text(date))
        .child(Element::new("td").text(time))
        .child(Element::new("td").text(appointment.status_label()));
    if let Some(id) = appointment.id {
        row = row.key(id.to_string());
    }
    row.into()
}

/// A single table row spanning `colspan` columns.
pub fn placeholder_row(message: &str, colspan: u32) -> ViewNode {
    Element::new("tr")
        .class("placeholder")
        .child(
            Element::new("td")
                .attr("colspan", colspan.to_string())
                .text(message),
        )
        .into()
}

/// A paragraph shown in place of an empty list.
pub fn placeholder(message: &str) -> ViewNode {
    Element::new("p").class("placeholder").text(message).into()
}
