//! Page controllers.
//!
//! A controller owns the page-scoped state of one view (filter inputs, selected date, request
//! sequence) and turns user input into API calls and view updates.

pub mod admin;
pub mod doctor_dashboard;
pub mod doctor_list;
pub mod login;
pub mod patient_appointments;
pub mod sequence;

pub use admin::{AdminDashboard, DoctorForm};
pub use doctor_dashboard::{utc_today, Clock, DoctorDashboard};
pub use doctor_list::{DoctorFilter, DoctorListController};
pub use login::{LoginController, SignupForm};
pub use patient_appointments::PatientAppointments;
pub use sequence::{RequestSequencer, Ticket};
