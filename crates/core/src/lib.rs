//! # Clinic Core
//!
//! Presentation logic for the clinic portal.
//!
//! Handles:
//! - Session state (stored token and role) behind a pluggable [`SessionStore`]
//! - Pure view builders that turn doctors and appointments into [`ViewNode`] trees
//! - Card actions (delete, book, prescribe) and their confirmation and alert flow
//! - Page controllers for the doctor grid, the admin and doctor dashboards, a patient's own
//!   appointments, and login/signup
//!
//! Hosts provide a [`ListView`] per container, a [`Prompter`] and a [`BookingOverlay`]; everything
//! else is wired from a [`PageContext`].
//!
//! Configuration is resolved once at startup into a [`PortalConfig`] and never re-read from the
//! environment afterwards.

#![forbid(unsafe_code)]
#![warn(rust_2018_idioms)]

pub mod actions;
pub mod adapters;
pub mod builders;
pub mod config;
pub mod context;
pub mod controllers;
pub mod error;
pub mod role;
pub mod session;
pub mod view;

pub use actions::{ActionOutcome, CardActions};
pub use adapters::{
    BookingOverlay, ListView, MemoryView, Prompter, RecordingOverlay, ScriptedPrompter,
};
pub use builders::{
    build_appointment_row, build_doctor_card, build_patient_row, placeholder, placeholder_row,
};
pub use config::PortalConfig;
pub use context::PageContext;
pub use error::{PortalError, PortalResult};
pub use role::Role;
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionStore};
pub use view::{render_text, CardAction, Element, ViewNode};
