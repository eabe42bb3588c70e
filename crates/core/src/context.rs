use std::sync::Arc;

use api_client::ClinicApi;

use crate::adapters::{BookingOverlay, Prompter};
use crate::session::Session;

/// Collaborators shared by every controller on a page.
#[derive(Clone)]
pub struct PageContext {
    pub api: ClinicApi,
    pub session: Session,
    pub prompter: Arc<dyn Prompter>,
    pub overlay: Arc<dyn BookingOverlay>,
}

impl std::fmt::Debug for PageContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageContext")
            .field("api", &self.api)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl PageContext {
    pub fn new(
        api: ClinicApi,
        session: Session,
        prompter: Arc<dyn Prompter>,
        overlay: Arc<dyn BookingOverlay>,
    ) -> Self {
        Self {
            api,
            session,
            prompter,
            overlay,
        }
    }

    /// Alerts `message` and returns it, for call sites that also report it upward.
    pub(crate) fn alert(&self, message: impl Into<String>) -> String {
        let message = message.into();
        self.prompter.alert(&message);
        message
    }
}
