#![allow(dead_code)]

use std::sync::Arc;

use api_client::{ClientConfig, ClinicApi};
use chrono::NaiveDate;
use clinic_core::session::{ROLE_KEY, TOKEN_KEY};
use clinic_core::{
    ListView, MemorySessionStore, MemoryView, PageContext, RecordingOverlay, Role,
    ScriptedPrompter, Session, SessionStore, ViewNode,
};
use test_backend::{FakeBackend, Seed};

/// A page wired to a fresh fake backend with in-memory collaborators.
pub struct Page {
    pub backend: FakeBackend,
    pub store: Arc<MemorySessionStore>,
    pub prompter: Arc<ScriptedPrompter>,
    pub overlay: Arc<RecordingOverlay>,
    pub view: Arc<MemoryView>,
    pub ctx: PageContext,
}

pub fn api_for(base_url: &str) -> ClinicApi {
    ClinicApi::new(ClientConfig::new(base_url, None).expect("config")).expect("client")
}

impl Page {
    pub async fn start() -> Self {
        Self::with_prompter(ScriptedPrompter::accepting()).await
    }

    pub async fn with_prompter(prompter: ScriptedPrompter) -> Self {
        let backend = FakeBackend::start(Seed::clinic()).await.expect("start backend");
        let store = Arc::new(MemorySessionStore::new());
        let prompter = Arc::new(prompter);
        let overlay = Arc::new(RecordingOverlay::new());
        let ctx = PageContext::new(
            api_for(&backend.base_url()),
            Session::new(store.clone()),
            prompter.clone(),
            overlay.clone(),
        );

        Self {
            backend,
            store,
            prompter,
            overlay,
            view: Arc::new(MemoryView::new()),
            ctx,
        }
    }

    /// Points the page at a port nobody listens on.
    pub async fn unreachable(mut self) -> Self {
        let base = test_backend::unreachable_base_url().await.expect("port");
        self.ctx.api = api_for(&base);
        self
    }

    pub fn sign_in(&self, token: &str, role: Role) {
        self.store.set(TOKEN_KEY, token).expect("token");
        self.store.set(ROLE_KEY, role.as_str()).expect("role");
    }

    pub fn select_role(&self, role: Role) {
        self.ctx.session.select_role(role).expect("role");
    }

    pub fn list_view(&self) -> Arc<dyn ListView> {
        self.view.clone()
    }

    pub fn nodes(&self) -> Vec<ViewNode> {
        self.view.nodes()
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("date")
}

/// Text of each `td` in a row.
pub fn cells(row: &ViewNode) -> Vec<String> {
    row.find_by_tag("td")
        .into_iter()
        .map(|td| ViewNode::Element(td.clone()).text_content())
        .collect()
}

/// Text of each button in a node.
pub fn buttons(node: &ViewNode) -> Vec<String> {
    node.find_by_tag("button")
        .into_iter()
        .map(|b| ViewNode::Element(b.clone()).text_content())
        .collect()
}
