//! Seams between the controllers and whatever hosts them.
//!
//! A host supplies a [`ListView`] per container, a [`Prompter`] for blocking alerts and
//! confirmations, and a [`BookingOverlay`]. The in-memory implementations here back the tests and
//! any host that only needs to inspect the rendered tree.

use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard};

use api_client::{Doctor, Patient};

use crate::view::ViewNode;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|e| e.into_inner())
}

/// A container of keyed nodes, such as a card grid or a table body.
pub trait ListView: Send + Sync {
    /// Clears the container and renders `nodes` in order.
    fn replace(&self, nodes: Vec<ViewNode>);
    /// Detaches the node with `key`. Returns `false` if no such node is attached.
    fn remove(&self, key: &str) -> bool;
    /// Snapshot of the attached nodes.
    fn nodes(&self) -> Vec<ViewNode>;
}

/// Blocking user prompts and navigation.
pub trait Prompter: Send + Sync {
    fn alert(&self, message: &str);
    fn confirm(&self, message: &str) -> bool;
    fn redirect(&self, location: &str);
}

/// Collaborator that takes over once a logged-in patient chooses a doctor.
#[async_trait::async_trait]
pub trait BookingOverlay: Send + Sync {
    async fn open(&self, doctor: &Doctor, patient: &Patient);
}

/// A [`ListView`] that keeps nodes in memory and counts full re-renders.
#[derive(Debug, Default)]
pub struct MemoryView {
    nodes: Mutex<Vec<ViewNode>>,
    renders: Mutex<usize>,
}

impl MemoryView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of times [`ListView::replace`] ran.
    pub fn render_count(&self) -> usize {
        *lock(&self.renders)
    }

    /// Concatenated text of every attached node.
    pub fn text(&self) -> String {
        lock(&self.nodes)
            .iter()
            .map(ViewNode::text_content)
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn len(&self) -> usize {
        lock(&self.nodes).len()
    }

    pub fn is_empty(&self) -> bool {
        lock(&self.nodes).is_empty()
    }
}

impl ListView for MemoryView {
    fn replace(&self, nodes: Vec<ViewNode>) {
        *lock(&self.nodes) = nodes;
        *lock(&self.renders) += 1;
    }

    fn remove(&self, key: &str) -> bool {
        let mut nodes = lock(&self.nodes);
        match nodes.iter().position(|n| n.key() == Some(key)) {
            Some(index) => {
                nodes.remove(index);
                true
            }
            None => false,
        }
    }

    fn nodes(&self) -> Vec<ViewNode> {
        lock(&self.nodes).clone()
    }
}

/// A [`Prompter`] that records every prompt and answers confirmations from a script.
///
/// Once the script runs out every confirmation gets the default answer.
#[derive(Debug)]
pub struct ScriptedPrompter {
    default_answer: bool,
    answers: Mutex<VecDeque<bool>>,
    alerts: Mutex<Vec<String>>,
    confirms: Mutex<Vec<String>>,
    redirects: Mutex<Vec<String>>,
}

impl ScriptedPrompter {
    /// A prompter that confirms everything.
    pub fn accepting() -> Self {
        Self::answering(true)
    }

    /// A prompter that declines everything.
    pub fn declining() -> Self {
        Self::answering(false)
    }

    pub fn answering(default_answer: bool) -> Self {
        Self {
            default_answer,
            answers: Mutex::default(),
            alerts: Mutex::default(),
            confirms: Mutex::default(),
            redirects: Mutex::default(),
        }
    }

    /// Queues answers consumed by the next confirmations, in order.
    pub fn with_answers(self, answers: impl IntoIterator<Item = bool>) -> Self {
        lock(&self.answers).extend(answers);
        self
    }

    pub fn alerts(&self) -> Vec<String> {
        lock(&self.alerts).clone()
    }

    pub fn confirms(&self) -> Vec<String> {
        lock(&self.confirms).clone()
    }

    pub fn redirects(&self) -> Vec<String> {
        lock(&self.redirects).clone()
    }
}

impl Default for ScriptedPrompter {
    fn default() -> Self {
        Self::accepting()
    }
}

impl Prompter for ScriptedPrompter {
    fn alert(&self, message: &str) {
        lock(&self.alerts).push(message.to_string());
    }

    fn confirm(&self, message: &str) -> bool {
        lock(&self.confirms).push(message.to_string());
        lock(&self.answers)
            .pop_front()
            .unwrap_or(self.default_answer)
    }

    fn redirect(&self, location: &str) {
        lock(&self.redirects).push(location.to_string());
    }
}

/// A [`BookingOverlay`] that only records what it was opened with.
#[derive(Debug, Default)]
pub struct RecordingOverlay {
    opened: Mutex<Vec<(Doctor, Patient)>>,
}

impl RecordingOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn opened(&self) -> Vec<(Doctor, Patient)> {
        lock(&self.opened).clone()
    }
}

#[async_trait::async_trait]
impl BookingOverlay for RecordingOverlay {
    async fn open(&self, doctor: &Doctor, patient: &Patient) {
        lock(&self.opened).push((doctor.clone(), patient.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::Element;

    fn keyed(key: &str) -> ViewNode {
        Element::new("div").key(key).text(key).into()
    }

    #[test]
    fn memory_view_replaces_and_removes_by_key() {
        let view = MemoryView::new();
        view.replace(vec![keyed("1"), keyed("2"), keyed("3")]);

        assert!(view.remove("2"));
        assert!(!view.remove("2"));
        assert_eq!(view.text(), "1\n3");
        assert_eq!(view.render_count(), 1);

        view.replace(Vec::new());
        assert!(view.is_empty());
        assert_eq!(view.render_count(), 2);
    }

    #[test]
    fn scripted_prompter_consumes_answers_then_defaults() {
        let prompter = ScriptedPrompter::declining().with_answers([true]);
        assert!(prompter.confirm("first?"));
        assert!(!prompter.confirm("second?"));
        prompter.alert("hello");
        prompter.redirect("/home");

        assert_eq!(prompter.confirms(), vec!["first?", "second?"]);
        assert_eq!(prompter.alerts(), vec!["hello"]);
        assert_eq!(prompter.redirects(), vec!["/home"]);
    }
}
