//! Renderable tree produced by the view builders.
//!
//! A [`ViewNode`] is plain data: tag, classes, attributes, an optional key used to find the node
//! again inside its container, an optional [`CardAction`] bound to it, and children. Adapters turn
//! it into whatever the host displays; [`render_text`] gives a deterministic terminal rendering.

use api_client::Doctor;

/// What activating a control does. Interpreted by [`crate::actions::CardActions`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CardAction {
    DeleteDoctor { id: i64, name: String },
    /// Tell an anonymous visitor to log in. Never calls the backend.
    PromptLogin,
    BookAppointment(Box<Doctor>),
    AddPrescription { appointment_id: i64 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ViewNode {
    Element(Element),
    Text(String),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Element {
    pub tag: &'static str,
    pub classes: Vec<&'static str>,
    pub attributes: Vec<(&'static str, String)>,
    pub key: Option<String>,
    pub action: Option<CardAction>,
    pub children: Vec<ViewNode>,
}

impl Element {
    pub fn new(tag: &'static str) -> Self {
        Self {
            tag,
            ..Default::default()
        }
    }

    pub fn class(mut self, class: &'static str) -> Self {
        self.classes.push(class);
        self
    }

    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((name, value.into()));
        self
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn action(mut self, action: CardAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn child(mut self, child: impl Into<ViewNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(ViewNode::Text(text.into()))
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| *c == class)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
    }
}

impl From<Element> for ViewNode {
    fn from(element: Element) -> Self {
        ViewNode::Element(element)
    }
}

impl ViewNode {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            ViewNode::Element(e) => Some(e),
            ViewNode::Text(_) => None,
        }
    }

    pub fn key(&self) -> Option<&str> {
        self.as_element().and_then(|e| e.key.as_deref())
    }

    /// Concatenated text of this node and all descendants.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match self {
            ViewNode::Text(t) => out.push_str(t),
            ViewNode::Element(e) => e.children.iter().for_each(|c| c.collect_text(out)),
        }
    }

    /// Every element (including `self`) carrying `class`, in document order.
    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.walk(&mut |e| {
            if e.has_class(class) {
                found.push(e);
            }
        });
        found
    }

    /// Every element with the given tag, in document order.
    pub fn find_by_tag(&self, tag: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.walk(&mut |e| {
            if e.tag == tag {
                found.push(e);
            }
        });
        found
    }

    /// Every bound action, in document order.
    pub fn actions(&self) -> Vec<&CardAction> {
        let mut found = Vec::new();
        self.walk(&mut |e| found.extend(e.action.as_ref()));
        found
    }

    fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Element)) {
        if let ViewNode::Element(e) = self {
            visit(e);
            for child in &e.children {
                child.walk(visit);
            }
        }
    }
}

/// Plain-text rendering: one line per block element, table rows joined with ` | `, buttons as
/// `[Label]`.
pub fn render_text(node: &ViewNode) -> String {
    let mut lines = Vec::new();
    render_block(node, &mut lines);
    lines.join("\n")
}

fn render_block(node: &ViewNode, lines: &mut Vec<String>) {
    match node {
        ViewNode::Text(t) if !t.trim().is_empty() => lines.push(t.clone()),
        ViewNode::Text(_) => {}
        ViewNode::Element(e) => match e.tag {
            "tr" => lines.push(
                e.children
                    .iter()
                    .map(render_inline)
                    .collect::<Vec<_>>()
                    .join(" | "),
            ),
            "button" | "h3" | "p" | "td" | "span" => lines.push(render_inline(node)),
            _ => e.children.iter().for_each(|c| render_block(c, lines)),
        },
    }
}

fn render_inline(node: &ViewNode) -> String {
    match node {
        ViewNode::Text(t) => t.clone(),
        ViewNode::Element(e) if e.tag == "button" => format!("[{}]", node.text_content()),
        ViewNode::Element(e) => e
            .children
            .iter()
            .map(render_inline)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> ViewNode {
        Element::new("div")
            .class("card")
            .key("7")
            .child(Element::new("h3").text("Title"))
            .child(
                Element::new("div").class("actions").child(
                    Element::new("button")
                        .class("go")
                        .text("Go")
                        .action(CardAction::PromptLogin),
                ),
            )
            .into()
    }

    #[test]
    fn text_content_concatenates_descendants() {
        assert_eq!(sample().text_content(), "TitleGo");
    }

    #[test]
    fn finds_by_class_tag_and_action() {
        let node = sample();
        assert_eq!(node.find_by_class("card").len(), 1);
        assert_eq!(node.find_by_class("go")[0].tag, "button");
        assert_eq!(node.find_by_tag("h3").len(), 1);
        assert_eq!(node.actions(), vec![&CardAction::PromptLogin]);
        assert_eq!(node.key(), Some("7"));
    }

    #[test]
    fn renders_blocks_rows_and_buttons() {
        assert_eq!(render_text(&sample()), "Title\n[Go]");

        let row: ViewNode = Element::new("tr")
            .child(Element::new("td").text("1"))
            .child(Element::new("td").text("Ann"))
            .child(
                Element::new("td").child(Element::new("button").text("Add Prescription")),
            )
            .into();
        assert_eq!(render_text(&row), "1 | Ann | [Add Prescription]");
    }
}
