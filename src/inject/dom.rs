//! A small in-memory document, shareable across threads, implementing
//! [`Page`] and [`ChangeNotifier`]. The `host` bridge drives it as a stand-in
//! for Gmail, and the tests use it as their fake DOM.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::domain::RecipientKind;
use crate::inject::page::{ChangeNotifier, FieldEvent, Page, Selector};

pub type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug, Clone)]
struct Node {
    tag: String,
    attrs: BTreeMap<String, String>,
    value: String,
    text: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(tag: &str, attrs: &[(&str, &str)]) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: attrs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            value: String::new(),
            text: String::new(),
            parent: None,
            children: Vec::new(),
        }
    }
}

/// One synthetic event, as observed by the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchedEvent {
    pub node: NodeId,
    pub event: FieldEvent,
    /// Field value (or text for content-editable nodes) at dispatch time.
    pub snapshot: String,
}

#[derive(Debug, Default)]
struct Tree {
    nodes: Vec<Node>,
    focused: Option<NodeId>,
    events: Vec<DispatchedEvent>,
    scans: usize,
}

/// Node handles of a compose dialog built by [`MemoryPage::add_compose_dialog`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComposeNodes {
    pub dialog: NodeId,
    pub to: NodeId,
    pub cc: NodeId,
    pub bcc: NodeId,
    pub subject: NodeId,
    pub body: NodeId,
    pub send: Option<NodeId>,
}

impl ComposeNodes {
    pub fn recipient(&self, kind: RecipientKind) -> NodeId {
        match kind {
            RecipientKind::To => self.to,
            RecipientKind::Cc => self.cc,
            RecipientKind::Bcc => self.bcc,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MemoryPage {
    tree: Arc<Mutex<Tree>>,
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPage {
    /// An empty document with a `body` root.
    pub fn new() -> Self {
        let tree = Tree {
            nodes: vec![Node::new("body", &[])],
            ..Tree::default()
        };
        Self {
            tree: Arc::new(Mutex::new(tree)),
        }
    }

    fn tree(&self) -> MutexGuard<'_, Tree> {
        self.tree.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn root(&self) -> NodeId {
        ROOT
    }

    /// Creates a node without attaching it anywhere.
    pub fn create(&self, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let mut t = self.tree();
        t.nodes.push(Node::new(tag, attrs));
        t.nodes.len() - 1
    }

    pub fn append(&self, parent: NodeId, child: NodeId) {
        let mut t = self.tree();
        if let Some(old) = t.nodes[child].parent {
            t.nodes[old].children.retain(|&c| c != child);
        }
        t.nodes[child].parent = Some(parent);
        t.nodes[parent].children.push(child);
    }

    /// Creates a node and appends it under `parent`.
    pub fn element(&self, parent: NodeId, tag: &str, attrs: &[(&str, &str)]) -> NodeId {
        let id = self.create(tag, attrs);
        self.append(parent, id);
        id
    }

    pub fn detach(&self, node: NodeId) {
        let mut t = self.tree();
        if let Some(parent) = t.nodes[node].parent.take() {
            t.nodes[parent].children.retain(|&c| c != node);
        }
    }

    pub fn value_of(&self, node: NodeId) -> String {
        self.tree().nodes[node].value.clone()
    }

    pub fn text_of(&self, node: NodeId) -> String {
        self.tree().nodes[node].text.clone()
    }

    pub fn focused(&self) -> Option<NodeId> {
        self.tree().focused
    }

    pub fn events(&self) -> Vec<DispatchedEvent> {
        self.tree().events.clone()
    }

    /// How many whole-document dialog scans have run so far.
    pub fn dialog_scans(&self) -> usize {
        self.tree().scans
    }

    /// Builds a Gmail-shaped compose dialog, detached. Without `send` it
    /// looks like the loading skeleton Gmail shows before the toolbar exists.
    pub fn build_compose_dialog(&self, send: bool) -> ComposeNodes {
        let dialog = self.create("div", &[("role", "dialog")]);
        let header = self.element(dialog, "div", &[("class", "recipients")]);
        let to = self.element(header, "textarea", &[("name", "to")]);
        let cc = self.element(header, "textarea", &[("name", "cc")]);
        let bcc = self.element(header, "textarea", &[("name", "bcc")]);
        let subject = self.element(dialog, "input", &[("name", "subjectbox")]);
        let body = self.element(
            dialog,
            "div",
            &[("aria-label", "Message Body"), ("contenteditable", "true")],
        );
        let mut nodes = ComposeNodes {
            dialog,
            to,
            cc,
            bcc,
            subject,
            body,
            send: None,
        };
        if send {
            self.finish_compose(&mut nodes);
        }
        nodes
    }

    /// Adds the toolbar with the Send button, turning a skeleton dialog into
    /// a live one.
    pub fn finish_compose(&self, nodes: &mut ComposeNodes) {
        if nodes.send.is_some() {
            return;
        }
        let toolbar = self.element(nodes.dialog, "div", &[("class", "toolbar")]);
        nodes.send = Some(self.element(
            toolbar,
            "div",
            &[("role", "button"), ("data-tooltip", "Send (Ctrl-Enter)")],
        ));
    }

    /// Builds a compose dialog and attaches it to the document.
    pub fn add_compose_dialog(&self, send: bool) -> ComposeNodes {
        let nodes = self.build_compose_dialog(send);
        self.append(ROOT, nodes.dialog);
        nodes
    }
}

fn collect_matches(t: &Tree, from: NodeId, selector: &Selector, out: &mut Vec<NodeId>) {
    for &child in &t.nodes[from].children {
        let node = &t.nodes[child];
        let attr = node.attrs.get(selector.attr).map(String::as_str);
        if selector.matches(&node.tag, attr) {
            out.push(child);
        }
        collect_matches(t, child, selector, out);
    }
}

impl Page for MemoryPage {
    type Element = NodeId;

    fn query_all(&self, scope: Option<&NodeId>, selector: &Selector) -> Vec<NodeId> {
        let mut t = self.tree();
        if scope.is_none() && *selector == Selector::dialog() {
            t.scans += 1;
        }
        let mut out = Vec::new();
        collect_matches(&t, scope.copied().unwrap_or(ROOT), selector, &mut out);
        out
    }

    fn focus(&self, el: &NodeId) {
        self.tree().focused = Some(*el);
    }

    fn blur(&self, el: &NodeId) {
        let mut t = self.tree();
        if t.focused == Some(*el) {
            t.focused = None;
        }
    }

    fn value(&self, el: &NodeId) -> String {
        self.value_of(*el)
    }

    fn set_value(&self, el: &NodeId, value: &str) {
        self.tree().nodes[*el].value = value.to_string();
    }

    fn set_text(&self, el: &NodeId, text: &str) {
        self.tree().nodes[*el].text = text.to_string();
    }
}

impl ChangeNotifier<NodeId> for MemoryPage {
    fn notify(&self, el: &NodeId, event: FieldEvent) {
        let mut t = self.tree();
        let node = &t.nodes[*el];
        let snapshot = if node.attrs.contains_key("contenteditable") {
            node.text.clone()
        } else {
            node.value.clone()
        };
        log::trace!("{} on node {el}", event.name());
        t.events.push(DispatchedEvent {
            node: *el,
            event,
            snapshot,
        });
    }
}
