//! The surface the locator and injector need from a host page.
//!
//! Implementations range from the in-memory [`MemoryPage`](crate::inject::dom::MemoryPage)
//! to a real DOM binding. Everything is `&self`: pages own their own
//! interior mutability, since the host may keep rendering between calls.

use std::fmt;

use crate::domain::RecipientKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttrMatch {
    Equals,
    Prefix,
}

/// A `tag[attr="value"]` / `tag[attr^="value"]` selector, the only shapes the
/// compose protocol uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    pub tag: &'static str,
    pub attr: &'static str,
    pub op: AttrMatch,
    pub value: &'static str,
}

impl Selector {
    pub const fn new(tag: &'static str, attr: &'static str, op: AttrMatch, value: &'static str) -> Self {
        Self {
            tag,
            attr,
            op,
            value,
        }
    }

    /// Every element Gmail renders as a dialog, compose windows included.
    pub const fn dialog() -> Self {
        Self::new("div", "role", AttrMatch::Equals, "dialog")
    }

    /// The Send button's tooltip. Locale dependent: only matches English Gmail.
    pub const fn send_tooltip() -> Self {
        Self::new("div", "data-tooltip", AttrMatch::Prefix, "Send")
    }

    pub const fn subject_box() -> Self {
        Self::new("input", "name", AttrMatch::Equals, "subjectbox")
    }

    pub const fn message_body() -> Self {
        Self::new("div", "aria-label", AttrMatch::Equals, "Message Body")
    }

    pub const fn recipient(kind: RecipientKind) -> Self {
        Self::new("textarea", "name", AttrMatch::Equals, kind.field_name())
    }

    pub fn matches(&self, tag: &str, attr_value: Option<&str>) -> bool {
        if !tag.eq_ignore_ascii_case(self.tag) {
            return false;
        }
        match (attr_value, self.op) {
            (Some(v), AttrMatch::Equals) => v == self.value,
            (Some(v), AttrMatch::Prefix) => v.starts_with(self.value),
            (None, _) => false,
        }
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.op {
            AttrMatch::Equals => "=",
            AttrMatch::Prefix => "^=",
        };
        write!(f, "{}[{}{}\"{}\"]", self.tag, self.attr, op, self.value)
    }
}

/// Synthetic notification the host page's own bindings listen for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldEvent {
    Input,
    Change,
}

impl FieldEvent {
    pub fn name(self) -> &'static str {
        match self {
            FieldEvent::Input => "input",
            FieldEvent::Change => "change",
        }
    }
}

pub trait Page {
    type Element: Clone;

    /// Matches in document order. `scope = None` searches the whole
    /// document, otherwise only descendants of `scope`.
    fn query_all(&self, scope: Option<&Self::Element>, selector: &Selector) -> Vec<Self::Element>;

    fn query(&self, scope: &Self::Element, selector: &Selector) -> Option<Self::Element> {
        self.query_all(Some(scope), selector).into_iter().next()
    }

    fn focus(&self, el: &Self::Element);
    fn blur(&self, el: &Self::Element);

    /// Form value of an input or textarea.
    fn value(&self, el: &Self::Element) -> String;
    fn set_value(&self, el: &Self::Element, value: &str);

    /// Rendered text of a content-editable element.
    fn set_text(&self, el: &Self::Element, text: &str);
}

/// Tells observers of a field that it changed, as if the user had typed.
pub trait ChangeNotifier<E> {
    fn notify(&self, el: &E, event: FieldEvent);
}
