use std::collections::BTreeMap;

use crate::domain::{Contact, RecordId, Resource, Template};

/// How rows of a list can be picked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectMode {
    /// Radio buttons, at most one row checked.
    Single,
    /// Checkboxes.
    Multi,
    /// No selection control; activating a row acts on it directly.
    ActionOnly,
}

/// A record the renderer can turn into a row.
pub trait Listable {
    const RESOURCE: Resource;

    fn id(&self) -> &RecordId;
    fn label(&self) -> String;
    /// Attributes attached to the row for later retrieval.
    fn payload(&self) -> BTreeMap<&'static str, String>;
}

impl Listable for Contact {
    const RESOURCE: Resource = Resource::Contact;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> String {
        format!("{} <{}>", self.name, self.email)
    }

    fn payload(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([("name", self.name.clone()), ("email", self.email.clone())])
    }
}

impl Listable for Template {
    const RESOURCE: Resource = Resource::Template;

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn label(&self) -> String {
        self.title.clone()
    }

    fn payload(&self) -> BTreeMap<&'static str, String> {
        BTreeMap::from([
            ("subject", self.subject.clone()),
            ("body", self.body.clone()),
        ])
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectControl {
    pub mode: SelectMode,
    pub checked: bool,
    pub data: BTreeMap<&'static str, String>,
}

impl SelectControl {
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteControl {
    pub id: RecordId,
    pub resource: Resource,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub label: String,
    /// The row's payload. Selectable rows also carry it on their control.
    pub data: BTreeMap<&'static str, String>,
    pub select: Option<SelectControl>,
    pub delete: DeleteControl,
}

impl Row {
    pub fn attr(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListRow {
    Item(Row),
    Placeholder(String),
}

/// A freshly rendered list. Owns its rows outright, so re-rendering replaces
/// everything.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedList {
    pub rows: Vec<ListRow>,
}

impl RenderedList {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn is_placeholder(&self) -> bool {
        matches!(self.rows.as_slice(), [ListRow::Placeholder(_)])
    }

    pub fn item(&self, index: usize) -> Option<&Row> {
        match self.rows.get(index)? {
            ListRow::Item(row) => Some(row),
            ListRow::Placeholder(_) => None,
        }
    }

    pub fn items(&self) -> impl Iterator<Item = &Row> {
        self.rows.iter().filter_map(|r| match r {
            ListRow::Item(row) => Some(row),
            ListRow::Placeholder(_) => None,
        })
    }

    pub fn selectable_count(&self) -> usize {
        self.items().filter(|r| r.select.is_some()).count()
    }
}

pub fn render_list<T: Listable>(
    records: &[T],
    mode: SelectMode,
    is_checked: impl Fn(&T) -> bool,
    placeholder: &str,
) -> RenderedList {
    if records.is_empty() {
        return RenderedList {
            rows: vec![ListRow::Placeholder(placeholder.to_string())],
        };
    }

    let rows = records
        .iter()
        .map(|rec| {
            let data = rec.payload();
            let select = match mode {
                SelectMode::ActionOnly => None,
                SelectMode::Single | SelectMode::Multi => Some(SelectControl {
                    mode,
                    checked: is_checked(rec),
                    data: data.clone(),
                }),
            };
            ListRow::Item(Row {
                label: rec.label(),
                data,
                select,
                delete: DeleteControl {
                    id: rec.id().clone(),
                    resource: T::RESOURCE,
                },
            })
        })
        .collect();

    RenderedList { rows }
}
