use serde::{Deserialize, Serialize};
use std::fmt;

/// Address field of the compose form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientKind {
    To,
    Cc,
    Bcc,
}

impl RecipientKind {
    pub const ALL: [RecipientKind; 3] = [RecipientKind::To, RecipientKind::Cc, RecipientKind::Bcc];

    /// Value of the `name` attribute on Gmail's address textarea.
    pub const fn field_name(self) -> &'static str {
        match self {
            RecipientKind::To => "to",
            RecipientKind::Cc => "cc",
            RecipientKind::Bcc => "bcc",
        }
    }

    pub fn cycle(self) -> Self {
        match self {
            RecipientKind::To => RecipientKind::Cc,
            RecipientKind::Cc => RecipientKind::Bcc,
            RecipientKind::Bcc => RecipientKind::To,
        }
    }
}

impl fmt::Display for RecipientKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RecipientKind::To => "To",
            RecipientKind::Cc => "Cc",
            RecipientKind::Bcc => "Bcc",
        };
        f.write_str(s)
    }
}

/// Selected addresses per field. Each list keeps insertion order and holds an
/// address at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipients {
    #[serde(default)]
    pub to: Vec<String>,
    #[serde(default)]
    pub cc: Vec<String>,
    #[serde(default)]
    pub bcc: Vec<String>,
}

impl Recipients {
    pub fn get(&self, kind: RecipientKind) -> &[String] {
        match kind {
            RecipientKind::To => &self.to,
            RecipientKind::Cc => &self.cc,
            RecipientKind::Bcc => &self.bcc,
        }
    }

    fn get_mut(&mut self, kind: RecipientKind) -> &mut Vec<String> {
        match kind {
            RecipientKind::To => &mut self.to,
            RecipientKind::Cc => &mut self.cc,
            RecipientKind::Bcc => &mut self.bcc,
        }
    }

    pub fn contains(&self, kind: RecipientKind, email: &str) -> bool {
        self.get(kind).iter().any(|e| e == email)
    }

    /// Adds the address if absent, removes it otherwise. Returns whether it is
    /// selected afterwards.
    pub fn toggle(&mut self, kind: RecipientKind, email: &str) -> bool {
        let list = self.get_mut(kind);
        if let Some(pos) = list.iter().position(|e| e == email) {
            list.remove(pos);
            false
        } else {
            list.push(email.to_string());
            true
        }
    }

    /// Drops addresses that are no longer backed by a known contact.
    pub fn retain_known<'a>(&mut self, known: impl Iterator<Item = &'a str> + Clone) {
        for kind in RecipientKind::ALL {
            self.get_mut(kind)
                .retain(|e| known.clone().any(|k| k == e.as_str()));
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to.is_empty() && self.cc.is_empty() && self.bcc.is_empty()
    }
}
