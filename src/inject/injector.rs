use std::fmt;
use std::time::Duration;

use crate::domain::RecipientKind;
use crate::inject::page::{ChangeNotifier, FieldEvent, Page, Selector};
use crate::inject::sleeper::Sleeper;
use crate::inject::InjectionRequest;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeField {
    Subject,
    Body,
    Recipients(RecipientKind),
}

impl fmt::Display for ComposeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ComposeField::Subject => f.write_str("subject"),
            ComposeField::Body => f.write_str("body"),
            ComposeField::Recipients(kind) => write!(f, "{kind} recipients"),
        }
    }
}

/// Which fields were written and which were missing from the dialog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InjectionReport {
    pub written: Vec<ComposeField>,
    pub skipped: Vec<ComposeField>,
}

/// Appends `addresses` to whatever an address field already holds.
pub fn append_addresses(existing: &str, addresses: &[String]) -> String {
    let joined = addresses.join(", ");
    if existing.trim().is_empty() {
        joined
    } else {
        format!("{existing}, {joined}")
    }
}

/// Writes a request into a located compose dialog. Every field is
/// best-effort: a missing one is skipped and the rest still get written.
#[derive(Debug, Clone, Copy)]
pub struct Injector {
    settle: Duration,
}

impl Default for Injector {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(50),
        }
    }
}

impl Injector {
    pub fn inject<P, S>(
        &self,
        page: &P,
        sleeper: &mut S,
        container: &P::Element,
        request: &InjectionRequest,
    ) -> InjectionReport
    where
        P: Page + ChangeNotifier<P::Element>,
        S: Sleeper,
    {
        let mut report = InjectionReport::default();

        if let Some(template) = &request.template {
            match page.query(container, &Selector::subject_box()) {
                Some(subject) => {
                    page.focus(&subject);
                    page.set_value(&subject, &template.subject);
                    page.notify(&subject, FieldEvent::Input);
                    page.notify(&subject, FieldEvent::Change);
                    page.blur(&subject);
                    sleeper.sleep(self.settle);
                    report.written.push(ComposeField::Subject);
                }
                None => report.skipped.push(ComposeField::Subject),
            }

            match page.query(container, &Selector::message_body()) {
                Some(body) => {
                    page.focus(&body);
                    page.set_text(&body, &template.body);
                    page.notify(&body, FieldEvent::Input);
                    page.blur(&body);
                    report.written.push(ComposeField::Body);
                }
                None => report.skipped.push(ComposeField::Body),
            }
        }

        for kind in RecipientKind::ALL {
            let addresses = request.recipients.get(kind);
            if addresses.is_empty() {
                continue;
            }
            let field = ComposeField::Recipients(kind);
            let Some(input) = page.query(container, &Selector::recipient(kind)) else {
                report.skipped.push(field);
                continue;
            };
            let merged = append_addresses(&page.value(&input), addresses);
            page.set_value(&input, &merged);
            page.notify(&input, FieldEvent::Change);
            report.written.push(field);
        }

        for field in &report.skipped {
            log::debug!("compose dialog has no {field} field; skipped");
        }
        report
    }
}
