//! Host-page side of apply: wait for Gmail's compose dialog, then write the
//! template and recipients into it.

pub mod dom;
pub mod injector;
pub mod locator;
pub mod page;
pub mod sleeper;

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::domain::{Recipients, Template};

pub use dom::{ComposeNodes, MemoryPage, NodeId};
pub use injector::{ComposeField, InjectionReport, Injector};
pub use locator::{Locator, LocatorState};
pub use page::{ChangeNotifier, FieldEvent, Page, Selector};
pub use sleeper::{Sleeper, ThreadSleeper};

pub type InjectResult<T> = std::result::Result<T, InjectError>;

pub const COMPOSE_NOT_FOUND_ALERT: &str =
    "Could not find an active Gmail compose window. Please ensure it is fully open and try again.";

#[derive(Debug, Error)]
pub enum InjectError {
    #[error("no compose window after {attempts} attempts ({waited:?})")]
    LocatorTimeout { attempts: u32, waited: Duration },
}

/// Subject and body of the template being applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateContent {
    pub subject: String,
    pub body: String,
}

impl From<&Template> for TemplateContent {
    fn from(t: &Template) -> Self {
        Self {
            subject: t.subject.clone(),
            body: t.body.clone(),
        }
    }
}

/// Everything the host page receives for one apply. Plain data only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InjectionRequest {
    #[serde(default)]
    pub template: Option<TemplateContent>,
    #[serde(default)]
    pub recipients: Recipients,
}

impl InjectionRequest {
    pub fn is_empty(&self) -> bool {
        self.template.is_none() && self.recipients.is_empty()
    }
}

/// Locates the compose dialog and injects `request` into it. On timeout
/// nothing is written.
pub fn run_injection<P, S>(
    page: &P,
    sleeper: &mut S,
    locator: &Locator,
    request: &InjectionRequest,
) -> InjectResult<InjectionReport>
where
    P: Page + ChangeNotifier<P::Element>,
    S: Sleeper,
{
    log::info!("looking for compose window");
    let container = locator.locate(page, sleeper)?;

    log::info!("compose window found, injecting content");
    let report = Injector::default().inject(page, sleeper, &container, request);
    log::info!(
        "injection complete: {} written, {} skipped",
        report.written.len(),
        report.skipped.len()
    );
    Ok(report)
}
