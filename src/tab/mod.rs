//! The popup's view of the browser tab it injects into.

pub mod bridge;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::inject::InjectionRequest;

pub type TabResult<T> = std::result::Result<T, TabError>;

pub const WRONG_TAB_ALERT: &str = "Please navigate to your Gmail tab to apply a template.";

#[derive(Debug, Error)]
pub enum TabError {
    #[error("active tab {url} is not Gmail")]
    WrongTab { url: String },
    #[error("tab bridge: {0}")]
    Bridge(String),
    #[error("tab bridge i/o: {0}")]
    Io(#[from] std::io::Error),
    #[error("tab bridge payload: {0}")]
    Codec(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabInfo {
    pub id: i64,
    pub url: String,
}

/// Whatever owns the browser tab. `dispatch` hands the request over and
/// returns once it is accepted; the injection itself runs on the host side
/// and is not awaited.
pub trait TabHost {
    fn active_tab(&self) -> TabResult<TabInfo>;
    fn dispatch(&self, tab: &TabInfo, request: &InjectionRequest) -> TabResult<()>;
}

/// Checks that `url` lives under the Gmail origin, e.g. `https://mail.google.com/`.
pub fn is_gmail(url: &str, origin: &str) -> bool {
    let (Ok(url), Ok(origin)) = (Url::parse(url), Url::parse(origin)) else {
        return false;
    };
    url.scheme() == origin.scheme()
        && url.host_str() == origin.host_str()
        && url.port_or_known_default() == origin.port_or_known_default()
        && url.path().starts_with(origin.path())
}

pub fn ensure_gmail(tab: &TabInfo, origin: &str) -> TabResult<()> {
    if is_gmail(&tab.url, origin) {
        Ok(())
    } else {
        Err(TabError::WrongTab {
            url: tab.url.clone(),
        })
    }
}

/// Refuses non-Gmail tabs, then dispatches.
pub fn apply_to_active_tab(
    host: &dyn TabHost,
    origin: &str,
    request: &InjectionRequest,
) -> TabResult<TabInfo> {
    let tab = host.active_tab()?;
    ensure_gmail(&tab, origin)?;
    log::info!("dispatching injection to tab {} ({})", tab.id, tab.url);
    host.dispatch(&tab, request)?;
    Ok(tab)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    const ORIGIN: &str = "https://mail.google.com/";

    struct FakeHost {
        tab: TabInfo,
        sent: RefCell<Vec<InjectionRequest>>,
    }

    impl TabHost for FakeHost {
        fn active_tab(&self) -> TabResult<TabInfo> {
            Ok(self.tab.clone())
        }

        fn dispatch(&self, _tab: &TabInfo, request: &InjectionRequest) -> TabResult<()> {
            self.sent.borrow_mut().push(request.clone());
            Ok(())
        }
    }

    fn host(url: &str) -> FakeHost {
        FakeHost {
            tab: TabInfo {
                id: 1,
                url: url.to_string(),
            },
            sent: RefCell::new(Vec::new()),
        }
    }

    #[test]
    fn gmail_urls_are_recognised() {
        assert!(is_gmail("https://mail.google.com/mail/u/0/#inbox", ORIGIN));
        assert!(is_gmail("https://mail.google.com/", ORIGIN));
        assert!(!is_gmail("http://mail.google.com/mail/", ORIGIN));
        assert!(!is_gmail("https://mail.google.com.evil.io/", ORIGIN));
        assert!(!is_gmail("https://calendar.google.com/", ORIGIN));
        assert!(!is_gmail("chrome://newtab/", ORIGIN));
        assert!(!is_gmail("not a url", ORIGIN));
    }

    #[test]
    fn wrong_tab_is_refused_before_dispatch() {
        let h = host("https://example.com/");
        let err = apply_to_active_tab(&h, ORIGIN, &InjectionRequest::default())
            .expect_err("non-gmail tab must be refused");
        assert!(matches!(err, TabError::WrongTab { .. }));
        assert!(h.sent.borrow().is_empty());
    }

    #[test]
    fn gmail_tab_receives_the_request() {
        let h = host("https://mail.google.com/mail/u/0/#inbox");
        let tab = apply_to_active_tab(&h, ORIGIN, &InjectionRequest::default())
            .expect("gmail tab accepts");
        assert_eq!(tab.id, 1);
        assert_eq!(h.sent.borrow().len(), 1);
    }
}
