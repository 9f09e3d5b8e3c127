use std::time::Duration;

use crate::inject::page::{Page, Selector};
use crate::inject::sleeper::Sleeper;
use crate::inject::{InjectError, InjectResult};

/// Progress of one compose-window search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LocatorState<E> {
    /// `attempt` scans have run so far, none matched.
    Searching { attempt: u32 },
    Found(E),
    TimedOut,
}

#[cfg(test)]
impl<E> LocatorState<E> {
    fn is_terminal(&self) -> bool {
        !matches!(self, LocatorState::Searching { .. })
    }
}

/// Bounded polling for a live compose dialog.
///
/// A dialog counts as live once it contains the Send button's tooltip; the
/// skeleton Gmail paints first does not. Runs at most `attempts` scans with
/// `interval` between consecutive ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Locator {
    attempts: u32,
    interval: Duration,
}

impl Default for Locator {
    fn default() -> Self {
        Self::new(20, Duration::from_millis(100))
    }
}

impl Locator {
    pub fn new(attempts: u32, interval: Duration) -> Self {
        Self { attempts, interval }
    }

    /// One pass over every dialog in the document.
    pub fn scan<P: Page>(&self, page: &P) -> Option<P::Element> {
        let fingerprint = Selector::send_tooltip();
        page.query_all(None, &Selector::dialog())
            .into_iter()
            .find(|dialog| page.query(dialog, &fingerprint).is_some())
    }

    /// Advances the search by one attempt. Terminal states are returned as is.
    pub fn step<P: Page, S: Sleeper>(
        &self,
        state: LocatorState<P::Element>,
        page: &P,
        sleeper: &mut S,
    ) -> LocatorState<P::Element> {
        let LocatorState::Searching { attempt } = state else {
            return state;
        };
        if attempt >= self.attempts {
            return LocatorState::TimedOut;
        }

        if let Some(dialog) = self.scan(page) {
            log::debug!("compose dialog found on attempt {}", attempt + 1);
            return LocatorState::Found(dialog);
        }

        let attempt = attempt + 1;
        if attempt < self.attempts {
            sleeper.sleep(self.interval);
        }
        LocatorState::Searching { attempt }
    }

    /// Polls until a compose dialog shows up or the attempts run out.
    pub fn locate<P: Page, S: Sleeper>(&self, page: &P, sleeper: &mut S) -> InjectResult<P::Element> {
        let mut state = LocatorState::Searching { attempt: 0 };
        loop {
            state = self.step(state, page, sleeper);
            match state {
                LocatorState::Found(dialog) => return Ok(dialog),
                LocatorState::TimedOut => {
                    return Err(InjectError::LocatorTimeout {
                        attempts: self.attempts,
                        waited: self.interval * self.attempts.saturating_sub(1),
                    });
                }
                LocatorState::Searching { .. } => {}
            }
        }
    }
}
