use std::thread;
use std::time::Duration;

/// Suspends the injecting side between polls. The page must keep running
/// while this blocks, so implementations never hold page state.
pub trait Sleeper {
    fn sleep(&mut self, d: Duration);
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&mut self, d: Duration) {
        thread::sleep(d);
    }
}

/// Runs a callback instead of sleeping. Tests use it as a fake clock that
/// can also mutate the page between polls.
#[cfg(test)]
pub(crate) struct FnSleeper<F: FnMut(Duration)>(pub F);

#[cfg(test)]
impl<F: FnMut(Duration)> Sleeper for FnSleeper<F> {
    fn sleep(&mut self, d: Duration) {
        (self.0)(d)
    }
}
