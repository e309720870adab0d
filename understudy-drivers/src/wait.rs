//! Bounded poll-with-timeout primitives.
//!
//! Every wait in this crate goes through [`poll_until`]: a probe future is
//! re-run on a fixed interval until it yields a value, a non-ignorable error
//! occurs, or the deadline passes. Transient WebDriver errors (a stale
//! handle mid-poll, a click intercepted by an overlay) are classified here
//! so callers can name which ones keep the poll alive.

use std::future::Future;
use std::time::Duration;

use fantoccini::error::{CmdError, ErrorStatus};
use tokio::time::{sleep, Instant};
use tracing::{debug, warn};

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Timeout and polling cadence for a single bounded wait.
#[derive(Debug, Clone, Copy)]
pub struct WaitOptions {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl WaitOptions {
    pub const fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            poll_interval: DEFAULT_POLL_INTERVAL,
        }
    }

    /// Budget for an element to become clickable.
    pub const fn clickable() -> Self {
        Self::new(Duration::from_secs(30))
    }

    /// Budget for an alert to show up.
    pub const fn alert() -> Self {
        Self::new(Duration::from_secs(15))
    }

    /// Budget for an element to become visible.
    pub const fn presence() -> Self {
        Self::new(Duration::from_secs(15))
    }

    /// Override the polling interval.
    pub const fn every(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }
}

/// Re-run `probe` until it yields a value or the deadline passes.
///
/// `probe` returns `Ok(Some(_))` when the condition holds, `Ok(None)` to
/// keep polling, or an error. Errors matching `ignore` also keep the poll
/// alive; anything else propagates immediately. Deadline exhaustion yields
/// [`CmdError::WaitTimeout`].
pub async fn poll_until<T, F, Fut, I>(
    opts: &WaitOptions,
    ignore: I,
    mut probe: F,
) -> Result<T, CmdError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<Option<T>, CmdError>>,
    I: Fn(&CmdError) -> bool,
{
    let deadline = Instant::now() + opts.timeout;
    loop {
        match probe().await {
            Ok(Some(value)) => return Ok(value),
            Ok(None) => {}
            Err(e) if ignore(&e) => {
                debug!(error = %e, "ignoring transient error during wait");
            }
            Err(e) => return Err(e),
        }
        if Instant::now() >= deadline {
            return Err(CmdError::WaitTimeout);
        }
        sleep(opts.poll_interval).await;
    }
}

/// How a retried click ended. None of these is an error: exhausting the
/// retry budget and aborting on a bad locator are expected terminal states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickOutcome {
    /// The click landed.
    Clicked,
    /// The locator matched nothing; retrying cannot help.
    WrongLocator,
    /// Every attempt hit a stale handle.
    RetriesExhausted,
}

/// Run `attempt` up to `retries` times, sleeping `delay` after each stale
/// element reference. A missing element aborts immediately (a wrong locator
/// is not retryable); any other error propagates.
pub async fn retry_on_stale<F, Fut>(
    retries: u32,
    delay: Duration,
    mut attempt: F,
) -> Result<ClickOutcome, CmdError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<(), CmdError>>,
{
    let mut trials = 0;
    while trials < retries {
        match attempt().await {
            Ok(()) => return Ok(ClickOutcome::Clicked),
            Err(e) if is_stale(&e) => {
                trials += 1;
                debug!(trials, retries, "stale element reference, retrying");
                sleep(delay).await;
            }
            Err(e) if is_missing_element(&e) => {
                warn!(error = %e, "wrong locator, aborting retries");
                return Ok(ClickOutcome::WrongLocator);
            }
            Err(e) => return Err(e),
        }
    }
    Ok(ClickOutcome::RetriesExhausted)
}

/// The element handle refers to a DOM node that has been replaced.
pub fn is_stale(err: &CmdError) -> bool {
    err.is_stale_element_reference()
}

/// Another element would receive the click (overlay, animation).
pub fn is_click_intercepted(err: &CmdError) -> bool {
    // fantoccini's CmdError does not generate an is_* helper for
    // ElementClickIntercepted; this matches what it would expand to.
    matches!(err, CmdError::Standard(w) if w.error == ErrorStatus::ElementClickIntercepted)
}

/// No element matched the locator.
pub fn is_missing_element(err: &CmdError) -> bool {
    err.is_no_such_element()
}

/// No alert is currently open.
pub fn is_missing_alert(err: &CmdError) -> bool {
    err.is_no_such_alert()
}
