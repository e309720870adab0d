//! Stateless interaction helpers over a borrowed [`fantoccini::Client`].
//!
//! These are the functions a step-definition layer calls directly. Each
//! one borrows the driver and/or element handles from the caller and runs a
//! bounded wait from [`crate::wait`] before acting, so a flaky page can
//! never block a test run indefinitely.

use std::time::Duration;

use anyhow::{Context, Result};
use fantoccini::elements::Element;
use fantoccini::error::CmdError;
use fantoccini::{Client, Locator};
use tokio::time::sleep;
use tracing::{info, warn};
use understudy_common::UnderstudyError;

use crate::wait::{self, ClickOutcome, WaitOptions};

/// Delay between attempts after a stale element reference.
pub const STALE_RETRY_DELAY: Duration = Duration::from_secs(1);

/// Deadline exhaustion becomes the shared [`UnderstudyError::Timeout`];
/// every other driver error passes through untouched.
fn map_wait_err(err: CmdError) -> anyhow::Error {
    match err {
        CmdError::WaitTimeout => UnderstudyError::Timeout.into(),
        other => other.into(),
    }
}

/// Click `element` (assumed to open a new tab), then move the driver's
/// focus to every window handle other than the original one and log the
/// URL it lands on.
///
/// With exactly one new tab this leaves focus on it. With several, focus
/// ends up on the last handle iterated; with none, it stays where it was.
pub async fn switch_to_new_tab(client: &Client, element: &Element) -> Result<()> {
    let original = client.window().await?;
    element.click().await?;

    for handle in client.windows().await? {
        if handle != original {
            client.switch_to_window(handle).await?;
        }
    }

    let url = client.current_url().await?;
    info!(%url, "driver focus after tab switch");
    Ok(())
}

/// Wait up to 30 s for `element` to be clickable (displayed and enabled),
/// ignoring intercepted-click errors along the way, then click it.
pub async fn click(element: &Element) -> Result<()> {
    wait::poll_until(&WaitOptions::clickable(), wait::is_click_intercepted, || async {
        let clickable = element.is_displayed().await? && element.is_enabled().await?;
        Ok(clickable.then_some(()))
    })
    .await
    .map_err(map_wait_err)
    .context("element never became clickable")?;

    element.click().await?;
    Ok(())
}

/// Wait up to 15 s for an alert, then accept it. The wait's timeout
/// propagates; an alert that vanishes between the wait and the accept is
/// logged and swallowed.
pub async fn accept_alert(client: &Client) -> Result<()> {
    wait_for_alert(client).await?;

    if let Err(e) = client.accept_alert().await {
        if wait::is_missing_alert(&e) {
            warn!("alert disappeared before it could be accepted");
        } else {
            return Err(e.into());
        }
    }
    Ok(())
}

/// Wait up to 15 s for an alert, then dismiss it. Failure handling matches
/// [`accept_alert`].
pub async fn dismiss_alert(client: &Client) -> Result<()> {
    wait_for_alert(client).await?;

    if let Err(e) = client.dismiss_alert().await {
        if wait::is_missing_alert(&e) {
            warn!("alert disappeared before it could be dismissed");
        } else {
            return Err(e.into());
        }
    }
    Ok(())
}

async fn wait_for_alert(client: &Client) -> Result<()> {
    wait::poll_until(&WaitOptions::alert(), wait::is_missing_alert, || async {
        client.get_alert_text().await.map(|_| Some(()))
    })
    .await
    .map_err(map_wait_err)
    .context("no alert appeared")?;
    Ok(())
}

/// Wait up to 15 s for a visible element at `locator`. Absence is a plain
/// `false`, never an error.
pub async fn is_element_present(client: &Client, locator: Locator<'_>) -> Result<bool> {
    let ignore = |e: &CmdError| wait::is_missing_element(e) || wait::is_stale(e);
    let result = wait::poll_until(&WaitOptions::presence(), ignore, || async move {
        let element = client.find(locator).await?;
        Ok(element.is_displayed().await?.then_some(()))
    })
    .await;

    match result {
        Ok(()) => Ok(true),
        Err(CmdError::WaitTimeout) => Ok(false),
        Err(e) if wait::is_missing_element(&e) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

/// Look up `locator` and click it, retrying up to `retries` times with a
/// one-second pause whenever the handle goes stale between lookup and
/// click. A locator that matches nothing aborts immediately; see
/// [`ClickOutcome`] for the terminal states.
pub async fn click_with_retries(
    client: &Client,
    locator: Locator<'_>,
    retries: u32,
) -> Result<ClickOutcome> {
    let outcome = wait::retry_on_stale(retries, STALE_RETRY_DELAY, || async move {
        client.find(locator).await?.click().await
    })
    .await?;

    if outcome == ClickOutcome::RetriesExhausted {
        warn!(retries, "element stayed stale through every attempt");
    }
    Ok(outcome)
}

/// Park the current task for the given number of seconds.
pub async fn wait_for_seconds(seconds: u64) {
    sleep(Duration::from_secs(seconds)).await;
}

/// Wait up to `timeout` for `expected` to be contained in the element's
/// text, then verify the full text matches exactly. A timeout propagates;
/// a partial match that never becomes an exact one surfaces as
/// [`UnderstudyError::TextMismatch`].
pub async fn wait_for_text_to_appear_in_element(
    element: &Element,
    timeout: Duration,
    expected: &str,
) -> Result<()> {
    wait::poll_until(&WaitOptions::new(timeout), wait::is_stale, || async {
        let text = element.text().await?;
        Ok(text.contains(expected).then_some(()))
    })
    .await
    .map_err(map_wait_err)
    .with_context(|| format!("text {expected:?} did not appear in element"))?;

    let actual = element.text().await?;
    if actual != expected {
        return Err(UnderstudyError::TextMismatch {
            expected: expected.to_string(),
            actual,
        }
        .into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use fantoccini::error::{ErrorStatus, WebDriver};

    #[test]
    fn expired_waits_surface_as_the_shared_timeout() {
        let err = map_wait_err(CmdError::WaitTimeout);
        assert!(matches!(
            err.downcast_ref::<UnderstudyError>(),
            Some(UnderstudyError::Timeout)
        ));
    }

    #[test]
    fn other_driver_errors_pass_through_unwrapped() {
        let err = map_wait_err(CmdError::Standard(WebDriver::new(
            ErrorStatus::NoSuchElement,
            "no such element",
        )));
        assert!(err.downcast_ref::<UnderstudyError>().is_none());
        assert!(err.downcast_ref::<CmdError>().is_some());
    }
}
