//! End-to-end checks against a live browser.
//!
//! These tests need a running chromedriver (default `http://localhost:9515`,
//! override via `UNDERSTUDY_WEBDRIVER_URL`) and are ignored by default:
//!
//! ```text
//! chromedriver --port=9515 &
//! cargo test -p understudy-drivers -- --ignored
//! ```

use std::time::Duration;

use fantoccini::Locator;
use tempfile::TempDir;
use understudy_common::observability::{LogConfig, LogFormat};
use understudy_common::{UnderstudyConfig, UnderstudyError};
use understudy_drivers::wait::ClickOutcome;
use understudy_drivers::{interact, session};

const MAIN_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Main</title></head>
<body>
  <a id="other" href="other.html" target="_blank">open tab</a>
  <button id="later" disabled>wait for me</button>
  <div id="status">Pending</div>
  <script>
    setTimeout(() => { document.getElementById('later').disabled = false; }, 300);
    setTimeout(() => { document.getElementById('status').textContent = 'Done'; }, 300);
  </script>
</body>
</html>"#;

const OTHER_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head><title>Other</title></head>
<body><p id="mark">other</p></body>
</html>"#;

fn write_page(dir: &TempDir, name: &str, html: &str) -> String {
    let path = dir.path().join(name);
    std::fs::write(&path, html).expect("write page");
    format!("file://{}", path.display())
}

fn init_test_tracing() {
    let _ = understudy_common::observability::init_logging(LogConfig {
        app_name: "understudy-tests",
        emit_stderr: true,
        format: LogFormat::Text,
        ..LogConfig::default()
    });
}

#[tokio::test]
#[ignore = "requires a running chromedriver"]
async fn helpers_against_live_browser() -> anyhow::Result<()> {
    init_test_tracing();

    let dir = TempDir::new()?;
    write_page(&dir, "other.html", OTHER_PAGE);
    let main_url = write_page(&dir, "main.html", MAIN_PAGE);

    let client = session::connect(&UnderstudyConfig::from_env()).await?;
    client.goto(&main_url).await?;

    // Presence: one locator that matches, one that never will.
    assert!(interact::is_element_present(&client, Locator::Id("status")).await?);
    assert!(!interact::is_element_present(&client, Locator::Css("#nope")).await?);

    // The button starts disabled and becomes clickable after ~300 ms.
    let button = client.find(Locator::Id("later")).await?;
    interact::click(&button).await?;

    // The status text flips to "Done" on the same timer.
    let status = client.find(Locator::Id("status")).await?;
    interact::wait_for_text_to_appear_in_element(&status, Duration::from_secs(5), "Done").await?;

    // A substring that appears but never equals the full text must surface
    // as a text mismatch, not a timeout.
    let err = interact::wait_for_text_to_appear_in_element(&status, Duration::from_secs(2), "Don")
        .await
        .expect_err("substring match must still fail the equality check");
    assert!(matches!(
        err.downcast_ref::<UnderstudyError>(),
        Some(UnderstudyError::TextMismatch { .. })
    ));

    // Retry clicking: a good locator lands, a wrong one aborts immediately.
    assert_eq!(
        interact::click_with_retries(&client, Locator::Id("status"), 3).await?,
        ClickOutcome::Clicked
    );
    assert_eq!(
        interact::click_with_retries(&client, Locator::Id("nope"), 3).await?,
        ClickOutcome::WrongLocator
    );

    // Alert raised shortly after we start waiting for it.
    client
        .execute("setTimeout(() => window.alert('hi'), 200);", vec![])
        .await?;
    interact::accept_alert(&client).await?;

    // Clicking the link opens one extra window; focus must land on it.
    let original = client.window().await?;
    let link = client.find(Locator::Id("other")).await?;
    interact::switch_to_new_tab(&client, &link).await?;
    assert_ne!(client.window().await?, original);
    assert!(client.current_url().await?.as_str().ends_with("other.html"));

    session::close(client).await?;
    Ok(())
}
