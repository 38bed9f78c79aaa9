// Browser session handle
//
// Session owns the one live WebDriver connection of a test run. It is
// created at setup, passed by reference into the page facades, and
// consumed by close() at teardown. Element waits are built on the
// condition poller in crate::sync rather than on driver-side implicit
// waits, so every timeout in the suite goes through the same code path.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thirtyfour::error::WebDriverError;
use thirtyfour::{
    By, ChromiumLikeCapabilities, DesiredCapabilities, TimeoutConfiguration, WebDriver, WebElement,
};
use tracing::debug;

use crate::config::BrowserConfig;
use crate::error::{Error, Result};
use crate::sync::{PollOptions, wait_for};

/// Budget for execute_async scripts (the Angular no-outstanding-requests
/// wait).
const SCRIPT_TIMEOUT: Duration = Duration::from_secs(10);

/// Collects uncaught page errors into a window-scoped buffer. Installed
/// after every navigation; re-running it on an already hooked page is a
/// no-op. The W3C protocol has no log-retrieval endpoint, so this is how
/// the suite observes "the browser log". Errors thrown before the hook
/// lands, while the document is still loading, go unrecorded; scripts
/// cannot be injected ahead of navigation over plain WebDriver.
const ERROR_HOOK_JS: &str = r#"
if (!window.__uncaughtErrors) {
    window.__uncaughtErrors = [];
    window.addEventListener('error', function (event) {
        window.__uncaughtErrors.push({
            message: String(event.message || event),
            source: event.filename || '',
            line: event.lineno || 0
        });
    });
}
"#;

const READ_LOG_JS: &str = "return window.__uncaughtErrors || [];";

/// One uncaught script error recorded by the page hook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserLogEntry {
    pub message: String,
    #[serde(default)]
    pub source: String,
    #[serde(default)]
    pub line: u64,
}

#[derive(Clone, Copy)]
enum ElementState {
    Displayed,
    Clickable,
}

/// The live connection to one browser instance under automated control.
pub struct Session {
    driver: WebDriver,
}

impl Session {
    /// Opens a browser session: a locally running chromedriver or a
    /// remote Selenium hub, per the configuration.
    pub async fn connect(browser: &BrowserConfig) -> Result<Self> {
        let driver = match browser {
            BrowserConfig::LocalChrome {
                webdriver_url,
                binary,
                headless,
            } => {
                let mut caps = DesiredCapabilities::chrome();
                if let Some(binary) = binary {
                    caps.set_binary(&binary.to_string_lossy())?;
                }
                if *headless {
                    caps.set_headless()?;
                }
                debug!(%webdriver_url, "connecting to local chromedriver");
                WebDriver::new(webdriver_url, caps).await?
            }
            BrowserConfig::RemoteHub { hub_url } => {
                debug!(%hub_url, "connecting to remote Selenium hub");
                WebDriver::new(hub_url, DesiredCapabilities::chrome()).await?
            }
        };

        driver
            .update_timeouts(TimeoutConfiguration::new(Some(SCRIPT_TIMEOUT), None, None))
            .await?;

        Ok(Self { driver })
    }

    /// Navigates and installs the uncaught-error hook on the new page.
    pub async fn goto(&self, url: &str) -> Result<()> {
        debug!(%url, "navigate");
        self.driver.goto(url).await?;
        self.driver.execute(ERROR_HOOK_JS, Vec::new()).await?;
        Ok(())
    }

    /// Finds a single element, failing with `ElementNotFound` when the
    /// selector matches nothing.
    pub async fn find(&self, by: By) -> Result<WebElement> {
        let selector = format!("{by:?}");
        self.driver.find(by).await.map_err(|err| match err {
            WebDriverError::NoSuchElement(_) => Error::ElementNotFound { selector },
            other => other.into(),
        })
    }

    /// Finds all matching elements; an empty match is an empty vec.
    pub async fn find_all(&self, by: By) -> Result<Vec<WebElement>> {
        Ok(self.driver.find_all(by).await?)
    }

    /// Waits until the selector matches at least one element.
    pub async fn wait_element_present(&self, by: By, timeout: Duration) -> Result<WebElement> {
        let by_ref = &by;
        wait_for(
            &format!("element {by:?} to be present"),
            PollOptions::timeout(timeout),
            || async move {
                match self.driver.find(by_ref.clone()).await {
                    Ok(_) => Ok(true),
                    Err(WebDriverError::NoSuchElement(_))
                    | Err(WebDriverError::StaleElementReference(_)) => Ok(false),
                    Err(err) => Err(err.into()),
                }
            },
        )
        .await?;
        self.find(by).await
    }

    /// Waits until the selector matches a displayed element.
    pub async fn wait_element_visible(&self, by: By, timeout: Duration) -> Result<WebElement> {
        let by_ref = &by;
        wait_for(
            &format!("element {by:?} to become visible"),
            PollOptions::timeout(timeout),
            || async move { self.element_in_state(by_ref, ElementState::Displayed).await },
        )
        .await?;
        self.find(by).await
    }

    /// Waits until the selector matches a clickable element.
    pub async fn wait_element_clickable(&self, by: By, timeout: Duration) -> Result<WebElement> {
        let by_ref = &by;
        wait_for(
            &format!("element {by:?} to become clickable"),
            PollOptions::timeout(timeout),
            || async move { self.element_in_state(by_ref, ElementState::Clickable).await },
        )
        .await?;
        self.find(by).await
    }

    /// Waits until the matched element's text contains `text`.
    pub async fn wait_text_present(&self, by: By, text: &str, timeout: Duration) -> Result<()> {
        let by_ref = &by;
        wait_for(
            &format!("element {by:?} to contain text {text:?}"),
            PollOptions::timeout(timeout),
            || async move {
                match self.driver.find(by_ref.clone()).await {
                    Ok(elem) => match elem.text().await {
                        Ok(actual) => Ok(actual.contains(text)),
                        Err(WebDriverError::StaleElementReference(_)) => Ok(false),
                        Err(err) => Err(err.into()),
                    },
                    Err(WebDriverError::NoSuchElement(_))
                    | Err(WebDriverError::StaleElementReference(_)) => Ok(false),
                    Err(err) => Err(err.into()),
                }
            },
        )
        .await
    }

    // A state query racing a re-render can go stale or lose the
    // element entirely; both report not-ready so the poller tries again.
    async fn element_in_state(&self, by: &By, state: ElementState) -> Result<bool> {
        match self.driver.find(by.clone()).await {
            Ok(elem) => {
                let result = match state {
                    ElementState::Displayed => elem.is_displayed().await,
                    ElementState::Clickable => elem.is_clickable().await,
                };
                match result {
                    Ok(value) => Ok(value),
                    Err(WebDriverError::StaleElementReference(_)) => Ok(false),
                    Err(err) => Err(err.into()),
                }
            }
            Err(WebDriverError::NoSuchElement(_))
            | Err(WebDriverError::StaleElementReference(_)) => Ok(false),
            Err(err) => Err(err.into()),
        }
    }

    /// Runs a script synchronously and returns its value.
    pub async fn execute(&self, script: &str) -> Result<serde_json::Value> {
        let ret = self.driver.execute(script, Vec::new()).await?;
        Ok(ret.json().clone())
    }

    /// Runs a script that evaluates to a boolean.
    pub async fn execute_bool(&self, script: &str) -> Result<bool> {
        let ret = self.driver.execute(script, Vec::new()).await?;
        Ok(ret.convert()?)
    }

    /// Runs an async script; resolves when the page-side callback fires
    /// or the script timeout elapses.
    pub async fn execute_async(&self, script: &str) -> Result<serde_json::Value> {
        let ret = self.driver.execute_async(script, Vec::new()).await?;
        Ok(ret.json().clone())
    }

    /// Uncaught script errors recorded on the current page.
    pub async fn browser_log(&self) -> Result<Vec<BrowserLogEntry>> {
        let value = self.execute(READ_LOG_JS).await?;
        Ok(serde_json::from_value(value)?)
    }

    /// Fails when the page recorded any uncaught script error.
    pub async fn require_no_script_errors(&self) -> Result<()> {
        let log = self.browser_log().await?;
        if let Some(entry) = log.first() {
            return Err(Error::ScriptError(entry.message.clone()));
        }
        Ok(())
    }

    /// Saves a PNG screenshot as `{test}__{tag}.png` under `dir`.
    pub async fn save_screenshot(&self, dir: &Path, test: &str, tag: &str) -> Result<PathBuf> {
        let png = self.driver.screenshot_as_png().await?;
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{test}__{tag}.png"));
        std::fs::write(&path, png).map_err(|source| Error::Screenshot {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), "screenshot saved");
        Ok(path)
    }

    /// Quits the browser, releasing the session.
    pub async fn close(self) -> Result<()> {
        self.driver.quit().await?;
        Ok(())
    }
}
