// Suite configuration
//
// One Config value is built at the entry point (env variables for the
// test binaries, CLI flags for the runner) and passed down explicitly.
// There is no process-wide mutable state.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Which deployment of the console is under test.
///
/// The two variants serve the same application with different URL
/// schemes and DOM details; the per-variant differences live in
/// [`crate::pages::Selectors`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConsoleVariant {
    /// Console embedded as a hawtio plugin
    Hawtio,
    /// Stand-alone console build
    Standalone,
}

impl fmt::Display for ConsoleVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsoleVariant::Hawtio => f.write_str("hawtio"),
            ConsoleVariant::Standalone => f.write_str("stand-alone"),
        }
    }
}

impl FromStr for ConsoleVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "hawtio" => Ok(ConsoleVariant::Hawtio),
            "stand-alone" | "standalone" => Ok(ConsoleVariant::Standalone),
            other => Err(Error::Config(format!(
                "unexpected console variant {other:?}, expected \"hawtio\" or \"stand-alone\""
            ))),
        }
    }
}

/// Where the browser session comes from.
#[derive(Debug, Clone)]
pub enum BrowserConfig {
    /// Chrome driven through a locally running chromedriver
    LocalChrome {
        /// chromedriver endpoint
        webdriver_url: String,
        /// Chrome binary override, when not on PATH
        binary: Option<PathBuf>,
        headless: bool,
    },
    /// Browser obtained from a remote Selenium hub
    RemoteHub { hub_url: String },
}

impl Default for BrowserConfig {
    fn default() -> Self {
        BrowserConfig::LocalChrome {
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            binary: None,
            headless: true,
        }
    }
}

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8080/hawtio";
pub const DEFAULT_CONSOLE_IP: &str = "127.0.0.1";
/// AMQP listener port typed into the connect form
pub const DEFAULT_CONSOLE_PORT: u16 = 5673;
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:9515";

/// Everything a scenario needs to know about its environment.
#[derive(Debug, Clone)]
pub struct Config {
    /// Root URL the console is served from
    pub base_url: String,
    /// Router IP typed into the connect form
    pub console_ip: String,
    /// Router port typed into the connect form
    pub console_port: u16,
    pub variant: ConsoleVariant,
    pub browser: BrowserConfig,
    /// Directory failure screenshots are written into
    pub screenshot_dir: PathBuf,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            console_ip: DEFAULT_CONSOLE_IP.to_string(),
            console_port: DEFAULT_CONSOLE_PORT,
            variant: ConsoleVariant::Hawtio,
            browser: BrowserConfig::default(),
            screenshot_dir: PathBuf::from("."),
        }
    }
}

impl Config {
    /// Builds a Config from `CONSOLE_E2E_*` environment variables,
    /// falling back to the defaults above.
    ///
    /// Recognized: `BASE_URL`, `IP`, `PORT`, `VARIANT` (`hawtio` /
    /// `stand-alone`), `HUB_URL` (switches to a remote Selenium hub),
    /// `WEBDRIVER_URL`, `CHROME_BINARY`, `HEADLESS` (`0`/`false` to
    /// disable), `SCREENSHOT_DIR`.
    pub fn from_env() -> Result<Self> {
        let mut config = Config::default();

        if let Ok(url) = std::env::var("CONSOLE_E2E_BASE_URL") {
            config.base_url = url;
        }
        if let Ok(ip) = std::env::var("CONSOLE_E2E_IP") {
            config.console_ip = ip;
        }
        if let Ok(port) = std::env::var("CONSOLE_E2E_PORT") {
            config.console_port = port
                .parse()
                .map_err(|_| Error::Config(format!("CONSOLE_E2E_PORT is not a port: {port:?}")))?;
        }
        if let Ok(variant) = std::env::var("CONSOLE_E2E_VARIANT") {
            config.variant = variant.parse()?;
        }
        if let Ok(dir) = std::env::var("CONSOLE_E2E_SCREENSHOT_DIR") {
            config.screenshot_dir = PathBuf::from(dir);
        }

        config.browser = if let Ok(hub_url) = std::env::var("CONSOLE_E2E_HUB_URL") {
            BrowserConfig::RemoteHub { hub_url }
        } else {
            BrowserConfig::LocalChrome {
                webdriver_url: std::env::var("CONSOLE_E2E_WEBDRIVER_URL")
                    .unwrap_or_else(|_| DEFAULT_WEBDRIVER_URL.to_string()),
                binary: std::env::var("CONSOLE_E2E_CHROME_BINARY")
                    .ok()
                    .map(PathBuf::from),
                headless: std::env::var("CONSOLE_E2E_HEADLESS")
                    .map(|v| v != "0" && !v.eq_ignore_ascii_case("false"))
                    .unwrap_or(true),
            }
        };

        Ok(config)
    }
}
