// Error types for the console test suite

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use thirtyfour::error::WebDriverError;

use crate::config::ConsoleVariant;

/// Result type alias for suite operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can surface from a test scenario.
///
/// The retry machinery in [`crate::sync`] classifies errors by
/// [`ErrorKind`] rather than by variant, so WebDriver-level failures
/// keep their original payload while still being recognizable as
/// `NotFound` or `Stale`.
#[derive(Debug, Error)]
pub enum Error {
    /// A polled condition never became true within its budget
    #[error("timed out after {waited:?} waiting for: {condition}")]
    Timeout { condition: String, waited: Duration },

    /// A transient error kept recurring past the retry budget
    #[error("gave up after {attempts} attempts that kept failing with {kind:?}")]
    ExhaustedRetries { attempts: usize, kind: ErrorKind },

    /// A requested element does not exist at lookup time
    #[error("element not found: {selector}")]
    ElementNotFound { selector: String },

    /// A previously located element was replaced by a page re-render
    #[error("stale element reference: {0}")]
    StaleElement(String),

    /// A page-level expectation did not hold
    #[error("{0}")]
    Assertion(String),

    /// The browser recorded uncaught script errors
    #[error("uncaught script error in browser log: {0}")]
    ScriptError(String),

    /// The requested page does not exist on this console variant
    #[error("the {variant} console has no {page} page")]
    Unsupported {
        page: &'static str,
        variant: ConsoleVariant,
    },

    /// Invalid configuration value
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Screenshot could not be written
    #[error("screenshot failed: {path}")]
    Screenshot {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    WebDriver(#[from] WebDriverError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Error classification used by the retry machinery.
///
/// `Stale` is the one kind the Transient-Failure Retrier is normally
/// configured to absorb; everything else propagates and fails the
/// scenario.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Timeout,
    ExhaustedRetries,
    NotFound,
    Stale,
    Other,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Timeout { .. } => ErrorKind::Timeout,
            Error::ExhaustedRetries { .. } => ErrorKind::ExhaustedRetries,
            Error::ElementNotFound { .. } => ErrorKind::NotFound,
            Error::StaleElement(_) => ErrorKind::Stale,
            Error::WebDriver(err) => match err {
                WebDriverError::NoSuchElement(_) => ErrorKind::NotFound,
                WebDriverError::StaleElementReference(_) => ErrorKind::Stale,
                _ => ErrorKind::Other,
            },
            _ => ErrorKind::Other,
        }
    }
}
