//! console-e2e: end-to-end browser tests for the Dispatch management console
//!
//! Drives a real browser through the WebDriver protocol (via the
//! [`thirtyfour`] client) against the router management console, in both
//! of its deployments: the hawtio-embedded plugin and the stand-alone
//! build.
//!
//! The crate splits into three layers:
//!
//! - [`sync`] — the two reusable mechanisms everything else leans on: a
//!   condition poller ([`sync::wait_for`]) for settling the jQuery/
//!   Angular front-end, and a transient-failure retrier
//!   ([`sync::retry_on`]) for elements the page replaces mid-interaction.
//! - [`pages`] — one facade per console screen, parameterized by the
//!   per-variant selector table instead of a class hierarchy.
//! - [`flows`] — the shared login/open-screen sequences consumed by the
//!   integration tests under `tests/` and by the `runner` binary.
//!
//! Execution is single-threaded and synchronous: one test drives one
//! browser [`Session`] at a time, and the only suspension point is the
//! poller's sleep between probes.

pub mod config;
pub mod error;
pub mod flows;
pub mod pages;
pub mod session;
pub mod sync;

pub use config::{BrowserConfig, Config, ConsoleVariant};
pub use error::{Error, ErrorKind, Result};
pub use pages::{ConnectPage, LogsPage, TreePage, TreeScreen};
pub use session::{BrowserLogEntry, Session};
pub use sync::{PollOptions, retry_on, wait_for};
