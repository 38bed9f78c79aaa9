// Logs page facade
//
// Only the hawtio deployment serves a logs screen; the stand-alone
// console has none, and opening it there is an explicit error rather
// than a silently skipped lookup.

use crate::config::ConsoleVariant;
use crate::error::{Error, Result};
use crate::pages::NAV_TIMEOUT;
use crate::session::Session;
use thirtyfour::By;

pub struct LogsPage<'a> {
    session: &'a Session,
    variant: ConsoleVariant,
}

impl<'a> LogsPage<'a> {
    /// Navigates to the logs route.
    pub async fn open(
        session: &'a Session,
        variant: ConsoleVariant,
        base_url: &str,
    ) -> Result<LogsPage<'a>> {
        let url = variant
            .logs_url(base_url)
            .ok_or(Error::Unsupported {
                page: "logs",
                variant,
            })?;
        session.goto(&url).await?;
        Ok(Self { session, variant })
    }

    /// Waits for the Logs entry in the top bar to become active.
    ///
    /// Today this times out on a bookmarked `/logs` load (DISPATCH-433);
    /// the test for it asserts the timeout.
    pub async fn wait_until_active(&self) -> Result<()> {
        let selector = self
            .variant
            .selectors()
            .logs_nav_active
            .ok_or(Error::Unsupported {
                page: "logs",
                variant: self.variant,
            })?;
        self.session
            .wait_element_visible(By::Css(selector), NAV_TIMEOUT)
            .await?;
        Ok(())
    }
}
