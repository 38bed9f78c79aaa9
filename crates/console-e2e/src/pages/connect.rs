// Connect page facade
//
// The login screen of the console: host and port inputs plus a connect
// button. Construction waits for the frameworks to settle and for the
// form to actually render, so scenarios never see the empty
// toolbar-only page a half-loaded console serves.

use std::time::Duration;

use thirtyfour::{By, Key, WebElement};

use crate::config::ConsoleVariant;
use crate::error::{Error, Result};
use crate::pages::{ELEMENT_TIMEOUT, NAV_TIMEOUT, wait_for_frameworks};
use crate::session::Session;

/// Budget for the error-banner text wait.
const ERROR_BANNER_TIMEOUT: Duration = Duration::from_secs(10);

pub struct ConnectPage<'a> {
    session: &'a Session,
    variant: ConsoleVariant,
}

impl<'a> ConnectPage<'a> {
    /// Navigates to the connect page and waits for the form to render.
    pub async fn open(
        session: &'a Session,
        variant: ConsoleVariant,
        base_url: &str,
    ) -> Result<ConnectPage<'a>> {
        session.goto(&variant.connect_url(base_url)).await?;
        let page = Self { session, variant };
        page.wait_for_frameworks().await?;

        // ensure the whole form is in the page
        page.host().await?;
        page.port().await?;
        page.connect_button().await?;

        Ok(page)
    }

    /// Attaches to an already loaded connect page.
    pub fn attach(session: &'a Session, variant: ConsoleVariant) -> ConnectPage<'a> {
        Self { session, variant }
    }

    /// Waits for the Connect entry in the top bar to become active.
    pub async fn wait_until_active(session: &Session, variant: ConsoleVariant) -> Result<()> {
        session
            .wait_element_present(By::Css(variant.selectors().connect_nav_active), NAV_TIMEOUT)
            .await?;
        Ok(())
    }

    pub async fn wait_for_frameworks(&self) -> Result<()> {
        wait_for_frameworks(self.session, self.variant).await
    }

    pub async fn host(&self) -> Result<WebElement> {
        self.session
            .wait_element_visible(By::Name(self.variant.selectors().host_field), ELEMENT_TIMEOUT)
            .await
    }

    pub async fn port(&self) -> Result<WebElement> {
        self.session
            .wait_element_visible(By::Name(self.variant.selectors().port_field), ELEMENT_TIMEOUT)
            .await
    }

    pub async fn connect_button(&self) -> Result<WebElement> {
        self.session
            .find(By::Css(self.variant.selectors().connect_button))
            .await
    }

    /// Types connection details into the form. Either field may be left
    /// alone; both are cleared first, with framework settles between the
    /// keystrokes the way the live form expects them.
    pub async fn fill_connection(&self, host: Option<&str>, port: Option<&str>) -> Result<()> {
        self.host().await?.clear().await?;
        self.wait_for_frameworks().await?;
        if let Some(host) = host {
            self.host().await?.send_keys(host).await?;
            self.wait_for_frameworks().await?;
        }
        self.port().await?.clear().await?;
        if let Some(port) = port {
            self.port().await?.send_keys(port).await?;
        }
        Ok(())
    }

    /// Clicks the connect button.
    pub async fn submit(&self) -> Result<()> {
        self.connect_button().await?.click().await?;
        Ok(())
    }

    /// Submits the form by pressing Enter in the port field.
    pub async fn submit_with_enter(&self) -> Result<()> {
        self.port().await?.send_keys(Key::Enter + "").await?;
        Ok(())
    }

    /// Waits for the connection-error banner to show `message` exactly.
    pub async fn wait_error_message(&self, message: &str) -> Result<()> {
        let banner = By::Css(self.variant.selectors().error_banner);
        self.session
            .wait_text_present(banner.clone(), message, ERROR_BANNER_TIMEOUT)
            .await?;

        let error = self.session.find(banner).await?;
        let text = error.text().await?;
        if text != message {
            return Err(Error::Assertion(format!(
                "expected error banner {message:?}, found {text:?}"
            )));
        }
        if !error.is_displayed().await? {
            return Err(Error::Assertion(format!(
                "error banner {message:?} is present but not displayed"
            )));
        }
        Ok(())
    }
}
