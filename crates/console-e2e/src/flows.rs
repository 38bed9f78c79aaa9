// Shared scenario steps
//
// The given/when sequences every scenario starts with, shared by the
// integration tests and the manual runner.

use crate::config::Config;
use crate::error::Result;
use crate::pages::{ConnectPage, TreePage, TreeScreen};
use crate::session::Session;

/// Opens the connect page and waits for it to be fully rendered.
pub async fn open_connect_page<'a>(
    session: &'a Session,
    config: &Config,
) -> Result<ConnectPage<'a>> {
    let page = ConnectPage::open(session, config.variant, &config.base_url).await?;
    ConnectPage::wait_until_active(session, config.variant).await?;
    page.wait_for_frameworks().await?;
    Ok(page)
}

/// Logs into the console with the configured router details and waits
/// for the Overview screen to activate.
pub async fn log_in(session: &Session, config: &Config) -> Result<()> {
    let connect = open_connect_page(session, config).await?;
    connect
        .fill_connection(
            Some(&config.console_ip),
            Some(&config.console_port.to_string()),
        )
        .await?;
    connect.submit().await?;
    TreePage::wait_until_active(session, config.variant, TreeScreen::Overview).await
}

/// Logs in and lands on the Overview screen.
pub async fn open_overview<'a>(session: &'a Session, config: &Config) -> Result<TreePage<'a>> {
    log_in(session, config).await?;
    TreePage::attach(session, config.variant, TreeScreen::Overview).await
}

/// Logs in and tabs over to the Entities screen.
pub async fn open_entities<'a>(session: &'a Session, config: &Config) -> Result<TreePage<'a>> {
    log_in(session, config).await?;
    let overview = TreePage::attach(session, config.variant, TreeScreen::Overview).await?;
    overview.entities_tab().await?.click().await?;
    TreePage::wait_until_active(session, config.variant, TreeScreen::Entities).await?;
    TreePage::attach(session, config.variant, TreeScreen::Entities).await
}

/// Tabs to the sibling tree screen and back, returning a fresh facade
/// for the original screen.
pub async fn navigate_away_and_back<'a>(
    session: &'a Session,
    config: &Config,
    page: TreePage<'a>,
) -> Result<TreePage<'a>> {
    let screen = page.screen();
    match screen {
        TreeScreen::Overview => {
            page.entities_tab().await?.click().await?;
            page.wait_for_frameworks().await?;
            page.overview_tab().await?.click().await?;
        }
        TreeScreen::Entities => {
            page.overview_tab().await?.click().await?;
            page.wait_for_frameworks().await?;
            page.entities_tab().await?.click().await?;
        }
    }
    TreePage::wait_until_active(session, config.variant, screen).await?;
    TreePage::attach(session, config.variant, screen).await
}
