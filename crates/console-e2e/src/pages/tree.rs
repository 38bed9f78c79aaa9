// Tree page facade
//
// The Overview and Entities screens are the same page shape: a
// navigation tab pair on top and a dynatree widget on the left whose
// nodes expand one arrow click at a time. The tree re-renders while it
// is being expanded, so every pass over the expanders runs under the
// stale-reference retrier.

use thirtyfour::{By, WebElement};

use crate::config::ConsoleVariant;
use crate::error::{Error, ErrorKind, Result};
use crate::pages::{ELEMENT_TIMEOUT, NAV_TIMEOUT, Selectors, wait_for_frameworks};
use crate::session::Session;
use crate::sync::{DEFAULT_RETRY_BUDGET, PollOptions, retry_on, wait_for};

/// Which of the two tree-bearing screens a [`TreePage`] fronts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeScreen {
    Overview,
    Entities,
}

impl TreeScreen {
    /// Number of tree nodes the live router is expected to show.
    pub fn node_count(self) -> usize {
        match self {
            TreeScreen::Overview => 5,
            TreeScreen::Entities => 17,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            TreeScreen::Overview => "overview",
            TreeScreen::Entities => "entities",
        }
    }

    pub fn url(self, variant: ConsoleVariant, base_url: &str) -> String {
        match self {
            TreeScreen::Overview => variant.overview_url(base_url),
            TreeScreen::Entities => variant.entities_url(base_url),
        }
    }

    fn nav_active(self, selectors: &Selectors) -> &'static str {
        match self {
            TreeScreen::Overview => selectors.overview_nav_active,
            TreeScreen::Entities => selectors.entities_nav_active,
        }
    }
}

pub struct TreePage<'a> {
    session: &'a Session,
    variant: ConsoleVariant,
    screen: TreeScreen,
}

impl<'a> TreePage<'a> {
    /// Attaches to an already loaded tree screen, waiting for the
    /// frameworks to settle and for the tree to start rendering.
    pub async fn attach(
        session: &'a Session,
        variant: ConsoleVariant,
        screen: TreeScreen,
    ) -> Result<TreePage<'a>> {
        let page = Self {
            session,
            variant,
            screen,
        };
        page.wait_for_frameworks().await?;
        // at least one node expander must appear
        session
            .wait_element_visible(
                By::Css(variant.selectors().tree_expander),
                ELEMENT_TIMEOUT,
            )
            .await?;
        Ok(page)
    }

    /// Navigates straight to the screen's URL and attaches.
    pub async fn open(
        session: &'a Session,
        variant: ConsoleVariant,
        screen: TreeScreen,
        base_url: &str,
    ) -> Result<TreePage<'a>> {
        session.goto(&screen.url(variant, base_url)).await?;
        Self::attach(session, variant, screen).await
    }

    /// Waits for this screen's entry in the top bar to become active.
    pub async fn wait_until_active(
        session: &Session,
        variant: ConsoleVariant,
        screen: TreeScreen,
    ) -> Result<()> {
        session
            .wait_element_present(By::Css(screen.nav_active(variant.selectors())), NAV_TIMEOUT)
            .await?;
        Ok(())
    }

    pub fn screen(&self) -> TreeScreen {
        self.screen
    }

    pub fn node_count(&self) -> usize {
        self.screen.node_count()
    }

    pub async fn wait_for_frameworks(&self) -> Result<()> {
        wait_for_frameworks(self.session, self.variant).await
    }

    pub async fn overview_tab(&self) -> Result<WebElement> {
        self.session
            .wait_element_visible(By::Css(self.variant.selectors().overview_tab), ELEMENT_TIMEOUT)
            .await
    }

    pub async fn entities_tab(&self) -> Result<WebElement> {
        self.session
            .wait_element_visible(By::Css(self.variant.selectors().entities_tab), ELEMENT_TIMEOUT)
            .await
    }

    /// All expander arrows currently in the tree.
    pub async fn expanders(&self) -> Result<Vec<WebElement>> {
        self.session
            .find_all(By::Css(self.variant.selectors().tree_expander))
            .await
    }

    /// All tree nodes currently expanded.
    pub async fn expanded_nodes(&self) -> Result<Vec<WebElement>> {
        self.session
            .find_all(By::Css(self.variant.selectors().expanded_node))
            .await
    }

    pub async fn is_expanded(&self, node: &WebElement) -> Result<bool> {
        let class = node.attr("class").await?;
        Ok(class.is_some_and(|c| c.contains("dynatree-expanded")))
    }

    /// Expands the whole tree by clicking expander arrows one by one.
    ///
    /// The tree redraws itself while nodes open, invalidating element
    /// references mid-pass; the whole pass restarts on a stale
    /// reference and the result is verified afterwards.
    pub async fn expand_all(&self) -> Result<()> {
        self.wait_for_frameworks().await?;
        self.session
            .wait_element_clickable(
                By::Css(self.variant.selectors().tree_expander),
                crate::sync::DEFAULT_POLL_TIMEOUT,
            )
            .await?;

        let expected = self.node_count();
        wait_for(
            &format!("{} tree to show {expected} expanders", self.screen.name()),
            PollOptions::default(),
            || async move { Ok(self.expanders().await?.len() == expected) },
        )
        .await?;

        retry_on(ErrorKind::Stale, DEFAULT_RETRY_BUDGET, || self.expand_pass()).await?;
        self.require_expanded().await
    }

    async fn expand_pass(&self) -> Result<()> {
        self.wait_for_frameworks().await?;
        for expander in self.expanders().await? {
            expander.scroll_into_view().await?;
            // the parent node can detach right after the expander is
            // located; look it up under its own retry budget
            let expander_ref = &expander;
            let node = retry_on(ErrorKind::NotFound, DEFAULT_RETRY_BUDGET, || async move {
                expander_ref
                    .find(By::XPath("./.."))
                    .await
                    .map_err(Error::from)
            })
            .await?;
            if self.is_expanded(&node).await? {
                continue;
            }
            self.wait_for_frameworks().await?;
            expander.click().await?;
            self.wait_for_frameworks().await?;
        }
        Ok(())
    }

    /// Fails unless every node in the tree is expanded.
    pub async fn require_expanded(&self) -> Result<()> {
        retry_on(ErrorKind::Stale, DEFAULT_RETRY_BUDGET, || {
            self.expanded_check_pass()
        })
        .await
    }

    async fn expanded_check_pass(&self) -> Result<()> {
        self.wait_for_frameworks().await?;
        for expander in self.expanders().await? {
            let node = expander.find(By::XPath("./..")).await?;
            if !self.is_expanded(&node).await? {
                return Err(Error::Assertion(format!(
                    "expected every {} tree node to be expanded",
                    self.screen.name()
                )));
            }
        }
        Ok(())
    }
}
