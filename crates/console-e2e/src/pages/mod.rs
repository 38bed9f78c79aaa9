// Page facades for the console screens
//
// One set of page structs serves both console deployments; everything
// variant-specific (URL scheme, CSS selectors, the Angular root
// element) lives in the per-variant Selectors table picked at
// construction time.

mod connect;
mod logs;
mod tree;

pub use connect::ConnectPage;
pub use logs::LogsPage;
pub use tree::{TreePage, TreeScreen};

use std::time::Duration;

use crate::config::ConsoleVariant;
use crate::error::Result;
use crate::session::Session;
use crate::sync::{PollOptions, wait_for};

/// Route prefix of the console plugin inside hawtio.
pub const PLUGIN_NAME: &str = "dispatch_hawtio_console";

/// Budget for the frameworks-settled poll.
const FRAMEWORKS_TIMEOUT: Duration = Duration::from_secs(20);

/// Budget for the nav-link waits that gate page construction.
pub(crate) const NAV_TIMEOUT: Duration = Duration::from_secs(30);

/// Budget for individual element lookups inside a page.
pub(crate) const ELEMENT_TIMEOUT: Duration = Duration::from_secs(20);

/// Per-variant DOM knowledge consumed by the page facades.
pub struct Selectors {
    pub connect_nav_active: &'static str,
    pub overview_nav_active: &'static str,
    pub entities_nav_active: &'static str,
    /// Absent on the stand-alone console, which has no logs screen
    pub logs_nav_active: Option<&'static str>,
    pub overview_tab: &'static str,
    pub entities_tab: &'static str,
    pub tree_expander: &'static str,
    pub expanded_node: &'static str,
    /// `name` attribute of the connect form's host input
    pub host_field: &'static str,
    /// `name` attribute of the connect form's port input
    pub port_field: &'static str,
    pub connect_button: &'static str,
    pub error_banner: &'static str,
    /// Element the Angular injector is looked up on
    pub angular_root: &'static str,
}

static HAWTIO: Selectors = Selectors {
    connect_nav_active: ".active a[ng-href=\"#/dispatch_hawtio_console/connect\"]",
    overview_nav_active: ".active a[ng-href=\"#/dispatch_hawtio_console/overview\"]",
    entities_nav_active: ".active a[ng-href=\"#/dispatch_hawtio_console/list\"]",
    logs_nav_active: Some(".active a[ng-href=\"#/logs\"]"),
    overview_tab: "a[ng-href=\"#/dispatch_hawtio_console/overview\"]",
    entities_tab: "a[ng-href=\"#/dispatch_hawtio_console/list\"]",
    tree_expander: ".dynatree-node > .dynatree-expander",
    expanded_node: ".dynatree-node.dynatree-expanded",
    host_field: "address",
    port_field: "port",
    connect_button: "#dispatch-login-container button",
    error_banner: "p.ng-binding",
    angular_root: "html",
};

static STANDALONE: Selectors = Selectors {
    connect_nav_active: "a[ng-href=\"#!/connect\"]",
    overview_nav_active: "li.active > a[ng-href=\"#!/overview\"]",
    entities_nav_active: "li.active > a[ng-href=\"#!/list\"]",
    logs_nav_active: None,
    overview_tab: "li > a[ng-href=\"#!/overview\"]",
    entities_tab: "li > a[ng-href=\"#!/list\"]",
    tree_expander: ".dynatree-node > .fa-angle",
    expanded_node: ".dynatree-node.dynatree-expanded",
    host_field: "address",
    port_field: "port",
    connect_button: "#dispatch-login-container button",
    error_banner: "p.ng-binding",
    angular_root: "body",
};

impl ConsoleVariant {
    pub fn selectors(self) -> &'static Selectors {
        match self {
            ConsoleVariant::Hawtio => &HAWTIO,
            ConsoleVariant::Standalone => &STANDALONE,
        }
    }

    pub fn connect_url(self, base_url: &str) -> String {
        match self {
            ConsoleVariant::Hawtio => format!("{base_url}/{PLUGIN_NAME}"),
            ConsoleVariant::Standalone => base_url.to_string(),
        }
    }

    pub fn overview_url(self, base_url: &str) -> String {
        match self {
            ConsoleVariant::Hawtio => format!("{base_url}/{PLUGIN_NAME}/overview"),
            ConsoleVariant::Standalone => format!("{base_url}/#!/overview"),
        }
    }

    pub fn entities_url(self, base_url: &str) -> String {
        match self {
            ConsoleVariant::Hawtio => format!("{base_url}/{PLUGIN_NAME}/links"),
            ConsoleVariant::Standalone => format!("{base_url}/#!/list"),
        }
    }

    pub fn logs_url(self, base_url: &str) -> Option<String> {
        match self {
            ConsoleVariant::Hawtio => Some(format!("{base_url}/logs")),
            ConsoleVariant::Standalone => None,
        }
    }
}

/// Reports whether the UI frameworks have stopped changing the page.
///
/// Spies on jQuery's active requests and Angular's digest cycle, plus a
/// one-tick render-finished marker set through $timeout. Evaluates to a
/// plain boolean; any page-side exception counts as "still busy".
const FRAMEWORKS_SETTLED_JS: &str = r#"
try {
  if (document.readyState !== 'complete') {
    return false; // Page not loaded yet
  }
  if (window.jQuery) {
    if (window.jQuery.active) {
      return false;
    } else if (window.jQuery.ajax && window.jQuery.ajax.active) {
      return false;
    }
  }
  if (window.angular) {
    if (!window.qa) {
      // Used to track the render cycle finish after loading is complete
      window.qa = {
        doneRendering: false
      };
    }
    var injector = window.angular.element('body').injector();
    var $rootScope = injector.get('$rootScope');
    var $http = injector.get('$http');
    var $timeout = injector.get('$timeout');
    if ($rootScope.$$phase === '$apply' || $rootScope.$$phase === '$digest' || $http.pendingRequests.length !== 0) {
      window.qa.doneRendering = false;
      return false; // Angular digesting or loading data
    }
    if (!window.qa.doneRendering) {
      // Set timeout to mark angular rendering as finished
      $timeout(function() {
        window.qa.doneRendering = true;
      }, 0);
      return false;
    }
  }
  return true;
} catch (ex) {
  return false;
}
"#;

/// Blocks until the front-end frameworks settle: polls the spy script,
/// then waits for Angular to report no outstanding requests through the
/// page-side callback.
pub async fn wait_for_frameworks(session: &Session, variant: ConsoleVariant) -> Result<()> {
    wait_for(
        "UI frameworks to settle",
        PollOptions::timeout(FRAMEWORKS_TIMEOUT),
        || session.execute_bool(FRAMEWORKS_SETTLED_JS),
    )
    .await?;

    let script = format!(
        "var callback = arguments[arguments.length - 1];\n\
         angular.element('{}').injector().get('$browser').notifyWhenNoOutstandingRequests(callback);",
        variant.selectors().angular_root
    );
    session.execute_async(&script).await?;
    Ok(())
}
