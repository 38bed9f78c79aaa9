// Shared helpers for the integration tests

use console_e2e::{Config, Session};

/// Initializes tracing for a test binary; safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_test_writer()
        .try_init();
}

/// Environment-driven configuration for the browser scenarios.
pub fn config() -> Config {
    Config::from_env().expect("invalid CONSOLE_E2E_* configuration")
}

pub async fn connect(config: &Config) -> Session {
    Session::connect(&config.browser)
        .await
        .expect("failed to open a browser session")
}

/// Screenshot at a scenario checkpoint. A failed capture is reported
/// but never masks the scenario outcome.
pub async fn checkpoint_screenshot(session: &Session, config: &Config, test: &str, tag: &str) {
    if let Err(err) = session
        .save_screenshot(&config.screenshot_dir, test, tag)
        .await
    {
        eprintln!("screenshot {test}__{tag} failed: {err}");
    }
}
