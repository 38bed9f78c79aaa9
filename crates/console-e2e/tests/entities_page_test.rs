// Entities page scenarios
//
// Ignored by default; see connect_page_test.rs for how to point these
// at a live deployment.

mod common;

use console_e2e::flows;

#[tokio::test]
#[ignore = "requires a live console and a WebDriver endpoint"]
async fn open_entities_page() {
    common::init_tracing();
    let config = common::config();
    let session = common::connect(&config).await;

    flows::open_entities(&session, &config)
        .await
        .expect("entities page did not render after login");

    session.close().await.expect("failed to close the session");
}

#[tokio::test]
#[ignore = "requires a live console and a WebDriver endpoint"]
async fn expanded_tree_survives_navigating_away_and_back() {
    common::init_tracing();
    let config = common::config();
    let session = common::connect(&config).await;

    let page = flows::open_entities(&session, &config)
        .await
        .expect("entities page did not render after login");

    page.expand_all().await.expect("tree did not fully expand");
    common::checkpoint_screenshot(&session, &config, "entities_expanding_tree", "10").await;

    let page = flows::navigate_away_and_back(&session, &config, page)
        .await
        .expect("navigation to overview and back failed");

    let expanded = page
        .expanded_nodes()
        .await
        .expect("could not query expanded nodes")
        .len();
    assert_eq!(
        expanded,
        page.node_count(),
        "all tree nodes should stay expanded across navigation"
    );
    common::checkpoint_screenshot(&session, &config, "entities_expanding_tree", "20").await;

    session
        .require_no_script_errors()
        .await
        .expect("page logged uncaught script errors");
    session.close().await.expect("failed to close the session");
}
