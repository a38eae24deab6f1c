//! Configuration files driving a real router.

use std::sync::Arc;

use page_router::config::{load_config, parse_config, ConfigError};
use page_router::{install, MemoryLocation, RouteMode};

mod common;

const ROUTES: &str = r#"
layout = "app"
mode = "query"
query_param = "p"
auto_start = false
initial_url = "http://app.test/?p=/users/3"

[[routes]]
path = "/"
component = "Home"

[[routes]]
path = "/users/:id"
component = "User"
props = { tab = "profile" }

[[routes]]
path = "/inline"

[routes.component]
name = "InlinePage"
template = "<section/>"

[default_route]
path = "/404"
component = "NotFound"

[observability]
log_level = "debug"
"#;

#[tokio::test]
async fn test_config_drives_router() {
    let config = parse_config(ROUTES).unwrap();
    assert_eq!(config.observability.log_level, "debug");

    let host = common::host();
    let location = Arc::new(MemoryLocation::new(&config.initial_url).unwrap());
    let router = install(host.clone(), location, config.into_options()).unwrap();
    assert_eq!(router.mode(), RouteMode::Query);
    assert_eq!(router.routes().len(), 3);

    router.start().await;
    let route = host.last_route().unwrap();
    assert_eq!(route.matched_route, "/users/:id");
    assert_eq!(route.params["id"], "3");

    router.navigate("/inline").await;
    assert_eq!(host.last_route().unwrap().matched_route, "/inline");

    router.navigate("/nope").await;
    assert_eq!(host.last_route().unwrap().matched_route, "/404");
}

#[test]
fn test_load_from_file() {
    let path = std::env::temp_dir().join(format!("page-router-{}.toml", std::process::id()));
    std::fs::write(&path, ROUTES).unwrap();

    let config = load_config(&path).unwrap();
    std::fs::remove_file(&path).unwrap();
    assert_eq!(config.routes.len(), 3);
    assert_eq!(config.query_param, "p");
}

#[test]
fn test_duplicate_paths_rejected() {
    let err = parse_config(
        r#"
        layout = "app"

        [[routes]]
        path = "/a"
        component = "A"

        [[routes]]
        path = "/a"
        component = "B"
        "#,
    )
    .unwrap_err();
    let ConfigError::Validation(errors) = err else {
        panic!("expected validation failure");
    };
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].field, "routes[1].path");
}
