//! Start, destroy and transition behaviour of the router.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use page_router::component::Bindings;
use page_router::host::HostEvent;
use page_router::location::{LocationPort, WriteMode};
use page_router::{
    ComponentDefinition, ErrorKind, Host, Navigator, RouteDefinition, RouteOutcome, RouterError,
    RouterState,
};

mod common;

#[tokio::test]
async fn test_start_is_idempotent() {
    let f = common::fixture("http://app.test/#/about", common::options("hash"));
    assert_eq!(f.router.state().await, RouterState::Uninitialized);

    f.router.start().await;
    f.router.start().await;
    assert_eq!(f.router.state().await, RouterState::Started);
    assert_eq!(f.host.mounts().len(), 1);
}

#[tokio::test]
async fn test_destroy_stops_listening() {
    let f = common::started("http://app.test/#/about", common::options("hash")).await;

    f.router.destroy().await;
    assert_eq!(f.router.state().await, RouterState::Stopped);
    assert_eq!(f.host.attached(), 0);
    assert!(matches!(f.host.events().last(), Some(HostEvent::Unmounted { .. })));

    f.location.write("#/users/1", WriteMode::Assign).unwrap();
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(f.host.mounts().len(), 1);

    // a stopped router can be started again
    f.router.start().await;
    assert_eq!(f.current().0, "/users/1");
    f.location.write("#/about", WriteMode::Assign).unwrap();
    f.mounts(3).await;
    assert_eq!(f.current().0, "/about");
}

#[tokio::test]
async fn test_destroy_before_start_is_noop() {
    let f = common::fixture("http://app.test/", common::options("hash"));
    f.router.destroy().await;
    assert_eq!(f.router.state().await, RouterState::Uninitialized);
    assert!(f.host.events().is_empty());
}

#[tokio::test]
async fn test_transitions_are_serialized() {
    let f = common::started("http://app.test/about", common::options("history")).await;
    f.host.set_mount_delay(Some(Duration::from_millis(20)));

    let (a, b, c) = tokio::join!(
        f.router.route_changed(),
        f.router.route_changed(),
        f.router.route_changed()
    );
    for outcome in [a, b, c] {
        assert!(matches!(outcome, RouteOutcome::Mounted(_)));
    }
    assert_eq!(f.host.mounts().len(), 4);
    assert_eq!(f.host.max_attached(), 1);
    assert_eq!(f.host.attached(), 1);
}

#[tokio::test]
async fn test_racing_navigations_leave_one_view() {
    let f = common::started("http://app.test/", common::options("history")).await;
    f.host.set_mount_delay(Some(Duration::from_millis(10)));

    tokio::join!(f.router.navigate("/about"), f.router.navigate("/users/9"));
    assert_eq!(f.host.max_attached(), 1);
    assert_eq!(f.host.attached(), 1);
}

#[tokio::test]
async fn test_unmount_failure_does_not_block() {
    let f = common::started("http://app.test/", common::options("history")).await;
    f.host.set_fail_unmount(true);

    f.router.navigate("/about").await;
    assert_eq!(f.current().0, "/about");
    assert_eq!(f.host.attached(), 1);
}

#[tokio::test]
async fn test_mount_failure_is_reported() {
    let f = common::started("http://app.test/", common::options("history")).await;
    f.host.set_fail_mount(true);
    f.location.write("/about", WriteMode::Push).unwrap();

    let outcome = f.router.route_changed().await;
    let RouteOutcome::Failed(err) = outcome else {
        panic!("expected a failed outcome");
    };
    assert!(matches!(err, RouterError::Mount(_)));
    assert_eq!(err.kind(), ErrorKind::Transient);
    assert_eq!(f.host.attached(), 0);
}

#[tokio::test]
async fn test_unregistered_component_mounts_nothing() {
    let options = common::options("history").route(RouteDefinition::new("/ghost", "Ghost"));
    let f = common::started("http://app.test/about", options).await;
    f.location.write("/ghost", WriteMode::Push).unwrap();

    let outcome = f.router.route_changed().await;
    assert!(matches!(
        outcome,
        RouteOutcome::Failed(RouterError::UnregisteredComponent(ref name)) if name == "Ghost"
    ));
    assert_eq!(f.host.mounts().len(), 1);
    assert_eq!(f.host.attached(), 0);
}

#[tokio::test]
async fn test_add_route_takes_effect() {
    let f = common::started("http://app.test/", common::options("history")).await;
    f.host.register_component("Settings", ComponentDefinition::new("Settings"));

    f.router.add_route(RouteDefinition::new("/settings", "Settings")).unwrap();
    f.router.navigate("/settings").await;
    assert_eq!(f.current().1, "/settings");

    let err = f.router.add_route(RouteDefinition::new("/broken", "")).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(f.router.routes().len(), 5);
}

#[tokio::test]
async fn test_component_navigates_through_injected_handle() {
    let captured: Arc<Mutex<Option<Navigator>>> = Arc::new(Mutex::new(None));
    let sink = captured.clone();

    let host = common::host();
    host.register_component(
        "Menu",
        ComponentDefinition::new("Menu").with_setup(move |ctx| {
            *sink.lock().unwrap() = ctx.navigate.clone();
            let mut bindings = Bindings::new();
            let path = ctx.route.as_ref().map(|r| r.path.clone());
            bindings.insert("path".into(), serde_json::json!(path));
            bindings
        }),
    );
    let location = Arc::new(page_router::MemoryLocation::new("http://app.test/menu").unwrap());
    let options = common::options("history").route(RouteDefinition::new("/menu", "Menu"));
    let router = page_router::Router::new(host.clone(), location.clone(), options).unwrap();
    router.start().await;

    let Some(HostEvent::Mounted { bindings, .. }) = host.mounts().pop() else {
        panic!("menu should be mounted");
    };
    assert_eq!(bindings["path"], "/menu");

    let navigator = captured.lock().unwrap().clone().unwrap();
    navigator.navigate("/about").await;
    assert_eq!(location.href(), "http://app.test/about");
    assert_eq!(host.last_route().unwrap().path, "/about");

    // the handle does not keep the router alive
    router.destroy().await;
    drop(router);
    navigator.navigate("/users/1").await;
    assert_eq!(location.href(), "http://app.test/about");
}

#[tokio::test]
async fn test_children_see_parent_route() {
    let host = common::host();
    host.register_component(
        "Shell",
        ComponentDefinition::new("Shell").with_child("nav", ComponentDefinition::new("Nav")),
    );
    let location = Arc::new(page_router::MemoryLocation::new("http://app.test/#/shell?q=1").unwrap());
    let options = common::options("hash").route(RouteDefinition::new("/shell", "Shell"));
    let router = page_router::Router::new(host.clone(), location, options).unwrap();
    router.start().await;

    let Some(HostEvent::Mounted { child_routes, .. }) = host.mounts().pop() else {
        panic!("shell should be mounted");
    };
    let (key, route) = &child_routes[0];
    assert_eq!(key, "nav");
    let route = route.as_ref().unwrap();
    assert_eq!(route.matched_route, "/shell");
    assert_eq!(route.query["q"], "1");
}

#[tokio::test]
async fn test_props_are_passed_to_mount() {
    let mut props = page_router::component::Props::new();
    props.insert("title".into(), serde_json::json!("About us"));
    let options = page_router::RouterOptions::new(page_router::ViewHandle::new("app"))
        .mode("history")
        .route(RouteDefinition::new("/about", "About").with_props(props))
        .auto_start(false);
    let f = common::started("http://app.test/about", options).await;

    let Some(HostEvent::Mounted { props, .. }) = f.host.mounts().pop() else {
        panic!("about should be mounted");
    };
    assert_eq!(props["title"], "About us");
}

#[tokio::test]
async fn test_lagged_listener_still_resolves() {
    let f = common::started("http://app.test/about", common::options("history")).await;
    for _ in 0..100 {
        f.location.dispatch(page_router::location::NavigationEvent::PopState);
    }
    f.mounts(2).await;
    assert_eq!(f.current().0, "/about");
}
