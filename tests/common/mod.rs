//! Shared fixtures for integration testing.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use page_router::host::RecordingHost;
use page_router::Host;
use page_router::{ComponentDefinition, MemoryLocation, Router, RouterOptions, RouteDefinition, ViewHandle};

/// How long a test waits for the listener task before giving up.
pub const WAIT: Duration = Duration::from_secs(2);

pub struct Fixture {
    pub router: Router,
    pub host: Arc<RecordingHost>,
    pub location: Arc<MemoryLocation>,
}

impl Fixture {
    /// Wait until at least `count` mounts have been recorded.
    pub async fn mounts(&self, count: usize) {
        tokio::time::timeout(WAIT, self.host.wait_for_mounts(count))
            .await
            .expect("timed out waiting for mount");
    }

    /// Path and matched route of the most recent mount.
    pub fn current(&self) -> (String, String) {
        let route = self.host.last_route().expect("no route mounted");
        (route.path, route.matched_route)
    }
}

/// A host with `Home`, `About`, `User`, `Files` and `NotFound` registered.
pub fn host() -> Arc<RecordingHost> {
    let layout = ViewHandle::new("app");
    let host = RecordingHost::new().with_element(&layout, "#view", ViewHandle::new("app-view"));
    for name in ["Home", "About", "User", "Files", "NotFound"] {
        host.register_component(name, ComponentDefinition::new(name));
    }
    Arc::new(host)
}

/// Options over the standard route table.
pub fn options(mode: &str) -> RouterOptions {
    RouterOptions::new(ViewHandle::new("app"))
        .mode(mode)
        .route(RouteDefinition::new("/", "Home"))
        .route(RouteDefinition::new("/about", "About"))
        .route(RouteDefinition::new("/users/:id", "User"))
        .route(RouteDefinition::new("/files/:rest*", "Files"))
        .auto_start(false)
}

/// Build (but do not start) a router on `url`.
pub fn fixture(url: &str, options: RouterOptions) -> Fixture {
    let host = host();
    let location = Arc::new(MemoryLocation::new(url).unwrap());
    let router = Router::new(host.clone(), location.clone(), options).unwrap();
    Fixture {
        router,
        host,
        location,
    }
}

/// Build a router on `url` and start it.
pub async fn started(url: &str, options: RouterOptions) -> Fixture {
    let fixture = fixture(url, options);
    fixture.router.start().await;
    fixture
}
