//! A host that records every mount and unmount instead of rendering.
//!
//! Used by the command-line tool and by tests. It runs each mounted
//! definition's setup hook (and those of its inline children) so the injected
//! route context can be inspected, and it can be told to slow down or fail.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use futures_util::future::BoxFuture;
use serde::Serialize;
use tokio::sync::Notify;

use crate::component::{
    Bindings, ComponentDefinition, ComponentRef, ComponentRegistry, Props, ResolveComponent,
    RouteInfo, SetupContext,
};
use crate::host::{Host, HostError, Instance, ViewHandle};

/// One observed host operation.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HostEvent {
    Mounted {
        target: String,
        component: Option<String>,
        props: Props,
        route: Option<RouteInfo>,
        bindings: Bindings,
        /// Route seen by each inline child's setup hook, by child key.
        child_routes: Vec<(String, Option<RouteInfo>)>,
    },
    Unmounted {
        target: String,
        component: Option<String>,
    },
}

#[derive(Debug, Default)]
struct HostLog {
    events: Mutex<Vec<HostEvent>>,
    attached: AtomicUsize,
    max_attached: AtomicUsize,
    notify: Notify,
}

impl HostLog {
    fn events(&self) -> MutexGuard<'_, Vec<HostEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record(&self, event: HostEvent) {
        self.events().push(event);
        self.notify.notify_waiters();
    }
}

/// In-process host used outside a browser.
#[derive(Debug, Default)]
pub struct RecordingHost {
    registry: ComponentRegistry,
    elements: Mutex<HashMap<(ViewHandle, String), ViewHandle>>,
    log: Arc<HostLog>,
    mount_delay: Mutex<Option<Duration>>,
    fail_mount: AtomicBool,
    fail_unmount: Arc<AtomicBool>,
}

impl RecordingHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare an element inside `layout` reachable through `selector`.
    pub fn with_element(self, layout: &ViewHandle, selector: &str, element: ViewHandle) -> Self {
        self.elements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert((layout.clone(), selector.to_string()), element);
        self
    }

    /// Make every mount suspend for `delay` before attaching.
    pub fn set_mount_delay(&self, delay: Option<Duration>) {
        *self.mount_delay.lock().unwrap_or_else(PoisonError::into_inner) = delay;
    }

    pub fn set_fail_mount(&self, fail: bool) {
        self.fail_mount.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_unmount(&self, fail: bool) {
        self.fail_unmount.store(fail, Ordering::SeqCst);
    }

    /// Snapshot of all recorded events.
    pub fn events(&self) -> Vec<HostEvent> {
        self.log.events().clone()
    }

    /// Recorded mount events only.
    pub fn mounts(&self) -> Vec<HostEvent> {
        self.events()
            .into_iter()
            .filter(|event| matches!(event, HostEvent::Mounted { .. }))
            .collect()
    }

    /// Route injected into the most recent mount.
    pub fn last_route(&self) -> Option<RouteInfo> {
        self.log.events().iter().rev().find_map(|event| match event {
            HostEvent::Mounted { route, .. } => Some(route.clone()),
            HostEvent::Unmounted { .. } => None,
        })?
    }

    /// Instances currently attached.
    pub fn attached(&self) -> usize {
        self.log.attached.load(Ordering::SeqCst)
    }

    /// Highest number of simultaneously attached instances observed.
    pub fn max_attached(&self) -> usize {
        self.log.max_attached.load(Ordering::SeqCst)
    }

    /// Wait until at least `count` mounts have been recorded.
    pub async fn wait_for_mounts(&self, count: usize) {
        loop {
            let notified = self.log.notify.notified();
            if self.mounts().len() >= count {
                return;
            }
            notified.await;
        }
    }

    fn mount_delay(&self) -> Option<Duration> {
        *self.mount_delay.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ResolveComponent for RecordingHost {
    fn lookup(&self, name: &str) -> Option<Arc<ComponentDefinition>> {
        self.registry.lookup(name)
    }
}

impl Host for RecordingHost {
    fn register_component(&self, name: &str, definition: ComponentDefinition) {
        self.registry.register(name, definition);
    }

    fn query_selector(&self, layout: &ViewHandle, selector: &str) -> Option<ViewHandle> {
        self.elements
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&(layout.clone(), selector.to_string()))
            .cloned()
    }

    fn mount(
        &self,
        target: &ViewHandle,
        definition: ComponentDefinition,
        props: Props,
    ) -> BoxFuture<'_, Result<Box<dyn Instance>, HostError>> {
        let target = target.clone();
        Box::pin(async move {
            if let Some(delay) = self.mount_delay() {
                tokio::time::sleep(delay).await;
            }
            if self.fail_mount.load(Ordering::SeqCst) {
                return Err(HostError::new(format!("mount into {} refused", target)));
            }

            let mut ctx = SetupContext::with_props(props.clone());
            let bindings = definition.run_setup(&mut ctx);
            let child_routes = definition
                .children
                .iter()
                .map(|(key, child)| {
                    let mut child_ctx = SetupContext::default();
                    if let ComponentRef::Inline(child) = child {
                        child.run_setup(&mut child_ctx);
                    }
                    (key.clone(), child_ctx.route.map(|r| (*r).clone()))
                })
                .collect();

            let attached = self.log.attached.fetch_add(1, Ordering::SeqCst) + 1;
            self.log.max_attached.fetch_max(attached, Ordering::SeqCst);
            self.log.record(HostEvent::Mounted {
                target: target.to_string(),
                component: definition.name.clone(),
                props,
                route: ctx.route.map(|r| (*r).clone()),
                bindings,
                child_routes,
            });

            Ok(Box::new(RecordedInstance {
                target,
                component: definition.name,
                log: self.log.clone(),
                fail_unmount: self.fail_unmount.clone(),
            }) as Box<dyn Instance>)
        })
    }
}

struct RecordedInstance {
    target: ViewHandle,
    component: Option<String>,
    log: Arc<HostLog>,
    fail_unmount: Arc<AtomicBool>,
}

impl Instance for RecordedInstance {
    fn unmount(self: Box<Self>) -> BoxFuture<'static, Result<(), HostError>> {
        Box::pin(async move {
            // The instance is detached even when the host reports a failure.
            self.log.attached.fetch_sub(1, Ordering::SeqCst);
            self.log.record(HostEvent::Unmounted {
                target: self.target.to_string(),
                component: self.component.clone(),
            });
            if self.fail_unmount.load(Ordering::SeqCst) {
                return Err(HostError::new(format!("unmount from {} failed", self.target)));
            }
            Ok(())
        })
    }
}
