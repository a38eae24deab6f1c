//! In-memory location port.
//!
//! Mirrors browser semantics closely enough to drive the router outside a
//! browser:
//! - assigning a URL that differs only in its fragment pushes an entry and
//!   raises `HashChange`; assigning the current URL does nothing
//! - `Push` / `Replace` update the history stack silently
//! - `back` / `forward` raise `PopState`, plus `HashChange` when the
//!   fragment differs between the two entries

use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::broadcast;
use url::Url;

use crate::location::{LocationError, LocationPort, LocationSnapshot, NavigationEvent, WriteMode};

const EVENT_CAPACITY: usize = 64;

#[derive(Debug)]
struct HistoryStack {
    entries: Vec<Url>,
    index: usize,
}

impl HistoryStack {
    fn current(&self) -> &Url {
        &self.entries[self.index]
    }

    fn push(&mut self, url: Url) {
        self.entries.truncate(self.index + 1);
        self.entries.push(url);
        self.index = self.entries.len() - 1;
    }

    fn replace(&mut self, url: Url) {
        self.entries[self.index] = url;
    }
}

/// Address and history state held in memory.
#[derive(Debug)]
pub struct MemoryLocation {
    history: Mutex<HistoryStack>,
    events: broadcast::Sender<NavigationEvent>,
}

impl MemoryLocation {
    /// Create a location positioned at `url`.
    pub fn new(url: &str) -> Result<Self, LocationError> {
        let url = Url::parse(url).map_err(|source| LocationError::InvalidTarget {
            target: url.to_string(),
            source,
        })?;
        let (events, _) = broadcast::channel(EVENT_CAPACITY);

        Ok(Self {
            history: Mutex::new(HistoryStack {
                entries: vec![url],
                index: 0,
            }),
            events,
        })
    }

    fn history(&self) -> MutexGuard<'_, HistoryStack> {
        self.history.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// The current address.
    pub fn href(&self) -> String {
        self.history().current().to_string()
    }

    /// Number of entries in the history stack.
    pub fn history_len(&self) -> usize {
        self.history().entries.len()
    }

    /// Step back one entry. Returns false at the start of history.
    pub fn back(&self) -> bool {
        self.traverse(-1)
    }

    /// Step forward one entry. Returns false at the end of history.
    pub fn forward(&self) -> bool {
        self.traverse(1)
    }

    fn traverse(&self, delta: isize) -> bool {
        let fragment_changed = {
            let mut history = self.history();
            let Some(target) = history.index.checked_add_signed(delta) else {
                return false;
            };
            if target >= history.entries.len() {
                return false;
            }
            let before = history.current().fragment().map(str::to_owned);
            history.index = target;
            before.as_deref() != history.current().fragment()
        };

        self.emit(NavigationEvent::PopState);
        if fragment_changed {
            self.emit(NavigationEvent::HashChange);
        }
        true
    }

    /// Simulate a user-initiated navigation event without changing the address.
    pub fn dispatch(&self, event: NavigationEvent) {
        self.emit(event);
    }

    fn emit(&self, event: NavigationEvent) {
        // No receivers simply means nobody is listening yet.
        let _ = self.events.send(event);
    }
}

impl LocationPort for MemoryLocation {
    fn snapshot(&self) -> LocationSnapshot {
        let history = self.history();
        let url = history.current();
        LocationSnapshot {
            href: url.to_string(),
            pathname: url.path().to_string(),
            search: url.query().unwrap_or_default().to_string(),
            hash: url.fragment().unwrap_or_default().to_string(),
        }
    }

    fn write(&self, target: &str, mode: WriteMode) -> Result<(), LocationError> {
        let hash_changed = {
            let mut history = self.history();
            let next = history
                .current()
                .join(target)
                .map_err(|source| LocationError::InvalidTarget {
                    target: target.to_string(),
                    source,
                })?;

            match mode {
                WriteMode::Push => {
                    history.push(next);
                    false
                }
                WriteMode::Replace => {
                    history.replace(next);
                    false
                }
                WriteMode::Assign => {
                    let current = history.current();
                    if next == *current {
                        false
                    } else {
                        let mut without_fragment = next.clone();
                        without_fragment.set_fragment(current.fragment());
                        let fragment_only = without_fragment == *current;
                        history.push(next);
                        fragment_only
                    }
                }
            }
        };

        tracing::debug!(location = target, ?mode, "Location written");
        if hash_changed {
            self.emit(NavigationEvent::HashChange);
        }
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<NavigationEvent> {
        self.events.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_fields() {
        let location = MemoryLocation::new("http://app.test/a/b?x=1#/c?d=2").unwrap();
        let snapshot = location.snapshot();
        assert_eq!(snapshot.pathname, "/a/b");
        assert_eq!(snapshot.search, "x=1");
        assert_eq!(snapshot.hash, "/c?d=2");
        assert_eq!(snapshot.href, "http://app.test/a/b?x=1#/c?d=2");
    }

    #[test]
    fn test_fragment_assign_raises_hashchange() {
        let location = MemoryLocation::new("http://app.test/").unwrap();
        let mut events = location.subscribe();

        location.write("#/about", WriteMode::Assign).unwrap();
        assert_eq!(events.try_recv().unwrap(), NavigationEvent::HashChange);

        // same fragment again: no entry, no event
        location.write("#/about", WriteMode::Assign).unwrap();
        assert!(events.try_recv().is_err());
        assert_eq!(location.history_len(), 2);
    }

    #[test]
    fn test_push_and_replace_are_silent() {
        let location = MemoryLocation::new("http://app.test/").unwrap();
        let mut events = location.subscribe();

        location.write("/about", WriteMode::Push).unwrap();
        location.write("/contact", WriteMode::Replace).unwrap();
        assert!(events.try_recv().is_err());
        assert_eq!(location.href(), "http://app.test/contact");
        assert_eq!(location.history_len(), 2);
    }

    #[test]
    fn test_traversal_events() {
        let location = MemoryLocation::new("http://app.test/").unwrap();
        location.write("#/a", WriteMode::Assign).unwrap();
        location.write("/other", WriteMode::Push).unwrap();
        let mut events = location.subscribe();

        assert!(location.back());
        assert_eq!(location.href(), "http://app.test/#/a");
        assert_eq!(events.try_recv().unwrap(), NavigationEvent::PopState);
        assert_eq!(events.try_recv().unwrap(), NavigationEvent::HashChange);

        assert!(location.back());
        assert!(!location.back());
        assert!(location.forward());
        assert!(location.forward());
        assert!(!location.forward());
    }

    #[test]
    fn test_push_truncates_forward_entries() {
        let location = MemoryLocation::new("http://app.test/").unwrap();
        location.write("/a", WriteMode::Push).unwrap();
        location.write("/b", WriteMode::Push).unwrap();
        location.back();
        location.write("/c", WriteMode::Push).unwrap();
        assert_eq!(location.history_len(), 3);
        assert!(!location.forward());
    }

    #[test]
    fn test_invalid_url() {
        assert!(MemoryLocation::new("not a url").is_err());
    }
}
