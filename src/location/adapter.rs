//! Mode-specific reading and writing of the logical route.
//!
//! # Encodings
//! ```text
//! Hash:    https://app.example/#/users/42?tab=posts
//! Query:   https://app.example/?page=%2Fusers%2F42&tab=posts
//! History: https://app.example/users/42?tab=posts
//! ```
//! All three read as `path = /users/42`, `query_string = tab=posts`.

use url::form_urlencoded;

use crate::location::{LocationError, LocationPort, LocationSnapshot, RouteMode, WriteMode};

/// Canonical route triple extracted from the address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    /// Logical path, always starting with `/`.
    pub path: String,
    /// Query payload without `?`; in query mode the routing key is removed.
    pub query_string: String,
    /// The complete address.
    pub full_url: String,
}

/// Who is responsible for re-resolving the route after a write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Nothing left for the caller: the port raises a navigation event on
    /// its own, or the address was already at the target.
    Automatic,
    /// The write was silent; the caller must re-resolve.
    Manual,
}

/// Maps between one URL encoding and the canonical route triple.
#[derive(Debug, Clone)]
pub struct ModeAdapter {
    mode: RouteMode,
    query_param: String,
}

impl ModeAdapter {
    /// Create an adapter; `query_param` is only consulted in query mode.
    pub fn new(mode: RouteMode, query_param: impl Into<String>) -> Self {
        Self {
            mode,
            query_param: query_param.into(),
        }
    }

    pub fn mode(&self) -> RouteMode {
        self.mode
    }

    pub fn query_param(&self) -> &str {
        &self.query_param
    }

    /// Extract the canonical route triple from an address snapshot.
    pub fn read(&self, snapshot: &LocationSnapshot) -> Location {
        let (path, query_string) = match self.mode {
            RouteMode::Hash => {
                let (path, query) = snapshot
                    .hash
                    .split_once('?')
                    .unwrap_or((snapshot.hash.as_str(), ""));
                (path.to_string(), query.to_string())
            }
            RouteMode::Query => {
                let mut path = None;
                let mut rest = form_urlencoded::Serializer::new(String::new());
                for (key, value) in form_urlencoded::parse(snapshot.search.as_bytes()) {
                    if key == self.query_param.as_str() {
                        path.get_or_insert(value.into_owned());
                    } else {
                        rest.append_pair(&key, &value);
                    }
                }
                (path.unwrap_or_default(), rest.finish())
            }
            RouteMode::History => (snapshot.pathname.clone(), snapshot.search.clone()),
        };

        Location {
            path: normalize_path(path),
            query_string,
            full_url: snapshot.href.clone(),
        }
    }

    /// Write `path` back into the address state.
    pub fn write(&self, port: &dyn LocationPort, path: &str) -> Result<Resolution, LocationError> {
        let is_root = path.is_empty() || path == "/";

        match self.mode {
            RouteMode::Hash if is_root => {
                let snapshot = port.snapshot();
                if snapshot.hash.is_empty() {
                    return Ok(Resolution::Automatic);
                }
                // Drop the fragment entirely instead of leaving a bare `#`.
                port.write(&path_and_search(&snapshot.pathname, &snapshot.search), WriteMode::Replace)?;
                Ok(Resolution::Manual)
            }
            RouteMode::Hash => {
                port.write(&format!("#{}", path), WriteMode::Assign)?;
                Ok(Resolution::Automatic)
            }
            RouteMode::Query => {
                let snapshot = port.snapshot();
                let mut pairs: Vec<(String, String)> =
                    form_urlencoded::parse(snapshot.search.as_bytes()).into_owned().collect();
                if is_root {
                    pairs.retain(|(key, _)| *key != self.query_param);
                } else {
                    set_pair(&mut pairs, &self.query_param, path);
                }
                let search = form_urlencoded::Serializer::new(String::new())
                    .extend_pairs(pairs)
                    .finish();
                port.write(&path_and_search(&snapshot.pathname, &search), WriteMode::Push)?;
                Ok(Resolution::Manual)
            }
            RouteMode::History => {
                port.write(path, WriteMode::Push)?;
                Ok(Resolution::Manual)
            }
        }
    }
}

fn normalize_path(path: String) -> String {
    if path.is_empty() {
        "/".to_string()
    } else if path.starts_with('/') {
        path
    } else {
        format!("/{}", path)
    }
}

fn path_and_search(pathname: &str, search: &str) -> String {
    if search.is_empty() {
        pathname.to_string()
    } else {
        format!("{}?{}", pathname, search)
    }
}

/// `URLSearchParams::set`: overwrite the first occurrence, drop the rest,
/// append when absent.
fn set_pair(pairs: &mut Vec<(String, String)>, key: &str, value: &str) {
    let mut seen = false;
    pairs.retain_mut(|(k, v)| {
        if k.as_str() != key {
            return true;
        }
        if seen {
            return false;
        }
        seen = true;
        *v = value.to_string();
        true
    });
    if !seen {
        pairs.push((key.to_string(), value.to_string()));
    }
}
