//! Route matching logic.
//!
//! # Responsibilities
//! - Resolve an incoming path against the registered routes
//! - Bind parameter and catch-all values
//! - Substitute parameters into navigation targets
//!
//! # Design Decisions
//! - `/` is matched by exact string only
//! - Registration order is the tie-break: `/users/:id` registered before
//!   `/users/new` shadows it
//! - A candidate that fails while matching is logged and skipped; it never
//!   aborts the whole lookup

use std::collections::HashSet;
use std::sync::Arc;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::{RouterError, RouterResult};
use crate::routing::pattern::{RoutePattern, Segment};
use crate::routing::Params;

/// Characters escaped by `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// A successful match.
#[derive(Debug, Clone)]
pub struct MatchResult {
    pub route: Arc<RoutePattern>,
    pub params: Params,
}

/// Find the first route matching `path`.
pub fn match_route(routes: &[Arc<RoutePattern>], path: &str) -> Option<MatchResult> {
    if path.is_empty() {
        tracing::warn!("Empty path provided to match_route");
        return None;
    }

    if path == "/" {
        return routes.iter().find(|route| route.is_root()).map(|route| MatchResult {
            route: route.clone(),
            params: Params::new(),
        });
    }

    let path_segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

    for route in routes.iter().filter(|route| !route.is_root()) {
        match match_candidate(route, &path_segments) {
            Ok(Some(params)) => {
                return Some(MatchResult {
                    route: route.clone(),
                    params,
                })
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Skipping route candidate"),
        }
    }

    None
}

fn match_candidate(route: &RoutePattern, path_segments: &[&str]) -> RouterResult<Option<Params>> {
    let segments = route.segments();
    if !route.has_catch_all() && segments.len() != path_segments.len() {
        return Ok(None);
    }

    let mut params = Params::new();
    for (i, segment) in segments.iter().enumerate() {
        let Some(path_segment) = path_segments.get(i) else {
            return Ok(None);
        };

        match segment {
            Segment::Static { value } => {
                if value != path_segment {
                    return Ok(None);
                }
            }
            Segment::Param { name } => {
                params.insert(binding_name(route, name)?, (*path_segment).to_string());
            }
            Segment::CatchAllParam { name } => {
                params.insert(binding_name(route, name)?, path_segments[i..].join("/"));
                return Ok(Some(params));
            }
        }
    }

    Ok(Some(params))
}

fn binding_name(route: &RoutePattern, name: &str) -> RouterResult<String> {
    if name.is_empty() {
        return Err(RouterError::Match {
            pattern: route.raw_path().to_string(),
            reason: "parameter has no name".to_string(),
        });
    }
    Ok(name.to_string())
}

/// Replace the first `:name` placeholder for each parameter with its
/// percent-encoded value.
///
/// A placeholder is `:` followed by the longest run of ASCII alphanumerics
/// and `_`, so `:ab` is never mistaken for `:a` followed by `b`. Placeholders
/// without a matching parameter are left as written.
pub fn substitute_params(path: &str, params: &Params) -> String {
    let mut out = String::with_capacity(path.len());
    let mut used = HashSet::new();
    let mut rest = path;

    while let Some(colon) = rest.find(':') {
        out.push_str(&rest[..colon]);
        let after = &rest[colon + 1..];
        let len = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        let name = &after[..len];

        match params.get(name) {
            Some(value) if !name.is_empty() && used.insert(name) => {
                out.extend(utf8_percent_encode(value, COMPONENT));
            }
            _ => {
                out.push(':');
                out.push_str(name);
            }
        }
        rest = &after[len..];
    }
    out.push_str(rest);
    out
}
