//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - A missing layout is left to `Router::new`, which reports it at construction
//! - An empty `query_param` or `view_selector` is accepted; `Router::new`
//!   substitutes the default for it

use std::collections::HashSet;
use std::fmt;

use crate::config::schema::{ComponentConfig, RouteConfig, RouterConfig};
use crate::location::RouteMode;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// Dotted location of the offending field.
    pub field: String,
    pub message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Check a parsed configuration.
pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.mode.parse::<RouteMode>().is_err() {
        errors.push(ValidationError::new(
            "mode",
            format!("unknown mode '{}', expected hash, query or history", config.mode),
        ));
    }

    let mut seen = HashSet::new();
    for (i, route) in config.routes.iter().enumerate() {
        let field = format!("routes[{}]", i);
        validate_route(&field, route, &mut errors);
        if !route.path.is_empty() && !seen.insert(route.path.as_str()) {
            errors.push(ValidationError::new(
                format!("{}.path", field),
                format!("duplicate route path '{}'", route.path),
            ));
        }
    }
    if let Some(route) = &config.default_route {
        validate_route("default_route", route, &mut errors);
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_route(field: &str, route: &RouteConfig, errors: &mut Vec<ValidationError>) {
    if route.path.is_empty() {
        errors.push(ValidationError::new(format!("{}.path", field), "must not be empty"));
    }
    match &route.component {
        None => errors.push(ValidationError::new(format!("{}.component", field), "is required")),
        Some(ComponentConfig::Name(name)) if name.is_empty() => {
            errors.push(ValidationError::new(format!("{}.component", field), "must not be empty"))
        }
        Some(_) => {}
    }
}
