//! Path pattern compilation.
//!
//! # Responsibilities
//! - Split a declarative pattern (`/users/:id`, `/files/:path*`) into segments
//! - Validate route definitions before they enter the route table
//!
//! # Design Decisions
//! - Empty tokens are dropped, so leading, trailing and doubled slashes are
//!   insignificant
//! - A catch-all is accepted anywhere, but matching stops at the first one:
//!   segments after it are unreachable

use std::fmt;

use crate::component::{ComponentRef, Props};
use crate::error::{RouterError, RouterResult};

/// One `/`-delimited token of a pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Must equal the path segment byte-for-byte.
    Static { value: String },
    /// Binds exactly one path segment.
    Param { name: String },
    /// Binds every remaining path segment, joined by `/`.
    CatchAllParam { name: String },
}

impl Segment {
    fn classify(token: &str) -> Self {
        match token.strip_prefix(':') {
            Some(name) => match name.strip_suffix('*') {
                Some(base) => Segment::CatchAllParam {
                    name: base.to_string(),
                },
                None => Segment::Param {
                    name: name.to_string(),
                },
            },
            None => Segment::Static {
                value: token.to_string(),
            },
        }
    }

    /// Returns true for a catch-all parameter.
    pub fn is_catch_all(&self) -> bool {
        matches!(self, Segment::CatchAllParam { .. })
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Static { value } => write!(f, "{}", value),
            Segment::Param { name } => write!(f, ":{}", name),
            Segment::CatchAllParam { name } => write!(f, ":{}*", name),
        }
    }
}

/// Compile a path pattern into its segment list.
pub fn compile(pattern: &str) -> RouterResult<Vec<Segment>> {
    if pattern.is_empty() {
        return Err(RouterError::InvalidPattern(pattern.to_string()));
    }

    Ok(pattern
        .split('/')
        .filter(|token| !token.is_empty())
        .map(Segment::classify)
        .collect())
}

/// A route as supplied by the application.
#[derive(Debug, Clone, Default)]
pub struct RouteDefinition {
    /// Path pattern, e.g. `/users/:id`.
    pub path: String,
    /// Component to mount when the route matches.
    pub component: Option<ComponentRef>,
    /// Static props passed to the mount call.
    pub props: Props,
}

impl RouteDefinition {
    /// Create a route definition without props.
    pub fn new(path: impl Into<String>, component: impl Into<ComponentRef>) -> Self {
        Self {
            path: path.into(),
            component: Some(component.into()),
            props: Props::new(),
        }
    }

    /// Attach static props.
    pub fn with_props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }
}

/// A compiled, immutable route.
#[derive(Debug, Clone)]
pub struct RoutePattern {
    raw_path: String,
    segments: Vec<Segment>,
    component: ComponentRef,
    props: Props,
}

impl RoutePattern {
    /// Validate and compile a route definition.
    pub fn from_definition(definition: RouteDefinition) -> RouterResult<Self> {
        if definition.path.is_empty() {
            return Err(RouterError::InvalidRoute { missing: "path" });
        }
        let component = match definition.component {
            Some(component) if !component.is_empty() => component,
            _ => return Err(RouterError::InvalidRoute { missing: "component" }),
        };
        let segments = compile(&definition.path)?;

        Ok(Self {
            raw_path: definition.path,
            segments,
            component,
            props: definition.props,
        })
    }

    /// The pattern exactly as registered.
    pub fn raw_path(&self) -> &str {
        &self.raw_path
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn component(&self) -> &ComponentRef {
        &self.component
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Only the literal `/` pattern is the root route.
    pub fn is_root(&self) -> bool {
        self.raw_path == "/"
    }

    /// Whether any segment is a catch-all.
    pub fn has_catch_all(&self) -> bool {
        self.segments.iter().any(Segment::is_catch_all)
    }
}
