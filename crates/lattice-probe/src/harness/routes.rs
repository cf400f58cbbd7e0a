//! Route registry.
//!
//! A [`ViewRegistry`] maps a location such as `person/42?tab=orders` to a
//! view factory. [`Routes`] is the stock implementation: templates made of
//! literal segments and `:name` parameters, tried in registration order,
//! plus error views keyed by [`NavigationErrorKind`].
//!
//! # Example
//!
//! ```no_run
//! use lattice_probe::prelude::*;
//!
//! let routes = Routes::new()
//!     .route("", |_| Label::new("Welcome"))
//!     .route("person/:id", |params| {
//!         Label::new(format!("Person {}", params.get("id").unwrap_or("?")))
//!     })
//!     .on_error(NavigationErrorKind::NotFound, |err| {
//!         Label::new(format!("No page at {}", err.location))
//!     });
//! # let _ = routes;
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::component::{Component, install};
use crate::error::HarnessResult;

/// Builds the view for a resolved route.
pub type ViewFactory = Arc<dyn Fn(&RouteParameters) -> HarnessResult<Arc<dyn Component>>>;

/// Builds the view shown for a navigation error.
pub type ErrorHandler = Arc<dyn Fn(&NavigationError) -> HarnessResult<Arc<dyn Component>>>;

/// Parameters extracted from a location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParameters {
    location: String,
    template: String,
    path: HashMap<String, String>,
    query: Vec<(String, String)>,
}

impl RouteParameters {
    /// The normalized location that was navigated to.
    pub fn location(&self) -> &str {
        &self.location
    }

    /// The template that matched.
    pub fn template(&self) -> &str {
        &self.template
    }

    /// A `:name` path parameter.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.path.get(name).map(String::as_str)
    }

    /// The first value of a query parameter.
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Every value of a query parameter, in order.
    pub fn query_all(&self, name: &str) -> Vec<&str> {
        self.query
            .iter()
            .filter(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
            .collect()
    }
}

/// What went wrong during navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavigationErrorKind {
    /// No route matches the location.
    NotFound,
    /// The view factory failed.
    ViewFailed,
}

/// A navigation failure handed to an error handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationError {
    pub kind: NavigationErrorKind,
    /// The normalized location.
    pub location: String,
    pub message: String,
}

impl fmt::Display for NavigationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?} at '{}': {}", self.kind, self.location, self.message)
    }
}

/// A route resolved for a location.
#[derive(Clone)]
pub struct ResolvedRoute {
    pub factory: ViewFactory,
    pub parameters: RouteParameters,
}

/// Maps locations to views.
pub trait ViewRegistry {
    /// Find the route for a normalized location.
    fn resolve(&self, location: &str) -> Option<ResolvedRoute>;

    /// The handler for a kind of navigation error, if one is registered.
    fn error_handler(&self, kind: NavigationErrorKind) -> Option<ErrorHandler>;

    /// The registered templates, for diagnostics.
    fn templates(&self) -> Vec<String>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

struct Route {
    template: String,
    segments: Vec<Segment>,
    factory: ViewFactory,
}

/// Template-based [`ViewRegistry`].
#[derive(Default)]
pub struct Routes {
    routes: Vec<Route>,
    error_handlers: HashMap<NavigationErrorKind, ErrorHandler>,
}

impl Routes {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a view for a template.
    pub fn route<C, F>(self, template: &str, make: F) -> Self
    where
        C: Component,
        F: Fn(&RouteParameters) -> C + 'static,
    {
        self.try_route(template, move |params| Ok(make(params)))
    }

    /// Register a view whose construction can fail.
    ///
    /// A failure is reported as [`NavigationErrorKind::ViewFailed`].
    pub fn try_route<C, F>(mut self, template: &str, make: F) -> Self
    where
        C: Component,
        F: Fn(&RouteParameters) -> HarnessResult<C> + 'static,
    {
        let factory: ViewFactory = Arc::new(move |params: &RouteParameters| -> HarnessResult<Arc<dyn Component>> {
            Ok(install(make(params)?)?)
        });
        self.routes.push(Route {
            template: normalize(template).to_string(),
            segments: parse_template(template),
            factory,
        });
        self
    }

    /// Register the view shown for a kind of navigation error.
    pub fn on_error<C, F>(mut self, kind: NavigationErrorKind, make: F) -> Self
    where
        C: Component,
        F: Fn(&NavigationError) -> C + 'static,
    {
        let handler: ErrorHandler = Arc::new(move |error: &NavigationError| -> HarnessResult<Arc<dyn Component>> {
            Ok(install(make(error))?)
        });
        self.error_handlers.insert(kind, handler);
        self
    }

    /// Shorthand for [`Routes::on_error`] with [`NavigationErrorKind::NotFound`].
    pub fn not_found<C, F>(self, make: F) -> Self
    where
        C: Component,
        F: Fn(&NavigationError) -> C + 'static,
    {
        self.on_error(NavigationErrorKind::NotFound, make)
    }
}

impl fmt::Debug for Routes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Routes")
            .field("templates", &self.templates())
            .field("error_handlers", &self.error_handlers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ViewRegistry for Routes {
    fn resolve(&self, location: &str) -> Option<ResolvedRoute> {
        let (path, query) = split_location(location);
        let parts: Vec<&str> = path.split('/').filter(|part| !part.is_empty()).collect();

        self.routes.iter().find_map(|route| {
            let path = match_segments(&route.segments, &parts)?;
            Some(ResolvedRoute {
                factory: route.factory.clone(),
                parameters: RouteParameters {
                    location: normalize(location).to_string(),
                    template: route.template.clone(),
                    path,
                    query: parse_query(query),
                },
            })
        })
    }

    fn error_handler(&self, kind: NavigationErrorKind) -> Option<ErrorHandler> {
        self.error_handlers.get(&kind).cloned()
    }

    fn templates(&self) -> Vec<String> {
        self.routes.iter().map(|route| route.template.clone()).collect()
    }
}

/// Strip surrounding slashes and whitespace.
pub fn normalize(location: &str) -> &str {
    location.trim().trim_matches('/')
}

fn split_location(location: &str) -> (&str, &str) {
    let location = normalize(location);
    match location.split_once('?') {
        Some((path, query)) => (path, query),
        None => (location, ""),
    }
}

fn parse_template(template: &str) -> Vec<Segment> {
    normalize(template)
        .split('/')
        .filter(|part| !part.is_empty())
        .map(|part| match part.strip_prefix(':') {
            Some(name) => Segment::Param(name.to_string()),
            None => Segment::Literal(part.to_string()),
        })
        .collect()
}

fn match_segments(segments: &[Segment], parts: &[&str]) -> Option<HashMap<String, String>> {
    if segments.len() != parts.len() {
        return None;
    }
    let mut params = HashMap::new();
    for (segment, part) in segments.iter().zip(parts) {
        match segment {
            Segment::Literal(literal) if literal == part => {}
            Segment::Literal(_) => return None,
            Segment::Param(name) => {
                params.insert(name.clone(), (*part).to_string());
            }
        }
    }
    Some(params)
}

fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .map(|pair| match pair.split_once('=') {
            Some((key, value)) => (key.to_string(), value.to_string()),
            None => (pair.to_string(), String::new()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::widgets::Label;
    use crate::harness::env::TestEnvironment;

    #[test]
    fn test_template_matching() {
        let routes = Routes::new()
            .route("", |_| Label::new("home"))
            .route("/person/:id/", |_| Label::new("person"))
            .route("person/new", |_| Label::new("unreachable"));

        let home = routes.resolve("/").unwrap();
        assert_eq!(home.parameters.template(), "");

        let person = routes.resolve("person/42?tab=orders&tab=notes&flag").unwrap();
        assert_eq!(person.parameters.template(), "person/:id");
        assert_eq!(person.parameters.get("id"), Some("42"));
        assert_eq!(person.parameters.query("tab"), Some("orders"));
        assert_eq!(person.parameters.query_all("tab"), vec!["orders", "notes"]);
        assert_eq!(person.parameters.query("flag"), Some(""));
        assert_eq!(person.parameters.location(), "person/42?tab=orders&tab=notes&flag");

        // First registered template wins.
        assert_eq!(routes.resolve("person/new").unwrap().parameters.get("id"), Some("new"));

        assert!(routes.resolve("person").is_none());
        assert!(routes.resolve("person/1/2").is_none());
    }

    #[test]
    fn test_factories_install_views() {
        let _env = TestEnvironment::set_up(Routes::new()).unwrap();
        let routes = Routes::new()
            .route("greet/:name", |params| Label::new(format!("Hello {}", params.get("name").unwrap_or("?"))))
            .not_found(|err| Label::new(format!("missing {}", err.location)));

        let resolved = routes.resolve("greet/ada").unwrap();
        let view = (resolved.factory)(&resolved.parameters).unwrap();
        assert_eq!(view.text().as_deref(), Some("Hello ada"));

        let handler = routes.error_handler(NavigationErrorKind::NotFound).unwrap();
        let error = NavigationError {
            kind: NavigationErrorKind::NotFound,
            location: "nowhere".to_string(),
            message: "no route".to_string(),
        };
        assert_eq!(handler(&error).unwrap().text().as_deref(), Some("missing nowhere"));
        assert!(routes.error_handler(NavigationErrorKind::ViewFailed).is_none());
        assert_eq!(routes.templates(), vec!["greet/:name"]);
    }
}
