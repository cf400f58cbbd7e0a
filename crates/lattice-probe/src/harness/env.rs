//! The mock environment a test runs in.
//!
//! [`TestEnvironment::set_up`] binds a fresh object registry, a mock session
//! and a UI root to the current thread. Components built afterwards register
//! in that registry, and the harness finds the UI through it. The returned
//! [`EnvironmentGuard`] tears everything down when dropped, so each test
//! gets an isolated tree even when `cargo test` runs tests in parallel.
//!
//! # Example
//!
//! ```no_run
//! use lattice_probe::prelude::*;
//!
//! # fn main() -> HarnessResult<()> {
//! let _env = TestEnvironment::set_up(Routes::new().route("", |_| Label::new("Welcome")))?;
//! navigate("")?;
//! ui_expect_one(&SearchSpec::new().text("Welcome"))?;
//! # Ok(())
//! # }
//! ```

use std::any::Any;
use std::cell::RefCell;
use std::collections::HashMap;
use std::marker::PhantomData;
use std::rc::Rc;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use lattice_probe_core::logging::targets;
use lattice_probe_core::{
    ObjectError, SharedObjectRegistry, bind_thread_registry, unbind_thread_registry,
};
use parking_lot::RwLock;

use crate::component::widgets::UiRoot;
use crate::component::{Component, install};
use crate::config::HarnessConfig;
use crate::error::{HarnessError, HarnessResult};
use crate::harness::routes::{
    NavigationError, NavigationErrorKind, Routes, ViewRegistry, normalize,
};

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);

thread_local! {
    static ENVIRONMENT: RefCell<Option<MockUi>> = const { RefCell::new(None) };
}

/// Per-test session state.
///
/// Clones share the same attribute map.
#[derive(Clone)]
pub struct MockSession {
    id: u64,
    attributes: Arc<RwLock<HashMap<String, Arc<dyn Any + Send + Sync>>>>,
}

impl MockSession {
    fn new() -> Self {
        Self {
            id: NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed),
            attributes: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    /// Unique id of the session.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Store an attribute, replacing any previous value.
    pub fn set_attribute<T: Any + Send + Sync>(&self, name: impl Into<String>, value: T) {
        self.attributes.write().insert(name.into(), Arc::new(value));
    }

    /// An attribute, if present and of type `T`.
    pub fn attribute<T: Any + Send + Sync + Clone>(&self, name: &str) -> Option<T> {
        self.attributes
            .read()
            .get(name)
            .and_then(|value| value.downcast_ref::<T>())
            .cloned()
    }

    /// Remove an attribute, returning whether it existed.
    pub fn remove_attribute(&self, name: &str) -> bool {
        self.attributes.write().remove(name).is_some()
    }

    /// Names of all attributes, sorted.
    pub fn attribute_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.attributes.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for MockSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockSession")
            .field("id", &self.id)
            .field("attributes", &self.attribute_names())
            .finish()
    }
}

/// Everything bound to a test thread.
struct MockUi {
    registry: Arc<SharedObjectRegistry>,
    root: Arc<UiRoot>,
    routes: Rc<dyn ViewRegistry>,
    session: MockSession,
    config: HarnessConfig,
    location: Option<String>,
}

fn with_ui<R>(f: impl FnOnce(&mut MockUi) -> R) -> HarnessResult<R> {
    ENVIRONMENT.with(|slot| match slot.borrow_mut().as_mut() {
        Some(ui) => Ok(f(ui)),
        None => Err(HarnessError::EnvironmentNotSetUp),
    })
}

/// Entry point for setting up the mock environment.
pub struct TestEnvironment;

impl TestEnvironment {
    /// Set up the environment with the given routes and the configuration
    /// from [`HarnessConfig::from_env`].
    pub fn set_up(routes: impl ViewRegistry + 'static) -> HarnessResult<EnvironmentGuard> {
        Self::builder().routes(routes).set_up()
    }

    /// Start configuring an environment.
    pub fn builder() -> TestEnvironmentBuilder {
        TestEnvironmentBuilder::default()
    }

    /// Whether an environment is set up on this thread.
    pub fn is_set_up() -> bool {
        ENVIRONMENT.with(|slot| slot.borrow().is_some())
    }

    /// Destroy the UI and unbind the registry from this thread.
    ///
    /// Does nothing when no environment is set up.
    pub fn tear_down() {
        let Some(ui) = ENVIRONMENT.with(|slot| slot.borrow_mut().take()) else {
            return;
        };
        let object_count = ui.registry.object_count();
        ui.registry.clear();
        let _ = unbind_thread_registry();
        tracing::info!(
            target: targets::ENVIRONMENT,
            session = ui.session.id(),
            object_count,
            "test environment torn down"
        );
    }
}

/// Builder for [`TestEnvironment`].
#[derive(Default)]
pub struct TestEnvironmentBuilder {
    config: Option<HarnessConfig>,
    routes: Option<Rc<dyn ViewRegistry>>,
}

impl TestEnvironmentBuilder {
    /// Use this configuration instead of reading it from the environment.
    pub fn config(mut self, config: HarnessConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Use these routes. Defaults to an empty [`Routes`].
    pub fn routes(mut self, routes: impl ViewRegistry + 'static) -> Self {
        self.routes = Some(Rc::new(routes));
        self
    }

    /// Bind the environment to the current thread.
    ///
    /// Fails with [`HarnessError::EnvironmentAlreadySetUp`] if this thread
    /// already has one.
    pub fn set_up(self) -> HarnessResult<EnvironmentGuard> {
        if TestEnvironment::is_set_up() {
            return Err(HarnessError::EnvironmentAlreadySetUp);
        }
        let config = match self.config {
            Some(config) => config,
            None => HarnessConfig::from_env()?,
        };
        let routes = self.routes.unwrap_or_else(|| Rc::new(Routes::new()));

        let registry = Arc::new(SharedObjectRegistry::new());
        bind_thread_registry(registry.clone()).map_err(|err| match err {
            ObjectError::RegistryAlreadyBound => HarnessError::EnvironmentAlreadySetUp,
            other => other.into(),
        })?;

        let root = match install(UiRoot::new()) {
            Ok(root) => root,
            Err(err) => {
                let _ = unbind_thread_registry();
                return Err(err);
            }
        };

        let session = MockSession::new();
        tracing::info!(
            target: targets::ENVIRONMENT,
            session = session.id(),
            routes = ?routes.templates(),
            "test environment set up"
        );
        ENVIRONMENT.with(|slot| {
            *slot.borrow_mut() = Some(MockUi {
                registry,
                root,
                routes,
                session,
                config,
                location: None,
            })
        });

        Ok(EnvironmentGuard {
            _thread_bound: PhantomData,
        })
    }
}

/// Tears the environment down when dropped.
#[must_use = "the environment is torn down as soon as the guard is dropped"]
pub struct EnvironmentGuard {
    _thread_bound: PhantomData<*const ()>,
}

impl Drop for EnvironmentGuard {
    fn drop(&mut self) {
        TestEnvironment::tear_down();
    }
}

impl std::fmt::Debug for EnvironmentGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EnvironmentGuard").finish()
    }
}

/// The UI root of the current environment.
pub fn ui_root() -> HarnessResult<Arc<UiRoot>> {
    with_ui(|ui| ui.root.clone())
}

/// The registry of the current environment.
pub fn registry() -> HarnessResult<Arc<SharedObjectRegistry>> {
    with_ui(|ui| ui.registry.clone())
}

/// The session of the current environment.
pub fn session() -> HarnessResult<MockSession> {
    with_ui(|ui| ui.session.clone())
}

/// The configuration of the current environment, or the defaults when none
/// is set up.
pub fn config() -> HarnessConfig {
    with_ui(|ui| ui.config.clone()).unwrap_or_default()
}

/// The view currently shown.
pub fn current_view() -> HarnessResult<Option<Arc<dyn Component>>> {
    Ok(ui_root()?.content())
}

/// The location last navigated to.
pub fn current_location() -> HarnessResult<Option<String>> {
    with_ui(|ui| ui.location.clone())
}

/// Navigate to a location and show the resulting view.
///
/// An unknown location shows the view of the `NotFound` error handler, and a
/// failing view factory the one of the `ViewFailed` handler. Without a
/// matching handler the navigation fails: with
/// [`HarnessError::RouteNotFound`] for unknown locations, and with the
/// factory's own error otherwise. The previous view is destroyed only once
/// the new one exists.
pub fn navigate(location: &str) -> HarnessResult<Arc<dyn Component>> {
    let (routes, root) = with_ui(|ui| (ui.routes.clone(), ui.root.clone()))?;
    let normalized = normalize(location).to_string();

    let view = match routes.resolve(&normalized) {
        Some(resolved) => match (resolved.factory)(&resolved.parameters) {
            Ok(view) => view,
            Err(err) => {
                let error = NavigationError {
                    kind: NavigationErrorKind::ViewFailed,
                    location: normalized.clone(),
                    message: err.to_string(),
                };
                match routes.error_handler(NavigationErrorKind::ViewFailed) {
                    Some(handler) => handler(&error)?,
                    None => return Err(err),
                }
            }
        },
        None => {
            let error = NavigationError {
                kind: NavigationErrorKind::NotFound,
                location: normalized.clone(),
                message: "no route matches".to_string(),
            };
            match routes.error_handler(NavigationErrorKind::NotFound) {
                Some(handler) => handler(&error)?,
                None => {
                    return Err(HarnessError::RouteNotFound {
                        location: normalized,
                        available: routes.templates(),
                    });
                }
            }
        }
    };

    root.set_content(view.clone())?;
    tracing::info!(
        target: targets::ENVIRONMENT,
        location = %normalized,
        view = %view.base().type_label(),
        "navigated"
    );
    with_ui(|ui| ui.location = Some(normalized))?;
    Ok(view)
}
