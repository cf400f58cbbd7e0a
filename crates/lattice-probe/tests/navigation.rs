//! Tests for routing, custom views and the mock session.

use std::sync::Arc;

use lattice_probe::harness::current_location;
use lattice_probe::prelude::*;

/// A view assembled from stock widgets.
struct LoginView {
    base: ComponentBase,
    user: Arc<TextField>,
    log_in: Arc<Button>,
}

impl LoginView {
    fn new() -> HarnessResult<Self> {
        let base = ComponentBase::new::<Self>();
        let form = base.add_child(VerticalLayout::new())?;
        let user = form.add(TextField::new("User").with_placeholder("name@example.com"))?;
        let log_in = form.add(Button::new("Log in"))?;

        let field = user.clone();
        log_in.clicked.connect(move |_| {
            if let Ok(session) = session() {
                session.set_attribute("user", field.value());
            }
        });

        Ok(Self { base, user, log_in })
    }
}

impl Object for LoginView {
    fn object_id(&self) -> ObjectId {
        self.base.id()
    }
}

impl Component for LoginView {
    fn base(&self) -> &ComponentBase {
        &self.base
    }

    fn caption(&self) -> Option<String> {
        Some("Login".to_string())
    }
}

fn app_routes() -> Routes {
    Routes::new()
        .try_route("", |_| LoginView::new())
        .route("welcome", |_| {
            let user = session()
                .ok()
                .and_then(|session| session.attribute::<String>("user"))
                .unwrap_or_else(|| "stranger".to_string());
            Label::new(format!("Welcome, {user}"))
        })
        .route("orders/:id", |params| {
            Label::new(format!(
                "Order {} ({})",
                params.get("id").unwrap_or_default(),
                params.query("tab").unwrap_or("summary")
            ))
        })
        .try_route("broken", |_| -> HarnessResult<Label> {
            Err(HarnessError::unsupported("backend offline"))
        })
}

#[test]
fn test_login_flow_through_the_session() {
    let _env = TestEnvironment::set_up(app_routes()).unwrap();

    let view = navigate("/").unwrap();
    assert_eq!(view.caption().as_deref(), Some("Login"));
    let login = ui_find1_as::<LoginView>(&SearchSpec::new()).unwrap();
    assert!(Arc::ptr_eq(&login.user, &ui_find1_as::<TextField>(&SearchSpec::new().placeholder("name@example.com")).unwrap()));

    login.user.user_set_value("ada").unwrap();
    login.log_in.user_click().unwrap();
    assert_eq!(session().unwrap().attribute::<String>("user").as_deref(), Some("ada"));

    let welcome = navigate("welcome").unwrap();
    assert_eq!(welcome.text().as_deref(), Some("Welcome, ada"));
    assert_eq!(current_location().unwrap().as_deref(), Some("welcome"));
    ui_expect_none(&SearchSpec::of::<LoginView>()).unwrap();
}

#[test]
fn test_path_and_query_parameters() {
    let _env = TestEnvironment::set_up(app_routes()).unwrap();

    navigate("orders/17?tab=lines").unwrap();
    ui_expect_one(&SearchSpec::of::<Label>().text("Order 17 (lines)")).unwrap();

    navigate("/orders/18/").unwrap();
    ui_expect_one(&SearchSpec::of::<Label>().text("Order 18 (summary)")).unwrap();
    assert_eq!(current_location().unwrap().as_deref(), Some("orders/18"));
}

#[test]
fn test_unknown_route_without_handler() {
    let _env = TestEnvironment::set_up(app_routes()).unwrap();
    navigate("").unwrap();

    let err = navigate("nowhere").unwrap_err();
    match err {
        HarnessError::RouteNotFound { location, available } => {
            assert_eq!(location, "nowhere");
            assert_eq!(available, vec!["", "welcome", "orders/:id", "broken"]);
        }
        other => panic!("unexpected error: {other}"),
    }
    // The previous view stays in place.
    assert!(current_view().unwrap().is_some());
    ui_expect_one(&SearchSpec::of::<LoginView>()).unwrap();
}

#[test]
fn test_error_views() {
    let routes = app_routes()
        .not_found(|err| Label::new(format!("Nothing at '{}'", err.location)))
        .on_error(NavigationErrorKind::ViewFailed, |err| Label::new(err.message.clone()));
    let _env = TestEnvironment::set_up(routes).unwrap();

    let view = navigate("missing/page").unwrap();
    assert_eq!(view.text().as_deref(), Some("Nothing at 'missing/page'"));

    let view = navigate("broken").unwrap();
    assert_eq!(view.text().as_deref(), Some("Unsupported operation: backend offline"));
}

#[test]
fn test_failing_view_without_handler_returns_its_error() {
    let _env = TestEnvironment::set_up(app_routes()).unwrap();

    let err = navigate("broken").unwrap_err();
    assert!(matches!(err, HarnessError::Unsupported { .. }));
    assert!(current_view().unwrap().is_none());
}

#[test]
fn test_sessions_do_not_leak_between_environments() {
    let first_id = {
        let _env = TestEnvironment::set_up(Routes::new()).unwrap();
        let session = session().unwrap();
        session.set_attribute("cart", vec![1u32, 2, 3]);
        assert_eq!(session.attribute::<Vec<u32>>("cart"), Some(vec![1, 2, 3]));
        session.id()
    };

    let _env = TestEnvironment::set_up(Routes::new()).unwrap();
    let session = session().unwrap();
    assert_ne!(session.id(), first_id);
    assert!(session.attribute::<Vec<u32>>("cart").is_none());
    assert!(session.attribute_names().is_empty());
}
