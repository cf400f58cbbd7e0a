//! Simulated user interactions.
//!
//! An interaction goes through three steps: the interactability guard, the
//! construction of the native event (always marked as coming from the
//! client), and [`fire_event`], which hands the event to the component's
//! own listener chain. Nothing here touches listeners directly, so the
//! application code under test runs exactly as it would for a real user.

use lattice_probe_core::logging::targets;

use crate::component::{
    Component, ComponentEvent, KeyboardModifiers, MouseButton, Value,
};
use crate::error::{HarnessError, HarnessResult};
use crate::harness::env;
use crate::harness::guard::assert_editable;
use crate::harness::state::describe;

/// One kind of user action.
#[derive(Debug, Clone, PartialEq)]
pub enum Interaction {
    /// A mouse click on the component.
    Click {
        button: MouseButton,
        modifiers: KeyboardModifiers,
        click_count: u32,
    },
    /// A value typed or picked by the user.
    ValueChange { value: Value },
    /// A click on a grid row.
    ItemClick {
        row: usize,
        column: Option<String>,
        button: MouseButton,
        modifiers: KeyboardModifiers,
        click_count: u32,
    },
    /// A click on a button rendered in a grid cell.
    RendererClick { row: usize, column: String },
}

impl Interaction {
    /// A plain left click.
    pub fn click() -> Self {
        Self::Click {
            button: MouseButton::Left,
            modifiers: KeyboardModifiers::NONE,
            click_count: 1,
        }
    }

    /// Short name of the interaction kind.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Click { .. } => "click",
            Self::ValueChange { .. } => "value change",
            Self::ItemClick { .. } => "item click",
            Self::RendererClick { .. } => "renderer click",
        }
    }

    /// The native event a real client would send for this interaction.
    fn into_event(self) -> ComponentEvent {
        match self {
            Self::Click {
                button,
                modifiers,
                click_count,
            } => ComponentEvent::Click(crate::component::ClickEvent {
                button,
                modifiers,
                click_count,
                from_client: true,
            }),
            Self::ValueChange { value } => ComponentEvent::ValueChange {
                value,
                from_client: true,
            },
            Self::ItemClick {
                row,
                column,
                button,
                modifiers,
                click_count,
            } => ComponentEvent::ItemClick {
                row,
                column,
                button,
                modifiers,
                click_count,
            },
            Self::RendererClick { row, column } => ComponentEvent::RendererClick { row, column },
        }
    }
}

/// An interaction aimed at a component.
#[derive(Clone)]
pub struct InteractionRequest<'a> {
    pub target: &'a dyn Component,
    pub interaction: Interaction,
}

impl<'a> InteractionRequest<'a> {
    pub fn new(target: &'a dyn Component, interaction: Interaction) -> Self {
        Self {
            target,
            interaction,
        }
    }
}

impl std::fmt::Debug for InteractionRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionRequest")
            .field("target", &describe(self.target))
            .field("interaction", &self.interaction)
            .finish()
    }
}

/// Deliver a native event into the component's listener chain.
///
/// Performs no interactability check.
pub fn fire_event(target: &dyn Component, event: &ComponentEvent) -> HarnessResult<()> {
    tracing::trace!(
        target: targets::HARNESS,
        kind = event.kind(),
        component = %describe(target),
        "firing event"
    );
    target.handle_event(event)
}

/// Build the event for a request and fire it, without the guard.
pub fn dispatch(request: InteractionRequest<'_>) -> HarnessResult<()> {
    let InteractionRequest {
        target,
        interaction,
    } = request;
    fire_event(target, &interaction.into_event())
}

/// Check interactability, then dispatch.
///
/// On failure no listener runs and the component is left untouched.
pub fn simulate(request: InteractionRequest<'_>) -> HarnessResult<()> {
    assert_editable(request.target)?;
    if env::config().tracing.log_interactions {
        tracing::debug!(
            target: targets::HARNESS,
            kind = request.interaction.kind(),
            component = %describe(request.target),
            "simulating user interaction"
        );
    }
    dispatch(request)
}

/// Click the component like a user would.
pub fn click(target: &dyn Component) -> HarnessResult<()> {
    simulate(InteractionRequest::new(target, Interaction::click()))
}

/// Click with a specific mouse button and modifier keys.
pub fn click_with(
    target: &dyn Component,
    button: MouseButton,
    modifiers: KeyboardModifiers,
) -> HarnessResult<()> {
    simulate(InteractionRequest::new(
        target,
        Interaction::Click {
            button,
            modifiers,
            click_count: 1,
        },
    ))
}

/// Double-click the component.
pub fn double_click(target: &dyn Component) -> HarnessResult<()> {
    simulate(InteractionRequest::new(
        target,
        Interaction::Click {
            button: MouseButton::Left,
            modifiers: KeyboardModifiers::NONE,
            click_count: 2,
        },
    ))
}

/// Set a field's value as if the user typed it.
///
/// The field's value-change listeners see `from_client == true`.
pub fn set_value(target: &dyn Component, value: impl Into<Value>) -> HarnessResult<()> {
    if target.as_value_field().is_none() {
        return Err(HarnessError::unsupported(format!(
            "set value on {}, which holds no value",
            describe(target)
        )));
    }
    simulate(InteractionRequest::new(
        target,
        Interaction::ValueChange {
            value: value.into(),
        },
    ))
}

/// Re-emit the field's value-change event as a user event, without
/// changing the value.
pub fn fire_value_change(target: &dyn Component) -> HarnessResult<()> {
    let Some(field) = target.as_value_field() else {
        return Err(HarnessError::unsupported(format!(
            "fire value change on {}, which holds no value",
            describe(target)
        )));
    };
    assert_editable(target)?;
    field.notify_value_change(true);
    Ok(())
}

/// Simulated user actions as methods on components.
///
/// ```no_run
/// use lattice_probe::prelude::*;
///
/// # fn main() -> HarnessResult<()> {
/// let name = ui_find1_as::<TextField>(&SearchSpec::new().caption("Name"))?;
/// name.user_set_value("Alice")?;
/// ui_find1(&SearchSpec::new().caption("Save"))?.user_click()?;
/// # Ok(())
/// # }
/// ```
pub trait Simulate {
    /// The component the actions target.
    fn as_component(&self) -> &dyn Component;

    /// See [`click`].
    fn user_click(&self) -> HarnessResult<()> {
        click(self.as_component())
    }

    /// See [`double_click`].
    fn user_double_click(&self) -> HarnessResult<()> {
        double_click(self.as_component())
    }

    /// See [`set_value`].
    fn user_set_value(&self, value: impl Into<Value>) -> HarnessResult<()> {
        set_value(self.as_component(), value)
    }

    /// See [`fire_value_change`].
    fn user_fire_value_change(&self) -> HarnessResult<()> {
        fire_value_change(self.as_component())
    }
}

impl<C: Component> Simulate for C {
    fn as_component(&self) -> &dyn Component {
        self
    }
}

impl Simulate for dyn Component {
    fn as_component(&self) -> &dyn Component {
        self
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use parking_lot::Mutex;

    use super::*;
    use crate::component::widgets::{Button, Checkbox, IntegerField, Label, TextField, VerticalLayout};
    use crate::component::{ComponentExt, ValueField, install};
    use crate::error::NotInteractableReason;
    use crate::harness::env::TestEnvironment;
    use crate::harness::routes::Routes;

    #[test]
    fn test_click_runs_listeners_in_registration_order() {
        let _env = TestEnvironment::set_up(Routes::new()).unwrap();
        let button = install(Button::new("Save")).unwrap();
        let order = Arc::new(Mutex::new(Vec::new()));

        let first = order.clone();
        button.clicked.connect(move |event| {
            assert!(event.from_client);
            first.lock().push("first");
        });
        let second = order.clone();
        button.clicked.connect(move |_| second.lock().push("second"));

        button.user_click().unwrap();
        assert_eq!(*order.lock(), vec!["first", "second"]);
    }

    #[test]
    fn test_hidden_button_fires_no_listener() {
        let _env = TestEnvironment::set_up(Routes::new()).unwrap();
        let layout = install(VerticalLayout::new().with_visible(false)).unwrap();
        let button = layout.add(Button::new("Save")).unwrap();
        let clicks = Arc::new(AtomicUsize::new(0));
        let counter = clicks.clone();
        button.clicked.connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let err = click(button.as_ref()).unwrap_err();
        assert_eq!(
            err.not_interactable_reason(),
            Some(NotInteractableReason::NotVisible)
        );
        assert_eq!(clicks.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_click_modifiers_and_double_click() {
        let _env = TestEnvironment::set_up(Routes::new()).unwrap();
        let button = install(Button::new("Open")).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        button.clicked.connect(move |event| sink.lock().push(*event));

        click_with(button.as_ref(), MouseButton::Right, KeyboardModifiers::SHIFT).unwrap();
        button.user_double_click().unwrap();

        let seen = seen.lock();
        assert_eq!(seen[0].button, MouseButton::Right);
        assert!(seen[0].modifiers.shift);
        assert!(!seen[0].is_double_click());
        assert!(seen[1].is_double_click());
    }

    #[test]
    fn test_set_value_marks_event_as_from_client() {
        let _env = TestEnvironment::set_up(Routes::new()).unwrap();
        let field = install(TextField::new("Name")).unwrap();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        field.value_changed.connect(move |event| sink.lock().push(event.clone()));

        field.set_value("programmatic");
        field.user_set_value("typed").unwrap();

        let events = events.lock();
        assert_eq!(events.len(), 2);
        assert!(!events[0].from_client);
        assert!(events[1].from_client);
        assert_eq!(events[1].old_value, "programmatic");
        assert_eq!(events[1].value, "typed");
    }

    #[test]
    fn test_read_only_value_is_untouched() {
        let _env = TestEnvironment::set_up(Routes::new()).unwrap();
        let field = install(TextField::new("Name").with_value("kept")).unwrap();
        field.set_read_only(true);
        let fired = Arc::new(AtomicUsize::new(0));
        let counter = fired.clone();
        field.value_changed.connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let err = set_value(field.as_ref(), "changed").unwrap_err();
        assert_eq!(err.not_interactable_reason(), Some(NotInteractableReason::ReadOnly));
        assert_eq!(field.value(), "kept");
        assert_eq!(fired.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_value_kind_mismatch() {
        let _env = TestEnvironment::set_up(Routes::new()).unwrap();
        let age = install(IntegerField::new("Age")).unwrap();

        assert!(matches!(
            set_value(age.as_ref(), "forty"),
            Err(HarnessError::ValueTypeMismatch { expected: "integer", got: "text", .. })
        ));
        set_value(age.as_ref(), 40).unwrap();
        assert_eq!(age.value(), Some(40));
    }

    #[test]
    fn test_set_value_on_label_is_unsupported() {
        let _env = TestEnvironment::set_up(Routes::new()).unwrap();
        let label = install(Label::new("Hello")).unwrap();

        assert!(matches!(
            set_value(label.as_ref(), "x"),
            Err(HarnessError::Unsupported { .. })
        ));
        assert!(matches!(
            click(label.as_ref()),
            Err(HarnessError::Unsupported { .. })
        ));
    }

    #[test]
    fn test_checkbox_click_toggles() {
        let _env = TestEnvironment::set_up(Routes::new()).unwrap();
        let checkbox = install(Checkbox::new("Agree")).unwrap();

        checkbox.user_click().unwrap();
        assert!(checkbox.is_checked());
        checkbox.user_set_value(false).unwrap();
        assert!(!checkbox.is_checked());
    }

    #[test]
    fn test_fire_value_change_keeps_value() {
        let _env = TestEnvironment::set_up(Routes::new()).unwrap();
        let field = install(TextField::new("Name").with_value("same")).unwrap();
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = events.clone();
        field.value_changed.connect(move |event| sink.lock().push(event.clone()));

        field.user_fire_value_change().unwrap();

        let events = events.lock();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].old_value, "same");
        assert_eq!(events[0].value, "same");
        assert!(events[0].from_client);
    }

    #[test]
    fn test_dispatch_skips_the_guard() {
        let _env = TestEnvironment::set_up(Routes::new()).unwrap();
        let button = install(Button::new("Hidden").with_visible(false)).unwrap();
        let clicks = Arc::new(AtomicUsize::new(0));
        let counter = clicks.clone();
        button.clicked.connect(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        dispatch(InteractionRequest::new(button.as_ref(), Interaction::click())).unwrap();
        assert_eq!(clicks.load(Ordering::SeqCst), 1);
    }
}
