//! Interactability checks.
//!
//! A real user can only interact with a component that is effectively
//! visible, effectively enabled, and not read-only. Every simulated
//! interaction passes through [`assert_editable`] first.

use lattice_probe_core::logging::targets;

use crate::component::Component;
use crate::error::{HarnessError, HarnessResult, NotInteractableReason};
use crate::harness::state::{
    is_effectively_enabled, is_effectively_visible, is_parent_chain_enabled, path,
};

/// Why the component cannot be interacted with, `None` if it can.
///
/// Checks run in a fixed order: visibility, then the ancestors' enabled
/// state, then the own enabled flag, then the read-only flag. A component
/// that is disabled itself reports [`NotInteractableReason::NotEnabled`]
/// even when its parent is disabled too.
pub fn blocking_reason(component: &dyn Component) -> Option<NotInteractableReason> {
    if !is_effectively_visible(component) {
        return Some(NotInteractableReason::NotVisible);
    }

    let own_enabled = component.base().is_enabled();
    if component.base().parent_id().is_some() && !is_parent_chain_enabled(component) {
        return Some(if own_enabled {
            NotInteractableReason::ParentDisabled
        } else {
            NotInteractableReason::NotEnabled
        });
    }
    if !is_effectively_enabled(component) {
        return Some(NotInteractableReason::NotEnabled);
    }

    if component
        .as_value_field()
        .is_some_and(|field| field.is_read_only())
    {
        return Some(NotInteractableReason::ReadOnly);
    }

    None
}

/// Whether a user could interact with the component.
pub fn is_editable(component: &dyn Component) -> bool {
    blocking_reason(component).is_none()
}

/// Fail with [`HarnessError::NotInteractable`] unless a user could interact
/// with the component.
pub fn assert_editable(component: &dyn Component) -> HarnessResult<()> {
    match blocking_reason(component) {
        None => Ok(()),
        Some(reason) => {
            let component = path(component);
            tracing::debug!(
                target: targets::HARNESS,
                %component,
                %reason,
                "interaction rejected"
            );
            Err(HarnessError::NotInteractable { component, reason })
        }
    }
}

/// Fail unless the component is blocked from interaction.
pub fn assert_not_editable(component: &dyn Component) -> HarnessResult<()> {
    if is_editable(component) {
        return Err(HarnessError::unsupported(format!(
            "expected {} to be blocked from interaction",
            path(component)
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::widgets::{Button, TextField, VerticalLayout};
    use crate::component::{ComponentExt, install};
    use crate::harness::env::TestEnvironment;
    use crate::harness::routes::Routes;

    #[test]
    fn test_reasons_in_order() {
        let _env = TestEnvironment::set_up(Routes::new()).unwrap();
        let layout = install(VerticalLayout::new()).unwrap();
        let button = layout.add(Button::new("Save")).unwrap();

        assert_eq!(blocking_reason(button.as_ref()), None);

        layout.base().set_enabled(false);
        assert_eq!(
            blocking_reason(button.as_ref()),
            Some(NotInteractableReason::ParentDisabled)
        );

        button.base().set_enabled(false);
        assert_eq!(
            blocking_reason(button.as_ref()),
            Some(NotInteractableReason::NotEnabled)
        );

        layout.base().set_visible(false);
        assert_eq!(
            blocking_reason(button.as_ref()),
            Some(NotInteractableReason::NotVisible)
        );
    }

    #[test]
    fn test_own_disabled_under_enabled_parent() {
        let _env = TestEnvironment::set_up(Routes::new()).unwrap();
        let layout = install(VerticalLayout::new()).unwrap();
        let button = layout.add(Button::new("Save").with_enabled(false)).unwrap();

        let err = assert_editable(button.as_ref()).unwrap_err();
        assert_eq!(
            err.not_interactable_reason(),
            Some(NotInteractableReason::NotEnabled)
        );
        assert!(assert_not_editable(button.as_ref()).is_ok());
    }

    #[test]
    fn test_read_only_field() {
        let _env = TestEnvironment::set_up(Routes::new()).unwrap();
        let field = install(TextField::new("Name").with_read_only(true)).unwrap();

        assert_eq!(
            blocking_reason(field.as_ref()),
            Some(NotInteractableReason::ReadOnly)
        );
        assert!(!is_editable(field.as_ref()));
    }

    #[test]
    fn test_error_names_the_component_path() {
        let _env = TestEnvironment::set_up(Routes::new()).unwrap();
        let layout = install(VerticalLayout::new()).unwrap();
        let button = layout
            .add(Button::new("Delete").with_id("delete").with_visible(false))
            .unwrap();

        let message = assert_editable(button.as_ref()).unwrap_err().to_string();
        assert_eq!(
            message,
            "VerticalLayout[] > Button[#delete, caption='Delete', INVIS] is not interactable: \
             it is not effectively visible"
        );
    }
}
