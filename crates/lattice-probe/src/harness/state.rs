//! Effective visibility and enabled state.
//!
//! A component is effectively visible when it and every ancestor are
//! visible, and effectively enabled likewise. Nodes without a
//! visible/enabled concept count as visible and enabled. Nothing is cached:
//! every query walks the chain up to the root again.

use lattice_probe_core::{ObjectId, ObjectResult, SharedObjectRegistry};

use crate::component::{Component, resolve};

/// Whether the component and all its ancestors are visible.
pub fn is_effectively_visible(component: &dyn Component) -> bool {
    fold_chain(
        component,
        Some(component.object_id()),
        SharedObjectRegistry::is_effectively_visible,
    )
}

/// Whether the component and all its ancestors are enabled.
pub fn is_effectively_enabled(component: &dyn Component) -> bool {
    fold_chain(
        component,
        Some(component.object_id()),
        SharedObjectRegistry::is_effectively_enabled,
    )
}

/// Whether every ancestor of the component is enabled.
///
/// `true` for a component without a parent.
pub fn is_parent_chain_enabled(component: &dyn Component) -> bool {
    fold_chain(
        component,
        component.base().parent_id(),
        SharedObjectRegistry::is_effectively_enabled,
    )
}

/// Run a registry fold from `start` up to the root.
///
/// A component whose node is gone (destroyed, or its environment torn down)
/// is neither visible nor enabled.
fn fold_chain(
    component: &dyn Component,
    start: Option<ObjectId>,
    fold: impl Fn(&SharedObjectRegistry, ObjectId) -> ObjectResult<bool>,
) -> bool {
    let Ok(registry) = component.base().registry() else {
        return false;
    };
    if !registry.contains(component.object_id()) {
        return false;
    }

    match start {
        Some(id) => fold(registry.as_ref(), id).unwrap_or(false),
        None => true,
    }
}

/// One-line description of a component.
///
/// Lists the type, then the test id, caption, placeholder, text and value
/// when present, then the own flags that deviate from the default:
///
/// ```text
/// TextField[#name, caption='Name', DISABLED, RO, value='Alice']
/// ```
pub fn describe(component: &dyn Component) -> String {
    let base = component.base();
    let mut parts = Vec::new();

    if let Some(id) = base.test_id() {
        parts.push(format!("#{id}"));
    }
    if let Some(caption) = component.caption().filter(|c| !c.is_empty()) {
        parts.push(format!("caption='{caption}'"));
    }
    if let Some(placeholder) = component.placeholder().filter(|p| !p.is_empty()) {
        parts.push(format!("placeholder='{placeholder}'"));
    }
    if let Some(text) = component.text().filter(|t| !t.is_empty()) {
        parts.push(format!("text='{text}'"));
    }
    if !base.is_visible() {
        parts.push("INVIS".to_string());
    }
    if !base.is_enabled() {
        parts.push("DISABLED".to_string());
    }
    if let Some(field) = component.as_value_field() {
        if field.is_read_only() {
            parts.push("RO".to_string());
        }
        parts.push(format!("value='{}'", field.value()));
    }

    format!("{}[{}]", base.type_label(), parts.join(", "))
}

/// Description of the chain from the root down to the component.
///
/// ```text
/// UiRoot[] > VerticalLayout[] > Button[caption='Save']
/// ```
pub fn path(component: &dyn Component) -> String {
    let mut chain = vec![describe(component)];
    if let Ok(registry) = component.base().registry() {
        let ancestors = registry.ancestors(component.object_id()).unwrap_or_default();
        chain.extend(
            ancestors
                .into_iter()
                .filter_map(|id| resolve(&registry, id))
                .map(|ancestor| describe(ancestor.as_ref())),
        );
    }
    chain.reverse();
    chain.join(" > ")
}

/// Describe a node by id, if a component is attached to it.
pub(crate) fn describe_node(registry: &SharedObjectRegistry, id: ObjectId) -> Option<String> {
    resolve(registry, id).map(|component| describe(component.as_ref()))
}
