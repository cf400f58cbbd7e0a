//! Component lookup.
//!
//! Searches walk the tree from a root, root included, in depth-first
//! pre-order (or breadth-first, per [`LocatorConfig`]). Hidden subtrees are
//! skipped unless the search asks for them. Opaque components are matched
//! themselves but contribute no children: whatever they render is not part
//! of the component model.
//!
//! [`LocatorConfig`]: crate::config::LocatorConfig

use std::any::{Any, TypeId};
use std::collections::VecDeque;
use std::fmt;
use std::ops::RangeInclusive;
use std::sync::Arc;

use lattice_probe_core::logging::targets;
use lattice_probe_core::{ObjectTreeDebug, TreeFormatOptions};
use regex::Regex;

use crate::component::{Component, Value, downcast, resolve, short_type_name};
use crate::config::TraversalOrder;
use crate::error::{HarnessError, HarnessResult};
use crate::harness::env;
use crate::harness::state::{describe_node, is_effectively_visible};

type Predicate = Arc<dyn Fn(&dyn Component) -> bool + Send + Sync>;

/// Criteria a component must meet to match a search.
///
/// Every criterion that is set must hold. An empty spec matches every
/// component.
///
/// ```no_run
/// use lattice_probe::prelude::*;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let save = SearchSpec::of::<Button>().caption("Save");
/// let errors = SearchSpec::new()
///     .caption_matches(Regex::new("^Error")?)
///     .count(0..=3);
/// # let _ = (save, errors);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Default)]
pub struct SearchSpec {
    component_type: Option<(TypeId, String)>,
    id: Option<String>,
    caption: Option<String>,
    caption_pattern: Option<Regex>,
    placeholder: Option<String>,
    text: Option<String>,
    value: Option<Value>,
    include_hidden: Option<bool>,
    predicates: Vec<Predicate>,
    count: Option<RangeInclusive<usize>>,
}

impl SearchSpec {
    /// A spec matching every component.
    pub fn new() -> Self {
        Self::default()
    }

    /// A spec matching components of type `C`.
    pub fn of<C: Component>() -> Self {
        Self::new().component_type::<C>()
    }

    /// Only match components of type `C`.
    pub fn component_type<C: Component>(mut self) -> Self {
        self.component_type = Some((TypeId::of::<C>(), short_type_name(std::any::type_name::<C>())));
        self
    }

    /// Only match components with this test id.
    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Only match components with exactly this caption.
    pub fn caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Some(caption.into());
        self
    }

    /// Only match components whose caption matches the pattern.
    pub fn caption_matches(mut self, pattern: Regex) -> Self {
        self.caption_pattern = Some(pattern);
        self
    }

    /// Only match components with exactly this placeholder.
    pub fn placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Only match components with exactly this text.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Only match value fields currently holding this value.
    pub fn value(mut self, value: impl Into<Value>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Also search hidden subtrees.
    ///
    /// Defaults to the configured `[locator] include_hidden`.
    pub fn include_hidden(mut self, include_hidden: bool) -> Self {
        self.include_hidden = Some(include_hidden);
        self
    }

    /// Only match components accepted by the predicate.
    pub fn matching(mut self, predicate: impl Fn(&dyn Component) -> bool + Send + Sync + 'static) -> Self {
        self.predicates.push(Arc::new(predicate));
        self
    }

    /// Fail the search unless the number of matches falls in `range`.
    pub fn count(mut self, range: RangeInclusive<usize>) -> Self {
        self.count = Some(range);
        self
    }

    /// Whether a single component meets every criterion.
    ///
    /// Does not look at visibility; that is a property of the search.
    pub fn matches(&self, component: &dyn Component) -> bool {
        if let Some((type_id, _)) = &self.component_type {
            let any: &dyn Any = component;
            if Any::type_id(any) != *type_id {
                return false;
            }
        }
        if let Some(id) = &self.id {
            if component.base().test_id().as_deref() != Some(id.as_str()) {
                return false;
            }
        }

        if self.caption.is_some() || self.caption_pattern.is_some() {
            let caption = component.caption();
            if let Some(expected) = &self.caption {
                if caption.as_deref() != Some(expected.as_str()) {
                    return false;
                }
            }
            if let Some(pattern) = &self.caption_pattern {
                if !caption.is_some_and(|c| pattern.is_match(&c)) {
                    return false;
                }
            }
        }

        if let Some(expected) = &self.placeholder {
            if component.placeholder().as_deref() != Some(expected.as_str()) {
                return false;
            }
        }
        if let Some(expected) = &self.text {
            if component.text().as_deref() != Some(expected.as_str()) {
                return false;
            }
        }
        if let Some(expected) = &self.value {
            match component.as_value_field() {
                Some(field) if field.value() == *expected => {}
                _ => return false,
            }
        }

        self.predicates.iter().all(|predicate| predicate(component))
    }
}

impl fmt::Display for SearchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some((_, name)) = &self.component_type {
            parts.push(format!("type={name}"));
        }
        if let Some(id) = &self.id {
            parts.push(format!("id='{id}'"));
        }
        if let Some(caption) = &self.caption {
            parts.push(format!("caption='{caption}'"));
        }
        if let Some(pattern) = &self.caption_pattern {
            parts.push(format!("caption~/{}/", pattern.as_str()));
        }
        if let Some(placeholder) = &self.placeholder {
            parts.push(format!("placeholder='{placeholder}'"));
        }
        if let Some(text) = &self.text {
            parts.push(format!("text='{text}'"));
        }
        if let Some(value) = &self.value {
            parts.push(format!("value='{value}'"));
        }
        if self.include_hidden == Some(true) {
            parts.push("include_hidden".to_string());
        }
        match self.predicates.len() {
            0 => {}
            1 => parts.push("predicate".to_string()),
            n => parts.push(format!("{n} predicates")),
        }
        if let Some(range) = &self.count {
            parts.push(format!("count={}", describe_range(range)));
        }
        write!(f, "SearchSpec{{{}}}", parts.join(", "))
    }
}

impl fmt::Debug for SearchSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

fn describe_range(range: &RangeInclusive<usize>) -> String {
    match (*range.start(), *range.end()) {
        (start, end) if start == end => format!("exactly {start}"),
        (start, usize::MAX) => format!("at least {start}"),
        (start, end) => format!("{start}..={end}"),
    }
}

/// ASCII dump of the subtree below `root`, one described component per line.
pub fn tree_dump(root: &dyn Component) -> String {
    let Ok(registry) = root.base().registry() else {
        return String::new();
    };
    let options = TreeFormatOptions::minimal();
    ObjectTreeDebug::with_options(options)
        .with_labeler(|id| describe_node(&registry, id))
        .format_subtree(&registry, root.object_id())
        .unwrap_or_default()
}

/// All components below `root` (root included) that match `spec`, in
/// traversal order.
///
/// Fails with [`HarnessError::UnexpectedMatchCount`] if `spec` carries a
/// count range and the number of matches falls outside it.
pub fn find(root: &dyn Component, spec: &SearchSpec) -> HarnessResult<Vec<Arc<dyn Component>>> {
    let config = env::config();
    let include_hidden = spec.include_hidden.unwrap_or(config.locator.include_hidden);
    let order = config.locator.order;
    let registry = root.base().registry()?;
    let root_id = root.object_id();

    let mut matches = Vec::new();
    if include_hidden || is_effectively_visible(root) {
        let mut pending = VecDeque::from([root_id]);
        while let Some(id) = pending.pop_front() {
            let mut descend = true;
            if let Some(component) = resolve(&registry, id) {
                if id != root_id && !include_hidden && !component.base().is_visible() {
                    continue;
                }
                if spec.matches(component.as_ref()) {
                    matches.push(component.clone());
                }
                descend = !component.is_opaque();
            }
            if descend {
                let children = registry.children(id)?;
                match order {
                    TraversalOrder::DepthFirst => {
                        for child in children.into_iter().rev() {
                            pending.push_front(child);
                        }
                    }
                    TraversalOrder::BreadthFirst => pending.extend(children),
                }
            }
        }
    }

    tracing::trace!(
        target: targets::HARNESS,
        spec = %spec,
        matches = matches.len(),
        "search finished"
    );

    if let Some(range) = &spec.count {
        if !range.contains(&matches.len()) {
            return Err(HarnessError::UnexpectedMatchCount {
                count: matches.len(),
                expected: describe_range(range),
                spec: spec.to_string(),
                tree: tree_dump(root),
            });
        }
    }
    Ok(matches)
}

/// All components below `root` accepted by `predicate`.
pub fn find_matching(
    root: &dyn Component,
    predicate: impl Fn(&dyn Component) -> bool + Send + Sync + 'static,
) -> HarnessResult<Vec<Arc<dyn Component>>> {
    find(root, &SearchSpec::new().matching(predicate))
}

/// All components of type `C` below `root` that match `spec`.
pub fn find_as<C: Component>(root: &dyn Component, spec: &SearchSpec) -> HarnessResult<Vec<Arc<C>>> {
    let spec = spec.clone().component_type::<C>();
    Ok(find(root, &spec)?.into_iter().filter_map(downcast::<C>).collect())
}

/// The single component below `root` that matches `spec`.
///
/// Fails with [`HarnessError::AmbiguousMatch`] when there is no match or
/// more than one; the message carries a dump of the searched tree.
pub fn find1(root: &dyn Component, spec: &SearchSpec) -> HarnessResult<Arc<dyn Component>> {
    let mut matches = find(root, spec)?;
    if matches.len() != 1 {
        return Err(HarnessError::AmbiguousMatch {
            count: matches.len(),
            spec: spec.to_string(),
            tree: tree_dump(root),
        });
    }
    Ok(matches.remove(0))
}

/// The single component of type `C` below `root` that matches `spec`.
pub fn find1_as<C: Component>(root: &dyn Component, spec: &SearchSpec) -> HarnessResult<Arc<C>> {
    let spec = spec.clone().component_type::<C>();
    let found = find1(root, &spec)?;
    downcast::<C>(found).ok_or_else(|| {
        HarnessError::unsupported(format!("downcast of a match for {spec}"))
    })
}

/// Fail unless the number of matches falls in `range`.
pub fn expect_count(
    root: &dyn Component,
    spec: &SearchSpec,
    range: RangeInclusive<usize>,
) -> HarnessResult<Vec<Arc<dyn Component>>> {
    find(root, &spec.clone().count(range))
}

/// Fail if anything matches.
pub fn expect_none(root: &dyn Component, spec: &SearchSpec) -> HarnessResult<()> {
    expect_count(root, spec, 0..=0).map(|_| ())
}

/// Fail unless exactly one component matches.
pub fn expect_one(root: &dyn Component, spec: &SearchSpec) -> HarnessResult<Arc<dyn Component>> {
    let mut matches = expect_count(root, spec, 1..=1)?;
    Ok(matches.remove(0))
}

// =========================================================================
// Searching from the current UI root
// =========================================================================

/// [`find`] from the UI root of the current test environment.
pub fn ui_find(spec: &SearchSpec) -> HarnessResult<Vec<Arc<dyn Component>>> {
    find(env::ui_root()?.as_ref(), spec)
}

/// [`find_as`] from the UI root of the current test environment.
pub fn ui_find_as<C: Component>(spec: &SearchSpec) -> HarnessResult<Vec<Arc<C>>> {
    find_as::<C>(env::ui_root()?.as_ref(), spec)
}

/// [`find1`] from the UI root of the current test environment.
pub fn ui_find1(spec: &SearchSpec) -> HarnessResult<Arc<dyn Component>> {
    find1(env::ui_root()?.as_ref(), spec)
}

/// [`find1_as`] from the UI root of the current test environment.
pub fn ui_find1_as<C: Component>(spec: &SearchSpec) -> HarnessResult<Arc<C>> {
    find1_as::<C>(env::ui_root()?.as_ref(), spec)
}

/// [`expect_count`] from the UI root of the current test environment.
pub fn ui_expect_count(
    spec: &SearchSpec,
    range: RangeInclusive<usize>,
) -> HarnessResult<Vec<Arc<dyn Component>>> {
    expect_count(env::ui_root()?.as_ref(), spec, range)
}

/// [`expect_none`] from the UI root of the current test environment.
pub fn ui_expect_none(spec: &SearchSpec) -> HarnessResult<()> {
    expect_none(env::ui_root()?.as_ref(), spec)
}

/// [`expect_one`] from the UI root of the current test environment.
pub fn ui_expect_one(spec: &SearchSpec) -> HarnessResult<Arc<dyn Component>> {
    expect_one(env::ui_root()?.as_ref(), spec)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::component::widgets::{Button, HorizontalLayout, Html, Label, TextField, VerticalLayout};
    use crate::component::{ComponentExt, install};
    use crate::config::{HarnessConfig, LocatorConfig};
    use crate::harness::env::TestEnvironment;
    use crate::harness::routes::Routes;

    fn form() -> Arc<VerticalLayout> {
        let form = install(VerticalLayout::new().with_id("form")).unwrap();
        form.add(TextField::new("Name").with_placeholder("Full name")).unwrap();
        form.add(TextField::new("Email")).unwrap();
        let actions = form.add(HorizontalLayout::new()).unwrap();
        actions.add(Button::new("Save").with_id("save")).unwrap();
        actions.add(Button::new("Cancel")).unwrap();
        form
    }

    #[test]
    fn test_depth_first_preorder_root_included() {
        let _env = TestEnvironment::set_up(Routes::new()).unwrap();
        let form = form();

        let all = find(form.as_ref(), &SearchSpec::new()).unwrap();
        let labels: Vec<String> = all.iter().map(|c| c.base().type_label()).collect();
        assert_eq!(
            labels,
            vec!["VerticalLayout", "TextField", "TextField", "HorizontalLayout", "Button", "Button"]
        );
    }

    #[test]
    fn test_breadth_first_order() {
        let config = HarnessConfig {
            locator: LocatorConfig {
                order: TraversalOrder::BreadthFirst,
                ..Default::default()
            },
            ..Default::default()
        };
        let _env = TestEnvironment::builder().config(config).set_up().unwrap();
        let root = install(VerticalLayout::new()).unwrap();
        let inner = root.add(VerticalLayout::new()).unwrap();
        inner.add(Label::new("deep")).unwrap();
        root.add(Label::new("shallow")).unwrap();

        let texts: Vec<String> = find(root.as_ref(), &SearchSpec::of::<Label>())
            .unwrap()
            .iter()
            .filter_map(|c| c.text())
            .collect();
        assert_eq!(texts, vec!["shallow", "deep"]);
    }

    #[test]
    fn test_criteria() {
        let _env = TestEnvironment::set_up(Routes::new()).unwrap();
        let form = form();

        let save = find1(form.as_ref(), &SearchSpec::new().id("save")).unwrap();
        assert_eq!(save.caption().as_deref(), Some("Save"));

        let name = find1_as::<TextField>(form.as_ref(), &SearchSpec::new().placeholder("Full name")).unwrap();
        assert_eq!(name.caption().as_deref(), Some("Name"));

        let pattern = Regex::new("^(Save|Cancel)$").unwrap();
        let buttons = find(form.as_ref(), &SearchSpec::new().caption_matches(pattern)).unwrap();
        assert_eq!(buttons.len(), 2);

        let fields = find_as::<TextField>(form.as_ref(), &SearchSpec::new()).unwrap();
        assert_eq!(fields.len(), 2);

        name.set_value("Alice");
        let by_value = find(form.as_ref(), &SearchSpec::new().value("Alice")).unwrap();
        assert_eq!(by_value.len(), 1);

        let custom = find_matching(form.as_ref(), |c| c.caption().is_some_and(|c| c.len() == 4)).unwrap();
        assert_eq!(custom.len(), 2);
    }

    #[test]
    fn test_hidden_subtrees_are_skipped() {
        let _env = TestEnvironment::set_up(Routes::new()).unwrap();
        let form = form();
        let actions = find1(form.as_ref(), &SearchSpec::of::<HorizontalLayout>()).unwrap();
        actions.base().set_visible(false);

        expect_none(form.as_ref(), &SearchSpec::of::<Button>()).unwrap();
        let hidden = find(form.as_ref(), &SearchSpec::of::<Button>().include_hidden(true)).unwrap();
        assert_eq!(hidden.len(), 2);

        form.base().set_visible(false);
        assert!(find(form.as_ref(), &SearchSpec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_opaque_component_hides_its_children() {
        let _env = TestEnvironment::set_up(Routes::new()).unwrap();
        let root = install(VerticalLayout::new()).unwrap();
        let html = root.add(Html::new("<b>raw</b>")).unwrap();
        html.base().add_child(Button::new("Inside")).unwrap();

        expect_one(root.as_ref(), &SearchSpec::of::<Html>()).unwrap();
        expect_none(root.as_ref(), &SearchSpec::new().caption("Inside")).unwrap();
    }

    #[test]
    fn test_find1_reports_count_and_tree() {
        let _env = TestEnvironment::set_up(Routes::new()).unwrap();
        let form = form();

        let err = find1(form.as_ref(), &SearchSpec::of::<TextField>()).unwrap_err();
        match err {
            HarnessError::AmbiguousMatch { count, spec, tree } => {
                assert_eq!(count, 2);
                assert_eq!(spec, "SearchSpec{type=TextField}");
                assert!(tree.starts_with("VerticalLayout[#form]\n"));
                assert!(tree.contains("`-- Button[caption='Cancel']"));
            }
            other => panic!("unexpected error: {other}"),
        }

        let err = find1(form.as_ref(), &SearchSpec::new().caption("Missing")).unwrap_err();
        assert!(matches!(err, HarnessError::AmbiguousMatch { count: 0, .. }));
    }

    #[test]
    fn test_count_ranges() {
        let _env = TestEnvironment::set_up(Routes::new()).unwrap();
        let form = form();

        assert_eq!(expect_count(form.as_ref(), &SearchSpec::of::<Button>(), 1..=2).unwrap().len(), 2);
        let err = expect_count(form.as_ref(), &SearchSpec::of::<Button>(), 3..=usize::MAX).unwrap_err();
        assert!(matches!(
            err,
            HarnessError::UnexpectedMatchCount { count: 2, ref expected, .. } if expected == "at least 3"
        ));
        assert!(expect_one(form.as_ref(), &SearchSpec::of::<Button>()).is_err());
    }

    #[test]
    fn test_search_from_ui_root() {
        let _env = TestEnvironment::set_up(Routes::new()).unwrap();
        env::ui_root().unwrap().set_content(form()).unwrap();

        ui_find1_as::<Button>(&SearchSpec::new().caption("Save")).unwrap();
        assert_eq!(ui_find_as::<TextField>(&SearchSpec::new()).unwrap().len(), 2);
        ui_expect_none(&SearchSpec::of::<Html>()).unwrap();
    }
}
