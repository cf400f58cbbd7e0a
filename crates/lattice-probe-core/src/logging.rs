//! Logging and debugging facilities for lattice-probe.
//!
//! This module provides:
//! - Target names for filtering `tracing` output by subsystem
//! - Debug visualization for object trees
//!
//! # Tracing Integration
//!
//! lattice-probe uses the `tracing` crate for instrumentation and never
//! installs a subscriber itself. To see logs from a test:
//!
//! ```no_run
//! let _ = tracing_subscriber::fmt()
//!     .with_env_filter("lattice_probe=debug")
//!     .with_test_writer()
//!     .try_init();
//! ```
//!
//! # Debug Visualization
//!
//! ```no_run
//! use lattice_probe_core::{ObjectTreeDebug, TreeFormatOptions};
//! # fn show(root: lattice_probe_core::ObjectId) -> lattice_probe_core::ObjectResult<()> {
//!
//! let registry = lattice_probe_core::current_registry()?;
//! let tree = ObjectTreeDebug::with_options(TreeFormatOptions::minimal())
//!     .format_subtree(&registry, root)?;
//! println!("{tree}");
//! # Ok(())
//! # }
//! ```

use std::fmt::Write as _;

use crate::object::{ObjectId, ObjectResult, SharedObjectRegistry};

/// Target names for log filtering.
///
/// Use these with `tracing` directives to filter logs by subsystem.
pub mod targets {
    /// Object model target.
    pub const OBJECT: &str = "lattice_probe_core::object";
    /// Signal/slot system target.
    pub const SIGNAL: &str = "lattice_probe_core::signal";
    /// Harness target (guard, dispatch, locator).
    pub const HARNESS: &str = "lattice_probe::harness";
    /// Data projection target.
    pub const DATA: &str = "lattice_probe::data";
    /// Environment and navigation target.
    pub const ENVIRONMENT: &str = "lattice_probe::env";
}

/// Configuration for object tree debug output.
#[derive(Debug, Clone)]
pub struct TreeFormatOptions {
    /// Whether to show object IDs.
    pub show_ids: bool,
    /// Whether to show type names.
    pub show_types: bool,
    /// Maximum depth to traverse (None for unlimited).
    pub max_depth: Option<usize>,
    /// Indent size for each level.
    pub indent_size: usize,
}

impl Default for TreeFormatOptions {
    fn default() -> Self {
        Self {
            show_ids: true,
            show_types: true,
            max_depth: None,
            indent_size: 2,
        }
    }
}

impl TreeFormatOptions {
    /// Create options for minimal output.
    pub fn minimal() -> Self {
        Self {
            show_ids: false,
            show_types: false,
            ..Default::default()
        }
    }
}

type Labeler<'a> = Box<dyn Fn(ObjectId) -> Option<String> + 'a>;

/// Debug utility for visualizing object trees.
///
/// By default each node is printed as its name, id and short type name. A
/// labeler can replace the name with a richer description; it is called
/// without any registry lock held.
pub struct ObjectTreeDebug<'a> {
    options: TreeFormatOptions,
    labeler: Option<Labeler<'a>>,
}

impl<'a> ObjectTreeDebug<'a> {
    /// Create a new debug visualizer with default options.
    pub fn new() -> Self {
        Self {
            options: TreeFormatOptions::default(),
            labeler: None,
        }
    }

    /// Create a debug visualizer with custom options.
    pub fn with_options(options: TreeFormatOptions) -> Self {
        Self {
            options,
            labeler: None,
        }
    }

    /// Use a custom label for each node. Returning `None` falls back to the name.
    pub fn with_labeler(mut self, labeler: impl Fn(ObjectId) -> Option<String> + 'a) -> Self {
        self.labeler = Some(Box::new(labeler));
        self
    }

    /// Format a subtree starting from a specific object.
    pub fn format_subtree(&self, registry: &SharedObjectRegistry, root: ObjectId) -> ObjectResult<String> {
        let mut output = String::new();
        self.format_subtree_into(registry, root, &[], &mut output)?;
        Ok(output)
    }

    /// `trail` holds one "is last child" flag per level above this node.
    fn format_subtree_into(
        &self,
        registry: &SharedObjectRegistry,
        id: ObjectId,
        trail: &[bool],
        output: &mut String,
    ) -> ObjectResult<()> {
        if self.options.max_depth.is_some_and(|max| trail.len() > max) {
            return Ok(());
        }

        let name = registry.object_name(id)?;
        let type_name = registry.type_name(id)?;
        let children = registry.children(id)?;

        output.push_str(&self.build_prefix(trail));

        let label = self.labeler.as_ref().and_then(|labeler| labeler(id));
        match label {
            Some(label) => output.push_str(&label),
            None if name.is_empty() => output.push_str("(unnamed)"),
            None => output.push_str(&name),
        }

        if self.options.show_ids {
            let _ = write!(output, " [{:?}]", id);
        }

        if self.options.show_types {
            let short_type = type_name.rsplit("::").next().unwrap_or(type_name);
            let _ = write!(output, " ({})", short_type);
        }

        output.push('\n');

        let child_count = children.len();
        let mut child_trail = trail.to_vec();
        for (i, child_id) in children.into_iter().enumerate() {
            child_trail.push(i + 1 == child_count);
            self.format_subtree_into(registry, child_id, &child_trail, output)?;
            child_trail.pop();
        }

        Ok(())
    }

    /// ASCII branch prefix for a node.
    fn build_prefix(&self, trail: &[bool]) -> String {
        let Some((&is_last, parents)) = trail.split_last() else {
            return String::new();
        };

        let mut prefix = String::new();
        for &parent_is_last in parents {
            let bar = if parent_is_last { " " } else { "|" };
            prefix.push_str(bar);
            prefix.push_str(&" ".repeat(self.options.indent_size));
        }
        prefix.push_str(if is_last { "`--" } else { "+--" });
        prefix.push(' ');
        prefix
    }
}

impl Default for ObjectTreeDebug<'_> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::object::Object;

    struct Node;

    impl Object for Node {
        fn object_id(&self) -> ObjectId {
            ObjectId::default()
        }
    }

    fn tree() -> (SharedObjectRegistry, ObjectId) {
        let registry = SharedObjectRegistry::new();
        let root = registry.register::<Node>();
        let a = registry.register::<Node>();
        let b = registry.register::<Node>();
        let a1 = registry.register::<Node>();
        registry.set_object_name(root, "window".into()).unwrap();
        registry.set_object_name(a, "panel".into()).unwrap();
        registry.set_object_name(b, "footer".into()).unwrap();
        registry.set_object_name(a1, "button".into()).unwrap();
        registry.set_parent(a, Some(root)).unwrap();
        registry.set_parent(b, Some(root)).unwrap();
        registry.set_parent(a1, Some(a)).unwrap();
        (registry, root)
    }

    #[test]
    fn test_tree_format_ascii_minimal() {
        let (registry, root) = tree();
        let output = ObjectTreeDebug::with_options(TreeFormatOptions::minimal())
            .format_subtree(&registry, root)
            .unwrap();

        assert_eq!(output, "window\n+-- panel\n|  `-- button\n`-- footer\n");
    }

    #[test]
    fn test_tree_format_types_and_depth() {
        let (registry, root) = tree();
        let options = TreeFormatOptions {
            show_ids: false,
            max_depth: Some(1),
            ..Default::default()
        };
        let output = ObjectTreeDebug::with_options(options)
            .format_subtree(&registry, root)
            .unwrap();

        assert!(output.contains("window (Node)"));
        assert!(output.contains("footer (Node)"));
        assert!(!output.contains("button"));
    }

    #[test]
    fn test_labeler_overrides_name() {
        let (registry, root) = tree();
        let output = ObjectTreeDebug::with_options(TreeFormatOptions::minimal())
            .with_labeler(|id| (id == root).then(|| "Root[#main]".to_string()))
            .format_subtree(&registry, root)
            .unwrap();

        assert!(output.starts_with("Root[#main]\n"));
        assert!(output.contains("panel"));
    }
}
