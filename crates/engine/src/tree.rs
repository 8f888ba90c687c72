//! Declared preference trees.
//!
//! Groups exist for presentation: a label, extras and dependencies a UI can
//! use to render or hide a whole section. They have no effect on validation
//! or storage. The manager only ever sees the flattened sequence.

use std::fmt;
use std::rc::Rc;

use prefsmith_core::{Dependency, ExtraValue, Extras, Preference};

use crate::managed::{Managed, ManagedPreference};

#[derive(Clone)]
pub enum TreeNode {
    Preference(Rc<dyn ManagedPreference>),
    Group(PreferenceGroup),
}

impl fmt::Debug for TreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TreeNode::Preference(p) => write!(f, "{} '{}'", p.class_name(), p.key()),
            TreeNode::Group(g) => fmt::Debug::fmt(g, f),
        }
    }
}

/// Ordered preferences and groups, built with chained calls:
///
/// ```ignore
/// let tree = PreferenceTree::new()
///     .preference(insert_foobars.clone())
///     .group(PreferenceGroup::new("Advanced").preference(number_of_foobars.clone()));
/// ```
#[derive(Debug, Clone, Default)]
pub struct PreferenceTree {
    nodes: Vec<TreeNode>,
}

impl PreferenceTree {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn preference<P: Preference>(mut self, preference: P) -> Self {
        self.nodes.push(TreeNode::Preference(Rc::new(Managed(preference))));
        self
    }

    pub fn group(mut self, group: PreferenceGroup) -> Self {
        self.nodes.push(TreeNode::Group(group));
        self
    }

    pub fn nodes(&self) -> &[TreeNode] {
        &self.nodes
    }

    /// Every preference, depth first, in declaration order.
    pub fn flatten(&self) -> Vec<Rc<dyn ManagedPreference>> {
        let mut out = Vec::new();
        self.collect_preferences(&mut out);
        out
    }

    fn collect_preferences(&self, out: &mut Vec<Rc<dyn ManagedPreference>>) {
        for node in &self.nodes {
            match node {
                TreeNode::Preference(p) => out.push(Rc::clone(p)),
                TreeNode::Group(g) => g.children.collect_preferences(out),
            }
        }
    }

    /// Every group at any depth, outermost first.
    pub fn groups(&self) -> Vec<&PreferenceGroup> {
        let mut out = Vec::new();
        self.collect_groups(&mut out);
        out
    }

    fn collect_groups<'a>(&'a self, out: &mut Vec<&'a PreferenceGroup>) {
        for node in &self.nodes {
            if let TreeNode::Group(g) = node {
                out.push(g);
                g.children.collect_groups(out);
            }
        }
    }
}

/// A labelled section of the tree.
#[derive(Debug, Clone)]
pub struct PreferenceGroup {
    label: String,
    extras: Extras,
    dependencies: Vec<Dependency>,
    children: PreferenceTree,
}

impl PreferenceGroup {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            extras: Extras::new(),
            dependencies: Vec::new(),
            children: PreferenceTree::new(),
        }
    }

    pub fn with_extra(mut self, name: impl Into<String>, value: impl Into<ExtraValue>) -> Self {
        self.extras.insert(name.into(), value.into());
        self
    }

    pub fn with_dependency(mut self, dependency: Dependency) -> Self {
        self.dependencies.push(dependency);
        self
    }

    pub fn preference<P: Preference>(mut self, preference: P) -> Self {
        self.children = self.children.preference(preference);
        self
    }

    pub fn group(mut self, group: PreferenceGroup) -> Self {
        self.children = self.children.group(group);
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn extras(&self) -> &Extras {
        &self.extras
    }

    pub fn dependencies(&self) -> &[Dependency] {
        &self.dependencies
    }

    pub fn children(&self) -> &PreferenceTree {
        &self.children
    }
}
