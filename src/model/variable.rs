//! Variable model consumed by the discovery engine.
//!
//! The enclosing application owns the real model. This module defines the
//! narrow walker interface the history module needs ([`VariableModel`]) and a
//! plain in-memory tree ([`Directory`], [`ApplicationModel`]) implementing it.

use std::collections::BTreeSet;
use std::collections::VecDeque;

use super::ValueKind;
use crate::Result;

/// Callback receiving every process variable accepted by a walk
pub type Visitor<'a> = dyn FnMut(&ProcessVariable) -> Result<()> + 'a;

/// Proxy of a leaf variable in the application's variable model
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessVariable {
    path: String,
    kind: ValueKind,
    n_elements: usize,
    tags: BTreeSet<String>,
}

impl ProcessVariable {
    pub fn new(
        path: impl Into<String>,
        kind: ValueKind,
        n_elements: usize,
    ) -> Self {
        Self {
            path: path.into(),
            kind,
            n_elements,
            tags: BTreeSet::new(),
        }
    }

    pub fn with_tag(
        mut self,
        tag: impl Into<String>,
    ) -> Self {
        self.tags.insert(tag.into());
        self
    }

    pub fn fully_qualified_path(&self) -> &str {
        &self.path
    }

    pub fn kind(&self) -> ValueKind {
        self.kind
    }

    pub fn n_elements(&self) -> usize {
        self.n_elements
    }

    pub fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    pub fn has_tag(
        &self,
        tag: &str,
    ) -> bool {
        self.tags.contains(tag)
    }
}

/// Selects the process variables a walk hands to its visitor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariableFilter {
    tag: Option<String>,
}

impl VariableFilter {
    /// Accepts every process variable
    pub fn any() -> Self {
        Self { tag: None }
    }

    /// Accepts process variables carrying `tag`
    pub fn tagged(tag: impl Into<String>) -> Self {
        Self { tag: Some(tag.into()) }
    }

    pub fn matches(
        &self,
        pv: &ProcessVariable,
    ) -> bool {
        match &self.tag {
            Some(tag) => pv.has_tag(tag),
            None => true,
        }
    }
}

/// Walker over a variable model
pub trait VariableModel {
    /// Visits the process variables of the search root breadth first.
    ///
    /// Returns `Ok(false)` when the model has no directory to search.
    fn visit_breadth_first(
        &self,
        filter: &VariableFilter,
        visitor: &mut Visitor<'_>,
    ) -> Result<bool>;

    /// Visits every process variable adjacent to the model's owner, e.g. all
    /// variables a device exposes.
    fn visit_adjacent(
        &self,
        filter: &VariableFilter,
        visitor: &mut Visitor<'_>,
    ) -> Result<()>;
}

/// In-memory directory of process variables
#[derive(Debug, Clone, Default)]
pub struct Directory {
    name: String,
    variables: Vec<ProcessVariable>,
    directories: Vec<Directory>,
}

impl Directory {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: Vec::new(),
            directories: Vec::new(),
        }
    }

    pub fn with_variable(
        mut self,
        pv: ProcessVariable,
    ) -> Self {
        self.variables.push(pv);
        self
    }

    pub fn with_directory(
        mut self,
        directory: Directory,
    ) -> Self {
        self.directories.push(directory);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn variables(&self) -> &[ProcessVariable] {
        &self.variables
    }

    pub fn directories(&self) -> &[Directory] {
        &self.directories
    }
}

impl VariableModel for Directory {
    fn visit_breadth_first(
        &self,
        filter: &VariableFilter,
        visitor: &mut Visitor<'_>,
    ) -> Result<bool> {
        let mut queue: VecDeque<&Directory> = VecDeque::new();
        queue.push_back(self);

        while let Some(directory) = queue.pop_front() {
            for pv in directory.variables.iter().filter(|pv| filter.matches(pv)) {
                visitor(pv)?;
            }
            queue.extend(directory.directories.iter());
        }
        Ok(true)
    }

    fn visit_adjacent(
        &self,
        filter: &VariableFilter,
        visitor: &mut Visitor<'_>,
    ) -> Result<()> {
        for pv in self.variables.iter().filter(|pv| filter.matches(pv)) {
            visitor(pv)?;
        }
        for directory in &self.directories {
            directory.visit_adjacent(filter, visitor)?;
        }
        Ok(())
    }
}

/// Variable model of an owning scope
///
/// The root is the directory searched for tagged variables. A scope without
/// root can not be searched.
#[derive(Debug, Clone, Default)]
pub struct ApplicationModel {
    root: Option<Directory>,
}

impl ApplicationModel {
    pub fn new(root: Directory) -> Self {
        Self { root: Some(root) }
    }

    /// Scope offering no directory to search
    pub fn detached() -> Self {
        Self { root: None }
    }

    pub fn root(&self) -> Option<&Directory> {
        self.root.as_ref()
    }
}

impl VariableModel for ApplicationModel {
    fn visit_breadth_first(
        &self,
        filter: &VariableFilter,
        visitor: &mut Visitor<'_>,
    ) -> Result<bool> {
        match &self.root {
            Some(root) => root.visit_breadth_first(filter, visitor),
            None => Ok(false),
        }
    }

    fn visit_adjacent(
        &self,
        filter: &VariableFilter,
        visitor: &mut Visitor<'_>,
    ) -> Result<()> {
        match &self.root {
            Some(root) => root.visit_adjacent(filter, visitor),
            None => Ok(()),
        }
    }
}
