//! Depth-first traversal of a granule's group tree.
//!
//! Order: within each group, nested groups are visited first (declared
//! order, recursively), then the group's own variables (declared order).
//! Root variables therefore come after every nested group.

use std::collections::HashSet;

use ummvar_common::{Granule, Group, Variable};

use crate::error::TraversalError;

/// One variable together with its position in the tree.
#[derive(Debug, Clone)]
pub struct VariableDescriptor<'a> {
    /// Full path, e.g. `/geophysical_data/sst` or `/lat`.
    pub path: String,
    /// Path of the enclosing group, `/` for the root.
    pub group_path: String,
    pub variable: &'a Variable,
    /// Enclosing groups from the root down to the variable's own group.
    pub scopes: Vec<&'a Group>,
}

impl VariableDescriptor<'_> {
    /// Record name: the bare name for root variables, otherwise the full
    /// path with spaces in group names replaced by underscores.
    pub fn record_name(&self) -> String {
        if self.group_path == "/" {
            self.variable.name.clone()
        } else {
            format!("{}/{}", self.group_path.replace(' ', "_"), self.variable.name)
        }
    }
}

/// Restartable walker over a validated granule.
#[derive(Debug, Clone, Copy)]
pub struct HierarchyWalker<'a> {
    granule: &'a Granule,
}

impl<'a> HierarchyWalker<'a> {
    /// Validate that every variable path and record name is unique.
    pub fn new(granule: &'a Granule) -> Result<Self, TraversalError> {
        let walker = Self { granule };

        let mut paths = HashSet::new();
        let mut names = HashSet::new();
        for descriptor in walker.iter() {
            let name = descriptor.record_name();
            if !names.insert(name.clone()) {
                return Err(TraversalError::DuplicatePath(name));
            }
            if !paths.insert(descriptor.path.clone()) {
                return Err(TraversalError::DuplicatePath(descriptor.path));
            }
        }

        Ok(walker)
    }

    /// Start a fresh traversal.
    pub fn iter(&self) -> Walk<'a> {
        Walk {
            stack: vec![Frame::new(&self.granule.root, "/".to_string())],
        }
    }
}

impl<'a> IntoIterator for &HierarchyWalker<'a> {
    type Item = VariableDescriptor<'a>;
    type IntoIter = Walk<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

struct Frame<'a> {
    group: &'a Group,
    path: String,
    next_group: usize,
    next_variable: usize,
}

impl<'a> Frame<'a> {
    fn new(group: &'a Group, path: String) -> Self {
        Self {
            group,
            path,
            next_group: 0,
            next_variable: 0,
        }
    }
}

/// Lazy iterator over variable descriptors.
pub struct Walk<'a> {
    stack: Vec<Frame<'a>>,
}

impl<'a> Iterator for Walk<'a> {
    type Item = VariableDescriptor<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let frame = self.stack.last_mut()?;

            if let Some(child) = frame.group.groups.get(frame.next_group) {
                frame.next_group += 1;
                let path = join(&frame.path, &child.name);
                self.stack.push(Frame::new(child, path));
                continue;
            }

            if let Some(variable) = frame.group.variables.get(frame.next_variable) {
                frame.next_variable += 1;
                let group_path = frame.path.clone();
                return Some(VariableDescriptor {
                    path: join(&group_path, &variable.name),
                    group_path,
                    variable,
                    scopes: self.stack.iter().map(|f| f.group).collect(),
                });
            }

            self.stack.pop();
        }
    }
}

fn join(parent: &str, name: &str) -> String {
    if parent == "/" {
        format!("/{}", name)
    } else {
        format!("{}/{}", parent, name)
    }
}
