//! Traversal over the version DAG.
//!
//! [`History`] is an immutable snapshot of the parent links in a document's
//! versioning maps, with the child links derived once at construction. All
//! traversals are iterative and deterministic: wherever siblings tie, they
//! are visited in lexicographic version id order, so the same document always
//! yields the same ordering.

pub mod errors;
pub mod log;

pub use errors::HistoryError;
pub use log::{LogEntry, log_entries};

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::{Result, hash::ContentId, version::Versioning};

/// A snapshot of the version graph.
///
/// Construction validates the graph shape: every parent referenced by a
/// version must itself be present in the versions map.
#[derive(Debug, Clone)]
pub struct History {
    parents: BTreeMap<ContentId, Vec<ContentId>>,
    children: BTreeMap<ContentId, Vec<ContentId>>,
}

impl History {
    /// Build the graph snapshot from the versioning maps.
    pub fn new(versioning: &Versioning) -> Result<Self> {
        let mut parents: BTreeMap<ContentId, Vec<ContentId>> = BTreeMap::new();
        let mut children: BTreeMap<ContentId, Vec<ContentId>> = BTreeMap::new();

        for (id, version) in &versioning.versions {
            parents.insert(id.clone(), version.parents.clone());
            children.entry(id.clone()).or_default();
            for parent in &version.parents {
                if !versioning.versions.contains_key(parent) {
                    return Err(HistoryError::MissingParent {
                        version: id.clone(),
                        parent: parent.clone(),
                    }
                    .into());
                }
                children.entry(parent.clone()).or_default().push(id.clone());
            }
        }

        for siblings in children.values_mut() {
            siblings.sort();
        }

        let graph = Self { parents, children };

        // A cycle keeps its members out of the topological order, which
        // every traversal and the rehash build on.
        let ordered: BTreeSet<ContentId> = graph.topological_order().into_iter().collect();
        if ordered.len() != graph.parents.len()
            && let Some(version) = graph.parents.keys().find(|id| !ordered.contains(*id))
        {
            return Err(HistoryError::Cycle {
                version: version.clone(),
            }
            .into());
        }

        Ok(graph)
    }

    pub fn contains(&self, id: &ContentId) -> bool {
        self.parents.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.parents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parents.is_empty()
    }

    /// Parent ids of a version; empty for roots.
    pub fn parents_of(&self, id: &ContentId) -> &[ContentId] {
        self.parents.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Child ids of a version, in id order; empty for leaves.
    pub fn children_of(&self, id: &ContentId) -> &[ContentId] {
        self.children.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Versions with no children, in id order.
    pub fn leaves(&self) -> Vec<ContentId> {
        self.children
            .iter()
            .filter(|(_, children)| children.is_empty())
            .map(|(id, _)| id.clone())
            .collect()
    }

    /// Every version reachable from `id` through parent links, including
    /// `id` itself.
    pub fn ancestors(&self, id: &ContentId) -> Result<BTreeSet<ContentId>> {
        if !self.contains(id) {
            return Err(HistoryError::UnknownVersion { id: id.clone() }.into());
        }

        let mut seen = BTreeSet::new();
        let mut queue = VecDeque::from([id.clone()]);
        while let Some(current) = queue.pop_front() {
            if !seen.insert(current.clone()) {
                continue;
            }
            for parent in self.parents_of(&current) {
                if !seen.contains(parent) {
                    queue.push_back(parent.clone());
                }
            }
        }
        Ok(seen)
    }

    /// Whether `ancestor` is reachable from `descendant` through parent
    /// links. Every version is its own ancestor.
    pub fn is_ancestor(&self, ancestor: &ContentId, descendant: &ContentId) -> Result<bool> {
        Ok(self.ancestors(descendant)?.contains(ancestor))
    }

    /// All versions in topological order, parents before children.
    ///
    /// Kahn's algorithm over a sorted ready set, so versions whose order is
    /// not forced by the graph come out in lexicographic id order.
    pub fn topological_order(&self) -> Vec<ContentId> {
        let mut remaining: BTreeMap<ContentId, usize> = self
            .parents
            .iter()
            .map(|(id, parents)| (id.clone(), parents.len()))
            .collect();

        let mut ready: BTreeSet<ContentId> = remaining
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(id, _)| id.clone())
            .collect();

        let mut order = Vec::with_capacity(remaining.len());
        while let Some(next) = ready.iter().next().cloned() {
            ready.remove(&next);
            for child in self.children_of(&next) {
                if let Some(count) = remaining.get_mut(child) {
                    *count -= 1;
                    if *count == 0 {
                        ready.insert(child.clone());
                    }
                }
            }
            order.push(next);
        }
        order
    }

    /// The versions reachable from `head`, newest first.
    ///
    /// This is the reverse of [`topological_order`](Self::topological_order)
    /// restricted to the ancestors of `head`.
    pub fn ordered_from(&self, head: &ContentId) -> Result<Vec<ContentId>> {
        let reachable = self.ancestors(head)?;
        Ok(self
            .topological_order()
            .into_iter()
            .rev()
            .filter(|id| reachable.contains(id))
            .collect())
    }

    /// The lowest common ancestor of two versions.
    ///
    /// Candidates are the common ancestors that are not a proper ancestor of
    /// another common ancestor. When the DAG leaves several candidates (a
    /// criss-cross history), the lexicographically smallest id wins so the
    /// choice is deterministic.
    pub fn lowest_common_ancestor(&self, a: &ContentId, b: &ContentId) -> Result<ContentId> {
        let ancestors_a = self.ancestors(a)?;
        let ancestors_b = self.ancestors(b)?;
        let common: BTreeSet<&ContentId> = ancestors_a.intersection(&ancestors_b).collect();

        if common.is_empty() {
            return Err(HistoryError::NoCommonAncestor {
                a: a.clone(),
                b: b.clone(),
            }
            .into());
        }

        let mut lowest: Vec<&ContentId> = Vec::new();
        for candidate in &common {
            let dominated = common.iter().any(|other| {
                *other != *candidate
                    && self
                        .ancestors(other)
                        .map(|set| set.contains(*candidate))
                        .unwrap_or(false)
            });
            if !dominated {
                lowest.push(candidate);
            }
        }

        // BTreeSet iteration already sorted the candidates, so the first
        // survivor is the lexicographically smallest.
        Ok(lowest[0].clone())
    }
}
