//! Reliability schema: the series/parallel block structure of the system
//!
//! A schema is an ordered sequence of nodes. A [`SchemaNode::Unit`] is a
//! serial dependency: that unit must be operational for the system to be up.
//! A [`SchemaNode::Group`] is a parallel redundancy group: at least one
//! member must be operational. The system is up when every node is satisfied.

use crate::error::SchemaError;
use serde::{Deserialize, Serialize};

/// One block of the reliability structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SchemaNode {
    /// A single unit wired in series.
    Unit(usize),
    /// A parallel group: the node is satisfied while any member is up.
    Group(Vec<usize>),
}

impl SchemaNode {
    fn indices(&self) -> &[usize] {
        match self {
            SchemaNode::Unit(index) => std::slice::from_ref(index),
            SchemaNode::Group(members) => members,
        }
    }
}

/// A validated reliability schema for a stack of `unit_count` units.
///
/// Validation happens once, here: evaluation never re-checks structure. The
/// unit count is fixed for a replication's lifetime, so a schema that is
/// consistent at construction stays consistent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    nodes: Vec<SchemaNode>,
    unit_count: usize,
}

impl Schema {
    /// Builds a schema, checking structural consistency against the stack it
    /// will describe.
    ///
    /// # Errors
    ///
    /// - [`SchemaError::EmptyGroup`] for a parallel group with no members
    ///   (it could never be satisfied).
    /// - [`SchemaError::IndexOutOfRange`] for a reference past `unit_count`.
    /// - [`SchemaError::UnitCountMismatch`] when the total number of
    ///   referenced indices differs from `unit_count`.
    pub fn new(nodes: Vec<SchemaNode>, unit_count: usize) -> Result<Self, SchemaError> {
        let mut found = 0;
        for (position, node) in nodes.iter().enumerate() {
            if matches!(node, SchemaNode::Group(members) if members.is_empty()) {
                return Err(SchemaError::EmptyGroup { position });
            }
            for &index in node.indices() {
                if index >= unit_count {
                    return Err(SchemaError::IndexOutOfRange { index, unit_count });
                }
                found += 1;
            }
        }
        if found != unit_count {
            return Err(SchemaError::UnitCountMismatch {
                expected: unit_count,
                found,
            });
        }
        Ok(Self { nodes, unit_count })
    }

    /// Is the system delivering its function for these unit states?
    ///
    /// AND over nodes; a group contributes the OR of its members. `states`
    /// holds one boolean per unit, `true` meaning operational.
    pub fn check(&self, states: &[bool]) -> bool {
        assert_eq!(
            states.len(),
            self.unit_count,
            "state snapshot does not match the schema's unit count"
        );
        self.nodes.iter().all(|node| match node {
            SchemaNode::Unit(index) => states[*index],
            SchemaNode::Group(members) => members.iter().any(|&index| states[index]),
        })
    }

    /// Fraction of referenced units currently operational, in `[0, 1]`.
    ///
    /// A linear proxy for system health: 1.0 when every unit is up, 0.0 when
    /// none are. Not part of the bound comparison, but recorded by the
    /// monitor as an alternative readiness signal.
    pub fn readiness(&self, states: &[bool]) -> f64 {
        assert_eq!(
            states.len(),
            self.unit_count,
            "state snapshot does not match the schema's unit count"
        );
        let operational: usize = self
            .nodes
            .iter()
            .flat_map(|node| node.indices())
            .filter(|&&index| states[index])
            .count();
        operational as f64 / self.unit_count as f64
    }

    pub fn nodes(&self) -> &[SchemaNode] {
        &self.nodes
    }

    pub fn unit_count(&self) -> usize {
        self.unit_count
    }
}
