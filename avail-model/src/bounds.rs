//! Analytical readiness-coefficient bounds
//!
//! Closed-form envelopes for the quantity the simulation estimates. Both
//! start from the steady-state availability of a single unit with
//! exponential failures (rate λ) and repairs (rate μ) and no repair
//! contention, then combine it across the schema in an idealized way. The
//! empirical curve is expected to settle between them; they are constants,
//! not time-indexed.

use crate::schema::{Schema, SchemaNode};

/// Steady-state availability of one unit: `μ / (λ + μ)`.
///
/// # Panics
///
/// Panics if either rate is not positive.
pub fn steady_state_availability(failure_rate: f64, repair_rate: f64) -> f64 {
    assert!(failure_rate > 0.0, "Rate must be positive");
    assert!(repair_rate > 0.0, "Rate must be positive");
    repair_rate / (failure_rate + repair_rate)
}

/// Optimistic bound: every node treated as fully independent.
///
/// Product over schema nodes, where a serial unit contributes `r` and a
/// parallel group of `m` members contributes `1 - (1 - r)^m`. Optimistic
/// because it ignores repair-worker contention between units.
pub fn upper_bound(schema: &Schema, failure_rate: f64, repair_rate: f64) -> f64 {
    let r = steady_state_availability(failure_rate, repair_rate);
    schema
        .nodes()
        .iter()
        .map(|node| match node {
            SchemaNode::Unit(_) => r,
            SchemaNode::Group(members) => 1.0 - (1.0 - r).powi(members.len() as i32),
        })
        .product()
}

/// Pessimistic bound: every node collapsed to a bare series element.
///
/// `r^n` for `n` schema nodes, discarding all redundancy inside groups.
pub fn lower_bound(schema: &Schema, failure_rate: f64, repair_rate: f64) -> f64 {
    let r = steady_state_availability(failure_rate, repair_rate);
    r.powi(schema.nodes().len() as i32)
}
