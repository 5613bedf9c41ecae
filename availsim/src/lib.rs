//! # availsim - Readiness-Coefficient Simulation
//!
//! Estimates the steady-state availability (readiness coefficient) of a
//! redundant multi-component system by discrete-event simulation and checks
//! the empirical result against closed-form series/parallel bounds.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use availsim::prelude::*;
//!
//! let report = run_study(&StudyConfig::default())?;
//! for (tick, availability) in &report.curve {
//!     println!("{tick}: {availability:.3}");
//! }
//! ```

pub use avail_core as core;

pub use avail_metrics as metrics;

pub use avail_model as model;

pub mod prelude {
    //! Commonly used types and functions

    pub use avail_core::{Execute, Executor, Key, SimTime, Simulation};

    pub use avail_metrics::{MetricsStore, ReplicationId};

    pub use avail_model::{
        run_study, ReadinessReport, Schema, SchemaNode, SimulationStack, StudyConfig,
    };
}
