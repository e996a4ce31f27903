//! callflow-ir - static call-flow graph extraction.
//!
//! Feature-First architecture:
//! - shared/   : common models (Node, Group, Call, Edge, Variable) and ports
//! - features/ : vertical slices (parsing → builder → filters → resolver → subset → projector)
//! - pipeline/ : orchestration, in the dependency order above
//!
//! The library has no Python or native-extension surface; `bin/callflow.rs`
//! is the only consumer-facing entry point.

pub mod errors;
pub mod features;
pub mod pipeline;
pub mod shared;

pub use errors::{CallflowError, Result};
pub use pipeline::{run, PipelineOptions};
