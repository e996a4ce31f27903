//! Shared module - data model and common utilities used across all features.

pub mod models;
pub mod ports;
pub mod utils;

pub use models::{Call, CallGraph, Edge, Group, GroupId, GroupType, Node, NodeId, Variable, VariablePointee};
pub use ports::LanguageId;
