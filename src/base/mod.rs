//! Base types shared by every stage of the wire engine.
//!
//! - [`neterror`]: the error taxonomy surfaced to callers
//! - [`deadline`]: monotonic per-request deadline handling

pub mod deadline;
pub mod neterror;
