//! Storyloom — Story Graph.
//!
//! Static, read-only configuration supplied once by the host: attribute
//! definitions with their bounds, the scene graph, starting inventory and
//! the prompt templates used for guidance requests.

pub mod application;
pub mod domain;
