//! Story loading.

pub mod loader;
