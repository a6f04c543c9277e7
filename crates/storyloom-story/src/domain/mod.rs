//! Story graph domain types.

pub mod action;
pub mod attribute;
pub mod document;
pub mod scene;
pub mod story;
