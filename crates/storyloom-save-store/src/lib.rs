//! Storyloom — file-backed save slots.

pub mod file_save_store;
