//! Storyloom — Session State Engine.
//!
//! Owns the mutable player state, applies choice transitions under attribute
//! bounds, gates input on the text reveal, and serializes sessions to and
//! from a save slot with forward migration of older saves.

pub mod application;
pub mod domain;
