//! Session domain: state, transitions, persistence schema, reveal gate.

pub mod commands;
pub mod events;
pub mod migration;
pub mod reveal;
pub mod save;
pub mod state;
pub mod transition;
