//! Session application layer: the controller plus command and query handlers.

pub mod command_handlers;
pub mod controller;
pub mod query_handlers;
