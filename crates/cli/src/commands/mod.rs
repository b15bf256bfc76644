//! One module per `apizza` subcommand.
//!
//! Commands write user-facing text to the `out` writer they are given and
//! log everything else through `tracing`.

pub mod address;
pub mod cart;
pub mod config;
pub mod menu;
pub mod order;
pub mod root;
