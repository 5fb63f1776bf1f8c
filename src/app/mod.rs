// Unicorn Logs - app/mod.rs
//
// Application layer: stream subscription and viewer state.
// Dependencies: core layer.
// Must NOT depend on: ui, platform specifics.

pub mod stream;
pub mod viewer;
