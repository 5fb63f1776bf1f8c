// Unicorn Logs - core/mod.rs
//
// Core logic layer: data model, SSE decoding, entry list, title animation,
// export.
// Must NOT depend on: ui, platform, app, or network I/O.

pub mod entries;
pub mod export;
pub mod model;
pub mod rainbow;
pub mod sse;
