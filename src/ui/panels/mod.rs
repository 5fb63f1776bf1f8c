// Unicorn Logs - ui/panels/mod.rs

pub mod detail;
pub mod entries;
pub mod header;
