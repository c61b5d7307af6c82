// File: services/bookify_backend/src/lib.rs
pub mod app; // Router assembly
pub mod cors; // Origin allow-list
pub mod lifecycle; // Signals, shutdown and panic policy

pub use app::build_app;
