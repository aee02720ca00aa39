//! Core use-case services.
//!
//! # Responsibility
//! - Own the canonical `AppState` and funnel every mutation through it.
//! - Keep UI/FFI layers decoupled from storage details.

pub mod app_shell;
