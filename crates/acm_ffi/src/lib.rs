//! Flutter-facing bridge over `acm_core`.

pub mod api;
