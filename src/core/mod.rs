//! Core infrastructure shared across subsystems

pub mod pattern;
