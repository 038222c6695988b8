//! Centralized constants for kubeboot.
//!
//! Record names, field keys and default paths live here.
//! Change a value in one place and it applies everywhere.

pub mod discovery;
pub mod paths;
pub mod token;
