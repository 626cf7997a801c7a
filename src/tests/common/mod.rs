//! Common Test Utilities
//!
//! Shared fixtures used across test modules.
