//! starmod: a local mod manager
//!
//! This crate provides the main starmod library, re-exporting the error type,
//! paths and file-integrity helpers from `starmod-core` and organizing the
//! load-order manager and its collaborators.

pub use starmod_core::{format_error_with_help, ErrorHelp, ModError, ModResult};

/// Core module re-exported from `starmod-core`.
pub mod core {
    pub use starmod_core::core::*;

    /// Path module re-exported from starmod-core.
    pub mod path {
        pub use starmod_core::core::path::*;
    }
}

/// Signature verification, checksums and file-tree helpers.
pub mod files {
    pub use starmod_core::files::*;
}

/// Configuration management.
pub mod config;

/// Mod records, loading, installing.
pub mod package;

/// Persistence gateway.
pub mod store;

/// The load-order manager.
pub mod modlist;

/// Blocking work off the calling thread.
pub mod tasks;
