// Core functionality
pub mod core;

// Archive signatures, checksums and file-tree helpers
pub mod files;

// Re-export commonly used types
pub use core::{format_error_with_help, ErrorHelp, ModError, ModResult};
pub use files::checksum::{checksum, ADLER32_SEED};
pub use files::signature::{verify, SignatureEntry, SignatureTable};
