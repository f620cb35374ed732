pub mod checksum;
pub mod format;
pub mod signature;
pub mod tree;

pub use checksum::{checksum, ADLER32_SEED};
pub use format::is_manifest_candidate;
pub use signature::{verify, SignatureEntry, SignatureTable};
pub use tree::{copy_tree, delete_tree, list_dir, read_to_string, undo_copy, CopyReport};
