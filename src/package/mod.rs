pub mod extractor;
pub mod installer;
pub mod loader;
pub mod record;

pub use extractor::PackageExtractor;
pub use installer::{Installation, ModInstaller};
pub use loader::{internal_name_for, ArchiveModLoader, ModLoader};
pub use record::Mod;
