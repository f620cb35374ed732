/// Extensions that are never a package's structured manifest/config files:
/// images, audio, plain text, scripts and fonts.
const NON_MANIFEST_EXTENSIONS: &[&str] = &["png", "wav", "ogg", "txt", "lua", "ttf"];

/// Whether `filename` should be treated as a candidate manifest/config file.
///
/// Coarse denylist heuristic: anything not known to be binary, media,
/// script or font content is assumed to be structured data.
pub fn is_manifest_candidate(filename: &str) -> bool {
    let lower = filename.to_lowercase();
    !NON_MANIFEST_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext)))
}
