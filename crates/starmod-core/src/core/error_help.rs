use crate::core::ModError;

/// Provides helpful suggestions for common errors
pub trait ErrorHelp {
    fn help(&self) -> Option<String>;
}

impl ErrorHelp for ModError {
    fn help(&self) -> Option<String> {
        match self {
            ModError::FormatMismatch(msg) => {
                if msg.contains("Unsupported extension") {
                    Some(
                        "💡 Suggestion: Only .zip, .rar and .7z archives are accepted. Add an entry to 'extra_signatures' in config.yaml for other formats"
                            .to_string(),
                    )
                } else {
                    Some(
                        "💡 Suggestion: The file does not look like a genuine archive. Re-download it, or check that the extension matches the content"
                            .to_string(),
                    )
                }
            }
            ModError::NotFound(_) => Some(
                "💡 Suggestion: The file or mod may not exist. Run 'starmod list' to see managed mods"
                    .to_string(),
            ),
            ModError::Duplicate(_) => Some(
                "💡 Suggestion: This package is already managed. Remove the existing mod first if you want to replace it"
                    .to_string(),
            ),
            ModError::Locked(_) => Some(
                "💡 Suggestion: Unlock the mod list before changing it".to_string(),
            ),
            ModError::Task(_) => Some(
                "💡 Suggestion: Processing this file crashed. Run again with RUST_LOG=debug and report the output"
                    .to_string(),
            ),
            ModError::Config(msg) => {
                if msg.contains("game_dir") {
                    Some(
                        "💡 Suggestion: Set 'game_dir' in config.yaml to the game's mods directory"
                            .to_string(),
                    )
                } else {
                    None
                }
            }
            ModError::Path(msg) => {
                if msg.contains("Could not determine") {
                    Some(
                        "💡 Suggestion: Check your system environment variables (HOME, APPDATA, etc.)"
                            .to_string(),
                    )
                } else {
                    None
                }
            }
            ModError::Yaml(e) => Some(format!(
                "💡 Suggestion: Check your YAML syntax. Common issues:\n  - Missing colons after keys\n  - Incorrect indentation\n  - Unclosed quotes\n\nError details: {}",
                e
            )),
            ModError::Io(e) => {
                if e.kind() == std::io::ErrorKind::PermissionDenied {
                    Some(
                        "💡 Suggestion: Check file permissions, or try running with appropriate permissions"
                            .to_string(),
                    )
                } else {
                    None
                }
            }
            ModError::PartialWrite { .. } => Some(
                "💡 Suggestion: The load order was only partly saved. Fix the storage problem and repeat the move"
                    .to_string(),
            ),
            _ => None,
        }
    }
}

/// Format an error with helpful suggestions
pub fn format_error_with_help(error: &ModError) -> String {
    let mut output = format!("❌ Error: {}", error);

    if let Some(help) = error.help() {
        output.push_str("\n\n");
        output.push_str(&help);
    }

    output
}
