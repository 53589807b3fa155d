//! List command: enumerate animations discovered in a directory.

use std::path::Path;
use std::process::ExitCode;

use crate::registry::AnimationRegistry;

use super::{print_warnings, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the list command
pub fn run_list(dir: &Path, json: bool) -> ExitCode {
    if !dir.is_dir() {
        eprintln!("Error: '{}' is not a directory", dir.display());
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let mut registry = AnimationRegistry::new();
    let warnings = match registry.load_directory(dir) {
        Ok(warnings) => warnings,
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };

    if json {
        let animations: Vec<_> = registry
            .metadata_list()
            .iter()
            .map(|metadata| {
                let frames = registry
                    .animation(&metadata.id)
                    .map_or(0, |a| a.frames.len());
                serde_json::json!({
                    "id": metadata.id,
                    "name": metadata.name,
                    "description": metadata.description,
                    "frames": frames,
                    "supports_version": registry.supports_version(&metadata.id),
                })
            })
            .collect();
        let output = serde_json::json!({
            "animations": animations,
            "warnings": warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).expect("JSON value serialization")
        );
        return ExitCode::from(EXIT_SUCCESS);
    }

    if registry.is_empty() {
        println!("No animations found in '{}'", dir.display());
    } else {
        for metadata in registry.metadata_list() {
            let frames = registry
                .animation(&metadata.id)
                .map_or(0, |a| a.frames.len());
            let versioned = if registry.supports_version(&metadata.id) {
                "  [versioned]"
            } else {
                ""
            };
            println!(
                "{:<20} {} ({} frames){}",
                metadata.id, metadata.name, frames, versioned
            );
            if let Some(description) = &metadata.description {
                println!("{:<20} {}", "", description);
            }
        }
    }
    print_warnings(&warnings);
    ExitCode::from(EXIT_SUCCESS)
}
