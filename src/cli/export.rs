//! Export command: load a definition and re-serialize it.

use std::path::Path;
use std::process::ExitCode;

use crate::export::{export_animation, export_frames, write_animation_file};
use crate::registry::{load_animation_file, LoadError};
use crate::template;

use super::{print_warnings, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the export command
pub fn run_export(
    input: &Path,
    output: Option<&Path>,
    version: Option<&str>,
    name: Option<&str>,
    description: Option<&str>,
) -> ExitCode {
    let (mut animation, warnings) = match load_animation_file(input) {
        Ok(pair) => pair,
        Err(e @ LoadError::Io { .. }) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    print_warnings(&warnings);

    let version = version.unwrap_or(template::DEFAULT_VERSION);
    let text = match name {
        // Renaming re-derives the id from the new name.
        Some(name) => {
            let description = description.or(animation.metadata.description.as_deref());
            export_frames(&animation.frames, name, description, version)
        }
        None => {
            if let Some(description) = description {
                animation.metadata.description = Some(description.to_string());
            }
            export_animation(&animation, version)
        }
    };

    match output {
        Some(path) => {
            if let Err(e) = write_animation_file(path, &text) {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
            eprintln!("Wrote: {}", path.display());
        }
        None => print!("{}", text),
    }
    ExitCode::from(EXIT_SUCCESS)
}
