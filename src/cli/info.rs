//! Info command: metadata and frame details for one definition file.

use std::path::Path;
use std::process::ExitCode;

use crate::registry::{load_animation_file, validate_animation, LoadError};
use crate::store::FrameStore;
use crate::template;
use crate::terminal::render_coordinate_grid;

use super::{print_warnings, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the info command
pub fn run_info(input: &Path, json: bool, grid: bool) -> ExitCode {
    let (animation, mut warnings) = match load_animation_file(input) {
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
    warnings.extend(validate_animation(&animation));

    let store = FrameStore::new(animation.frames.clone());
    let dimensions = store.max_dimensions();
    let supports_version = animation
        .frames
        .iter()
        .any(|f| template::contains_template(&f.content));

    if json {
        let frames: Vec<_> = animation
            .frames
            .iter()
            .map(|frame| {
                serde_json::json!({
                    "title": frame.title,
                    "duration_ms": frame.duration,
                    "colors": frame.colors.len(),
                })
            })
            .collect();
        let output = serde_json::json!({
            "id": animation.metadata.id,
            "name": animation.metadata.name,
            "description": animation.metadata.description,
            "frames": frames,
            "max_width": dimensions.width,
            "max_height": dimensions.height,
            "supports_version": supports_version,
            "warnings": warnings.iter().map(|w| w.to_string()).collect::<Vec<_>>(),
        });
        println!(
            "{}",
            serde_json::to_string_pretty(&output).expect("JSON value serialization")
        );
        return ExitCode::from(EXIT_SUCCESS);
    }

    println!("Animation: {} ({})", animation.metadata.name, animation.metadata.id);
    if let Some(description) = &animation.metadata.description {
        println!("Description: {}", description);
    }
    println!(
        "Frames: {}, max {}x{} cells{}",
        store.frame_count(),
        dimensions.width,
        dimensions.height,
        if supports_version { ", versioned" } else { "" }
    );
    for (index, frame) in animation.frames.iter().enumerate() {
        let colors = frame.colors.len();
        let plural = if colors == 1 { "" } else { "s" };
        println!(
            "  {:>3}  {:<24} {:>5} ms  {} color{}",
            index, frame.title, frame.duration, colors, plural
        );
        if grid {
            print!("{}", render_coordinate_grid(frame));
        }
    }
    print_warnings(&warnings);
    ExitCode::from(EXIT_SUCCESS)
}
