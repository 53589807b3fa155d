//! Definition serialization: animations back to `.cel` text.
//!
//! Output is deterministic, hand-formatted JSON (also valid json5, so it
//! re-imports through the same loader): metadata first, frames in order,
//! content as one string per row, color keys sorted row-major with
//! symbolic color names. Lines carrying the current version string are
//! reconstituted into `${version_line:N}` templates so the exported
//! definition re-expands correctly for any future version.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::models::{Animation, AnimationMetadata, Frame, Position};
use crate::palette;
use crate::template;

/// Description written when the caller does not supply one.
pub const DEFAULT_DESCRIPTION: &str = "Custom animation created with the color editor";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Serializes an animation into definition text.
///
/// `version` is the version the frames were expanded with; content lines
/// matching it become `${version_line:N}` placeholders again.
pub fn export_animation(animation: &Animation, version: &str) -> String {
    let mut out = String::new();
    out.push_str("{\n");
    out.push_str("  \"metadata\": {\n");
    out.push_str(&format!(
        "    \"id\": \"{}\",\n",
        escape_json_string(&animation.metadata.id)
    ));
    match &animation.metadata.description {
        Some(description) => {
            out.push_str(&format!(
                "    \"name\": \"{}\",\n",
                escape_json_string(&animation.metadata.name)
            ));
            out.push_str(&format!(
                "    \"description\": \"{}\"\n",
                escape_json_string(description)
            ));
        }
        None => {
            out.push_str(&format!(
                "    \"name\": \"{}\"\n",
                escape_json_string(&animation.metadata.name)
            ));
        }
    }
    out.push_str("  },\n");
    out.push_str("  \"frames\": [\n");
    for (index, frame) in animation.frames.iter().enumerate() {
        out.push_str(&format_frame(frame, version));
        if index + 1 < animation.frames.len() {
            out.push_str(",\n");
        } else {
            out.push('\n');
        }
    }
    out.push_str("  ]\n");
    out.push_str("}\n");
    out
}

/// Serializes an edited frame sequence as a new animation. The id is
/// derived from the name; a missing description gets the stock one.
pub fn export_frames(
    frames: &[Frame],
    name: &str,
    description: Option<&str>,
    version: &str,
) -> String {
    let animation = Animation {
        metadata: AnimationMetadata {
            id: sanitize_id(name),
            name: name.to_string(),
            description: Some(
                description.map_or_else(|| DEFAULT_DESCRIPTION.to_string(), str::to_string),
            ),
        },
        frames: frames.to_vec(),
    };
    export_animation(&animation, version)
}

/// Filename for a named export, matching the discovery glob:
/// `animation-<sanitized>.cel`.
pub fn export_filename(name: &str) -> String {
    format!("animation-{}.cel", sanitize_id(name))
}

/// Lowercases and collapses every non-alphanumeric run to a single `-`.
/// Names with nothing usable fall back to `animation`.
pub fn sanitize_id(name: &str) -> String {
    let mut id = String::new();
    let mut pending_dash = false;
    for c in name.to_lowercase().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !id.is_empty() {
                id.push('-');
            }
            pending_dash = false;
            id.push(c);
        } else {
            pending_dash = true;
        }
    }
    if id.is_empty() {
        "animation".to_string()
    } else {
        id
    }
}

/// Writes definition text to disk, creating parent directories.
pub fn write_animation_file(path: &Path, contents: &str) -> Result<(), ExportError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).map_err(|source| ExportError::Io {
                path: path.display().to_string(),
                source,
            })?;
        }
    }
    fs::write(path, contents).map_err(|source| ExportError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn format_frame(frame: &Frame, version: &str) -> String {
    let mut s = String::new();
    s.push_str("    {\n");
    s.push_str(&format!(
        "      \"title\": \"{}\",\n",
        escape_json_string(&frame.title)
    ));
    s.push_str("      \"content\": [\n");
    let content = template::parameterize(&frame.content, version);
    let lines: Vec<&str> = content.split('\n').collect();
    for (index, line) in lines.iter().enumerate() {
        s.push_str(&format!(
            "        \"{}\"{}\n",
            escape_json_string(line),
            if index + 1 < lines.len() { "," } else { "" }
        ));
    }
    s.push_str("      ],\n");
    s.push_str(&format!("      \"duration\": {}", frame.duration));
    if frame.colors.is_empty() {
        s.push('\n');
    } else {
        s.push_str(",\n");
        s.push_str("      \"colors\": {\n");
        let mut entries: Vec<(&Position, &u8)> = frame.colors.iter().collect();
        entries.sort_by_key(|(p, _)| **p);
        for (index, (position, color)) in entries.iter().enumerate() {
            // Unknown indices stay numeric rather than failing the export.
            let value = match palette::color_name(**color as usize) {
                Ok(name) => format!("\"{}\"", name),
                Err(_) => color.to_string(),
            };
            s.push_str(&format!(
                "        \"{}\": {}{}\n",
                position,
                value,
                if index + 1 < entries.len() { "," } else { "" }
            ));
        }
        s.push_str("      }\n");
    }
    s.push_str("    }");
    s
}

fn escape_json_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '"' => result.push_str(r#"\""#),
            '\\' => result.push_str(r"\\"),
            '\n' => result.push_str(r"\n"),
            '\r' => result.push_str(r"\r"),
            '\t' => result.push_str(r"\t"),
            c if c.is_control() => {
                result.push_str(&format!(r"\u{:04x}", c as u32));
            }
            c => result.push(c),
        }
    }
    result
}
