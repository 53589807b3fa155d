//! Command-line interface implementation
//!
//! This module provides the CLI entry point and dispatches to submodules
//! for specific command implementations.

mod draw;
mod export;
mod info;
mod list;
mod play;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::models::Warning;

/// Exit codes shared by every subcommand
pub(crate) const EXIT_SUCCESS: u8 = 0;
pub(crate) const EXIT_ERROR: u8 = 1;
pub(crate) const EXIT_INVALID_ARGS: u8 = 2;

/// Check if a path has a definition file extension (.cel or .json5).
pub fn is_definition_file(path: &std::path::Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("cel") | Some("json5")
    )
}

pub(crate) fn print_warnings(warnings: &[Warning]) {
    for warning in warnings {
        eprintln!("Warning: {}", warning);
    }
}

/// Termcel - load, edit, play, and export terminal ASCII animations
#[derive(Parser)]
#[command(name = "tcel")]
#[command(about = "Termcel - load, edit, play, and export terminal ASCII animations")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List animations discovered in a directory
    List {
        /// Directory containing animation-*.cel / animation-*.json5 files
        dir: PathBuf,

        /// Machine-readable JSON output
        #[arg(long)]
        json: bool,
    },

    /// Show metadata and frame details for a definition file
    Info {
        /// Definition file (.cel or .json5)
        input: PathBuf,

        /// Machine-readable JSON output
        #[arg(long)]
        json: bool,

        /// Also render each frame with coordinate headers
        #[arg(long)]
        grid: bool,
    },

    /// Play an animation in the terminal
    Play {
        /// Definition file or directory of definitions; omit for built-ins
        input: Option<PathBuf>,

        /// Animation id to play (for directories and built-ins)
        #[arg(short, long)]
        animation: Option<String>,

        /// Version substituted into templated lines
        #[arg(long)]
        version: Option<String>,

        /// Print every frame once and exit (no terminal needed)
        #[arg(long)]
        once: bool,

        /// Stop after the last frame instead of looping
        #[arg(long)]
        no_loop: bool,
    },

    /// Re-serialize a definition, normalizing formatting and color names
    Export {
        /// Definition file (.cel or .json5)
        input: PathBuf,

        /// Output file; prints to stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Version the frames were authored at (for template recovery)
        #[arg(long)]
        version: Option<String>,

        /// Override the animation name (re-derives the id)
        #[arg(long)]
        name: Option<String>,

        /// Override the animation description
        #[arg(long)]
        description: Option<String>,
    },

    /// Edit cell colors in a definition file
    Draw {
        /// Definition file (.cel or .json5)
        input: PathBuf,

        /// Frame index to edit
        #[arg(long, default_value = "0")]
        frame: usize,

        /// Paint one cell; repeatable, one undo step each
        #[arg(long = "paint", value_name = "R,C=COLOR")]
        paint: Vec<String>,

        /// Erase one cell's color; repeatable
        #[arg(long = "erase", value_name = "R,C")]
        erase: Vec<String>,

        /// Paint a straight line of cells; repeatable
        #[arg(long = "line", value_name = "R0,C0:R1,C1=COLOR")]
        line: Vec<String>,

        /// Flood-fill the region around a seed cell; repeatable
        #[arg(long = "fill", value_name = "R,C=COLOR")]
        fill: Vec<String>,

        /// Undo the last N edits before writing
        #[arg(long, value_name = "N", default_value = "0")]
        undo: usize,

        /// Output file; rewrites the input in place when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Preview the edited frame with coordinates instead of writing
        #[arg(long)]
        show: bool,
    },
}

/// Run the CLI application
pub fn run() -> ExitCode {
    let cli = Cli::parse();

    match cli.command {
        Commands::List { dir, json } => list::run_list(&dir, json),
        Commands::Info { input, json, grid } => info::run_info(&input, json, grid),
        Commands::Play {
            input,
            animation,
            version,
            once,
            no_loop,
        } => play::run_play(
            input.as_deref(),
            animation.as_deref(),
            version.as_deref(),
            once,
            no_loop,
        ),
        Commands::Export {
            input,
            output,
            version,
            name,
            description,
        } => export::run_export(
            &input,
            output.as_deref(),
            version.as_deref(),
            name.as_deref(),
            description.as_deref(),
        ),
        Commands::Draw {
            input,
            frame,
            paint,
            erase,
            line,
            fill,
            undo,
            output,
            show,
        } => draw::run_draw(
            &input,
            frame,
            &paint,
            &erase,
            &line,
            &fill,
            undo,
            output.as_deref(),
            show,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_is_definition_file() {
        assert!(is_definition_file(Path::new("animation-spinner.cel")));
        assert!(is_definition_file(Path::new("dir/animation-x.json5")));
        assert!(!is_definition_file(Path::new("animation.json")));
        assert!(!is_definition_file(Path::new("readme.md")));
        assert!(!is_definition_file(Path::new("no_extension")));
    }
}
