//! Draw command: coordinate-based color editing of a definition file.
//!
//! Read-modify-write: loads the definition, applies each requested
//! operation through the edit engine (one gesture batch per flag
//! occurrence, so each flag is one undo step), optionally rolls the
//! tail of the history back with `--undo`, and reserializes the file.
//!
//! Coordinates are validated against the frame's content up front; the
//! engine itself stays no-throw. Line cells that land on blank content
//! along the way are skipped, like a paste would drop them.

use std::path::Path;
use std::process::ExitCode;

use crate::edit::EditEngine;
use crate::export::{export_animation, write_animation_file};
use crate::models::{ColorValue, ContentGrid, Frame, Position};
use crate::palette;
use crate::raster;
use crate::registry::{load_animation_file, LoadError};
use crate::template;
use crate::terminal::render_coordinate_grid;

use super::{print_warnings, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// One parsed editing operation. Applied in the order paint, erase,
/// line, fill; within a group, in flag order.
#[derive(Debug, Clone, PartialEq, Eq)]
enum DrawOp {
    Paint { position: Position, color: u8 },
    Erase { position: Position },
    Line { start: Position, end: Position, color: u8 },
    Fill { seed: Position, color: u8 },
}

/// Execute the draw command
pub fn run_draw(
    input: &Path,
    frame_index: usize,
    paint: &[String],
    erase: &[String],
    line: &[String],
    fill: &[String],
    undo: usize,
    output: Option<&Path>,
    show: bool,
) -> ExitCode {
    let ops = match parse_ops(paint, erase, line, fill) {
        Ok(ops) => ops,
        Err(message) => {
            eprintln!("Error: {}", message);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

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

    if frame_index >= animation.frames.len() {
        eprintln!(
            "Error: frame {} out of range, '{}' has {} frames",
            frame_index,
            input.display(),
            animation.frames.len()
        );
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    // Validate every target before touching anything, so a bad op
    // leaves the file as it was.
    let grid = animation.frames[frame_index].grid();
    for op in &ops {
        if let Err(message) = check_op(op, &grid) {
            eprintln!("Error: {}", message);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    }

    let mut engine = EditEngine::new();
    for op in &ops {
        engine.start_batch();
        apply_op(&mut engine, &mut animation.frames, frame_index, op, &grid);
        engine.commit_batch();
    }
    for _ in 0..undo {
        if !engine.undo(&mut animation.frames) {
            break;
        }
    }

    if show {
        print_frame(&animation.frames[frame_index]);
        return ExitCode::from(EXIT_SUCCESS);
    }

    let text = export_animation(&animation, template::DEFAULT_VERSION);
    let target = output.unwrap_or(input);
    if let Err(e) = write_animation_file(target, &text) {
        eprintln!("Error: {}", e);
        return ExitCode::from(EXIT_ERROR);
    }
    eprintln!("Wrote: {}", target.display());
    ExitCode::from(EXIT_SUCCESS)
}

fn parse_ops(
    paint: &[String],
    erase: &[String],
    line: &[String],
    fill: &[String],
) -> Result<Vec<DrawOp>, String> {
    let mut ops = Vec::new();
    for spec in paint {
        let (position, color) = parse_cell_color(spec)?;
        ops.push(DrawOp::Paint { position, color });
    }
    for spec in erase {
        ops.push(DrawOp::Erase { position: parse_position(spec)? });
    }
    for spec in line {
        ops.push(parse_line_spec(spec)?);
    }
    for spec in fill {
        let (seed, color) = parse_cell_color(spec)?;
        ops.push(DrawOp::Fill { seed, color });
    }
    Ok(ops)
}

fn parse_position(spec: &str) -> Result<Position, String> {
    spec.trim().parse::<Position>().map_err(|e| e.to_string())
}

/// A color argument: a palette index or a name like `bright-red`.
fn parse_color(token: &str) -> Result<u8, String> {
    let token = token.trim();
    let value = match token.parse::<u8>() {
        Ok(index) => ColorValue::Index(index),
        Err(_) => ColorValue::Name(token.to_string()),
    };
    value.to_index()
}

/// Parses `R,C=COLOR`.
fn parse_cell_color(spec: &str) -> Result<(Position, u8), String> {
    let (cell, color) = spec
        .split_once('=')
        .ok_or_else(|| format!("invalid spec '{}', expected R,C=COLOR", spec))?;
    Ok((parse_position(cell)?, parse_color(color)?))
}

/// Parses `R0,C0:R1,C1=COLOR`.
fn parse_line_spec(spec: &str) -> Result<DrawOp, String> {
    let (cells, color) = spec
        .split_once('=')
        .ok_or_else(|| format!("invalid spec '{}', expected R0,C0:R1,C1=COLOR", spec))?;
    let (start, end) = cells
        .split_once(':')
        .ok_or_else(|| format!("invalid spec '{}', expected R0,C0:R1,C1=COLOR", spec))?;
    Ok(DrawOp::Line {
        start: parse_position(start)?,
        end: parse_position(end)?,
        color: parse_color(color)?,
    })
}

fn check_op(op: &DrawOp, grid: &ContentGrid) -> Result<(), String> {
    let check = |position: Position| {
        if grid.is_paintable(position.row, position.col) {
            Ok(())
        } else {
            Err(format!("cell {} is blank or outside the frame", position))
        }
    };
    match op {
        DrawOp::Paint { position, .. } => check(*position),
        // Erase may aim anywhere: stale entries can sit on blank cells.
        DrawOp::Erase { .. } => Ok(()),
        DrawOp::Line { start, end, .. } => check(*start).and_then(|()| check(*end)),
        DrawOp::Fill { seed, .. } => check(*seed),
    }
}

fn apply_op(
    engine: &mut EditEngine,
    frames: &mut [Frame],
    frame_index: usize,
    op: &DrawOp,
    grid: &ContentGrid,
) {
    match op {
        DrawOp::Paint { position, color } => {
            engine.paint_character(frames, frame_index, position.row, position.col, *color);
        }
        DrawOp::Erase { position } => {
            engine.erase_character(frames, frame_index, position.row, position.col);
        }
        DrawOp::Line { start, end, color } => {
            for cell in raster::line_cells(start.row, start.col, end.row, end.col) {
                if grid.is_paintable(cell.row, cell.col) {
                    engine.paint_character(frames, frame_index, cell.row, cell.col, *color);
                }
            }
        }
        DrawOp::Fill { seed, color } => {
            engine.flood_fill(frames, frame_index, seed.row, seed.col, *color);
        }
    }
}

fn print_frame(frame: &Frame) {
    print!("{}", render_coordinate_grid(frame));
    let mut entries: Vec<(&Position, &u8)> = frame.colors.iter().collect();
    entries.sort_by_key(|(p, _)| **p);
    for (position, color) in entries {
        match palette::color_name(*color as usize) {
            Ok(name) => println!("{}: {}", position, name),
            Err(_) => println!("{}: {}", position, color),
        }
    }
}
