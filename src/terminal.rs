//! Terminal rendering utilities for colored frame display
//!
//! Provides ANSI escape sequence generation for displaying animation
//! frames with true-color foregrounds in terminal emulators that support
//! 24-bit color.

use crate::models::{Frame, Position};
use crate::palette::{Palette, Rgb};

/// ANSI escape sequence to reset all formatting
pub const ANSI_RESET: &str = "\x1b[0m";

/// Clears the screen (play loop redraw).
pub const CLEAR_SCREEN: &str = "\x1b[2J";

/// Moves the cursor to the top-left corner.
pub const CURSOR_HOME: &str = "\x1b[H";

/// Erases from the cursor to the end of the screen, clearing leftovers
/// when a shorter frame replaces a taller one.
pub const CLEAR_BELOW: &str = "\x1b[0J";

pub const HIDE_CURSOR: &str = "\x1b[?25l";
pub const SHOW_CURSOR: &str = "\x1b[?25h";

/// Convert an RGB color to an ANSI 24-bit foreground escape sequence.
///
/// # Examples
///
/// ```
/// use termcel::terminal::color_to_ansi_fg;
/// use termcel::palette::Rgb;
///
/// let red = color_to_ansi_fg(Rgb::new(255, 0, 0));
/// assert_eq!(red, "\x1b[38;2;255;0;0m");
/// ```
pub fn color_to_ansi_fg(rgb: Rgb) -> String {
    format!("\x1b[38;2;{};{};{}m", rgb.r, rgb.g, rgb.b)
}

/// Render a frame with ANSI-colored characters.
///
/// Cells with a color entry are wrapped in a truecolor foreground escape
/// and a reset; everything else passes through plain. Color entries whose
/// index falls outside the palette render plain rather than failing.
pub fn render_frame(frame: &Frame, palette: &Palette) -> String {
    let mut output = String::new();
    for (row, line) in frame.content.split('\n').enumerate() {
        for (col, c) in line.chars().enumerate() {
            match frame.colors.get(&Position::new(row, col)) {
                Some(&index) => match palette.get(index as usize) {
                    Ok(rgb) => {
                        output.push_str(&color_to_ansi_fg(rgb));
                        output.push(c);
                        output.push_str(ANSI_RESET);
                    }
                    Err(_) => output.push(c),
                },
                None => output.push(c),
            }
        }
        output.push('\n');
    }
    output
}

/// Render a frame without any escape sequences.
pub fn render_plain(frame: &Frame) -> String {
    let mut output = String::new();
    for line in frame.content.split('\n') {
        output.push_str(line);
        output.push('\n');
    }
    output
}

/// Render a frame with row/column coordinate headers.
///
/// Displays the frame content with column numbers across the top and row
/// numbers down the left side, making it easy to reference specific cell
/// positions for paint and erase commands.
///
/// # Examples
///
/// ```
/// use termcel::models::Frame;
/// use termcel::terminal::render_coordinate_grid;
///
/// let frame = Frame::new("t", "ab\ncd", 100);
/// let output = render_coordinate_grid(&frame);
/// // Output:
/// //      0  1
/// //    ┌──────
/// //  0 │ a  b
/// //  1 │ c  d
/// ```
pub fn render_coordinate_grid(frame: &Frame) -> String {
    let lines: Vec<Vec<char>> = frame
        .content
        .split('\n')
        .map(|line| line.chars().collect())
        .collect();
    let max_cols = lines.iter().map(Vec::len).max().unwrap_or(0);
    if max_cols == 0 {
        return String::new();
    }

    let mut output = String::new();
    let row_num_width = (lines.len().saturating_sub(1)).to_string().len().max(2);

    // Column header line
    output.push_str(&" ".repeat(row_num_width + 1));
    for col in 0..max_cols {
        output.push_str(&format!("{:>2} ", col));
    }
    output.push('\n');

    // Border line
    output.push_str(&" ".repeat(row_num_width));
    output.push_str(" \u{250C}"); // ┌
    output.push_str(&"\u{2500}".repeat(max_cols * 3)); // ─
    output.push('\n');

    // Data rows
    for (row_idx, chars) in lines.iter().enumerate() {
        output.push_str(&format!(
            "{:>width$} \u{2502}",
            row_idx,
            width = row_num_width
        )); // │
        for c in chars {
            let display = if c.is_whitespace() { '·' } else { *c };
            output.push_str(&format!(" {:>2}", display));
        }
        output.push('\n');
    }

    output
}
