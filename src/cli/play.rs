//! Play command: terminal playback on the system clock.

use std::io::{self, Write};
use std::path::Path;
use std::process::ExitCode;
use std::thread;
use std::time::Duration;

use crate::palette::Palette;
use crate::player::{Player, SystemClock};
use crate::registry::{load_animation_file, AnimationRegistry, LoadError};
use crate::store::FrameStore;
use crate::template;
use crate::terminal;

use super::{print_warnings, EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Sleep floor for the redraw loop, so zero-duration frames cannot
/// busy-spin.
const MIN_SLEEP: Duration = Duration::from_millis(1);

/// Execute the play command
pub fn run_play(
    input: Option<&Path>,
    animation_id: Option<&str>,
    version: Option<&str>,
    once: bool,
    no_loop: bool,
) -> ExitCode {
    let (registry, warnings) = match input {
        None => (AnimationRegistry::with_builtins(), Vec::new()),
        Some(path) if path.is_dir() => {
            let mut registry = AnimationRegistry::new();
            match registry.load_directory(path) {
                Ok(warnings) => (registry, warnings),
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return ExitCode::from(EXIT_ERROR);
                }
            }
        }
        Some(path) => match load_animation_file(path) {
            Ok((animation, warnings)) => {
                let mut registry = AnimationRegistry::new();
                registry.register(animation);
                (registry, warnings)
            }
            Err(e @ LoadError::Io { .. }) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_INVALID_ARGS);
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        },
    };
    print_warnings(&warnings);

    let id = match animation_id {
        Some(id) if registry.contains(id) => id.to_string(),
        Some(id) => {
            eprintln!("Error: no animation '{}'. Available:", id);
            for known in registry.ids() {
                eprintln!("  {}", known);
            }
            return ExitCode::from(EXIT_ERROR);
        }
        None => {
            let default_id = registry.default_animation_id();
            if registry.contains(default_id) {
                default_id.to_string()
            } else if let Some(first) = registry.ids().first() {
                (*first).to_string()
            } else {
                eprintln!("Error: no animations found");
                return ExitCode::from(EXIT_ERROR);
            }
        }
    };

    let version = version.unwrap_or(template::DEFAULT_VERSION);
    let Some(frames) = registry.create_frames_with_version(&id, version) else {
        eprintln!("Error: no animation '{}'", id);
        return ExitCode::from(EXIT_ERROR);
    };
    if frames.is_empty() {
        eprintln!("Error: animation '{}' has no frames", id);
        return ExitCode::from(EXIT_ERROR);
    }

    let palette = Palette::new();
    let store = FrameStore::new(frames);

    if once {
        let colored = atty::is(atty::Stream::Stdout);
        for (index, frame) in store.frames().iter().enumerate() {
            println!("== {} ({} ms)", frame.title, frame.duration);
            if colored {
                print!("{}", terminal::render_frame(frame, &palette));
            } else {
                print!("{}", terminal::render_plain(frame));
            }
            if index + 1 < store.frame_count() {
                println!();
            }
        }
        return ExitCode::from(EXIT_SUCCESS);
    }

    if !atty::is(atty::Stream::Stdout) {
        eprintln!("Error: stdout is not a terminal; use --once for plain output");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let mut player = Player::new(SystemClock);
    player.set_looping(!no_loop);
    player.toggle(&store);

    // TODO: restore the cursor on Ctrl-C; needs a signal handler.
    let mut stdout = io::stdout();
    let _ = write!(stdout, "{}{}", terminal::CLEAR_SCREEN, terminal::HIDE_CURSOR);
    draw_frame(&mut stdout, &store, player.current_frame(), &palette);
    while player.is_playing() {
        let wait = player
            .time_until_deadline()
            .unwrap_or(MIN_SLEEP)
            .max(MIN_SLEEP);
        thread::sleep(wait);
        if player.poll(&store) {
            draw_frame(&mut stdout, &store, player.current_frame(), &palette);
        }
    }
    let _ = write!(stdout, "{}", terminal::SHOW_CURSOR);
    let _ = stdout.flush();
    ExitCode::from(EXIT_SUCCESS)
}

fn draw_frame(stdout: &mut io::Stdout, store: &FrameStore, index: usize, palette: &Palette) {
    let Some(frame) = store.frame(index) else {
        return;
    };
    let _ = write!(
        stdout,
        "{}{}{}",
        terminal::CURSOR_HOME,
        terminal::render_frame(frame, palette),
        terminal::CLEAR_BELOW
    );
    let _ = stdout.flush();
}
