//! Animation registry: discovery, lenient loading, and frame factories.
//!
//! Definition files are discovered by glob (`animation-*.cel`,
//! `animation-*.json5`) and parsed with json5. Loading is lenient: a
//! malformed file becomes a warning and is skipped, so one bad definition
//! never prevents the rest from loading. The registry also ships two
//! built-in animations so the player works with no files at all.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::{Animation, AnimationDoc, AnimationMetadata, Frame, Position, Warning};
use crate::palette::PALETTE_SIZE;
use crate::template;

/// Id of the animation selected when nothing else is configured.
pub const DEFAULT_ANIMATION_ID: &str = "spinner";

/// Error type for registry directory scans
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("invalid search pattern: {0}")]
    Pattern(#[from] glob::PatternError),
}

/// Error type for loading a single definition file
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

/// Loads and resolves one animation definition file.
///
/// Unlike directory scans this is strict about the file itself: read and
/// parse failures are errors. Invalid color entries still degrade to
/// warnings.
pub fn load_animation_file(path: &Path) -> Result<(Animation, Vec<Warning>), LoadError> {
    let text = fs::read_to_string(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let doc: AnimationDoc = json5::from_str(&text).map_err(|e| LoadError::Parse {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let (animation, warnings) = doc.resolve();
    Ok((animation, attach_path(warnings, path)))
}

/// Sanity checks over a resolved animation. Warnings only, never fatal:
/// stale color entries on blank cells are permitted by the data model,
/// but worth surfacing.
pub fn validate_animation(animation: &Animation) -> Vec<Warning> {
    let mut warnings = Vec::new();
    if animation.frames.is_empty() {
        warnings.push(Warning::new("animation has no frames"));
    }
    for (index, frame) in animation.frames.iter().enumerate() {
        let source = format!("frame {}", index);
        if frame.content.is_empty() {
            warnings.push(Warning::with_source("empty content", source.clone()));
        }
        if frame.duration == 0 {
            warnings.push(Warning::with_source("zero duration", source.clone()));
        }
        let grid = frame.grid();
        let mut entries: Vec<(&Position, &u8)> = frame.colors.iter().collect();
        entries.sort_by_key(|(p, _)| **p);
        for (position, color) in entries {
            if (*color as usize) >= PALETTE_SIZE {
                warnings.push(Warning::with_source(
                    format!("color index {} at {} out of range", color, position),
                    source.clone(),
                ));
            } else if !grid.is_paintable(position.row, position.col) {
                warnings.push(Warning::with_source(
                    format!("color entry at {} addresses a blank cell", position),
                    source.clone(),
                ));
            }
        }
    }
    warnings
}

/// Animations known to the session, keyed by id.
#[derive(Debug)]
pub struct AnimationRegistry {
    animations: HashMap<String, Animation>,
    default_id: String,
}

impl Default for AnimationRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        AnimationRegistry {
            animations: HashMap::new(),
            default_id: DEFAULT_ANIMATION_ID.to_string(),
        }
    }

    /// A registry preloaded with the built-in animations.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for animation in builtin_animations() {
            registry.register(animation);
        }
        registry
    }

    /// Inserts an animation, replacing any previous one with the same id.
    pub fn register(&mut self, animation: Animation) {
        self.animations
            .insert(animation.metadata.id.clone(), animation);
    }

    /// Scans a directory for `animation-*` definition files and loads
    /// every parseable one. Returns the accumulated warnings; bad files
    /// are skipped, not fatal.
    pub fn load_directory(&mut self, dir: &Path) -> Result<Vec<Warning>, RegistryError> {
        let mut warnings = Vec::new();
        let mut paths: Vec<PathBuf> = Vec::new();
        for pattern in ["animation-*.cel", "animation-*.json5"] {
            let full = dir.join(pattern);
            for entry in glob::glob(&full.to_string_lossy())? {
                match entry {
                    Ok(path) => paths.push(path),
                    Err(e) => warnings.push(Warning::with_source(
                        e.to_string(),
                        e.path().display().to_string(),
                    )),
                }
            }
        }
        paths.sort();
        paths.dedup();
        for path in paths {
            self.load_path(&path, &mut warnings);
        }
        Ok(warnings)
    }

    fn load_path(&mut self, path: &Path, warnings: &mut Vec<Warning>) {
        let source = path.display().to_string();
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) => {
                warnings.push(Warning::with_source(format!("unreadable: {}", e), source));
                return;
            }
        };
        let doc: AnimationDoc = match json5::from_str(&text) {
            Ok(doc) => doc,
            Err(e) => {
                warnings.push(Warning::with_source(format!("skipped: {}", e), source));
                return;
            }
        };
        let (animation, resolve_warnings) = doc.resolve();
        warnings.extend(attach_path(resolve_warnings, path));
        if animation.metadata.id.is_empty() {
            warnings.push(Warning::with_source("skipped: empty animation id", source));
            return;
        }
        self.register(animation);
    }

    pub fn animation(&self, id: &str) -> Option<&Animation> {
        self.animations.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.animations.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.animations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.animations.is_empty()
    }

    /// All known ids, sorted.
    pub fn ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.animations.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    /// Metadata for every animation, sorted by id.
    pub fn metadata_list(&self) -> Vec<&AnimationMetadata> {
        let mut list: Vec<&AnimationMetadata> =
            self.animations.values().map(|a| &a.metadata).collect();
        list.sort_by(|a, b| a.id.cmp(&b.id));
        list
    }

    pub fn default_animation_id(&self) -> &str {
        &self.default_id
    }

    /// Points the default at another id. Unknown ids are refused.
    pub fn set_default_animation(&mut self, id: &str) -> bool {
        if self.animations.contains_key(id) {
            self.default_id = id.to_string();
            true
        } else {
            false
        }
    }

    pub fn default_animation(&self) -> Option<&Animation> {
        self.animations.get(&self.default_id)
    }

    /// True when any frame of the animation carries a version template.
    pub fn supports_version(&self, id: &str) -> bool {
        self.animations
            .get(id)
            .is_some_and(|a| a.frames.iter().any(|f| template::contains_template(&f.content)))
    }

    /// Owned frames for an editing session, expanded with the default
    /// version.
    pub fn create_frames(&self, id: &str) -> Option<Vec<Frame>> {
        self.create_frames_with_version(id, template::DEFAULT_VERSION)
    }

    /// Owned frames expanded with the given version. Animations without
    /// version templates ignore the version and come back as-is.
    pub fn create_frames_with_version(&self, id: &str, version: &str) -> Option<Vec<Frame>> {
        let animation = self.animations.get(id)?;
        Some(
            animation
                .frames
                .iter()
                .map(|frame| {
                    let mut frame = frame.clone();
                    if template::contains_template(&frame.content) {
                        frame.content = template::expand(&frame.content, version);
                    }
                    frame
                })
                .collect(),
        )
    }
}

fn attach_path(warnings: Vec<Warning>, path: &Path) -> Vec<Warning> {
    warnings
        .into_iter()
        .map(|w| {
            let message = match w.source {
                Some(inner) => format!("{}: {}", inner, w.message),
                None => w.message,
            };
            Warning::with_source(message, path.display().to_string())
        })
        .collect()
}

const SPINNER_GLYPHS: [char; 4] = ['|', '/', '-', '\\'];

fn builtin_animations() -> Vec<Animation> {
    vec![spinner(), banner()]
}

fn spinner() -> Animation {
    let frames = SPINNER_GLYPHS
        .iter()
        .map(|&glyph| Frame {
            title: format!("Spin {}", glyph),
            content: format!(
                "┌───────────┐\n│  LOADING  │\n│     {}     │\n└───────────┘",
                glyph
            ),
            duration: 150,
            colors: HashMap::from([(Position::new(2, 6), 14u8)]),
        })
        .collect();
    Animation {
        metadata: AnimationMetadata {
            id: "spinner".to_string(),
            name: "Loading spinner".to_string(),
            description: Some("Four-phase loading spinner".to_string()),
        },
        frames,
    }
}

fn banner() -> Animation {
    let rail = "═".repeat(27);
    let frames = ["terminal animation studio", "TERMINAL ANIMATION STUDIO"]
        .iter()
        .enumerate()
        .map(|(index, caption)| Frame {
            title: format!("Banner {}", index + 1),
            content: format!("╔{rail}╗\n║ ${{version_line:8}} ║\n║ {caption} ║\n╚{rail}╝"),
            duration: 400,
            // The CLI letters of the expanded version line.
            colors: HashMap::from([
                (Position::new(1, 2), 14u8),
                (Position::new(1, 3), 14u8),
                (Position::new(1, 4), 14u8),
            ]),
        })
        .collect();
    Animation {
        metadata: AnimationMetadata {
            id: "banner".to_string(),
            name: "Version banner".to_string(),
            description: Some("Framed banner with a templated version line".to_string()),
        },
        frames,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::io::Write;

    fn write_file(dir: &Path, name: &str, contents: &str) {
        let mut file = fs::File::create(dir.join(name)).unwrap();
        file.write_all(contents.as_bytes()).unwrap();
    }

    #[test]
    fn test_builtins_registered() {
        let registry = AnimationRegistry::with_builtins();
        assert!(registry.contains("spinner"));
        assert!(registry.contains("banner"));
        assert_eq!(registry.default_animation_id(), DEFAULT_ANIMATION_ID);
        assert_eq!(registry.default_animation().unwrap().metadata.id, "spinner");
    }

    #[test]
    fn test_version_support_detection() {
        let registry = AnimationRegistry::with_builtins();
        assert!(registry.supports_version("banner"));
        assert!(!registry.supports_version("spinner"));
        assert!(!registry.supports_version("missing"));
    }

    #[test]
    fn test_create_frames_expands_banner() {
        let registry = AnimationRegistry::with_builtins();
        let frames = registry
            .create_frames_with_version("banner", "1.2.3")
            .unwrap();
        assert!(frames[0].content.contains("CLI Version 1.2.3"));
        assert!(!frames[0].content.contains("${version_line"));
        // Box art stays rectangular for any version length.
        let widths: HashSet<usize> = frames[0]
            .content
            .lines()
            .map(|l| l.chars().count())
            .collect();
        assert_eq!(widths.len(), 1);
        let long = registry
            .create_frames_with_version("banner", "10.20.30-beta")
            .unwrap();
        let long_widths: HashSet<usize> =
            long[0].content.lines().map(|l| l.chars().count()).collect();
        assert_eq!(long_widths, widths);
    }

    #[test]
    fn test_create_frames_fallback_without_templates() {
        let registry = AnimationRegistry::with_builtins();
        let a = registry
            .create_frames_with_version("spinner", "1.0.0")
            .unwrap();
        let b = registry
            .create_frames_with_version("spinner", "9.9.9")
            .unwrap();
        assert_eq!(a, b);
        assert_eq!(a, registry.animation("spinner").unwrap().frames);
    }

    #[test]
    fn test_set_default_refuses_unknown() {
        let mut registry = AnimationRegistry::with_builtins();
        assert!(!registry.set_default_animation("nope"));
        assert_eq!(registry.default_animation_id(), "spinner");
        assert!(registry.set_default_animation("banner"));
        assert_eq!(registry.default_animation_id(), "banner");
    }

    #[test]
    fn test_load_directory_skips_bad_files() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "animation-good.cel",
            r#"{
                metadata: { id: "good", name: "Good" },
                frames: [{ title: "F1", content: "ok", duration: 100 }],
            }"#,
        );
        write_file(dir.path(), "animation-broken.cel", "{ not valid json5 ");
        write_file(
            dir.path(),
            "animation-other.json5",
            r#"{
                metadata: { id: "other", name: "Other" },
                frames: [{ title: "F1", content: "hi", colors: { "0,0": "red" } }],
            }"#,
        );
        write_file(dir.path(), "ignored.cel", "not an animation file");

        let mut registry = AnimationRegistry::new();
        let warnings = registry.load_directory(dir.path()).unwrap();
        assert_eq!(registry.ids(), vec!["good", "other"]);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0]
            .source
            .as_deref()
            .unwrap()
            .contains("animation-broken"));
    }

    #[test]
    fn test_load_directory_reports_bad_color_entries() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "animation-spotty.cel",
            r#"{
                metadata: { id: "spotty", name: "Spotty" },
                frames: [{ title: "F1", content: "abc", colors: { "0,0": 1, "oops": 2 } }],
            }"#,
        );
        let mut registry = AnimationRegistry::new();
        let warnings = registry.load_directory(dir.path()).unwrap();
        assert!(registry.contains("spotty"));
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("frame 0"));
        assert_eq!(
            registry.animation("spotty").unwrap().frames[0].colors.len(),
            1
        );
    }

    #[test]
    fn test_load_directory_skips_empty_id() {
        let dir = tempfile::tempdir().unwrap();
        write_file(
            dir.path(),
            "animation-anon.cel",
            r#"{
                metadata: { id: "", name: "Anon" },
                frames: [{ title: "F1", content: "x" }],
            }"#,
        );
        let mut registry = AnimationRegistry::new();
        let warnings = registry.load_directory(dir.path()).unwrap();
        assert!(registry.is_empty());
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("empty animation id"));
    }

    #[test]
    fn test_load_directory_later_id_wins() {
        let dir = tempfile::tempdir().unwrap();
        let doc = |title: &str| {
            format!(
                r#"{{
                    metadata: {{ id: "dup", name: "Dup" }},
                    frames: [{{ title: "{}", content: "x" }}],
                }}"#,
                title
            )
        };
        write_file(dir.path(), "animation-a.cel", &doc("first"));
        write_file(dir.path(), "animation-b.cel", &doc("second"));
        let mut registry = AnimationRegistry::new();
        registry.load_directory(dir.path()).unwrap();
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.animation("dup").unwrap().frames[0].title, "second");
    }

    #[test]
    fn test_load_animation_file_errors() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.cel");
        assert!(matches!(
            load_animation_file(&missing),
            Err(LoadError::Io { .. })
        ));
        write_file(dir.path(), "animation-bad.cel", "{{{");
        assert!(matches!(
            load_animation_file(&dir.path().join("animation-bad.cel")),
            Err(LoadError::Parse { .. })
        ));
    }

    #[test]
    fn test_metadata_list_sorted() {
        let registry = AnimationRegistry::with_builtins();
        let ids: Vec<&str> = registry
            .metadata_list()
            .iter()
            .map(|m| m.id.as_str())
            .collect();
        assert_eq!(ids, vec!["banner", "spinner"]);
    }

    #[test]
    fn test_validate_animation_warnings() {
        let mut animation = Animation {
            metadata: AnimationMetadata {
                id: "v".to_string(),
                name: "V".to_string(),
                description: None,
            },
            frames: Vec::new(),
        };
        assert_eq!(validate_animation(&animation).len(), 1);

        animation.frames.push(Frame::new("f", "a b", 0));
        animation.frames[0].colors.insert(Position::new(0, 1), 3);
        animation.frames[0].colors.insert(Position::new(0, 0), 99);
        let warnings = validate_animation(&animation);
        let messages: Vec<&str> = warnings.iter().map(|w| w.message.as_str()).collect();
        assert!(messages.iter().any(|m| m.contains("zero duration")));
        assert!(messages.iter().any(|m| m.contains("out of range")));
        assert!(messages.iter().any(|m| m.contains("blank cell")));
    }

    #[test]
    fn test_spinner_frames_are_rectangular() {
        let registry = AnimationRegistry::with_builtins();
        for frame in &registry.animation("spinner").unwrap().frames {
            let widths: HashSet<usize> =
                frame.content.lines().map(|l| l.chars().count()).collect();
            assert_eq!(widths.len(), 1);
        }
    }
}
