//! Version-line templating for animation content.
//!
//! Stored content may carry `${version_line:N}` placeholders; expansion
//! substitutes `CLI Version <version>` padded to a fixed target width so
//! surrounding box art stays aligned no matter how long the version
//! string is. `N` is the spaces-after-version count baked per occurrence:
//! the target width is the baseline `CLI Version 0.0.1` width plus `N`,
//! and padding is `max(0, target - current)` trailing spaces.
//!
//! [`parameterize`] is the inverse: it finds resolved `CLI Version …`
//! substrings (for a known version) and folds them, together with their
//! trailing space run, back into placeholders. For content produced by
//! [`expand`] the round trip is lossless, and re-expanding with a
//! different version keeps the overall line width stable.

use regex::Regex;

/// Version used when a caller does not supply one.
pub const DEFAULT_VERSION: &str = "0.0.1";

const VERSION_PREFIX: &str = "CLI Version ";
const BASELINE_WIDTH: usize = VERSION_PREFIX.len() + DEFAULT_VERSION.len();

const PLACEHOLDER_PATTERN: &str = r"\$\{version_line:(\d+)\}";

fn placeholder_regex() -> Regex {
    Regex::new(PLACEHOLDER_PATTERN).expect("version placeholder regex")
}

/// Renders one version line: `CLI Version <version>` padded with
/// `max(0, target - current)` trailing spaces, where the target width is
/// the baseline width plus `spaces_after`.
pub fn version_line(version: &str, spaces_after: usize) -> String {
    let base = format!("{}{}", VERSION_PREFIX, version);
    let target = BASELINE_WIDTH + spaces_after;
    let pad = target.saturating_sub(base.chars().count());
    format!("{}{}", base, " ".repeat(pad))
}

/// True when the content carries at least one version placeholder.
pub fn contains_template(content: &str) -> bool {
    placeholder_regex().is_match(content)
}

/// Expands every `${version_line:N}` placeholder for the given version.
pub fn expand(content: &str, version: &str) -> String {
    placeholder_regex()
        .replace_all(content, |caps: &regex::Captures| {
            let spaces_after = caps[1].parse::<usize>().unwrap_or(0);
            version_line(version, spaces_after)
        })
        .into_owned()
}

/// Reconstitutes resolved version lines back into placeholders.
///
/// Each `CLI Version <version>` occurrence, together with the full run of
/// spaces following it, becomes `${version_line:N}` with `N` chosen so
/// that re-expansion with the same version reproduces the text exactly.
/// Occurrences that cannot round-trip under the padding convention (the
/// rendered line is wider than any representable target) are left as
/// literal text, as are spots where the version token actually continues
/// (searching for `0.0` must not split `0.0.1`).
pub fn parameterize(content: &str, version: &str) -> String {
    if version.is_empty() {
        return content.to_string();
    }
    let pattern = format!("{}{}( *)", regex::escape(VERSION_PREFIX), regex::escape(version));
    let re = Regex::new(&pattern).expect("version line regex");

    let mut out = String::with_capacity(content.len());
    let mut last = 0;
    for caps in re.captures_iter(content) {
        let Some(m) = caps.get(0) else { continue };
        let pad = caps.get(1).map_or(0, |p| p.as_str().len());
        if pad == 0 {
            if let Some(next) = content[m.end()..].chars().next() {
                if next.is_ascii_alphanumeric() || matches!(next, '.' | '-' | '+') {
                    continue;
                }
            }
        }
        let width = VERSION_PREFIX.chars().count() + version.chars().count();
        let Some(spaces_after) = (width + pad).checked_sub(BASELINE_WIDTH) else {
            continue;
        };
        out.push_str(&content[last..m.start()]);
        out.push_str(&format!("${{version_line:{}}}", spaces_after));
        last = m.end();
    }
    out.push_str(&content[last..]);
    out
}
