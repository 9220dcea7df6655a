//! Region marker extraction for included files.
//!
//! Editors mark foldable regions with paired comments; includes can select
//! one by name (`file.ext#name`). One combined pattern recognizes the
//! marker line across the supported comment dialects:
//!
//! | dialect   | start                  | end                       |
//! |-----------|------------------------|---------------------------|
//! | C/JS/TS   | `// #region name`      | `// #endregion name`      |
//! | CSS/C     | `/* #region name */`   | `/* #endregion name */`   |
//! | HTML/MD   | `<!-- #region name -->`| `<!-- #endregion name -->`|
//! | Python/sh | `# region name`        | `# endregion name`        |
//! | C#        | `#region name`         | `#endregion name`         |
//! | VB        | `#Region name`         | `#End Region name`        |
//! | Batch     | `::#region name`       | `::#endregion name`       |
//! | C/C++     | `#pragma region name`  | `#pragma endregion name`  |
//!
//! A marker also matches when the name is written flush against the keyword
//! (`#region1` / `#endregion1` selects the region named `region1`).
//! Extracted content excludes the marker lines and is dedented to the
//! minimum common indentation.

use std::sync::LazyLock;

use regex::Regex;

/// Marker line across all supported comment dialects. Captures the optional
/// `end` prefix and the remainder after the `region` keyword. A comment
/// opener or a `#` is mandatory so plain prose never parses as a marker.
static MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:(?://|<!--|/\*{1,2}|::|')\s*#?\s*|#pragma\s+|#\s*)(end\s*)?region([\w .-]*?)\s*(?:-->|\*{1,2}/)?\s*$",
    )
    .unwrap()
});

/// A parsed region marker line.
struct Marker {
    end: bool,
    rest: String,
}

/// Parse a single line as a region marker, if it is one.
fn parse_marker(line: &str) -> Option<Marker> {
    let caps = MARKER_RE.captures(line)?;
    Some(Marker {
        end: caps.get(1).is_some(),
        rest: caps
            .get(2)
            .map_or(String::new(), |m| m.as_str().trim_matches([' ', '-']).to_owned()),
    })
}

/// Does a marker's name remainder select the requested region?
///
/// The remainder normally is the name itself (`#region name`). The flush
/// form writes the name directly after the keyword, so `#region1` leaves a
/// remainder of `1` for the region named `region1`.
fn name_matches(rest: &str, name: &str) -> bool {
    rest == name || format!("region{rest}") == name
}

/// Extract the named region from `content`.
///
/// Returns the lines strictly between the matching start and end markers,
/// dedented. Returns `None` if the start marker is never found; an
/// unterminated region extends to the end of the file.
pub(crate) fn extract_region(content: &str, name: &str) -> Option<String> {
    let mut collected: Option<Vec<&str>> = None;

    for line in content.lines() {
        if let Some(marker) = parse_marker(line) {
            match (&mut collected, marker.end) {
                (None, false) if name_matches(&marker.rest, name) => {
                    collected = Some(Vec::new());
                }
                (Some(lines), true)
                    if marker.rest.is_empty() || name_matches(&marker.rest, name) =>
                {
                    return Some(dedent(lines));
                }
                _ => {}
            }
            continue;
        }
        if let Some(lines) = &mut collected {
            lines.push(line);
        }
    }

    collected.map(|lines| dedent(&lines))
}

/// Strip the minimum common indentation from a set of lines.
///
/// Indentation is measured in whitespace characters, not bytes, so lines
/// indented with multibyte whitespace (NBSP, ideographic space) dedent
/// without slicing inside a character.
pub(crate) fn dedent(lines: &[&str]) -> String {
    let leading = |line: &str| line.chars().take_while(|c| c.is_whitespace()).count();
    let min_indent = lines
        .iter()
        .filter(|line| !line.trim().is_empty())
        .map(|line| leading(line))
        .min()
        .unwrap_or(0);

    lines
        .iter()
        .map(|line| {
            line.char_indices()
                .nth(min_indent)
                .map_or("", |(idx, _)| &line[idx..])
        })
        .collect::<Vec<_>>()
        .join("\n")
}
