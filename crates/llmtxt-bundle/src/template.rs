//! `llms.txt` template expansion.
//!
//! Plain textual placeholder substitution over `{title}`, `{description}`,
//! `{details}`, and `{toc}`. An empty value removes the placeholder's whole
//! line, and the blank-line runs that removal leaves are collapsed — a
//! missing description must not leave a dangling `>` quote or a double
//! blank.

use std::sync::LazyLock;

use regex::Regex;

/// Default `llms.txt` layout.
pub const DEFAULT_TEMPLATE: &str = "\
# {title}

> {description}

{details}

## Table of Contents

{toc}";

/// Runs of three or more newlines after empty-line removal.
static BLANK_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Expand `{key}` placeholders in `template`.
///
/// Values are substituted verbatim. For every empty value, each line that
/// contains only that placeholder (plus decoration like `> `) is dropped.
/// Unknown placeholders are left in place.
#[must_use]
pub fn expand_template(template: &str, variables: &[(&str, &str)]) -> String {
    let mut lines: Vec<String> = Vec::new();
    'line: for line in template.lines() {
        for (key, value) in variables {
            let placeholder = format!("{{{key}}}");
            if value.is_empty() && line.contains(&placeholder) {
                // Drop the line when removing the placeholder leaves only
                // decoration.
                let residue = line.replace(&placeholder, "");
                if residue.trim_matches([' ', '>', '#', '-', '*']).is_empty() {
                    continue 'line;
                }
            }
        }
        let mut expanded = line.to_owned();
        for (key, value) in variables {
            expanded = expanded.replace(&format!("{{{key}}}"), value);
        }
        lines.push(expanded);
    }

    let joined = lines.join("\n");
    let collapsed = BLANK_RUN_RE.replace_all(&joined, "\n\n");
    let mut result = collapsed.trim_end().to_owned();
    result.push('\n');
    result
}
