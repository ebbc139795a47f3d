use std::sync::LazyLock;

use log::{debug, warn};
use regex::Regex;

use super::{ParamError, ParamValue, ParameterSet};

/// Prefix of every key record
pub const KEY_MARKER: &str = "##";

/// Prefix of comment lines
pub const COMMENT_MARKER: &str = "$$";

/// `##KEY= (0..N)` followed by the start of the value text
static ARRAY_DECL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^##([^=]*)=\s*\(0\.\.(\d+)\)(.*)$").expect("array declaration regex")
});

/// `##KEY= <text>`
static QUOTED_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^##([^=]*)=\s*<(.*)>").expect("quoted value regex"));

/// `##KEY= text`
static BARE_VALUE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^##([^=]*)=\s*(.*)$").expect("bare value regex"));

/// Decode raw file bytes, rejecting content that is not UTF-8 text
pub fn parse_bytes(bytes: Vec<u8>) -> Result<ParameterSet, ParamError> {
    let text = String::from_utf8(bytes)?;
    parse_str(&text)
}

/// Parse the content of a parameter file
///
/// Lines are trimmed before matching. Comment lines (`$$ ...` or `##$$ ...`) are
/// accumulated into [`ParameterSet::comments`]. An array declaration consumes every
/// following line up to the next `##` line or the end of the file; the collected
/// tokens must number exactly `N + 1` for a `(0..N)` bound.
pub fn parse_str(contents: &str) -> Result<ParameterSet, ParamError> {
    let lines: Vec<&str> = contents.lines().map(str::trim).collect();
    let mut set = ParameterSet::new();
    let mut cursor = 0;

    while cursor < lines.len() {
        let line = lines[cursor];
        cursor += 1;

        if is_comment(line) {
            set.push_comment(line);
            continue;
        }

        if let Some(caps) = ARRAY_DECL.captures(line) {
            let key = &caps[1];
            let mut text = caps[3].to_string();
            while cursor < lines.len() && !lines[cursor].starts_with(KEY_MARKER) {
                text.push(' ');
                text.push_str(lines[cursor]);
                cursor += 1;
            }

            let tokens: Vec<String> = text.split_whitespace().map(str::to_string).collect();
            // (0..N) is N + 1 entries
            let declared = caps[2]
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_add(1))
                .unwrap_or(usize::MAX);
            if tokens.len() != declared {
                return Err(ParamError::ArrayLength {
                    key: key.to_string(),
                    declared,
                    found: tokens.len(),
                });
            }
            store(&mut set, key, ParamValue::Array(tokens));
            continue;
        }

        if let Some(caps) = QUOTED_VALUE.captures(line) {
            store(&mut set, &caps[1], ParamValue::Scalar(caps[2].to_string()));
        } else if let Some(caps) = BARE_VALUE.captures(line) {
            store(&mut set, &caps[1], ParamValue::Scalar(caps[2].to_string()));
        }
    }

    debug!(
        "Parsed {} parameters ({} comment bytes)",
        set.len(),
        set.comments().len()
    );
    Ok(set)
}

fn is_comment(line: &str) -> bool {
    line.starts_with(COMMENT_MARKER)
        || line
            .strip_prefix(KEY_MARKER)
            .is_some_and(|rest| rest.starts_with(COMMENT_MARKER))
}

fn store(set: &mut ParameterSet, key: &str, value: ParamValue) {
    if set.insert(key, value).is_some() {
        warn!("Duplicate parameter key {}, keeping the last value", key);
    }
}
