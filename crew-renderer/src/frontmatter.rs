//! `SKILL.md` frontmatter handling.
//!
//! Frontmatter is a `---` line opening the document, line-oriented
//! `key: value` fields, and a closing `---` line. Fields are kept as raw,
//! order-preserving lines; only missing `name`/`description` lines are
//! spliced in, directly after the opening delimiter.

const DELIM: &str = "---";

/// A parsed leading frontmatter block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontmatter<'a> {
    /// Raw field lines between the delimiters, without line terminators.
    pub fields: Vec<&'a str>,
    /// Everything after the closing delimiter line.
    pub body: &'a str,
}

impl<'a> Frontmatter<'a> {
    /// Raw value of top-level `key`, trimmed. Nested/indented lines are ignored.
    pub fn get(&self, key: &str) -> Option<&'a str> {
        self.fields
            .iter()
            .copied()
            .filter(|line| is_top_level_key(line, key))
            .find_map(|line| line.split_once(':').map(|(_, v)| v.trim()))
    }

    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}

/// Split a leading frontmatter block off `text`.
///
/// Returns `None` when the document does not open with `---` or the block is
/// never closed. Expects LF line endings.
pub fn split_frontmatter(text: &str) -> Option<Frontmatter<'_>> {
    let mut lines = text.split_inclusive('\n');
    let first = lines.next()?;
    if first.trim_end() != DELIM {
        return None;
    }
    let mut offset = first.len();
    let mut fields = Vec::new();
    for line in lines {
        offset += line.len();
        if line.trim_end() == DELIM {
            return Some(Frontmatter {
                fields,
                body: &text[offset..],
            });
        }
        fields.push(line.trim_end_matches('\n'));
    }
    None
}

/// Make sure `markdown` carries frontmatter with a `name` field.
///
/// - no block: one is prepended with `name: <slug>` and, if given, `description`
/// - block without `name`: the line is inserted into the existing block
/// - block with `name`: that name is authoritative and kept
///
/// A non-empty `description` is added only when the block has none.
pub fn ensure_frontmatter(markdown: &str, slug: &str, description: Option<&str>) -> String {
    let text = markdown.replace("\r\n", "\n");
    let description = description
        .map(collapse_whitespace)
        .filter(|d| !d.is_empty());

    let Some(block) = split_frontmatter(&text) else {
        let mut out = String::from("---\n");
        out.push_str(&format!("name: {slug}\n"));
        if let Some(desc) = &description {
            out.push_str(&format!("description: {}\n", yaml_scalar(desc)));
        }
        out.push_str("---\n\n");
        out.push_str(&text);
        return out;
    };

    let needs_name = !block.has("name");
    let needs_description = description.is_some() && !block.has("description");
    if !needs_name && !needs_description {
        return text;
    }

    // description goes directly after name, whichever side supplied it
    let mut pending = description
        .filter(|_| needs_description)
        .map(|desc| format!("description: {}\n", yaml_scalar(&desc)));

    let mut out = String::from("---\n");
    if needs_name {
        out.push_str(&format!("name: {slug}\n"));
        if let Some(line) = pending.take() {
            out.push_str(&line);
        }
    }
    for field in &block.fields {
        out.push_str(field);
        out.push('\n');
        if is_top_level_key(field, "name") {
            if let Some(line) = pending.take() {
                out.push_str(&line);
            }
        }
    }
    out.push_str("---\n");
    out.push_str(block.body);
    out
}

fn is_top_level_key(line: &str, key: &str) -> bool {
    !line.starts_with(char::is_whitespace)
        && line.split_once(':').is_some_and(|(k, _)| k.trim_end() == key)
}

/// Canonical name declared in the frontmatter of `markdown`, unquoted.
pub fn frontmatter_name(markdown: &str) -> Option<String> {
    let text = markdown.replace("\r\n", "\n");
    let block = split_frontmatter(&text)?;
    let raw = block.get("name")?;
    let unquoted = strip_quotes(raw).trim();
    if unquoted.is_empty() {
        None
    } else {
        Some(unquoted.to_string())
    }
}

fn strip_quotes(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Plain scalar when safe, double-quoted otherwise.
fn yaml_scalar(value: &str) -> String {
    const SPECIAL_START: &[char] = &[
        '-', '?', ':', ',', '[', ']', '{', '}', '#', '&', '*', '!', '|', '>', '\'', '"', '%',
        '@', '`',
    ];
    let needs_quotes = value.starts_with(SPECIAL_START)
        || value.contains(": ")
        || value.ends_with(':')
        || value.contains(" #")
        || matches!(
            value.to_ascii_lowercase().as_str(),
            "true" | "false" | "yes" | "no" | "null" | "~"
        );
    if needs_quotes {
        serde_json::to_string(value).unwrap_or_else(|_| format!("\"{value}\""))
    } else {
        value.to_string()
    }
}
