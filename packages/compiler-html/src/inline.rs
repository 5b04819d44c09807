//! Inline content sanitizing
//!
//! Node content is plain text with a small set of emphasis tags. Anything
//! else that looks like markup is escaped, so stored content can never
//! inject structure into the rendered document.

/// Tags allowed inside node content
const ALLOWED_TAGS: &[&str] = &["b", "strong", "i", "em", "u", "br"];

/// Longest entity body we keep as-is (`&thetasym;`)
const MAX_ENTITY_LEN: usize = 10;

pub(crate) fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Longest tag we try to recognise, attributes included
const MAX_TAG_LEN: usize = 128;

/// Keep allowed emphasis tags (normalized, attributes dropped), escape the rest
///
/// Emphasis left open at the end is closed, and closing tags with no
/// matching open tag are dropped, so the output is always balanced.
pub fn sanitize_inline(content: &str) -> String {
    let mut out = String::with_capacity(content.len());
    let mut open: Vec<String> = Vec::new();
    let mut rest = content;

    while let Some(c) = rest.chars().next() {
        match c {
            '<' => {
                if let Some((tag, len)) = allowed_tag(rest) {
                    push_tag(&mut out, &mut open, tag);
                    rest = &rest[len..];
                    continue;
                }
                out.push_str("&lt;");
            }
            '&' => {
                if let Some(len) = entity_len(rest) {
                    out.push_str(&rest[..len]);
                    rest = &rest[len..];
                    continue;
                }
                out.push_str("&amp;");
            }
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
        rest = &rest[c.len_utf8()..];
    }

    while let Some(name) = open.pop() {
        out.push_str(&format!("</{}>", name));
    }

    out
}

/// A recognised emphasis tag
enum Tag {
    Open(String),
    Close(String),
    Break,
}

fn push_tag(out: &mut String, open: &mut Vec<String>, tag: Tag) {
    match tag {
        Tag::Break => out.push_str("<br>"),
        Tag::Open(name) => {
            out.push_str(&format!("<{}>", name));
            open.push(name);
        }
        Tag::Close(name) => {
            let Some(depth) = open.iter().rposition(|n| *n == name) else {
                return;
            };
            // Close anything opened inside it first
            for inner in open.drain(depth..).rev() {
                out.push_str(&format!("</{}>", inner));
            }
        }
    }
}

/// Match an allowed tag at the start of `input`
fn allowed_tag(input: &str) -> Option<(Tag, usize)> {
    let window = &input.as_bytes()[..input.len().min(MAX_TAG_LEN)];
    let end = window.iter().position(|&b| b == b'>')?;
    let inner = input[1..end].trim();

    let (closing, inner) = match inner.strip_prefix('/') {
        Some(stripped) => (true, stripped.trim_start()),
        None => (false, inner),
    };
    let inner = inner.strip_suffix('/').unwrap_or(inner).trim_end();

    let name_len = inner
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(inner.len());
    let name = inner[..name_len].to_ascii_lowercase();

    if !ALLOWED_TAGS.contains(&name.as_str()) {
        return None;
    }

    let attributes = &inner[name_len..];
    if !attributes.is_empty() && (closing || !is_attribute_list(attributes)) {
        return None;
    }

    let tag = match (name.as_str(), closing) {
        ("br", _) => Tag::Break,
        (_, true) => Tag::Close(name),
        (_, false) => Tag::Open(name),
    };

    Some((tag, end + 1))
}

/// Whitespace-led `name="value"` or `name='value'` pairs, nothing else
fn is_attribute_list(mut input: &str) -> bool {
    while !input.is_empty() {
        if !input.starts_with(char::is_whitespace) {
            return false;
        }
        input = input.trim_start();
        if input.is_empty() {
            return true;
        }

        let name_len = input
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '-' || c == '_'))
            .unwrap_or(input.len());
        if name_len == 0 {
            return false;
        }

        let Some(value) = input[name_len..].trim_start().strip_prefix('=') else {
            return false;
        };
        let value = value.trim_start();
        let Some(quote) = value.chars().next().filter(|q| *q == '"' || *q == '\'') else {
            return false;
        };
        let Some(close) = value[1..].find(quote) else {
            return false;
        };
        input = &value[close + 2..];
    }
    true
}

/// Length of a well-formed entity (`&amp;`, `&#160;`, `&#xA0;`) at the start
fn entity_len(input: &str) -> Option<usize> {
    let window = &input.as_bytes()[..input.len().min(MAX_ENTITY_LEN + 1)];
    let end = window.iter().position(|&b| b == b';')?;
    if end < 2 {
        return None;
    }

    let body = &input[1..end];
    let valid = match body.strip_prefix('#') {
        Some(num) => match num.strip_prefix(['x', 'X']) {
            Some(hex) => !hex.is_empty() && hex.chars().all(|c| c.is_ascii_hexdigit()),
            None => !num.is_empty() && num.chars().all(|c| c.is_ascii_digit()),
        },
        None => body.chars().all(|c| c.is_ascii_alphanumeric()),
    };

    valid.then_some(end + 1)
}
