// Clean transcript text before it is placed into an extraction prompt.
// Removes invisible Unicode, normalizes blank lines, and caps the length.

/// Maximum transcript length sent to the model (characters).
pub const MAX_TRANSCRIPT_CHARS: usize = 50_000;

const TRUNCATION_MARKER: &str = "…[TRUNCATED]";

/// Prepare a raw transcript for prompting.
pub fn prepare_transcript(raw: &str) -> String {
    let cleaned = remove_invisible_chars(raw);
    let normalized = normalize_whitespace(&cleaned);
    let prepared = truncate_to_max_chars(&normalized, MAX_TRANSCRIPT_CHARS);

    if prepared != normalized {
        tracing::warn!(
            original_chars = normalized.chars().count(),
            max_chars = MAX_TRANSCRIPT_CHARS,
            "Transcript truncated before prompting"
        );
    }

    prepared
}

/// Remove zero-width, bidi and control characters.
/// Preserves standard whitespace (space, newline, tab, carriage return).
fn remove_invisible_chars(text: &str) -> String {
    text.chars()
        .filter(|c| {
            if matches!(*c, ' ' | '\n' | '\t' | '\r') {
                return true;
            }
            if matches!(
                *c,
                '\u{200B}'..='\u{200F}'
                    | '\u{202A}'..='\u{202E}'
                    | '\u{2060}'..='\u{2064}'
                    | '\u{FEFF}'
            ) {
                return false;
            }
            !c.is_control()
        })
        .collect()
}

/// Collapse runs of blank lines, trim each line.
fn normalize_whitespace(text: &str) -> String {
    let mut lines: Vec<&str> = Vec::new();
    let mut prev_blank = false;

    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !prev_blank {
                lines.push("");
                prev_blank = true;
            }
        } else {
            lines.push(trimmed);
            prev_blank = false;
        }
    }

    while lines.first() == Some(&"") {
        lines.remove(0);
    }
    while lines.last() == Some(&"") {
        lines.pop();
    }

    lines.join("\n")
}

/// Truncate to `max_chars` characters, breaking at the last whitespace.
fn truncate_to_max_chars(text: &str, max_chars: usize) -> String {
    let cut = match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => byte_idx,
        None => return text.to_string(),
    };

    let head = &text[..cut];
    match head.rfind(char::is_whitespace) {
        Some(pos) => format!("{}{TRUNCATION_MARKER}", &head[..pos]),
        None => format!("{head}{TRUNCATION_MARKER}"),
    }
}
