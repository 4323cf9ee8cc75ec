//! Message cleanup and boundary-aware truncation

/// Trim the raw service output and strip wrapping quotes and inline hashtags
///
/// The formatter appends the post's only hashtag, so any the service
/// included would end up duplicated.
pub fn clean_message(raw: &str) -> String {
    let trimmed = raw.trim();
    let unquoted = [('"', '"'), ('\u{201C}', '\u{201D}'), ('\'', '\'')]
        .iter()
        .find_map(|&(open, close)| {
            trimmed
                .strip_prefix(open)
                .and_then(|rest| rest.strip_suffix(close))
        })
        .unwrap_or(trimmed);
    strip_hashtags(unquoted).trim().to_string()
}

fn strip_hashtags(text: &str) -> String {
    text.lines()
        .map(|line| {
            line.split(' ')
                .filter(|word| !word.is_empty() && !is_hashtag(word))
                .collect::<Vec<_>>()
                .join(" ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// `#` followed by a word with at least one letter, trailing punctuation allowed
fn is_hashtag(word: &str) -> bool {
    let Some(tag) = word.strip_prefix('#') else {
        return false;
    };
    let tag = tag.trim_end_matches(|c: char| c.is_ascii_punctuation());
    tag.chars().any(char::is_alphabetic)
        && tag.chars().all(|c| c.is_alphanumeric() || c == '_')
}

/// Cut `text` to at most `max_chars` characters
///
/// Prefers the last sentence end (`.`, `!`, `?`) in the second half of the
/// window, then the last whitespace. Only a single word longer than the
/// whole window is cut mid-word.
pub fn truncate_message(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }

    let end = text
        .char_indices()
        .nth(max_chars)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let window = &text[..end];

    if let Some(cut) = last_sentence_end(text, window, max_chars / 2) {
        return window[..cut].trim_end().to_string();
    }

    let next_is_space = text[end..].chars().next().is_some_and(char::is_whitespace);
    if next_is_space {
        return window.trim_end().to_string();
    }

    match window.rfind(char::is_whitespace) {
        Some(space) if !window[..space].trim_end().is_empty() => {
            window[..space].trim_end().to_string()
        }
        _ => window.to_string(),
    }
}

/// Byte offset just past the last sentence terminator in `window` that is
/// followed by whitespace (or end of text) and sits at or after `min_chars`
fn last_sentence_end(text: &str, window: &str, min_chars: usize) -> Option<usize> {
    window
        .char_indices()
        .filter(|&(_, c)| matches!(c, '.' | '!' | '?'))
        .map(|(i, c)| i + c.len_utf8())
        .filter(|&after| {
            text[after..]
                .chars()
                .next()
                .map_or(true, char::is_whitespace)
        })
        .filter(|&after| window[..after].chars().count() >= min_chars)
        .last()
}
