//! Splits long transcripts into model-sized chunks at natural boundaries.

use crate::config::boundary_threshold;

/// Split `text` into ordered, trimmed, non-empty chunks of at most `max_chars`
/// characters.
///
/// Each window is cut after its last newline, or else after its last ". ", as long
/// as that break lies beyond 40% of the window; otherwise it is cut at the window
/// edge. Whatever remains once it fits in one window becomes the final chunk.
pub fn chunk(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let chars: Vec<char> = text.chars().collect();
    let threshold = boundary_threshold(max_chars);

    let mut parts = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = if chars.len() - start <= max_chars {
            chars.len()
        } else {
            let window = &chars[start..start + max_chars];
            start + natural_break(window, threshold).unwrap_or(max_chars)
        };

        let part: String = chars[start..end].iter().collect();
        let part = part.trim();
        if !part.is_empty() {
            parts.push(part.to_string());
        }
        start = end;
    }

    parts
}

/// Length of the prefix of `window` ending at its preferred break, if any.
fn natural_break(window: &[char], threshold: usize) -> Option<usize> {
    let newline = window.iter().rposition(|&c| c == '\n');
    if let Some(index) = newline.filter(|&index| index > threshold) {
        return Some(index + 1);
    }

    let sentence_end = window
        .windows(2)
        .rposition(|pair| pair[0] == '.' && pair[1] == ' ');
    sentence_end
        .filter(|&index| index > threshold)
        .map(|index| index + 1)
}
