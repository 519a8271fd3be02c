//! UTF-8 safe line handling shared by the chunkers.
//!
//! Both chunkers work on lines and measure everything in
//! **characters**, not bytes. A single line longer than the
//! chunk bound (minified code, a paragraph without newlines) is
//! cut into bound-sized pieces first, so no chunk can grow
//! without limit. Cuts always fall on character boundaries via
//! `char_indices()`, never on raw byte offsets.

/// Number of characters in `s`
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Split `text` on `\n`, cutting lines longer than `max_chars`
///
/// Concatenating the pieces of one line gives the line back, so
/// joining the result with `\n` only differs from `text` where a
/// long line was cut.
///
/// # Panics
///
/// Panics if `max_chars` is 0.
pub fn bounded_lines(text: &str, max_chars: usize) -> Vec<&str> {
    assert!(max_chars > 0, "max_chars must be > 0");

    let mut lines = Vec::new();
    for line in text.split('\n') {
        if line.len() <= max_chars {
            // Byte length bounds char length from above
            lines.push(line);
            continue;
        }
        lines.extend(split_chars(line, max_chars));
    }
    lines
}

/// Cut `line` into pieces of at most `max_chars` characters
fn split_chars(line: &str, max_chars: usize) -> Vec<&str> {
    let char_indices: Vec<(usize, char)> = line.char_indices().collect();

    if char_indices.len() <= max_chars {
        return vec![line];
    }

    let mut pieces = Vec::new();
    let mut char_start_idx = 0;
    while char_start_idx < char_indices.len() {
        let char_end_idx = (char_start_idx + max_chars).min(char_indices.len());

        // Character indices map to byte offsets on char boundaries
        let byte_start = char_indices[char_start_idx].0;
        let byte_end = if char_end_idx < char_indices.len() {
            char_indices[char_end_idx].0
        } else {
            line.len()
        };

        pieces.push(&line[byte_start..byte_end]);
        char_start_idx = char_end_idx;
    }
    pieces
}

/// The last `n` characters of `s`, or all of `s` if it is shorter
pub fn char_suffix(s: &str, n: usize) -> &str {
    let count = char_len(s);
    if count <= n {
        return s;
    }
    let byte_start = s
        .char_indices()
        .nth(count - n)
        .map(|(i, _)| i)
        .unwrap_or(0);
    &s[byte_start..]
}

/// Sum of the character lengths of `lines`, newlines not counted
pub fn lines_len(lines: &[&str]) -> usize {
    lines.iter().map(|l| char_len(l)).sum()
}
