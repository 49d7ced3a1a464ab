//! Small string helpers shared by the splitter and the figure tools.

/// Inner text of the `{...}` group that `input` opens with.
///
/// `input` must start at the opening brace. Braces nest; `None` when the
/// group never closes.
pub fn braced_group(input: &str) -> Option<&str> {
    let body = input.strip_prefix('{')?;
    let mut depth = 1usize;
    for (idx, byte) in body.bytes().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&body[..idx]);
                }
            }
            _ => {}
        }
    }
    None
}

/// Largest char boundary in `s` that is `<= idx`.
pub fn floor_char_boundary(s: &str, idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    let mut i = idx;
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}

/// Smallest char boundary in `s` that is `>= idx`.
pub fn ceil_char_boundary(s: &str, idx: usize) -> usize {
    if idx >= s.len() {
        return s.len();
    }
    let mut i = idx;
    while !s.is_char_boundary(i) {
        i += 1;
    }
    i
}

/// At most the first `max` bytes of `s`, cut on a char boundary.
pub fn prefix_bytes(s: &str, max: usize) -> &str {
    &s[..floor_char_boundary(s, max)]
}

/// At most the first `max` characters of `s`.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

/// Collapse every whitespace run to a single space and trim.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
