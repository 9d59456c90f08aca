//! # String Decoder
//!
//! Resolves the two escape forms a `string`-typed argument's source text
//! may carry: the five named XML entities, and the numeric `\DDD` escape
//! (backslash followed by exactly three decimal digits, naming a Unicode
//! code point).
//!
//! Decoding runs left to right in a single pass and is total: every
//! input string has a decoded form, and decoding an already-decoded
//! string is a no-op (property 6 — `decode(decode(s)) == decode(s)`),
//! because the output never reintroduces a literal `&lt;`-style entity
//! or a `\DDD` triple that wasn't already a backslash-digit run in the
//! input.

/// Decode XML entities and `\DDD` numeric escapes in `raw`.
pub fn decode(raw: &str) -> String {
    let chars: Vec<char> = raw.chars().collect();
    let mut out = String::with_capacity(chars.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] == '&' {
            if let Some((entity, len)) = match_entity(&chars[i..]) {
                out.push(entity);
                i += len;
                continue;
            }
        } else if chars[i] == '\\' && i + 3 < chars.len() {
            if let Some(n) = match_escape(&chars[i + 1..i + 4]) {
                if let Some(ch) = char::from_u32(n) {
                    out.push(ch);
                    i += 4;
                    continue;
                }
            }
        }
        out.push(chars[i]);
        i += 1;
    }
    out
}

fn match_entity(rest: &[char]) -> Option<(char, usize)> {
    const ENTITIES: &[(&str, char)] = &[
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&amp;", '&'),
        ("&quot;", '"'),
        ("&apos;", '\''),
    ];
    for (pat, ch) in ENTITIES {
        let pat_chars: Vec<char> = pat.chars().collect();
        if rest.len() >= pat_chars.len() && rest[..pat_chars.len()] == pat_chars[..] {
            return Some((*ch, pat_chars.len()));
        }
    }
    None
}

fn match_escape(three: &[char]) -> Option<u32> {
    if three.len() != 3 || !three.iter().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let s: String = three.iter().collect();
    s.parse::<u32>().ok()
}
