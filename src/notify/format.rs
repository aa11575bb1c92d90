//! Film name normalization for outgoing messages

/// Names longer than this (in characters) are truncated
pub const MAX_NAME_LENGTH: usize = 90;

const TRUNCATED_LENGTH: usize = 87;
const ELLIPSIS: &str = "...";

/// Words kept lowercase inside a title
const SMALL_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "en", "for", "if", "in", "of", "on", "or", "the",
    "to", "v", "v.", "via", "vs", "vs.",
];

/// Title-case a film name, fix up 2D/3D tags and cap its length.
pub fn prepare_film_name(name: &str) -> String {
    let mut ret = title_case(name)
        .replace("2d ", "2D ")
        .replace("3d ", "3D ");

    // The tag is just as often the last word
    for (lower, upper) in [("2d", "2D"), ("3d", "3D")] {
        if ret == lower || ret.ends_with(&format!(" {}", lower)) {
            ret.truncate(ret.len() - lower.len());
            ret.push_str(upper);
        }
    }

    if ret.chars().count() > MAX_NAME_LENGTH {
        ret = ret.chars().take(TRUNCATED_LENGTH).collect();
        ret.push_str(ELLIPSIS);
    }
    ret
}

/// English title case.
///
/// Small words stay lowercase unless they open or close the title or follow a
/// colon. Words already carrying inner capitals (acronyms, "McQueen") are left
/// alone, unless the whole input is shouting, in which case it is lowercased
/// first. Words starting with a digit are not touched.
pub fn title_case(text: &str) -> String {
    let shouting = text.chars().any(char::is_alphabetic) && !text.chars().any(char::is_lowercase);
    let source = if shouting {
        text.to_lowercase()
    } else {
        text.to_string()
    };

    let words: Vec<&str> = source.split(' ').collect();
    let first = words.iter().position(|w| !w.is_empty());
    let last = words.iter().rposition(|w| !w.is_empty());

    let mut out = Vec::with_capacity(words.len());
    let mut after_colon = false;
    for (i, word) in words.iter().enumerate() {
        if word.is_empty() {
            out.push(String::new());
            continue;
        }

        let edge = Some(i) == first || Some(i) == last;
        let cased = if has_inner_capital(word) {
            word.to_string()
        } else if !edge && !after_colon && SMALL_WORDS.contains(&word.to_lowercase().as_str()) {
            word.to_lowercase()
        } else {
            word.split('-').map(capitalize).collect::<Vec<_>>().join("-")
        };

        after_colon = word.ends_with(':');
        out.push(cased);
    }
    out.join(" ")
}

fn has_inner_capital(word: &str) -> bool {
    word.chars()
        .skip_while(|c| !c.is_alphanumeric())
        .skip(1)
        .any(char::is_uppercase)
}

/// Uppercase the first letter, skipping leading punctuation
fn capitalize(part: &str) -> String {
    let mut out = String::with_capacity(part.len());
    let mut done = false;
    for c in part.chars() {
        if !done && c.is_alphanumeric() {
            done = true;
            if c.is_alphabetic() {
                out.extend(c.to_uppercase());
                continue;
            }
        }
        out.push(c);
    }
    out
}
