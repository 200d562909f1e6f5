//! Identifier casing helpers used when mapping between wire names and
//! field names.

/// `true` for a non-empty run of ASCII capitals.
pub fn is_upper_case(text: &str) -> bool {
    !text.is_empty() && text.bytes().all(|b| b.is_ascii_uppercase())
}

pub fn remove_underscores(text: &str) -> String {
    text.replace('_', "")
}

/// `first_name` → `FirstName`, `HTTP_STATUS` → `HttpStatus`.
///
/// Underscores are treated as word breaks. With `remove_underscores` false
/// the words are re-joined with `_`. A single word that is not all capitals
/// only has its first letter raised.
pub fn to_pascal_case(text: &str, remove_underscores: bool) -> String {
    if text.is_empty() {
        return String::new();
    }

    let spaced = text.replace('_', " ");
    let words: Vec<&str> = spaced.split(' ').collect();
    if words.len() == 1 && !is_upper_case(words[0]) {
        return upper_first(words[0]);
    }

    let joiner = if remove_underscores { "" } else { "_" };
    words
        .iter()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    let rest = chars.as_str();
                    let rest = if is_upper_case(rest) {
                        rest.to_lowercase()
                    } else {
                        rest.to_string()
                    };
                    first.to_uppercase().chain(rest.chars()).collect()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(joiner)
}

pub fn to_camel_case(text: &str) -> String {
    make_initial_lower_case(&to_pascal_case(text, true))
}

pub fn make_initial_lower_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `PascalCase` → `pascal_case`, `HTTPServer` → `http_server`. Dashes and
/// whitespace also become underscores.
pub fn add_underscores(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len() + 4);

    for (i, &c) in chars.iter().enumerate() {
        if c.is_ascii_uppercase() && i > 0 {
            let prev = chars[i - 1];
            let next = chars.get(i + 1).copied();
            let acronym_end = prev.is_ascii_uppercase() && next.is_some_and(|n| n.is_ascii_lowercase());
            let word_start = prev.is_ascii_lowercase() || prev.is_ascii_digit();
            if acronym_end || word_start {
                out.push('_');
            }
        }
        if c == '-' || c.is_whitespace() {
            out.push('_');
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

fn upper_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
