//! Key normalization
//!
//! AWS responses use CamelCase / camelCase keys (`pathPart`,
//! `ResponseMetadata`, `HTTPStatusCode`). Results are emitted with
//! snake_case keys at every depth, the shape automation tooling expects.

use serde_json::Value;

/// Convert a single camelCase or CamelCase name to snake_case.
///
/// With `reversible` set every upper-case letter gets its own underscore
/// (`TargetGroupARNs` -> `target_group_a_r_ns`) so the original can be
/// rebuilt. Otherwise acronyms are kept together
/// (`TargetGroupARNs` -> `target_group_arns`, `HTTPStatusCode` ->
/// `http_status_code`).
pub fn camel_to_snake(name: &str, reversible: bool) -> String {
    let chars: Vec<char> = name.chars().collect();

    let mut s1 = if reversible {
        underscore_every_upper(&chars)
    } else {
        lower_plural_acronym(&chars)
    };

    // An underscore introduced in front of the very first letter is noise
    if s1.starts_with('_') && !name.starts_with('_') {
        s1.remove(0);
    }

    if reversible {
        return s1;
    }

    let s2 = split_capitalized_words(&s1);
    split_upper_runs(&s2).to_lowercase()
}

/// Recursively convert every object key in `value` to snake_case.
///
/// Objects nested in arrays (and arrays of arrays) are converted too.
/// `ignore_list` applies to top-level keys only: their values are copied
/// verbatim, though the key itself is still converted. The same key deeper
/// in the document is converted like any other.
pub fn camel_dict_to_snake_dict(value: &Value, reversible: bool, ignore_list: &[&str]) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, v)| {
                    let converted = if ignore_list.contains(&key.as_str()) {
                        v.clone()
                    } else {
                        convert_keys(v, reversible)
                    };
                    (camel_to_snake(key, reversible), converted)
                })
                .collect(),
        ),
        other => convert_keys(other, reversible),
    }
}

fn convert_keys(value: &Value, reversible: bool) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(key, v)| (camel_to_snake(key, reversible), convert_keys(v, reversible)))
                .collect(),
        ),
        Value::Array(items) => Value::Array(
            items
                .iter()
                .map(|item| convert_keys(item, reversible))
                .collect(),
        ),
        other => other.clone(),
    }
}

fn underscore_every_upper(chars: &[char]) -> String {
    let mut out = String::with_capacity(chars.len() + 4);
    for &c in chars {
        if c.is_ascii_uppercase() {
            out.push('_');
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// `FooARNs` -> `Foo_arns`: a trailing run of 3+ capitals followed by `s`.
/// "Trailing" tolerates one final newline, which is kept.
fn lower_plural_acronym(chars: &[char]) -> String {
    let (body, tail) = match chars.split_last() {
        Some((&'\n', rest)) => (rest, "\n"),
        _ => (chars, ""),
    };

    let n = body.len();
    if n >= 4 && body[n - 1] == 's' {
        let run_start = body[..n - 1]
            .iter()
            .rposition(|c| !c.is_ascii_uppercase())
            .map_or(0, |p| p + 1);

        if n - 1 - run_start >= 3 {
            let mut out: String = body[..run_start].iter().collect();
            out.push('_');
            out.extend(body[run_start..].iter().map(char::to_ascii_lowercase));
            out.push_str(tail);
            return out;
        }
    }
    chars.iter().collect()
}

/// Insert `_` between any character and a following `Upper lower+` word.
/// Matches don't overlap: the word consumed by one split cannot serve as
/// the leading character of the next.
fn split_capitalized_words(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);
    let mut i = 0;

    while i < chars.len() {
        let starts_word = chars[i] != '\n'
            && i + 2 < chars.len()
            && chars[i + 1].is_ascii_uppercase()
            && chars[i + 2].is_ascii_lowercase();

        if starts_word {
            let mut end = i + 3;
            while end < chars.len() && chars[end].is_ascii_lowercase() {
                end += 1;
            }
            out.push(chars[i]);
            out.push('_');
            out.extend(&chars[i + 1..end]);
            i = end;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }

    out
}

/// Insert `_` between a lower-case letter or digit and a run of capitals
fn split_upper_runs(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut out = String::with_capacity(s.len() + 4);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let starts_run = (c.is_ascii_lowercase() || c.is_ascii_digit())
            && i + 1 < chars.len()
            && chars[i + 1].is_ascii_uppercase();

        if starts_run {
            let mut end = i + 2;
            while end < chars.len() && chars[end].is_ascii_uppercase() {
                end += 1;
            }
            out.push(c);
            out.push('_');
            out.extend(&chars[i + 1..end]);
            i = end;
        } else {
            out.push(c);
            i += 1;
        }
    }

    out
}
