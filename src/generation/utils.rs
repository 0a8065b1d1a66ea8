//! Identifier and comment text helpers shared by every backend

use once_cell::sync::Lazy;
use regex::Regex;

use crate::ir::EnumValue;

static PATH_PARAM: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]+)\}").expect("valid path parameter regex"));

/// Splits an identifier into lower-case words.
///
/// Word boundaries are separators (`-`, `_`, space, `.`) and a lower-case
/// letter or digit followed by an upper-case letter.
fn words(s: &str) -> Vec<String> {
    let mut words = Vec::new();
    let mut current = String::new();
    let mut prev_lower = false;

    for ch in s.chars() {
        if ch.is_uppercase() {
            if prev_lower && !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            current.extend(ch.to_lowercase());
            prev_lower = false;
        } else if ch.is_alphanumeric() {
            current.push(ch);
            prev_lower = ch.is_lowercase() || ch.is_ascii_digit();
        } else {
            if !current.is_empty() {
                words.push(std::mem::take(&mut current));
            }
            prev_lower = false;
        }
    }
    if !current.is_empty() {
        words.push(current);
    }
    words
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Converts an identifier to snake_case.
///
/// # Examples
/// ```
/// use sdkgen::generation::utils::to_snake_case;
///
/// assert_eq!(to_snake_case("runQuery"), "run_query");
/// assert_eq!(to_snake_case("result-format"), "result_format");
/// ```
pub fn to_snake_case(s: &str) -> String {
    words(s).join("_")
}

/// Converts an identifier to ProperCase (TitleCase).
///
/// # Examples
/// ```
/// use sdkgen::generation::utils::to_proper_case;
///
/// assert_eq!(to_proper_case("run_query"), "RunQuery");
/// assert_eq!(to_proper_case("result format"), "ResultFormat");
/// ```
pub fn to_proper_case(s: &str) -> String {
    words(s).iter().map(|w| capitalize(w)).collect()
}

/// Prefixes every line of `text` with `indent` and the comment marker.
///
/// Blank text yields an empty string; blank lines inside the text keep the
/// marker without trailing whitespace.
pub fn comment_block(text: &str, indent: &str, marker: &str) -> String {
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }
    let bare = marker.trim_end();
    text.lines()
        .map(|line| {
            let line = line.trim_end();
            if line.is_empty() {
                format!("{indent}{bare}")
            } else {
                format!("{indent}{marker}{line}")
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Appends `suffix` to `name` when it collides with a reserved word
pub fn reserve_with_suffix(name: &str, reserved: &[&str], suffix: &str) -> String {
    if reserved.contains(&name) {
        format!("{name}{suffix}")
    } else {
        name.to_string()
    }
}

/// Identifier for an enum member carrying `value`.
///
/// Characters that cannot appear in an identifier become `_`, and a leading
/// digit or sign gets a `_` prefix.
pub fn enum_member_name(value: &EnumValue) -> String {
    let raw = match value {
        EnumValue::Str(s) => s.clone(),
        EnumValue::Int(n) if *n < 0 => format!("neg{}", n.unsigned_abs()),
        EnumValue::Int(n) => n.to_string(),
    };
    let mut name: String = raw
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if name.is_empty() || name.starts_with(|c: char| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

/// Rewrites every `{name}` placeholder of an endpoint path with `render(name)`
pub fn interpolate_path(endpoint: &str, render: impl Fn(&str) -> String) -> String {
    PATH_PARAM
        .replace_all(endpoint, |caps: &regex::Captures<'_>| render(&caps[1]))
        .into_owned()
}

/// An endpoint carries path placeholders
pub fn has_path_params(endpoint: &str) -> bool {
    PATH_PARAM.is_match(endpoint)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_snake_case() {
        assert_eq!(to_snake_case("runQuery"), "run_query");
        assert_eq!(to_snake_case("RunQuery"), "run_query");
        assert_eq!(to_snake_case("run-query"), "run_query");
        assert_eq!(to_snake_case("run_query"), "run_query");
        assert_eq!(to_snake_case("api4Version"), "api4_version");
    }

    #[test]
    fn test_to_proper_case() {
        assert_eq!(to_proper_case("run_query"), "RunQuery");
        assert_eq!(to_proper_case("runQuery"), "RunQuery");
        assert_eq!(to_proper_case("result_format"), "ResultFormat");
        assert_eq!(to_proper_case("Query_result_format"), "QueryResultFormat");
        assert_eq!(to_proper_case("RESULT_FORMAT"), "ResultFormat");
    }


    #[test]
    fn test_comment_block() {
        assert_eq!(comment_block("", "  ", "# "), "");
        assert_eq!(
            comment_block("first\n\nsecond  ", "  ", "// "),
            "  // first\n  //\n  // second"
        );
    }

    #[test]
    fn test_reserve_with_suffix() {
        let reserved = ["from", "class"];
        assert_eq!(reserve_with_suffix("from", &reserved, "_"), "from_");
        assert_eq!(reserve_with_suffix("fields", &reserved, "_"), "fields");
    }

    #[test]
    fn test_enum_member_name() {
        assert_eq!(enum_member_name(&EnumValue::from("csv")), "csv");
        assert_eq!(enum_member_name(&EnumValue::from("inline-json")), "inline_json");
        assert_eq!(enum_member_name(&EnumValue::from("4k")), "_4k");
        assert_eq!(enum_member_name(&EnumValue::Int(7)), "_7");
        assert_eq!(enum_member_name(&EnumValue::Int(-1)), "neg1");
    }

    #[test]
    fn test_interpolate_path() {
        let path = "/queries/{query_id}/run/{result_format}";
        assert_eq!(
            interpolate_path(path, |name| format!("${{{name}}}")),
            "/queries/${query_id}/run/${result_format}"
        );
        assert_eq!(interpolate_path("/queries", |_| String::new()), "/queries");
        assert!(has_path_params(path));
        assert!(!has_path_params("/queries/search"));
    }
}
