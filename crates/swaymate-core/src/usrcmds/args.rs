//! Flag-map parsing for user-command argument strings.

use std::collections::HashMap;

/// Parse a whitespace-separated argument string into a flag map.
///
/// Tokens prefixed with `-` or `--`, or containing `=`, become key/value
/// pairs (empty value when no `=`); bare tokens become keys with an empty
/// value. Input `23 -a --b=4 foo=2 -bar=1` yields
/// `{23: "", a: "", b: "4", foo: "2", bar: "1"}`.
pub fn parse_flags(input: &str) -> HashMap<String, String> {
    let mut flags = HashMap::new();
    for token in input.split_whitespace() {
        let token = token.trim_start_matches('-');
        if token.is_empty() {
            continue;
        }
        match token.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                flags.insert(key.to_string(), value.to_string());
            }
            _ => {
                flags.insert(token.to_string(), String::new());
            }
        }
    }
    flags
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mixed_flag_styles() {
        let flags = parse_flags("23 -a --b=4 foo=2 -bar=1");
        assert_eq!(flags.len(), 5);
        assert_eq!(flags["23"], "");
        assert_eq!(flags["a"], "");
        assert_eq!(flags["b"], "4");
        assert_eq!(flags["foo"], "2");
        assert_eq!(flags["bar"], "1");
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert!(parse_flags("").is_empty());
        assert!(parse_flags("   ").is_empty());
    }

    #[test]
    fn test_value_keeps_embedded_equals() {
        let flags = parse_flags("--filter=a=b");
        assert_eq!(flags["filter"], "a=b");
    }

    #[test]
    fn test_later_token_wins_on_duplicate_key() {
        let flags = parse_flags("-x=1 -x=2");
        assert_eq!(flags["x"], "2");
    }
}
