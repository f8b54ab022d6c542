/// Cleans a caller supplied vanity alias before it is hashed or stored.
///
/// Only ASCII letters, digits, `-` and `_` are kept. Whitespace, regex
/// metacharacters (`\ ^ . $ | ( ) [ ] * + ? { } ,`) and any other
/// punctuation are dropped, so the alias is always a single path segment.
pub fn sanitize(vanity: &str) -> String {
    vanity
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const METACHARACTERS: &[char] = &[
        '\\', '^', '.', '$', '|', '(', ')', '[', ']', '*', '+', '?', '{', '}', ',',
    ];

    #[test]
    fn strips_whitespace_and_punctuation() {
        assert_eq!(sanitize("My Alias!"), "MyAlias");
        assert_eq!(sanitize("  spaced\tout\n"), "spacedout");
    }

    #[test]
    fn strips_every_regex_metacharacter() {
        let all: String = METACHARACTERS.iter().collect();
        assert_eq!(sanitize(&format!("a{all}b")), "ab");
        for symbol in METACHARACTERS {
            assert_eq!(sanitize(&format!("x{symbol}y")), "xy", "{symbol}");
        }
    }

    #[test]
    fn keeps_dash_and_underscore() {
        assert_eq!(sanitize("my-alias_2"), "my-alias_2");
    }

    #[test]
    fn is_case_preserving() {
        assert_eq!(sanitize("CamelCase"), "CamelCase");
    }

    #[test]
    fn may_sanitize_to_empty() {
        assert_eq!(sanitize(" .*? "), "");
    }
}
