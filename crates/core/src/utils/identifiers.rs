use regex::Regex;
use std::sync::OnceLock;

fn identifier_regex() -> &'static Regex {
    static IDENTIFIER: OnceLock<Regex> = OnceLock::new();
    IDENTIFIER.get_or_init(|| {
        Regex::new(r"^@?[\p{L}_][\p{L}\p{Nd}_]*$").expect("identifier pattern is valid")
    })
}

/// Whether `name` is a usable C# identifier (verbatim `@` prefix allowed).
pub fn is_identifier(name: &str) -> bool {
    identifier_regex().is_match(name)
}

/// Whether every `.`-separated segment of `name` is an identifier.
pub fn is_qualified_identifier(name: &str) -> bool {
    !name.is_empty() && name.split('.').all(is_identifier)
}
