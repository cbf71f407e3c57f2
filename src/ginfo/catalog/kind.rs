//! Value kinds and their validity checks.
//!
//! Each catalog attribute declares the kind of value it holds. The cleaner uses
//! [`ValueKind::accepts`] to decide which values survive `--clean` and `--strict`.

use regex::Regex;
use std::sync::OnceLock;

/// The kind of value an attribute holds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ValueKind {
    /// Free text; every value is valid.
    Any,

    /// A non-empty word without whitespace (identifiers, names, capabilities).
    Token,

    /// An absolute URL with an explicit scheme (`ldap://host:2170/...`).
    Url,

    /// A dotted numeric version (`3.0.1`).
    Version,

    /// A signed integer.
    Integer,

    /// A decimal number within an inclusive range.
    Decimal { min: f64, max: f64 },

    /// `true` or `false`, in any case.
    Boolean,

    /// One of a closed set of values, compared exactly.
    OneOf(&'static [&'static str]),

    /// An authorization rule: `ALL` or `<PREFIX>:<subject>`.
    PolicyRule,
}

const URL_PATTERN: &str = r"^[A-Za-z][A-Za-z0-9+.-]*://\S+$";
const VERSION_PATTERN: &str = r"^[0-9]+(\.[0-9]+)*$";
const POLICY_RULE_PATTERN: &str = r"^(ALL|(VO|VOMS|FQAN|DN):\S+)$";

impl ValueKind {
    /// Whether `value` is well-formed for this kind.
    pub fn accepts(&self, value: &str) -> bool {
        match self {
            ValueKind::Any => true,
            ValueKind::Token => is_token(value),
            ValueKind::Url => is_url(value),
            ValueKind::Version => is_version(value),
            ValueKind::Integer => value.parse::<i64>().is_ok(),
            ValueKind::Decimal { min, max } => value
                .parse::<f64>()
                .map(|n| n >= *min && n <= *max)
                .unwrap_or(false),
            ValueKind::Boolean => {
                value.eq_ignore_ascii_case("true") || value.eq_ignore_ascii_case("false")
            }
            ValueKind::OneOf(allowed) => allowed.contains(&value),
            ValueKind::PolicyRule => is_policy_rule(value),
        }
    }
}

fn is_token(value: &str) -> bool {
    !value.is_empty() && !value.chars().any(char::is_whitespace)
}

/// Matches `value` against a pattern compiled on first use.
fn matches(cell: &'static OnceLock<Option<Regex>>, pattern: &str, value: &str) -> bool {
    cell.get_or_init(|| Regex::new(pattern).ok())
        .as_ref()
        .is_some_and(|regex| regex.is_match(value))
}

fn is_url(value: &str) -> bool {
    static URL: OnceLock<Option<Regex>> = OnceLock::new();
    matches(&URL, URL_PATTERN, value)
}

fn is_version(value: &str) -> bool {
    static VERSION: OnceLock<Option<Regex>> = OnceLock::new();
    matches(&VERSION, VERSION_PATTERN, value)
}

fn is_policy_rule(value: &str) -> bool {
    static POLICY_RULE: OnceLock<Option<Regex>> = OnceLock::new();
    matches(&POLICY_RULE, POLICY_RULE_PATTERN, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shape_patterns_compile() {
        for pattern in [URL_PATTERN, VERSION_PATTERN, POLICY_RULE_PATTERN] {
            assert!(Regex::new(pattern).is_ok(), "{}", pattern);
        }
    }

    #[test]
    fn token_rejects_empty_and_spaces() {
        assert!(ValueKind::Token.accepts("capability_a"));
        assert!(!ValueKind::Token.accepts(""));
        assert!(!ValueKind::Token.accepts("implementation name c"));
    }

    #[test]
    fn url_requires_scheme() {
        assert!(ValueKind::Url.accepts("ldap://host:2170/XXX"));
        assert!(ValueKind::Url.accepts("https://example.org"));
        assert!(!ValueKind::Url.accepts("host:2170/AAA"));
        assert!(!ValueKind::Url.accepts("://host"));
        assert!(!ValueKind::Url.accepts("ldap://"));
    }

    #[test]
    fn version_is_dotted_digits() {
        assert!(ValueKind::Version.accepts("5.0.0"));
        assert!(ValueKind::Version.accepts("12"));
        assert!(!ValueKind::Version.accepts("NotANumber"));
        assert!(!ValueKind::Version.accepts("5..0"));
        assert!(!ValueKind::Version.accepts("5.0.*"));
    }

    #[test]
    fn numbers_and_ranges() {
        assert!(ValueKind::Integer.accepts("-3"));
        assert!(!ValueKind::Integer.accepts("3.5"));
        let latitude = ValueKind::Decimal {
            min: -90.0,
            max: 90.0,
        };
        assert!(latitude.accepts("46.2"));
        assert!(!latitude.accepts("91"));
        assert!(!latitude.accepts("north"));
    }

    #[test]
    fn closed_sets_are_exact() {
        let quality = ValueKind::OneOf(&["production", "testing"]);
        assert!(quality.accepts("testing"));
        assert!(!quality.accepts("Testing"));
        assert!(!quality.accepts("OtherQuality"));
    }

    #[test]
    fn policy_rules() {
        assert!(ValueKind::PolicyRule.accepts("ALL"));
        assert!(ValueKind::PolicyRule.accepts("VO:cms"));
        assert!(ValueKind::PolicyRule.accepts("VOMS:/atlas/Role=production"));
        assert!(!ValueKind::PolicyRule.accepts("INVALID"));
        assert!(!ValueKind::PolicyRule.accepts("VO:"));
        assert!(!ValueKind::PolicyRule.accepts("GROUP:cms"));
    }

    #[test]
    fn booleans_ignore_case() {
        assert!(ValueKind::Boolean.accepts("TRUE"));
        assert!(ValueKind::Boolean.accepts("false"));
        assert!(!ValueKind::Boolean.accepts("yes"));
    }
}
