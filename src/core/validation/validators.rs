//! Built-in field validators
//!
//! Every rule except `required` lets absent values through; pairing a rule
//! with `required` is how a field becomes mandatory.

use super::rules::{Rule, RuleEntry, RuleParam};
use crate::core::error::ValidationError;
use crate::core::field::{as_number, as_text, is_absent, parse_date};
use chrono::Utc;
use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

pub const REQUIRED: &str = "required";
pub const EMAIL: &str = "email";
pub const PHONE: &str = "phone";
pub const PASSWORD: &str = "password";
pub const CARD_NUMBER: &str = "cardNumber";
pub const MIN: &str = "min";
pub const MAX: &str = "max";
pub const MIN_LENGTH: &str = "minLength";
pub const MAX_LENGTH: &str = "maxLength";
pub const NUMERIC: &str = "numeric";
pub const AMOUNT: &str = "amount";
pub const DATE: &str = "date";
pub const FUTURE_DATE: &str = "futureDate";

/// Every built-in rule, in registration order
pub fn builtins() -> Vec<(&'static str, RuleEntry)> {
    vec![
        (REQUIRED, RuleEntry::Fixed(required())),
        (EMAIL, RuleEntry::Fixed(email())),
        (PHONE, RuleEntry::Fixed(phone())),
        (PASSWORD, RuleEntry::Fixed(password())),
        (CARD_NUMBER, RuleEntry::Fixed(card_number())),
        (MIN, RuleEntry::parametrized(|p| Ok(min(p.require_number(MIN)?)))),
        (MAX, RuleEntry::parametrized(|p| Ok(max(p.require_number(MAX)?)))),
        (
            MIN_LENGTH,
            RuleEntry::parametrized(|p| Ok(min_length(p.require_count(MIN_LENGTH)?))),
        ),
        (
            MAX_LENGTH,
            RuleEntry::parametrized(|p| Ok(max_length(p.require_count(MAX_LENGTH)?))),
        ),
        (NUMERIC, RuleEntry::Fixed(numeric())),
        (AMOUNT, RuleEntry::Fixed(amount())),
        (DATE, RuleEntry::Fixed(date())),
        (FUTURE_DATE, RuleEntry::Fixed(future_date())),
    ]
}

/// Rule that passes for absent values and applies `check` to present ones
pub fn when_present(
    message: impl Into<String>,
    check: impl Fn(&Value) -> bool + Send + Sync + 'static,
) -> Rule {
    Rule::new(message, move |value: Option<&Value>| match value {
        v if is_absent(v) => true,
        Some(v) => check(v),
        None => true,
    })
}

/// Rule that passes for absent values and matches present ones against `regex`
pub fn pattern(message: impl Into<String>, regex: &'static Regex) -> Rule {
    when_present(message, move |value| {
        as_text(value).is_some_and(|text| regex.is_match(&text))
    })
}

fn text_length(value: &Value) -> usize {
    as_text(value)
        .unwrap_or_else(|| value.to_string())
        .chars()
        .count()
}

macro_rules! static_regex {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static REGEX: OnceLock<Regex> = OnceLock::new();
            REGEX.get_or_init(|| Regex::new($pattern).expect("built-in pattern is valid"))
        }
    };
}

static_regex!(email_regex, r"^[^\s@]+@[^\s@]+\.[^\s@]+$");
static_regex!(phone_regex, r"^09[0-9]{8}$");
static_regex!(password_regex, r"^[A-Za-z0-9]{8,}$");
static_regex!(card_number_regex, r"^[A-Z][0-9]{9}$");
static_regex!(numeric_regex, r"^[0-9]+$");
static_regex!(amount_regex, r"^[0-9]+(\.[0-9]{1,2})?$");

/// Validator: value is present
pub fn required() -> Rule {
    Rule::new("This field is required", |value: Option<&Value>| {
        !is_absent(value)
    })
}

/// Validator: single `@`, dot in the domain part
pub fn email() -> Rule {
    pattern("Please enter a valid email address", email_regex())
}

/// Validator: mobile number, `09` followed by 8 digits
pub fn phone() -> Rule {
    pattern("Please enter a valid mobile number", phone_regex())
}

/// Validator: at least 8 letters/digits with at least one of each
pub fn password() -> Rule {
    when_present(
        "Password must be at least 8 characters and contain letters and digits",
        |value| {
            as_text(value).is_some_and(|text| {
                password_regex().is_match(&text)
                    && text.chars().any(|c| c.is_ascii_alphabetic())
                    && text.chars().any(|c| c.is_ascii_digit())
            })
        },
    )
}

/// Validator: one uppercase letter followed by 9 digits
pub fn card_number() -> Rule {
    pattern(
        "Please enter a valid citizen card number (1 uppercase letter followed by 9 digits)",
        card_number_regex(),
    )
}

/// Validator: digits only
pub fn numeric() -> Rule {
    pattern("Please enter digits only", numeric_regex())
}

/// Validator: non-negative number with at most 2 decimals
pub fn amount() -> Rule {
    pattern("Please enter a valid amount", amount_regex())
}

/// Validator: number must not be below `bound`
pub fn min(bound: f64) -> Rule {
    when_present(format!("Must not be less than {}", bound), move |value| {
        as_number(value).is_some_and(|n| n >= bound)
    })
}

/// Validator: number must not exceed `bound`
pub fn max(bound: f64) -> Rule {
    when_present(format!("Must not be greater than {}", bound), move |value| {
        as_number(value).is_some_and(|n| n <= bound)
    })
}

/// Validator: at least `n` characters
pub fn min_length(n: usize) -> Rule {
    when_present(format!("Must be at least {} characters", n), move |value| {
        text_length(value) >= n
    })
}

/// Validator: at most `n` characters
pub fn max_length(n: usize) -> Rule {
    when_present(format!("Must be at most {} characters", n), move |value| {
        text_length(value) <= n
    })
}

/// Validator: parses as a calendar date
pub fn date() -> Rule {
    when_present("Please enter a valid date", |value| {
        parse_date(value).is_some()
    })
}

/// Validator: strictly after the instant of validation
pub fn future_date() -> Rule {
    when_present("Date must be in the future", |value| {
        parse_date(value).is_some_and(|date| date > Utc::now())
    })
}

/// Build a parametrized rule directly, outside any registry
pub fn build(name: &str, param: &RuleParam) -> Result<Option<Rule>, ValidationError> {
    builtins()
        .into_iter()
        .find(|(builtin, _)| *builtin == name)
        .map_or(Ok(None), |(_, entry)| entry.resolve(param))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn passes(rule: &Rule, value: Value) -> bool {
        rule.check(Some(&value))
    }

    // === required() ===

    #[test]
    fn test_required_rejects_absent() {
        let rule = required();
        assert!(!rule.check(None));
        assert!(!passes(&rule, json!(null)));
        assert!(!passes(&rule, json!("")));
        assert!(passes(&rule, json!("x")));
        assert!(passes(&rule, json!(0)));
        assert!(passes(&rule, json!(false)));
    }

    // === pattern rules ===

    #[test]
    fn test_email() {
        let rule = email();
        assert!(passes(&rule, json!("test@example.com")));
        assert!(!passes(&rule, json!("not-an-email")));
        assert!(!passes(&rule, json!("a@@b.com")));
        assert!(!passes(&rule, json!("a b@c.com")));
        assert!(passes(&rule, json!("")));
        assert!(rule.check(None));
    }

    #[test]
    fn test_phone() {
        let rule = phone();
        assert!(passes(&rule, json!("0912345678")));
        assert!(!passes(&rule, json!("12345")));
        assert!(!passes(&rule, json!("091234567")));
        assert!(!passes(&rule, json!("0812345678")));
    }

    #[test]
    fn test_password() {
        let rule = password();
        assert!(passes(&rule, json!("password123")));
        assert!(!passes(&rule, json!("password")));
        assert!(!passes(&rule, json!("12345678")));
        assert!(!passes(&rule, json!("pass123")));
        assert!(!passes(&rule, json!("password_123")));
    }

    #[test]
    fn test_card_number() {
        let rule = card_number();
        assert!(passes(&rule, json!("A123456789")));
        assert!(!passes(&rule, json!("a123456789")));
        assert!(!passes(&rule, json!("A12345678")));
        assert!(!passes(&rule, json!("AB23456789")));
    }

    #[test]
    fn test_numeric_and_amount() {
        assert!(passes(&numeric(), json!("0042")));
        assert!(passes(&numeric(), json!(42)));
        assert!(!passes(&numeric(), json!("4.2")));
        assert!(!passes(&numeric(), json!("-1")));

        assert!(passes(&amount(), json!("10")));
        assert!(passes(&amount(), json!("10.5")));
        assert!(passes(&amount(), json!("10.55")));
        assert!(!passes(&amount(), json!("10.555")));
        assert!(!passes(&amount(), json!("-3")));
        assert!(!passes(&amount(), json!("1e3")));
    }

    // === parametrized rules ===

    #[test]
    fn test_min_max() {
        assert!(passes(&min(5.0), json!(5)));
        assert!(passes(&min(5.0), json!("7")));
        assert!(!passes(&min(5.0), json!(4.9)));
        assert!(!passes(&min(5.0), json!(0)));
        assert!(!passes(&min(5.0), json!("abc")));
        assert!(passes(&max(10.0), json!(10)));
        assert!(!passes(&max(10.0), json!(11)));
        assert_eq!(min(5.0).message(), "Must not be less than 5");
    }

    #[test]
    fn test_lengths() {
        assert!(passes(&min_length(3), json!("abc")));
        assert!(!passes(&min_length(3), json!("ab")));
        assert!(passes(&max_length(3), json!("abc")));
        assert!(!passes(&max_length(3), json!("abcd")));
        assert!(passes(&max_length(2), json!("臺北")));
        assert!(!passes(&min_length(3), json!(12)));
        assert_eq!(max_length(3).message(), "Must be at most 3 characters");
    }

    // === dates ===

    #[test]
    fn test_date() {
        assert!(passes(&date(), json!("2024-01-15")));
        assert!(!passes(&date(), json!("2024-13-01")));
        assert!(!passes(&date(), json!("soon")));
    }

    #[test]
    fn test_future_date() {
        assert!(passes(&future_date(), json!("2999-01-01")));
        assert!(!passes(&future_date(), json!("2000-01-01")));
        assert!(!passes(&future_date(), json!("garbage")));
        assert!(future_date().check(None));
    }

    #[test]
    fn test_build_resolves_builtins() {
        let rule = build(MIN_LENGTH, &RuleParam::Number(2.0)).unwrap().unwrap();
        assert!(!passes(&rule, json!("a")));
        assert!(build("unknown", &RuleParam::Flag(true)).unwrap().is_none());
        assert!(build(MAX, &RuleParam::Flag(true)).is_err());
    }
}
