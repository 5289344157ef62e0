//! Rule, rule parameter and field rule set types

use crate::core::error::ValidationError;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;

/// Predicate over a field value; `None` means the field is missing
pub type Predicate = Arc<dyn Fn(Option<&Value>) -> bool + Send + Sync>;

/// Constructor of a parametrized rule
pub type RuleFactory = Arc<dyn Fn(&RuleParam) -> Result<Rule, ValidationError> + Send + Sync>;

/// A named check: a predicate plus the message shown when it fails
#[derive(Clone)]
pub struct Rule {
    message: String,
    predicate: Predicate,
}

impl Rule {
    pub fn new(
        message: impl Into<String>,
        predicate: impl Fn(Option<&Value>) -> bool + Send + Sync + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// `true` when `value` satisfies the rule
    pub fn check(&self, value: Option<&Value>) -> bool {
        (self.predicate)(value)
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// A registry entry: either a ready rule or a constructor taking a parameter
#[derive(Clone)]
pub enum RuleEntry {
    /// Rule whose parameter only switches it on or off
    Fixed(Rule),

    /// Rule built from its parameter at check time (`min`, `maxLength`...)
    Parametrized(RuleFactory),
}

impl RuleEntry {
    /// Wrap a factory closure
    pub fn parametrized(
        factory: impl Fn(&RuleParam) -> Result<Rule, ValidationError> + Send + Sync + 'static,
    ) -> Self {
        RuleEntry::Parametrized(Arc::new(factory))
    }

    /// The rule to evaluate for `param`, or `None` when the param disables it
    pub fn resolve(&self, param: &RuleParam) -> Result<Option<Rule>, ValidationError> {
        match self {
            RuleEntry::Fixed(_) if param.is_disabled() => Ok(None),
            RuleEntry::Fixed(rule) => Ok(Some(rule.clone())),
            RuleEntry::Parametrized(factory) => factory(param).map(Some),
        }
    }
}

impl fmt::Debug for RuleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleEntry::Fixed(rule) => f.debug_tuple("Fixed").field(rule).finish(),
            RuleEntry::Parametrized(_) => f.write_str("Parametrized(..)"),
        }
    }
}

/// Parameter attached to a rule name in a field rule set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleParam {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl RuleParam {
    /// `false` switches a fixed rule off
    pub fn is_disabled(&self) -> bool {
        matches!(self, RuleParam::Flag(false))
    }

    /// Numeric reading of the parameter; numeric text is accepted
    pub fn as_number(&self) -> Option<f64> {
        let n = match self {
            RuleParam::Number(n) => Some(*n),
            RuleParam::Text(s) => s.trim().parse::<f64>().ok(),
            RuleParam::Flag(_) => None,
        };
        n.filter(|n| n.is_finite())
    }

    /// Numeric parameter or an [`ValidationError::InvalidParameter`] naming `rule`
    pub fn require_number(&self, rule: &str) -> Result<f64, ValidationError> {
        self.as_number()
            .ok_or_else(|| ValidationError::InvalidParameter {
                rule: rule.to_string(),
                message: format!("expected a number, got {:?}", self),
            })
    }

    /// Non-negative integer parameter (lengths)
    pub fn require_count(&self, rule: &str) -> Result<usize, ValidationError> {
        let n = self.require_number(rule)?;
        if n < 0.0 || n.fract() != 0.0 {
            return Err(ValidationError::InvalidParameter {
                rule: rule.to_string(),
                message: format!("expected a non-negative integer, got {}", n),
            });
        }
        Ok(n as usize)
    }
}

impl From<bool> for RuleParam {
    fn from(flag: bool) -> Self {
        RuleParam::Flag(flag)
    }
}

impl From<f64> for RuleParam {
    fn from(n: f64) -> Self {
        RuleParam::Number(n)
    }
}

impl From<i32> for RuleParam {
    fn from(n: i32) -> Self {
        RuleParam::Number(n as f64)
    }
}

impl From<u32> for RuleParam {
    fn from(n: u32) -> Self {
        RuleParam::Number(n as f64)
    }
}

impl From<usize> for RuleParam {
    fn from(n: usize) -> Self {
        RuleParam::Number(n as f64)
    }
}

impl From<&str> for RuleParam {
    fn from(s: &str) -> Self {
        RuleParam::Text(s.to_string())
    }
}

impl From<String> for RuleParam {
    fn from(s: String) -> Self {
        RuleParam::Text(s)
    }
}

/// Rule name → parameter for one field, evaluated in insertion order
///
/// # Example
/// ```rust,ignore
/// let password = FieldRuleSet::new().required().password().min_length(8);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldRuleSet(IndexMap<String, RuleParam>);

impl FieldRuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace, keeping its position) a rule by name
    pub fn rule(mut self, name: impl Into<String>, param: impl Into<RuleParam>) -> Self {
        self.0.insert(name.into(), param.into());
        self
    }

    pub fn required(self) -> Self {
        self.rule("required", true)
    }

    pub fn email(self) -> Self {
        self.rule("email", true)
    }

    pub fn phone(self) -> Self {
        self.rule("phone", true)
    }

    pub fn password(self) -> Self {
        self.rule("password", true)
    }

    pub fn card_number(self) -> Self {
        self.rule("cardNumber", true)
    }

    pub fn numeric(self) -> Self {
        self.rule("numeric", true)
    }

    pub fn amount(self) -> Self {
        self.rule("amount", true)
    }

    pub fn date(self) -> Self {
        self.rule("date", true)
    }

    pub fn future_date(self) -> Self {
        self.rule("futureDate", true)
    }

    pub fn min(self, n: impl Into<RuleParam>) -> Self {
        self.rule("min", n)
    }

    pub fn max(self, n: impl Into<RuleParam>) -> Self {
        self.rule("max", n)
    }

    pub fn min_length(self, n: usize) -> Self {
        self.rule("minLength", n)
    }

    pub fn max_length(self, n: usize) -> Self {
        self.rule("maxLength", n)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RuleParam)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Field name → rule set for a whole form
pub type FormRules = IndexMap<String, FieldRuleSet>;

/// Field name → first error message; empty means valid
pub type ValidationResult = IndexMap<String, String>;
