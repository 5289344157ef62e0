//! Field and form checks
//!
//! [`Validator::check_field`] reports every violated rule of one field, in
//! declaration order. [`Validator::check_form`] keeps only the first message
//! per field, which is what forms display.

use super::registry::RuleRegistry;
use super::rules::{FieldRuleSet, FormRules, ValidationResult};
use crate::core::error::ValidationError;
use serde_json::{Map, Value};
use std::sync::Arc;

/// Rule-based validator bound to a registry
#[derive(Debug, Clone)]
pub struct Validator {
    registry: Arc<RuleRegistry>,
}

impl Validator {
    pub fn new(registry: Arc<RuleRegistry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<RuleRegistry> {
        &self.registry
    }

    /// Every violated rule's message, in declaration order
    ///
    /// Unknown rule names are skipped. A parameter a rule cannot use is an
    /// [`ValidationError::InvalidParameter`].
    pub fn try_check_field(
        &self,
        value: Option<&Value>,
        rules: &FieldRuleSet,
    ) -> Result<Vec<String>, ValidationError> {
        let mut messages = Vec::new();

        for (name, param) in rules.iter() {
            let Some(entry) = self.registry.get(name) else {
                tracing::warn!(rule = %name, "Unknown validation rule, skipping");
                continue;
            };

            match entry.resolve(param)? {
                Some(rule) if !rule.check(value) => messages.push(rule.message().to_string()),
                _ => {}
            }
        }

        Ok(messages)
    }

    /// Like [`try_check_field`](Self::try_check_field)
    ///
    /// # Panics
    ///
    /// Panics when a rule receives a parameter it cannot use; rule sets are
    /// written by the programmer, so this is a contract violation.
    pub fn check_field(&self, value: Option<&Value>, rules: &FieldRuleSet) -> Vec<String> {
        self.try_check_field(value, rules)
            .unwrap_or_else(|e| panic!("{}", e))
    }

    /// First violated rule's message, if any
    pub fn first_error(&self, value: Option<&Value>, rules: &FieldRuleSet) -> Option<String> {
        self.check_field(value, rules).into_iter().next()
    }

    /// First error per declared field
    pub fn try_check_form(
        &self,
        record: &Map<String, Value>,
        rules: &FormRules,
    ) -> Result<ValidationResult, ValidationError> {
        let mut result = ValidationResult::new();
        for (field, field_rules) in rules {
            let messages = self.try_check_field(record.get(field), field_rules)?;
            if let Some(first) = messages.into_iter().next() {
                result.insert(field.clone(), first);
            }
        }
        Ok(result)
    }

    /// First error per declared field; fields without rules are never reported
    ///
    /// # Panics
    ///
    /// Same contract as [`check_field`](Self::check_field).
    pub fn check_form(&self, record: &Map<String, Value>, rules: &FormRules) -> ValidationResult {
        self.try_check_form(record, rules)
            .unwrap_or_else(|e| panic!("{}", e))
    }

    /// `Ok(())` when the record is valid, otherwise the field errors
    pub fn validate_form(
        &self,
        record: &Map<String, Value>,
        rules: &FormRules,
    ) -> Result<(), ValidationError> {
        let errors = self.try_check_form(record, rules)?;
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::FieldErrors(errors))
        }
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new(RuleRegistry::global())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator() -> Validator {
        Validator::new(Arc::new(RuleRegistry::with_builtins()))
    }

    #[test]
    fn test_all_violations_in_order() {
        let rules = FieldRuleSet::new().min_length(12).email().numeric();
        let messages = validator().check_field(Some(&json!("abc")), &rules);
        assert_eq!(
            messages,
            vec![
                "Must be at least 12 characters".to_string(),
                "Please enter a valid email address".to_string(),
                "Please enter digits only".to_string(),
            ]
        );
    }

    #[test]
    fn test_unknown_rule_is_skipped() {
        let rules = FieldRuleSet::new().rule("doesNotExist", true).required();
        let messages = validator().check_field(None, &rules);
        assert_eq!(messages, vec!["This field is required".to_string()]);
    }

    #[test]
    fn test_disabled_rule_is_skipped() {
        let rules = FieldRuleSet::new().rule("required", false);
        assert!(validator().check_field(None, &rules).is_empty());
    }

    #[test]
    fn test_invalid_parameter_is_reported() {
        let rules = FieldRuleSet::new().rule("min", true);
        let err = validator()
            .try_check_field(Some(&json!(3)), &rules)
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidParameter { ref rule, .. } if rule == "min"));
    }

    #[test]
    #[should_panic(expected = "Invalid parameter for rule 'maxLength'")]
    fn test_invalid_parameter_panics_on_infallible_path() {
        let rules = FieldRuleSet::new().rule("maxLength", "many");
        validator().check_field(Some(&json!("x")), &rules);
    }

    #[test]
    fn test_check_form_first_error_wins() {
        let record = json!({"email": "", "nickname": ""});
        let mut rules = FormRules::new();
        rules.insert("email".to_string(), FieldRuleSet::new().required().email());

        let result = validator().check_form(record.as_object().unwrap(), &rules);
        assert_eq!(result.len(), 1);
        assert_eq!(result["email"], "This field is required");
    }

    #[test]
    fn test_validate_form() {
        let mut rules = FormRules::new();
        rules.insert("phone".to_string(), FieldRuleSet::new().required().phone());

        let valid = json!({"phone": "0912345678"});
        assert!(validator().validate_form(valid.as_object().unwrap(), &rules).is_ok());

        let invalid = json!({"phone": "12345"});
        let err = validator()
            .validate_form(invalid.as_object().unwrap(), &rules)
            .unwrap_err();
        match err {
            ValidationError::FieldErrors(errors) => {
                assert_eq!(errors["phone"], "Please enter a valid mobile number")
            }
            other => panic!("unexpected {:?}", other),
        }
    }
}
