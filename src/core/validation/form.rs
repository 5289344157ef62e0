//! Form state
//!
//! Holds the values of one form together with its per-field errors and
//! interaction flags, and runs the validate-then-submit sequence.

use super::engine::Validator;
use super::rules::{FormRules, ValidationResult};
use crate::core::error::{CivicError, ValidationError};
use serde_json::{Map, Value};
use std::collections::{HashMap, HashSet};
use std::future::Future;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Key under which non-field submission errors are stored
pub const GENERAL_ERROR: &str = "general";

/// State of one form
///
/// # Example
///
/// ```rust,ignore
/// let mut form = FormState::new(validator, initial, rules);
/// form.set_field_value("email", json!("someone@example.com"));
/// let ok = form
///     .submit(|values| async move {
///         members.create(Value::Object(values)).await?;
///         Ok(())
///     })
///     .await;
/// ```
#[derive(Debug)]
pub struct FormState {
    validator: Validator,
    rules: FormRules,
    initial: Map<String, Value>,
    values: Map<String, Value>,
    errors: ValidationResult,
    touched: HashSet<String>,
    validated: HashMap<String, bool>,
    dirty: bool,
    submitted: bool,
    loading: SubmitWatch,
}

/// Read-only view of a form's submitting flag
///
/// `submit` holds the form mutably, so callers that need to show progress
/// take a watch beforehand with [`FormState::submit_watch`].
#[derive(Debug, Clone, Default)]
pub struct SubmitWatch(Arc<AtomicBool>);

impl SubmitWatch {
    pub fn is_submitting(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    fn set(&self, raised: bool) {
        self.0.store(raised, Ordering::Release);
    }

    // a cloned form starts with a flag of its own
    fn detached(&self) -> Self {
        SubmitWatch(Arc::new(AtomicBool::new(self.is_submitting())))
    }
}

struct Raised<'a>(&'a SubmitWatch);

impl<'a> Raised<'a> {
    fn new(watch: &'a SubmitWatch) -> Self {
        watch.set(true);
        Raised(watch)
    }
}

impl Drop for Raised<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

impl Clone for FormState {
    fn clone(&self) -> Self {
        Self {
            validator: self.validator.clone(),
            rules: self.rules.clone(),
            initial: self.initial.clone(),
            values: self.values.clone(),
            errors: self.errors.clone(),
            touched: self.touched.clone(),
            validated: self.validated.clone(),
            dirty: self.dirty,
            submitted: self.submitted,
            loading: self.loading.detached(),
        }
    }
}

impl FormState {
    pub fn new(validator: Validator, initial: Map<String, Value>, rules: FormRules) -> Self {
        Self {
            validator,
            rules,
            values: initial.clone(),
            initial,
            errors: ValidationResult::new(),
            touched: HashSet::new(),
            validated: HashMap::new(),
            dirty: false,
            submitted: false,
            loading: SubmitWatch::default(),
        }
    }

    pub fn values(&self) -> &Map<String, Value> {
        &self.values
    }

    pub fn value(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    pub fn errors(&self) -> &ValidationResult {
        &self.errors
    }

    pub fn error(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn is_touched(&self, field: &str) -> bool {
        self.touched.contains(field)
    }

    /// `Some(true)` once the field passed its last check
    pub fn is_validated(&self, field: &str) -> Option<bool> {
        self.validated.get(field).copied()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn is_submitting(&self) -> bool {
        self.loading.is_submitting()
    }

    /// A handle that observes the submitting flag while `submit` runs
    pub fn submit_watch(&self) -> SubmitWatch {
        self.loading.clone()
    }

    /// Set one value and re-check that field
    pub fn set_field_value(&mut self, field: &str, value: Value) {
        self.values.insert(field.to_string(), value);
        self.dirty = true;
        self.validate_field(field);
    }

    /// Set several values and re-check the whole form
    pub fn set_field_values(&mut self, values: Map<String, Value>) {
        self.values.extend(values);
        self.dirty = true;
        self.validate_form();
    }

    /// Mark a field as touched and re-check it
    pub fn blur_field(&mut self, field: &str) {
        self.touched.insert(field.to_string());
        self.validate_field(field);
    }

    /// Check one field; fields without rules are always valid
    pub fn validate_field(&mut self, field: &str) -> bool {
        let Some(rules) = self.rules.get(field) else {
            return true;
        };

        match self.validator.first_error(self.values.get(field), rules) {
            Some(message) => {
                self.errors.insert(field.to_string(), message);
                self.validated.insert(field.to_string(), false);
                false
            }
            None => {
                self.errors.shift_remove(field);
                self.validated.insert(field.to_string(), true);
                true
            }
        }
    }

    /// Check every declared field, replacing all errors
    pub fn validate_form(&mut self) -> bool {
        self.errors = self.validator.check_form(&self.values, &self.rules);
        self.errors.is_empty()
    }

    /// Back to the initial values with clean flags
    pub fn reset(&mut self) {
        self.values = self.initial.clone();
        self.errors.clear();
        self.touched.clear();
        self.validated.clear();
        self.dirty = false;
        self.submitted = false;
        self.loading.set(false);
    }

    /// Validate, then hand the values to `on_submit`
    ///
    /// Returns `false` without calling `on_submit` when validation fails.
    /// A failing `on_submit` has its field errors copied into the form, or
    /// its message stored under [`GENERAL_ERROR`].
    pub async fn submit<F, Fut>(&mut self, on_submit: F) -> bool
    where
        F: FnOnce(Map<String, Value>) -> Fut,
        Fut: Future<Output = anyhow::Result<()>>,
    {
        self.submitted = true;

        if !self.validate_form() {
            return false;
        }

        let values = self.values.clone();
        let outcome = {
            let _submitting = Raised::new(&self.loading);
            on_submit(values).await
        };

        match outcome {
            Ok(()) => true,
            Err(error) => {
                self.errors = submission_errors(&error);
                false
            }
        }
    }
}

fn submission_errors(error: &anyhow::Error) -> ValidationResult {
    let field_errors = match error.downcast_ref::<CivicError>() {
        Some(CivicError::Validation(ValidationError::FieldErrors(errors))) => Some(errors),
        _ => match error.downcast_ref::<ValidationError>() {
            Some(ValidationError::FieldErrors(errors)) => Some(errors),
            _ => None,
        },
    };

    if let Some(errors) = field_errors {
        return errors.clone();
    }

    let message = match error.downcast_ref::<CivicError>() {
        Some(civic) => civic.message(),
        None => error.to_string(),
    };
    let mut errors = ValidationResult::new();
    errors.insert(GENERAL_ERROR.to_string(), message);
    errors
}
