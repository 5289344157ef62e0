//! Declarative field validation
//!
//! Rules are looked up by name in a [`RuleRegistry`], applied to a field
//! value through a [`FieldRuleSet`], and aggregated per form by
//! [`Validator::check_form`]. [`FormState`] layers the usual form flags
//! (dirty, touched, submitting) on top.

pub mod engine;
pub mod form;
pub mod registry;
pub mod rules;
pub mod validators;

pub use engine::Validator;
pub use form::{FormState, GENERAL_ERROR, SubmitWatch};
pub use registry::RuleRegistry;
pub use rules::{FieldRuleSet, FormRules, Rule, RuleEntry, RuleParam, ValidationResult};
