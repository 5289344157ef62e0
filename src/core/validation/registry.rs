//! Rule registry
//!
//! Maps rule names to [`RuleEntry`] values. Rule sets refer to rules by
//! name and names are resolved at check time, so registering a rule under an
//! existing name changes every check made afterwards. Last registration wins.

use super::rules::{Rule, RuleEntry, RuleParam};
use super::validators;
use crate::core::error::ValidationError;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Thread-safe name → rule table
#[derive(Debug)]
pub struct RuleRegistry {
    entries: RwLock<HashMap<String, RuleEntry>>,
}

impl RuleRegistry {
    /// A registry with no rules at all
    pub fn empty() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// A registry holding every built-in rule
    pub fn with_builtins() -> Self {
        let registry = Self::empty();
        for (name, entry) in validators::builtins() {
            registry.register(name, entry);
        }
        registry
    }

    /// The process-wide registry, created with the built-ins on first use
    pub fn global() -> Arc<RuleRegistry> {
        static GLOBAL: OnceLock<Arc<RuleRegistry>> = OnceLock::new();
        GLOBAL
            .get_or_init(|| Arc::new(RuleRegistry::with_builtins()))
            .clone()
    }

    /// Register `entry` under `name`, replacing any previous entry
    pub fn register(&self, name: impl Into<String>, entry: RuleEntry) {
        let name = name.into();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries.insert(name.clone(), entry).is_some() {
            tracing::debug!(rule = %name, "Replaced validation rule");
        }
    }

    /// Register a fixed rule from a message and predicate
    pub fn register_fixed(
        &self,
        name: impl Into<String>,
        message: impl Into<String>,
        predicate: impl Fn(Option<&Value>) -> bool + Send + Sync + 'static,
    ) {
        self.register(name, RuleEntry::Fixed(Rule::new(message, predicate)));
    }

    /// Register a rule built from its parameter
    pub fn register_parametrized(
        &self,
        name: impl Into<String>,
        factory: impl Fn(&RuleParam) -> Result<Rule, ValidationError> + Send + Sync + 'static,
    ) {
        self.register(name, RuleEntry::parametrized(factory));
    }

    pub fn get(&self, name: &str) -> Option<RuleEntry> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}
