//! Field-level request validation.
//!
//! Each request type declares its rules as a static table; [`validate`]
//! walks the table and collects one message per failing field.

use std::collections::BTreeMap;

/// A single constraint on a request field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Present and not blank.
    Required,
}

impl Rule {
    fn check(&self, value: Option<&str>) -> bool {
        match self {
            Rule::Required => value.is_some_and(|v| !v.trim().is_empty()),
        }
    }

    fn message(&self, field: &str) -> String {
        match self {
            Rule::Required => format!("{} is required", field),
        }
    }
}

/// Rule bound to a JSON field name.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub field: &'static str,
    pub rule: Rule,
}

impl FieldRule {
    pub const fn required(field: &'static str) -> Self {
        Self {
            field,
            rule: Rule::Required,
        }
    }
}

/// Request types that can be checked against a rule table.
pub trait Validate {
    const RULES: &'static [FieldRule];

    /// Value of the named JSON field, if present.
    fn field(&self, name: &str) -> Option<&str>;
}

/// Failed fields mapped to their messages, ordered by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(pub BTreeMap<String, String>);

pub fn validate<T: Validate>(request: &T) -> Result<(), ValidationErrors> {
    let mut errors = BTreeMap::new();

    for field_rule in T::RULES {
        if errors.contains_key(field_rule.field) {
            continue;
        }
        if !field_rule.rule.check(request.field(field_rule.field)) {
            errors.insert(
                field_rule.field.to_string(),
                field_rule.rule.message(field_rule.field),
            );
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ValidationErrors(errors))
    }
}
