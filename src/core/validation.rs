//! Rule-based validation of model instances
//!
//! A rule pairs a predicate with the field and message to report. Rules fire
//! when their predicate holds, and evaluation collects one violation per
//! firing rule in registration order.

use std::fmt;

use serde::Serialize;
use tracing::debug;

/// Where a validation error is attached
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub enum Field {
    /// The object as a whole rather than one attribute
    Base,
    Attribute(String),
}

impl Field {
    pub fn attribute(name: impl Into<String>) -> Self {
        Field::Attribute(name.into())
    }

    pub fn as_str(&self) -> &str {
        match self {
            Field::Base => "base",
            Field::Attribute(name) => name,
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<Field> for String {
    fn from(field: Field) -> Self {
        field.as_str().to_string()
    }
}

/// A single (field, message) error
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub field: Field,
    pub message: String,
}

/// Ordered collection of validation errors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Errors {
    entries: Vec<Violation>,
}

impl Errors {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    pub fn add(&mut self, field: Field, message: impl Into<String>) {
        self.entries.push(Violation {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Violation> {
        self.entries.iter()
    }

    /// Messages attached to one field
    pub fn on(&self, field: &Field) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|violation| &violation.field == field)
            .map(|violation| violation.message.as_str())
            .collect()
    }

    /// Human readable messages: base errors verbatim, attribute errors
    /// prefixed with the humanized attribute name
    pub fn full_messages(&self) -> Vec<String> {
        self.entries
            .iter()
            .map(|violation| match &violation.field {
                Field::Base => violation.message.clone(),
                Field::Attribute(name) => {
                    format!("{} {}", humanize(name), violation.message)
                }
            })
            .collect()
    }

    /// Errors as plain (field, message) pairs
    pub fn as_pairs(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|violation| (violation.field.to_string(), violation.message.clone()))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Errors {
    type Item = &'a Violation;
    type IntoIter = std::slice::Iter<'a, Violation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// "password_confirmation" -> "Password confirmation"
fn humanize(attribute: &str) -> String {
    let spaced = attribute.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
    }
}

/// A predicate over `T` plus the error it reports when it holds
pub struct Rule<T> {
    field: Field,
    message: String,
    predicate: Box<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T> Rule<T> {
    pub fn new<F>(field: Field, message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Self {
            field,
            message: message.into(),
            predicate: Box::new(predicate),
        }
    }

    pub fn field(&self) -> &Field {
        &self.field
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn fires(&self, object: &T) -> bool {
        (self.predicate)(object)
    }
}

impl<T> fmt::Debug for Rule<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("field", &self.field)
            .field("message", &self.message)
            .finish()
    }
}

/// Evaluates every rule against `object`
pub fn evaluate<T>(object: &T, rules: &[Rule<T>]) -> Errors {
    let mut errors = Errors::new();
    for rule in rules {
        if rule.fires(object) {
            errors.add(rule.field.clone(), rule.message.clone());
        }
    }
    errors
}

/// Registry of rules for one model type
#[derive(Debug)]
pub struct Validator<T> {
    rules: Vec<Rule<T>>,
}

impl<T> Default for Validator<T> {
    fn default() -> Self {
        Self { rules: Vec::new() }
    }
}

impl<T> Validator<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a rule that adds `message` on `field` when `predicate` holds
    pub fn validate<F>(mut self, field: Field, message: impl Into<String>, predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.rules.push(Rule::new(field, message, predicate));
        self
    }

    pub fn rules(&self) -> &[Rule<T>] {
        &self.rules
    }

    pub fn run(&self, object: &T) -> Errors {
        let errors = evaluate(object, &self.rules);
        debug!(
            "Validation ran {} rules, {} fired",
            self.rules.len(),
            errors.len()
        );
        errors
    }
}

/// Types that carry their own validation rules
pub trait Validatable: Sized {
    fn validator() -> Validator<Self>;

    fn errors(&self) -> Errors {
        Self::validator().run(self)
    }

    fn is_valid(&self) -> bool {
        self.errors().is_empty()
    }
}
