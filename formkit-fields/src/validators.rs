//! The validator contract and built-in validators.
//!
//! Every rule implements one capability: inspect a typed field value and
//! return zero or more error messages. An empty list means the value passed.
//! There is no exception-based signaling — a validator that cannot reach an
//! external confirmation service, for example, reports that as a message.
//!
//! Validators are async so a rule may suspend (an external uniqueness check,
//! a confirmation round trip) while the form stays in its validating state.
//! The built-ins complete immediately.

use async_trait::async_trait;
use regex::Regex;

use crate::error::Result;
use crate::types::FieldValue;

/// A rule that inspects a field's value and reports zero or more problems.
///
/// Validators tolerate absent values: each rule decides whether absence
/// concerns it, and the required flag is enforced separately by the
/// validation engine. Rules run in declaration order with no
/// short-circuiting.
#[async_trait]
pub trait Validator: Send + Sync {
    async fn validate(&self, value: &FieldValue) -> Vec<String>;
}

/// Bounds check for integer values. Absent and non-integer values pass;
/// coercion failures are reported by the engine, not by range rules.
#[derive(Debug, Clone)]
pub struct NumberRange {
    min: Option<i64>,
    max: Option<i64>,
}

impl NumberRange {
    pub fn new(min: Option<i64>, max: Option<i64>) -> Self {
        Self { min, max }
    }

    pub fn at_least(min: i64) -> Self {
        Self::new(Some(min), None)
    }

    pub fn at_most(max: i64) -> Self {
        Self::new(None, Some(max))
    }
}

#[async_trait]
impl Validator for NumberRange {
    async fn validate(&self, value: &FieldValue) -> Vec<String> {
        let mut errors = Vec::new();
        if let FieldValue::Integer(n) = value {
            if let Some(min) = self.min {
                if *n < min {
                    errors.push(format!("must be at least {min}"));
                }
            }
            if let Some(max) = self.max {
                if *n > max {
                    errors.push(format!("must be at most {max}"));
                }
            }
        }
        errors
    }
}

/// Character-count bounds for text values. Counts characters, not bytes.
#[derive(Debug, Clone)]
pub struct LengthRange {
    min: Option<usize>,
    max: Option<usize>,
}

impl LengthRange {
    pub fn new(min: Option<usize>, max: Option<usize>) -> Self {
        Self { min, max }
    }
}

#[async_trait]
impl Validator for LengthRange {
    async fn validate(&self, value: &FieldValue) -> Vec<String> {
        let mut errors = Vec::new();
        if let FieldValue::Text(s) = value {
            let len = s.chars().count();
            if let Some(min) = self.min {
                if len < min {
                    errors.push(format!("must be at least {min} characters long"));
                }
            }
            if let Some(max) = self.max {
                if len > max {
                    errors.push(format!("must be at most {max} characters long"));
                }
            }
        }
        errors
    }
}

/// Regex match for text values. The pattern is compiled at declaration time
/// so a bad expression fails fast instead of at validation time.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
    message: Option<String>,
}

impl Pattern {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            message: None,
        })
    }

    /// Replace the default message with a friendlier one.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

#[async_trait]
impl Validator for Pattern {
    async fn validate(&self, value: &FieldValue) -> Vec<String> {
        if let FieldValue::Text(s) = value {
            if !self.regex.is_match(s) {
                let message = self
                    .message
                    .clone()
                    .unwrap_or_else(|| format!("does not match pattern '{}'", self.regex.as_str()));
                return vec![message];
            }
        }
        Vec::new()
    }
}

/// Adapter turning a plain closure into a validator, so ad-hoc rules stay
/// one-liners at the declaration site.
pub struct FnValidator<F>(F);

/// Wrap a closure as a validator.
///
/// ```
/// use formkit_fields::{validate_fn, FieldValue};
///
/// let even = validate_fn(|value: &FieldValue| match value {
///     FieldValue::Integer(n) if n % 2 != 0 => vec!["must be an even number".to_string()],
///     _ => Vec::new(),
/// });
/// ```
pub fn validate_fn<F>(f: F) -> FnValidator<F>
where
    F: Fn(&FieldValue) -> Vec<String> + Send + Sync,
{
    FnValidator(f)
}

#[async_trait]
impl<F> Validator for FnValidator<F>
where
    F: Fn(&FieldValue) -> Vec<String> + Send + Sync,
{
    async fn validate(&self, value: &FieldValue) -> Vec<String> {
        (self.0)(value)
    }
}
