//! Declarative field constraints.
//!
//! Each entity declares a static [`Schema`]: a list of constraints, each
//! pairing a field with a [`FieldRule`] and the message shown when the rule
//! fails. [`Schema::check`] runs every constraint and collects the messages
//! into [`FieldErrors`]. A field whose value cannot be coerced at all gets a
//! single message and is skipped by later rules.

use std::sync::OnceLock;

use regex::Regex;

use super::form::{FieldErrors, FormFields};

/// Message used when an amount is not a number at all or overflows storage.
pub const AMOUNT_NOT_A_NUMBER: &str = "Please enter a valid amount.";

/// Largest amount, in cents, that fits the storage column.
pub const MAX_AMOUNT_CENTS: i64 = i32::MAX as i64;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@.]+(\.[^\s@.]+)+$")
            .unwrap_or_else(|error| panic!("email regex failed to compile: {error}"))
    })
}

/// True when `value` looks like a deliverable email address.
pub fn is_well_formed_email(value: &str) -> bool {
    email_regex().is_match(value)
}

/// Reasons a decimal string could not become a cent amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoercionError {
    NotANumber,
    OutOfRange,
}

/// Coerce a decimal string into whole cents, rounding half up.
///
/// Blank input coerces to zero. Only plain decimal notation is accepted;
/// the arithmetic stays in integers so `19.99` is exactly `1999`.
///
/// # Examples
/// ```
/// use backend::domain::schema::coerce_cents;
///
/// assert_eq!(coerce_cents("19.99"), Ok(1999));
/// assert_eq!(coerce_cents("0.125"), Ok(13));
/// assert_eq!(coerce_cents(""), Ok(0));
/// ```
pub fn coerce_cents(raw: &str) -> Result<i64, CoercionError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }

    let (negative, unsigned) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let (whole, fraction) = unsigned.split_once('.').unwrap_or((unsigned, ""));
    let digits_only = |part: &str| part.bytes().all(|byte| byte.is_ascii_digit());
    if (whole.is_empty() && fraction.is_empty()) || !digits_only(whole) || !digits_only(fraction) {
        return Err(CoercionError::NotANumber);
    }

    let mut cents: i64 = 0;
    for digit in whole.bytes() {
        cents = cents
            .checked_mul(10)
            .and_then(|value| value.checked_add(i64::from(digit - b'0')))
            .ok_or(CoercionError::OutOfRange)?;
    }
    let mut fraction_digits = fraction.bytes().map(|digit| i64::from(digit - b'0'));
    let tenths = fraction_digits.next().unwrap_or(0);
    let hundredths = fraction_digits.next().unwrap_or(0);
    let round_up = fraction_digits.next().is_some_and(|digit| digit >= 5);

    cents = cents
        .checked_mul(100)
        .and_then(|value| value.checked_add(tenths * 10 + hundredths + i64::from(round_up)))
        .ok_or(CoercionError::OutOfRange)?;

    // Rounding happens on the magnitude; the sign is reapplied afterwards.
    Ok(if negative { -cents } else { cents })
}

/// A single constraint kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Non-blank after trimming.
    Required,
    /// Non-blank and a UUID reference to another entity.
    Reference,
    /// Decimal coercible amount strictly greater than zero.
    PositiveAmount,
    /// One of a closed set of literals.
    OneOf(&'static [&'static str]),
    /// Well-formed email address.
    Email,
    /// At least this many characters.
    MinLength(usize),
}

enum RuleCheck {
    Pass,
    Fail,
    Uncoercible(&'static str),
}

impl FieldRule {
    fn check(self, value: &str) -> RuleCheck {
        let passes = match self {
            Self::Required => !value.trim().is_empty(),
            Self::Reference => uuid::Uuid::parse_str(value.trim()).is_ok(),
            Self::PositiveAmount => match coerce_cents(value) {
                Ok(cents) if cents > MAX_AMOUNT_CENTS => {
                    return RuleCheck::Uncoercible(AMOUNT_NOT_A_NUMBER);
                }
                Ok(_) => is_positive_decimal(value),
                Err(_) => return RuleCheck::Uncoercible(AMOUNT_NOT_A_NUMBER),
            },
            Self::OneOf(allowed) => allowed.contains(&value),
            Self::Email => is_well_formed_email(value.trim()),
            Self::MinLength(min) => value.chars().count() >= min,
        };
        if passes { RuleCheck::Pass } else { RuleCheck::Fail }
    }
}

// `0.004` is greater than zero even though it rounds to zero cents.
fn is_positive_decimal(value: &str) -> bool {
    let trimmed = value.trim();
    !trimmed.starts_with('-') && trimmed.bytes().any(|byte| (b'1'..=b'9').contains(&byte))
}

/// One field, one rule, one message.
#[derive(Debug, Clone, Copy)]
pub struct FieldConstraint {
    pub field: &'static str,
    pub rule: FieldRule,
    pub message: &'static str,
}

impl FieldConstraint {
    pub const fn new(field: &'static str, rule: FieldRule, message: &'static str) -> Self {
        Self {
            field,
            rule,
            message,
        }
    }
}

/// Ordered constraint set for one entity.
#[derive(Debug, Clone, Copy)]
pub struct Schema {
    constraints: &'static [FieldConstraint],
}

impl Schema {
    pub const fn new(constraints: &'static [FieldConstraint]) -> Self {
        Self { constraints }
    }

    /// Run every constraint against `fields` and collect the failures.
    pub fn check(&self, fields: &FormFields) -> FieldErrors {
        let mut errors = FieldErrors::default();
        let mut uncoercible: Vec<&str> = Vec::new();
        for constraint in self.constraints {
            if uncoercible.contains(&constraint.field) {
                continue;
            }
            match constraint.rule.check(fields.text(constraint.field)) {
                RuleCheck::Pass => {}
                RuleCheck::Fail => errors.push(constraint.field, constraint.message),
                RuleCheck::Uncoercible(message) => {
                    errors.push(constraint.field, message);
                    uncoercible.push(constraint.field);
                }
            }
        }
        errors
    }
}
