//! Field-level validation primitives.
//!
//! Checks collect into [`ValidationErrors`] instead of failing fast so a form
//! can show every broken field at once.

use std::fmt;
use std::net::Ipv4Addr;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::network::Ipv4Cidr;

/// Shape accepted for a team network block: dotted quad with an optional `/n`.
pub static CIDR_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{1,3}\.){3}\d{1,3}(/\d{1,2})?$").expect("static cidr regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    Required,
    MinLength,
    MaxLength,
    MinValue,
    Ipv4,
    Pattern,
    Cidr,
    Capacity,
    Exists,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldIssue {
    pub field: String,
    pub rule: Rule,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors {
    issues: Vec<FieldIssue>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn single(field: impl Into<String>, rule: Rule, message: impl Into<String>) -> Self {
        let mut errs = Self::new();
        errs.push(field, rule, message);
        errs
    }

    pub fn push(&mut self, field: impl Into<String>, rule: Rule, message: impl Into<String>) {
        self.issues.push(FieldIssue { field: field.into(), rule, message: message.into() });
    }

    pub fn extend(&mut self, other: ValidationErrors) {
        self.issues.extend(other.issues);
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// Issues reported against `field`.
    pub fn for_field<'a>(&'a self, field: &'a str) -> impl Iterator<Item = &'a FieldIssue> + 'a {
        self.issues.iter().filter(move |i| i.field == field)
    }

    pub fn has(&self, field: &str, rule: Rule) -> bool {
        self.issues.iter().any(|i| i.field == field && i.rule == rule)
    }

    /// `Ok(value)` when nothing was collected, otherwise the collected issues.
    pub fn into_result<T>(self, value: T) -> Result<T, ValidationErrors> {
        if self.is_empty() { Ok(value) } else { Err(self) }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.issues.iter().map(|i| format!("{}: {}", i.field, i.message)).collect();
        write!(f, "{}", parts.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

/// Anything that can check its own field rules.
pub trait Validate {
    fn validate(&self) -> Result<(), ValidationErrors>;
}

pub fn check_min_len(errs: &mut ValidationErrors, field: &str, value: &str, min: usize) {
    let len = value.chars().count();
    if len < min {
        errs.push(field, Rule::MinLength, format!("must contain at least {min} character(s)"));
    }
}

pub fn check_max_len(errs: &mut ValidationErrors, field: &str, value: &str, max: usize) {
    let len = value.chars().count();
    if len > max {
        errs.push(field, Rule::MaxLength, format!("must contain at most {max} character(s)"));
    }
}

pub fn check_ipv4(errs: &mut ValidationErrors, field: &str, value: &str) {
    if value.parse::<Ipv4Addr>().is_err() {
        errs.push(field, Rule::Ipv4, "must be a valid IPv4 address");
    }
}

/// Pattern check first, then a strict parse (octets <= 255, prefix <= 32).
pub fn check_cidr(errs: &mut ValidationErrors, field: &str, value: &str) {
    if !CIDR_PATTERN.is_match(value) {
        errs.push(field, Rule::Pattern, "must look like a.b.c.d/n");
        return;
    }
    if let Err(e) = value.parse::<Ipv4Cidr>() {
        errs.push(field, Rule::Cidr, e.to_string());
    }
}
