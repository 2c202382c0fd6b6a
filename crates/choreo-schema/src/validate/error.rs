//! Validation error types

use std::fmt;

use thiserror::Error;

use crate::node::SchemaType;

use super::context::InstancePath;

/// A single constraint violation found while validating a value.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ValidationError {
    #[error("{path}: expected {expected}, got {actual}")]
    TypeMismatch {
        expected: SchemaType,
        actual: &'static str,
        path: InstancePath,
    },

    #[error("{path} is required")]
    MissingRequiredField { field: String, path: InstancePath },

    #[error("{path}: field {field:?} is not allowed")]
    UnknownField { field: String, path: InstancePath },

    #[error("{path}: {value} is not one of {allowed}")]
    NotInEnum {
        value: String,
        allowed: String,
        path: InstancePath,
    },

    #[error("{path}: {value} must be {comparison} {bound}")]
    OutOfRange {
        value: String,
        comparison: &'static str,
        bound: String,
        path: InstancePath,
    },

    #[error("{path}: {value} is not a multiple of {divisor}")]
    NotMultipleOf {
        value: String,
        divisor: String,
        path: InstancePath,
    },

    #[error("{path}: length {length} must be {comparison} {bound}")]
    LengthOutOfBounds {
        length: usize,
        comparison: &'static str,
        bound: u64,
        path: InstancePath,
    },

    #[error("{path}: {value:?} does not match pattern {pattern:?}")]
    PatternMismatch {
        value: String,
        pattern: String,
        path: InstancePath,
    },

    #[error("{path}: invalid pattern {pattern:?}: {reason}")]
    InvalidPattern {
        pattern: String,
        reason: String,
        path: InstancePath,
    },

    #[error("{path}: {count} items must be {comparison} {bound}")]
    ItemCountOutOfBounds {
        count: usize,
        comparison: &'static str,
        bound: u64,
        path: InstancePath,
    },

    #[error("{path}: items must be unique, {index} duplicates an earlier item")]
    DuplicateItem { index: usize, path: InstancePath },

    #[error("{path}: {count} properties must be {comparison} {bound}")]
    PropertyCountOutOfBounds {
        count: usize,
        comparison: &'static str,
        bound: u64,
        path: InstancePath,
    },
}

impl ValidationError {
    pub fn path(&self) -> &InstancePath {
        match self {
            ValidationError::TypeMismatch { path, .. }
            | ValidationError::MissingRequiredField { path, .. }
            | ValidationError::UnknownField { path, .. }
            | ValidationError::NotInEnum { path, .. }
            | ValidationError::OutOfRange { path, .. }
            | ValidationError::NotMultipleOf { path, .. }
            | ValidationError::LengthOutOfBounds { path, .. }
            | ValidationError::PatternMismatch { path, .. }
            | ValidationError::InvalidPattern { path, .. }
            | ValidationError::ItemCountOutOfBounds { path, .. }
            | ValidationError::DuplicateItem { path, .. }
            | ValidationError::PropertyCountOutOfBounds { path, .. } => path,
        }
    }
}

/// Every violation found in one validation pass; never empty.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub(crate) fn new(errors: Vec<ValidationError>) -> Self {
        debug_assert!(!errors.is_empty());
        Self(errors)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationError> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0
    }
}

impl<'a> IntoIterator for &'a ValidationErrors {
    type Item = &'a ValidationError;
    type IntoIter = std::slice::Iter<'a, ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, error) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{error}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}
