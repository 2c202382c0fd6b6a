//! Validation context
//!
//! `ValidationContext` tracks the current instance path and accumulates
//! errors; validation continues after a violation so that all problems are
//! reported at once.

use std::fmt;

use super::error::{ValidationError, ValidationErrors};

/// One step into a JSON value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of a value inside the validated instance, rendered as `$.a.b[0]`
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InstancePath(pub Vec<PathSegment>);

impl InstancePath {
    pub fn child(&self, key: &str) -> Self {
        let mut path = self.clone();
        path.0.push(PathSegment::Key(key.to_string()));
        path
    }
}

impl fmt::Display for InstancePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for segment in &self.0 {
            match segment {
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

#[derive(Debug, Default)]
pub(crate) struct ValidationContext {
    path: InstancePath,
    errors: Vec<ValidationError>,
}

impl ValidationContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(&self) -> InstancePath {
        self.path.clone()
    }

    pub fn record(&mut self, error: ValidationError) {
        self.errors.push(error);
    }

    pub fn push_key(&mut self, key: &str) {
        self.path.0.push(PathSegment::Key(key.to_string()));
    }

    pub fn push_index(&mut self, index: usize) {
        self.path.0.push(PathSegment::Index(index));
    }

    pub fn pop(&mut self) {
        self.path.0.pop();
    }

    pub fn finish(self) -> Result<(), ValidationErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(ValidationErrors::new(self.errors))
        }
    }
}
