//! Profession domain model.
//!
//! # Responsibility
//! - Define the canonical row shape of the `profession` table.
//! - Validate write payloads before they reach storage.
//!
//! # Invariants
//! - `id` is generated by storage and never chosen by callers.
//! - Names are unique case-insensitively; storage enforces this.
//! - Write payloads carry a non-blank name; stored rows are passed through
//!   unchanged on reads.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Surrogate key generated by storage.
pub type ProfessionId = i64;

/// Persisted profession row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profession {
    pub id: ProfessionId,
    pub name: String,
}

impl Profession {
    pub fn new(id: ProfessionId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }

    /// Case-insensitive name comparison, matching the storage lookup.
    pub fn has_name(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// Write payload for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewProfession {
    pub name: String,
}

impl NewProfession {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Validates the payload.
    ///
    /// # Errors
    /// - `EmptyName` when the name is empty or whitespace only.
    pub fn validate(&self) -> Result<(), ProfessionValidationError> {
        if self.name.trim().is_empty() {
            return Err(ProfessionValidationError::EmptyName);
        }
        Ok(())
    }
}

impl From<&Profession> for NewProfession {
    fn from(value: &Profession) -> Self {
        Self::new(value.name.clone())
    }
}

/// Rejected write payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfessionValidationError {
    EmptyName,
}

impl Display for ProfessionValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "profession name cannot be empty"),
        }
    }
}

impl Error for ProfessionValidationError {}
