//! Sort model
//!
//! Sorts travel through the URL as `[-]field` tokens, a leading `-` meaning
//! descending.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a sort
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortDirection {
    /// Smallest first
    #[serde(rename = "asc")]
    Ascending,
    /// Largest first
    #[serde(rename = "desc")]
    Descending,
}

/// One ORDER BY term
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SortBy {
    /// Field or aggregate expression to sort on
    pub field: String,
    /// Direction of the sort
    pub kind: SortDirection,
}

impl SortBy {
    /// Sort descending on `field`
    pub fn descending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: SortDirection::Descending,
        }
    }

    /// Sort ascending on `field`
    pub fn ascending(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            kind: SortDirection::Ascending,
        }
    }

    /// Parse a `[-]field` token. The field is taken verbatim; empty tokens
    /// and a bare `-` yield `None`.
    pub fn parse(token: &str) -> Option<Self> {
        let (field, kind) = match token.strip_prefix('-') {
            Some(rest) => (rest, SortDirection::Descending),
            None => (token, SortDirection::Ascending),
        };

        if field.is_empty() {
            return None;
        }

        Some(Self {
            field: field.to_string(),
            kind,
        })
    }

    /// Encode back into the `[-]field` token form
    pub fn to_token(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for SortBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SortDirection::Ascending => write!(f, "{}", self.field),
            SortDirection::Descending => write!(f, "-{}", self.field),
        }
    }
}

/// Decode a list of sort tokens, skipping empty ones
pub fn decode_sorts<S: AsRef<str>>(tokens: &[S]) -> Vec<SortBy> {
    tokens
        .iter()
        .filter_map(|token| SortBy::parse(token.as_ref()))
        .collect()
}
