//! Readable and writable query params of the span explore view

use serde::{Deserialize, Serialize};

use super::{AggregateField, GroupBy, SortBy, Visualize};

/// Which field/sort pair set of the view is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Individual span rows
    #[default]
    Samples,
    /// Grouped, aggregated rows
    Aggregate,
}

impl Mode {
    /// Parse the `mode` query value; anything unrecognized is `None`
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "samples" => Some(Self::Samples),
            "aggregate" => Some(Self::Aggregate),
            _ => None,
        }
    }

    /// Query value for this mode
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Samples => "samples",
            Self::Aggregate => "aggregate",
        }
    }
}

/// Fully defaulted, internally consistent view state decoded from a URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadableQueryParams {
    /// Active mode
    pub mode: Mode,
    /// Free-text filter
    pub query: String,
    /// Pagination cursor for samples mode
    pub cursor: String,
    /// Columns shown in samples mode, never empty
    pub fields: Vec<String>,
    /// Sort for samples mode, never empty
    pub sort_bys: Vec<SortBy>,
    /// Whether aggregate results are extrapolated
    pub extrapolate: bool,
    /// Pagination cursor for aggregate mode
    pub aggregate_cursor: String,
    /// Group-bys and visualizes, always holding at least one visualize
    pub aggregate_fields: Vec<AggregateField>,
    /// Sort for aggregate mode, never empty
    pub aggregate_sort_bys: Vec<SortBy>,
}

impl ReadableQueryParams {
    /// Group-bys in aggregate field order
    pub fn group_bys(&self) -> impl Iterator<Item = &GroupBy> {
        self.aggregate_fields.iter().filter_map(AggregateField::as_group_by)
    }

    /// Visualizes in aggregate field order
    pub fn visualizes(&self) -> impl Iterator<Item = &Visualize> {
        self.aggregate_fields.iter().filter_map(AggregateField::as_visualize)
    }

    /// Cursor for whichever mode is active
    pub fn active_cursor(&self) -> &str {
        match self.mode {
            Mode::Samples => &self.cursor,
            Mode::Aggregate => &self.aggregate_cursor,
        }
    }
}

/// A partial update to the view state.
///
/// `None` leaves the current URL value alone. For the string-valued params
/// `Some(None)` clears the key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WritableQueryParams {
    /// New mode
    pub mode: Option<Mode>,
    /// New filter, or `Some(None)` to clear it
    #[serde(with = "double_option", skip_serializing_if = "Option::is_none")]
    pub query: Option<Option<String>>,
    /// New cursor, or `Some(None)` to clear it
    #[serde(with = "double_option", skip_serializing_if = "Option::is_none")]
    pub cursor: Option<Option<String>>,
    /// New sample columns
    pub fields: Option<Vec<String>>,
    /// New sample sort
    pub sort_bys: Option<Vec<SortBy>>,
    /// New extrapolation flag
    pub extrapolate: Option<bool>,
    /// New aggregate shape; replaces legacy `groupBy`/`visualize` keys
    pub aggregate_fields: Option<Vec<AggregateField>>,
    /// New aggregate sort
    pub aggregate_sort_bys: Option<Vec<SortBy>>,
}

/// Distinguishes an absent key from an explicit `null`
mod double_option {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S>(value: &Option<Option<String>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Option::<String>::deserialize(deserializer).map(Some)
    }
}
