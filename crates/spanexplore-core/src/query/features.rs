//! Organization feature flags and the default sample columns they select

use std::collections::BTreeSet;

/// Flag switching the explore view to OpenTelemetry-friendly columns
pub const OTEL_FRIENDLY_UI: &str = "performance-otel-friendly-ui";

/// Columns shown when the URL names none
pub const DEFAULT_FIELDS: &[&str] = &[
    "id",
    "span.op",
    "span.description",
    "span.duration",
    "transaction",
    "timestamp",
];

/// Columns shown when the URL names none and [`OTEL_FRIENDLY_UI`] is on
pub const OTEL_FRIENDLY_DEFAULT_FIELDS: &[&str] = &[
    "id",
    "span.name",
    "span.duration",
    "transaction",
    "timestamp",
];

/// Set of features enabled for an organization
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrganizationFeatures {
    features: BTreeSet<String>,
}

impl OrganizationFeatures {
    /// No features enabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `feature` is enabled
    pub fn has(&self, feature: &str) -> bool {
        self.features.contains(feature)
    }

    /// Enable `feature`
    pub fn insert(&mut self, feature: impl Into<String>) {
        self.features.insert(feature.into());
    }

    /// Enabled features, sorted
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(String::as_str)
    }

    /// Default sample columns for this organization
    pub fn default_fields(&self) -> Vec<String> {
        let fields = if self.has(OTEL_FRIENDLY_UI) {
            OTEL_FRIENDLY_DEFAULT_FIELDS
        } else {
            DEFAULT_FIELDS
        };
        fields.iter().map(ToString::to_string).collect()
    }
}

impl<S: Into<String>> FromIterator<S> for OrganizationFeatures {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            features: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl<S: Into<String>> Extend<S> for OrganizationFeatures {
    fn extend<I: IntoIterator<Item = S>>(&mut self, iter: I) {
        self.features.extend(iter.into_iter().map(Into::into));
    }
}
