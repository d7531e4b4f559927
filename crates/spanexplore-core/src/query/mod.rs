//! Readable query params of the span explore view
//!
//! [`decode`] turns URL query params into a fully defaulted
//! [`ReadableQueryParams`](crate::models::ReadableQueryParams); [`encode`] and
//! [`apply`] go the other way.

mod features;
mod raw;
mod resolver;
mod writer;

pub use features::{
    OrganizationFeatures, DEFAULT_FIELDS, OTEL_FRIENDLY_DEFAULT_FIELDS, OTEL_FRIENDLY_UI,
};
pub use raw::RawQueryParams;
pub use resolver::{decode, default_aggregate_sort_bys, default_sort_bys};
pub use writer::{apply, encode};

/// URL query keys read and written by the explore view
pub mod keys {
    /// `'1'` or `'0'`
    pub const EXTRAPOLATE: &str = "extrapolate";
    /// `samples` or `aggregate`
    pub const MODE: &str = "mode";
    /// Free-text filter
    pub const QUERY: &str = "query";
    /// Pagination cursor shared by both modes
    pub const CURSOR: &str = "cursor";
    /// Sample columns, repeated
    pub const FIELD: &str = "field";
    /// Sample sort tokens, repeated
    pub const SORT: &str = "sort";
    /// Legacy group-bys, repeated
    pub const GROUP_BY: &str = "groupBy";
    /// Legacy single visualize JSON blob
    pub const VISUALIZE: &str = "visualize";
    /// Aggregate field JSON blobs, repeated
    pub const AGGREGATE_FIELD: &str = "aggregateField";
    /// Aggregate sort tokens, repeated
    pub const AGGREGATE_SORT: &str = "aggregateSort";

    pub(crate) const TIMESTAMP: &str = "timestamp";
}
