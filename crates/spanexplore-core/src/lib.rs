//! # SpanExplore
//!
//! Readable query params for span exploration views.
//!
//! A span explore view keeps all of its state in the URL: the mode, filter,
//! columns, sorts and the aggregate shape (group-bys plus visualized
//! functions). SpanExplore decodes that loosely typed query string into a
//! fully defaulted, internally consistent [`ReadableQueryParams`], and
//! composes query strings back from view state.
//!
//! ## Architecture
//!
//! - **Models**: sort, aggregate field and view-state value types
//! - **Query**: decoding, encoding and partial updates of URL query params
//! - **API**: REST API exposing the decoder
//!
//! ## Quick Start
//!
//! ```bash
//! # Decode a query string
//! spanexplore resolve 'mode=aggregate&groupBy=span.op'
//!
//! # Serve the HTTP API
//! spanexplore serve
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod api;
pub mod config;
pub mod error;
pub mod models;
pub mod query;

pub use config::Config;
pub use error::{Error, Result};
pub use models::ReadableQueryParams;

/// Re-exports for convenience
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::models::*;
    pub use crate::query::{apply, decode, encode, OrganizationFeatures, RawQueryParams};
}
