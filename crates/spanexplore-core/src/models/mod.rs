//! Data models for SpanExplore

mod aggregate;
mod function;
mod params;
mod sort;

pub use aggregate::*;
pub use function::*;
pub use params::*;
pub use sort::*;
