//! Search layer facade.
//!
//! - **[`query`]**: per-mode structured query construction and parameter
//!   validation.
//! - **[`hits`]**: raw-hit shape discrimination and normalization into
//!   canonical results.
//! - **[`client`]**: build → execute → normalize pipeline returning
//!   results plus the echoed query.

pub mod client;
pub mod hits;
pub mod query;

pub use client::{SearchClient, SearchError};
pub use query::{BuiltQuery, FilterClause, QueryBuilder, SearchMode, VectorParams};
