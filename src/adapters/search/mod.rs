//! Search index adapters.
//!
//! - `HttpSearchIndex` talks to the search API over HTTP
//! - `DisabledSearchIndex` drops every request, for deployments without search
//! - `RecordingSearchIndex` keeps requests in memory for tests

mod disabled;
mod http_index;
mod recording;

pub use disabled::DisabledSearchIndex;
pub use http_index::{HttpSearchIndex, HttpSearchIndexConfig};
pub use recording::{RecordingSearchIndex, SearchCall};
