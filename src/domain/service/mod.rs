//! Live services, their archived versions, and draft submissions.

mod data;
mod draft;
mod filter;
mod service;

pub use data::{
    drop_column_fields, merge_update, normalise, purge_nulls, strip_whitespace, ServiceData,
    COLUMN_FIELDS,
};
pub use draft::{DraftService, NewDraftService, COPY_EXCLUDED_FIELDS};
pub use filter::{sort_services, ServiceFilter, ServiceOrder, SPECIALISTS_LOT};
pub use service::{ArchivedService, Service};
