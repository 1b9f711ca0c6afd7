//! Draft service command and query handlers.

mod complete_draft;
mod copy_draft;
mod create_draft;
mod delete_draft;
mod get_draft;
mod list_drafts;
mod publish_draft;
mod update_draft;
mod update_draft_status;

pub use complete_draft::{CompleteDraftCommand, CompleteDraftHandler};
pub use copy_draft::{
    CopyDraftCommand, CopyDraftHandler, CopyServiceToDraftCommand, CopyServiceToDraftHandler,
};
pub use create_draft::{CreateDraftCommand, CreateDraftHandler};
pub use delete_draft::{DeleteDraftCommand, DeleteDraftHandler};
pub use get_draft::{DraftView, GetDraftHandler, GetDraftQuery};
pub use list_drafts::{ListDraftsHandler, ListDraftsQuery};
pub use publish_draft::{PublishDraftCommand, PublishDraftHandler};
pub use update_draft::{UpdateDraftCommand, UpdateDraftHandler};
pub use update_draft_status::{UpdateDraftStatusCommand, UpdateDraftStatusHandler};
