//! Frameworks (procurement rounds) and the lots they offer.

mod framework;
mod stats;

pub use framework::{Framework, FrameworkSummary, FrameworkUpdate, Lot, NewFramework};
pub use stats::{
    DraftSummary, FrameworkStats, InterestCount, ServiceCount, SupplierUserCount,
    RECENT_LOGIN_DAYS,
};
