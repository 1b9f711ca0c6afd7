//! Framework command and query handlers.

mod create_framework;
mod framework_stats;
mod framework_suppliers;
mod get_framework;
mod update_framework;

pub use create_framework::{CreateFrameworkCommand, CreateFrameworkHandler};
pub use framework_stats::{GetFrameworkStatsHandler, GetFrameworkStatsQuery};
pub use framework_suppliers::{
    ListFrameworkSuppliersHandler, ListFrameworkSuppliersQuery, ListInterestedSuppliersHandler,
    ListInterestedSuppliersQuery,
};
pub use get_framework::{GetFrameworkHandler, GetFrameworkQuery, ListFrameworksHandler};
pub(crate) use get_framework::find_framework;
pub use update_framework::{UpdateFrameworkCommand, UpdateFrameworkHandler};
