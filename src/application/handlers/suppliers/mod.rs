//! Supplier command and query handlers.

mod create_supplier;
mod framework_interest;

pub use create_supplier::{
    CreateSupplierCommand, CreateSupplierHandler, GetSupplierHandler, GetSupplierQuery,
};
pub use framework_interest::{
    GetInterestHandler, GetInterestQuery, RegisterInterestCommand, RegisterInterestHandler,
    RegisterInterestResult, SetDeclarationCommand, SetDeclarationHandler, SetOnFrameworkCommand,
    SetOnFrameworkHandler,
};
