//! Framework agreements signed by suppliers.

mod agreement;

pub use agreement::{AgreementStatus, FrameworkAgreement, NewFrameworkAgreement};
