//! Framework agreement command and query handlers.

mod create_agreement;
mod sign_agreement;

pub use create_agreement::{
    CreateAgreementCommand, CreateAgreementHandler, GetAgreementHandler, GetAgreementQuery,
};
pub use sign_agreement::{
    CountersignAgreementCommand, CountersignAgreementHandler, SignAgreementCommand,
    SignAgreementHandler, UpdateAgreementCommand, UpdateAgreementHandler,
};
