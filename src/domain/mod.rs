//! Domain layer - marketplace entities, workflow rules and validation vocabulary.

pub mod agreement;
pub mod audit;
pub mod foundation;
pub mod framework;
pub mod service;
pub mod supplier;
pub mod validation;
