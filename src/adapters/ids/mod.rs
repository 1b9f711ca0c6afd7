//! Service id generators.

use std::sync::atomic::{AtomicU64, Ordering};

use rand::Rng;

use crate::domain::foundation::{DomainError, ServiceId};
use crate::ports::ServiceIdGenerator;

const SMALLEST_ID: u64 = 1_000_000_000_000_000;
const LARGEST_ID: u64 = 9_999_999_999_999_999;

/// Draws uniformly random 16 digit ids.
#[derive(Debug, Clone, Default)]
pub struct RandomServiceIdGenerator;

impl RandomServiceIdGenerator {
    pub fn new() -> Self {
        Self
    }
}

impl ServiceIdGenerator for RandomServiceIdGenerator {
    fn generate(&self) -> Result<ServiceId, DomainError> {
        let number = rand::thread_rng().gen_range(SMALLEST_ID..=LARGEST_ID);
        Ok(ServiceId::from_number(number)?)
    }
}

/// Hands out consecutive ids from a fixed starting point.
///
/// Used by tests that need predictable service ids.
#[derive(Debug)]
pub struct SequentialServiceIdGenerator {
    next: AtomicU64,
}

impl SequentialServiceIdGenerator {
    pub fn starting_at(first: u64) -> Self {
        Self {
            next: AtomicU64::new(first),
        }
    }
}

impl Default for SequentialServiceIdGenerator {
    fn default() -> Self {
        Self::starting_at(SMALLEST_ID)
    }
}

impl ServiceIdGenerator for SequentialServiceIdGenerator {
    fn generate(&self) -> Result<ServiceId, DomainError> {
        let number = self.next.fetch_add(1, Ordering::SeqCst);
        Ok(ServiceId::from_number(number)?)
    }
}
