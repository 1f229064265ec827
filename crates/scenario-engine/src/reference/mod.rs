//! Reference collaborators
//!
//! In-process implementations of [`ActionProposer`](crate::ActionProposer)
//! and [`OutcomeSimulator`](crate::OutcomeSimulator) used by the CLI and
//! for offline runs:
//! - [`MonteCarloSimulator`] - seeded population simulation
//! - [`CachingSimulator`] - memoises seeded simulator calls
//! - [`CatalogProposer`] - ranks catalog actions by cost reduction
//! - [`RetryingProposer`] - retries transient proposer failures
//! - [`ValidatingProposer`] - drops proposals outside the catalog

mod caching;
mod catalog_proposer;
mod monte_carlo;
mod retry;
mod validating;

pub use caching::CachingSimulator;
pub use catalog_proposer::CatalogProposer;
pub use monte_carlo::MonteCarloSimulator;
pub use retry::RetryingProposer;
pub use validating::ValidatingProposer;
