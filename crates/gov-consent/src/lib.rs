//! Explicit consent recording and lookup.
//!
//! Consent is always granted explicitly — there is no inference or
//! suggestion. [`ConsentChecker::check`] is read-only: it tries an exact
//! (agent, data type, purpose) match first, then falls back to a blanket
//! (purpose = `None`) record, and treats expired records as absent.
//! Whether absence of any record means allow or deny is controlled by
//! [`ConsentConfig::default_deny`].

#![forbid(unsafe_code)]

mod checker;
mod config;
mod error;
mod store;
mod types;

pub use checker::ConsentChecker;
pub use config::ConsentConfig;
pub use error::{ConsentError, ConsentResult};
pub use types::{ConsentCheckResult, ConsentRecord};
