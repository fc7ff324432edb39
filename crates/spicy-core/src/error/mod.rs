//! Error types for the spicy client
//!
//! Every fallible operation in the workspace returns [`SpicyResult`]. Errors
//! implement [`UnifiedError`], which exposes a stable code per variant.

mod constructors;
mod conversions;
mod types;

pub use types::{SpicyError, SpicyResult, UnifiedError};
