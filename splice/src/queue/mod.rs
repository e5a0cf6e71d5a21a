//! Merge queue source
//!
//! Reads the ordered list of pull requests waiting to merge. Only the order
//! and target branch matter here; eligibility is decided by
//! [`eligible_numbers`](crate::domain::eligible_numbers).

mod error;
mod http;
mod source;

pub use error::QueueError;
pub use http::HttpQueueSource;
pub use source::QueueSource;

#[cfg(test)]
pub use source::mock;
