//! Version-control capability
//!
//! The batch composer only ever talks to git through the [`Git`] trait, so the
//! workspace logic can run against a real checkout ([`SystemGit`]) or against
//! a scripted double in tests.

mod client;
mod error;
mod system;

pub use client::{Git, MergeOutcome};
pub use error::GitError;
pub use system::SystemGit;

#[cfg(test)]
pub use client::mock;
