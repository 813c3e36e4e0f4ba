//! Shared HTTP plumbing for the zonesmith crates.
//!
//! Currently this is the RFC 7807 problem-details error response type that
//! every API handler returns on failure.

pub mod problemdetails;

pub use problemdetails::{Problem, ProblemDetails};
