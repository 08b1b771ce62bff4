//! Per-family search strategies.
//!
//! Each strategy owns its family's cost encoding and step policy, expressed as
//! a [`CostSurface`](crate::search::CostSurface), and drives the shared search.

pub mod argon2;
pub mod pbkdf2;
pub mod scrypt;
