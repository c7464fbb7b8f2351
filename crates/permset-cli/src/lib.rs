//! Tooling around permissioned set instances.
//!
//! Computes the digests an authority signs, signs requests with a local key
//! and replays signed requests against an instance built from configuration.

pub mod commands;
pub mod signing;
