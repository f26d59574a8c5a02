//! # Exploit Simulations
//!
//! Each test plays the attacker against a correctly configured receiver.

pub mod replay;
pub mod timing;
