//! curve-router - launchpad trade router library
//!
//! Sends each buy or sell of a launchpad token to the right venue: the
//! bonding-curve program while the pool is active, the DEX market once the
//! curve has completed.
//!
//! # Modules
//!
//! - `domain`: trade requests, units, transaction plans, errors
//! - `ports`: trait abstractions (wallet, chain, curve program, swap, backend)
//! - `application`: router, trade desk, token refresher
//! - `adapters`: Solana RPC, keypair wallet, curve program, Jupiter, backend, CLI
//! - `config`: configuration loading and validation

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
