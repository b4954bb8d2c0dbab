//! Bonding-curve launchpad program adapter

pub mod client;
pub mod program;

pub use client::CurveProgram;
pub use program::{DEVNET_PROGRAM_ID, MAINNET_PROGRAM_ID};
