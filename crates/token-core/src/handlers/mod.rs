//! Workflows that drive the token contract.
//!
//! Each handler covers one user-facing operation: the batched-versus-individual
//! airdrop comparison, deployment, transfer and approval, and log history.

pub mod airdrop;
pub mod deploy;
pub mod logs;
pub mod transfer;
