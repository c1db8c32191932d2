//! Dapp interaction flows

pub mod onchaingm;
