//! Transaction submission module: calldata building, gas buffering, and the
//! sign-broadcast-wait workflow

pub mod calldata;
mod gas;
mod submitter;

pub use submitter::TxSubmitter;
