//! sentitrade — trade performance versus market sentiment.
//!
//! Hexagonal architecture: the analysis stages live in [`domain`], port
//! traits in [`ports`], concrete implementations in [`adapters`].

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod logging;
pub mod ports;
