//! Core domain types and the analysis stages.

pub mod aggregate;
pub mod align;
pub mod correlation;
pub mod error;
pub mod pipeline;
pub mod resolver;
pub mod sentiment;
pub mod settings;
pub mod table;
