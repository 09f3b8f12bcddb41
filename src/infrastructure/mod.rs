//! Infrastructure layer - concrete implementations of the domain seams

pub mod cache;
pub mod chat;
pub mod intake;
pub mod logging;
pub mod pipeline;
pub mod provider;
pub mod store;
