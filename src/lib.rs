pub mod cli;
pub mod config;
pub mod extraction;
pub mod identity;
pub mod pipeline;
pub mod query;
pub mod report;
pub mod search;
