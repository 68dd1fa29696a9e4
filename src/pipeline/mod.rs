pub mod runner;

pub use runner::{run_search, PipelineError, SearchReport};
