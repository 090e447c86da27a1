pub mod config;
pub mod error;
pub mod model;
pub mod prompt;
pub mod query;
pub mod stats;
pub mod storage;
pub mod task_api;
pub mod workflow;
