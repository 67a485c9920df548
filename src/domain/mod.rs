pub mod data_source;
pub mod error;
pub mod event;
pub mod filter;
pub mod outcome;
pub mod source;
pub mod statistics;
pub mod task;
