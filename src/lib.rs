pub mod cli;
pub mod compressor;
pub mod config;
pub mod convert;
pub mod error;
pub mod provision;
pub mod report;
