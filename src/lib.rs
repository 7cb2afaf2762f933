// src/lib.rs
// Library interface for ct-submit
pub mod audit;
pub mod cert_parser;
pub mod cli;
pub mod config;
pub mod ct_log;
pub mod error;
pub mod submitter;
