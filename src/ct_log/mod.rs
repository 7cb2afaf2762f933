// src/ct_log/mod.rs
pub mod client;
pub mod types;

pub use client::{JsonResponse, LogClient};
pub use types::{AddChainRequest, RawSct, Sct};
