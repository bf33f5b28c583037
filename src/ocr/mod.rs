//! OCR Module
//!
//! Extracts printed text from photographed book pages using the Azure
//! Computer Vision Read API. The Read API is asynchronous: an image is
//! submitted, the vendor returns an operation URL, and the result is
//! polled until the operation leaves the pending states.
//!
//! The poll is bounded: exponential backoff between checks and an overall
//! deadline from [`crate::config::OcrConfig::poll_timeout`], so a stalled
//! vendor job fails the request instead of hanging it.

mod client;
mod types;

pub use client::ReadClient;
pub use types::{AnalyzeResult, ReadLine, ReadOperationResult, ReadPage, ReadStatus};
