//! Vision Module
//!
//! Object detection over rendered illustrations via an Azure Custom Vision
//! prediction endpoint. Vendor responses are normalized to one canonical
//! [`Detection`] contract (`label` / `probability` / `bbox`); vendor field
//! names never leak outward.

mod client;
mod types;

pub use client::PredictionClient;
pub use types::{BoundingBox, Detection};
