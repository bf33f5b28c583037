//! Storybook Server Library
//!
//! Backend for a picture-book reading companion. A photographed page goes
//! through a strictly linear pipeline — OCR, illustration-prompt building,
//! diffusion rendering, object detection — and a separate pair of chat
//! endpoints forwards conversation turns to the language model.
//!
//! # Modules
//!
//! - `ocr`: Azure Read API client (submit + bounded poll)
//! - `llm`: Gemini client and prompt operations
//! - `diffusion`: renderer backed by the diffusers sidecar
//! - `vision`: Custom Vision object detection
//! - `routes`: HTTP endpoints and router assembly

pub mod config;
pub mod diffusion;
pub mod error;
pub mod llm;
pub mod ocr;
pub mod routes;
pub mod state;
pub mod vision;
