//! LLM Module
//!
//! Gemini `generateContent` client plus the four prompt operations the
//! reading companion needs: turning page text into an illustration prompt,
//! asking the child a comprehension question, reacting to a chat message,
//! and summarizing a chat history.
//!
//! The server keeps no conversation state; the caller supplies the full
//! history on every chat call.

mod client;
mod types;

pub use client::GeminiClient;
pub use types::{ChatTurn, Content, GenerateContentResponse, Part};
