//! Read API wire types
//!
//! Mirrors the JSON shapes of the Azure Read v3.2 operation-result payload.

use serde::Deserialize;

/// Status of an asynchronous Read operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ReadStatus {
    NotStarted,
    Running,
    Succeeded,
    /// `failed`, or any status value this client does not know about.
    #[serde(other)]
    Failed,
}

impl ReadStatus {
    /// True while the operation is still worth polling.
    pub fn is_pending(self) -> bool {
        matches!(self, Self::NotStarted | Self::Running)
    }
}

/// Operation-result envelope returned by the poll endpoint.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadOperationResult {
    pub status: ReadStatus,
    #[serde(default)]
    pub analyze_result: Option<AnalyzeResult>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResult {
    #[serde(default)]
    pub read_results: Vec<ReadPage>,
}

/// One recognized page.
#[derive(Debug, Default, Deserialize)]
pub struct ReadPage {
    #[serde(default)]
    pub lines: Vec<ReadLine>,
}

/// One recognized line of text.
#[derive(Debug, Deserialize)]
pub struct ReadLine {
    pub text: String,
}

impl ReadOperationResult {
    /// Every recognized line of every page, in source order, newline-joined.
    /// Zero recognized lines is an empty string, not an error.
    pub fn joined_text(&self) -> String {
        let Some(analyze_result) = &self.analyze_result else {
            return String::new();
        };
        analyze_result
            .read_results
            .iter()
            .flat_map(|page| page.lines.iter())
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}
