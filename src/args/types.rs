use clap::ValueEnum;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, ValueEnum, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    /// Tab-separated line per summary, with a header row.
    Tsv,
    /// One JSON object per summary.
    Jsonl,
}

impl ReportFormat {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ReportFormat::Tsv => "tsv",
            ReportFormat::Jsonl => "jsonl",
        }
    }
}
