use std::path::PathBuf;

use crate::args::ReportFormat;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SinkSettings {
    /// Report file opened in append mode; stdout when unset.
    pub output: Option<PathBuf>,
    pub format: ReportFormat,
    pub header: bool,
}

impl Default for SinkSettings {
    fn default() -> Self {
        Self {
            output: None,
            format: ReportFormat::Tsv,
            header: true,
        }
    }
}
