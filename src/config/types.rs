use std::path::PathBuf;
use std::time::Duration;

use serde::Deserialize;

use crate::args::ReportFormat;
use crate::error::ValidationError;
use crate::source::Framing;

/// File-level settings. Every field is optional; CLI flags and environment
/// variables take precedence over anything set here.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    pub endpoint: Option<String>,
    #[serde(alias = "satellite")]
    pub satellite_id: Option<String>,
    pub stream_id: Option<String>,
    pub framing: Option<Framing>,
    pub interval: Option<DurationValue>,
    pub connect_timeout: Option<DurationValue>,
    pub auth_token_file: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub format: Option<ReportFormat>,
    pub no_header: Option<bool>,
    pub no_color: Option<bool>,
}

/// A duration given either as whole seconds (`10`) or as text (`"500ms"`).
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum DurationValue {
    Seconds(u64),
    Text(String),
}

impl DurationValue {
    pub(crate) fn to_duration(&self) -> Result<Duration, ValidationError> {
        match self {
            DurationValue::Seconds(secs) => {
                if *secs == 0 {
                    Err(ValidationError::DurationZero)
                } else {
                    Ok(Duration::from_secs(*secs))
                }
            }
            DurationValue::Text(text) => super::parse_duration_value(text),
        }
    }
}
