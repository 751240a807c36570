use crate::error::{CorreiosError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of characters in a carrier-assigned tracking code.
pub const CODE_LEN: usize = 13;

/// Separator between codes in a single status request.
pub const BATCH_DELIMITER: char = ';';

// ---------------------------------------------------------------------------
// TrackingCode
// ---------------------------------------------------------------------------

/// A validated 13-character shipment identifier, e.g. `AA123456789BR`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TrackingCode(String);

impl TrackingCode {
    /// Trim surrounding whitespace and validate. Codes may not contain
    /// whitespace or the batch delimiter.
    pub fn parse(input: &str) -> Result<Self> {
        let code = input.trim();
        let len = code.chars().count();
        let well_formed = len == CODE_LEN
            && !code
                .chars()
                .any(|c| c.is_whitespace() || c == BATCH_DELIMITER);
        if !well_formed {
            return Err(CorreiosError::InvalidCode {
                code: code.to_string(),
                len,
            });
        }
        Ok(Self(code.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for TrackingCode {
    type Err = CorreiosError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TrackingCode {
    type Error = CorreiosError;

    fn try_from(value: String) -> Result<Self> {
        Self::parse(&value)
    }
}

impl From<TrackingCode> for String {
    fn from(code: TrackingCode) -> Self {
        code.0
    }
}

impl AsRef<str> for TrackingCode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// ---------------------------------------------------------------------------
// CodeRecord
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeRecord {
    pub code: TrackingCode,
    pub label: Option<String>,
}

impl CodeRecord {
    pub fn new(code: TrackingCode, label: Option<&str>) -> Result<Self> {
        Ok(Self {
            code,
            label: normalize_label(label)?,
        })
    }
}

/// Trim a label; blank labels become `None`. Line breaks are rejected since
/// the line-oriented store keeps one record per line.
pub fn normalize_label(label: Option<&str>) -> Result<Option<String>> {
    let Some(raw) = label else {
        return Ok(None);
    };
    let label = raw.trim();
    if label.is_empty() {
        return Ok(None);
    }
    if label.contains(['\n', '\r']) {
        return Err(CorreiosError::InvalidLabel(label.to_string()));
    }
    Ok(Some(label.to_string()))
}

// ---------------------------------------------------------------------------
// Order
// ---------------------------------------------------------------------------

/// One status event reported by the carrier. `id` is the code exactly as the
/// carrier printed it, so it is kept as a plain string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub status: String,
    pub date: String,
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} - {}", self.id, self.status, self.date)
    }
}
