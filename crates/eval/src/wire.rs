//! `title|body` transport format for diagnosis records.
//!
//! A record travels to the presentation layer as its title and body joined
//! by a single `|`. Neither part may contain the separator itself.

use crate::types::{DiagnosisRecord, DiagnosisResult};

pub const SEPARATOR: char = '|';

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    #[error("record title contains the '|' separator: {title}")]
    SeparatorInTitle { title: String },

    #[error("record body for '{title}' contains the '|' separator")]
    SeparatorInBody { title: String },

    #[error("wire record has no '|' separator")]
    MissingSeparator,
}

impl DiagnosisRecord {
    pub fn to_wire(&self) -> Result<String, WireError> {
        if self.title.contains(SEPARATOR) {
            return Err(WireError::SeparatorInTitle {
                title: self.title.clone(),
            });
        }
        if self.body.contains(SEPARATOR) {
            return Err(WireError::SeparatorInBody {
                title: self.title.clone(),
            });
        }
        Ok(format!("{}{}{}", self.title, SEPARATOR, self.body))
    }

    pub fn from_wire(line: &str) -> Result<DiagnosisRecord, WireError> {
        let (title, body) = line
            .split_once(SEPARATOR)
            .ok_or(WireError::MissingSeparator)?;
        if body.contains(SEPARATOR) {
            return Err(WireError::SeparatorInBody {
                title: title.to_string(),
            });
        }
        Ok(DiagnosisRecord {
            title: title.to_string(),
            body: body.to_string(),
        })
    }
}

impl DiagnosisResult {
    /// Every record in execution order, in wire form.
    pub fn to_wire(&self) -> Result<Vec<String>, WireError> {
        self.records().map(DiagnosisRecord::to_wire).collect()
    }
}
