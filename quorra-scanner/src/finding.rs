use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VulnType {
    ReflectedXss,
    SqlInjection,
    LocalFileInclusion,
}

impl VulnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            VulnType::ReflectedXss => "Reflected XSS",
            VulnType::SqlInjection => "SQL Injection",
            VulnType::LocalFileInclusion => "Local File Inclusion",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "Reflected XSS" => Some(VulnType::ReflectedXss),
            "SQL Injection" => Some(VulnType::SqlInjection),
            "Local File Inclusion" => Some(VulnType::LocalFileInclusion),
            _ => None,
        }
    }
}

impl fmt::Display for VulnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A confirmed detection. `url` is the exact mutated URL that triggered it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub url: String,
    pub vuln_type: VulnType,
    pub payload: String,
}

impl Finding {
    pub fn new(url: impl Into<String>, vuln_type: VulnType, payload: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            vuln_type,
            payload: payload.into(),
        }
    }
}
