use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub enum QpcrError {
    /// Data source unreachable or not parseable as the expected structure.
    Load(String),
    /// A record key did not match the configured well-key pattern.
    /// Fatal to the whole load; plate statistics assume full coverage.
    MalformedKey(String),
    /// Invalid construction-time configuration.
    Configuration(String),
    Io(std::io::Error),
    Serde(serde_json::Error),
    Http(reqwest::Error),
}

impl Error for QpcrError {}

impl fmt::Display for QpcrError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            QpcrError::Load(msg) => write!(f, "load failed: {msg}"),
            QpcrError::MalformedKey(key) => write!(f, "malformed well key: {key}"),
            QpcrError::Configuration(msg) => write!(f, "invalid configuration: {msg}"),
            QpcrError::Io(err) => write!(f, "{err}"),
            QpcrError::Serde(err) => write!(f, "{err}"),
            QpcrError::Http(err) => write!(f, "{err}"),
        }
    }
}

impl From<std::io::Error> for QpcrError {
    fn from(err: std::io::Error) -> Self {
        QpcrError::Io(err)
    }
}

impl From<serde_json::Error> for QpcrError {
    fn from(err: serde_json::Error) -> Self {
        QpcrError::Serde(err)
    }
}

impl From<reqwest::Error> for QpcrError {
    fn from(err: reqwest::Error) -> Self {
        QpcrError::Http(err)
    }
}
