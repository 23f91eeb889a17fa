use std::fmt;

#[derive(Debug)]
pub enum ReconError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty field list, bad tolerance, etc.).
    ConfigValidation(String),
    /// A compared field is listed more than once.
    DuplicateField(String),
    /// The key field also appears in the compared field list.
    KeyFieldCompared(String),
}

impl fmt::Display for ReconError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::DuplicateField(field) => {
                write!(f, "config validation error: field '{field}' is listed more than once")
            }
            Self::KeyFieldCompared(field) => write!(
                f,
                "config validation error: key field '{field}' cannot also be a compared field"
            ),
        }
    }
}

impl std::error::Error for ReconError {}
