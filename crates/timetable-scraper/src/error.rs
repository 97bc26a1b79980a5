use std::fmt;

use thiserror::Error;

/// Which half of a header/table pair was missing when fragments were paired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentKind {
    Header,
    Table,
}

impl fmt::Display for FragmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FragmentKind::Header => write!(f, "header"),
            FragmentKind::Table => write!(f, "table"),
        }
    }
}

/// Errors that stop extraction of a page or of a course.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// The page does not carry the course layout at all. The portal returns a
    /// login or session-expired page in this case; `markup` holds the whole
    /// page for diagnostics.
    #[error("page has no course layout ({headers} header fragments, {tables} table fragments)")]
    Structural {
        headers: usize,
        tables: usize,
        markup: String,
    },

    #[error("course {index} has no matching {missing} fragment")]
    UnpairedFragment { index: usize, missing: FragmentKind },

    #[error("malformed course header: {reason}")]
    Header { reason: String, markup: String },

    #[error("failed to parse row {row_index} of course \"{course}\": {source}")]
    Row {
        /// Identity of the partially built course, rendered as `"title -- dates"`.
        course: String,
        row_index: usize,
        row_markup: String,
        #[source]
        source: RowParseError,
    },
}

impl ExtractError {
    /// Raw markup that triggered the error, for logging alongside the message.
    #[must_use]
    pub fn markup(&self) -> Option<&str> {
        match self {
            ExtractError::Structural { markup, .. } | ExtractError::Header { markup, .. } => {
                Some(markup.as_str())
            }
            ExtractError::Row { row_markup, .. } => Some(row_markup.as_str()),
            ExtractError::UnpairedFragment { .. } => None,
        }
    }
}

/// A table row that does not have the expected cell structure.
#[derive(Debug, Error)]
#[error("{reason}")]
pub struct RowParseError {
    pub reason: String,
}

impl RowParseError {
    pub(crate) fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Failures of the remote name-search fallback. These never escape the
/// resolver; they are logged and the lesson is left without coordinates.
#[derive(Debug, Error)]
pub enum GeocodeError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus { status: u16, url: String },

    #[error("invalid map search base URL \"{base_url}\": {reason}")]
    InvalidBaseUrl { base_url: String, reason: String },

    #[error("search page has no drupal settings script")]
    MissingSettingsScript,

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("search returned no points of interest")]
    NoResults,

    #[error("point of interest has a non-numeric {field}: {value}")]
    InvalidCoordinate { field: &'static str, value: String },
}
