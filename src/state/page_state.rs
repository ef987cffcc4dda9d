/// Page kinds and outcome states recorded for every crawled URL
use std::fmt;

/// What a crawled page is expected to contain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    /// Paginated list of vacancy summaries
    Listing,

    /// A single vacancy
    Detail,
}

impl PageKind {
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Listing => "listing",
            Self::Detail => "detail",
        }
    }

    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "listing" => Some(Self::Listing),
            "detail" => Some(Self::Detail),
            _ => None,
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_db_string())
    }
}

/// Final outcome of a crawled page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageState {
    // ===== Success States =====
    /// Listing page fetched and its links followed
    Listed,

    /// Detail page fetched and a record emitted
    Extracted,

    // ===== Skip States =====
    /// URL outside the allowed domains, never fetched
    Offsite,

    // ===== Error States =====
    /// Detail page fetched but a required field was missing or unparseable
    ExtractionFailed,

    /// HTTP 404 or 410
    DeadLink,

    /// HTTP 429
    RateLimited,

    /// Connection refused, DNS failure, timeout
    Unreachable,

    /// Response was not HTML
    ContentMismatch,

    /// Any other HTTP or body error
    Failed,
}

impl PageState {
    /// Returns true if the page produced what it was fetched for
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Listed | Self::Extracted)
    }

    /// Returns true if this represents an error state
    pub fn is_error(&self) -> bool {
        !self.is_success() && *self != Self::Offsite
    }

    /// Converts the page state to its database string representation
    pub fn to_db_string(&self) -> &'static str {
        match self {
            Self::Listed => "listed",
            Self::Extracted => "extracted",
            Self::Offsite => "offsite",
            Self::ExtractionFailed => "extraction_failed",
            Self::DeadLink => "dead_link",
            Self::RateLimited => "rate_limited",
            Self::Unreachable => "unreachable",
            Self::ContentMismatch => "content_mismatch",
            Self::Failed => "failed",
        }
    }

    /// Parses a page state from its database string representation
    pub fn from_db_string(s: &str) -> Option<Self> {
        match s {
            "listed" => Some(Self::Listed),
            "extracted" => Some(Self::Extracted),
            "offsite" => Some(Self::Offsite),
            "extraction_failed" => Some(Self::ExtractionFailed),
            "dead_link" => Some(Self::DeadLink),
            "rate_limited" => Some(Self::RateLimited),
            "unreachable" => Some(Self::Unreachable),
            "content_mismatch" => Some(Self::ContentMismatch),
            "failed" => Some(Self::Failed),
            _ => None,
        }
    }

    /// Returns all possible page states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Listed,
            Self::Extracted,
            Self::Offsite,
            Self::ExtractionFailed,
            Self::DeadLink,
            Self::RateLimited,
            Self::Unreachable,
            Self::ContentMismatch,
            Self::Failed,
        ]
    }
}

impl fmt::Display for PageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_db_string())
    }
}
