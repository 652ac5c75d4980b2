//! Lookup outcome model
//!
//! What a completed HELD lookup produced. A transport failure is not an
//! outcome; it travels as `LookupMessage::Failed` instead.

use chrono::{DateTime, Utc};

/// A geodetic position with an optional uncertainty radius
#[derive(Debug, Clone, PartialEq)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
    /// Radius in meters, 0.0 when the server gave a plain point
    pub radius: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            radius: 0.0,
        }
    }

    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Map link for the position
    pub fn map_uri(&self) -> String {
        format!(
            "https://www.google.com/maps/?q={},{}",
            self.latitude, self.longitude
        )
    }
}

/// A URI that has to be dereferenced to obtain the location
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationReference {
    pub uri: String,
    pub expires: DateTime<Utc>,
}

impl LocationReference {
    pub fn new(uri: impl Into<String>, expires: DateTime<Utc>) -> Self {
        Self {
            uri: uri.into(),
            expires,
        }
    }
}

/// Error record returned by the server for unsuccessful lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRecord {
    pub code: String,
    pub message: String,
}

impl ErrorRecord {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Result of a lookup, tagged by status
#[derive(Debug, Clone, PartialEq)]
pub enum LookupResult {
    Found {
        locations: Vec<Location>,
        references: Vec<LocationReference>,
    },
    NotFound(ErrorRecord),
    Error(ErrorRecord),
    /// A status this client does not know; carries its literal name
    Unknown(String),
}

impl LookupResult {
    /// Status name as shown to the operator
    pub fn status_name(&self) -> &str {
        match self {
            Self::Found { .. } => "FOUND",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Error(_) => "ERROR",
            Self::Unknown(name) => name,
        }
    }
}

/// Raw request/response documents, kept for verbose display
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawExchange {
    pub request: Option<String>,
    pub response: Option<String>,
}

/// A completed lookup
#[derive(Debug, Clone, PartialEq)]
pub struct LookupOutcome {
    pub result: LookupResult,
    pub raw: RawExchange,
}

impl LookupOutcome {
    pub fn new(result: LookupResult) -> Self {
        Self {
            result,
            raw: RawExchange::default(),
        }
    }

    pub fn found(locations: Vec<Location>, references: Vec<LocationReference>) -> Self {
        Self::new(LookupResult::Found {
            locations,
            references,
        })
    }

    pub fn with_raw(mut self, request: Option<String>, response: Option<String>) -> Self {
        self.raw = RawExchange { request, response };
        self
    }

    /// References of a FOUND outcome; empty for every other status
    pub fn references(&self) -> &[LocationReference] {
        match &self.result {
            LookupResult::Found { references, .. } => references,
            _ => &[],
        }
    }
}
