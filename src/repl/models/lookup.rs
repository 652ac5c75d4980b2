//! Lookup request model
//!
//! A `LookupRequest` is one submission of a `held <id>` command. Every
//! submission gets its own `RequestId`, so two requests built from the same
//! identifier and settings are still different values.

use std::fmt;

/// Location representation a HELD server may be asked to return
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationType {
    Geodetic,
    Civic,
    LocationUri,
}

impl LocationType {
    /// Map a `types` command token to a location type
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "geo" => Some(Self::Geodetic),
            "civ" => Some(Self::Civic),
            "ref" => Some(Self::LocationUri),
            _ => None,
        }
    }

    /// Name used in the `locationType` element of a HELD request
    pub fn held_name(&self) -> &'static str {
        match self {
            Self::Geodetic => "geodetic",
            Self::Civic => "civic",
            Self::LocationUri => "locationURI",
        }
    }
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Geodetic => "GEODETIC",
            Self::Civic => "CIVIC",
            Self::LocationUri => "LOCATION_URI",
        };
        f.write_str(name)
    }
}

/// Sequence number assigned to a request at submission time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RequestId(u64);

impl RequestId {
    pub fn new(value: u64) -> Self {
        Self(value)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single HELD lookup submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    id: RequestId,
    identifier: String,
    location_types: Vec<LocationType>,
    exact: bool,
}

impl LookupRequest {
    /// Create a new request. The identifier must not be empty; the command
    /// parser rejects empty identifiers before a request is ever built.
    pub fn new(
        id: RequestId,
        identifier: impl Into<String>,
        location_types: Vec<LocationType>,
        exact: bool,
    ) -> Self {
        Self {
            id,
            identifier: identifier.into(),
            location_types,
            exact,
        }
    }

    pub fn id(&self) -> RequestId {
        self.id
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn location_types(&self) -> &[LocationType] {
        &self.location_types
    }

    pub fn exact(&self) -> bool {
        self.exact
    }
}
