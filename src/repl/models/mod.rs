//! # Models
//!
//! Plain data for the session: settings, requests and their outcomes.

pub mod lookup;
pub mod outcome;
pub mod session_state;

pub use lookup::{LocationType, LookupRequest, RequestId};
pub use outcome::{
    ErrorRecord, Location, LocationReference, LookupOutcome, LookupResult, RawExchange,
};
pub use session_state::SessionState;
