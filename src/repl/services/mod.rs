//! # Services Layer
//!
//! Services own the session's contact with the outside world and the
//! bookkeeping around it:
//! - `held`: lookup submission and the completion channel
//! - `deref`: fetching location references
//! - `tracker`: submission times of in-flight lookups

pub mod deref;
pub mod held;
pub mod held_xml;
pub mod tracker;

pub use deref::{Dereferencer, FetchedDocument, HttpFetcher, ReferenceFetcher};
pub use held::{CompletionSink, HeldClient, HeldError, LookupClient, LookupMessage};
pub use tracker::{RequestTracker, TrackerError};
