//! # heldline - Interactive HELD Location Client
//!
//! A line-oriented REPL for querying HELD (HTTP-Enabled Location Delivery)
//! servers. Lookups run in the background; their results are printed as
//! they arrive, and location references can be dereferenced on demand.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────┐  lines   ┌────────────────┐  LookupRequest  ┌────────────┐
//! │ Operator │─────────▶│ ReplController │────────────────▶│ HeldClient │
//! │          │◀─────────│  SessionState  │◀────────────────│  (tokio)   │
//! └──────────┘  output  │  RequestTracker│  LookupMessage  └────────────┘
//!                       └───────┬────────┘
//!                               │ deref
//!                               ▼
//!                       ┌────────────────┐
//!                       │  Dereferencer  │
//!                       └────────────────┘
//! ```

pub mod cmd_args;
pub mod config;
pub mod logging;
pub mod repl;

// Re-export main types for easy access
pub use repl::*;
