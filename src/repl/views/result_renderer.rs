//! # Result Renderer
//!
//! Turns lookup completions into operator output. Every completion, whether
//! an outcome or a failure, gets the same frame:
//!
//! ```text
//! <blank>
//! <blank>
//! ========================================
//! Result for 'abc123' (request #1, 84 ms)
//!   [verbose: raw request, raw response, dereferenced references]
//! <body by status>
//! ========================================
//! >
//! ```
//!
//! The trailing prompt is reprinted here because completions arrive while
//! the REPL is already waiting for the next line.

use super::PROMPT;
use crate::repl::models::{LookupOutcome, LookupRequest, LookupResult, SessionState};
use crate::repl::services::{Dereferencer, RequestTracker};
use anyhow::Result;
use std::io::Write;
use std::time::Duration;

const BANNER: &str = "========================================";

/// Everything a render touches besides the completion itself
pub struct RenderContext<'a> {
    pub state: &'a mut SessionState,
    pub tracker: &'a mut RequestTracker,
    pub dereferencer: &'a Dereferencer,
    pub out: &'a mut (dyn Write + Send),
}

/// Renders completed and failed lookups
#[derive(Debug, Default, Clone, Copy)]
pub struct ResultRenderer;

impl ResultRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Render an outcome. FOUND outcomes with references update the
    /// session's last reference to the final one in the list.
    pub async fn on_completed(
        &self,
        request: &LookupRequest,
        outcome: &LookupOutcome,
        ctx: &mut RenderContext<'_>,
    ) -> Result<()> {
        let elapsed = ctx.tracker.consume(request.id())?;
        tracing::info!(
            "Lookup {} for '{}' completed with {} after {} ms",
            request.id(),
            request.identifier(),
            outcome.result.status_name(),
            elapsed.as_millis()
        );

        Self::write_header(ctx.out, request, elapsed)?;

        if ctx.state.verbose() {
            if let Some(raw) = &outcome.raw.request {
                writeln!(ctx.out, "Request:")?;
                writeln!(ctx.out, "{raw}")?;
            }
            if let Some(raw) = &outcome.raw.response {
                writeln!(ctx.out, "Response:")?;
                writeln!(ctx.out, "{raw}")?;
            }
            for reference in outcome.references() {
                ctx.dereferencer
                    .dereference(&reference.uri, &mut *ctx.out)
                    .await?;
            }
        }

        match &outcome.result {
            LookupResult::Found {
                locations,
                references,
            } => {
                if !references.is_empty() {
                    writeln!(ctx.out, "Location references:")?;
                    for reference in references {
                        writeln!(
                            ctx.out,
                            "\t{}\texpires: {}",
                            reference.uri,
                            reference.expires.to_rfc3339()
                        )?;
                    }
                }
                if !locations.is_empty() {
                    writeln!(ctx.out, "Locations:")?;
                    for location in locations {
                        let mut line =
                            format!("\tlat: {}\tlon: {}", location.latitude, location.longitude);
                        if location.radius != 0.0 {
                            line.push_str(&format!("\tradius: {}", location.radius));
                        }
                        line.push_str(&format!("\t{}", location.map_uri()));
                        writeln!(ctx.out, "{line}")?;
                    }
                }
                if let Some(last) = references.last() {
                    ctx.state.set_last_reference(last.uri.clone());
                }
            }
            LookupResult::NotFound(record) => {
                writeln!(ctx.out, "Not found:\t{}: {}", record.code, record.message)?;
            }
            LookupResult::Error(record) => {
                writeln!(ctx.out, "Failure:\t{}: {}", record.code, record.message)?;
            }
            LookupResult::Unknown(status) => {
                writeln!(ctx.out, "Unknown result status:\t{status}")?;
            }
        }

        Self::write_footer(ctx.out)
    }

    /// Render a lookup that produced no outcome at all
    pub async fn on_failed(
        &self,
        request: &LookupRequest,
        error: &str,
        ctx: &mut RenderContext<'_>,
    ) -> Result<()> {
        let elapsed = ctx.tracker.consume(request.id())?;
        tracing::info!(
            "Lookup {} for '{}' failed after {} ms",
            request.id(),
            request.identifier(),
            elapsed.as_millis()
        );

        Self::write_header(ctx.out, request, elapsed)?;
        writeln!(ctx.out, "Error occurred:\t{error}")?;
        Self::write_footer(ctx.out)
    }

    fn write_header(
        out: &mut (dyn Write + Send),
        request: &LookupRequest,
        elapsed: Duration,
    ) -> Result<()> {
        writeln!(out)?;
        writeln!(out)?;
        writeln!(out, "{BANNER}")?;
        writeln!(
            out,
            "Result for '{}' (request {}, {} ms)",
            request.identifier(),
            request.id(),
            elapsed.as_millis()
        )?;
        Ok(())
    }

    fn write_footer(out: &mut (dyn Write + Send)) -> Result<()> {
        writeln!(out, "{BANNER}")?;
        write!(out, "{PROMPT}")?;
        out.flush()?;
        Ok(())
    }
}
