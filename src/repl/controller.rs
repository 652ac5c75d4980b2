//! # REPL Controller
//!
//! Owns the session and runs the read-execute loop. Commands run one at a
//! time on the REPL task. Lookups are handed to the `LookupClient` and the
//! loop moves on; their completions come back over an mpsc channel that only
//! this loop drains, so session state, the request tracker and console output
//! are only ever touched from one task.
//!
//! ```text
//!  stdin ──lines──▶ ┌──────────────┐ ──find_location──▶ LookupClient
//!                   │ReplController│                        │ (spawned task)
//!  stdout ◀──────── └──────────────┘ ◀──LookupMessage───────┘
//! ```

use crate::repl::command::{Command, UsageError};
use crate::repl::models::{LocationType, LookupRequest, RequestId, SessionState};
use crate::repl::services::{Dereferencer, LookupClient, LookupMessage, RequestTracker};
use crate::repl::views::{self, RenderContext, ResultRenderer, PROMPT};
use anyhow::{Context, Result};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tokio::sync::mpsc;

/// Completions that may queue up while a command (e.g. a dereference) runs
const COMPLETION_QUEUE_SIZE: usize = 32;

/// Interactive HELD session
pub struct ReplController {
    state: SessionState,
    tracker: RequestTracker,
    client: Box<dyn LookupClient>,
    dereferencer: Dereferencer,
    renderer: ResultRenderer,
    out: Box<dyn Write + Send>,
    completion_sender: mpsc::Sender<LookupMessage>,
    completion_receiver: mpsc::Receiver<LookupMessage>,
    last_request_id: u64,
}

impl ReplController {
    pub fn new(
        client: Box<dyn LookupClient>,
        dereferencer: Dereferencer,
        out: Box<dyn Write + Send>,
    ) -> Self {
        let (completion_sender, completion_receiver) = mpsc::channel(COMPLETION_QUEUE_SIZE);

        Self {
            state: SessionState::new(),
            tracker: RequestTracker::new(),
            client,
            dereferencer,
            renderer: ResultRenderer::new(),
            out,
            completion_sender,
            completion_receiver,
            last_request_id: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut SessionState {
        &mut self.state
    }

    pub fn tracker(&self) -> &RequestTracker {
        &self.tracker
    }

    /// Run the loop until `quit` or end of input
    pub async fn run<R>(&mut self, input: R) -> Result<()>
    where
        R: AsyncBufRead + Unpin,
    {
        views::write_welcome(&mut *self.out)?;
        views::write_help(&mut *self.out)?;
        self.write_prompt()?;

        let mut lines = input.lines();
        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(line) = line.context("failed to read operator input")? else {
                        tracing::debug!("End of input, leaving session");
                        break;
                    };
                    match self.execute(&line).await {
                        Ok(true) => {}
                        Ok(false) => break,
                        Err(e) => {
                            tracing::error!("Command '{}' failed: {:#}", line, e);
                            writeln!(self.out, "Command failed: {e:#}")?;
                        }
                    }
                    self.write_prompt()?;
                }
                Some(message) = self.completion_receiver.recv() => {
                    self.deliver(message).await;
                }
            }
        }

        if self.tracker.pending() > 0 {
            tracing::info!(
                "Leaving session with {} lookup(s) still pending",
                self.tracker.pending()
            );
        }
        Ok(())
    }

    /// Execute one line of input. Returns `false` when the session should end.
    pub async fn execute(&mut self, line: &str) -> Result<bool> {
        let parsed = match Command::parse(line) {
            Ok(None) => return Ok(true),
            Ok(Some(command)) if !command.updates_last_command() => {
                let stored = self.state.last_command().to_string();
                tracing::debug!("Replaying '{}'", stored);
                Command::parse(&stored)
            }
            // A malformed replay is never stored either
            Err(UsageError::LastWithParameters) => Err(UsageError::LastWithParameters),
            other => {
                self.state.set_last_command(line);
                other
            }
        };

        match parsed {
            Ok(Some(command)) => self.dispatch(command).await,
            Ok(None) => Ok(true),
            Err(usage) => {
                writeln!(self.out, "{usage}")?;
                Ok(true)
            }
        }
    }

    async fn dispatch(&mut self, command: Command) -> Result<bool> {
        match command {
            Command::Held(identifier) => self.submit(identifier),
            Command::Verbose(verbose) => {
                self.state.set_verbose(verbose);
                writeln!(self.out, "verbose: {verbose}")?;
            }
            Command::Exact(exact) => {
                self.state.set_exact(exact);
                writeln!(self.out, "exact: {exact}")?;
            }
            Command::Types(tokens) => self.set_location_types(&tokens)?,
            Command::Deref(Some(uri)) => {
                self.dereferencer.dereference(&uri, &mut *self.out).await?;
            }
            Command::Deref(None) => match self.state.last_reference().map(str::to_string) {
                Some(uri) => self.dereferencer.dereference(&uri, &mut *self.out).await?,
                None => tracing::debug!("No location reference received yet"),
            },
            // A stored command line is never `last`
            Command::Last => {}
            Command::Help => views::write_help(&mut *self.out)?,
            Command::Quit => return Ok(false),
            Command::Unknown(name) => writeln!(self.out, "Unknown command '{name}'")?,
        }
        Ok(true)
    }

    fn submit(&mut self, identifier: String) {
        self.last_request_id += 1;
        let request = LookupRequest::new(
            RequestId::new(self.last_request_id),
            identifier,
            self.state.location_types().to_vec(),
            self.state.exact(),
        );

        tracing::info!(
            "Submitting lookup {} for '{}' (types: {:?}, exact: {})",
            request.id(),
            request.identifier(),
            request.location_types(),
            request.exact()
        );
        self.tracker.record(request.id());
        self.client.find_location(request, self.completion_sender.clone());
    }

    fn set_location_types(&mut self, tokens: &[String]) -> Result<()> {
        self.state.clear_location_types();
        for token in tokens {
            match LocationType::from_token(token) {
                Some(location_type) => self.state.add_location_type(location_type),
                None => writeln!(
                    self.out,
                    "Unknown location type '{token}' (expected geo, civ or ref)"
                )?,
            }
        }

        let types = self.state.location_types();
        if types.is_empty() {
            writeln!(self.out, "types: server default")?;
        } else {
            let names: Vec<String> = types.iter().map(|t| t.to_string()).collect();
            writeln!(self.out, "types: {}", names.join(" "))?;
        }
        Ok(())
    }

    /// Render one completion. A completion that cannot be rendered, such as
    /// one for a request that is not being tracked, is logged and dropped.
    pub async fn deliver(&mut self, message: LookupMessage) {
        let mut ctx = RenderContext {
            state: &mut self.state,
            tracker: &mut self.tracker,
            dereferencer: &self.dereferencer,
            out: &mut *self.out,
        };

        let rendered = match &message {
            LookupMessage::Completed { request, outcome } => {
                self.renderer.on_completed(request, outcome, &mut ctx).await
            }
            LookupMessage::Failed { request, error } => {
                self.renderer.on_failed(request, error, &mut ctx).await
            }
        };

        if let Err(e) = rendered {
            tracing::error!(
                "Dropping completion of request {}: {:#}",
                message.request().id(),
                e
            );
        }
    }

    /// Deliver every completion that has already arrived, without waiting
    pub async fn deliver_pending(&mut self) -> usize {
        let mut delivered = 0;
        while let Ok(message) = self.completion_receiver.try_recv() {
            self.deliver(message).await;
            delivered += 1;
        }
        delivered
    }

    fn write_prompt(&mut self) -> Result<()> {
        write!(self.out, "{PROMPT}")?;
        self.out.flush()?;
        Ok(())
    }
}
