//! Common test utilities and infrastructure
//!
//! In-memory stand-ins for everything a `ReplController` talks to:
//! - `SharedOutput`: captures console output
//! - `MockLookupClient`: records submissions and completes them on demand
//! - `MockFetcher`: answers dereferences and records the URIs asked for

#![allow(dead_code)]

use async_trait::async_trait;
use heldline::{
    CompletionSink, Dereferencer, FetchedDocument, LookupClient, LookupMessage, LookupOutcome,
    LookupRequest, ReferenceFetcher, ReplController,
};
use std::io::Write;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Console output shared between the controller and the test
#[derive(Clone, Default)]
pub struct SharedOutput(Arc<Mutex<Vec<u8>>>);

impl SharedOutput {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }

    /// Wait until the output contains `needle`, panicking after a few seconds
    pub async fn wait_for(&self, needle: &str) {
        let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
        while !self.text().contains(needle) {
            assert!(
                tokio::time::Instant::now() < deadline,
                "timed out waiting for '{needle}' in output:\n{}",
                self.text()
            );
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    }
}

impl Write for SharedOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

type Submission = (LookupRequest, CompletionSink);

/// Lookup client that holds submissions until the test completes them.
/// With `auto_reply` set, every submission is answered right away from a
/// spawned task instead.
#[derive(Clone, Default)]
pub struct MockLookupClient {
    submitted: Arc<Mutex<Vec<Submission>>>,
    auto_reply: Option<LookupOutcome>,
}

impl MockLookupClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn answering(outcome: LookupOutcome) -> Self {
        Self {
            auto_reply: Some(outcome),
            ..Self::default()
        }
    }

    pub fn requests(&self) -> Vec<LookupRequest> {
        self.submitted
            .lock()
            .unwrap()
            .iter()
            .map(|(request, _)| request.clone())
            .collect()
    }

    /// Send a completion for the `index`-th submission
    pub async fn complete(&self, index: usize, outcome: LookupOutcome) {
        let (request, sink) = self.submitted.lock().unwrap()[index].clone();
        sink.send(LookupMessage::Completed { request, outcome })
            .await
            .unwrap();
    }

    /// Send a failure for the `index`-th submission
    pub async fn fail(&self, index: usize, error: &str) {
        let (request, sink) = self.submitted.lock().unwrap()[index].clone();
        sink.send(LookupMessage::Failed {
            request,
            error: error.to_string(),
        })
        .await
        .unwrap();
    }

    /// Try to complete a submission after the session may have ended
    pub async fn try_complete(&self, index: usize, outcome: LookupOutcome) -> bool {
        let (request, sink) = self.submitted.lock().unwrap()[index].clone();
        sink.send(LookupMessage::Completed { request, outcome })
            .await
            .is_ok()
    }
}

impl LookupClient for MockLookupClient {
    fn find_location(&self, request: LookupRequest, sink: CompletionSink) {
        if let Some(outcome) = self.auto_reply.clone() {
            let reply_request = request.clone();
            let reply_sink = sink.clone();
            tokio::spawn(async move {
                let _ = reply_sink
                    .send(LookupMessage::Completed {
                        request: reply_request,
                        outcome,
                    })
                    .await;
            });
        }
        self.submitted.lock().unwrap().push((request, sink));
    }
}

/// Fetcher that returns a small PIDF-LO body naming the URI
#[derive(Clone, Default)]
pub struct MockFetcher {
    requested: Arc<Mutex<Vec<String>>>,
}

impl MockFetcher {
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ReferenceFetcher for MockFetcher {
    async fn fetch(&self, uri: &str) -> anyhow::Result<FetchedDocument> {
        self.requested.lock().unwrap().push(uri.to_string());
        Ok(FetchedDocument {
            status: 200,
            body: format!("<presence entity=\"{uri}\"/>"),
        })
    }
}

/// A controller wired to mocks, plus handles to inspect them
pub struct TestSession {
    pub repl: ReplController,
    pub client: MockLookupClient,
    pub fetcher: MockFetcher,
    pub output: SharedOutput,
}

impl TestSession {
    pub fn new() -> Self {
        Self::with_client(MockLookupClient::new())
    }

    pub fn with_client(client: MockLookupClient) -> Self {
        let fetcher = MockFetcher::default();
        let output = SharedOutput::default();
        let repl = ReplController::new(
            Box::new(client.clone()),
            Dereferencer::new(Box::new(fetcher.clone())),
            Box::new(output.clone()),
        );
        Self {
            repl,
            client,
            fetcher,
            output,
        }
    }

    /// Execute each line, asserting none of them ends the session
    pub async fn run_lines(&mut self, lines: &[&str]) {
        for line in lines {
            assert!(
                self.repl.execute(line).await.unwrap(),
                "'{line}' ended the session"
            );
        }
    }
}
