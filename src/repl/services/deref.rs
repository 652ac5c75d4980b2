//! # Dereference Service
//!
//! Fetches the document behind a location reference and shows it verbatim.
//! The body is never parsed. Failures are reported to the operator and end
//! there; they never reach the command or result that asked for them.

use anyhow::Result;
use async_trait::async_trait;
use reqwest::header::ACCEPT;
use std::io::Write;
use std::time::Duration;

pub const PIDF_CONTENT_TYPE: &str = "application/pidf+xml";

const SEPARATOR: &str = "----------------------------------------";

/// Status and body of a fetched reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedDocument {
    pub status: u16,
    pub body: String,
}

/// Performs the GET behind a dereference
#[async_trait]
pub trait ReferenceFetcher: Send + Sync {
    async fn fetch(&self, uri: &str) -> Result<FetchedDocument>;
}

/// Fetcher backed by reqwest
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    http: reqwest::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Option<Duration>) -> Result<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            http: builder.build()?,
        })
    }
}

#[async_trait]
impl ReferenceFetcher for HttpFetcher {
    async fn fetch(&self, uri: &str) -> Result<FetchedDocument> {
        let response = self
            .http
            .get(uri)
            .header(ACCEPT, PIDF_CONTENT_TYPE)
            .send()
            .await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(FetchedDocument { status, body })
    }
}

/// Resolves location references for the operator
pub struct Dereferencer {
    fetcher: Box<dyn ReferenceFetcher>,
}

impl Dereferencer {
    pub fn new(fetcher: Box<dyn ReferenceFetcher>) -> Self {
        Self { fetcher }
    }

    /// Fetch `uri` and print status and body between separator lines.
    /// Only a failing write to `out` is returned as an error.
    pub async fn dereference(
        &self,
        uri: &str,
        out: &mut (dyn Write + Send),
    ) -> std::io::Result<()> {
        tracing::info!("Dereferencing {}", uri);

        writeln!(out, "{SEPARATOR}")?;
        writeln!(out, "Dereferencing {uri}")?;
        match self.fetcher.fetch(uri).await {
            Ok(document) => {
                writeln!(out, "Status: {}", document.status)?;
                writeln!(out, "{}", document.body)?;
            }
            Err(e) => {
                tracing::warn!("Dereference of {} failed: {:#}", uri, e);
                writeln!(out, "Dereference failed: {e:#}")?;
            }
        }
        writeln!(out, "{SEPARATOR}")?;
        Ok(())
    }
}
