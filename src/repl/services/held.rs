//! # HELD Lookup Service
//!
//! Submits location lookups without blocking the REPL. Each submission
//! produces exactly one `LookupMessage` on the completion channel, sent from
//! a spawned task once the server answered or the exchange failed.

use super::held_xml;
use crate::repl::models::{LookupOutcome, LookupRequest, LookupResult};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, CONTENT_TYPE};
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc;

pub const HELD_CONTENT_TYPE: &str = "application/held+xml;charset=utf-8";
const HELD_ACCEPT: &str = "application/held+xml";

#[derive(Debug, Error)]
pub enum HeldError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server answered with HTTP status {status}")]
    HttpStatus { status: u16 },

    #[error("malformed HELD response: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("malformed HELD response: {0}")]
    Malformed(String),

    #[error("malformed HELD response: missing {0}")]
    Missing(&'static str),

    #[error("invalid header '{0}'")]
    InvalidHeader(String),
}

/// Completion of a submitted lookup
#[derive(Debug)]
pub enum LookupMessage {
    /// The server produced an outcome, successful or not
    Completed {
        request: LookupRequest,
        outcome: LookupOutcome,
    },
    /// No outcome could be produced at all
    Failed {
        request: LookupRequest,
        error: String,
    },
}

impl LookupMessage {
    pub fn request(&self) -> &LookupRequest {
        match self {
            Self::Completed { request, .. } | Self::Failed { request, .. } => request,
        }
    }
}

/// Sender half handed to a lookup client with every submission
pub type CompletionSink = mpsc::Sender<LookupMessage>;

/// A client that resolves lookups asynchronously
pub trait LookupClient: Send + Sync {
    /// Start a lookup and return immediately. Exactly one message for
    /// `request` must eventually be sent on `sink`. Send errors are ignored:
    /// the receiver is gone once the session has ended.
    fn find_location(&self, request: LookupRequest, sink: CompletionSink);
}

/// HELD over HTTP(S) using reqwest
#[derive(Debug, Clone)]
pub struct HeldClient {
    http: reqwest::Client,
    endpoint: String,
}

impl HeldClient {
    /// Create a client for `endpoint`, sending `headers` with every request
    pub fn new(
        endpoint: impl Into<String>,
        headers: &[(String, String)],
        timeout: Option<Duration>,
    ) -> Result<Self, HeldError> {
        let mut default_headers = HeaderMap::new();
        for (name, value) in headers {
            let header_name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| HeldError::InvalidHeader(name.clone()))?;
            let header_value = HeaderValue::from_str(value)
                .map_err(|_| HeldError::InvalidHeader(format!("{name}:{value}")))?;
            default_headers.append(header_name, header_value);
        }

        let mut builder = reqwest::Client::builder().default_headers(default_headers);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let endpoint = endpoint.into();
        tracing::debug!("Creating HELD client for {}", endpoint);
        Ok(Self {
            http: builder.build()?,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Perform one HELD exchange and parse the answer
    pub async fn locate(&self, request: &LookupRequest) -> Result<LookupOutcome, HeldError> {
        let body = held_xml::encode_request(request);
        tracing::debug!(
            "Sending HELD request {} for '{}' to {}",
            request.id(),
            request.identifier(),
            self.endpoint
        );

        let response = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, HELD_CONTENT_TYPE)
            .header(ACCEPT, HELD_ACCEPT)
            .body(body.clone())
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        tracing::debug!("HELD response {} for request {}", status, request.id());

        // HELD errors may come with a 4xx/5xx status; only give up when the
        // body is not a HELD document either.
        let result = match held_xml::parse_response(&text) {
            Ok(LookupResult::Unknown(_)) | Err(_) if !status.is_success() => {
                return Err(HeldError::HttpStatus {
                    status: status.as_u16(),
                })
            }
            Ok(result) => result,
            Err(e) => return Err(e),
        };

        Ok(LookupOutcome::new(result).with_raw(Some(body), Some(text)))
    }
}

impl LookupClient for HeldClient {
    fn find_location(&self, request: LookupRequest, sink: CompletionSink) {
        let client = self.clone();

        tokio::spawn(async move {
            let message = match client.locate(&request).await {
                Ok(outcome) => LookupMessage::Completed { request, outcome },
                Err(e) => {
                    tracing::error!("HELD request {} failed: {}", request.id(), e);
                    LookupMessage::Failed {
                        request,
                        error: e.to_string(),
                    }
                }
            };

            if sink.send(message).await.is_err() {
                tracing::debug!("Session ended before the lookup completed");
            }
        });
    }
}
