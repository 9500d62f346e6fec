//! Risk-graph acquisition from an address-intelligence provider.
//!
//! [`GraphProvider`] is the seam the CLI talks to; [`TrustInClient`] is the
//! HTTP implementation (submit task, poll status, fetch result). A successful
//! fetch yields a [`FetchedGraph`]: the provider payload wrapped with request
//! metadata, ready to be saved or screened directly.

pub mod client;
pub mod config;
pub mod error;
pub mod graph;
pub mod request;

use async_trait::async_trait;

pub use client::TrustInClient;
pub use config::ProviderConfig;
pub use error::ProviderError;
pub use graph::{raw_graph_path, FetchedGraph, HopsRequested};
pub use request::{Chain, FetchRequest};

/// A source of transaction risk graphs.
#[async_trait]
pub trait GraphProvider: Send + Sync {
    /// Fetch the risk graph around `request.address`.
    async fn fetch_graph(&self, request: &FetchRequest) -> Result<FetchedGraph, ProviderError>;

    /// Human-readable provider name for logs.
    fn name(&self) -> &str;
}
