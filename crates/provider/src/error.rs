/// Errors from talking to a graph provider.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("No TrustIn API key provided. Set TRUSTIN_API_KEY or pass --api-key")]
    MissingApiKey,

    #[error("Unsupported chain: {0}. Supported: Tron, Ethereum, Bitcoin, Solana")]
    UnsupportedChain(String),

    #[error("Invalid authorization (check API key)")]
    Unauthorized,

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error: {status} - {body}")]
    Api { status: u16, body: String },

    #[error("Failed to submit task: {0}")]
    SubmitRejected(String),

    #[error("Task {task_id} timed out after {attempts} status checks")]
    TaskTimedOut { task_id: String, attempts: u32 },

    #[error("Failed to fetch result: {0}")]
    ResultRejected(String),

    #[error("Invalid response from provider: {0}")]
    Parse(String),
}
