use thiserror::Error;

/// Everything that can go wrong while ingesting quotes from one source.
///
/// `EmptySourceList` and `UnsupportedSource` are startup errors and abort the
/// whole run; the remaining variants are job-scoped and only fail the job
/// that raised them.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("request to \"{url}\" failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("\"{url}\" responded with status {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error(transparent)]
    Database(#[from] sea_orm::DbErr),

    #[error("source \"{0}\" was not found in the database")]
    SourceNotFound(String),

    #[error("source \"{0}\" has no registered adapter")]
    UnsupportedSource(String),

    #[error("no sources are configured")]
    EmptySourceList,
}
