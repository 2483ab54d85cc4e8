use actix_web::{
    HttpResponse,
    error::ResponseError,
    http::{StatusCode, header::ContentType},
};
use log::error;
use thiserror::Error;

/// Failures talking to the upstream rate feed.
#[derive(Debug, Error)]
pub enum FeedError {
    #[error("Could not fetch rates from the feed. {0}")]
    Upstream(String),
    #[error("{0}")]
    UpstreamFormat(String),
}

impl From<reqwest::Error> for FeedError {
    fn from(e: reqwest::Error) -> Self {
        Self::Upstream(e.to_string())
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(e: sqlx::Error) -> Self {
        Self::Database(e.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("{0}")]
    InvalidRequest(String),
    #[error("{0}")]
    InvalidAmount(String),
    #[error("Unknown currency: {0}")]
    UnknownCurrency(String),
    #[error("Rates not available. Please update rates first.")]
    NoSnapshot,
    #[error("Rate for {0} is zero.")]
    ZeroRate(String),
}

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error(transparent)]
    Feed(#[from] FeedError),
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Conversion(#[from] ConversionError),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::Conversion(e) => match e {
                ConversionError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
                ConversionError::InvalidAmount(_) => StatusCode::BAD_REQUEST,
                ConversionError::UnknownCurrency(_) => StatusCode::BAD_REQUEST,
                ConversionError::NoSnapshot => StatusCode::NOT_FOUND,
                ConversionError::ZeroRate(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Feed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::InitializeError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::IOError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!("Request failed. {self}");
        }
        HttpResponse::build(status)
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "status": "error", "message": self.to_string() }).to_string())
    }
}
