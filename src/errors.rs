use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum VotingError {
    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("{0}")]
    Validation(String),

    #[error("Election is not active")]
    ElectionInactive,

    #[error("You have already voted in this election")]
    AlreadyVoted,

    #[error("Invalid candidate")]
    InvalidCandidate,

    #[error("failed to encode vote payload: {0}")]
    Payload(#[from] serde_json::Error),
}

impl ResponseError for VotingError {
    fn status_code(&self) -> StatusCode {
        match self {
            VotingError::NotFound(_) => StatusCode::NOT_FOUND,
            VotingError::Validation(_)
            | VotingError::ElectionInactive
            | VotingError::AlreadyVoted
            | VotingError::InvalidCandidate => StatusCode::BAD_REQUEST,
            VotingError::Payload(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(json!({ "message": self.to_string() }))
    }
}
