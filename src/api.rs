use actix_web::error::{JsonPayloadError, PathError};
use actix_web::{web, HttpRequest, HttpResponse};
use serde_json::json;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::errors::VotingError;
use crate::models::{CastVote, NewElection};
use crate::service::VotingService;

/// Shared across workers. The mutex is held for a whole request, which keeps
/// chain appends strictly one at a time.
pub struct AppState {
    pub service: Mutex<VotingService>,
}

impl AppState {
    pub fn new(service: VotingService) -> Self {
        AppState {
            service: Mutex::new(service),
        }
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .route("/", web::get().to(index))
        .service(
            web::scope("/api/elections")
                .route("", web::post().to(create_election))
                .route("", web::get().to(list_elections))
                .route("/{id}", web::get().to(get_election))
                .route("/{id}/activate", web::put().to(activate_election))
                .route("/{id}/deactivate", web::put().to(deactivate_election)),
        )
        .service(
            web::scope("/api/votes")
                .route("", web::post().to(cast_vote))
                .route("/history", web::get().to(get_history))
                .route("/results/{election_id}", web::get().to(get_results))
                .route("/verify/{vote_id}", web::get().to(verify_vote))
                .route("/blockchain/{election_id}", web::get().to(chain_verification)),
        );
}

// Extractor failures go through `VotingError` so every error body is `{"message"}`.
fn json_error(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    VotingError::Validation(format!("Invalid request body: {}", err)).into()
}

// Only ids appear in paths; one that does not parse names nothing that exists.
fn path_error(_err: PathError, req: &HttpRequest) -> actix_web::Error {
    let resource = if req.path().starts_with("/api/votes/verify/") {
        "Vote"
    } else {
        "Election"
    };
    VotingError::NotFound(resource).into()
}

async fn index() -> HttpResponse {
    HttpResponse::Ok().json(json!({ "message": "Blockchain Voting System API" }))
}

async fn create_election(
    data: web::Data<AppState>,
    body: web::Json<NewElection>,
) -> Result<HttpResponse, VotingError> {
    let election = data.service.lock().await.create_election(body.into_inner())?;
    Ok(HttpResponse::Created().json(json!({
        "message": "Election created successfully",
        "election": election,
    })))
}

async fn list_elections(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(data.service.lock().await.elections())
}

async fn get_election(
    data: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, VotingError> {
    let election = data.service.lock().await.election(&id)?;
    Ok(HttpResponse::Ok().json(election))
}

async fn activate_election(
    data: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, VotingError> {
    let election = data.service.lock().await.activate_election(&id)?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Election activated successfully",
        "election": election,
    })))
}

async fn deactivate_election(
    data: web::Data<AppState>,
    id: web::Path<Uuid>,
) -> Result<HttpResponse, VotingError> {
    let election = data.service.lock().await.deactivate_election(&id)?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Election deactivated successfully",
        "election": election,
    })))
}

async fn cast_vote(
    data: web::Data<AppState>,
    vote: web::Json<CastVote>,
) -> Result<HttpResponse, VotingError> {
    let record = data.service.lock().await.cast_vote(vote.into_inner())?;
    Ok(HttpResponse::Created().json(json!({
        "message": "Vote cast successfully",
        "vote": {
            "id": record.id,
            "electionId": record.election_id,
            "candidate": record.candidate,
            "timestamp": record.timestamp,
            "blockchainHash": record.blockchain_hash,
        },
    })))
}

async fn get_results(
    data: web::Data<AppState>,
    election_id: web::Path<Uuid>,
) -> Result<HttpResponse, VotingError> {
    let results = data.service.lock().await.results(&election_id)?;
    Ok(HttpResponse::Ok().json(results))
}

async fn verify_vote(
    data: web::Data<AppState>,
    vote_id: web::Path<Uuid>,
) -> Result<HttpResponse, VotingError> {
    let verification = data.service.lock().await.verify_vote(&vote_id)?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Vote verification details",
        "voteId": verification.vote_id,
        "blockchainHash": verification.blockchain_hash,
        "isVerified": verification.is_verified,
        "blockData": verification.block_data,
    })))
}

async fn chain_verification(
    data: web::Data<AppState>,
    election_id: web::Path<Uuid>,
) -> Result<HttpResponse, VotingError> {
    let report = data.service.lock().await.chain_verification(&election_id)?;
    Ok(HttpResponse::Ok().json(json!({
        "message": "Blockchain verification details",
        "electionId": report.election_id,
        "blockchainVotes": report.blockchain_votes,
        "isChainValid": report.is_chain_valid,
        "recordedVotes": report.recorded_votes,
        "unanchoredVotes": report.unanchored_votes,
    })))
}

async fn get_history(data: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(data.service.lock().await.history())
}
