use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use vote_ledger::api::{self, AppState};
use vote_ledger::VotingService;

async fn app() -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(AppState::new(VotingService::in_memory())))
            .configure(api::configure),
    )
    .await
}

fn election_body(candidates: &[&str]) -> Value {
    json!({
        "title": "Test Election",
        "description": "A test election",
        "startDate": (Utc::now() - Duration::days(1)).to_rfc3339(),
        "endDate": (Utc::now() + Duration::days(1)).to_rfc3339(),
        "candidates": candidates,
    })
}

async fn send<S>(app: &S, req: test::TestRequest) -> (StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let resp = test::call_service(app, req.to_request()).await;
    let status = resp.status();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

async fn open_election<S>(app: &S) -> String
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let (status, body) = send(
        app,
        test::TestRequest::post()
            .uri("/api/elections")
            .set_json(election_body(&["Candidate 1", "Candidate 2", "Candidate 3"])),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["election"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        app,
        test::TestRequest::put().uri(&format!("/api/elections/{}/activate", id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["election"]["isActive"], true);
    id
}

fn vote(election_id: &str, voter: &str, candidate: &str) -> test::TestRequest {
    test::TestRequest::post().uri("/api/votes").set_json(json!({
        "electionId": election_id,
        "voterId": voter,
        "candidate": candidate,
    }))
}

#[actix_web::test]
async fn index_message() {
    let app = app().await;
    let (status, body) = send(&app, test::TestRequest::get().uri("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Blockchain Voting System API");
}

#[actix_web::test]
async fn election_lifecycle() {
    let app = app().await;
    let id = open_election(&app).await;

    let (status, body) = send(&app, test::TestRequest::get().uri("/api/elections")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);

    let (status, body) = send(
        &app,
        test::TestRequest::get().uri(&format!("/api/elections/{}", id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["title"], "Test Election");
    assert_eq!(body["voteCount"]["Candidate 2"], 0);

    let (status, body) = send(
        &app,
        test::TestRequest::put().uri(&format!("/api/elections/{}/deactivate", id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["election"]["isActive"], false);
    assert_eq!(body["election"]["isCompleted"], true);
}

#[actix_web::test]
async fn create_election_rejects_single_candidate() {
    let app = app().await;
    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/elections")
            .set_json(election_body(&["Only One"])),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("at least 2 candidates"));
}

#[actix_web::test]
async fn create_election_rejects_missing_fields() {
    let app = app().await;
    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/elections")
            .set_json(json!({ "title": "No dates" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Title, description, start date, end date, and at least 2 candidates are required"
    );
}

#[actix_web::test]
async fn malformed_bodies_get_json_errors() {
    let app = app().await;
    let mut bad_date = election_body(&["A", "B"]);
    bad_date["startDate"] = json!("yesterday-ish");
    let (status, body) = send(
        &app,
        test::TestRequest::post().uri("/api/elections").set_json(bad_date),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().starts_with("Invalid request body"));

    let (status, body) = send(
        &app,
        test::TestRequest::post()
            .uri("/api/votes")
            .set_json(json!({ "candidate": "A" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].is_string());
}

#[actix_web::test]
async fn non_uuid_ids_are_json_404s() {
    let app = app().await;
    open_election(&app).await;

    let (status, body) = send(&app, vote("not-a-uuid", "voter-1", "Candidate 1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Election not found");

    for uri in [
        "/api/elections/not-a-uuid",
        "/api/votes/results/not-a-uuid",
        "/api/votes/blockchain/not-a-uuid",
    ] {
        let (status, body) = send(&app, test::TestRequest::get().uri(uri)).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{}", uri);
        assert_eq!(body["message"], "Election not found", "{}", uri);
    }

    let (status, body) = send(
        &app,
        test::TestRequest::put().uri("/api/elections/not-a-uuid/activate"),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Election not found");

    let (status, body) = send(&app, test::TestRequest::get().uri("/api/votes/verify/not-a-uuid")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Vote not found");
}

#[actix_web::test]
async fn unknown_election_is_404() {
    let app = app().await;
    let missing = uuid::Uuid::new_v4();
    let (status, body) = send(
        &app,
        test::TestRequest::get().uri(&format!("/api/elections/{}", missing)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Election not found");
}

#[actix_web::test]
async fn cast_vote_and_read_results() {
    let app = app().await;
    let id = open_election(&app).await;

    let (status, body) = send(&app, vote(&id, "voter-1", "Candidate 1")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["vote"]["candidate"], "Candidate 1");
    assert_eq!(body["vote"]["blockchainHash"].as_str().unwrap().len(), 64);

    let (status, body) = send(
        &app,
        test::TestRequest::get().uri(&format!("/api/votes/results/{}", id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["results"]["Candidate 1"], 1);
    assert_eq!(body["totalVotes"], 1);
}

#[actix_web::test]
async fn vote_rejections() {
    let app = app().await;
    let id = open_election(&app).await;
    send(&app, vote(&id, "voter-1", "Candidate 1")).await;

    let (status, body) = send(&app, vote(&id, "voter-1", "Candidate 2")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "You have already voted in this election");

    let (status, body) = send(&app, vote(&id, "   ", "Candidate 1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Voter id is required");

    let (status, body) = send(&app, vote(&id, "voter-2", "Nobody")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid candidate");

    let missing = uuid::Uuid::new_v4().to_string();
    let (status, _) = send(&app, vote(&missing, "voter-2", "Candidate 1")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    send(
        &app,
        test::TestRequest::put().uri(&format!("/api/elections/{}/deactivate", id)),
    )
    .await;
    let (status, body) = send(&app, vote(&id, "voter-2", "Candidate 1")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Election is not active");
}

#[actix_web::test]
async fn verify_vote_and_chain() {
    let app = app().await;
    let id = open_election(&app).await;
    let (_, cast) = send(&app, vote(&id, "voter-1", "Candidate 3")).await;
    send(&app, vote(&id, "voter-2", "Candidate 1")).await;
    let vote_id = cast["vote"]["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        test::TestRequest::get().uri(&format!("/api/votes/verify/{}", vote_id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isVerified"], true);
    assert_eq!(body["blockchainHash"], cast["vote"]["blockchainHash"]);
    assert_eq!(body["blockData"]["candidate"], "Candidate 3");
    assert_eq!(body["blockData"]["voterId"], "voter-1");

    let (status, body) = send(
        &app,
        test::TestRequest::get().uri(&format!("/api/votes/blockchain/{}", id)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["blockchainVotes"], 2);
    assert_eq!(body["isChainValid"], true);
    assert_eq!(body["recordedVotes"], 2);
    assert_eq!(body["unanchoredVotes"], 0);

    let missing = uuid::Uuid::new_v4();
    let (status, body) = send(
        &app,
        test::TestRequest::get().uri(&format!("/api/votes/verify/{}", missing)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Vote not found");
}

#[actix_web::test]
async fn history_lists_vote_blocks() {
    let app = app().await;
    let id = open_election(&app).await;
    send(&app, vote(&id, "voter-1", "Candidate 1")).await;
    send(&app, vote(&id, "voter-2", "Candidate 2")).await;

    let (status, body) = send(&app, test::TestRequest::get().uri("/api/votes/history")).await;
    assert_eq!(status, StatusCode::OK);
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["index"], 1);
    assert_eq!(entries[0]["voterId"], "voter-1");
    assert_eq!(entries[1]["candidate"], "Candidate 2");
    assert_eq!(entries[1]["electionId"], id);
}
