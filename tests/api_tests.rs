use std::sync::Arc;

use rocket::{
    http::{ContentType, Header, Status},
    local::asynchronous::Client,
};
use serde_json::{json, Value};

use fitzone::{
    database::memory::MemoryStore,
    feed::{ScheduleFeed, ScheduleSource},
    server,
    util::config::ServerSettings,
    App,
};

const SCHEDULE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/data/schedule.json");
const MATCH: &str = "2099_08_17T14_00_00Z_Arsenal_FC_vs_Wolverhampton_Wanderers_FC";

async fn client() -> Client {
    let feed = ScheduleFeed::new(ScheduleSource::File(SCHEDULE.to_string()));
    let app = App::with_store(Arc::new(MemoryStore::new()), feed);

    Client::tracked(server::build(app, &ServerSettings::default()))
        .await
        .unwrap()
}

fn user() -> Header<'static> {
    Header::new("X-Fitzone-User", "user-1")
}

async fn body_json(response: rocket::local::asynchronous::LocalResponse<'_>) -> Value {
    serde_json::from_str(&response.into_string().await.unwrap()).unwrap()
}

#[rocket::async_test]
async fn requests_without_a_user_are_refused() {
    let client = client().await;

    let response = client.get("/preferences").dispatch().await;
    assert_eq!(response.status(), Status::Unauthorized);

    let response = client
        .get("/preferences")
        .header(Header::new("X-Fitzone-User", "a/b"))
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
}

#[rocket::async_test]
async fn catalog_lists_both_leagues() {
    let client = client().await;

    let response = client.get("/catalog").dispatch().await;
    assert_eq!(response.status(), Status::Ok);
    assert_eq!(
        response.headers().get_one("Access-Control-Allow-Origin"),
        Some("*")
    );

    let body = body_json(response).await;
    assert_eq!(body[0]["league"], "Premier League");
    assert_eq!(body[1]["teams"].as_array().map(Vec::len), Some(32));
}

#[rocket::async_test]
async fn schedule_without_preferences_is_a_precondition_failure() {
    let client = client().await;

    let response = client.get("/schedule").header(user()).dispatch().await;
    assert_eq!(response.status(), Status::PreconditionFailed);
    assert_eq!(body_json(response).await["retryable"], false);
}

#[rocket::async_test]
async fn drill_flow_reports_the_persisted_percent() {
    let client = client().await;

    let response = client
        .put("/preferences")
        .header(user())
        .header(ContentType::JSON)
        .body(json!({"favoriteLeague": "Premier League", "favoriteTeam": "Arsenal"}).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);

    let response = client
        .post(format!("/matches/{}/drills", MATCH))
        .header(user())
        .header(ContentType::JSON)
        .body(json!({"type": "Push-ups", "targetReps": 4}).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let added = body_json(response).await;
    assert_eq!(added["percent"], 0.0);
    let drill_id = added["drillId"].as_str().unwrap().to_string();

    let response = client
        .post(format!("/matches/{}/drills/{}/reps?delta=3", MATCH, drill_id))
        .header(user())
        .dispatch()
        .await;
    assert_eq!(body_json(response).await["percent"], 75.0);

    let response = client
        .get(format!("/matches/{}/progress", MATCH))
        .header(user())
        .dispatch()
        .await;
    assert_eq!(body_json(response).await["percent"], 75.0);

    let response = client
        .get("/schedule?filter=home")
        .header(user())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::Ok);
    let view = body_json(response).await;
    assert_eq!(view["upcoming"][0]["id"], MATCH);
    assert_eq!(view["upcoming"][0]["progress"], 75.0);

    let response = client
        .delete(format!("/matches/{}/drills/{}", MATCH, drill_id))
        .header(user())
        .dispatch()
        .await;
    assert_eq!(body_json(response).await["percent"], 0.0);
}

#[rocket::async_test]
async fn invalid_input_maps_to_bad_request() {
    let client = client().await;

    let response = client
        .post(format!("/matches/{}/drills", MATCH))
        .header(user())
        .header(ContentType::JSON)
        .body(json!({"type": "Push-ups", "targetReps": 0}).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    let response = client
        .get("/schedule?filter=neutral")
        .header(user())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);

    let response = client
        .patch(format!("/matches/{}/drills/drill_missing", MATCH))
        .header(user())
        .header(ContentType::JSON)
        .body(json!({"completedReps": 1}).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::NotFound);
}

#[rocket::async_test]
async fn malformed_bodies_get_a_json_error() {
    let client = client().await;

    let response = client
        .post(format!("/matches/{}/drills", MATCH))
        .header(user())
        .header(ContentType::JSON)
        .body(r#"{"type": "Push-ups", "targetReps": "#)
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("malformed body"));
    assert_eq!(body["retryable"], false);

    let response = client
        .put("/preferences")
        .header(user())
        .header(ContentType::JSON)
        .body(json!({"favoriteLeague": 3}).to_string())
        .dispatch()
        .await;
    assert_eq!(response.status(), Status::BadRequest);
    assert!(body_json(response).await["error"].is_string());
}
