use rocket::{
    delete,
    fairing::{Fairing, Info, Kind},
    get,
    http::{ContentType, Header, Status},
    options, patch, post, put,
    request::{FromRequest, Outcome},
    routes,
    serde::json::{self, Json},
    Build, Request, Response, Rocket, State,
};
use serde::Serialize;
use serde_derive::Deserialize;
use serde_json::json;

use crate::{
    data_types::{
        drill::{DrillUpdate, NewDrill},
        preferences::{PreferencesUpdate, SPORTS_CATALOG},
    },
    error::{Error, Result},
    processors::schedule::ScheduleFilter,
    session::Session,
    util::config::ServerSettings,
    App,
};

type Reply = (Status, (ContentType, String));

pub struct Cors;

#[rocket::async_trait]
impl Fairing for Cors {
    fn info(&self) -> Info {
        Info {
            name: "Cross-Origin-Resource-Sharing Fairing",
            kind: Kind::Response,
        }
    }

    async fn on_response<'r>(&self, _request: &'r Request<'_>, response: &mut Response<'r>) {
        response.set_header(Header::new("Access-Control-Allow-Origin", "*"));
        response.set_header(Header::new(
            "Access-Control-Allow-Methods",
            "POST, PATCH, PUT, DELETE, HEAD, OPTIONS, GET",
        ));
        response.set_header(Header::new("Access-Control-Allow-Headers", "*"));
        response.set_header(Header::new("Access-Control-Allow-Credentials", "true"));
    }
}

/// Name of the header carrying the signed-in user id.
pub struct UserHeader(pub String);

#[rocket::async_trait]
impl<'r> FromRequest<'r> for Session {
    type Error = Error;

    async fn from_request(request: &'r Request<'_>) -> Outcome<Self, Self::Error> {
        let header = match request.rocket().state::<UserHeader>() {
            Some(header) => header.0.clone(),
            None => ServerSettings::default().user_header,
        };

        match request.headers().get_one(&header) {
            Some(user_id) => match Session::new(user_id) {
                Ok(session) => Outcome::Success(session),
                Err(err) => Outcome::Error((Status::BadRequest, err)),
            },
            None => Outcome::Error((
                Status::Unauthorized,
                Error::invalid(format!("missing {} header", header)),
            )),
        }
    }
}

pub fn error_status(err: &Error) -> Status {
    match err {
        Error::PreferencesMissing => Status::PreconditionFailed,
        Error::InvalidInput(_) => Status::BadRequest,
        Error::NotFound(_) => Status::NotFound,
        Error::Feed(_) => Status::BadGateway,
        Error::Database(_) | Error::Unavailable(_) => Status::ServiceUnavailable,
        Error::Bson(_) | Error::Config(_) => Status::InternalServerError,
    }
}

fn reply<T: Serialize>(result: Result<T>) -> Reply {
    match result {
        Ok(value) => match serde_json::to_string(&value) {
            Ok(body) => (Status::Ok, (ContentType::JSON, body)),
            Err(err) => (Status::InternalServerError, (ContentType::Text, err.to_string())),
        },
        Err(err) => {
            let body = json!({
                "error": err.to_string(),
                "retryable": err.is_retryable(),
            });
            (error_status(&err), (ContentType::JSON, body.to_string()))
        }
    }
}

type Body<'r, T> = std::result::Result<Json<T>, json::Error<'r>>;

/// Unwraps a JSON body, turning an unreadable or malformed one into `InvalidInput`.
fn body<T>(data: Body<'_, T>) -> Result<T> {
    match data {
        Ok(value) => Ok(value.into_inner()),
        Err(json::Error::Io(err)) => Err(Error::invalid(format!("unreadable body: {}", err))),
        Err(json::Error::Parse(_, err)) => Err(Error::invalid(format!("malformed body: {}", err))),
    }
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PreferencesChoice {
    pub favorite_league: String,
    pub favorite_team: String,
}

#[options("/<_..>")]
fn all_options() {
    /* Intentionally left empty */
}

#[get("/catalog")]
fn catalog() -> Reply {
    let leagues: Vec<_> = SPORTS_CATALOG
        .iter()
        .map(|(league, teams)| json!({"league": league, "teams": teams}))
        .collect();

    reply(Ok(leagues))
}

#[get("/schedule?<filter>")]
async fn schedule(app: &State<App>, session: Session, filter: Option<&str>) -> Reply {
    let filter = match filter.map(str::parse::<ScheduleFilter>).transpose() {
        Ok(filter) => filter.unwrap_or_default(),
        Err(err) => return reply::<()>(Err(err)),
    };

    reply(app.schedule(&session, filter).await)
}

#[get("/preferences")]
async fn get_preferences(app: &State<App>, session: Session) -> Reply {
    match app.preferences(&session).await {
        Ok(Some(preferences)) => reply(Ok(preferences)),
        Ok(None) => reply::<()>(Err(Error::PreferencesMissing)),
        Err(err) => reply::<()>(Err(err)),
    }
}

#[put("/preferences", data = "<choice>")]
async fn save_preferences(
    app: &State<App>,
    session: Session,
    choice: Body<'_, PreferencesChoice>,
) -> Reply {
    let choice = match body(choice) {
        Ok(choice) => choice,
        Err(err) => return reply::<()>(Err(err)),
    };

    reply(
        app.save_preferences(&session, &choice.favorite_league, &choice.favorite_team)
            .await,
    )
}

#[patch("/preferences", data = "<update>")]
async fn update_preferences(
    app: &State<App>,
    session: Session,
    update: Body<'_, PreferencesUpdate>,
) -> Reply {
    match body(update) {
        Ok(update) => reply(app.update_preferences(&session, &update).await),
        Err(err) => reply::<()>(Err(err)),
    }
}

#[delete("/preferences")]
async fn delete_preferences(app: &State<App>, session: Session) -> Reply {
    reply(
        app.delete_preferences(&session)
            .await
            .map(|deleted| json!({ "deleted": deleted })),
    )
}

#[get("/matches")]
async fn match_records(app: &State<App>, session: Session) -> Reply {
    reply(app.match_records(&session).await)
}

#[get("/matches/<match_id>/drills")]
async fn list_drills(app: &State<App>, session: Session, match_id: &str) -> Reply {
    reply(app.list_drills(&session, match_id).await)
}

#[post("/matches/<match_id>/drills", data = "<drill>")]
async fn add_drill(
    app: &State<App>,
    session: Session,
    match_id: &str,
    drill: Body<'_, NewDrill>,
) -> Reply {
    match body(drill) {
        Ok(drill) => reply(app.add_drill(&session, match_id, &drill).await),
        Err(err) => reply::<()>(Err(err)),
    }
}

#[post("/matches/<match_id>/drills/generate")]
async fn generate_training(app: &State<App>, session: Session, match_id: &str) -> Reply {
    reply(app.generate_training(&session, match_id).await)
}

#[patch("/matches/<match_id>/drills/<drill_id>", data = "<update>")]
async fn update_drill(
    app: &State<App>,
    session: Session,
    match_id: &str,
    drill_id: &str,
    update: Body<'_, DrillUpdate>,
) -> Reply {
    match body(update) {
        Ok(update) => reply(app.update_drill(&session, match_id, drill_id, &update).await),
        Err(err) => reply::<()>(Err(err)),
    }
}

#[post("/matches/<match_id>/drills/<drill_id>/reps?<delta>")]
async fn adjust_reps(
    app: &State<App>,
    session: Session,
    match_id: &str,
    drill_id: &str,
    delta: i64,
) -> Reply {
    reply(app.adjust_reps(&session, match_id, drill_id, delta).await)
}

#[delete("/matches/<match_id>/drills/<drill_id>")]
async fn delete_drill(
    app: &State<App>,
    session: Session,
    match_id: &str,
    drill_id: &str,
) -> Reply {
    reply(app.delete_drill(&session, match_id, drill_id).await)
}

#[get("/matches/<match_id>/progress")]
async fn match_progress(app: &State<App>, session: Session, match_id: &str) -> Reply {
    reply(
        app.match_progress(&session, match_id)
            .await
            .map(|percent| json!({ "matchId": match_id, "percent": percent })),
    )
}

#[get("/matches/<match_id>/stats")]
async fn match_stats(app: &State<App>, session: Session, match_id: &str) -> Reply {
    reply(app.match_stats(&session, match_id).await)
}

#[post("/maintenance/cleanup?<days>")]
async fn cleanup(app: &State<App>, session: Session, days: Option<i64>) -> Reply {
    reply(
        app.cleanup_old_matches(&session, days)
            .await
            .map(|deleted| json!({ "deleted": deleted })),
    )
}

pub fn build(app: App, settings: &ServerSettings) -> Rocket<Build> {
    rocket::build()
        .attach(Cors)
        .manage(app)
        .manage(UserHeader(settings.user_header.clone()))
        .mount(
            "/",
            routes![
                all_options,
                catalog,
                schedule,
                get_preferences,
                save_preferences,
                update_preferences,
                delete_preferences,
                match_records,
                list_drills,
                add_drill,
                generate_training,
                update_drill,
                adjust_reps,
                delete_drill,
                match_progress,
                match_stats,
                cleanup
            ],
        )
}
