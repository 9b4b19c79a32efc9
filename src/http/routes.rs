//! HTTP route definitions

use axum::{
    extract::{Path, State},
    http::{header, Method, StatusCode},
    middleware,
    response::{IntoResponse, Json, Redirect},
    routing::{get, post},
    Router,
};
use axum_extra::extract::Form;
use serde::Serialize;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::{debug, info};

use crate::app::AppState;
use crate::game::{GameError, PlayerId};
use crate::http::forms::{CodeForm, CreateForm, JoinForm, KickForm, StartRoundForm};
use crate::http::middleware::limit_entry;
use crate::http::views::{host_view, player_view, HostView, PlayerView};
use crate::util::time::uptime_secs;

/// Build the application router
pub fn build_router(state: AppState) -> Router {
    // Routes that let anyone allocate sessions or roster slots
    let entry_routes = Router::new()
        .route("/create", post(create_handler))
        .route("/join", post(join_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), limit_entry));

    let host_routes = Router::new()
        .route("/kick", post(kick_handler))
        .route("/startRound", post(start_round_handler))
        .route("/newRound", post(new_round_handler))
        .route("/endGame", post(end_game_handler));

    let view_routes = Router::new()
        .route("/health", get(health_handler))
        .route("/host/:code", get(host_view_handler))
        .route("/game/:code/player/:player_id", get(player_view_handler));

    let mut router = Router::new()
        .merge(entry_routes)
        .merge(host_routes)
        .merge(view_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http());

    // CORS configuration - support multiple origins (comma-separated in CLIENT_ORIGIN)
    if let Some(origins) = &state.config.client_origin {
        let allowed_origins: Vec<header::HeaderValue> = origins
            .split(',')
            .filter_map(|s| s.trim().parse::<header::HeaderValue>().ok())
            .collect();

        router = router.layer(
            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        );
    }

    router.with_state(state)
}

fn host_location(code: &str) -> Redirect {
    Redirect::to(&format!("/host/{code}"))
}

// ============================================================================
// Health endpoint
// ============================================================================

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    uptime_secs: u64,
    active_sessions: usize,
    active_players: usize,
}

async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        uptime_secs: uptime_secs(),
        active_sessions: state.registry.active_sessions(),
        active_players: state.registry.total_players(),
    })
}

// ============================================================================
// Session and roster endpoints
// ============================================================================

async fn create_handler(
    State(state): State<AppState>,
    Form(form): Form<CreateForm>,
) -> Result<Redirect, AppError> {
    let options = form.into_options()?;
    let session = state.registry.create(options, &mut rand::thread_rng())?;
    let code = session.lock().code.clone();

    Ok(host_location(&code))
}

async fn join_handler(
    State(state): State<AppState>,
    Form(form): Form<JoinForm>,
) -> Result<Redirect, AppError> {
    let name = form.display_name()?;
    let session = state.registry.lookup(&form.code)?;

    let (code, player_id) = {
        let mut session = session.lock();
        let player_id = session.join(name, &mut rand::thread_rng())?;
        (session.code.clone(), player_id)
    };

    info!(code = %code, player_id = %player_id, "Player joined");
    Ok(Redirect::to(&format!("/game/{code}/player/{player_id}")))
}

async fn kick_handler(
    State(state): State<AppState>,
    Form(form): Form<KickForm>,
) -> Result<Redirect, AppError> {
    let session = state.registry.lookup(&form.code)?;
    let mut session = session.lock();

    if let Some(player) = session.kick(&PlayerId::from(form.player_id))? {
        info!(code = %session.code, player_id = %player.id, "Player kicked");
    }

    Ok(host_location(&session.code))
}

// ============================================================================
// Round endpoints
// ============================================================================

async fn start_round_handler(
    State(state): State<AppState>,
    Form(form): Form<StartRoundForm>,
) -> Result<Redirect, AppError> {
    let params = form.round_params();
    let session = state.registry.lookup(&form.code)?;
    let mut session = session.lock();

    session.start_round(params, state.words.as_ref(), &mut rand::thread_rng())?;

    info!(
        code = %session.code,
        players = session.players.len(),
        chameleons = session.chameleons().count(),
        "Round started"
    );
    Ok(host_location(&session.code))
}

async fn new_round_handler(
    State(state): State<AppState>,
    Form(form): Form<CodeForm>,
) -> Result<Redirect, AppError> {
    let session = state.registry.lookup(&form.code)?;
    let mut session = session.lock();

    session.new_round();

    debug!(code = %session.code, "Back to lobby");
    Ok(host_location(&session.code))
}

#[derive(Serialize)]
struct EndGameResponse {
    code: String,
    ended: bool,
    message: String,
}

async fn end_game_handler(
    State(state): State<AppState>,
    Form(form): Form<CodeForm>,
) -> Json<EndGameResponse> {
    let code = crate::game::code::normalize_code(&form.code);
    let ended = state.registry.remove(&code).is_some();

    Json(EndGameResponse {
        message: format!("Game {code} has been ended."),
        code,
        ended,
    })
}

// ============================================================================
// View endpoints
// ============================================================================

async fn host_view_handler(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<HostView>, AppError> {
    let session = state.registry.lookup(&code)?;
    let mut session = session.lock();
    session.touch();

    Ok(Json(host_view(&session)))
}

async fn player_view_handler(
    State(state): State<AppState>,
    Path((code, player_id)): Path<(String, String)>,
) -> Result<Json<PlayerView>, AppError> {
    let session = state.registry.lookup(&code)?;
    let mut session = session.lock();
    session.touch();

    Ok(Json(player_view(&session, &PlayerId::from(player_id))?))
}

// ============================================================================
// Error handling
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Game(#[from] GameError),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Too many requests, slow down")]
    RateLimited,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, kind) = match &self {
            AppError::Game(err) => {
                let status = match err {
                    GameError::SessionNotFound(_) | GameError::PlayerNotFound { .. } => {
                        StatusCode::NOT_FOUND
                    }
                    GameError::RosterFull { .. } | GameError::RoundInProgress => {
                        StatusCode::CONFLICT
                    }
                    GameError::ProtectedHost => StatusCode::FORBIDDEN,
                    GameError::NoPlayers | GameError::MissingSecret => StatusCode::BAD_REQUEST,
                    GameError::CapacityExhausted => StatusCode::SERVICE_UNAVAILABLE,
                };
                (status, err.kind())
            }
            AppError::BadRequest(_) => (StatusCode::BAD_REQUEST, "bad_request"),
            AppError::RateLimited => (StatusCode::TOO_MANY_REQUESTS, "rate_limited"),
        };

        let body = serde_json::json!({
            "error": self.to_string(),
            "kind": kind,
        });

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::words::WordBank;
    use axum::body::Body;
    use axum::http::{Request, Response};
    use http_body_util::BodyExt;
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_app_with(config: Config) -> (Router, AppState) {
        let words = WordBank::from_json(r#"{"Pets": ["Cat"]}"#).unwrap();
        let state = AppState::new(config, Arc::new(words));
        (build_router(state.clone()), state)
    }

    fn test_app() -> (Router, AppState) {
        test_app_with(Config::default())
    }

    fn post_form(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::builder()
            .method(Method::GET)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    fn location(res: &Response<Body>) -> String {
        res.headers()
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
            .unwrap()
            .to_string()
    }

    async fn json_body(res: Response<Body>) -> serde_json::Value {
        let bytes = res.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn send(app: &Router, req: Request<Body>) -> Response<Body> {
        app.clone().oneshot(req).await.unwrap()
    }

    /// Create a session and return its code
    async fn create(app: &Router, body: &str) -> String {
        let res = send(app, post_form("/create", body)).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        location(&res).trim_start_matches("/host/").to_string()
    }

    /// Join a session and return the new player id
    async fn join(app: &Router, code: &str, name: &str) -> String {
        let res = send(app, post_form("/join", &format!("code={code}&name={name}"))).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let loc = location(&res);
        loc.rsplit('/').next().unwrap().to_string()
    }

    #[tokio::test]
    async fn create_redirects_to_host_lobby() {
        let (app, state) = test_app();
        let code = create(&app, "hostName=Hana").await;
        assert_eq!(code.len(), 4);
        assert!(state.registry.contains(&code));

        let res = send(&app, get(&format!("/host/{code}"))).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = json_body(res).await;
        assert_eq!(body["phase"], "lobby");
        assert_eq!(body["host_name"], "Hana");
        assert_eq!(body["players"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn mango_round_lifecycle() {
        let (app, _) = test_app();
        let code = create(&app, "hostName=Hana").await;
        let a = join(&app, &code, "A").await;
        let b = join(&app, &code, "B").await;
        let _c = join(&app, &code, "C").await;

        let res = send(
            &app,
            post_form(
                "/startRound",
                &format!("code={code}&category=Fruit&secret=Mango&chameleon={b}"),
            ),
        )
        .await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&res), format!("/host/{code}"));

        let host = json_body(send(&app, get(&format!("/host/{code}"))).await).await;
        assert_eq!(host["phase"], "active");
        assert_eq!(host["category"], "Fruit");
        assert_eq!(host["role"]["secret"], "Mango");
        assert_eq!(host["role"]["chameleons"], serde_json::json!(["B"]));

        let view_b = json_body(send(&app, get(&format!("/game/{code}/player/{b}"))).await).await;
        assert_eq!(view_b["role"]["kind"], "chameleon");
        assert!(!view_b.to_string().contains("Mango"));

        let view_a = json_body(send(&app, get(&format!("/game/{code}/player/{a}"))).await).await;
        assert_eq!(view_a["role"]["secret"], "Mango");

        let res = send(&app, post_form("/newRound", &format!("code={code}"))).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        let host = json_body(send(&app, get(&format!("/host/{code}"))).await).await;
        assert_eq!(host["phase"], "lobby");
        assert_eq!(host["players"].as_array().unwrap().len(), 3);

        let res = send(&app, post_form("/endGame", &format!("code={code}"))).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res).await["ended"], true);

        let res = send(&app, get(&format!("/host/{code}"))).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(res).await["kind"], "not_found");
    }

    #[tokio::test]
    async fn codes_are_case_insensitive() {
        let (app, _) = test_app();
        let code = create(&app, "hostName=Hana").await;
        let id = join(&app, &code.to_lowercase(), "A").await;

        let res = send(&app, get(&format!("/game/{}/player/{id}", code.to_lowercase()))).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(json_body(res).await["phase"], "lobby");
    }

    #[tokio::test]
    async fn join_unknown_code_is_not_found() {
        let (app, _) = test_app();
        let res = send(&app, post_form("/join", "code=ZZZZ&name=A")).await;
        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn join_during_round_conflicts() {
        let (app, _) = test_app();
        let code = create(&app, "hostName=Hana&useRandomSecret=true").await;
        join(&app, &code, "A").await;
        let res = send(&app, post_form("/startRound", &format!("code={code}"))).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);

        let res = send(&app, post_form("/join", &format!("code={code}&name=Late"))).await;
        assert_eq!(res.status(), StatusCode::CONFLICT);
        assert_eq!(json_body(res).await["kind"], "round_in_progress");
    }

    #[tokio::test]
    async fn start_round_without_players_is_rejected() {
        let (app, _) = test_app();
        let code = create(&app, "hostName=Hana").await;
        let res = send(
            &app,
            post_form("/startRound", &format!("code={code}&category=Fruit&secret=Mango")),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(res).await["kind"], "no_players");
    }

    #[tokio::test]
    async fn start_round_without_secret_is_rejected() {
        let (app, _) = test_app();
        let code = create(&app, "hostName=Hana").await;
        join(&app, &code, "A").await;
        let res = send(
            &app,
            post_form("/startRound", &format!("code={code}&category=Fruit&secret=")),
        )
        .await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(res).await["kind"], "missing_secret");
    }

    #[tokio::test]
    async fn random_count_and_repeated_chameleon_keys() {
        let (app, state) = test_app();
        let code = create(&app, "hostName=Hana").await;
        let ids: Vec<String> = [
            join(&app, &code, "A").await,
            join(&app, &code, "B").await,
            join(&app, &code, "C").await,
            join(&app, &code, "D").await,
        ]
        .into();

        let body = format!(
            "code={code}&category=Fruit&secret=Mango&chameleon={}&chameleon={}",
            ids[0], ids[1]
        );
        send(&app, post_form("/startRound", &body)).await;
        assert_eq!(
            state.registry.lookup(&code).unwrap().lock().chameleons().count(),
            2
        );

        send(&app, post_form("/newRound", &format!("code={code}"))).await;
        let body = format!("code={code}&category=Fruit&secret=Mango&randomCount=10");
        send(&app, post_form("/startRound", &body)).await;
        assert_eq!(
            state.registry.lookup(&code).unwrap().lock().chameleons().count(),
            3
        );
    }

    #[tokio::test]
    async fn participating_host_cannot_be_kicked() {
        let (app, state) = test_app();
        let code = create(&app, "hostName=Hana&randomChameleon=true").await;
        let host_id = state
            .registry
            .lookup(&code)
            .unwrap()
            .lock()
            .host_player_id
            .clone()
            .unwrap();

        let res = send(&app, post_form("/kick", &format!("code={code}&playerId={host_id}"))).await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
        assert_eq!(json_body(res).await["kind"], "protected_host");

        let guest = join(&app, &code, "A").await;
        let res = send(&app, post_form("/kick", &format!("code={code}&playerId={guest}"))).await;
        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(state.registry.total_players(), 1);
    }

    #[tokio::test]
    async fn blank_host_name_is_bad_request() {
        let (app, state) = test_app();
        let res = send(&app, post_form("/create", "hostName=%20%20")).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(state.registry.active_sessions(), 0);
    }

    #[tokio::test]
    async fn end_game_on_unknown_code_is_harmless() {
        let (app, _) = test_app();
        let res = send(&app, post_form("/endGame", "code=qqqq")).await;
        assert_eq!(res.status(), StatusCode::OK);
        let body = json_body(res).await;
        assert_eq!(body["ended"], false);
        assert_eq!(body["code"], "QQQQ");
    }

    #[tokio::test]
    async fn entry_routes_are_rate_limited() {
        let config = Config {
            request_rate_limit: 1,
            ..Config::default()
        };
        let (app, _) = test_app_with(config);
        create(&app, "hostName=Hana").await;

        let res = send(&app, post_form("/create", "hostName=Hana")).await;
        assert_eq!(res.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[tokio::test]
    async fn health_reports_sessions() {
        let (app, _) = test_app();
        let code = create(&app, "hostName=Hana").await;
        join(&app, &code, "A").await;

        let body = json_body(send(&app, get("/health")).await).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["active_sessions"], 1);
        assert_eq!(body["active_players"], 1);
    }
}
