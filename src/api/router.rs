use std::time::Duration;

use axum::{
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use super::state::AppState;
use super::{challenges, hack_challenges, hacks, health, team_entries, teams, users};

/// Create the router with application state
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_check))
        .route("/teams", post(teams::create_team).get(teams::list_teams))
        .route("/teams/{team_id}", get(teams::get_team))
        .route(
            "/teams/{team_id}/entries",
            get(team_entries::get_team_entries)
                .post(team_entries::add_team_entries)
                .delete(team_entries::delete_team_entries),
        )
        .route("/hacks", post(hacks::create_hack).get(hacks::list_hacks))
        .route(
            "/hacks/{hack_id}",
            get(hacks::get_hack).delete(hacks::delete_hack),
        )
        .route(
            "/hacks/{hack_id}/challenges",
            post(hack_challenges::add_hack_challenges)
                .delete(hack_challenges::delete_hack_challenges),
        )
        .route(
            "/challenges",
            post(challenges::create_challenge).get(challenges::list_challenges),
        )
        .route("/challenges/{challenge_id}", get(challenges::get_challenge))
        .route("/users/{user_id}", get(users::get_user))
        .with_state(state)
        .layer(cors_layer())
        .layer(TraceLayer::new_for_http())
}

fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            header::IF_NONE_MATCH,
        ])
        .expose_headers([header::WWW_AUTHENTICATE])
        .max_age(Duration::from_secs(86400))
}
