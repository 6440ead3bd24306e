//! Application setup and server configuration.

use axum::{
    extract::Extension,
    http::{header::CONTENT_TYPE, Method},
    routing::{get, patch, post},
    Router,
};
use sqlx::PgPool;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::kernel::ServerDeps;
use crate::server::routes::{
    conversations, counsellors, health_handler, matching, notifications, profiles, stream_handler,
};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub deps: ServerDeps,
}

/// Build the Axum application router
pub fn build_app(pool: PgPool) -> Router {
    let state = AppState {
        deps: ServerDeps::from_pool(pool),
    };

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE])
        .allow_origin(Any);

    Router::new()
        .route("/health", get(health_handler))
        // Profile store
        .route("/api/profiles", post(profiles::create_profile))
        .route(
            "/api/profiles/:id",
            get(profiles::get_profile)
                .patch(profiles::update_profile)
                .delete(profiles::deactivate_profile),
        )
        .route(
            "/api/profiles/:id/eligibility",
            get(profiles::profile_eligibility),
        )
        .route("/api/patients", get(profiles::list_patients))
        // Counsellor registry
        .route("/api/counsellors", post(counsellors::register_counsellor))
        .route("/api/counsellors/candidates", get(counsellors::list_candidates))
        .route("/api/counsellors/:id", get(counsellors::get_counsellor))
        .route(
            "/api/counsellors/:id/status",
            patch(counsellors::update_counsellor_status),
        )
        .route(
            "/api/counsellors/:id/availability",
            patch(counsellors::set_counsellor_availability),
        )
        // Matching and assignment lifecycle
        .route("/api/matches", post(matching::create_match))
        .route("/api/assignments/:id/complete", post(matching::complete))
        .route("/api/assignments/:id/cancel", post(matching::cancel))
        .route(
            "/api/patients/:id/assignments",
            get(matching::patient_assignments),
        )
        // Conversations and messages
        .route(
            "/api/profiles/:id/conversations",
            get(conversations::list_conversations),
        )
        .route(
            "/api/conversations/:id/messages",
            get(conversations::list_messages).post(conversations::post_message),
        )
        .route(
            "/api/conversations/:id/read",
            post(conversations::mark_read),
        )
        // Notifications
        .route(
            "/api/profiles/:id/notifications",
            get(notifications::list_notifications),
        )
        .route(
            "/api/profiles/:id/notifications/unread",
            get(notifications::unread_count),
        )
        .route(
            "/api/notifications/:id/read",
            post(notifications::mark_notification_read),
        )
        // Real-time streaming
        .route("/api/streams/:topic", get(stream_handler))
        .layer(Extension(state))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
