use crate::api::{docs, handlers};
use crate::auth::require_api_key;
use crate::AppState;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Largest accepted request body.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Every route the server exposes, with request tracing, response
/// compression and a request body limit.
///
/// `/health`, the trip generation status, the runtime-style agent
/// entrypoint and the OpenAPI document are public; everything else needs
/// the shared API key.
pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/health", get(handlers::health::health))
        .route(
            "/api/generate-trip",
            get(handlers::health::generate_trip_status),
        )
        .route(
            "/agents/{agent}/invocations",
            post(handlers::invocations::invoke_agent),
        )
        .route("/api-docs/openapi.json", get(docs::openapi_json));

    let protected_routes = Router::new()
        .route("/api/generate-trip", post(handlers::trips::generate_trip))
        .route("/api/agents", get(handlers::agents::list_agents))
        .route("/api/wizard", post(handlers::wizard::create_session))
        .route("/api/wizard/{id}", get(handlers::wizard::get_session))
        .route(
            "/api/wizard/{id}/dates",
            post(handlers::wizard::submit_dates),
        )
        .route(
            "/api/wizard/{id}/travelers",
            post(handlers::wizard::submit_travelers),
        )
        .route(
            "/api/wizard/{id}/hotels",
            post(handlers::wizard::submit_hotels),
        )
        .route(
            "/api/wizard/{id}/budget",
            post(handlers::wizard::submit_budget),
        )
        .route(
            "/api/wizard/{id}/generate",
            post(handlers::wizard::generate),
        )
        .route("/api/wizard/{id}/back", post(handlers::wizard::back))
        .route("/api/wizard/{id}/reset", post(handlers::wizard::reset))
        .route("/api/wizard/{id}/select", post(handlers::wizard::select))
        .route(
            "/api/wizard/{id}/booking",
            post(handlers::wizard::confirm_booking),
        )
        .layer(middleware::from_fn_with_state(
            state.config_manager.clone(),
            require_api_key,
        ));

    let router = public_routes.merge(protected_routes);

    #[cfg(feature = "swagger-ui")]
    let router = router.merge(
        utoipa_swagger_ui::SwaggerUi::new("/swagger-ui")
            .url("/swagger-ui/openapi.json", <docs::ApiDoc as utoipa::OpenApi>::openapi()),
    );

    router
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new())
                .layer(RequestBodyLimitLayer::new(MAX_BODY_BYTES)),
        )
        .with_state(state)
}
