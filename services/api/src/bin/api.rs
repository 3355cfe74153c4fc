//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{MemStorage, OpenAiTranslator},
    config::Config,
    error::ApiError,
    web::{
        auth::{login_handler, logout_handler, me_handler, register_handler},
        require_auth,
        rest::{
            add_favorite_handler, check_favorite_handler, create_review_handler,
            featured_places_handler, get_city_handler, get_place_handler, list_categories_handler,
            list_cities_handler, list_favorites_handler, list_places_handler,
            list_reviews_handler, list_testimonials_handler, remove_favorite_handler,
            translate_handler,
        },
        state::AppState,
        ApiDoc,
    },
};
use async_openai::{config::OpenAIConfig, Client};
use axum::{
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        HeaderValue, Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use hiddenheu_core::ports::TranslationService;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Build the In-Memory Store ---
    // All data is volatile; the seed data is regenerated identically on
    // every start.
    let store = Arc::new(MemStorage::new());
    info!("In-memory store seeded with sample data.");

    // --- 3. Initialize the Translation Adapter (Optional) ---
    let translator: Option<Arc<dyn TranslationService>> = match &config.openai_api_key {
        Some(api_key) => {
            let openai_config = OpenAIConfig::new().with_api_key(api_key);
            let client = Client::with_config(openai_config);
            Some(Arc::new(OpenAiTranslator::new(
                client,
                config.translate_model.clone(),
                config.translation_cache_ttl,
                config.translation_cache_capacity,
            )))
        }
        None => {
            warn!("OPENAI_API_KEY not set; POST /api/translate will answer 503.");
            None
        }
    };

    // --- 4. Build the Shared AppState ---
    let app_state = Arc::new(AppState {
        store,
        config: config.clone(),
        translator,
    });

    let allowed_origin = config
        .allowed_origin
        .parse::<HeaderValue>()
        .map_err(|e| ApiError::Internal(format!("Invalid ALLOWED_ORIGIN: {e}")))?;
    let cors = CorsLayer::new()
        .allow_origin(allowed_origin)
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // --- 5. Create the Web Router ---
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler))
        .route("/api/auth/logout", post(logout_handler))
        .route("/api/cities", get(list_cities_handler))
        .route("/api/cities/{id}", get(get_city_handler))
        .route("/api/categories", get(list_categories_handler))
        .route("/api/places", get(list_places_handler))
        .route("/api/places/featured", get(featured_places_handler))
        .route("/api/places/{id}", get(get_place_handler))
        .route("/api/places/{id}/reviews", get(list_reviews_handler))
        .route("/api/testimonials", get(list_testimonials_handler))
        .route("/api/translate", post(translate_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/api/auth/me", get(me_handler))
        .route("/api/places/{id}/reviews", post(create_review_handler))
        .route(
            "/api/favorites",
            get(list_favorites_handler).post(add_favorite_handler),
        )
        .route(
            "/api/favorites/{place_id}",
            get(check_favorite_handler).delete(remove_favorite_handler),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    // Combine API routes
    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(cors)
        .with_state(app_state);

    // Merge the API router with the Swagger UI router for a complete application.
    let app = Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    // --- 6. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
