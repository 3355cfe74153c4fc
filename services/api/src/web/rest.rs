//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the public catalog endpoints (cities,
//! categories, places, reviews, testimonials), the favorites endpoints,
//! the translation endpoint, and the master definition for the OpenAPI
//! specification.

use crate::web::middleware::CurrentUser;
use crate::web::state::AppState;
use axum::{
    extract::{FromRequestParts, Path, Query, State},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Json},
    Extension,
};
use chrono::{DateTime, Utc};
use hiddenheu_core::domain::{
    Category, City, Favorite, Language, NewFavorite, NewReview, Place, Review, Testimonial,
};
use hiddenheu_core::ports::PortError;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::error;
use utoipa::{OpenApi, ToSchema};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::register_handler,
        crate::web::auth::login_handler,
        crate::web::auth::logout_handler,
        crate::web::auth::me_handler,
        list_cities_handler,
        get_city_handler,
        list_categories_handler,
        list_places_handler,
        featured_places_handler,
        get_place_handler,
        list_reviews_handler,
        create_review_handler,
        list_testimonials_handler,
        list_favorites_handler,
        add_favorite_handler,
        remove_favorite_handler,
        check_favorite_handler,
        translate_handler,
    ),
    components(
        schemas(
            crate::web::auth::RegisterRequest,
            crate::web::auth::LoginRequest,
            UserPayload,
            CityPayload,
            CategoryPayload,
            PlacePayload,
            ReviewPayload,
            TestimonialPayload,
            FavoritePayload,
            CreateReviewRequest,
            AddFavoriteRequest,
            TranslateRequest,
            ApiMessage,
        )
    ),
    tags(
        (name = "HiddenHeu API", description = "API endpoints for discovering hidden travel gems across Indian cities.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Error Body and Helpers
//=========================================================================================

/// The JSON error envelope used by every endpoint.
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiMessage {
    pub message: String,
}

/// The standard error reply shape: a status code plus `{"message": ...}`.
pub type ApiFailure = (StatusCode, Json<ApiMessage>);

pub fn fail(status: StatusCode, message: impl Into<String>) -> ApiFailure {
    (
        status,
        Json(ApiMessage {
            message: message.into(),
        }),
    )
}

/// Maps a store error to a 500 reply, logging the original.
pub fn store_error(e: PortError) -> ApiFailure {
    error!("Store operation failed: {:?}", e);
    fail(StatusCode::INTERNAL_SERVER_ERROR, "Server error")
}

/// `Path` whose rejection is wrapped in the JSON error envelope, so a
/// non-numeric id yields `{"message": ...}` like every other error reply.
pub struct ApiPath<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiFailure;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(fail(rejection.status(), rejection.body_text())),
        }
    }
}

/// `Query` with the same envelope-wrapping rejection as `ApiPath`.
pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiFailure;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(fail(rejection.status(), rejection.body_text())),
        }
    }
}

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// A user as serialized on the wire. The password hash never leaves the
/// server.
#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserPayload {
    pub id: i32,
    pub username: String,
    pub email: String,
    pub full_name: Option<String>,
    pub profile_picture: Option<String>,
    pub preferred_language: String,
    pub created_at: DateTime<Utc>,
}

impl From<hiddenheu_core::domain::User> for UserPayload {
    fn from(user: hiddenheu_core::domain::User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            full_name: user.full_name,
            profile_picture: user.profile_picture,
            preferred_language: user.preferred_language.name().to_string(),
            created_at: user.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CityPayload {
    pub id: i32,
    pub name: String,
    pub state: String,
    pub description: String,
    pub image_url: Option<String>,
    pub rating: i32,
    pub latitude: String,
    pub longitude: String,
}

impl From<City> for CityPayload {
    fn from(city: City) -> Self {
        Self {
            id: city.id,
            name: city.name,
            state: city.state,
            description: city.description,
            image_url: city.image_url,
            rating: city.rating,
            latitude: city.latitude,
            longitude: city.longitude,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPayload {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color_class: Option<String>,
}

impl From<Category> for CategoryPayload {
    fn from(category: Category) -> Self {
        Self {
            id: category.id,
            name: category.name,
            description: category.description,
            icon: category.icon,
            color_class: category.color_class,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlacePayload {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub address: String,
    pub city_id: i32,
    pub category_id: i32,
    pub image_url: Option<String>,
    pub latitude: String,
    pub longitude: String,
    pub rating: i32,
    pub review_count: i32,
    pub is_featured: bool,
    pub tags: Vec<String>,
}

impl From<Place> for PlacePayload {
    fn from(place: Place) -> Self {
        Self {
            id: place.id,
            name: place.name,
            description: place.description,
            address: place.address,
            city_id: place.city_id,
            category_id: place.category_id,
            image_url: place.image_url,
            latitude: place.latitude,
            longitude: place.longitude,
            rating: place.rating,
            review_count: place.review_count,
            is_featured: place.is_featured,
            tags: place.tags,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReviewPayload {
    pub id: i32,
    pub user_id: i32,
    pub place_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Review> for ReviewPayload {
    fn from(review: Review) -> Self {
        Self {
            id: review.id,
            user_id: review.user_id,
            place_id: review.place_id,
            rating: review.rating,
            comment: review.comment,
            created_at: review.created_at,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialPayload {
    pub id: i32,
    pub name: String,
    pub location: String,
    pub comment: String,
    pub rating: i32,
    pub avatar_initials: Option<String>,
}

impl From<Testimonial> for TestimonialPayload {
    fn from(testimonial: Testimonial) -> Self {
        Self {
            id: testimonial.id,
            name: testimonial.name,
            location: testimonial.location,
            comment: testimonial.comment,
            rating: testimonial.rating,
            avatar_initials: testimonial.avatar_initials,
        }
    }
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FavoritePayload {
    pub id: i32,
    pub user_id: i32,
    pub place_id: i32,
    pub created_at: DateTime<Utc>,
}

impl From<Favorite> for FavoritePayload {
    fn from(favorite: Favorite) -> Self {
        Self {
            id: favorite.id,
            user_id: favorite.user_id,
            place_id: favorite.place_id,
            created_at: favorite.created_at,
        }
    }
}

/// Query-string filters for the places listing.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaceFilter {
    pub city_id: Option<i32>,
    pub category_id: Option<i32>,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateReviewRequest {
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddFavoriteRequest {
    pub place_id: i32,
}

#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TranslateRequest {
    pub text: String,
    pub target_language: String,
}

//=========================================================================================
// City and Category Handlers
//=========================================================================================

/// GET /api/cities - List all cities
#[utoipa::path(
    get,
    path = "/api/cities",
    responses(
        (status = 200, description = "All cities in insertion order")
    )
)]
pub async fn list_cities_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiFailure> {
    let cities = state.store.get_cities().await.map_err(store_error)?;
    let cities: Vec<CityPayload> = cities.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "cities": cities })))
}

/// GET /api/cities/{id} - Get a single city
#[utoipa::path(
    get,
    path = "/api/cities/{id}",
    params(("id" = i32, Path, description = "City id")),
    responses(
        (status = 200, description = "The city", body = CityPayload),
        (status = 404, description = "City not found", body = ApiMessage)
    )
)]
pub async fn get_city_handler(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiFailure> {
    let city = state
        .store
        .get_city(id)
        .await
        .map_err(store_error)?
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "City not found"))?;
    Ok(Json(json!({ "city": CityPayload::from(city) })))
}

/// GET /api/categories - List all categories
#[utoipa::path(
    get,
    path = "/api/categories",
    responses(
        (status = 200, description = "All categories")
    )
)]
pub async fn list_categories_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiFailure> {
    let categories = state.store.get_categories().await.map_err(store_error)?;
    let categories: Vec<CategoryPayload> = categories.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "categories": categories })))
}

//=========================================================================================
// Place Handlers
//=========================================================================================

/// GET /api/places - List places, optionally filtered by city and/or category
#[utoipa::path(
    get,
    path = "/api/places",
    params(
        ("cityId" = Option<i32>, Query, description = "Only places in this city"),
        ("categoryId" = Option<i32>, Query, description = "Only places in this category")
    ),
    responses(
        (status = 200, description = "Matching places")
    )
)]
pub async fn list_places_handler(
    State(state): State<Arc<AppState>>,
    ApiQuery(filter): ApiQuery<PlaceFilter>,
) -> Result<impl IntoResponse, ApiFailure> {
    let places = match (filter.city_id, filter.category_id) {
        (Some(city_id), Some(category_id)) => state
            .store
            .get_places_by_city_and_category(city_id, category_id)
            .await,
        (Some(city_id), None) => state.store.get_places_by_city(city_id).await,
        (None, Some(category_id)) => state.store.get_places_by_category(category_id).await,
        (None, None) => state.store.get_places().await,
    }
    .map_err(store_error)?;

    let places: Vec<PlacePayload> = places.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "places": places })))
}

/// GET /api/places/featured - List featured places
#[utoipa::path(
    get,
    path = "/api/places/featured",
    responses(
        (status = 200, description = "Places flagged for promotional display")
    )
)]
pub async fn featured_places_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiFailure> {
    let places = state
        .store
        .get_featured_places()
        .await
        .map_err(store_error)?;
    let places: Vec<PlacePayload> = places.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "places": places })))
}

/// GET /api/places/{id} - Get a single place
#[utoipa::path(
    get,
    path = "/api/places/{id}",
    params(("id" = i32, Path, description = "Place id")),
    responses(
        (status = 200, description = "The place", body = PlacePayload),
        (status = 404, description = "Place not found", body = ApiMessage)
    )
)]
pub async fn get_place_handler(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiFailure> {
    let place = state
        .store
        .get_place(id)
        .await
        .map_err(store_error)?
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Place not found"))?;
    Ok(Json(json!({ "place": PlacePayload::from(place) })))
}

//=========================================================================================
// Review Handlers
//=========================================================================================

/// GET /api/places/{id}/reviews - List reviews for a place
#[utoipa::path(
    get,
    path = "/api/places/{id}/reviews",
    params(("id" = i32, Path, description = "Place id")),
    responses(
        (status = 200, description = "Reviews for the place")
    )
)]
pub async fn list_reviews_handler(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiFailure> {
    let reviews = state.store.get_reviews(id).await.map_err(store_error)?;
    let reviews: Vec<ReviewPayload> = reviews.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "reviews": reviews })))
}

/// POST /api/places/{id}/reviews - Create a review for a place
#[utoipa::path(
    post,
    path = "/api/places/{id}/reviews",
    params(("id" = i32, Path, description = "Place id")),
    request_body = CreateReviewRequest,
    responses(
        (status = 201, description = "Review created", body = ReviewPayload),
        (status = 400, description = "Invalid rating", body = ApiMessage),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Place not found", body = ApiMessage)
    )
)]
pub async fn create_review_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    ApiPath(id): ApiPath<i32>,
    Json(req): Json<CreateReviewRequest>,
) -> Result<impl IntoResponse, ApiFailure> {
    state
        .store
        .get_place(id)
        .await
        .map_err(store_error)?
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Place not found"))?;

    if !(1..=5).contains(&req.rating) {
        return Err(fail(
            StatusCode::BAD_REQUEST,
            "Rating must be between 1 and 5",
        ));
    }

    let review = state
        .store
        .create_review(NewReview {
            user_id,
            place_id: id,
            rating: req.rating,
            comment: req.comment,
        })
        .await
        .map_err(store_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "review": ReviewPayload::from(review) })),
    ))
}

//=========================================================================================
// Testimonial Handler
//=========================================================================================

/// GET /api/testimonials - List all testimonials
#[utoipa::path(
    get,
    path = "/api/testimonials",
    responses(
        (status = 200, description = "All testimonials")
    )
)]
pub async fn list_testimonials_handler(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiFailure> {
    let testimonials = state.store.get_testimonials().await.map_err(store_error)?;
    let testimonials: Vec<TestimonialPayload> = testimonials.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "testimonials": testimonials })))
}

//=========================================================================================
// Favorite Handlers
//=========================================================================================

/// GET /api/favorites - List the current user's favorite places
#[utoipa::path(
    get,
    path = "/api/favorites",
    responses(
        (status = 200, description = "The user's favorited places"),
        (status = 401, description = "Authentication required")
    )
)]
pub async fn list_favorites_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
) -> Result<impl IntoResponse, ApiFailure> {
    let favorites = state
        .store
        .get_user_favorites(user_id)
        .await
        .map_err(store_error)?;
    let favorites: Vec<PlacePayload> = favorites.into_iter().map(Into::into).collect();
    Ok(Json(json!({ "favorites": favorites })))
}

/// POST /api/favorites - Favorite a place for the current user
#[utoipa::path(
    post,
    path = "/api/favorites",
    request_body = AddFavoriteRequest,
    responses(
        (status = 201, description = "Favorite created", body = FavoritePayload),
        (status = 400, description = "Already favorited", body = ApiMessage),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Place not found", body = ApiMessage)
    )
)]
pub async fn add_favorite_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    Json(req): Json<AddFavoriteRequest>,
) -> Result<impl IntoResponse, ApiFailure> {
    let place = state
        .store
        .get_place(req.place_id)
        .await
        .map_err(store_error)?
        .ok_or_else(|| fail(StatusCode::NOT_FOUND, "Place not found"))?;

    // The store itself does not enforce pair uniqueness; this pre-check
    // keeps duplicates out under sequential calls.
    if state
        .store
        .is_favorite(user_id, place.id)
        .await
        .map_err(store_error)?
    {
        return Err(fail(
            StatusCode::BAD_REQUEST,
            "Place is already in favorites",
        ));
    }

    let favorite = state
        .store
        .add_favorite(NewFavorite {
            user_id,
            place_id: place.id,
        })
        .await
        .map_err(store_error)?;

    Ok((
        StatusCode::CREATED,
        Json(json!({ "success": true, "favorite": FavoritePayload::from(favorite) })),
    ))
}

/// DELETE /api/favorites/{placeId} - Remove a favorite
#[utoipa::path(
    delete,
    path = "/api/favorites/{place_id}",
    params(("place_id" = i32, Path, description = "Place id")),
    responses(
        (status = 200, description = "Favorite removed"),
        (status = 401, description = "Authentication required"),
        (status = 404, description = "Favorite not found", body = ApiMessage)
    )
)]
pub async fn remove_favorite_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    ApiPath(place_id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiFailure> {
    let removed = state
        .store
        .remove_favorite(user_id, place_id)
        .await
        .map_err(store_error)?;

    if !removed {
        return Err(fail(StatusCode::NOT_FOUND, "Favorite not found"));
    }

    Ok(Json(json!({ "success": true })))
}

/// GET /api/favorites/{placeId} - Check whether a place is favorited
#[utoipa::path(
    get,
    path = "/api/favorites/{place_id}",
    params(("place_id" = i32, Path, description = "Place id")),
    responses(
        (status = 200, description = "Whether the place is favorited"),
        (status = 401, description = "Authentication required")
    )
)]
pub async fn check_favorite_handler(
    State(state): State<Arc<AppState>>,
    Extension(CurrentUser(user_id)): Extension<CurrentUser>,
    ApiPath(place_id): ApiPath<i32>,
) -> Result<impl IntoResponse, ApiFailure> {
    let is_favorite = state
        .store
        .is_favorite(user_id, place_id)
        .await
        .map_err(store_error)?;
    Ok(Json(json!({ "isFavorite": is_favorite })))
}

//=========================================================================================
// Translation Handler
//=========================================================================================

/// POST /api/translate - Translate text into one of the supported languages
#[utoipa::path(
    post,
    path = "/api/translate",
    request_body = TranslateRequest,
    responses(
        (status = 200, description = "Translated text"),
        (status = 400, description = "Unknown target language", body = ApiMessage),
        (status = 503, description = "Translation is not configured", body = ApiMessage)
    )
)]
pub async fn translate_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<TranslateRequest>,
) -> Result<impl IntoResponse, ApiFailure> {
    let target: Language = req.target_language.parse().map_err(|_| {
        fail(
            StatusCode::BAD_REQUEST,
            format!("Unsupported language: {}", req.target_language),
        )
    })?;

    let translator = state.translator.as_ref().ok_or_else(|| {
        fail(
            StatusCode::SERVICE_UNAVAILABLE,
            "Translation is not configured",
        )
    })?;

    let translated = translator.translate(&req.text, target).await.map_err(|e| {
        error!("Translation failed: {:?}", e);
        fail(StatusCode::INTERNAL_SERVER_ERROR, "Translation failed")
    })?;

    Ok(Json(json!({ "translatedText": translated })))
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MemStorage;
    use crate::config::Config;
    use axum::{body::Body, routing::get, Router};
    use tower::ServiceExt;

    fn test_state() -> Arc<AppState> {
        let config = Config {
            bind_address: "127.0.0.1:0".parse().unwrap(),
            log_level: tracing::Level::INFO,
            allowed_origin: "http://localhost:5173".to_string(),
            session_ttl_days: 30,
            openai_api_key: None,
            translate_model: "gpt-4o".to_string(),
            translation_cache_ttl: std::time::Duration::from_secs(3600),
            translation_cache_capacity: 256,
        };
        Arc::new(AppState {
            store: Arc::new(MemStorage::new()),
            config: Arc::new(config),
            translator: None,
        })
    }

    #[tokio::test]
    async fn second_favorite_of_same_place_is_rejected() {
        let state = test_state();
        let response = add_favorite_handler(
            State(state.clone()),
            Extension(CurrentUser(1)),
            Json(AddFavoriteRequest { place_id: 1 }),
        )
        .await
        .unwrap()
        .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let err = add_favorite_handler(
            State(state),
            Extension(CurrentUser(1)),
            Json(AddFavoriteRequest { place_id: 1 }),
        )
        .await
        .err()
        .unwrap();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert_eq!(err.1.message, "Place is already in favorites");
    }

    #[tokio::test]
    async fn favoriting_unknown_place_is_not_found() {
        let state = test_state();
        let err = add_favorite_handler(
            State(state),
            Extension(CurrentUser(1)),
            Json(AddFavoriteRequest { place_id: 999 }),
        )
        .await
        .err()
        .unwrap();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
        assert_eq!(err.1.message, "Place not found");
    }

    #[tokio::test]
    async fn review_rating_outside_range_is_rejected() {
        let state = test_state();
        for rating in [0, 6] {
            let err = create_review_handler(
                State(state.clone()),
                Extension(CurrentUser(1)),
                ApiPath(1),
                Json(CreateReviewRequest {
                    rating,
                    comment: None,
                }),
            )
            .await
            .err()
            .unwrap();
            assert_eq!(err.0, StatusCode::BAD_REQUEST);
            assert_eq!(err.1.message, "Rating must be between 1 and 5");
        }

        let response = create_review_handler(
            State(state),
            Extension(CurrentUser(1)),
            ApiPath(1),
            Json(CreateReviewRequest {
                rating: 5,
                comment: Some("Lovely spot".to_string()),
            }),
        )
        .await
        .unwrap()
        .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn reviewing_unknown_place_is_not_found() {
        let state = test_state();
        let err = create_review_handler(
            State(state),
            Extension(CurrentUser(1)),
            ApiPath(999),
            Json(CreateReviewRequest {
                rating: 4,
                comment: None,
            }),
        )
        .await
        .err()
        .unwrap();
        assert_eq!(err.0, StatusCode::NOT_FOUND);
        assert_eq!(err.1.message, "Place not found");
    }

    #[tokio::test]
    async fn non_numeric_city_id_yields_json_message_body() {
        let state = test_state();
        let app = Router::new()
            .route("/api/cities/{id}", get(get_city_handler))
            .with_state(state);

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/cities/abc")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["message"].is_string());
    }

    #[tokio::test]
    async fn malformed_place_filter_is_wrapped_in_message_envelope() {
        let request = axum::http::Request::builder()
            .uri("/api/places?cityId=abc")
            .body(())
            .unwrap();
        let (mut parts, _) = request.into_parts();

        let err = ApiQuery::<PlaceFilter>::from_request_parts(&mut parts, &())
            .await
            .err()
            .unwrap();
        assert_eq!(err.0, StatusCode::BAD_REQUEST);
        assert!(!err.1.message.is_empty());
    }
}
