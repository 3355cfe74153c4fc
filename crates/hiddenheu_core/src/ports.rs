//! crates/hiddenheu_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like storage backends
//! or translation providers.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    Category, City, Favorite, Language, NewCategory, NewCity, NewFavorite, NewPlace, NewReview,
    NewTestimonial, NewUser, Place, Review, Testimonial, User,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., storage, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
    #[error("Unauthorized")]
    Unauthorized,
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

/// The storage contract the HTTP layer is written against.
///
/// The store is deliberately "dumb": lookups on missing ids resolve to
/// `Ok(None)` (or an empty vec), never an error, and creates always
/// succeed. Policy decisions - username/email uniqueness, favorite
/// duplicate checks, authentication - belong to the calling layer.
#[async_trait]
pub trait StorageService: Send + Sync {
    // --- User Methods ---
    async fn get_user(&self, id: i32) -> PortResult<Option<User>>;

    /// Case-insensitive exact match; the first created user wins when
    /// duplicates exist (which the calling layer is expected to prevent).
    async fn get_user_by_username(&self, username: &str) -> PortResult<Option<User>>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<Option<User>>;

    /// Assigns id and created_at. Does NOT enforce uniqueness; callers
    /// must pre-check via the lookup methods above.
    async fn create_user(&self, user: NewUser) -> PortResult<User>;

    // --- City Methods ---
    async fn get_cities(&self) -> PortResult<Vec<City>>;
    async fn get_city(&self, id: i32) -> PortResult<Option<City>>;
    async fn get_city_by_name(&self, name: &str) -> PortResult<Option<City>>;
    async fn create_city(&self, city: NewCity) -> PortResult<City>;

    // --- Category Methods ---
    async fn get_categories(&self) -> PortResult<Vec<Category>>;
    async fn get_category(&self, id: i32) -> PortResult<Option<Category>>;
    async fn create_category(&self, category: NewCategory) -> PortResult<Category>;

    // --- Place Methods ---
    async fn get_places(&self) -> PortResult<Vec<Place>>;
    async fn get_places_by_city(&self, city_id: i32) -> PortResult<Vec<Place>>;
    async fn get_places_by_category(&self, category_id: i32) -> PortResult<Vec<Place>>;

    /// Logical AND: places matching both the city and the category.
    async fn get_places_by_city_and_category(
        &self,
        city_id: i32,
        category_id: i32,
    ) -> PortResult<Vec<Place>>;

    async fn get_featured_places(&self) -> PortResult<Vec<Place>>;
    async fn get_place(&self, id: i32) -> PortResult<Option<Place>>;

    /// Initializes review_count to 0.
    async fn create_place(&self, place: NewPlace) -> PortResult<Place>;

    // --- Review Methods ---
    async fn get_reviews(&self, place_id: i32) -> PortResult<Vec<Review>>;

    /// Assigns id and created_at, then increments the referenced place's
    /// review_count by 1 as a side effect. The increment silently no-ops
    /// when the place does not exist.
    async fn create_review(&self, review: NewReview) -> PortResult<Review>;

    // --- Testimonial Methods ---
    async fn get_testimonials(&self) -> PortResult<Vec<Testimonial>>;
    async fn create_testimonial(&self, testimonial: NewTestimonial) -> PortResult<Testimonial>;

    // --- Favorite Methods ---
    /// Resolves each of the user's favorites to its place, silently
    /// dropping any favorite whose place no longer resolves.
    async fn get_user_favorites(&self, user_id: i32) -> PortResult<Vec<Place>>;

    /// Assigns id and created_at. Does NOT check pair uniqueness; callers
    /// pre-check via `is_favorite`.
    async fn add_favorite(&self, favorite: NewFavorite) -> PortResult<Favorite>;

    /// Removes the favorite for the pair, returning whether one existed.
    async fn remove_favorite(&self, user_id: i32, place_id: i32) -> PortResult<bool>;

    async fn is_favorite(&self, user_id: i32, place_id: i32) -> PortResult<bool>;

    // --- Auth Session Methods ---
    async fn create_auth_session(
        &self,
        token: &str,
        user_id: i32,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Resolves a session token to its user id. Expired tokens resolve
    /// to `None` and are removed.
    async fn validate_auth_session(&self, token: &str) -> PortResult<Option<i32>>;

    async fn delete_auth_session(&self, token: &str) -> PortResult<()>;
}

#[async_trait]
pub trait TranslationService: Send + Sync {
    /// Translates `text` into the target language, preserving tone and
    /// meaning. English targets with plain-ASCII input pass through
    /// unchanged.
    async fn translate(&self, text: &str, target: Language) -> PortResult<String>;
}
