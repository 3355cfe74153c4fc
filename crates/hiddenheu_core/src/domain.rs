//! crates/hiddenheu_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any storage backend or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;

/// The set of languages the voice guide and translator support.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Hindi,
    Tamil,
    Bengali,
    Gujarati,
    Marathi,
}

impl Language {
    /// The ISO 639-1 code passed to the translation backend.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Hindi => "hi",
            Language::Tamil => "ta",
            Language::Bengali => "bn",
            Language::Gujarati => "gu",
            Language::Marathi => "mr",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "english",
            Language::Hindi => "hindi",
            Language::Tamil => "tamil",
            Language::Bengali => "bengali",
            Language::Gujarati => "gujarati",
            Language::Marathi => "marathi",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Language {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "english" => Ok(Language::English),
            "hindi" => Ok(Language::Hindi),
            "tamil" => Ok(Language::Tamil),
            "bengali" => Ok(Language::Bengali),
            "gujarati" => Ok(Language::Gujarati),
            "marathi" => Ok(Language::Marathi),
            _ => Err(()),
        }
    }
}

// Represents a registered user - used throughout the app.
// `password` holds the argon2 hash, never the plaintext.
#[derive(Debug, Clone)]
pub struct User {
    pub id: i32,
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: Option<String>,
    pub profile_picture: Option<String>,
    pub preferred_language: Language,
    pub created_at: DateTime<Utc>,
}

/// A city users can browse places in. `rating` is on a 0-50 scale
/// (one implied decimal, so 45 renders as 4.5).
#[derive(Debug, Clone)]
pub struct City {
    pub id: i32,
    pub name: String,
    pub state: String,
    pub description: String,
    pub image_url: Option<String>,
    pub rating: i32,
    pub latitude: String,
    pub longitude: String,
}

/// A browsing category (food, nature, historical, ...). `icon` and
/// `color_class` are symbolic names interpreted by the client.
#[derive(Debug, Clone)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color_class: Option<String>,
}

/// A hidden-gem destination inside a city. `review_count` is derived:
/// it is incremented once per created review, never recomputed.
#[derive(Debug, Clone)]
pub struct Place {
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

/// A user's review of a place. `rating` is 1-5.
#[derive(Debug, Clone)]
pub struct Review {
    pub id: i32,
    pub user_id: i32,
    pub place_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Standalone marketing content shown on the home page. No foreign keys.
#[derive(Debug, Clone)]
pub struct Testimonial {
    pub id: i32,
    pub name: String,
    pub location: String,
    pub comment: String,
    pub rating: i32,
    pub avatar_initials: Option<String>,
}

/// A user-to-place bookmark relation. At most one row per
/// (user_id, place_id) pair is expected; callers pre-check via
/// `is_favorite` before adding.
#[derive(Debug, Clone)]
pub struct Favorite {
    pub id: i32,
    pub user_id: i32,
    pub place_id: i32,
    pub created_at: DateTime<Utc>,
}

// Represents a browser login session (auth cookie).
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub token: String,
    pub user_id: i32,
    pub expires_at: DateTime<Utc>,
}

//=========================================================================================
// Insert Types
//=========================================================================================

/// Fields supplied by the caller when creating a user; the store assigns
/// id, created_at and a null profile picture.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub password: String,
    pub email: String,
    pub full_name: Option<String>,
    pub preferred_language: Language,
}

#[derive(Debug, Clone)]
pub struct NewCity {
    pub name: String,
    pub state: String,
    pub description: String,
    pub image_url: Option<String>,
    pub rating: i32,
    pub latitude: String,
    pub longitude: String,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
    pub icon: String,
    pub color_class: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewPlace {
    pub name: String,
    pub description: String,
    pub address: String,
    pub city_id: i32,
    pub category_id: i32,
    pub image_url: Option<String>,
    pub latitude: String,
    pub longitude: String,
    pub rating: i32,
    pub is_featured: bool,
    pub tags: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct NewReview {
    pub user_id: i32,
    pub place_id: i32,
    pub rating: i32,
    pub comment: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewTestimonial {
    pub name: String,
    pub location: String,
    pub comment: String,
    pub rating: i32,
    pub avatar_initials: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NewFavorite {
    pub user_id: i32,
    pub place_id: i32,
}
