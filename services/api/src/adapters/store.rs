//! services/api/src/adapters/store.rs
//!
//! This module contains the in-memory storage adapter, which is the concrete
//! implementation of the `StorageService` port from the `core` crate. All data
//! lives for the process lifetime; nothing is persisted and the seed data is
//! regenerated identically on every start.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hiddenheu_core::domain::{
    AuthSession, Category, City, Favorite, NewCategory, NewCity, NewFavorite, NewPlace, NewReview,
    NewTestimonial, NewUser, Place, Review, Testimonial, User,
};
use hiddenheu_core::ports::{PortError, PortResult, StorageService};
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An in-memory storage adapter that implements the `StorageService` port.
///
/// The axum server handles requests on multiple threads, so the whole
/// store sits behind a single `RwLock`: the id counters and the
/// secondary indices are shared mutable state that must move together.
pub struct MemStorage {
    inner: RwLock<StoreInner>,
}

impl MemStorage {
    /// Creates a store pre-populated with the sample cities, categories,
    /// places and testimonials.
    pub fn new() -> Self {
        let mut inner = StoreInner::empty();
        seed_sample_data(&mut inner);
        Self {
            inner: RwLock::new(inner),
        }
    }

    /// Creates a store with no seed data. Used by tests that need
    /// predictable ids starting at 1.
    pub fn unseeded() -> Self {
        Self {
            inner: RwLock::new(StoreInner::empty()),
        }
    }

    fn read(&self) -> PortResult<std::sync::RwLockReadGuard<'_, StoreInner>> {
        self.inner
            .read()
            .map_err(|e| PortError::Unexpected(format!("store lock poisoned: {e}")))
    }

    fn write(&self) -> PortResult<std::sync::RwLockWriteGuard<'_, StoreInner>> {
        self.inner
            .write()
            .map_err(|e| PortError::Unexpected(format!("store lock poisoned: {e}")))
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================================
// Inner State
//=========================================================================================

/// Primary collections are `BTreeMap`s keyed by id: ids are assigned
/// monotonically, so iteration order equals insertion order, which the
/// list endpoints rely on.
struct StoreInner {
    users: BTreeMap<i32, User>,
    cities: BTreeMap<i32, City>,
    categories: BTreeMap<i32, Category>,
    places: BTreeMap<i32, Place>,
    reviews: BTreeMap<i32, Review>,
    testimonials: BTreeMap<i32, Testimonial>,
    favorites: BTreeMap<i32, Favorite>,
    sessions: HashMap<String, AuthSession>,

    next_user_id: i32,
    next_city_id: i32,
    next_category_id: i32,
    next_place_id: i32,
    next_review_id: i32,
    next_testimonial_id: i32,
    next_favorite_id: i32,

    // Secondary indices, maintained incrementally on insert/delete so the
    // "by city / by category / by user" query families stay O(1) average
    // instead of scanning the full collection.
    places_by_city: HashMap<i32, Vec<i32>>,
    places_by_category: HashMap<i32, Vec<i32>>,
    reviews_by_place: HashMap<i32, Vec<i32>>,
    favorites_by_user: HashMap<i32, Vec<i32>>,
    favorite_by_pair: HashMap<(i32, i32), i32>,
    // Lowercased lookup keys. Only the first writer lands in the index,
    // preserving first-match-wins semantics if a caller ever bypasses the
    // uniqueness pre-checks.
    user_by_username: HashMap<String, i32>,
    user_by_email: HashMap<String, i32>,
    city_by_name: HashMap<String, i32>,
}

impl StoreInner {
    fn empty() -> Self {
        Self {
            users: BTreeMap::new(),
            cities: BTreeMap::new(),
            categories: BTreeMap::new(),
            places: BTreeMap::new(),
            reviews: BTreeMap::new(),
            testimonials: BTreeMap::new(),
            favorites: BTreeMap::new(),
            sessions: HashMap::new(),
            next_user_id: 1,
            next_city_id: 1,
            next_category_id: 1,
            next_place_id: 1,
            next_review_id: 1,
            next_testimonial_id: 1,
            next_favorite_id: 1,
            places_by_city: HashMap::new(),
            places_by_category: HashMap::new(),
            reviews_by_place: HashMap::new(),
            favorites_by_user: HashMap::new(),
            favorite_by_pair: HashMap::new(),
            user_by_username: HashMap::new(),
            user_by_email: HashMap::new(),
            city_by_name: HashMap::new(),
        }
    }

    fn insert_user(&mut self, new: NewUser) -> User {
        let id = self.next_user_id;
        self.next_user_id += 1;
        let user = User {
            id,
            username: new.username,
            password: new.password,
            email: new.email,
            full_name: new.full_name,
            profile_picture: None,
            preferred_language: new.preferred_language,
            created_at: Utc::now(),
        };
        self.user_by_username
            .entry(user.username.to_lowercase())
            .or_insert(id);
        self.user_by_email
            .entry(user.email.to_lowercase())
            .or_insert(id);
        self.users.insert(id, user.clone());
        user
    }

    fn insert_city(&mut self, new: NewCity) -> City {
        let id = self.next_city_id;
        self.next_city_id += 1;
        let city = City {
            id,
            name: new.name,
            state: new.state,
            description: new.description,
            image_url: new.image_url,
            rating: new.rating,
            latitude: new.latitude,
            longitude: new.longitude,
        };
        self.city_by_name
            .entry(city.name.to_lowercase())
            .or_insert(id);
        self.cities.insert(id, city.clone());
        city
    }

    fn insert_category(&mut self, new: NewCategory) -> Category {
        let id = self.next_category_id;
        self.next_category_id += 1;
        let category = Category {
            id,
            name: new.name,
            description: new.description,
            icon: new.icon,
            color_class: new.color_class,
        };
        self.categories.insert(id, category.clone());
        category
    }

    fn insert_place(&mut self, new: NewPlace) -> Place {
        let id = self.next_place_id;
        self.next_place_id += 1;
        let place = Place {
            id,
            name: new.name,
            description: new.description,
            address: new.address,
            city_id: new.city_id,
            category_id: new.category_id,
            image_url: new.image_url,
            latitude: new.latitude,
            longitude: new.longitude,
            rating: new.rating,
            review_count: 0,
            is_featured: new.is_featured,
            tags: new.tags,
        };
        self.places_by_city.entry(place.city_id).or_default().push(id);
        self.places_by_category
            .entry(place.category_id)
            .or_default()
            .push(id);
        self.places.insert(id, place.clone());
        place
    }

    fn insert_review(&mut self, new: NewReview) -> Review {
        let id = self.next_review_id;
        self.next_review_id += 1;
        let review = Review {
            id,
            user_id: new.user_id,
            place_id: new.place_id,
            rating: new.rating,
            comment: new.comment,
            created_at: Utc::now(),
        };
        self.reviews_by_place
            .entry(review.place_id)
            .or_default()
            .push(id);
        self.reviews.insert(id, review.clone());

        // Update the place's derived review count. A review referencing a
        // nonexistent place is still stored; only the increment no-ops.
        if let Some(place) = self.places.get_mut(&review.place_id) {
            place.review_count += 1;
        }

        review
    }

    fn insert_testimonial(&mut self, new: NewTestimonial) -> Testimonial {
        let id = self.next_testimonial_id;
        self.next_testimonial_id += 1;
        let testimonial = Testimonial {
            id,
            name: new.name,
            location: new.location,
            comment: new.comment,
            rating: new.rating,
            avatar_initials: new.avatar_initials,
        };
        self.testimonials.insert(id, testimonial.clone());
        testimonial
    }

    fn insert_favorite(&mut self, new: NewFavorite) -> Favorite {
        let id = self.next_favorite_id;
        self.next_favorite_id += 1;
        let favorite = Favorite {
            id,
            user_id: new.user_id,
            place_id: new.place_id,
            created_at: Utc::now(),
        };
        self.favorites_by_user
            .entry(favorite.user_id)
            .or_default()
            .push(id);
        self.favorite_by_pair
            .entry((favorite.user_id, favorite.place_id))
            .or_insert(id);
        self.favorites.insert(id, favorite.clone());
        favorite
    }

    fn delete_favorite(&mut self, user_id: i32, place_id: i32) -> bool {
        let Some(id) = self.favorite_by_pair.remove(&(user_id, place_id)) else {
            return false;
        };
        self.favorites.remove(&id);
        if let Some(ids) = self.favorites_by_user.get_mut(&user_id) {
            ids.retain(|fid| *fid != id);
        }
        true
    }

    /// Resolves an index entry to places, keeping index order (which is
    /// insertion order).
    fn places_for_ids(&self, ids: Option<&Vec<i32>>) -> Vec<Place> {
        ids.map(|ids| {
            ids.iter()
                .filter_map(|id| self.places.get(id).cloned())
                .collect()
        })
        .unwrap_or_default()
    }
}

//=========================================================================================
// `StorageService` Trait Implementation
//=========================================================================================

#[async_trait]
impl StorageService for MemStorage {
    async fn get_user(&self, id: i32) -> PortResult<Option<User>> {
        Ok(self.read()?.users.get(&id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> PortResult<Option<User>> {
        let inner = self.read()?;
        let id = inner.user_by_username.get(&username.to_lowercase());
        Ok(id.and_then(|id| inner.users.get(id)).cloned())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<Option<User>> {
        let inner = self.read()?;
        let id = inner.user_by_email.get(&email.to_lowercase());
        Ok(id.and_then(|id| inner.users.get(id)).cloned())
    }

    async fn create_user(&self, user: NewUser) -> PortResult<User> {
        Ok(self.write()?.insert_user(user))
    }

    async fn get_cities(&self) -> PortResult<Vec<City>> {
        Ok(self.read()?.cities.values().cloned().collect())
    }

    async fn get_city(&self, id: i32) -> PortResult<Option<City>> {
        Ok(self.read()?.cities.get(&id).cloned())
    }

    async fn get_city_by_name(&self, name: &str) -> PortResult<Option<City>> {
        let inner = self.read()?;
        let id = inner.city_by_name.get(&name.to_lowercase());
        Ok(id.and_then(|id| inner.cities.get(id)).cloned())
    }

    async fn create_city(&self, city: NewCity) -> PortResult<City> {
        Ok(self.write()?.insert_city(city))
    }

    async fn get_categories(&self) -> PortResult<Vec<Category>> {
        Ok(self.read()?.categories.values().cloned().collect())
    }

    async fn get_category(&self, id: i32) -> PortResult<Option<Category>> {
        Ok(self.read()?.categories.get(&id).cloned())
    }

    async fn create_category(&self, category: NewCategory) -> PortResult<Category> {
        Ok(self.write()?.insert_category(category))
    }

    async fn get_places(&self) -> PortResult<Vec<Place>> {
        Ok(self.read()?.places.values().cloned().collect())
    }

    async fn get_places_by_city(&self, city_id: i32) -> PortResult<Vec<Place>> {
        let inner = self.read()?;
        Ok(inner.places_for_ids(inner.places_by_city.get(&city_id)))
    }

    async fn get_places_by_category(&self, category_id: i32) -> PortResult<Vec<Place>> {
        let inner = self.read()?;
        Ok(inner.places_for_ids(inner.places_by_category.get(&category_id)))
    }

    async fn get_places_by_city_and_category(
        &self,
        city_id: i32,
        category_id: i32,
    ) -> PortResult<Vec<Place>> {
        // Walk the city index and filter by category.
        let inner = self.read()?;
        let mut places = inner.places_for_ids(inner.places_by_city.get(&city_id));
        places.retain(|place| place.category_id == category_id);
        Ok(places)
    }

    async fn get_featured_places(&self) -> PortResult<Vec<Place>> {
        Ok(self
            .read()?
            .places
            .values()
            .filter(|place| place.is_featured)
            .cloned()
            .collect())
    }

    async fn get_place(&self, id: i32) -> PortResult<Option<Place>> {
        Ok(self.read()?.places.get(&id).cloned())
    }

    async fn create_place(&self, place: NewPlace) -> PortResult<Place> {
        Ok(self.write()?.insert_place(place))
    }

    async fn get_reviews(&self, place_id: i32) -> PortResult<Vec<Review>> {
        let inner = self.read()?;
        Ok(inner
            .reviews_by_place
            .get(&place_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| inner.reviews.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn create_review(&self, review: NewReview) -> PortResult<Review> {
        Ok(self.write()?.insert_review(review))
    }

    async fn get_testimonials(&self) -> PortResult<Vec<Testimonial>> {
        Ok(self.read()?.testimonials.values().cloned().collect())
    }

    async fn create_testimonial(&self, testimonial: NewTestimonial) -> PortResult<Testimonial> {
        Ok(self.write()?.insert_testimonial(testimonial))
    }

    async fn get_user_favorites(&self, user_id: i32) -> PortResult<Vec<Place>> {
        let inner = self.read()?;
        Ok(inner
            .favorites_by_user
            .get(&user_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| inner.favorites.get(id))
                    // Drop favorites whose place no longer resolves.
                    .filter_map(|favorite| inner.places.get(&favorite.place_id).cloned())
                    .collect()
            })
            .unwrap_or_default())
    }

    async fn add_favorite(&self, favorite: NewFavorite) -> PortResult<Favorite> {
        Ok(self.write()?.insert_favorite(favorite))
    }

    async fn remove_favorite(&self, user_id: i32, place_id: i32) -> PortResult<bool> {
        Ok(self.write()?.delete_favorite(user_id, place_id))
    }

    async fn is_favorite(&self, user_id: i32, place_id: i32) -> PortResult<bool> {
        Ok(self
            .read()?
            .favorite_by_pair
            .contains_key(&(user_id, place_id)))
    }

    async fn create_auth_session(
        &self,
        token: &str,
        user_id: i32,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        self.write()?.sessions.insert(
            token.to_string(),
            AuthSession {
                token: token.to_string(),
                user_id,
                expires_at,
            },
        );
        Ok(())
    }

    async fn validate_auth_session(&self, token: &str) -> PortResult<Option<i32>> {
        let mut inner = self.write()?;
        match inner.sessions.get(token) {
            Some(session) if session.expires_at > Utc::now() => Ok(Some(session.user_id)),
            Some(_) => {
                inner.sessions.remove(token);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    async fn delete_auth_session(&self, token: &str) -> PortResult<()> {
        self.write()?.sessions.remove(token);
        Ok(())
    }
}

//=========================================================================================
// Seed Data
//=========================================================================================

/// Loads the fixed sample data set: 5 categories, 6 cities, 6 places and
/// 3 testimonials. Seeded rows are indistinguishable from user-created
/// rows afterwards.
fn seed_sample_data(inner: &mut StoreInner) {
    let categories = [
        ("Hidden Food Places", "Local eateries & cuisines", "fa-utensils", "amber"),
        ("Local Lifestyle", "Authentic daily experiences", "fa-hands", "green"),
        ("Cultural Clothing", "Traditional attires & crafts", "fa-tshirt", "purple"),
        ("Historical Spots", "Monuments & heritage sites", "fa-monument", "blue"),
        ("Nature Trails", "Scenic routes & landscapes", "fa-tree", "emerald"),
    ];
    for (name, description, icon, color_class) in categories {
        inner.insert_category(NewCategory {
            name: name.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            color_class: Some(color_class.to_string()),
        });
    }

    let cities = [
        (
            "Delhi",
            "Delhi",
            "Discover ancient bazaars, historical monuments, and secret gardens in India's capital city.",
            "https://images.unsplash.com/photo-1587474260584-136574528ed5",
            45,
            "28.6139",
            "77.2090",
        ),
        (
            "Mumbai",
            "Maharashtra",
            "Experience hidden beaches, local eateries, and vibrant street culture in the city of dreams.",
            "https://images.unsplash.com/photo-1570168007204-dfb528c6958f",
            40,
            "19.0760",
            "72.8777",
        ),
        (
            "Jaipur",
            "Rajasthan",
            "Uncover the secrets of the Pink City with hidden palaces, artisan workshops, and royal cuisine.",
            "https://images.unsplash.com/photo-1599661046289-e31897846e41",
            47,
            "26.9124",
            "75.7873",
        ),
        (
            "Bangalore",
            "Karnataka",
            "Explore tech hubs alongside traditional markets and lush gardens in the Silicon Valley of India.",
            "https://images.unsplash.com/photo-1580667309005-9e5cffe54318",
            43,
            "12.9716",
            "77.5946",
        ),
        (
            "Chennai",
            "Tamil Nadu",
            "Discover rich cultural heritage, hidden temples, and authentic South Indian cuisine.",
            "https://images.unsplash.com/photo-1582510003544-4d00b7f74220",
            42,
            "13.0827",
            "80.2707",
        ),
        (
            "Kolkata",
            "West Bengal",
            "Explore colonial architecture, hidden bookstores, and authentic Bengali cuisine in the City of Joy.",
            "https://images.unsplash.com/photo-1558431382-27e303142255",
            41,
            "22.5726",
            "88.3639",
        ),
    ];
    for (name, state, description, image_url, rating, latitude, longitude) in cities {
        inner.insert_city(NewCity {
            name: name.to_string(),
            state: state.to_string(),
            description: description.to_string(),
            image_url: Some(image_url.to_string()),
            rating,
            latitude: latitude.to_string(),
            longitude: longitude.to_string(),
        });
    }

    struct SeedPlace {
        name: &'static str,
        description: &'static str,
        address: &'static str,
        city_id: i32,
        category_id: i32,
        image_url: &'static str,
        latitude: &'static str,
        longitude: &'static str,
        rating: i32,
        is_featured: bool,
        tags: &'static [&'static str],
    }

    let places = [
        SeedPlace {
            name: "Paranthe Wali Gali",
            description: "Experience Delhi's most authentic stuffed bread variations in this hidden lane of Old Delhi.",
            address: "Old Delhi, Delhi",
            city_id: 1,     // Delhi
            category_id: 1, // Food
            image_url: "https://images.unsplash.com/photo-1601050690597-df0568f70950",
            latitude: "28.6562",
            longitude: "77.2410",
            rating: 48,
            is_featured: true,
            tags: &["street food", "breakfast", "local favorite"],
        },
        SeedPlace {
            name: "Rajasthani Heritage Textiles",
            description: "Discover artisanal block printing techniques and handloom fabrics from master craftsmen.",
            address: "Bapu Bazaar, Jaipur",
            city_id: 3,     // Jaipur
            category_id: 3, // Clothing
            image_url: "https://images.unsplash.com/photo-1583391733956-3750e0ff4e8b",
            latitude: "26.9186",
            longitude: "75.8222",
            rating: 40,
            is_featured: true,
            tags: &["handloom", "traditional", "crafts"],
        },
        SeedPlace {
            name: "Jog Falls Hidden Path",
            description: "An off-the-beaten-path trail to witness India's second-highest waterfall from a secluded viewpoint.",
            address: "Shimoga, Karnataka",
            city_id: 4,     // Bangalore (nearest major city)
            category_id: 5, // Nature
            image_url: "https://images.unsplash.com/photo-1598233847491-f16487adee2f",
            latitude: "14.2241",
            longitude: "74.7938",
            rating: 46,
            is_featured: true,
            tags: &["waterfall", "hiking", "scenic"],
        },
        SeedPlace {
            name: "Paigah Tombs",
            description: "A hidden necropolis with exquisite marble inlay work and Indo-Islamic architecture away from tourist crowds.",
            address: "Old City, Hyderabad",
            city_id: 4,     // Bangalore stands in since Hyderabad is not seeded
            category_id: 4, // Historical
            image_url: "https://images.unsplash.com/photo-1524613032530-449a5d94c285",
            latitude: "17.3615",
            longitude: "78.4747",
            rating: 49,
            is_featured: true,
            tags: &["historical", "architecture", "hidden gem"],
        },
        SeedPlace {
            name: "Khari Baoli Spice Market",
            description: "Asia's largest wholesale spice market offering a sensory overload of colors and aromas.",
            address: "Chandni Chowk, Delhi",
            city_id: 1,     // Delhi
            category_id: 2, // Lifestyle
            image_url: "https://images.unsplash.com/photo-1566123628941-963b11f35bdb",
            latitude: "28.6579",
            longitude: "77.2200",
            rating: 44,
            is_featured: false,
            tags: &["market", "spices", "shopping"],
        },
        SeedPlace {
            name: "Dharavi Pottery Colony",
            description: "Meet skilled artisans creating beautiful pottery in the heart of Mumbai's largest informal settlement.",
            address: "Dharavi, Mumbai",
            city_id: 2,     // Mumbai
            category_id: 2, // Lifestyle
            image_url: "https://images.unsplash.com/photo-1604847369696-c361b95e2fac",
            latitude: "19.0399",
            longitude: "72.8476",
            rating: 43,
            is_featured: false,
            tags: &["crafts", "pottery", "local artisans"],
        },
    ];
    for place in places {
        inner.insert_place(NewPlace {
            name: place.name.to_string(),
            description: place.description.to_string(),
            address: place.address.to_string(),
            city_id: place.city_id,
            category_id: place.category_id,
            image_url: Some(place.image_url.to_string()),
            latitude: place.latitude.to_string(),
            longitude: place.longitude.to_string(),
            rating: place.rating,
            is_featured: place.is_featured,
            tags: place.tags.iter().map(|t| t.to_string()).collect(),
        });
    }

    let testimonials = [
        (
            "Rahul P.",
            "Mumbai, Maharashtra",
            "Thanks to HiddenHeu, I discovered an amazing food street in Old Delhi that wasn't on any major travel site. The voice guide feature explained the history of each dish in my language, making it a truly immersive experience.",
            50,
            "RP",
        ),
        (
            "Ananya K.",
            "Bangalore, Karnataka",
            "The hidden nature trail near Munnar that this app recommended was breathtaking! It wasn't crowded like other tourist spots, and we felt like we discovered a secret paradise. The navigation feature made it easy to find.",
            45,
            "AK",
        ),
        (
            "Vikram S.",
            "Delhi, NCR",
            "I visited Jaipur many times but never knew about the traditional textile workshop that HiddenHeu recommended. The artisans showed us ancient block printing techniques, and I bought authentic souvenirs directly from them.",
            50,
            "VS",
        ),
    ];
    for (name, location, comment, rating, avatar_initials) in testimonials {
        inner.insert_testimonial(NewTestimonial {
            name: name.to_string(),
            location: location.to_string(),
            comment: comment.to_string(),
            rating,
            avatar_initials: Some(avatar_initials.to_string()),
        });
    }
}

//=========================================================================================
// Tests
//=========================================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use hiddenheu_core::domain::Language;

    fn new_user(username: &str, email: &str) -> NewUser {
        NewUser {
            username: username.to_string(),
            password: "hashed".to_string(),
            email: email.to_string(),
            full_name: None,
            preferred_language: Language::English,
        }
    }

    fn new_city(name: &str) -> NewCity {
        NewCity {
            name: name.to_string(),
            state: "State".to_string(),
            description: "desc".to_string(),
            image_url: None,
            rating: 40,
            latitude: "0.0".to_string(),
            longitude: "0.0".to_string(),
        }
    }

    fn new_category(name: &str) -> NewCategory {
        NewCategory {
            name: name.to_string(),
            description: "desc".to_string(),
            icon: "fa-star".to_string(),
            color_class: None,
        }
    }

    fn new_place(name: &str, city_id: i32, category_id: i32) -> NewPlace {
        NewPlace {
            name: name.to_string(),
            description: "desc".to_string(),
            address: "addr".to_string(),
            city_id,
            category_id,
            image_url: None,
            latitude: "0.0".to_string(),
            longitude: "0.0".to_string(),
            rating: 40,
            is_featured: false,
            tags: vec![],
        }
    }

    #[tokio::test]
    async fn ids_are_assigned_from_one_per_entity() {
        let store = MemStorage::unseeded();
        let city = store.create_city(new_city("Delhi")).await.unwrap();
        let category = store.create_category(new_category("Food")).await.unwrap();
        let user = store.create_user(new_user("alice", "a@x.com")).await.unwrap();
        assert_eq!(city.id, 1);
        assert_eq!(category.id, 1);
        assert_eq!(user.id, 1);

        let second = store.create_city(new_city("Mumbai")).await.unwrap();
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn user_lookups_are_case_insensitive() {
        let store = MemStorage::unseeded();
        store
            .create_user(new_user("Alice", "Alice@Example.com"))
            .await
            .unwrap();

        let by_name = store.get_user_by_username("aLiCe").await.unwrap();
        assert_eq!(by_name.map(|u| u.id), Some(1));

        let by_email = store.get_user_by_email("alice@example.COM").await.unwrap();
        assert_eq!(by_email.map(|u| u.id), Some(1));

        assert!(store.get_user_by_username("bob").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_username_keeps_first_match_wins_lookup() {
        // The store does not enforce uniqueness; the calling layer does.
        // If a caller bypasses the pre-check, lookups keep returning the
        // first created user.
        let store = MemStorage::unseeded();
        store.create_user(new_user("alice", "a@x.com")).await.unwrap();
        store.create_user(new_user("ALICE", "b@y.com")).await.unwrap();

        let found = store.get_user_by_username("alice").await.unwrap().unwrap();
        assert_eq!(found.id, 1);
    }

    #[tokio::test]
    async fn created_user_gets_null_profile_picture() {
        let store = MemStorage::unseeded();
        let user = store.create_user(new_user("alice", "a@x.com")).await.unwrap();
        assert!(user.profile_picture.is_none());
    }

    #[tokio::test]
    async fn city_lookup_by_name_is_case_insensitive() {
        let store = MemStorage::unseeded();
        store.create_city(new_city("Delhi")).await.unwrap();
        let city = store.get_city_by_name("dElHi").await.unwrap();
        assert_eq!(city.map(|c| c.name), Some("Delhi".to_string()));
    }

    #[tokio::test]
    async fn place_filters_select_by_city_category_and_both() {
        // Cities Delhi(1)/Mumbai(2), categories Food(1)/Nature(2), places
        // A{1,1} B{1,2} C{2,1}.
        let store = MemStorage::unseeded();
        store.create_city(new_city("Delhi")).await.unwrap();
        store.create_city(new_city("Mumbai")).await.unwrap();
        store.create_category(new_category("Food")).await.unwrap();
        store.create_category(new_category("Nature")).await.unwrap();
        let a = store.create_place(new_place("A", 1, 1)).await.unwrap();
        let b = store.create_place(new_place("B", 1, 2)).await.unwrap();
        let c = store.create_place(new_place("C", 2, 1)).await.unwrap();

        let by_city: Vec<i32> = store
            .get_places_by_city(1)
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(by_city, vec![a.id, b.id]);

        let by_category: Vec<i32> = store
            .get_places_by_category(1)
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(by_category, vec![a.id, c.id]);

        let both: Vec<i32> = store
            .get_places_by_city_and_category(1, 1)
            .await
            .unwrap()
            .iter()
            .map(|p| p.id)
            .collect();
        assert_eq!(both, vec![a.id]);
    }

    #[tokio::test]
    async fn combined_filter_equals_intersection_of_single_filters() {
        let store = MemStorage::new();
        for city_id in 1..=6 {
            for category_id in 1..=5 {
                let combined: Vec<i32> = store
                    .get_places_by_city_and_category(city_id, category_id)
                    .await
                    .unwrap()
                    .iter()
                    .map(|p| p.id)
                    .collect();
                let by_city = store.get_places_by_city(city_id).await.unwrap();
                let by_category: Vec<i32> = store
                    .get_places_by_category(category_id)
                    .await
                    .unwrap()
                    .iter()
                    .map(|p| p.id)
                    .collect();
                let intersection: Vec<i32> = by_city
                    .iter()
                    .map(|p| p.id)
                    .filter(|id| by_category.contains(id))
                    .collect();
                assert_eq!(combined, intersection);
            }
        }
    }

    #[tokio::test]
    async fn featured_places_are_the_is_featured_subset() {
        let store = MemStorage::new();
        let featured = store.get_featured_places().await.unwrap();
        assert!(!featured.is_empty());
        assert!(featured.iter().all(|p| p.is_featured));

        let all = store.get_places().await.unwrap();
        let expected = all.iter().filter(|p| p.is_featured).count();
        assert_eq!(featured.len(), expected);
    }

    #[tokio::test]
    async fn review_creation_increments_review_count_exactly_once() {
        let store = MemStorage::unseeded();
        store.create_city(new_city("Delhi")).await.unwrap();
        store.create_category(new_category("Food")).await.unwrap();
        let place = store.create_place(new_place("A", 1, 1)).await.unwrap();
        assert_eq!(place.review_count, 0);

        store
            .create_review(NewReview {
                user_id: 1,
                place_id: place.id,
                rating: 5,
                comment: Some("great".to_string()),
            })
            .await
            .unwrap();
        store
            .create_review(NewReview {
                user_id: 2,
                place_id: place.id,
                rating: 4,
                comment: None,
            })
            .await
            .unwrap();

        let reloaded = store.get_place(place.id).await.unwrap().unwrap();
        assert_eq!(reloaded.review_count, 2);
        assert_eq!(store.get_reviews(place.id).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn review_against_missing_place_does_not_error_or_touch_counts() {
        let store = MemStorage::unseeded();
        store.create_city(new_city("Delhi")).await.unwrap();
        store.create_category(new_category("Food")).await.unwrap();
        let place = store.create_place(new_place("A", 1, 1)).await.unwrap();

        let review = store
            .create_review(NewReview {
                user_id: 1,
                place_id: 999,
                rating: 3,
                comment: None,
            })
            .await
            .unwrap();
        assert_eq!(review.place_id, 999);

        let reloaded = store.get_place(place.id).await.unwrap().unwrap();
        assert_eq!(reloaded.review_count, 0);
    }

    #[tokio::test]
    async fn favorite_lifecycle() {
        let store = MemStorage::unseeded();
        store.create_city(new_city("Delhi")).await.unwrap();
        store.create_category(new_category("Food")).await.unwrap();
        let place = store.create_place(new_place("A", 1, 1)).await.unwrap();

        assert!(!store.is_favorite(1, place.id).await.unwrap());

        store
            .add_favorite(NewFavorite {
                user_id: 1,
                place_id: place.id,
            })
            .await
            .unwrap();
        assert!(store.is_favorite(1, place.id).await.unwrap());

        assert!(store.remove_favorite(1, place.id).await.unwrap());
        assert!(!store.is_favorite(1, place.id).await.unwrap());

        // Removing a pair that does not exist reports false, not an error.
        assert!(!store.remove_favorite(1, place.id).await.unwrap());
        assert!(!store.remove_favorite(42, 42).await.unwrap());
    }

    #[tokio::test]
    async fn user_favorites_drop_dangling_places() {
        let store = MemStorage::unseeded();
        store.create_city(new_city("Delhi")).await.unwrap();
        store.create_category(new_category("Food")).await.unwrap();
        let place = store.create_place(new_place("A", 1, 1)).await.unwrap();

        store
            .add_favorite(NewFavorite {
                user_id: 1,
                place_id: place.id,
            })
            .await
            .unwrap();
        // Adversarial row referencing a place that was never created.
        store
            .add_favorite(NewFavorite {
                user_id: 1,
                place_id: 999,
            })
            .await
            .unwrap();

        let favorites = store.get_user_favorites(1).await.unwrap();
        assert_eq!(favorites.len(), 1);
        assert_eq!(favorites[0].id, place.id);

        assert!(store.get_user_favorites(2).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn seed_data_matches_the_fixed_sample_set() {
        let store = MemStorage::new();
        assert_eq!(store.get_categories().await.unwrap().len(), 5);
        assert_eq!(store.get_cities().await.unwrap().len(), 6);
        assert_eq!(store.get_places().await.unwrap().len(), 6);
        assert_eq!(store.get_testimonials().await.unwrap().len(), 3);

        let delhi = store.get_city_by_name("delhi").await.unwrap().unwrap();
        assert_eq!(delhi.id, 1);
        assert_eq!(delhi.rating, 45);

        // Paranthe Wali Gali sits in Delhi's food category.
        let places = store.get_places_by_city_and_category(1, 1).await.unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].name, "Paranthe Wali Gali");
    }

    #[tokio::test]
    async fn cities_list_in_insertion_order() {
        let store = MemStorage::new();
        let names: Vec<String> = store
            .get_cities()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(
            names,
            vec!["Delhi", "Mumbai", "Jaipur", "Bangalore", "Chennai", "Kolkata"]
        );
    }

    #[tokio::test]
    async fn auth_sessions_validate_and_expire() {
        let store = MemStorage::unseeded();
        let user = store.create_user(new_user("alice", "a@x.com")).await.unwrap();

        store
            .create_auth_session("token-1", user.id, Utc::now() + Duration::days(30))
            .await
            .unwrap();
        assert_eq!(
            store.validate_auth_session("token-1").await.unwrap(),
            Some(user.id)
        );
        assert_eq!(store.validate_auth_session("missing").await.unwrap(), None);

        store.delete_auth_session("token-1").await.unwrap();
        assert_eq!(store.validate_auth_session("token-1").await.unwrap(), None);

        // Expired tokens resolve to None and are dropped.
        store
            .create_auth_session("token-2", user.id, Utc::now() - Duration::seconds(1))
            .await
            .unwrap();
        assert_eq!(store.validate_auth_session("token-2").await.unwrap(), None);
        assert_eq!(store.validate_auth_session("token-2").await.unwrap(), None);
    }
}
