pub mod domain;
pub mod ports;

pub use domain::{
    AuthSession, Category, City, Favorite, Language, Place, Review, Testimonial, User,
};
pub use ports::{PortError, PortResult, StorageService, TranslationService};
