pub mod store;
pub mod translator;

pub use store::MemStorage;
pub use translator::OpenAiTranslator;
