//! Interface-shaped types shared across features but owned by nobody feature.

pub mod language;

pub use language::LanguageId;
