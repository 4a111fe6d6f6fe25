pub mod detect;
pub mod dictionary;
pub mod error;
pub mod extractor;
pub mod grammar;
pub mod language;
pub mod loader;
pub mod nlp;
pub mod preprocess;
pub mod registry;

#[cfg(test)]
mod tests;

pub use dictionary::Dictionary;
pub use error::CoreError;
pub use extractor::Extractor;
pub use grammar::Grammar;
pub use nlp::Parser;
pub use registry::Registry;
