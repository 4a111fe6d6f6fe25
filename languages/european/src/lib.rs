pub mod lexicon;
pub mod processor;
pub mod tagger;

pub use processor::EuropeanProcessor;
