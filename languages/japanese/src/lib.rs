pub mod lexicon;
pub mod processor;
pub mod script;

pub use processor::JapaneseProcessor;
