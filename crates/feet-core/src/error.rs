use std::time::Duration;

use feet_store::StoreError;

use crate::grammar::GrammarError;
use crate::language::LanguageError;
use crate::loader::LoadError;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    StoreUnavailable(#[from] StoreError),

    #[error("Extraction did not finish within {0:?}")]
    TimeoutExceeded(Duration),

    #[error("Tokenization failed: {0}")]
    Tokenization(#[from] LanguageError),

    #[error("Invalid grammar: {0}")]
    Grammar(#[from] GrammarError),

    #[error("Load failed: {0}")]
    Load(#[from] LoadError),
}
