use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use feet_core::loader::TermFormat;
use feet_types::{Extraction, LoadReport};
use serde::Serialize;
use tracing::info;

use crate::state::AppState;

/// Where dictionary terms come from
#[derive(Debug, Clone, Default)]
pub struct TermSource {
    pub txt: Option<PathBuf>,
    pub csv: Option<PathBuf>,
}

impl TermSource {
    fn files(&self) -> Vec<(&Path, TermFormat)> {
        let mut files = Vec::new();
        if let Some(path) = &self.txt {
            files.push((path.as_path(), TermFormat::Lines));
        }
        if let Some(path) = &self.csv {
            files.push((path.as_path(), TermFormat::Csv));
        }
        files
    }
}

#[derive(Debug, Serialize)]
pub struct LoadSummary {
    pub entity: String,
    pub lang: String,
    pub seen: usize,
    pub added: usize,
    pub cardinality: u64,
    /// First page of terms
    pub terms: Vec<String>,
}

pub async fn load(
    state: &AppState,
    entity: &str,
    source: &TermSource,
    lang: Option<&str>,
    page_size: usize,
) -> anyhow::Result<LoadSummary> {
    let files = source.files();
    if files.is_empty() {
        bail!("no term file specified, use --txt or --csv");
    }

    let lang = state.language(lang);
    let dictionary = state.dictionary(entity).await?;

    let mut total = LoadReport::default();
    for (path, format) in files {
        let report = dictionary
            .load_file(path, format, &lang)
            .await
            .with_context(|| format!("Failed to load {}", path.display()))?;
        total.seen += report.seen;
        total.added += report.added;
    }

    Ok(LoadSummary {
        entity: entity.to_string(),
        cardinality: dictionary.cardinality(&lang).await?,
        terms: dictionary.terms(&lang, 0, page_size).await?,
        seen: total.seen,
        added: total.added,
        lang,
    })
}

pub struct ExtractRequest<'a> {
    pub entity: &'a str,
    pub terms: &'a TermSource,
    pub text: Option<&'a str>,
    pub path: Option<&'a Path>,
    pub grammar: Option<&'a Path>,
    pub lang: Option<&'a str>,
}

pub async fn extract(state: &mut AppState, request: ExtractRequest<'_>) -> anyhow::Result<Extraction> {
    let text = match (request.text, request.path) {
        (Some(text), _) => text.to_string(),
        (None, Some(path)) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?,
        (None, None) => bail!("no text source specified, use --text or --path"),
    };

    if let Some(path) = request.grammar {
        let grammar = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read grammar {}", path.display()))?;
        state.config.extractor.grammar = Some(grammar);
    }

    // Terms loaded here and the lookups must use the same language partition
    let lang = state.text_language(&text, request.lang);

    if !request.terms.files().is_empty() {
        let summary = load(state, request.entity, request.terms, Some(&lang), 0).await?;
        info!(
            entity = request.entity,
            added = summary.added,
            seen = summary.seen,
            "dictionary ready"
        );
    }

    let dictionary = state.dictionary(request.entity).await?;
    let extractor = state.extractor(dictionary)?;

    Ok(extractor.extract(&text, Some(&lang)).await?)
}

/// Deletes a dictionary of the configured registry. Returns whether it existed.
pub async fn drop_dict(state: &AppState, entity: &str) -> anyhow::Result<bool> {
    let registry = state.registry().await?;
    let dropped = registry.del_dict(entity).await?;
    if dropped {
        info!(entity, registry = registry.name(), "dictionary dropped");
    }
    Ok(dropped)
}

pub fn detect(state: &AppState, text: &str) -> Option<String> {
    state.parser.detect_language(Some(text))
}

pub fn tokenize(state: &AppState, text: &str, lang: Option<&str>) -> anyhow::Result<Vec<Vec<String>>> {
    let lang = state.text_language(text, lang);
    Ok(state.parser.tokenize(Some(text), Some(&lang))?)
}
