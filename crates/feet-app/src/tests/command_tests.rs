use std::io::Write;

use feet_config::Config;
use tempfile::NamedTempFile;

use crate::commands::{self, ExtractRequest, TermSource};
use crate::state::AppState;

fn term_file(lines: &[&str]) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    for line in lines {
        writeln!(file, "{line}").unwrap();
    }
    file.flush().unwrap();
    file
}

#[tokio::test]
async fn test_load_txt_and_csv() {
    let state = AppState::new(Config::default()).unwrap();
    let txt = term_file(&["Paris", "Tokyo", "", "Paris"]);
    let csv = term_file(&["name,country", "Lyon,FR", "Tokyo,JP"]);

    let source = TermSource {
        txt: Some(txt.path().to_path_buf()),
        csv: Some(csv.path().to_path_buf()),
    };
    let summary = commands::load(&state, "cities", &source, None, 2)
        .await
        .unwrap();

    assert_eq!(summary.lang, "en");
    assert_eq!(summary.seen, 5);
    assert_eq!(summary.added, 3);
    assert_eq!(summary.cardinality, 3);
    assert_eq!(summary.terms, vec!["Paris", "Tokyo"]);

    // Dictionaries live under the configured registry
    let dictionary = state.dictionary("cities").await.unwrap();
    assert_eq!(dictionary.key(), "feet:registry:feet:entity:cities");
}

#[tokio::test]
async fn test_load_requires_a_file() {
    let state = AppState::new(Config::default()).unwrap();
    let result = commands::load(&state, "cities", &TermSource::default(), None, 10).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_extract_from_path() {
    let mut state = AppState::new(Config::default()).unwrap();
    let terms = term_file(&["flight tickets"]);
    let text = term_file(&["I want to buy flight tickets for Japan"]);

    let source = TermSource {
        txt: Some(terms.path().to_path_buf()),
        csv: None,
    };
    let extraction = commands::extract(
        &mut state,
        ExtractRequest {
            entity: "products",
            terms: &source,
            text: None,
            path: Some(text.path()),
            grammar: None,
            lang: Some("en"),
        },
    )
    .await
    .unwrap();

    assert_eq!(extraction.found_entities(), vec!["flight tickets"]);
}

#[tokio::test]
async fn test_extract_with_grammar_file() {
    let mut state = AppState::new(Config::default()).unwrap();
    let terms = term_file(&["Japan"]);
    let grammar = term_file(&["PLACE: {<NNP>+}"]);

    let source = TermSource {
        txt: Some(terms.path().to_path_buf()),
        csv: None,
    };
    let extraction = commands::extract(
        &mut state,
        ExtractRequest {
            entity: "places",
            terms: &source,
            text: Some("I want to buy flight tickets for Japan"),
            path: None,
            grammar: Some(grammar.path()),
            lang: Some("en"),
        },
    )
    .await
    .unwrap();

    let chunks: Vec<&str> = extraction.results.iter().map(|r| r.chunk.as_str()).collect();
    assert_eq!(chunks, vec!["Japan"]);
    assert!(state.config.extractor.grammar.is_some());
}

#[tokio::test]
async fn test_extract_requires_text() {
    let mut state = AppState::new(Config::default()).unwrap();
    let result = commands::extract(
        &mut state,
        ExtractRequest {
            entity: "products",
            terms: &TermSource::default(),
            text: None,
            path: None,
            grammar: None,
            lang: None,
        },
    )
    .await;
    assert!(result.is_err());
}

#[test]
fn test_detect_and_tokenize() {
    let state = AppState::new(Config::default()).unwrap();

    assert_eq!(commands::detect(&state, "これは日本語です").as_deref(), Some("ja"));
    assert_eq!(
        commands::detect(&state, "Ceci est mon meilleur exemple").as_deref(),
        Some("fr")
    );

    let sentences =
        commands::tokenize(&state, "これは日本語です。これは私の最高の例です。", None).unwrap();
    assert_eq!(
        sentences,
        vec![
            vec!["これ", "は", "日本語", "です"],
            vec!["これ", "は", "私", "の", "最高", "の", "例", "です"],
        ]
    );

    let sentences = commands::tokenize(&state, "New York. Paris!", Some("en")).unwrap();
    assert_eq!(
        sentences,
        vec![vec!["new", "york", "."], vec!["paris", "!"]]
    );
}

#[tokio::test]
async fn test_extract_loads_terms_in_the_detected_language() {
    let mut state = AppState::new(Config::default()).unwrap();
    let terms = term_file(&["Japon", "Air France"]);

    let source = TermSource {
        txt: Some(terms.path().to_path_buf()),
        csv: None,
    };
    let extraction = commands::extract(
        &mut state,
        ExtractRequest {
            entity: "pays",
            terms: &source,
            text: Some("Je veux prendre Air France pour le Japon"),
            path: None,
            grammar: None,
            lang: None,
        },
    )
    .await
    .unwrap();

    assert_eq!(extraction.language, "fr");
    assert_eq!(extraction.found_entities(), vec!["air france", "japon"]);

    let dictionary = state.dictionary("pays").await.unwrap();
    assert_eq!(
        dictionary.languages().await.unwrap().into_iter().collect::<Vec<_>>(),
        vec!["fr"]
    );
}

#[tokio::test]
async fn test_store_file_keeps_dictionaries_between_runs() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = Config::default();
    config.store.path = Some(dir.path().join("feet.json"));

    let terms = term_file(&["Paris", "Tokyo"]);
    let source = TermSource {
        txt: Some(terms.path().to_path_buf()),
        csv: None,
    };

    {
        let state = AppState::new(config.clone()).unwrap();
        let summary = commands::load(&state, "cities", &source, Some("en"), 10)
            .await
            .unwrap();
        assert_eq!(summary.added, 2);
    }

    {
        let mut state = AppState::new(config.clone()).unwrap();
        let registry = state.registry().await.unwrap();
        assert!(registry.dictionaries().await.unwrap().contains("cities"));

        let extraction = commands::extract(
            &mut state,
            ExtractRequest {
                entity: "cities",
                terms: &TermSource::default(),
                text: Some("I want Paris"),
                path: None,
                grammar: None,
                lang: Some("en"),
            },
        )
        .await
        .unwrap();
        assert_eq!(extraction.found_entities(), vec!["Paris"]);

        assert!(commands::drop_dict(&state, "cities").await.unwrap());
    }

    let state = AppState::new(config).unwrap();
    let registry = state.registry().await.unwrap();
    assert!(!registry.dictionaries().await.unwrap().contains("cities"));
    assert!(!commands::drop_dict(&state, "cities").await.unwrap());

    let dictionary = state.dictionary("cities").await.unwrap();
    assert_eq!(dictionary.cardinality("en").await.unwrap(), 0);
}

#[tokio::test]
async fn test_unknown_dictionary_is_not_dropped() {
    let state = AppState::new(Config::default()).unwrap();
    assert!(!commands::drop_dict(&state, "nothing").await.unwrap());
}
