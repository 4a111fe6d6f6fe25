//! End-to-end extraction with the bundled language processors

use feet_config::Config;
use feet_types::Classification;

use crate::state::AppState;

async fn state_with(entity: &str, terms: &[&str], lang: &str) -> AppState {
    let state = AppState::new(Config::default()).unwrap();
    let dictionary = state.dictionary(entity).await.unwrap();
    dictionary.load_list(terms, lang).await.unwrap();
    state
}

#[tokio::test]
async fn test_english_flight_tickets() {
    let state = state_with("products", &["flight tickets", "Japan Airlines Group"], "en").await;
    let extractor = state
        .extractor(state.dictionary("products").await.unwrap())
        .unwrap();

    let extraction = extractor
        .extract("I want to buy flight tickets for Japan", Some("en"))
        .await
        .unwrap();

    let classes: Vec<(&str, Classification)> = extraction
        .results
        .iter()
        .map(|r| (r.chunk.as_str(), r.classification()))
        .collect();
    assert_eq!(
        classes,
        vec![
            ("flight tickets", Classification::EntityFound),
            ("Japan", Classification::NewEntity),
        ]
    );
}

#[tokio::test]
async fn test_english_detected_and_variant() {
    let state = state_with("cities", &["New York", "Pizza Hut Delivery Express"], "en").await;
    let extractor = state
        .extractor(state.dictionary("cities").await.unwrap())
        .unwrap();

    let extraction = extractor
        .extract("They want New York Pizza.", None)
        .await
        .unwrap();

    assert_eq!(extraction.language, "en");
    let variant = extraction
        .results
        .iter()
        .find(|r| r.chunk == "New York Pizza")
        .unwrap();
    assert_eq!(variant.classification(), Classification::NewVariant);
    assert_eq!(variant.entity_candidates, vec!["new york"]);
    assert_eq!(variant.not_entity, vec!["pizza"]);
}

#[tokio::test]
async fn test_french_text() {
    let state = state_with("pays", &["Japon", "Air France"], "fr").await;
    let extractor = state
        .extractor(state.dictionary("pays").await.unwrap())
        .unwrap();

    let extraction = extractor
        .extract("Je veux prendre Air France pour le Japon", Some("fr"))
        .await
        .unwrap();

    assert_eq!(extraction.found_entities(), vec!["air france", "japon"]);
}

#[tokio::test]
async fn test_japanese_text() {
    let state = state_with("orgs", &["国際連合", "国際組織"], "ja").await;
    let extractor = state
        .extractor(state.dictionary("orgs").await.unwrap())
        .unwrap();

    let extraction = extractor
        .extract(
            "国際連合は、国際連合憲章の下、1945年に設立された国際組織である",
            None,
        )
        .await
        .unwrap();

    assert_eq!(extraction.language, "ja");
    assert_eq!(extraction.found_entities(), vec!["国際組織", "国際連合"]);
}

#[tokio::test]
async fn test_records_serialize_with_wire_names() {
    let state = state_with("products", &["flight tickets"], "en").await;
    let extractor = state
        .extractor(state.dictionary("products").await.unwrap())
        .unwrap();

    let extraction = extractor
        .extract("flight tickets", Some("en"))
        .await
        .unwrap();
    let json = serde_json::to_value(&extraction.results).unwrap();

    assert_eq!(
        json,
        serde_json::json!([{
            "position": 0,
            "chunk": "flight tickets",
            "new_variant": [],
            "add_new_variant": 0,
            "entity_found": 1,
            "entity_candidates": ["flight tickets"],
            "add_new_entity": 0
        }])
    );
}
