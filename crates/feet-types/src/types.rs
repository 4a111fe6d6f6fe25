use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

pub type LanguageCode = String;

/// How a chunk relates to the dictionary it was matched against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// Every token that carried a signal agreed on known term(s)
    EntityFound,
    /// Known term(s) matched, but some tokens are not covered by them
    NewVariant,
    /// Tokens overlap existing terms without matching any of them
    NewEntity,
}

impl Classification {
    /// Classify a lookup outcome, `None` when it carries no signal at all
    pub fn from_lookup(entities: &BTreeSet<String>, not_entity: &[String]) -> Option<Self> {
        match (entities.is_empty(), not_entity.is_empty()) {
            (false, true) => Some(Classification::EntityFound),
            (false, false) => Some(Classification::NewVariant),
            (true, false) => Some(Classification::NewEntity),
            (true, true) => None,
        }
    }
}

/// One classified chunk of an extraction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Index of the chunk in the chunker output
    pub position: usize,
    pub chunk: String,
    /// Tokens whose candidates all failed the selection ratio
    #[serde(rename = "new_variant")]
    pub not_entity: Vec<String>,
    #[serde(with = "flag")]
    pub add_new_variant: bool,
    #[serde(with = "flag")]
    pub entity_found: bool,
    /// Sorted, deduplicated
    pub entity_candidates: Vec<String>,
    #[serde(with = "flag")]
    pub add_new_entity: bool,
}

impl ExtractionResult {
    pub fn new(
        position: usize,
        chunk: String,
        entities: BTreeSet<String>,
        not_entity: Vec<String>,
    ) -> Option<Self> {
        let classification = Classification::from_lookup(&entities, &not_entity)?;

        Some(Self {
            position,
            chunk,
            not_entity,
            add_new_variant: classification == Classification::NewVariant,
            entity_found: matches!(
                classification,
                Classification::EntityFound | Classification::NewVariant
            ),
            entity_candidates: entities.into_iter().collect(),
            add_new_entity: classification == Classification::NewEntity,
        })
    }

    pub fn classification(&self) -> Classification {
        if self.add_new_variant {
            Classification::NewVariant
        } else if self.entity_found {
            Classification::EntityFound
        } else {
            Classification::NewEntity
        }
    }
}

/// Output of a full extraction call
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Extraction {
    /// Language the text was processed as
    pub language: LanguageCode,
    pub results: Vec<ExtractionResult>,
    #[serde(with = "millis")]
    pub elapsed: Duration,
}

impl Extraction {
    /// Union of the candidates of every record that found an entity
    pub fn found_entities(&self) -> Vec<String> {
        self.results
            .iter()
            .filter(|r| r.entity_found)
            .flat_map(|r| r.entity_candidates.iter().cloned())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Outcome of a bulk load
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadReport {
    /// Terms read from the source
    pub seen: usize,
    /// Terms that were not already present
    pub added: usize,
}

// Flags travel as 0/1 integers on the wire
mod flag {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &bool, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(u8::from(*value))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Ok(u8::deserialize(deserializer)? != 0)
    }
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_millis() as u64)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        Ok(Duration::from_millis(u64::deserialize(deserializer)?))
    }
}
