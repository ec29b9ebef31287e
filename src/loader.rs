use crate::models::{
    Participant, FIELD_BIDANG, FIELD_LANGUAGE, FIELD_LEVEL, FIELD_NAME, FIELD_NO, FIELD_SCHOOL,
};
use crate::normalizer::Normalizer;
use anyhow::{Context, Result};
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fs;

/// Load the static roster from a JSON array of field-name -> value objects.
/// Every string field is trimmed; names and schools are normalized on the way
/// in. The returned vector is the read-only source for all later passes.
pub fn load_dataset(path: &str, normalizer: &Normalizer) -> Result<Vec<Participant>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read dataset: {}", path))?;
    let records: Vec<Map<String, Value>> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse dataset JSON: {}", path))?;

    Ok(records
        .iter()
        .map(|record| participant_from_record(record, normalizer))
        .collect())
}

/// Missing or non-text fields degrade to empty strings; a malformed sequence
/// number degrades to 0. The view stays available over strict validation.
fn participant_from_record(record: &Map<String, Value>, normalizer: &Normalizer) -> Participant {
    Participant {
        no: sequence_number(record),
        name: normalizer.normalize_name(&text_field(record, FIELD_NAME)),
        school: normalizer.normalize_school(&text_field(record, FIELD_SCHOOL)),
        level: text_field(record, FIELD_LEVEL),
        bidang: text_field(record, FIELD_BIDANG),
        language: text_field(record, FIELD_LANGUAGE),
        ruang: String::new(),
    }
}

fn text_field(record: &Map<String, Value>, key: &str) -> String {
    match record.get(key) {
        Some(Value::String(s)) => s.trim().to_string(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    }
}

fn sequence_number(record: &Map<String, Value>) -> i64 {
    match record.get(FIELD_NO) {
        Some(Value::Number(n)) => n.as_i64().unwrap_or(0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0),
        _ => 0,
    }
}

/// Sorted distinct levels over the normalized dataset (for display menus).
pub fn distinct_levels(participants: &[Participant]) -> Vec<String> {
    let mut levels = BTreeSet::new();
    for p in participants {
        if !p.level.is_empty() {
            levels.insert(p.level.clone());
        }
    }
    levels.into_iter().collect()
}
