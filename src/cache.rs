//! Fingerprint-keyed result cache.
//!
//! Purely an optimization for callers that re-evaluate on every form
//! change; the engine itself never depends on it. Keys are canonical JSON
//! fingerprints of the parameter set, so two parameter records that differ
//! only in serialization key order hit the same entry.

use serde_json::Value;

use crate::engine::types::Evaluation;
use crate::params::HouseholdParameters;

/// Default maximum number of cached evaluations.
pub const DEFAULT_MAX_ENTRIES: usize = 32;

/// Bounded store of evaluations keyed by parameter fingerprint.
///
/// Insertion order doubles as age; when the store is full the oldest entry
/// is evicted.
#[derive(Debug)]
pub struct ResultCache {
    max_entries: usize,
    entries: Vec<(String, Evaluation)>,
}

impl Default for ResultCache {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ENTRIES)
    }
}

impl ResultCache {
    /// Creates a cache holding at most `max_entries` evaluations. A limit
    /// of 0 disables storage entirely.
    pub fn new(max_entries: usize) -> Self {
        Self {
            max_entries,
            entries: Vec::new(),
        }
    }

    /// Number of stored evaluations.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Looks up a previously stored evaluation.
    pub fn get(&self, params: &HouseholdParameters) -> Option<&Evaluation> {
        let key = fingerprint(params)?;
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    /// Stores an evaluation, replacing any entry with the same fingerprint
    /// and evicting the oldest entry beyond the size limit.
    pub fn put(&mut self, params: &HouseholdParameters, evaluation: Evaluation) {
        let Some(key) = fingerprint(params) else {
            return;
        };
        self.entries.retain(|(k, _)| *k != key);
        self.entries.push((key, evaluation));
        while self.entries.len() > self.max_entries {
            self.entries.remove(0);
        }
    }

    /// Drops all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Canonical fingerprint of a parameter set: JSON with recursively sorted
/// object keys, so key order in the source never matters. Returns `None`
/// only if serialization fails, in which case the caller skips caching.
fn fingerprint(params: &HouseholdParameters) -> Option<String> {
    let value = serde_json::to_value(params).ok()?;
    Some(canonical_json(&value))
}

fn canonical_json(value: &Value) -> String {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            let fields: Vec<String> = keys
                .into_iter()
                .map(|k| {
                    let v = map.get(k).map(canonical_json).unwrap_or_default();
                    format!("{}:{v}", Value::String(k.clone()))
                })
                .collect();
            format!("{{{}}}", fields.join(","))
        }
        Value::Array(items) => {
            let elems: Vec<String> = items.iter().map(canonical_json).collect();
            format!("[{}]", elems.join(","))
        }
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ReferenceData;
    use crate::engine::evaluate;

    fn starter_eval() -> Evaluation {
        evaluate(&HouseholdParameters::starter(), &ReferenceData::default()).unwrap()
    }

    #[test]
    fn stores_and_retrieves_by_parameters() {
        let mut cache = ResultCache::default();
        let params = HouseholdParameters::starter();
        assert!(cache.get(&params).is_none());

        cache.put(&params, starter_eval());
        let hit = cache.get(&params);
        assert!(hit.is_some());
        assert_eq!(hit.map(|e| e.scenarios.len()), Some(3));
    }

    #[test]
    fn different_parameters_miss() {
        let mut cache = ResultCache::default();
        cache.put(&HouseholdParameters::starter(), starter_eval());
        let other = HouseholdParameters::family();
        assert!(cache.get(&other).is_none());
    }

    #[test]
    fn fingerprint_ignores_key_order() {
        let a: Value = serde_json::from_str(r#"{"x": 1, "y": {"a": true, "b": [1, 2]}}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"y": {"b": [1, 2], "a": true}, "x": 1}"#).unwrap();
        assert_eq!(canonical_json(&a), canonical_json(&b));
    }

    #[test]
    fn fingerprint_distinguishes_values() {
        let a: Value = serde_json::from_str(r#"{"x": 1}"#).unwrap();
        let b: Value = serde_json::from_str(r#"{"x": 2}"#).unwrap();
        assert_ne!(canonical_json(&a), canonical_json(&b));
    }

    #[test]
    fn permuted_toml_input_hits_the_same_entry() {
        // same values, different declaration order
        let first = HouseholdParameters::from_toml_str(
            "house_type = \"row\"\narea_sqm = 120.0\noccupants = 3\n",
        )
        .unwrap();
        let second = HouseholdParameters::from_toml_str(
            "occupants = 3\narea_sqm = 120.0\nhouse_type = \"row\"\n",
        )
        .unwrap();

        let mut cache = ResultCache::default();
        let eval = evaluate(&first, &ReferenceData::default()).unwrap();
        cache.put(&first, eval.clone());
        assert_eq!(cache.get(&second), Some(&eval));
    }

    #[test]
    fn oldest_entry_is_evicted_at_capacity() {
        let mut cache = ResultCache::new(2);
        let eval = starter_eval();

        let mut p1 = HouseholdParameters::starter();
        p1.occupants = 1;
        let mut p2 = HouseholdParameters::starter();
        p2.occupants = 2;
        let mut p3 = HouseholdParameters::starter();
        p3.occupants = 3;

        cache.put(&p1, eval.clone());
        cache.put(&p2, eval.clone());
        cache.put(&p3, eval.clone());

        assert_eq!(cache.len(), 2);
        assert!(cache.get(&p1).is_none(), "oldest entry should be gone");
        assert!(cache.get(&p2).is_some());
        assert!(cache.get(&p3).is_some());
    }

    #[test]
    fn replacing_an_entry_refreshes_its_age() {
        let mut cache = ResultCache::new(2);
        let eval = starter_eval();

        let mut p1 = HouseholdParameters::starter();
        p1.occupants = 1;
        let mut p2 = HouseholdParameters::starter();
        p2.occupants = 2;
        let mut p3 = HouseholdParameters::starter();
        p3.occupants = 3;

        cache.put(&p1, eval.clone());
        cache.put(&p2, eval.clone());
        // re-store p1, making p2 the oldest
        cache.put(&p1, eval.clone());
        cache.put(&p3, eval.clone());

        assert!(cache.get(&p1).is_some());
        assert!(cache.get(&p2).is_none());
        assert!(cache.get(&p3).is_some());
    }

    #[test]
    fn zero_capacity_stores_nothing() {
        let mut cache = ResultCache::new(0);
        let params = HouseholdParameters::starter();
        cache.put(&params, starter_eval());
        assert!(cache.is_empty());
        assert!(cache.get(&params).is_none());
    }
}
