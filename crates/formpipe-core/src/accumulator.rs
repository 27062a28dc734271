//! Accumulation of decoded key/value pairs during one form read.

use std::collections::HashMap;

use crate::collection::FormCollection;
use crate::error::FormError;
use crate::options::FormOptions;

/// Collects decoded key/value pairs and enforces the configured quotas.
///
/// One accumulator belongs to exactly one read operation; it is owned and
/// passed explicitly, never shared. Values for a key keep arrival order,
/// and keys keep the insertion order of their first occurrence.
#[derive(Debug)]
pub struct KeyValueAccumulator {
    /// Keys in first-occurrence order.
    order: Vec<String>,
    values: HashMap<String, Vec<String>>,
    value_count: usize,
    value_count_limit: usize,
    key_length_limit: usize,
    value_length_limit: usize,
}

impl KeyValueAccumulator {
    /// Create an accumulator enforcing the limits in `options`.
    #[must_use]
    pub fn new(options: &FormOptions) -> Self {
        Self {
            order: Vec::new(),
            values: HashMap::new(),
            value_count: 0,
            value_count_limit: options.value_count_limit(),
            key_length_limit: options.key_length_limit(),
            value_length_limit: options.value_length_limit(),
        }
    }

    /// Append one decoded pair.
    ///
    /// # Errors
    ///
    /// Returns [`FormError::ValueCountLimit`] when this append would push
    /// the total value count past the configured maximum, and
    /// [`FormError::KeyOrValueLengthLimit`] when the decoded key or value
    /// is longer (in characters) than its configured maximum. On error the
    /// accumulator is left unchanged.
    pub fn append(&mut self, key: String, value: String) -> Result<(), FormError> {
        if self.value_count >= self.value_count_limit {
            return Err(FormError::ValueCountLimit {
                limit: self.value_count_limit,
            });
        }
        if key.chars().count() > self.key_length_limit {
            return Err(FormError::KeyOrValueLengthLimit {
                limit: self.key_length_limit,
            });
        }
        if value.chars().count() > self.value_length_limit {
            return Err(FormError::KeyOrValueLengthLimit {
                limit: self.value_length_limit,
            });
        }

        match self.values.get_mut(&key) {
            Some(list) => list.push(value),
            None => {
                self.order.push(key.clone());
                self.values.insert(key, vec![value]);
            }
        }
        self.value_count += 1;
        Ok(())
    }

    /// Number of distinct keys seen so far.
    #[must_use]
    pub fn key_count(&self) -> usize {
        self.order.len()
    }

    /// Total number of values appended so far, across all keys.
    #[must_use]
    pub fn value_count(&self) -> usize {
        self.value_count
    }

    /// Returns true if any pair has been appended.
    #[must_use]
    pub fn has_values(&self) -> bool {
        self.value_count > 0
    }

    /// Build the final key → joined-values mapping.
    ///
    /// Multiple values for one key are joined by `,` in arrival order.
    /// The accumulator is not consumed, so repeated calls without further
    /// appends return identical collections.
    #[must_use]
    pub fn results(&self) -> FormCollection {
        let entries = self
            .order
            .iter()
            .map(|key| {
                // Every key in `order` has an entry in `values`.
                let joined = self.values.get(key).map_or_else(String::new, |v| v.join(","));
                (key.clone(), joined)
            })
            .collect();
        FormCollection::from_entries(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accumulator() -> KeyValueAccumulator {
        KeyValueAccumulator::new(&FormOptions::default())
    }

    #[test]
    fn single_pair() {
        let mut acc = accumulator();
        acc.append("foo".into(), "bar".into()).unwrap();

        assert_eq!(acc.key_count(), 1);
        assert_eq!(acc.value_count(), 1);
        assert!(acc.has_values());
        assert_eq!(acc.results().get("foo"), Some("bar"));
    }

    #[test]
    fn empty_accumulator() {
        let acc = accumulator();
        assert_eq!(acc.key_count(), 0);
        assert!(!acc.has_values());
        assert!(acc.results().is_empty());
    }

    #[test]
    fn repeated_keys_join_with_comma_in_arrival_order() {
        let mut acc = accumulator();
        acc.append("baz".into(), "3".into()).unwrap();
        acc.append("baz".into(), "4".into()).unwrap();

        assert_eq!(acc.key_count(), 1);
        assert_eq!(acc.value_count(), 2);
        assert_eq!(acc.results().get("baz"), Some("3,4"));
    }

    #[test]
    fn keys_keep_first_occurrence_order() {
        let mut acc = accumulator();
        acc.append("b".into(), "1".into()).unwrap();
        acc.append("a".into(), "2".into()).unwrap();
        acc.append("b".into(), "3".into()).unwrap();
        acc.append("c".into(), "4".into()).unwrap();

        let keys: Vec<_> = acc.results().keys().map(str::to_owned).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn value_count_limit_met() {
        let options = FormOptions::new().with_value_count_limit(3);
        let mut acc = KeyValueAccumulator::new(&options);
        acc.append("foo".into(), "1".into()).unwrap();
        acc.append("bar".into(), "2".into()).unwrap();
        acc.append("baz".into(), "3".into()).unwrap();
        assert_eq!(acc.value_count(), 3);
    }

    #[test]
    fn value_count_limit_exceeded() {
        let options = FormOptions::new().with_value_count_limit(3);
        let mut acc = KeyValueAccumulator::new(&options);
        for i in 0..3 {
            acc.append(format!("k{i}"), "v".into()).unwrap();
        }

        let err = acc.append("k3".into(), "v".into()).unwrap_err();
        assert!(matches!(err, FormError::ValueCountLimit { limit: 3 }));
        // Failed append must not mutate state.
        assert_eq!(acc.value_count(), 3);
        assert_eq!(acc.key_count(), 3);
    }

    #[test]
    fn value_count_limit_exceeded_same_key() {
        let options = FormOptions::new().with_value_count_limit(3);
        let mut acc = KeyValueAccumulator::new(&options);
        for _ in 0..3 {
            acc.append("baz".into(), "v".into()).unwrap();
        }

        let err = acc.append("baz".into(), "v".into()).unwrap_err();
        assert!(matches!(err, FormError::ValueCountLimit { limit: 3 }));
    }

    #[test]
    fn key_length_limit() {
        let options = FormOptions::new().with_key_length_limit(10);
        let mut acc = KeyValueAccumulator::new(&options);
        acc.append("exactly_10".into(), "ok".into()).unwrap();

        let err = acc.append("baz1234567890".into(), "2".into()).unwrap_err();
        assert!(matches!(err, FormError::KeyOrValueLengthLimit { limit: 10 }));
    }

    #[test]
    fn value_length_limit() {
        let options = FormOptions::new().with_value_length_limit(10);
        let mut acc = KeyValueAccumulator::new(&options);
        acc.append("bar".into(), "1234567890".into()).unwrap();

        let err = acc.append("baz".into(), "1234567890123".into()).unwrap_err();
        assert!(matches!(err, FormError::KeyOrValueLengthLimit { limit: 10 }));
    }

    #[test]
    fn length_limits_count_characters_not_bytes() {
        let options = FormOptions::new().with_value_length_limit(2);
        let mut acc = KeyValueAccumulator::new(&options);
        // Two characters, four bytes.
        acc.append("k".into(), "áé".into()).unwrap();
    }

    #[test]
    fn results_is_idempotent() {
        let mut acc = accumulator();
        acc.append("foo".into(), "1".into()).unwrap();
        acc.append("baz".into(), "3".into()).unwrap();
        acc.append("baz".into(), "4".into()).unwrap();

        assert_eq!(acc.results(), acc.results());
    }

    #[test]
    fn empty_key_and_empty_value_are_stored() {
        let mut acc = accumulator();
        acc.append(String::new(), "bar".into()).unwrap();
        acc.append("foo".into(), String::new()).unwrap();

        let form = acc.results();
        assert_eq!(form.get(""), Some("bar"));
        assert_eq!(form.get("foo"), Some(""));
    }
}
