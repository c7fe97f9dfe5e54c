use std::collections::{hash_map, HashMap};
use std::fmt::Display;

use crate::encode::encode;
use crate::CallerError;

/// Sorted, percent-encoded `(key, value)` pairs.
pub type NormalizedParameters = Vec<(String, String)>;

/// Unordered set of request parameters, keyed by name.
///
/// Values are stored as strings; anything `Display` (the timestamp, for
/// instance) is stringified on insertion.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterBag {
    inner: HashMap<String, String>,
}

impl ParameterBag {
    pub fn new() -> Self {
        Default::default()
    }

    /// Builder-style `insert`.
    pub fn with<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Display,
    {
        self.insert(key, value);
        self
    }

    /// Insert a parameter, returning the previous value for `key`, if any.
    pub fn insert<K, V>(&mut self, key: K, value: V) -> Option<String>
    where
        K: Into<String>,
        V: Display,
    {
        self.inner.insert(key.into(), value.to_string())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.inner.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, String> {
        self.inner.iter()
    }

    /// Union `other` into `self`.
    ///
    /// # Errors
    ///
    /// Fails without modifying `self` when both bags define the same key.
    pub fn merge(&mut self, other: ParameterBag) -> Result<(), CallerError> {
        if let Some(key) = other.inner.keys().find(|k| self.inner.contains_key(*k)) {
            return Err(CallerError::DuplicateParameter(key.clone()));
        }
        self.inner.extend(other.inner);
        Ok(())
    }
}

impl<K, V> FromIterator<(K, V)> for ParameterBag
where
    K: Into<String>,
    V: Display,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = ParameterBag::new();
        for (key, value) in iter {
            bag.insert(key, value);
        }
        bag
    }
}

impl<'a> IntoIterator for &'a ParameterBag {
    type Item = (&'a String, &'a String);
    type IntoIter = hash_map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}

impl IntoIterator for ParameterBag {
    type Item = (String, String);
    type IntoIter = hash_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

/// Sort the pairs by key, then by value, and percent-encode both sides.
///
/// Ordering is decided on the raw strings with an ordinal byte comparison;
/// encoding happens afterwards, so the result only depends on the set of
/// pairs and never on the iteration order of the source.
pub fn normalize<I, K, V>(params: I) -> NormalizedParameters
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut pairs: Vec<(K, V)> = params.into_iter().collect();
    pairs.sort_unstable_by(|(k1, v1), (k2, v2)| {
        (k1.as_ref(), v1.as_ref()).cmp(&(k2.as_ref(), v2.as_ref()))
    });

    pairs
        .iter()
        .map(|(k, v)| (encode(k.as_ref()), encode(v.as_ref())))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pairs(items: &[(&str, &str)]) -> NormalizedParameters {
        items
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn normalize_sorts_by_key() {
        let bag = ParameterBag::new()
            .with("key", "value")
            .with("key2", "value1")
            .with("key1", "value2");
        assert_eq!(
            normalize(&bag),
            pairs(&[("key", "value"), ("key1", "value2"), ("key2", "value1")])
        );
    }

    #[test]
    fn normalize_ignores_insertion_order() {
        let forward: ParameterBag = (0..32).map(|i| (format!("k{}", i), i)).collect();
        let backward: ParameterBag = (0..32).rev().map(|i| (format!("k{}", i), i)).collect();
        assert_eq!(forward, backward);
        assert_eq!(normalize(&forward), normalize(&backward));
        assert_eq!(normalize(&forward), normalize(&forward));
    }

    #[test]
    fn normalize_breaks_ties_by_value() {
        let normalized = normalize(vec![("a", "z"), ("b", "1"), ("a", "b"), ("a", "a c")]);
        assert_eq!(
            normalized,
            pairs(&[("a", "a%20c"), ("a", "b"), ("a", "z"), ("b", "1")])
        );
    }

    #[test]
    fn normalize_is_ordinal() {
        // uppercase sorts before lowercase in byte order
        let normalized = normalize(vec![("b", ""), ("B", ""), ("a", ""), ("_", "")]);
        let keys: Vec<&str> = normalized.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, vec!["B", "_", "a", "b"]);
    }

    #[test]
    fn normalize_encodes_after_sorting() {
        let normalized = normalize(vec![("c@", ""), ("a3", "2 q"), ("b5", "=%3D")]);
        assert_eq!(
            normalized,
            pairs(&[("a3", "2%20q"), ("b5", "%3D%253D"), ("c%40", "")])
        );
    }

    #[test]
    fn numbers_are_stringified() {
        let bag = ParameterBag::new().with("oauth_timestamp", 137_131_200u64);
        assert_eq!(bag.get("oauth_timestamp"), Some("137131200"));
        assert_eq!(
            normalize(&bag),
            pairs(&[("oauth_timestamp", "137131200")])
        );
    }

    #[test]
    fn merge_disjoint() {
        let mut bag = ParameterBag::new().with("oauth_nonce", "n");
        bag.merge(ParameterBag::new().with("oauth_token", "t")).unwrap();
        assert_eq!(bag.len(), 2);
        assert_eq!(bag.get("oauth_token"), Some("t"));
    }

    #[test]
    fn merge_collision() {
        let mut bag = ParameterBag::new().with("oauth_nonce", "n");
        let err = bag
            .merge(
                ParameterBag::new()
                    .with("extra", "x")
                    .with("oauth_nonce", "m"),
            )
            .unwrap_err();
        assert_eq!(err, CallerError::DuplicateParameter("oauth_nonce".to_string()));
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.get("oauth_nonce"), Some("n"));
    }
}
