use serde::Deserialize;
use std::collections::HashMap;

/// Flat key/value parameters of a gateway request or callback.
///
/// Insertion order is kept as received; signing sorts on its own, so callers
/// never have to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(from = "Vec<(String, String)>")]
pub struct PaymentParams {
    pairs: Vec<(String, String)>,
}

impl PaymentParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key`, replacing an existing value. Numbers are stored in their
    /// decimal string form, which is what the gateway signs.
    pub fn insert(&mut self, key: impl Into<String>, value: impl ToString) -> &mut Self {
        let key = key.into();
        let value = value.to_string();

        match self.pairs.iter_mut().find(|(k, _)| *k == key) {
            Some(pair) => pair.1 = value,
            None => self.pairs.push((key, value)),
        }
        self
    }

    pub fn with(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let position = self.pairs.iter().position(|(k, _)| k == key)?;
        Some(self.pairs.remove(position).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for PaymentParams
where
    K: Into<String>,
    V: ToString,
{
    /// A repeated key keeps its first position and its last value.
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut positions: HashMap<String, usize> = HashMap::new();
        let mut pairs: Vec<(String, String)> = Vec::new();

        for (key, value) in iter {
            let key = key.into();
            let value = value.to_string();
            match positions.get(&key) {
                Some(&position) => pairs[position].1 = value,
                None => {
                    positions.insert(key.clone(), pairs.len());
                    pairs.push((key, value));
                }
            }
        }

        Self { pairs }
    }
}

impl From<Vec<(String, String)>> for PaymentParams {
    fn from(pairs: Vec<(String, String)>) -> Self {
        pairs.into_iter().collect()
    }
}

impl From<HashMap<String, String>> for PaymentParams {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}
