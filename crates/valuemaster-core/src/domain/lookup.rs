/// Ordered key → value mapping rebuilt from a source document on every call.
///
/// Keys match exactly (case and punctuation sensitive) and the first entry for a key
/// wins. An entry whose value could not be parsed is kept as `None` so that it still
/// shadows later duplicates and resolves as "not found".
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupTable {
    entries: Vec<(String, Option<f64>)>,
}

impl LookupTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: Option<f64>) {
        self.entries.push((key.into(), value));
    }

    /// Set the value served for `key`, replacing the entry that currently wins.
    pub fn insert(&mut self, key: impl Into<String>, value: Option<f64>) {
        let key = key.into();
        match self.entries.iter_mut().find(|(candidate, _)| *candidate == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn with_entry(mut self, key: impl Into<String>, value: f64) -> Self {
        self.push(key, Some(value));
        self
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.entries
            .iter()
            .find(|(candidate, _)| candidate == key)
            .and_then(|(_, value)| *value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(candidate, _)| candidate == key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, Option<f64>)> for LookupTable {
    fn from_iter<I: IntoIterator<Item = (String, Option<f64>)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_match_wins() {
        let table = LookupTable::new()
            .with_entry("Banks (Regional)", 0.43)
            .with_entry("Banks (Regional)", 9.99);

        assert_eq!(table.get("Banks (Regional)"), Some(0.43));
    }

    #[test]
    fn match_is_case_and_punctuation_sensitive() {
        let table = LookupTable::new().with_entry("Banks (Regional)", 0.43);

        assert_eq!(table.get("banks (regional)"), None);
        assert_eq!(table.get("Banks Regional"), None);
    }

    #[test]
    fn insert_replaces_the_winning_entry() {
        let mut table = LookupTable::new()
            .with_entry("Brazil", 3.57)
            .with_entry("India", 2.79);

        table.insert("Brazil", Some(4.0));
        table.insert("Chile", Some(0.89));

        assert_eq!(table.get("Brazil"), Some(4.0));
        assert_eq!(table.keys().collect::<Vec<_>>(), ["Brazil", "India", "Chile"]);
    }

    #[test]
    fn unparsable_first_entry_shadows_later_duplicate() {
        let mut table = LookupTable::new();
        table.push("Brazil", None);
        table.push("Brazil", Some(0.03));

        assert!(table.contains_key("Brazil"));
        assert_eq!(table.get("Brazil"), None);
    }
}
