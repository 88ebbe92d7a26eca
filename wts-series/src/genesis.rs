use serde::{Deserialize, Serialize};

/// Append-only, ordered audit trail of the transformations applied to a
/// series. Entries are never removed or rewritten.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genesis(Vec<String>);

impl Genesis {
    pub fn new() -> Self {
        Genesis(Vec::new())
    }

    pub fn push(&mut self, entry: impl Into<String>) {
        self.0.push(entry.into());
    }

    pub fn iter(&self) -> std::slice::Iter<'_, String> {
        self.0.iter()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Extend<String> for Genesis {
    fn extend<I: IntoIterator<Item = String>>(&mut self, iter: I) {
        self.0.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Genesis {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::Genesis;

    #[test]
    fn test_genesis_keeps_order() {
        let mut genesis = Genesis::new();
        genesis.push("Read from observations.csv");
        genesis.extend(vec!["Filled 1990-01".to_string(), "Filled 1990-02".to_string()]);
        let entries: Vec<&String> = genesis.iter().collect();
        assert_eq!(genesis.len(), 3);
        assert_eq!(entries[0], "Read from observations.csv");
        assert_eq!(entries[2], "Filled 1990-02");
    }
}
