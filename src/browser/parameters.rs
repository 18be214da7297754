use std::collections::BTreeMap;

/// Field name to value pairs submitted by a form.
///
/// Names are unique; inserting a name twice keeps the later value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormParameters {
    values: BTreeMap<String, String>,
}

impl FormParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Encode as an `application/x-www-form-urlencoded` body.
    pub fn encode(&self) -> String {
        url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.iter())
            .finish()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FormParameters {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut parameters = Self::new();
        for (name, value) in iter {
            parameters.insert(name, value);
        }
        parameters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_values_overwrite_earlier_ones() {
        let parameters: FormParameters = vec![("a", "1"), ("b", "x"), ("a", "2")]
            .into_iter()
            .collect();

        assert_eq!(parameters.len(), 2);
        assert_eq!(parameters.get("a"), Some("2"));
    }

    #[test]
    fn encodes_as_form_body() {
        let parameters = FormParameters::new()
            .with("name", "Jane Doe")
            .with("note", "a&b=c");

        assert_eq!(parameters.encode(), "name=Jane+Doe&note=a%26b%3Dc");
    }
}
