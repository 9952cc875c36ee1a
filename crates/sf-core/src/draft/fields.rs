use serde_json::{Map, Value};

/// Field-by-field reader over an untrusted JSON object.
///
/// Every accessor returns `None` when the field is missing or has the wrong
/// type. List accessors keep conforming elements and drop the rest.
pub struct Fields<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Fields<'a> {
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    pub fn from_value(value: &'a Value) -> Option<Self> {
        value.as_object().map(Self::new)
    }

    pub fn string(&self, name: &str) -> Option<String> {
        self.map.get(name)?.as_str().map(str::to_string)
    }

    pub fn bool(&self, name: &str) -> Option<bool> {
        self.map.get(name)?.as_bool()
    }

    pub fn i32(&self, name: &str) -> Option<i32> {
        self.map
            .get(name)?
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
    }

    pub fn strings(&self, name: &str) -> Option<Vec<String>> {
        let items = self.map.get(name)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
        )
    }

    /// Nested record, normalized with `parse`.
    pub fn record<T>(&self, name: &str, parse: impl Fn(&Fields<'_>) -> Option<T>) -> Option<T> {
        let nested = Fields::from_value(self.map.get(name)?)?;
        parse(&nested)
    }

    /// List of nested records; elements that are not objects or fail `parse`
    /// are dropped.
    pub fn records<T>(
        &self,
        name: &str,
        parse: impl Fn(&Fields<'_>) -> Option<T>,
    ) -> Option<Vec<T>> {
        let items = self.map.get(name)?.as_array()?;
        Some(
            items
                .iter()
                .filter_map(Fields::from_value)
                .filter_map(|fields| parse(&fields))
                .collect(),
        )
    }
}
