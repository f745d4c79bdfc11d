use indexmap::IndexMap;
use serde::de::Error as _;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::{Operation, Parameter};

/// Keys of a path item that hold an [`Operation`].
pub const OPERATION_METHODS: [&str; 8] = [
    "get", "put", "post", "delete", "options", "head", "patch", "trace",
];

const PARAMETERS_KEY: &str = "parameters";

/// Operations available on one path template.
///
/// The shared `parameters` bucket is kept apart from the HTTP-method operations;
/// any other key is carried verbatim in `extra`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PathItem {
    /// Parameters shared by every operation of this path.
    pub parameters: Option<Vec<Parameter>>,
    /// Operations by lowercase HTTP method.
    pub operations: IndexMap<String, Operation>,
    /// Keys that are neither an HTTP method nor `parameters`.
    pub extra: IndexMap<String, Value>,
}

impl PathItem {
    /// Returns the operation for the given HTTP method, if documented.
    pub fn operation_mut(&mut self, method: &http::Method) -> Option<&mut Operation> {
        let key = method.as_str().to_ascii_lowercase();
        self.operations.get_mut(&key)
    }

    /// Adds an operation for the given HTTP method.
    pub fn with_operation(mut self, method: &http::Method, operation: Operation) -> Self {
        self.operations
            .insert(method.as_str().to_ascii_lowercase(), operation);
        self
    }
}

impl Serialize for PathItem {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.operations.len() + self.extra.len() + usize::from(self.parameters.is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(parameters) = &self.parameters {
            map.serialize_entry(PARAMETERS_KEY, parameters)?;
        }
        for (method, operation) in &self.operations {
            map.serialize_entry(method, operation)?;
        }
        for (key, value) in &self.extra {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for PathItem {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let entries = IndexMap::<String, Value>::deserialize(deserializer)?;

        let mut item = Self::default();
        for (key, value) in entries {
            if key == PARAMETERS_KEY {
                let parameters = serde_json::from_value(value)
                    .map_err(|err| D::Error::custom(format!("{PARAMETERS_KEY}: {err}")))?;
                item.parameters = Some(parameters);
            } else if OPERATION_METHODS.contains(&key.as_str()) {
                let operation = serde_json::from_value(value)
                    .map_err(|err| D::Error::custom(format!("{key}: {err}")))?;
                item.operations.insert(key, operation);
            } else {
                item.extra.insert(key, value);
            }
        }
        Ok(item)
    }
}
