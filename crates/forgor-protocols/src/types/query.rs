//! Relevance query results.
//!
//! The check endpoint has answered with the hit list under `images`,
//! `results` or `items` depending on server version. [`QueryResult`]
//! normalizes that once at the API boundary.

use serde_json::{Map, Value};

use crate::error::ClientError;

/// Name of the score field carried by result items.
pub const SCORE_FIELD: &str = "hybrid_score";

/// Minimum score for an item to count as relevant.
pub const DEFAULT_RELEVANCE_THRESHOLD: f64 = 0.25;

/// Which response field held the result array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultField {
    Images,
    Results,
    Items,
}

impl ResultField {
    /// Lookup order used when normalizing a response.
    pub const ALL: [ResultField; 3] = [Self::Images, Self::Results, Self::Items];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Images => "images",
            Self::Results => "results",
            Self::Items => "items",
        }
    }
}

/// Normalized response of the relevance check endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryResult {
    field: ResultField,
    items: Vec<Value>,
    /// Remaining top-level fields, passed back to the UI untouched.
    rest: Map<String, Value>,
}

impl QueryResult {
    pub fn new(field: ResultField, items: Vec<Value>) -> Self {
        Self {
            field,
            items,
            rest: Map::new(),
        }
    }

    /// Normalize a decoded response body.
    ///
    /// The first of `images`, `results`, `items` that is present and not
    /// null wins. Anything else is [`ClientError::UnrecognizedShape`].
    pub fn from_value(value: Value) -> Result<Self, ClientError> {
        let Value::Object(mut rest) = value else {
            return Err(ClientError::UnrecognizedShape(
                "expected a JSON object".to_string(),
            ));
        };

        for field in ResultField::ALL {
            match rest.remove(field.as_str()) {
                None | Some(Value::Null) => continue,
                Some(Value::Array(items)) => return Ok(Self { field, items, rest }),
                Some(_) => {
                    return Err(ClientError::UnrecognizedShape(format!(
                        "`{}` is not an array",
                        field.as_str()
                    )));
                }
            }
        }

        Err(ClientError::UnrecognizedShape(
            "none of images, results, items present".to_string(),
        ))
    }

    /// Parse and normalize a raw response body.
    pub fn from_body(body: &str) -> Result<Self, ClientError> {
        let value: Value = serde_json::from_str(body)?;
        Self::from_value(value)
    }

    /// Score of a single item, when it carries one.
    pub fn score(item: &Value) -> Option<f64> {
        item.get(SCORE_FIELD).and_then(Value::as_f64)
    }

    /// Drop items scored below `threshold`. Unscored items are kept.
    pub fn filter_by_score(mut self, threshold: f64) -> Self {
        self.items
            .retain(|item| Self::score(item).is_none_or(|score| score >= threshold));
        self
    }

    pub fn field(&self) -> ResultField {
        self.field
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Rebuild the JSON object, with the (possibly filtered) array restored
    /// under its original field name.
    pub fn to_value(&self) -> Value {
        let mut body = self.rest.clone();
        body.insert(
            self.field.as_str().to_string(),
            Value::Array(self.items.clone()),
        );
        Value::Object(body)
    }

    pub fn to_json_string(&self) -> String {
        self.to_value().to_string()
    }
}

#[cfg(test)]
#[path = "query_tests.rs"]
mod tests;
