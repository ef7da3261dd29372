//! Transform sink - decorates records before handing them on

use async_trait::async_trait;
use serde_json::{Map, Value};
use tracing::debug;

use super::{FacetSink, SinkError};

/// Merges static fields into every record, then delegates to `inner`
///
/// Configured fields overwrite record fields of the same name.
pub struct TransformSink {
    fields: Map<String, Value>,
    inner: Box<dyn FacetSink>,
}

impl TransformSink {
    pub fn new(fields: Map<String, Value>, inner: Box<dyn FacetSink>) -> Self {
        debug!(field_count = fields.len(), inner = inner.sink_type(), "TransformSink::new: called");
        Self { fields, inner }
    }

    /// Apply the configured fields to a payload
    pub fn transform(&self, payload: &Value) -> Value {
        match payload {
            Value::Object(map) => {
                let mut merged = map.clone();
                for (key, value) in &self.fields {
                    merged.insert(key.clone(), value.clone());
                }
                Value::Object(merged)
            }
            other => {
                let mut wrapped = self.fields.clone();
                wrapped.insert("payload".to_string(), other.clone());
                Value::Object(wrapped)
            }
        }
    }
}

#[async_trait]
impl FacetSink for TransformSink {
    async fn send(&self, payload: &Value) -> Result<(), SinkError> {
        let transformed = self.transform(payload);
        self.inner.send(&transformed).await
    }

    fn sink_type(&self) -> &'static str {
        "transform"
    }
}
