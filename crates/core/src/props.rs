//! Serialized properties
//!
//! A set of named properties kept together as one JSON document in the
//! store. Records load lazily and are written back only when modified.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::client::ObjectStoreClient;
use crate::error::{Error, Result};

/// Values reported for properties missing from a document
#[derive(Debug, Clone, PartialEq)]
pub enum PropDefaults {
    /// One default per property; unlisted properties default to `null`
    PerField(Map<String, Value>),
    /// The same default for every property
    Uniform(Value),
}

impl Default for PropDefaults {
    fn default() -> Self {
        PropDefaults::Uniform(Value::Null)
    }
}

/// Declared properties and their defaults
#[derive(Debug, Clone, Default)]
pub struct PropsSchema {
    fields: Vec<String>,
    defaults: PropDefaults,
}

impl PropsSchema {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            fields: fields.into_iter().map(Into::into).collect(),
            defaults: PropDefaults::default(),
        }
    }

    pub fn with_defaults(mut self, defaults: PropDefaults) -> Self {
        self.defaults = defaults;
        self
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.iter().any(|f| f == field)
    }

    pub fn default_for(&self, field: &str) -> Value {
        match &self.defaults {
            PropDefaults::PerField(map) => map.get(field).cloned().unwrap_or(Value::Null),
            PropDefaults::Uniform(value) => value.clone(),
        }
    }

    fn check(&self, field: &str) -> Result<()> {
        if self.contains(field) {
            Ok(())
        } else {
            Err(Error::UnknownProperty(field.to_string()))
        }
    }

    fn value_of(&self, data: &Map<String, Value>, field: &str) -> Value {
        data.get(field)
            .cloned()
            .unwrap_or_else(|| self.default_for(field))
    }
}

async fn load_document(client: &ObjectStoreClient, name: Option<&str>) -> Result<Map<String, Value>> {
    match name {
        Some(name) if !name.is_empty() => {
            let content = client.fetch(name).await?;
            Ok(serde_json::from_slice(&content)?)
        }
        _ => Ok(Map::new()),
    }
}

/// Read every declared property of the document `name` without building a record
///
/// A missing or empty name yields the defaults.
pub async fn load_fields(
    client: &ObjectStoreClient,
    schema: &PropsSchema,
    name: Option<&str>,
) -> Result<Map<String, Value>> {
    let data = load_document(client, name).await?;
    Ok(schema
        .fields()
        .iter()
        .map(|field| (field.clone(), schema.value_of(&data, field)))
        .collect())
}

/// Read a single property of the document `name`
pub async fn load_field(
    client: &ObjectStoreClient,
    schema: &PropsSchema,
    name: Option<&str>,
    field: &str,
) -> Result<Value> {
    schema.check(field)?;
    let data = load_document(client, name).await?;
    Ok(schema.value_of(&data, field))
}

/// Write a fresh document holding `values` under `name`
pub async fn save_fields(
    client: &ObjectStoreClient,
    schema: &PropsSchema,
    name: &str,
    values: Map<String, Value>,
) -> Result<String> {
    for field in values.keys() {
        schema.check(field)?;
    }
    let body = serde_json::to_vec(&values)?;
    client.save(name, body, false).await
}

/// One stored document of properties
#[derive(Debug, Clone)]
pub struct SerializedProps {
    schema: Arc<PropsSchema>,
    name: Option<String>,
    data: Option<Map<String, Value>>,
    modified: bool,
}

impl SerializedProps {
    /// Record backed by the document `name`, or a new record when `None`
    pub fn new(schema: Arc<PropsSchema>, name: Option<String>) -> Self {
        Self {
            schema,
            name,
            data: None,
            modified: false,
        }
    }

    /// Name of the stored document, if any
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub async fn get(&mut self, client: &ObjectStoreClient, field: &str) -> Result<Value> {
        self.schema.check(field)?;
        let schema = self.schema.clone();
        let data = self.init_data(client).await?;
        Ok(schema.value_of(data, field))
    }

    pub async fn set(&mut self, client: &ObjectStoreClient, field: &str, value: Value) -> Result<()> {
        self.schema.check(field)?;
        let data = self.init_data(client).await?;
        data.insert(field.to_string(), value);
        self.modified = true;
        Ok(())
    }

    /// Write the document under `name` if anything changed
    ///
    /// Returns the stored name, or `None` when there was nothing to write.
    pub async fn save(&mut self, client: &ObjectStoreClient, name: &str) -> Result<Option<String>> {
        let Some(data) = self.data.as_ref().filter(|_| self.modified) else {
            return Ok(None);
        };

        let body = serde_json::to_vec(data)?;
        let stored = client.save(name, body, false).await?;
        self.name = Some(stored.clone());
        self.modified = false;
        Ok(Some(stored))
    }

    async fn init_data(&mut self, client: &ObjectStoreClient) -> Result<&mut Map<String, Value>> {
        if self.data.is_none() {
            self.data = Some(load_document(client, self.name.as_deref()).await?);
        }
        Ok(self.data.get_or_insert_with(Map::new))
    }
}
