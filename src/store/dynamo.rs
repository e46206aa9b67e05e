//! DynamoDB-backed [`EventStore`].

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::config::Region;
use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_dynamodb::operation::update_item::UpdateItemError;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client;
use serde_json::{Number, Value};
use std::collections::HashMap;
use std::fmt;
use tokio::sync::OnceCell;

use super::{
    AttributePath, Condition, EventStore, Item, StoreError, UpdateAction, UpdateItem,
    KEY_ATTRIBUTE,
};

#[derive(Debug, Clone, Default)]
pub struct DynamoSettings {
    pub table: String,
    /// Overrides the SDK endpoint, e.g. DynamoDB Local.
    pub endpoint: Option<String>,
    pub region: Option<String>,
}

/// The SDK client is built on first use and shared for the rest of the
/// process lifetime.
pub struct DynamoStore {
    settings: DynamoSettings,
    client: OnceCell<Client>,
}

impl DynamoStore {
    pub fn new(settings: DynamoSettings) -> Self {
        Self {
            settings,
            client: OnceCell::new(),
        }
    }

    pub fn table(&self) -> &str {
        &self.settings.table
    }

    async fn client(&self) -> &Client {
        self.client
            .get_or_init(|| async {
                let mut loader = aws_config::defaults(BehaviorVersion::latest());
                if let Some(region) = &self.settings.region {
                    loader = loader.region(Region::new(region.clone()));
                }
                if let Some(endpoint) = &self.settings.endpoint {
                    loader = loader.endpoint_url(endpoint.clone());
                }
                let sdk_config = loader.load().await;

                tracing::info!(
                    table = %self.settings.table,
                    endpoint = ?self.settings.endpoint,
                    "DynamoDB client initialized"
                );
                Client::new(&sdk_config)
            })
            .await
    }
}

#[async_trait]
impl EventStore for DynamoStore {
    async fn get_item(&self, key: &str) -> Result<Option<Item>, StoreError> {
        let output = self
            .client()
            .await
            .get_item()
            .table_name(self.table())
            .key(KEY_ATTRIBUTE, AttributeValue::S(key.to_string()))
            .send()
            .await
            .map_err(classify)?;

        output.item().map(from_attributes).transpose()
    }

    async fn put_item(&self, item: Item) -> Result<(), StoreError> {
        self.client()
            .await
            .put_item()
            .table_name(self.table())
            .set_item(Some(to_attributes(&item)))
            .send()
            .await
            .map_err(classify)?;
        Ok(())
    }

    async fn update_item(&self, update: UpdateItem) -> Result<Item, StoreError> {
        let expressions = render(&update);
        tracing::debug!(
            key = %update.key,
            update = %expressions.update,
            condition = ?expressions.condition,
            "DynamoDB update_item"
        );

        let values = (!expressions.values.is_empty()).then(|| {
            expressions
                .values
                .iter()
                .map(|(placeholder, value)| (placeholder.clone(), to_attribute(value)))
                .collect::<HashMap<_, _>>()
        });

        let output = self
            .client()
            .await
            .update_item()
            .table_name(self.table())
            .key(KEY_ATTRIBUTE, AttributeValue::S(update.key.clone()))
            .update_expression(expressions.update)
            .set_condition_expression(expressions.condition)
            .set_expression_attribute_names(Some(expressions.names))
            .set_expression_attribute_values(values)
            .return_values(ReturnValue::AllNew)
            .send()
            .await
            .map_err(|err| {
                if matches!(
                    err.as_service_error(),
                    Some(UpdateItemError::ConditionalCheckFailedException(_))
                ) {
                    StoreError::ConditionFailed
                } else {
                    classify(err)
                }
            })?;

        output
            .attributes()
            .map(from_attributes)
            .transpose()?
            .ok_or_else(|| StoreError::Malformed("update returned no attributes".to_string()))
    }
}

fn classify<E, R>(err: SdkError<E, R>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: fmt::Debug,
{
    error_for_code(err.code(), err.message())
        .unwrap_or_else(|| StoreError::Backend(DisplayErrorContext(&err).to_string()))
}

/// Maps the service error codes that carry request semantics. Any other
/// code is a backend failure.
fn error_for_code(code: Option<&str>, message: Option<&str>) -> Option<StoreError> {
    match code? {
        "ConditionalCheckFailedException" => Some(StoreError::ConditionFailed),
        "ValidationException" => Some(StoreError::InvalidPath(
            message.unwrap_or("validation failed").to_string(),
        )),
        _ => None,
    }
}

/// Update, condition and placeholder maps ready to hand to `UpdateItem`.
#[derive(Debug, Default, PartialEq)]
pub struct Expressions {
    pub update: String,
    pub condition: Option<String>,
    pub names: HashMap<String, String>,
    pub values: HashMap<String, Value>,
}

#[derive(Default)]
struct Placeholders {
    names: HashMap<String, String>,
    by_name: HashMap<String, String>,
    values: HashMap<String, Value>,
}

impl Placeholders {
    fn name(&mut self, segment: &str) -> String {
        if let Some(placeholder) = self.by_name.get(segment) {
            return placeholder.clone();
        }
        let placeholder = format!("#n{}", self.by_name.len());
        self.by_name.insert(segment.to_string(), placeholder.clone());
        self.names.insert(placeholder.clone(), segment.to_string());
        placeholder
    }

    fn path(&mut self, path: &AttributePath) -> String {
        path.segments()
            .iter()
            .map(|segment| self.name(segment))
            .collect::<Vec<_>>()
            .join(".")
    }

    fn value(&mut self, value: Value) -> String {
        let placeholder = format!(":v{}", self.values.len());
        self.values.insert(placeholder.clone(), value);
        placeholder
    }
}

/// Renders an [`UpdateItem`] into DynamoDB expression syntax. Every path
/// segment goes through a `#n` placeholder so user-supplied ids never collide
/// with reserved words.
pub fn render(update: &UpdateItem) -> Expressions {
    let mut placeholders = Placeholders::default();
    let mut sets = Vec::new();
    let mut removes = Vec::new();

    for action in &update.actions {
        match action {
            UpdateAction::Set { path, value } => {
                let path = placeholders.path(path);
                let value = placeholders.value(value.clone());
                sets.push(format!("{path} = {value}"));
            }
            UpdateAction::Add { path, delta } => {
                let path = placeholders.path(path);
                let operator = if *delta < 0 { '-' } else { '+' };
                let value = placeholders.value(Value::from(delta.unsigned_abs()));
                sets.push(format!("{path} = {path} {operator} {value}"));
            }
            UpdateAction::Remove { path } => removes.push(placeholders.path(path)),
        }
    }

    let mut clauses = Vec::new();
    if !sets.is_empty() {
        clauses.push(format!("SET {}", sets.join(", ")));
    }
    if !removes.is_empty() {
        clauses.push(format!("REMOVE {}", removes.join(", ")));
    }

    let condition = update.condition.as_ref().map(|condition| match condition {
        Condition::AttributeExists(path) => {
            format!("attribute_exists({})", placeholders.path(path))
        }
        Condition::AttributeNotExists(path) => {
            format!("attribute_not_exists({})", placeholders.path(path))
        }
        Condition::GreaterThan(path, bound) => {
            let path = placeholders.path(path);
            let value = placeholders.value(Value::from(*bound));
            format!("{path} > {value}")
        }
    });

    Expressions {
        update: clauses.join(" "),
        condition,
        names: placeholders.names,
        values: placeholders.values,
    }
}

pub fn to_attribute(value: &Value) -> AttributeValue {
    match value {
        Value::Null => AttributeValue::Null(true),
        Value::Bool(flag) => AttributeValue::Bool(*flag),
        Value::Number(number) => AttributeValue::N(number.to_string()),
        Value::String(text) => AttributeValue::S(text.clone()),
        Value::Array(items) => AttributeValue::L(items.iter().map(to_attribute).collect()),
        Value::Object(map) => AttributeValue::M(to_attributes(map)),
    }
}

pub fn to_attributes(map: &Item) -> HashMap<String, AttributeValue> {
    map.iter()
        .map(|(name, value)| (name.clone(), to_attribute(value)))
        .collect()
}

pub fn from_attribute(attribute: &AttributeValue) -> Result<Value, StoreError> {
    let value = match attribute {
        AttributeValue::S(text) => Value::String(text.clone()),
        AttributeValue::N(number) => parse_number(number)?,
        AttributeValue::Bool(flag) => Value::Bool(*flag),
        AttributeValue::Null(_) => Value::Null,
        AttributeValue::M(map) => Value::Object(from_attributes(map)?),
        AttributeValue::L(items) => Value::Array(
            items
                .iter()
                .map(from_attribute)
                .collect::<Result<_, _>>()?,
        ),
        AttributeValue::Ss(set) => Value::Array(set.iter().cloned().map(Value::String).collect()),
        AttributeValue::Ns(set) => Value::Array(
            set.iter()
                .map(|number| parse_number(number))
                .collect::<Result<_, _>>()?,
        ),
        other => {
            return Err(StoreError::Malformed(format!(
                "unsupported attribute type: {other:?}"
            )))
        }
    };
    Ok(value)
}

pub fn from_attributes(map: &HashMap<String, AttributeValue>) -> Result<Item, StoreError> {
    map.iter()
        .map(|(name, attribute)| Ok((name.clone(), from_attribute(attribute)?)))
        .collect()
}

fn parse_number(number: &str) -> Result<Value, StoreError> {
    if let Ok(integer) = number.parse::<i64>() {
        return Ok(Value::from(integer));
    }
    number
        .parse::<f64>()
        .ok()
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(|| StoreError::Malformed(format!("invalid number attribute: {number}")))
}
