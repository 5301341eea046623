//! Task variable records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TaskId;
use crate::error::QueryError;

/// Value kind implied by a declared variable type name.
///
/// Accepts both the short engine names (`string`, `integer`, ...) and the
/// JVM class names emitted by process engines (`java.lang.String`, ...).
/// Names that are neither are treated as opaque JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableType {
    String,
    Integer,
    Long,
    Double,
    Boolean,
    Date,
    Json,
}

impl VariableType {
    pub fn from_type_name(name: &str) -> Self {
        match name {
            "string" | "java.lang.String" => VariableType::String,
            "integer" | "java.lang.Integer" => VariableType::Integer,
            "long" | "java.lang.Long" => VariableType::Long,
            "double" | "java.lang.Double" | "java.lang.Float" => VariableType::Double,
            "boolean" | "java.lang.Boolean" => VariableType::Boolean,
            "date" | "java.util.Date" => VariableType::Date,
            _ => VariableType::Json,
        }
    }

    /// Returns true if `value` is an acceptable payload for this type.
    ///
    /// `null` is accepted by every type.
    pub fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (_, Value::Null) => true,
            (VariableType::String, Value::String(_)) => true,
            (VariableType::Integer, Value::Number(n)) => n
                .as_i64()
                .is_some_and(|v| i32::try_from(v).is_ok()),
            (VariableType::Long, Value::Number(n)) => n.is_i64() || n.is_u64(),
            (VariableType::Double, Value::Number(_)) => true,
            (VariableType::Boolean, Value::Bool(_)) => true,
            (VariableType::Date, Value::String(s)) => DateTime::parse_from_rfc3339(s).is_ok(),
            (VariableType::Date, Value::Number(n)) => n.is_i64(),
            (VariableType::Json, _) => true,
            _ => false,
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// A variable attached to a task, as produced by the owning process engine.
///
/// `id` and `task_id` cannot change after construction, and the value always
/// satisfies the declared type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "VariableRecordData")]
pub struct VariableRecord {
    id: u64,
    #[serde(rename = "type")]
    type_name: String,
    #[serde(skip)]
    variable_type: VariableType,
    name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    process_instance_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    service_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    service_full_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    service_version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    app_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    app_version: Option<String>,
    task_id: TaskId,
    create_time: DateTime<Utc>,
    last_updated_time: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    execution_id: Option<String>,
    value: Value,
}

impl VariableRecord {
    /// Creates a variable with both timestamps set to now.
    ///
    /// # Errors
    /// `QueryError::TypeMismatch` if `value` does not fit `type_name`.
    pub fn new(
        id: u64,
        type_name: impl Into<String>,
        name: impl Into<String>,
        task_id: TaskId,
        value: Value,
    ) -> Result<Self, QueryError> {
        let type_name = type_name.into();
        let name = name.into();
        let variable_type = VariableType::from_type_name(&type_name);
        check_value(&name, &type_name, variable_type, &value)?;
        let now = Utc::now();
        Ok(Self {
            id,
            type_name,
            variable_type,
            name,
            process_instance_id: None,
            service_name: None,
            service_full_name: None,
            service_version: None,
            app_name: None,
            app_version: None,
            task_id,
            create_time: now,
            last_updated_time: now,
            execution_id: None,
            value,
        })
    }

    pub fn with_process_instance_id(mut self, id: impl Into<String>) -> Self {
        self.process_instance_id = Some(id.into());
        self
    }

    pub fn with_execution_id(mut self, id: impl Into<String>) -> Self {
        self.execution_id = Some(id.into());
        self
    }

    pub fn with_app(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.app_name = Some(name.into());
        self.app_version = Some(version.into());
        self
    }

    pub fn with_service(
        mut self,
        name: impl Into<String>,
        full_name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        self.service_name = Some(name.into());
        self.service_full_name = Some(full_name.into());
        self.service_version = Some(version.into());
        self
    }

    pub fn with_timestamps(mut self, created: DateTime<Utc>, last_updated: DateTime<Utc>) -> Self {
        self.create_time = created;
        self.last_updated_time = last_updated;
        self
    }

    /// Replaces the value, keeping the declared type.
    pub fn set_value(&mut self, value: Value) -> Result<(), QueryError> {
        check_value(&self.name, &self.type_name, self.variable_type, &value)?;
        self.value = value;
        Ok(())
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn variable_type(&self) -> VariableType {
        self.variable_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn process_instance_id(&self) -> Option<&str> {
        self.process_instance_id.as_deref()
    }

    pub fn app_name(&self) -> Option<&str> {
        self.app_name.as_deref()
    }

    pub fn app_version(&self) -> Option<&str> {
        self.app_version.as_deref()
    }

    pub fn service_name(&self) -> Option<&str> {
        self.service_name.as_deref()
    }

    pub fn task_id(&self) -> &TaskId {
        &self.task_id
    }

    pub fn create_time(&self) -> DateTime<Utc> {
        self.create_time
    }

    pub fn last_updated_time(&self) -> DateTime<Utc> {
        self.last_updated_time
    }

    pub fn execution_id(&self) -> Option<&str> {
        self.execution_id.as_deref()
    }

    pub fn value(&self) -> &Value {
        &self.value
    }
}

fn check_value(
    name: &str,
    type_name: &str,
    variable_type: VariableType,
    value: &Value,
) -> Result<(), QueryError> {
    if variable_type.accepts(value) {
        Ok(())
    } else {
        Err(QueryError::TypeMismatch {
            name: name.to_string(),
            declared: type_name.to_string(),
            got: json_kind(value).to_string(),
        })
    }
}

/// Wire form of a variable, validated into a `VariableRecord`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VariableRecordData {
    id: u64,
    #[serde(rename = "type")]
    type_name: String,
    name: String,
    process_instance_id: Option<String>,
    service_name: Option<String>,
    service_full_name: Option<String>,
    service_version: Option<String>,
    app_name: Option<String>,
    app_version: Option<String>,
    task_id: TaskId,
    create_time: Option<DateTime<Utc>>,
    last_updated_time: Option<DateTime<Utc>>,
    execution_id: Option<String>,
    #[serde(default)]
    value: Value,
}

impl TryFrom<VariableRecordData> for VariableRecord {
    type Error = QueryError;

    fn try_from(data: VariableRecordData) -> Result<Self, Self::Error> {
        let mut record = VariableRecord::new(
            data.id,
            data.type_name,
            data.name,
            data.task_id,
            data.value,
        )?;
        let created = data.create_time.unwrap_or(record.create_time);
        let last_updated = data.last_updated_time.unwrap_or(created);
        record.create_time = created;
        record.last_updated_time = last_updated;
        record.process_instance_id = data.process_instance_id;
        record.service_name = data.service_name;
        record.service_full_name = data.service_full_name;
        record.service_version = data.service_version;
        record.app_name = data.app_name;
        record.app_version = data.app_version;
        record.execution_id = data.execution_id;
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn task(id: &str) -> TaskId {
        TaskId::parse(id).unwrap()
    }

    #[test]
    fn test_type_name_parsing() {
        assert_eq!(
            VariableType::from_type_name("java.lang.String"),
            VariableType::String
        );
        assert_eq!(VariableType::from_type_name("string"), VariableType::String);
        assert_eq!(VariableType::from_type_name("long"), VariableType::Long);
        assert_eq!(
            VariableType::from_type_name("java.util.Date"),
            VariableType::Date
        );
        assert_eq!(
            VariableType::from_type_name("com.acme.Order"),
            VariableType::Json
        );
    }

    #[test]
    fn test_value_must_match_declared_type() {
        let ok = VariableRecord::new(1, "java.lang.String", "firstName", task("t1"), json!("John"));
        assert!(ok.is_ok());

        let err = VariableRecord::new(2, "java.lang.String", "age", task("t1"), json!(42))
            .unwrap_err();
        assert_eq!(
            err,
            QueryError::TypeMismatch {
                name: "age".to_string(),
                declared: "java.lang.String".to_string(),
                got: "number".to_string(),
            }
        );

        assert!(VariableRecord::new(3, "integer", "n", task("t1"), json!(3_000_000_000u64)).is_err());
        assert!(VariableRecord::new(4, "long", "n", task("t1"), json!(3_000_000_000u64)).is_ok());
        assert!(VariableRecord::new(5, "boolean", "b", task("t1"), json!("yes")).is_err());
        assert!(VariableRecord::new(6, "date", "d", task("t1"), json!("2024-01-02T03:04:05Z")).is_ok());
        assert!(VariableRecord::new(7, "date", "d", task("t1"), json!("yesterday")).is_err());
        assert!(VariableRecord::new(8, "json", "j", task("t1"), json!({"a": [1, 2]})).is_ok());
        assert!(VariableRecord::new(9, "boolean", "b", task("t1"), Value::Null).is_ok());
    }

    #[test]
    fn test_set_value_keeps_type() {
        let mut record =
            VariableRecord::new(1, "string", "firstName", task("t1"), json!("John")).unwrap();
        record.set_value(json!("Jane")).unwrap();
        assert_eq!(record.value(), &json!("Jane"));

        assert!(record.set_value(json!(true)).is_err());
        assert_eq!(record.value(), &json!("Jane"));
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let created = DateTime::parse_from_rfc3339("2024-05-01T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let record = VariableRecord::new(1, "java.lang.String", "firstName", task("t1"), json!("John"))
            .unwrap()
            .with_app("My app", "1")
            .with_process_instance_id("p1")
            .with_timestamps(created, created);

        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["id"], json!(1));
        assert_eq!(value["type"], json!("java.lang.String"));
        assert_eq!(value["name"], json!("firstName"));
        assert_eq!(value["taskId"], json!("t1"));
        assert_eq!(value["appName"], json!("My app"));
        assert_eq!(value["appVersion"], json!("1"));
        assert_eq!(value["processInstanceId"], json!("p1"));
        assert_eq!(value["createTime"], json!("2024-05-01T10:00:00Z"));
        assert_eq!(value["value"], json!("John"));
        assert!(value.get("serviceName").is_none());
        assert!(value.get("executionId").is_none());
        assert!(value.get("variableType").is_none());
    }

    #[test]
    fn test_deserialize_validates_value() {
        let record: VariableRecord = serde_json::from_value(json!({
            "id": 7,
            "type": "integer",
            "name": "count",
            "taskId": "t9",
            "createTime": "2024-05-01T10:00:00Z",
            "value": 5
        }))
        .unwrap();
        assert_eq!(record.id(), 7);
        assert_eq!(record.variable_type(), VariableType::Integer);
        assert_eq!(record.create_time(), record.last_updated_time());

        let bad = serde_json::from_value::<VariableRecord>(json!({
            "id": 8,
            "type": "integer",
            "name": "count",
            "taskId": "t9",
            "value": "five"
        }));
        assert!(bad.is_err());
    }
}
