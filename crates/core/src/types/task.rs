//! Task record and the create-task validation boundary.
//!
//! [`Task`] is the record the store returns. [`CreateTaskRequest`] is the wire
//! body of a create call with every field optional, and [`NewTask`] is what
//! the store is allowed to insert once the request passed validation in the
//! configured [`ValidationMode`].

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};

use super::{ClockTime, ClockTimeError, PlanDate, PlanDateError, TaskId};

/// A to-do item scoped to one calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    /// Grouping key, `YYYY-MM-DD` unless stored in lenient mode.
    pub date: String,
    #[serde(rename = "todo")]
    pub description: String,
    #[serde(default)]
    pub start_time: Option<String>,
    #[serde(default)]
    pub end_time: Option<String>,
    #[serde(default)]
    pub completed: bool,
}

impl Task {
    /// Whether this task belongs to `date`.
    ///
    /// This is an exact string match against the ISO form of the date, the
    /// same rule the planner uses to decide what is visible.
    #[must_use]
    pub fn is_on(&self, date: &PlanDate) -> bool {
        self.date == date.to_string()
    }

    /// `"09:00 - 10:00"` when both ends are set and non-empty.
    #[must_use]
    pub fn time_range(&self) -> Option<String> {
        match (self.start_time.as_deref(), self.end_time.as_deref()) {
            (Some(start), Some(end)) if !start.is_empty() && !end.is_empty() => {
                Some(format!("{start} - {end}"))
            }
            _ => None,
        }
    }
}

/// Body of a create-task call.
///
/// Every field is optional so that a lenient store can accept what the legacy
/// client sent, and so that a strict store can name the missing field instead
/// of failing deserialization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CreateTaskRequest {
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar_as_string"
    )]
    pub date: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar_as_string"
    )]
    pub todo: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar_as_string"
    )]
    pub start_time: Option<String>,
    #[serde(
        skip_serializing_if = "Option::is_none",
        deserialize_with = "scalar_as_string"
    )]
    pub end_time: Option<String>,
}

/// Any JSON scalar a legacy client might put in a text field.
#[derive(Deserialize)]
#[serde(untagged)]
enum Scalar {
    Text(String),
    Int(i64),
    Uint(u64),
    Float(f64),
    Bool(bool),
}

/// Coerce a scalar to its string form. `null` is unset; objects and arrays
/// are still rejected.
fn scalar_as_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Scalar>::deserialize(deserializer)?.map(|value| match value {
        Scalar::Text(s) => s,
        Scalar::Int(n) => n.to_string(),
        Scalar::Uint(n) => n.to_string(),
        Scalar::Float(n) => n.to_string(),
        Scalar::Bool(b) => b.to_string(),
    }))
}

impl CreateTaskRequest {
    /// Build a request for `todo` on `date` with no times.
    #[must_use]
    pub fn new(date: PlanDate, todo: impl Into<String>) -> Self {
        Self {
            date: Some(date.to_string()),
            todo: Some(todo.into()),
            start_time: None,
            end_time: None,
        }
    }

    /// Set the start and end times.
    #[must_use]
    pub fn with_times(mut self, start: ClockTime, end: ClockTime) -> Self {
        self.start_time = Some(start.to_string());
        self.end_time = Some(end.to_string());
        self
    }

    /// Run the validation boundary.
    ///
    /// # Errors
    ///
    /// In [`ValidationMode::Strict`], returns `TaskInputError` when the date is
    /// missing or not a real `YYYY-MM-DD` day, the description is missing,
    /// blank or too long, or a time is present but not `HH:MM`.
    /// [`ValidationMode::Lenient`] never fails.
    pub fn validate(self, mode: ValidationMode) -> Result<NewTask, TaskInputError> {
        match mode {
            ValidationMode::Lenient => Ok(NewTask {
                date: self.date.unwrap_or_default(),
                description: self.todo.unwrap_or_default(),
                start_time: self.start_time,
                end_time: self.end_time,
            }),
            ValidationMode::Strict => {
                let date = self.date.ok_or(TaskInputError::MissingField("date"))?;
                let date = PlanDate::parse(&date)?;

                let todo = self.todo.ok_or(TaskInputError::MissingField("todo"))?;
                let description = todo.trim();
                if description.is_empty() {
                    return Err(TaskInputError::EmptyDescription);
                }
                if description.chars().count() > NewTask::MAX_DESCRIPTION_CHARS {
                    return Err(TaskInputError::DescriptionTooLong {
                        max: NewTask::MAX_DESCRIPTION_CHARS,
                    });
                }

                let start_time = strict_time(self.start_time)
                    .map_err(TaskInputError::InvalidStartTime)?;
                let end_time =
                    strict_time(self.end_time).map_err(TaskInputError::InvalidEndTime)?;

                Ok(NewTask {
                    date: date.to_string(),
                    description: description.to_owned(),
                    start_time,
                    end_time,
                })
            }
        }
    }
}

/// Empty strings count as "not set"; anything else must be `HH:MM`.
fn strict_time(value: Option<String>) -> Result<Option<String>, ClockTimeError> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => ClockTime::parse(s).map(|t| Some(t.to_string())),
    }
}

/// A task that passed the validation boundary and may be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    pub date: String,
    pub description: String,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
}

impl NewTask {
    /// Longest accepted description in strict mode.
    pub const MAX_DESCRIPTION_CHARS: usize = 500;

    /// Materialize the record a store returns for this insert.
    #[must_use]
    pub fn into_task(self, id: TaskId) -> Task {
        Task {
            id,
            date: self.date,
            description: self.description,
            start_time: self.start_time,
            end_time: self.end_time,
            completed: false,
        }
    }
}

/// Body of an update-completion call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionUpdate {
    pub completed: bool,
}

/// How strictly the create boundary checks its input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Reject malformed dates, blank descriptions and malformed times.
    #[default]
    Strict,
    /// Accept anything, storing missing fields as empty strings.
    Lenient,
}

impl FromStr for ValidationMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(Self::Strict),
            "lenient" => Ok(Self::Lenient),
            other => Err(format!("expected 'strict' or 'lenient', got '{other}'")),
        }
    }
}

/// Reasons a create request is rejected in strict mode.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TaskInputError {
    #[error("missing field: {0}")]
    MissingField(&'static str),

    #[error("invalid date: {0}")]
    InvalidDate(#[from] PlanDateError),

    #[error("description cannot be blank")]
    EmptyDescription,

    #[error("description must be at most {max} characters")]
    DescriptionTooLong { max: usize },

    #[error("invalid startTime: {0}")]
    InvalidStartTime(ClockTimeError),

    #[error("invalid endTime: {0}")]
    InvalidEndTime(ClockTimeError),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn request(date: &str, todo: &str, start: &str, end: &str) -> CreateTaskRequest {
        CreateTaskRequest {
            date: Some(date.to_owned()),
            todo: Some(todo.to_owned()),
            start_time: Some(start.to_owned()),
            end_time: Some(end.to_owned()),
        }
    }

    #[test]
    fn test_strict_accepts_well_formed_request() {
        let task = request("2024-06-01", "  Write report ", "09:00", "10:00")
            .validate(ValidationMode::Strict)
            .unwrap();
        assert_eq!(task.date, "2024-06-01");
        assert_eq!(task.description, "Write report");
        assert_eq!(task.start_time.as_deref(), Some("09:00"));
        assert_eq!(task.end_time.as_deref(), Some("10:00"));
    }

    #[test]
    fn test_strict_does_not_order_times() {
        let task = request("2024-06-01", "Night shift", "22:00", "06:00")
            .validate(ValidationMode::Strict)
            .unwrap();
        assert_eq!(task.start_time.as_deref(), Some("22:00"));
    }

    #[test]
    fn test_strict_treats_empty_times_as_unset() {
        let task = request("2024-06-01", "Call mom", "", " ")
            .validate(ValidationMode::Strict)
            .unwrap();
        assert_eq!(task.start_time, None);
        assert_eq!(task.end_time, None);
    }

    #[test]
    fn test_strict_rejects_missing_todo() {
        let req = CreateTaskRequest {
            date: Some("2024-06-01".to_owned()),
            ..CreateTaskRequest::default()
        };
        assert_eq!(
            req.validate(ValidationMode::Strict),
            Err(TaskInputError::MissingField("todo"))
        );
    }

    #[test]
    fn test_strict_rejects_blank_and_long_descriptions() {
        assert_eq!(
            request("2024-06-01", "   ", "", "").validate(ValidationMode::Strict),
            Err(TaskInputError::EmptyDescription)
        );

        let long = "x".repeat(NewTask::MAX_DESCRIPTION_CHARS + 1);
        assert!(matches!(
            request("2024-06-01", &long, "", "").validate(ValidationMode::Strict),
            Err(TaskInputError::DescriptionTooLong { .. })
        ));
    }

    #[test]
    fn test_strict_rejects_bad_date_and_times() {
        assert!(matches!(
            request("June 1st", "x", "", "").validate(ValidationMode::Strict),
            Err(TaskInputError::InvalidDate(_))
        ));
        assert!(matches!(
            request("2024-06-01", "x", "9am", "").validate(ValidationMode::Strict),
            Err(TaskInputError::InvalidStartTime(_))
        ));
        assert!(matches!(
            request("2024-06-01", "x", "09:00", "25:00").validate(ValidationMode::Strict),
            Err(TaskInputError::InvalidEndTime(_))
        ));
    }

    #[test]
    fn test_lenient_accepts_missing_fields() {
        let task = CreateTaskRequest::default()
            .validate(ValidationMode::Lenient)
            .unwrap();
        assert_eq!(task.date, "");
        assert_eq!(task.description, "");
        assert_eq!(task.start_time, None);
    }

    #[test]
    fn test_lenient_keeps_garbage_verbatim() {
        let task = request("tomorrow", "", "late", "later")
            .validate(ValidationMode::Lenient)
            .unwrap();
        assert_eq!(task.date, "tomorrow");
        assert_eq!(task.start_time.as_deref(), Some("late"));
    }

    #[test]
    fn test_into_task_starts_incomplete() {
        let id = TaskId::generate();
        let task = request("2024-06-01", "x", "", "")
            .validate(ValidationMode::Strict)
            .unwrap()
            .into_task(id);
        assert_eq!(task.id, id);
        assert!(!task.completed);
    }

    #[test]
    fn test_is_on_is_exact_match() {
        let task = request("2024-05-01", "x", "", "")
            .validate(ValidationMode::Strict)
            .unwrap()
            .into_task(TaskId::generate());
        assert!(task.is_on(&PlanDate::parse("2024-05-01").unwrap()));
        assert!(!task.is_on(&PlanDate::parse("2024-05-02").unwrap()));
    }

    #[test]
    fn test_time_range_needs_both_ends() {
        let mut task = request("2024-06-01", "x", "09:00", "10:00")
            .validate(ValidationMode::Strict)
            .unwrap()
            .into_task(TaskId::generate());
        assert_eq!(task.time_range().as_deref(), Some("09:00 - 10:00"));

        task.end_time = None;
        assert_eq!(task.time_range(), None);
    }

    #[test]
    fn test_task_json_shape() {
        let id = TaskId::parse("0b0c6f3e-6d3c-4a8e-9f0e-2a8b8f7c1d11").unwrap();
        let task = request("2024-06-01", "Write report", "09:00", "10:00")
            .validate(ValidationMode::Strict)
            .unwrap()
            .into_task(id);

        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "id": "0b0c6f3e-6d3c-4a8e-9f0e-2a8b8f7c1d11",
                "date": "2024-06-01",
                "todo": "Write report",
                "startTime": "09:00",
                "endTime": "10:00",
                "completed": false,
            })
        );
    }

    #[test]
    fn test_create_request_accepts_partial_json() {
        let req: CreateTaskRequest = serde_json::from_str(r#"{"date":"2024-06-01"}"#).unwrap();
        assert_eq!(req.date.as_deref(), Some("2024-06-01"));
        assert_eq!(req.todo, None);
    }

    #[test]
    fn test_create_request_coerces_scalars() {
        let req: CreateTaskRequest = serde_json::from_str(
            r#"{"date":20240601,"todo":5,"startTime":true,"endTime":null}"#,
        )
        .unwrap();
        assert_eq!(req.date.as_deref(), Some("20240601"));
        assert_eq!(req.todo.as_deref(), Some("5"));
        assert_eq!(req.start_time.as_deref(), Some("true"));
        assert_eq!(req.end_time, None);

        assert!(serde_json::from_str::<CreateTaskRequest>(r#"{"todo":{"a":1}}"#).is_err());
        assert!(serde_json::from_str::<CreateTaskRequest>(r#"{"todo":[1]}"#).is_err());
    }

    #[test]
    fn test_validation_mode_from_str() {
        assert_eq!("STRICT".parse::<ValidationMode>(), Ok(ValidationMode::Strict));
        assert_eq!(" lenient".parse::<ValidationMode>(), Ok(ValidationMode::Lenient));
        assert!("loose".parse::<ValidationMode>().is_err());
    }
}
