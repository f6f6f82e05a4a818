//! Task record, creation input and partial updates.

use super::{ParseStageError, Stage, TaskDomainError, TaskId, UserId};
use chrono::{DateTime, NaiveDate, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Fields a partial update is allowed to touch, in wire spelling.
pub const PATCHABLE_FIELDS: [&str; 6] = [
    "title",
    "description",
    "status",
    "due_date",
    "assignee_id",
    "progress",
];

/// Status value as read from the store.
///
/// The store does not enforce the stage enumeration, so a record may carry a
/// value outside it. Such values are kept verbatim rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TaskStatus {
    /// One of the board stages.
    Stage(Stage),
    /// A value outside the stage enumeration.
    Unrecognized(String),
}

impl TaskStatus {
    /// Returns the stage when the status is recognised.
    #[must_use]
    pub const fn stage(&self) -> Option<Stage> {
        match self {
            Self::Stage(stage) => Some(*stage),
            Self::Unrecognized(_) => None,
        }
    }

    /// Returns the raw wire value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Stage(stage) => stage.as_str(),
            Self::Unrecognized(raw) => raw,
        }
    }
}

impl From<Stage> for TaskStatus {
    fn from(stage: Stage) -> Self {
        Self::Stage(stage)
    }
}

impl From<&str> for TaskStatus {
    fn from(value: &str) -> Self {
        Stage::try_from(value).map_or_else(|_| Self::Unrecognized(value.to_owned()), Self::Stage)
    }
}

impl From<String> for TaskStatus {
    fn from(value: String) -> Self {
        match Stage::try_from(value.as_str()) {
            Ok(stage) => Self::Stage(stage),
            Err(ParseStageError(_)) => Self::Unrecognized(value),
        }
    }
}

impl From<TaskStatus> for String {
    fn from(status: TaskStatus) -> Self {
        match status {
            TaskStatus::Stage(stage) => stage.as_str().to_owned(),
            TaskStatus::Unrecognized(raw) => raw,
        }
    }
}

/// Task record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    title: String,
    description: Option<String>,
    status: TaskStatus,
    due_date: Option<NaiveDate>,
    assignee_id: Option<UserId>,
    progress: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted title.
    pub title: String,
    /// Persisted description, if any.
    pub description: Option<String>,
    /// Persisted status, possibly outside the stage enumeration.
    pub status: TaskStatus,
    /// Persisted due date, if any.
    pub due_date: Option<NaiveDate>,
    /// Persisted assignee reference, if any.
    pub assignee_id: Option<UserId>,
    /// Persisted raw progress.
    pub progress: i32,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest update timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Builds a freshly stored task from validated creation fields.
    #[must_use]
    pub fn create(id: TaskId, draft: &NewTask, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id,
            title: draft.title.clone(),
            description: draft.description.clone(),
            status: TaskStatus::Stage(draft.status),
            due_date: draft.due_date,
            assignee_id: draft.assignee_id,
            progress: draft.progress,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            title: data.title,
            description: data.description,
            status: data.status,
            due_date: data.due_date,
            assignee_id: data.assignee_id,
            progress: data.progress,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the stored status.
    #[must_use]
    pub const fn status(&self) -> &TaskStatus {
        &self.status
    }

    /// Returns the stage when the stored status is recognised.
    #[must_use]
    pub const fn stage(&self) -> Option<Stage> {
        self.status.stage()
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<NaiveDate> {
        self.due_date
    }

    /// Returns the assignee reference, if any. The user may no longer exist.
    #[must_use]
    pub const fn assignee_id(&self) -> Option<UserId> {
        self.assignee_id
    }

    /// Returns the raw progress value as stored.
    #[must_use]
    pub const fn progress(&self) -> i32 {
        self.progress
    }

    /// Returns progress clamped to `0..=100` for display.
    #[must_use]
    pub fn display_progress(&self) -> u8 {
        u8::try_from(self.progress.clamp(0, 100)).unwrap_or(0)
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest update timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Applies every field present in `patch` and refreshes `updated_at`.
    ///
    /// The identifier and creation timestamp are never touched.
    pub fn apply_patch(&mut self, patch: &TaskPatch, clock: &impl Clock) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(stage) = patch.status {
            self.status = TaskStatus::Stage(stage);
        }
        if let Some(due_date) = patch.due_date {
            self.due_date = due_date;
        }
        if let Some(assignee_id) = patch.assignee_id {
            self.assignee_id = assignee_id;
        }
        if let Some(progress) = patch.progress {
            self.progress = progress;
        }
        self.updated_at = clock.utc();
    }
}

/// Validated fields for a task about to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTask {
    /// Non-empty title.
    pub title: String,
    /// Description; empty input is stored as absent.
    pub description: Option<String>,
    /// Initial stage.
    pub status: Stage,
    /// Due date, if any.
    pub due_date: Option<NaiveDate>,
    /// Assignee reference, if any.
    pub assignee_id: Option<UserId>,
    /// Initial raw progress.
    pub progress: i32,
}

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: Option<String>,
    description: Option<String>,
    status: Option<Stage>,
    due_date: Option<NaiveDate>,
    assignee_id: Option<UserId>,
    progress: Option<i32>,
}

impl CreateTaskRequest {
    /// Creates a request with the given title and every other field defaulted.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(title.into()),
            description: None,
            status: None,
            due_date: None,
            assignee_id: None,
            progress: None,
        }
    }

    /// Parses a wire payload.
    ///
    /// Unknown keys are ignored. A missing title is not an error here; it is
    /// reported by [`CreateTaskRequest::validate`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the payload is not an object or a
    /// known field has the wrong shape.
    pub fn from_json(payload: &Value) -> Result<Self, TaskDomainError> {
        let object = payload.as_object().ok_or(TaskDomainError::NotAnObject)?;
        let title = match object.get("title") {
            None | Some(Value::Null) => None,
            Some(value) => Some(parse_string("title", value)?),
        };
        let status = match object.get("status") {
            None | Some(Value::Null) => None,
            Some(Value::String(raw)) if raw.is_empty() => None,
            Some(value) => Some(parse_stage(value)?),
        };
        let progress = match object.get("progress") {
            None | Some(Value::Null) => None,
            Some(value) => Some(parse_progress(value)?),
        };

        Ok(Self {
            title,
            description: field(object, "description", parse_description)?.flatten(),
            status,
            due_date: field(object, "due_date", parse_due_date)?.flatten(),
            assignee_id: field(object, "assignee_id", parse_assignee)?.flatten(),
            progress,
        })
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the initial stage.
    #[must_use]
    pub const fn with_status(mut self, status: Stage) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: NaiveDate) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee_id: UserId) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    /// Sets the initial progress.
    #[must_use]
    pub const fn with_progress(mut self, progress: i32) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Validates the request and applies creation defaults.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyTitle`] when the title is missing or
    /// blank.
    pub fn validate(self) -> Result<NewTask, TaskDomainError> {
        let title = self
            .title
            .filter(|title| !title.trim().is_empty())
            .ok_or(TaskDomainError::EmptyTitle)?;

        Ok(NewTask {
            title,
            description: self.description.filter(|text| !text.is_empty()),
            status: self.status.unwrap_or(Stage::Todo),
            due_date: self.due_date,
            assignee_id: self.assignee_id,
            progress: self.progress.unwrap_or(0),
        })
    }
}

/// Partial update restricted to the allow-listed task fields.
///
/// For nullable fields the outer `Option` says whether the field is being
/// changed and the inner one carries the new value, so `Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New title.
    pub title: Option<String>,
    /// New description.
    pub description: Option<Option<String>>,
    /// New stage.
    pub status: Option<Stage>,
    /// New due date.
    pub due_date: Option<Option<NaiveDate>>,
    /// New assignee reference.
    pub assignee_id: Option<Option<UserId>>,
    /// New raw progress.
    pub progress: Option<i32>,
}

impl TaskPatch {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Patch that only changes the stage.
    #[must_use]
    pub fn status(stage: Stage) -> Self {
        Self {
            status: Some(stage),
            ..Self::default()
        }
    }

    /// Parses a wire payload, keeping only allow-listed keys.
    ///
    /// Keys outside [`PATCHABLE_FIELDS`] are dropped without error. An empty
    /// result is not rejected here; see [`TaskPatch::validate`].
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError`] when the payload is not an object or an
    /// allow-listed field has the wrong shape.
    pub fn from_json(payload: &Value) -> Result<Self, TaskDomainError> {
        let object = payload.as_object().ok_or(TaskDomainError::NotAnObject)?;
        Ok(Self {
            title: field(object, "title", |value| parse_string("title", value))?,
            description: field(object, "description", parse_description)?,
            status: field(object, "status", parse_stage)?,
            due_date: field(object, "due_date", parse_due_date)?,
            assignee_id: field(object, "assignee_id", parse_assignee)?,
            progress: field(object, "progress", parse_progress)?,
        })
    }

    /// Sets the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets or clears the description.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = Some(description);
        self
    }

    /// Sets the stage.
    #[must_use]
    pub const fn with_status(mut self, stage: Stage) -> Self {
        self.status = Some(stage);
        self
    }

    /// Sets or clears the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: Option<NaiveDate>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets or clears the assignee.
    #[must_use]
    pub const fn with_assignee(mut self, assignee_id: Option<UserId>) -> Self {
        self.assignee_id = Some(assignee_id);
        self
    }

    /// Sets the raw progress.
    #[must_use]
    pub const fn with_progress(mut self, progress: i32) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Returns the wire names of the fields this patch changes.
    #[must_use]
    pub fn changed_fields(&self) -> Vec<&'static str> {
        let present = [
            self.title.is_some(),
            self.description.is_some(),
            self.status.is_some(),
            self.due_date.is_some(),
            self.assignee_id.is_some(),
            self.progress.is_some(),
        ];
        PATCHABLE_FIELDS
            .into_iter()
            .zip(present)
            .filter_map(|(name, is_present)| is_present.then_some(name))
            .collect()
    }

    /// Returns `true` when no field would change.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.changed_fields().is_empty()
    }

    /// Checks that the patch is non-empty and keeps the title non-blank.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::EmptyPatch`] when no field is set, or
    /// [`TaskDomainError::EmptyTitle`] when the title would become blank.
    pub fn validate(&self) -> Result<(), TaskDomainError> {
        if self.is_empty() {
            return Err(TaskDomainError::EmptyPatch);
        }
        if self
            .title
            .as_deref()
            .is_some_and(|title| title.trim().is_empty())
        {
            return Err(TaskDomainError::EmptyTitle);
        }
        Ok(())
    }
}

/// Parses `name` from `object` when present.
fn field<T>(
    object: &Map<String, Value>,
    name: &str,
    parse: impl FnOnce(&Value) -> Result<T, TaskDomainError>,
) -> Result<Option<T>, TaskDomainError> {
    object.get(name).map(parse).transpose()
}

fn parse_string(field_name: &'static str, value: &Value) -> Result<String, TaskDomainError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| TaskDomainError::invalid_field(field_name, "expected a string"))
}

fn parse_description(value: &Value) -> Result<Option<String>, TaskDomainError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) if text.is_empty() => Ok(None),
        Value::String(text) => Ok(Some(text.clone())),
        _ => Err(TaskDomainError::invalid_field(
            "description",
            "expected a string or null",
        )),
    }
}

fn parse_stage(value: &Value) -> Result<Stage, TaskDomainError> {
    let raw = value
        .as_str()
        .ok_or_else(|| TaskDomainError::invalid_field("status", "expected a string"))?;
    Ok(Stage::try_from(raw)?)
}

fn parse_due_date(value: &Value) -> Result<Option<NaiveDate>, TaskDomainError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) if text.trim().is_empty() => Ok(None),
        Value::String(text) => parse_date(text.trim()).map(Some),
        _ => Err(TaskDomainError::invalid_field(
            "due_date",
            "expected a date string or null",
        )),
    }
}

/// Accepts a plain `YYYY-MM-DD` date or a full RFC 3339 timestamp, keeping
/// only the calendar date of the latter.
fn parse_date(text: &str) -> Result<NaiveDate, TaskDomainError> {
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(text).map(|timestamp| timestamp.date_naive()))
        .map_err(|err| TaskDomainError::invalid_field("due_date", err.to_string()))
}

fn parse_assignee(value: &Value) -> Result<Option<UserId>, TaskDomainError> {
    match value {
        Value::Null => Ok(None),
        Value::String(text) if text.trim().is_empty() => Ok(None),
        Value::String(text) => text
            .parse::<UserId>()
            .map(Some)
            .map_err(|err| TaskDomainError::invalid_field("assignee_id", err.to_string())),
        Value::Number(number) => number.as_i64().map(|raw| Some(UserId::new(raw))).ok_or_else(
            || TaskDomainError::invalid_field("assignee_id", "expected an integer identifier"),
        ),
        _ => Err(TaskDomainError::invalid_field(
            "assignee_id",
            "expected an identifier or null",
        )),
    }
}

fn parse_progress(value: &Value) -> Result<i32, TaskDomainError> {
    let raw = match value {
        Value::Number(number) => number.as_i64(),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    }
    .ok_or_else(|| TaskDomainError::invalid_field("progress", "expected an integer"))?;
    i32::try_from(raw).map_err(|err| TaskDomainError::invalid_field("progress", err.to_string()))
}
