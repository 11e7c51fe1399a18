//! Activity domain model.
//!
//! # Responsibility
//! - Define the canonical scheduled-activity record shared by every store
//!   implementation and by the reminder engine.
//! - Validate local input before it reaches persistence.
//!
//! # Invariants
//! - `id` is stable and never reused for another activity.
//! - `title` is non-empty for any record created or updated through a store.
//! - `date`/`time` stay as plain strings; they are combined into an absolute
//!   instant only at scan or query time, never cached on the record.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for an activity, assigned by the store at creation.
pub type ActivityId = Uuid;

static DATE_SHAPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}$").expect("date shape pattern is valid")
});
static TIME_SHAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\d{2}:\d{2}$").expect("time shape pattern is valid"));

/// Closed category set for activities.
///
/// Unrecognized persisted values never fail a read; they fall back to
/// [`ActivityType::default`] at the storage boundary so foreign records
/// (for example, written by a newer client against the same collection)
/// stay visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    /// Regular class session.
    Lecture,
    /// Graded examination.
    Exam,
    /// Deliverable with a due instant.
    Assignment,
    /// Self-scheduled study block.
    Study,
}

impl Default for ActivityType {
    fn default() -> Self {
        ActivityType::Lecture
    }
}

impl ActivityType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lecture => "lecture",
            Self::Exam => "exam",
            Self::Assignment => "assignment",
            Self::Study => "study",
        }
    }

    /// Parses a stored category tag.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "lecture" => Some(Self::Lecture),
            "exam" => Some(Self::Exam),
            "assignment" => Some(Self::Assignment),
            "study" => Some(Self::Study),
            _ => None,
        }
    }

    /// Parses a stored category tag, falling back to the default category
    /// for unrecognized values.
    pub fn parse_or_default(value: &str) -> Self {
        match Self::parse(value) {
            Some(kind) => kind,
            None => {
                log::warn!(
                    "event=activity_kind_fallback module=model status=ok raw_kind={value}"
                );
                Self::default()
            }
        }
    }
}

/// Canonical scheduled-activity record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    /// Stable global ID used for linking, notification dedup and auditing.
    pub id: ActivityId,
    /// Calendar date, `YYYY-MM-DD`, no timezone offset stored.
    pub date: String,
    /// Wall-clock time of day, `HH:MM`.
    pub time: String,
    /// Non-empty display title.
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub description: Option<String>,
}

/// Input for creating an activity; the store assigns the id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityDraft {
    pub date: String,
    pub time: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: ActivityType,
    pub description: Option<String>,
}

impl ActivityDraft {
    /// Creates a draft with the form defaults used by the planner UI.
    pub fn new(date: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            time: "08:00".to_string(),
            title: title.into(),
            kind: ActivityType::default(),
            description: None,
        }
    }

    /// Validates local input ahead of persistence.
    ///
    /// Records arriving from a shared remote collection bypass this check
    /// and are tolerated at scan time instead.
    pub fn validate(&self) -> Result<(), ActivityValidationError> {
        validate_fields(&self.title, &self.date, &self.time)
    }

    /// Materializes the draft into an activity under a store-assigned id.
    pub fn into_activity(self, id: ActivityId) -> Activity {
        Activity {
            id,
            date: self.date,
            time: self.time,
            title: self.title,
            kind: self.kind,
            description: self.description,
        }
    }
}

/// Partial update; `None` fields retain the prior value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityPatch {
    pub date: Option<String>,
    pub time: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<ActivityType>,
    pub description: Option<String>,
}

impl ActivityPatch {
    /// Patch that only moves the activity to another date (drag-and-drop).
    pub fn move_to(new_date: impl Into<String>) -> Self {
        Self {
            date: Some(new_date.into()),
            ..Self::default()
        }
    }

    /// Applies the patch onto an existing record, then re-validates.
    pub fn apply_to(&self, activity: &mut Activity) -> Result<(), ActivityValidationError> {
        if let Some(date) = &self.date {
            activity.date = date.clone();
        }
        if let Some(time) = &self.time {
            activity.time = time.clone();
        }
        if let Some(title) = &self.title {
            activity.title = title.clone();
        }
        if let Some(kind) = self.kind {
            activity.kind = kind;
        }
        if let Some(description) = &self.description {
            activity.description = Some(description.clone());
        }
        validate_fields(&activity.title, &activity.date, &activity.time)
    }
}

/// Validation failures for locally entered activity data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActivityValidationError {
    EmptyTitle,
    MissingDate,
    MalformedDate(String),
    MalformedTime(String),
}

impl Display for ActivityValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "activity title cannot be empty"),
            Self::MissingDate => write!(f, "activity date is required"),
            Self::MalformedDate(value) => {
                write!(f, "activity date `{value}` is not in YYYY-MM-DD form")
            }
            Self::MalformedTime(value) => {
                write!(f, "activity time `{value}` is not in HH:MM form")
            }
        }
    }
}

impl Error for ActivityValidationError {}

fn validate_fields(title: &str, date: &str, time: &str) -> Result<(), ActivityValidationError> {
    if title.trim().is_empty() {
        return Err(ActivityValidationError::EmptyTitle);
    }
    if date.trim().is_empty() {
        return Err(ActivityValidationError::MissingDate);
    }
    if !DATE_SHAPE.is_match(date) {
        return Err(ActivityValidationError::MalformedDate(date.to_string()));
    }
    if !TIME_SHAPE.is_match(time) {
        return Err(ActivityValidationError::MalformedTime(time.to_string()));
    }
    Ok(())
}
