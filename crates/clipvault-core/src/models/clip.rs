use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

/// A stored video clip. The payload lives in object storage under `<id>/video`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Clip {
    pub id: String,
    pub title: String,
    pub description: String,
    pub unlisted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Clip {
    /// Fresh clip id: a v4 UUID rendered as 32 lowercase hex characters.
    pub fn generate_id() -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Input for creating a clip
#[derive(Debug, Clone, Deserialize, ToSchema, Validate)]
pub struct NewClip {
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title must be between 1 and 100 characters"
    ))]
    pub title: String,
    #[serde(default)]
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: String,
    #[serde(default)]
    pub unlisted: bool,
}

/// Partial update; each `Some` field is a changed column.
#[derive(Debug, Clone, Default, Deserialize, ToSchema, Validate)]
pub struct ClipUpdate {
    #[serde(default)]
    #[validate(length(
        min = 1,
        max = 100,
        message = "Title must be between 1 and 100 characters"
    ))]
    pub title: Option<String>,
    #[serde(default)]
    #[validate(length(max = 5000, message = "Description must be at most 5000 characters"))]
    pub description: Option<String>,
    #[serde(default)]
    pub unlisted: Option<bool>,
}

impl ClipUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.unlisted.is_none()
    }

    /// Apply the changed columns to an in-memory clip.
    pub fn apply_to(&self, clip: &mut Clip) {
        if let Some(title) = &self.title {
            clip.title = title.clone();
        }
        if let Some(description) = &self.description {
            clip.description = description.clone();
        }
        if let Some(unlisted) = self.unlisted {
            clip.unlisted = unlisted;
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ClipCreatedResponse {
    pub id: String,
}
