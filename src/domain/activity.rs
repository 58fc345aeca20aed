use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{ActivityId, Title, TypeConstraintError};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ActivityType {
    Call,
    Email,
    Meeting,
    #[default]
    Note,
}

impl ActivityType {
    pub const ALL: [ActivityType; 4] = [Self::Call, Self::Email, Self::Meeting, Self::Note];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Call => "call",
            Self::Email => "email",
            Self::Meeting => "meeting",
            Self::Note => "note",
        }
    }
}

impl Display for ActivityType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| TypeConstraintError::InvalidValue(s.to_string()))
    }
}

/// Interaction logged against a customer.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: ActivityId,
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    pub title: Title,
    pub description: Option<String>,
    /// Plain reference to the owning customer; never checked against the customer store.
    pub customer_id: String,
    pub scheduled_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct NewActivity {
    pub activity_type: ActivityType,
    pub title: Title,
    pub description: Option<String>,
    pub customer_id: String,
    pub scheduled_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
}

impl Activity {
    pub fn from_new(id: ActivityId, new: NewActivity) -> Self {
        Self {
            id,
            activity_type: new.activity_type,
            title: new.title,
            description: new.description,
            customer_id: new.customer_id,
            scheduled_at: new.scheduled_at,
            created_at: new.created_at,
        }
    }

    /// Timestamp the timeline orders by: the schedule when present, else creation time.
    pub fn timeline_at(&self) -> NaiveDateTime {
        self.scheduled_at.unwrap_or(self.created_at)
    }
}
