use chrono::NaiveDateTime;
use serde::Deserialize;
use validator::Validate;

use crate::domain::activity::{ActivityType, NewActivity};
use crate::domain::types::Title;
use crate::forms::{FieldKind, FieldSpec, FormError, FormSchema, clean_text};

const TYPE_OPTIONS: &[&str] = &["call", "email", "meeting", "note"];

/// Accepted layouts for `scheduledAt`, as produced by datetime-local inputs.
const TIMESTAMP_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"];

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
/// Form data for logging an activity against a customer.
pub struct ActivityForm {
    #[serde(rename = "type")]
    pub activity_type: ActivityType,
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    #[validate(length(min = 1, message = "Customer is required"))]
    pub customer_id: String,
    pub scheduled_at: Option<String>,
}

impl FormSchema for ActivityForm {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("type", "activity_type", FieldKind::Enum(TYPE_OPTIONS)),
        FieldSpec::required("title", "title", FieldKind::String),
        FieldSpec::optional("description", "description", FieldKind::String),
        FieldSpec::required("customerId", "customer_id", FieldKind::String),
        FieldSpec::optional("scheduledAt", "scheduled_at", FieldKind::String),
    ];
}

fn parse_scheduled_at(raw: Option<String>) -> Result<Option<NaiveDateTime>, FormError> {
    let Some(raw) = raw else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    TIMESTAMP_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(Some)
        .ok_or_else(|| FormError::InvalidTimestamp(raw.to_string()))
}

impl ActivityForm {
    /// Converts the validated form into a new activity created at `created_at`.
    pub fn into_new_activity(self, created_at: NaiveDateTime) -> Result<NewActivity, FormError> {
        let customer_id = self.customer_id.trim().to_string();
        if customer_id.is_empty() {
            return Err(FormError::InvalidCustomer);
        }

        Ok(NewActivity {
            activity_type: self.activity_type,
            title: Title::new(self.title).map_err(|_| FormError::InvalidTitle)?,
            description: clean_text(self.description),
            customer_id,
            scheduled_at: parse_scheduled_at(self.scheduled_at)?,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;
    use serde_json::json;

    use super::*;
    use crate::forms::validate_form;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap()
    }

    #[test]
    fn title_and_customer_are_mandatory() {
        let errors = validate_form::<ActivityForm>(&json!({
            "type": "call",
            "title": "",
            "customerId": "",
        }))
        .unwrap_err();

        assert_eq!(
            errors.errors(),
            ["title: Title is required", "customerId: Customer is required"]
        );
    }

    #[test]
    fn missing_type_is_required() {
        let errors = validate_form::<ActivityForm>(&json!({
            "title": "Follow up",
            "customerId": "1",
        }))
        .unwrap_err();

        assert_eq!(errors.errors(), ["type: Required"]);
    }

    #[test]
    fn converts_with_schedule() {
        let form = validate_form::<ActivityForm>(&json!({
            "type": "meeting",
            "title": "Quarterly review",
            "description": "  Bring the renewal numbers ",
            "customerId": "1",
            "scheduledAt": "2024-01-20T14:00",
        }))
        .unwrap();

        let activity = form.into_new_activity(now()).unwrap();

        assert_eq!(activity.activity_type, ActivityType::Meeting);
        assert_eq!(
            activity.description.as_deref(),
            Some("Bring the renewal numbers")
        );
        assert_eq!(
            activity.scheduled_at,
            NaiveDate::from_ymd_opt(2024, 1, 20).and_then(|d| d.and_hms_opt(14, 0, 0))
        );
        assert_eq!(activity.created_at, now());
    }

    #[test]
    fn rejects_unparseable_schedule() {
        let form = ActivityForm {
            activity_type: ActivityType::Call,
            title: "Call".to_string(),
            customer_id: "2".to_string(),
            scheduled_at: Some("tomorrow".to_string()),
            ..ActivityForm::default()
        };

        assert!(matches!(
            form.into_new_activity(now()),
            Err(FormError::InvalidTimestamp(_))
        ));
    }
}
