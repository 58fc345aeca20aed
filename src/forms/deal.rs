use chrono::NaiveDate;
use serde::Deserialize;
use validator::Validate;

use crate::domain::deal::{DealStage, NewDeal};
use crate::domain::types::{CompanyName, DealValue, PersonName, Probability, Title};
use crate::forms::{FieldKind, FieldSpec, FormError, FormSchema, clean_text};

const STAGE_OPTIONS: &[&str] = &[
    "discovery",
    "qualified",
    "proposal",
    "negotiation",
    "closed-won",
    "closed-lost",
];

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
/// Form data for adding or editing a deal.
pub struct DealForm {
    #[validate(length(min = 3, message = "Title must be at least 3 characters"))]
    pub title: String,
    #[validate(length(min = 1, message = "Company is required"))]
    pub company: String,
    #[validate(length(min = 1, message = "Contact is required"))]
    pub contact: String,
    #[validate(range(exclusive_min = 0.0, message = "Value must be positive"))]
    pub value: f64,
    pub stage: DealStage,
    /// Whole percent; integral floats such as `50.0` are accepted.
    #[validate(range(max = 100.0, message = "Probability must be between 0 and 100"))]
    pub probability: f64,
    /// Expected close date as `YYYY-MM-DD`.
    pub expected_close: Option<String>,
    pub notes: Option<String>,
}

impl FormSchema for DealForm {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("title", "title", FieldKind::String),
        FieldSpec::required("company", "company", FieldKind::String),
        FieldSpec::required("contact", "contact", FieldKind::String),
        FieldSpec::required("value", "value", FieldKind::Number),
        FieldSpec::required("stage", "stage", FieldKind::Enum(STAGE_OPTIONS)),
        FieldSpec::required("probability", "probability", FieldKind::Integer),
        FieldSpec::optional("expectedClose", "expected_close", FieldKind::String),
        FieldSpec::optional("notes", "notes", FieldKind::String),
    ];

    fn extra_rules(&self) -> Vec<(&'static str, String)> {
        if self.probability < 0.0 {
            vec![(
                "probability",
                "Number must be greater than or equal to 0".to_string(),
            )]
        } else {
            Vec::new()
        }
    }
}

fn parse_close_date(raw: Option<String>) -> Result<Option<NaiveDate>, FormError> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(date) => NaiveDate::parse_from_str(date, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| FormError::InvalidDate(date.to_string())),
    }
}

fn whole_percent(value: f64) -> Result<Probability, FormError> {
    if value.fract() != 0.0 {
        return Err(FormError::InvalidProbability);
    }
    Probability::new(value as i64).map_err(|_| FormError::InvalidProbability)
}

impl TryFrom<DealForm> for NewDeal {
    type Error = FormError;

    fn try_from(form: DealForm) -> Result<Self, Self::Error> {
        Ok(NewDeal {
            title: Title::new(form.title).map_err(|_| FormError::InvalidTitle)?,
            company: CompanyName::new(form.company).map_err(|_| FormError::InvalidCompany)?,
            contact: PersonName::new(form.contact).map_err(|_| FormError::InvalidName)?,
            value: DealValue::new(form.value).map_err(|_| FormError::InvalidValue)?,
            stage: form.stage,
            probability: whole_percent(form.probability)?,
            expected_close: parse_close_date(form.expected_close)?,
            notes: clean_text(form.notes),
        })
    }
}
