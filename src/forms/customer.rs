use serde::Deserialize;
use validator::Validate;

use crate::domain::customer::{CustomerStatus, NewCustomer};
use crate::domain::types::{CompanyName, CustomerEmail, PersonName};
use crate::forms::{FieldKind, FieldSpec, FormError, FormSchema, clean_text};

const STATUS_OPTIONS: &[&str] = &["active", "pending", "inactive"];

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default, rename_all = "camelCase")]
/// Form data for adding or editing a customer.
pub struct CustomerForm {
    #[validate(length(min = 2, message = "Name must be at least 2 characters"))]
    pub name: String,
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub phone: Option<String>,
    #[validate(length(min = 1, message = "Company is required"))]
    pub company: String,
    pub status: CustomerStatus,
    pub notes: Option<String>,
}

impl FormSchema for CustomerForm {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("name", "name", FieldKind::String),
        FieldSpec::required("email", "email", FieldKind::String),
        FieldSpec::optional("phone", "phone", FieldKind::String),
        FieldSpec::required("company", "company", FieldKind::String),
        FieldSpec::required("status", "status", FieldKind::Enum(STATUS_OPTIONS)),
        FieldSpec::optional("notes", "notes", FieldKind::String),
    ];
}

impl TryFrom<CustomerForm> for NewCustomer {
    type Error = FormError;

    fn try_from(form: CustomerForm) -> Result<Self, Self::Error> {
        Ok(NewCustomer::new(
            PersonName::new(form.name).map_err(|_| FormError::InvalidName)?,
            CustomerEmail::new(form.email).map_err(|_| FormError::InvalidEmail)?,
            form.phone,
            CompanyName::new(form.company).map_err(|_| FormError::InvalidCompany)?,
            form.status,
            clean_text(form.notes),
        ))
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::forms::validate_form;

    #[test]
    fn valid_customer_passes() {
        let form = validate_form::<CustomerForm>(&json!({
            "name": "Ann Lee",
            "email": "a@x.com",
            "company": "X",
            "status": "pending",
            "extra": "ignored",
        }))
        .unwrap();

        assert_eq!(form.name, "Ann Lee");
        assert_eq!(form.status, CustomerStatus::Pending);
        assert_eq!(form.phone, None);
    }

    #[test]
    fn invalid_email_is_reported() {
        let errors = validate_form::<CustomerForm>(&json!({
            "name": "Bob",
            "email": "not-an-email",
            "company": "Acme",
            "status": "active",
        }))
        .unwrap_err();

        assert_eq!(errors.errors(), ["email: Invalid email address"]);
    }

    #[test]
    fn rule_failures_follow_field_order() {
        let errors = validate_form::<CustomerForm>(&json!({
            "status": "active",
            "company": "",
            "email": "bad",
            "name": "B",
        }))
        .unwrap_err();

        assert_eq!(
            errors.errors(),
            [
                "name: Name must be at least 2 characters",
                "email: Invalid email address",
                "company: Company is required",
            ]
        );
    }

    #[test]
    fn converts_into_new_customer() {
        let form = CustomerForm {
            name: " Ann Lee ".to_string(),
            email: "Ann@X.com".to_string(),
            phone: Some("+1 (555) 123-4567".to_string()),
            company: "X".to_string(),
            status: CustomerStatus::Active,
            notes: Some("<b>vip</b>".to_string()),
        };

        let customer = NewCustomer::try_from(form).unwrap();

        assert_eq!(customer.name.as_str(), "Ann Lee");
        assert_eq!(customer.email.as_str(), "ann@x.com");
        assert_eq!(customer.notes.as_deref(), Some("<b>vip</b>"));
    }

    #[test]
    fn whitespace_name_fails_conversion() {
        let form = CustomerForm {
            name: "   ".to_string(),
            email: "a@x.com".to_string(),
            company: "X".to_string(),
            ..CustomerForm::default()
        };

        assert!(matches!(
            NewCustomer::try_from(form),
            Err(FormError::InvalidName)
        ));
    }
}
