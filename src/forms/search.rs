use crate::forms::{FieldKind, FieldSpec, FormSchema};
use crate::search::SearchFilter;

const OPERATOR_OPTIONS: &[&str] = &["equals", "contains", "starts_with", "ends_with"];

impl FormSchema for SearchFilter {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("field", "field", FieldKind::String),
        FieldSpec::required("operator", "operator", FieldKind::Enum(OPERATOR_OPTIONS)),
        FieldSpec::required("value", "value", FieldKind::String),
    ];
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::forms::validate_form;
    use crate::search::{FilterOperator, SearchFilter};

    #[test]
    fn accepts_snake_case_operators() {
        let filter = validate_form::<SearchFilter>(&json!({
            "field": "name",
            "operator": "starts_with",
            "value": "Jo",
        }))
        .unwrap();

        assert_eq!(filter.operator, FilterOperator::StartsWith);
    }

    #[test]
    fn blank_value_is_still_a_valid_clause() {
        assert!(
            validate_form::<SearchFilter>(&json!({
                "field": "name",
                "operator": "contains",
                "value": "",
            }))
            .is_ok()
        );
    }

    #[test]
    fn rejects_unknown_operator() {
        let errors = validate_form::<SearchFilter>(&json!({
            "field": "name",
            "operator": "like",
            "value": "x",
        }))
        .unwrap_err();

        assert_eq!(
            errors.errors(),
            ["operator: Invalid enum value. Expected 'equals' | 'contains' | 'starts_with' | 'ends_with', received 'like'"]
        );
    }
}
