//! Quick and advanced search over in-memory record collections.
//!
//! Both modes work on a caller supplied slice and return borrowed matches in
//! input order. Quick search folds case; advanced search compares as
//! typed unless the caller asks for [`MatchCase::Insensitive`]. Unknown or
//! absent fields compare as the empty string.

use std::borrow::Cow;

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::activity::{Activity, ActivityType};
use crate::domain::customer::{Customer, CustomerStatus};
use crate::domain::deal::{Deal, DealStage};
use crate::record::{Record, value_to_text};

pub const CUSTOMER_QUICK_FIELDS: &[&str] = &["name", "email", "company"];
pub const DEAL_QUICK_FIELDS: &[&str] = &["title", "company", "contact"];
pub const ACTIVITY_QUICK_FIELDS: &[&str] = &["title", "description"];

/// String matching operator of an advanced search clause.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum FilterOperator {
    Equals,
    #[default]
    Contains,
    StartsWith,
    EndsWith,
}

impl FilterOperator {
    pub const ALL: [FilterOperator; 4] = [
        Self::Contains,
        Self::Equals,
        Self::StartsWith,
        Self::EndsWith,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Equals => "Equals",
            Self::Contains => "Contains",
            Self::StartsWith => "Starts with",
            Self::EndsWith => "Ends with",
        }
    }

    fn apply(self, haystack: &str, needle: &str) -> bool {
        match self {
            Self::Equals => haystack == needle,
            Self::Contains => haystack.contains(needle),
            Self::StartsWith => haystack.starts_with(needle),
            Self::EndsWith => haystack.ends_with(needle),
        }
    }
}

/// Case handling for advanced search clauses.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum MatchCase {
    /// Compare exactly as typed.
    #[default]
    Sensitive,
    /// Fold both sides to lowercase, like quick search.
    Insensitive,
}

/// One `field operator value` clause of an advanced search.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Default, Validate)]
#[serde(default)]
pub struct SearchFilter {
    pub field: String,
    pub operator: FilterOperator,
    pub value: String,
}

impl SearchFilter {
    pub fn new(
        field: impl Into<String>,
        operator: FilterOperator,
        value: impl Into<String>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }

    /// Blank clause for `entity`: first field option, `contains`, empty value.
    pub fn blank_for(entity: EntityKind) -> Self {
        Self::new(entity.field_options()[0].value, FilterOperator::Contains, "")
    }

    /// Whether the clause carries a non-blank value.
    pub fn is_active(&self) -> bool {
        !self.value.trim().is_empty()
    }

    pub fn matches<T: Searchable + ?Sized>(&self, record: &T, case: MatchCase) -> bool {
        let field = record.field_value(&self.field).unwrap_or_default();
        match case {
            MatchCase::Sensitive => self.operator.apply(&field, &self.value),
            MatchCase::Insensitive => self
                .operator
                .apply(&field.to_lowercase(), &self.value.to_lowercase()),
        }
    }
}

/// Record types that can be searched by field name.
pub trait Searchable {
    /// Values consulted by quick search.
    fn quick_search_values(&self) -> Vec<Cow<'_, str>>;

    /// Stringified value of `field`, `None` when the record has no such field.
    fn field_value(&self, field: &str) -> Option<Cow<'_, str>>;
}

/// Records with a single-select category (status, stage or type).
pub trait Categorized {
    type Category: Copy + PartialEq;

    fn category(&self) -> Self::Category;
}

fn quick_values<'a, T: Searchable + ?Sized>(record: &'a T, fields: &[&str]) -> Vec<Cow<'a, str>> {
    fields
        .iter()
        .filter_map(|field| record.field_value(field))
        .collect()
}

/// Case-insensitive substring match of `term` against the quick search values.
pub fn matches_term<T: Searchable + ?Sized>(record: &T, term: &str) -> bool {
    if term.is_empty() {
        return true;
    }
    let term = term.to_lowercase();
    record
        .quick_search_values()
        .iter()
        .any(|value| value.to_lowercase().contains(&term))
}

/// Records whose quick search values contain `term`, ignoring case.
pub fn quick_search<'a, T: Searchable>(records: &'a [T], term: &str) -> Vec<&'a T> {
    records
        .iter()
        .filter(|record| matches_term(*record, term))
        .collect()
}

/// Records matching every active clause.
///
/// Clauses with a blank value are skipped, so they neither count as active
/// filters nor reject records.
pub fn advanced_search<'a, T: Searchable>(
    records: &'a [T],
    filters: &[SearchFilter],
    case: MatchCase,
) -> Vec<&'a T> {
    let active: Vec<&SearchFilter> = filters.iter().filter(|f| f.is_active()).collect();
    records
        .iter()
        .filter(|record| active.iter().all(|filter| filter.matches(*record, case)))
        .collect()
}

/// Number of clauses shown on the "Advanced" badge.
pub fn active_filter_count(filters: &[SearchFilter]) -> usize {
    filters.iter().filter(|f| f.is_active()).count()
}

/// Quick search term plus an optional category, AND-combined.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordQuery<C> {
    pub search: Option<String>,
    pub category: Option<C>,
}

impl<C> Default for RecordQuery<C> {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
        }
    }
}

impl<C: Copy + PartialEq> RecordQuery<C> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }

    pub fn category(mut self, category: C) -> Self {
        self.category = Some(category);
        self
    }

    pub fn matches<T>(&self, record: &T) -> bool
    where
        T: Searchable + Categorized<Category = C>,
    {
        let term_matches = self
            .search
            .as_deref()
            .is_none_or(|term| matches_term(record, term));
        let category_matches = self
            .category
            .is_none_or(|category| record.category() == category);
        term_matches && category_matches
    }
}

/// Applies a [`RecordQuery`] to a slice.
pub fn filter_records<'a, T>(records: &'a [T], query: &RecordQuery<T::Category>) -> Vec<&'a T>
where
    T: Searchable + Categorized,
{
    records.iter().filter(|record| query.matches(*record)).collect()
}

/// Entity collections offered by the advanced search panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityKind {
    Customers,
    Deals,
    Activities,
}

/// Selectable field of the advanced search panel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FieldOption {
    pub value: &'static str,
    pub label: &'static str,
}

const CUSTOMER_FIELD_OPTIONS: &[FieldOption] = &[
    FieldOption { value: "name", label: "Name" },
    FieldOption { value: "email", label: "Email" },
    FieldOption { value: "company", label: "Company" },
    FieldOption { value: "status", label: "Status" },
    FieldOption { value: "phone", label: "Phone" },
];

const DEAL_FIELD_OPTIONS: &[FieldOption] = &[
    FieldOption { value: "title", label: "Deal Title" },
    FieldOption { value: "company", label: "Company" },
    FieldOption { value: "contact", label: "Contact" },
    FieldOption { value: "stage", label: "Stage" },
    FieldOption { value: "value", label: "Value" },
];

const ACTIVITY_FIELD_OPTIONS: &[FieldOption] = &[
    FieldOption { value: "title", label: "Activity Title" },
    FieldOption { value: "type", label: "Type" },
    FieldOption { value: "customerId", label: "Customer" },
    FieldOption { value: "description", label: "Description" },
];

impl EntityKind {
    pub const fn field_options(self) -> &'static [FieldOption] {
        match self {
            Self::Customers => CUSTOMER_FIELD_OPTIONS,
            Self::Deals => DEAL_FIELD_OPTIONS,
            Self::Activities => ACTIVITY_FIELD_OPTIONS,
        }
    }
}

impl Searchable for Customer {
    fn quick_search_values(&self) -> Vec<Cow<'_, str>> {
        quick_values(self, CUSTOMER_QUICK_FIELDS)
    }

    fn field_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "id" => Some(Cow::Owned(self.id.to_string())),
            "name" => Some(Cow::Borrowed(self.name.as_str())),
            "email" => Some(Cow::Borrowed(self.email.as_str())),
            "phone" => self.phone.as_deref().map(Cow::Borrowed),
            "company" => Some(Cow::Borrowed(self.company.as_str())),
            "status" => Some(Cow::Borrowed(self.status.as_str())),
            "lastContact" | "last_contact" => self.last_contact.as_deref().map(Cow::Borrowed),
            "notes" => self.notes.as_deref().map(Cow::Borrowed),
            _ => None,
        }
    }
}

impl Categorized for Customer {
    type Category = CustomerStatus;

    fn category(&self) -> CustomerStatus {
        self.status
    }
}

impl Searchable for Deal {
    fn quick_search_values(&self) -> Vec<Cow<'_, str>> {
        quick_values(self, DEAL_QUICK_FIELDS)
    }

    fn field_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "id" => Some(Cow::Owned(self.id.to_string())),
            "title" => Some(Cow::Borrowed(self.title.as_str())),
            "company" => Some(Cow::Borrowed(self.company.as_str())),
            "contact" => Some(Cow::Borrowed(self.contact.as_str())),
            "value" => Some(Cow::Owned(self.value.get().to_string())),
            "stage" => Some(Cow::Borrowed(self.stage.as_str())),
            "probability" => Some(Cow::Owned(self.probability.get().to_string())),
            "expectedClose" | "expected_close" => self
                .expected_close
                .map(|date| Cow::Owned(date.format("%Y-%m-%d").to_string())),
            "lastActivity" | "last_activity" => self.last_activity.as_deref().map(Cow::Borrowed),
            "notes" => self.notes.as_deref().map(Cow::Borrowed),
            _ => None,
        }
    }
}

impl Categorized for Deal {
    type Category = DealStage;

    fn category(&self) -> DealStage {
        self.stage
    }
}

impl Searchable for Activity {
    fn quick_search_values(&self) -> Vec<Cow<'_, str>> {
        quick_values(self, ACTIVITY_QUICK_FIELDS)
    }

    fn field_value(&self, field: &str) -> Option<Cow<'_, str>> {
        match field {
            "id" => Some(Cow::Owned(self.id.to_string())),
            "type" => Some(Cow::Borrowed(self.activity_type.as_str())),
            "title" => Some(Cow::Borrowed(self.title.as_str())),
            "description" => self.description.as_deref().map(Cow::Borrowed),
            "customerId" | "customer_id" => Some(Cow::Borrowed(self.customer_id.as_str())),
            _ => None,
        }
    }
}

impl Categorized for Activity {
    type Category = ActivityType;

    fn category(&self) -> ActivityType {
        self.activity_type
    }
}

impl Searchable for Record {
    fn quick_search_values(&self) -> Vec<Cow<'_, str>> {
        self.values().map(value_to_text).collect()
    }

    fn field_value(&self, field: &str) -> Option<Cow<'_, str>> {
        self.get(field).map(value_to_text)
    }
}
