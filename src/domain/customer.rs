use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CompanyName, CustomerEmail, CustomerId, PersonName, TypeConstraintError,
};

/// Relationship state of a customer.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum CustomerStatus {
    #[default]
    Active,
    Pending,
    Inactive,
}

impl CustomerStatus {
    pub const ALL: [CustomerStatus; 3] = [Self::Active, Self::Pending, Self::Inactive];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Pending => "pending",
            Self::Inactive => "inactive",
        }
    }
}

impl Display for CustomerStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CustomerStatus {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| TypeConstraintError::InvalidValue(s.to_string()))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: CustomerId,
    pub name: PersonName,
    pub email: CustomerEmail,
    pub phone: Option<String>,
    pub company: CompanyName,
    pub status: CustomerStatus,
    /// Human readable marker of the last interaction, e.g. "2 hours ago".
    pub last_contact: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct NewCustomer {
    pub name: PersonName,
    pub email: CustomerEmail,
    pub phone: Option<String>,
    pub company: CompanyName,
    pub status: CustomerStatus,
    pub notes: Option<String>,
}

impl NewCustomer {
    #[must_use]
    pub fn new(
        name: PersonName,
        email: CustomerEmail,
        phone: Option<String>,
        company: CompanyName,
        status: CustomerStatus,
        notes: Option<String>,
    ) -> Self {
        Self {
            name,
            email,
            phone: phone
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
            company,
            status,
            notes: notes
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty()),
        }
    }
}

/// Full replacement of the editable customer fields.
pub type UpdateCustomer = NewCustomer;

impl Customer {
    /// Materializes a stored customer from creation data.
    pub fn from_new(id: CustomerId, new: NewCustomer) -> Self {
        Self {
            id,
            name: new.name,
            email: new.email,
            phone: new.phone,
            company: new.company,
            status: new.status,
            last_contact: None,
            notes: new.notes,
        }
    }

    /// Applies an update while keeping identity and the last-contact marker.
    pub fn apply(&mut self, updates: &UpdateCustomer) {
        self.name = updates.name.clone();
        self.email = updates.email.clone();
        self.phone = updates.phone.clone();
        self.company = updates.company.clone();
        self.status = updates.status;
        self.notes = updates.notes.clone();
    }
}
