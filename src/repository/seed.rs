//! Sample customers, deals and activities shown by a fresh dashboard.

use chrono::{NaiveDate, NaiveDateTime};

use crate::domain::activity::{Activity, ActivityType};
use crate::domain::customer::{Customer, CustomerStatus};
use crate::domain::deal::{Deal, DealStage};
use crate::domain::types::{
    ActivityId, CompanyName, CustomerEmail, CustomerId, DealId, DealValue, PersonName,
    Probability, Title,
};
use crate::repository::InMemoryRepository;
use crate::repository::errors::{RepositoryError, RepositoryResult};

const CUSTOMERS: &[(&str, &str, &str, &str, CustomerStatus, &str)] = &[
    (
        "John Doe",
        "john.doe@example.com",
        "+1 (555) 123-4567",
        "Acme Corp",
        CustomerStatus::Active,
        "2 hours ago",
    ),
    (
        "Jane Smith",
        "jane.smith@example.com",
        "+1 (555) 234-5678",
        "Tech Solutions",
        CustomerStatus::Pending,
        "1 day ago",
    ),
    (
        "Mike Johnson",
        "mike.johnson@example.com",
        "+1 (555) 345-6789",
        "Global Industries",
        CustomerStatus::Inactive,
        "3 days ago",
    ),
    (
        "Sarah Wilson",
        "sarah.wilson@example.com",
        "+1 (555) 456-7890",
        "Innovation Labs",
        CustomerStatus::Active,
        "5 hours ago",
    ),
    (
        "David Brown",
        "david.brown@example.com",
        "+1 (555) 567-8901",
        "Creative Agency",
        CustomerStatus::Active,
        "1 week ago",
    ),
];

const DEALS: &[(&str, &str, &str, f64, DealStage, i64, (i32, u32, u32), &str)] = &[
    (
        "Enterprise Software License",
        "Acme Corp",
        "John Doe",
        50_000.0,
        DealStage::Proposal,
        75,
        (2024, 2, 15),
        "2 hours ago",
    ),
    (
        "Consulting Services",
        "Tech Solutions",
        "Jane Smith",
        25_000.0,
        DealStage::Negotiation,
        60,
        (2024, 1, 30),
        "1 day ago",
    ),
    (
        "Product Implementation",
        "Global Industries",
        "Mike Johnson",
        75_000.0,
        DealStage::Qualified,
        40,
        (2024, 3, 1),
        "3 days ago",
    ),
    (
        "Annual Support Contract",
        "Innovation Labs",
        "Sarah Wilson",
        15_000.0,
        DealStage::ClosedWon,
        100,
        (2024, 1, 20),
        "1 week ago",
    ),
    (
        "Custom Development",
        "Creative Agency",
        "David Brown",
        35_000.0,
        DealStage::Discovery,
        25,
        (2024, 2, 28),
        "5 days ago",
    ),
];

const ACTIVITIES: &[(ActivityType, &str, &str, &str, &str)] = &[
    (
        ActivityType::Call,
        "Discovery call",
        "Walked through current tooling and pain points",
        "1",
        "2024-01-10T10:00:00",
    ),
    (
        ActivityType::Email,
        "Sent proposal",
        "Enterprise license proposal with volume pricing",
        "1",
        "2024-01-12T16:30:00",
    ),
    (
        ActivityType::Meeting,
        "Contract review",
        "Legal review of the consulting terms",
        "2",
        "2024-01-15T14:00:00",
    ),
    (
        ActivityType::Note,
        "Budget freeze",
        "Procurement paused until next quarter",
        "3",
        "2024-01-08T09:15:00",
    ),
];

fn date((year, month, day): (i32, u32, u32)) -> RepositoryResult<NaiveDate> {
    NaiveDate::from_ymd_opt(year, month, day).ok_or_else(|| {
        RepositoryError::ValidationError(format!("invalid date {year}-{month}-{day}"))
    })
}

fn timestamp(raw: &str) -> RepositoryResult<NaiveDateTime> {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S").map_err(|err| {
        RepositoryError::ValidationError(format!("invalid timestamp {raw}: {err}"))
    })
}

impl InMemoryRepository {
    /// Repository pre-filled with the dashboard's sample data.
    pub fn with_sample_data() -> RepositoryResult<Self> {
        let repo = Self::new();
        {
            let mut store = repo.write()?;

            for (index, (name, email, phone, company, status, last_contact)) in
                CUSTOMERS.iter().enumerate()
            {
                let id = CustomerId::new(index as i32 + 1)?;
                store.customers.insert(
                    id,
                    Customer {
                        id,
                        name: PersonName::new(*name)?,
                        email: CustomerEmail::new(*email)?,
                        phone: Some(phone.to_string()),
                        company: CompanyName::new(*company)?,
                        status: *status,
                        last_contact: Some(last_contact.to_string()),
                        notes: None,
                    },
                );
            }

            for (
                index,
                (title, company, contact, value, stage, probability, close, last_activity),
            ) in DEALS.iter().enumerate()
            {
                let id = DealId::new(index as i32 + 1)?;
                store.deals.insert(
                    id,
                    Deal {
                        id,
                        title: Title::new(*title)?,
                        company: CompanyName::new(*company)?,
                        contact: PersonName::new(*contact)?,
                        value: DealValue::new(*value)?,
                        stage: *stage,
                        probability: Probability::new(*probability)?,
                        expected_close: Some(date(*close)?),
                        last_activity: Some(last_activity.to_string()),
                        notes: None,
                    },
                );
            }

            for (index, (kind, title, description, customer_id, created_at)) in
                ACTIVITIES.iter().enumerate()
            {
                let id = ActivityId::new(index as i32 + 1)?;
                store.activities.insert(
                    id,
                    Activity {
                        id,
                        activity_type: *kind,
                        title: Title::new(*title)?,
                        description: Some(description.to_string()),
                        customer_id: customer_id.to_string(),
                        scheduled_at: None,
                        created_at: timestamp(created_at)?,
                    },
                );
            }
        }

        log::debug!("Seeded in-memory repository with sample data");
        Ok(repo)
    }
}
