use chrono::NaiveDate;
use crm_dashboard::domain::activity::{ActivityType, NewActivity};
use crm_dashboard::domain::customer::{CustomerStatus, NewCustomer};
use crm_dashboard::domain::deal::{DealStage, NewDeal};
use crm_dashboard::domain::types::{
    CompanyName, CustomerEmail, DealValue, PersonName, Probability, Title,
};
use crm_dashboard::repository::errors::RepositoryError;
use crm_dashboard::repository::{
    ActivityListQuery, ActivityReader, ActivityWriter, CustomerListQuery, CustomerReader,
    CustomerWriter, DealListQuery, DealReader, DealWriter, InMemoryRepository,
};

fn new_customer(name: &str, email: &str, status: CustomerStatus) -> NewCustomer {
    NewCustomer::new(
        PersonName::new(name).unwrap(),
        CustomerEmail::new(email).unwrap(),
        Some("  ".to_string()),
        CompanyName::new("Initech").unwrap(),
        status,
        None,
    )
}

#[test]
fn test_customer_repository_crud() {
    let repo = InMemoryRepository::new();

    let alice = repo
        .create_customer(&new_customer("Alice", "alice@example.com", CustomerStatus::Active))
        .unwrap();
    let bob = repo
        .create_customer(&new_customer("Bob", "bob@example.com", CustomerStatus::Pending))
        .unwrap();
    assert_eq!(alice.id.get(), 1);
    assert_eq!(bob.id.get(), 2);
    assert_eq!(alice.phone, None);

    let items = repo.list_customers(&CustomerListQuery::new()).unwrap();
    assert_eq!(items.len(), 2);

    let found = repo
        .list_customers(&CustomerListQuery::new().search("BOB"))
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].name.as_str(), "Bob");

    let pending = repo
        .list_customers(&CustomerListQuery::new().category(CustomerStatus::Pending))
        .unwrap();
    assert_eq!(pending, vec![bob.clone()]);

    let updated = repo
        .update_customer(
            bob.id,
            &new_customer("Bobby", "bob@example.com", CustomerStatus::Active),
        )
        .unwrap();
    assert_eq!(updated.name.as_str(), "Bobby");
    assert_eq!(
        repo.get_customer_by_id(bob.id).unwrap().unwrap().status,
        CustomerStatus::Active
    );

    let duplicate = repo.create_customer(&new_customer(
        "Al",
        "alice@example.com",
        CustomerStatus::Active,
    ));
    assert!(matches!(duplicate, Err(RepositoryError::ConstraintViolation(_))));

    let stolen = repo.update_customer(
        bob.id,
        &new_customer("Bobby", "alice@example.com", CustomerStatus::Active),
    );
    assert!(matches!(stolen, Err(RepositoryError::ConstraintViolation(_))));
}

#[test]
fn test_cloned_handles_share_the_store() {
    let repo = InMemoryRepository::new();
    let other = repo.clone();

    other
        .create_customer(&new_customer("Carol", "carol@example.com", CustomerStatus::Inactive))
        .unwrap();

    assert_eq!(repo.list_customers(&CustomerListQuery::new()).unwrap().len(), 1);
}

#[test]
fn test_deal_repository_crud() {
    let repo = InMemoryRepository::new();
    let new_deal = NewDeal {
        title: Title::new("Platform rollout").unwrap(),
        company: CompanyName::new("Initech").unwrap(),
        contact: PersonName::new("Peter Gibbons").unwrap(),
        value: DealValue::new(42_000.0).unwrap(),
        stage: DealStage::Discovery,
        probability: Probability::new(10).unwrap(),
        expected_close: NaiveDate::from_ymd_opt(2024, 6, 30),
        notes: None,
    };

    let deal = repo.create_deal(&new_deal).unwrap();
    assert_eq!(deal.weighted_value(), 4_200.0);

    let moved = repo
        .update_deal(
            deal.id,
            &NewDeal {
                stage: DealStage::Negotiation,
                probability: Probability::new(70).unwrap(),
                ..new_deal.clone()
            },
        )
        .unwrap();
    assert_eq!(moved.stage, DealStage::Negotiation);

    let in_negotiation = repo
        .list_deals(&DealListQuery::new().category(DealStage::Negotiation))
        .unwrap();
    assert_eq!(in_negotiation.len(), 1);
    assert!(repo
        .list_deals(&DealListQuery::new().search("nothing like this"))
        .unwrap()
        .is_empty());

    let missing = repo.update_deal(
        crm_dashboard::domain::types::DealId::new(99).unwrap(),
        &new_deal,
    );
    assert!(matches!(missing, Err(RepositoryError::NotFound)));
}

#[test]
fn test_activity_timeline_order() {
    let repo = InMemoryRepository::new();
    let at = |day: u32, hour: u32| {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    };
    let activity = |title: &str, customer: &str, created: u32, scheduled: Option<u32>| NewActivity {
        activity_type: ActivityType::Call,
        title: Title::new(title).unwrap(),
        description: None,
        customer_id: customer.to_string(),
        scheduled_at: scheduled.map(|day| at(day, 9)),
        created_at: at(created, 12),
    };

    repo.create_activity(&activity("older", "7", 1, None)).unwrap();
    repo.create_activity(&activity("scheduled later", "7", 2, Some(10))).unwrap();
    repo.create_activity(&activity("newer", "7", 5, None)).unwrap();
    repo.create_activity(&activity("someone else", "8", 9, None)).unwrap();

    let timeline = repo.list_activities(&ActivityListQuery::new("7")).unwrap();
    let titles: Vec<_> = timeline.iter().map(|a| a.title.as_str()).collect();
    assert_eq!(titles, ["scheduled later", "newer", "older"]);

    let emails = repo
        .list_activities(&ActivityListQuery::new("7").activity_type(ActivityType::Email))
        .unwrap();
    assert!(emails.is_empty());
}
