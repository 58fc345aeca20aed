use std::path::PathBuf;

use serde_json::Value;

use crate::domain::deal::{Deal, DealStage, NewDeal, PipelineSummary};
use crate::domain::types::DealId;
pub use crate::dto::deals::{DealsPageData, DealsQuery};
use crate::exchange::{DownloadSink, ExportFormat, format_deal_data};
use crate::forms::deal::DealForm;
use crate::forms::validate_form;
use crate::repository::{DealListQuery, DealReader, DealWriter};
use crate::search::{MatchCase, SearchFilter, advanced_search};
use crate::services::{
    ServiceError, ServiceResult, deliver_records, normalize_search, parse_category, require_user,
};
use crate::session::AuthState;

fn list_query(query: &DealsQuery) -> ServiceResult<DealListQuery> {
    let mut list_query = DealListQuery::new();
    if let Some(term) = normalize_search(query.search.clone()) {
        list_query = list_query.search(term);
    }
    if let Some(stage) = parse_category::<DealStage>(query.stage.as_deref())? {
        list_query = list_query.category(stage);
    }
    Ok(list_query)
}

fn list_deals<R>(repo: &R, query: &DealListQuery) -> ServiceResult<Vec<Deal>>
where
    R: DealReader + ?Sized,
{
    repo.list_deals(query).map_err(|err| {
        log::error!("Failed to list deals: {err}");
        ServiceError::from(err)
    })
}

/// Loads the deals table and the pipeline cards for the shown deals.
pub fn load_deals<R>(
    session: &AuthState,
    repo: &R,
    query: DealsQuery,
) -> ServiceResult<DealsPageData>
where
    R: DealReader + ?Sized,
{
    require_user(session)?;

    let deals = list_deals(repo, &list_query(&query)?)?;
    let summary = PipelineSummary::from_deals(&deals);

    Ok(DealsPageData {
        deals,
        summary,
        search_query: normalize_search(query.search),
        stage: query.stage,
    })
}

/// Headline figures over the whole pipeline.
pub fn pipeline_summary<R>(session: &AuthState, repo: &R) -> ServiceResult<PipelineSummary>
where
    R: DealReader + ?Sized,
{
    require_user(session)?;

    let deals = list_deals(repo, &DealListQuery::new())?;
    Ok(PipelineSummary::from_deals(&deals))
}

/// Deals satisfying every active advanced search clause.
pub fn search_deals<R>(
    session: &AuthState,
    repo: &R,
    filters: &[SearchFilter],
    case: MatchCase,
) -> ServiceResult<Vec<Deal>>
where
    R: DealReader + ?Sized,
{
    require_user(session)?;

    let deals = list_deals(repo, &DealListQuery::new())?;
    Ok(advanced_search(&deals, filters, case)
        .into_iter()
        .cloned()
        .collect())
}

/// Validates the add-deal form and persists a new deal.
pub fn add_deal<R>(session: &AuthState, repo: &R, data: &Value) -> ServiceResult<Deal>
where
    R: DealWriter + ?Sized,
{
    require_user(session)?;

    let form = validate_form::<DealForm>(data).map_err(|err| {
        log::error!("Failed to validate deal form: {err}");
        ServiceError::from(err)
    })?;
    let new_deal = NewDeal::try_from(form)?;

    repo.create_deal(&new_deal).map_err(|err| {
        log::error!("Failed to add a deal: {err}");
        ServiceError::from(err)
    })
}

/// Validates the edit form and replaces the deal's editable fields.
pub fn update_deal<R>(
    session: &AuthState,
    repo: &R,
    deal_id: i32,
    data: &Value,
) -> ServiceResult<Deal>
where
    R: DealReader + DealWriter + ?Sized,
{
    require_user(session)?;

    let deal_id = DealId::new(deal_id)?;
    if repo.get_deal_by_id(deal_id)?.is_none() {
        return Err(ServiceError::NotFound);
    }

    let form = validate_form::<DealForm>(data).map_err(|err| {
        log::error!("Failed to validate deal form: {err}");
        ServiceError::from(err)
    })?;
    let updates = NewDeal::try_from(form)?;

    repo.update_deal(deal_id, &updates).map_err(|err| {
        log::error!("Failed to update deal {deal_id}: {err}");
        ServiceError::from(err)
    })
}

/// Exports the filtered deals with display column names.
pub fn export_deals<R, S>(
    session: &AuthState,
    repo: &R,
    query: DealsQuery,
    format: ExportFormat,
    sink: &S,
) -> ServiceResult<Option<PathBuf>>
where
    R: DealReader + ?Sized,
    S: DownloadSink + ?Sized,
{
    let page = load_deals(session, repo, query)?;
    let records = format_deal_data(&page.deals);
    deliver_records(&records, "deals", format, sink)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::exchange::MemorySink;
    use crate::repository::InMemoryRepository;
    use crate::search::FilterOperator;
    use crate::services::test_support::{anonymous, signed_in};

    fn deal_payload() -> Value {
        json!({
            "title": "Data Migration",
            "company": "Northwind",
            "contact": "Ada Lovelace",
            "value": 12000,
            "stage": "qualified",
            "probability": 50,
            "expectedClose": "2024-04-01",
        })
    }

    #[test]
    fn summary_over_sample_pipeline() {
        let repo = InMemoryRepository::with_sample_data().unwrap();

        let summary = pipeline_summary(&signed_in(), &repo).unwrap();

        assert_eq!(summary.deal_count, 5);
        assert_eq!(summary.total_value, 200_000.0);
        assert_eq!(summary.weighted_value, 106_250.0);
        assert_eq!(summary.average_deal_size, 40_000.0);
        assert_eq!(summary.win_rate, 20);
    }

    #[test]
    fn page_summary_follows_the_filter() {
        let repo = InMemoryRepository::with_sample_data().unwrap();

        let page = load_deals(
            &signed_in(),
            &repo,
            DealsQuery {
                search: None,
                stage: Some("closed-won".to_string()),
            },
        )
        .unwrap();

        assert_eq!(page.deals.len(), 1);
        assert_eq!(page.summary.total_value, 15_000.0);
        assert_eq!(page.summary.win_rate, 100);
    }

    #[test]
    fn unknown_stage_is_a_form_error() {
        let repo = InMemoryRepository::with_sample_data().unwrap();

        let result = load_deals(
            &signed_in(),
            &repo,
            DealsQuery {
                search: None,
                stage: Some("won".to_string()),
            },
        );

        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn add_and_update_deal() {
        let repo = InMemoryRepository::new();
        let session = signed_in();

        let created = add_deal(&session, &repo, &deal_payload()).unwrap();
        assert_eq!(created.stage, DealStage::Qualified);
        assert_eq!(created.weighted_value(), 6_000.0);

        let mut payload = deal_payload();
        payload["stage"] = json!("closed-won");
        payload["probability"] = json!(100);
        let updated = update_deal(&session, &repo, created.id.get(), &payload).unwrap();

        assert_eq!(updated.stage, DealStage::ClosedWon);
        assert_eq!(updated.probability.get(), 100);
    }

    #[test]
    fn add_rejects_non_positive_value() {
        let repo = InMemoryRepository::new();
        let mut payload = deal_payload();
        payload["value"] = json!(0);

        match add_deal(&signed_in(), &repo, &payload) {
            Err(ServiceError::Validation(errors)) => {
                assert_eq!(errors.errors(), ["value: Value must be positive"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn add_requires_signed_in_user() {
        let repo = InMemoryRepository::new();

        let result = add_deal(&anonymous(), &repo, &deal_payload());

        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }

    #[test]
    fn advanced_search_on_deals() {
        let repo = InMemoryRepository::with_sample_data().unwrap();
        let filters = vec![SearchFilter::new("title", FilterOperator::EndsWith, "Services")];

        let found = search_deals(&signed_in(), &repo, &filters, MatchCase::Sensitive).unwrap();

        assert_eq!(found.len(), 1);
        assert_eq!(found[0].title.as_str(), "Consulting Services");
    }

    #[test]
    fn export_formats_value_and_probability() {
        let repo = InMemoryRepository::with_sample_data().unwrap();
        let sink = MemorySink::new();

        export_deals(
            &signed_in(),
            &repo,
            DealsQuery {
                search: Some("enterprise".to_string()),
                stage: None,
            },
            ExportFormat::Json,
            &sink,
        )
        .unwrap();

        let delivered = sink.delivered();
        assert_eq!(delivered[0].filename, "deals.json");
        let rows: Value = serde_json::from_str(&delivered[0].content).unwrap();
        assert_eq!(rows[0]["Value"], "$50,000");
        assert_eq!(rows[0]["Probability"], "75%");
        assert_eq!(rows[0]["Expected Close"], "2024-02-15");
    }
}
