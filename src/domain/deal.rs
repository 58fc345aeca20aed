use std::fmt::{Display, Formatter};
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::domain::types::{
    CompanyName, DealId, DealValue, PersonName, Probability, Title, TypeConstraintError,
};

/// Pipeline stage of a deal, declared in pipeline order.
#[derive(
    Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash, Default,
)]
#[serde(rename_all = "kebab-case")]
pub enum DealStage {
    #[default]
    Discovery,
    Qualified,
    Proposal,
    Negotiation,
    ClosedWon,
    ClosedLost,
}

impl DealStage {
    pub const ALL: [DealStage; 6] = [
        Self::Discovery,
        Self::Qualified,
        Self::Proposal,
        Self::Negotiation,
        Self::ClosedWon,
        Self::ClosedLost,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Discovery => "discovery",
            Self::Qualified => "qualified",
            Self::Proposal => "proposal",
            Self::Negotiation => "negotiation",
            Self::ClosedWon => "closed-won",
            Self::ClosedLost => "closed-lost",
        }
    }

    pub const fn is_closed(self) -> bool {
        matches!(self, Self::ClosedWon | Self::ClosedLost)
    }
}

impl Display for DealStage {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DealStage {
    type Err = TypeConstraintError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|stage| stage.as_str() == s)
            .ok_or_else(|| TypeConstraintError::InvalidValue(s.to_string()))
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Deal {
    pub id: DealId,
    pub title: Title,
    pub company: CompanyName,
    pub contact: PersonName,
    pub value: DealValue,
    pub stage: DealStage,
    pub probability: Probability,
    pub expected_close: Option<NaiveDate>,
    pub last_activity: Option<String>,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
pub struct NewDeal {
    pub title: Title,
    pub company: CompanyName,
    pub contact: PersonName,
    pub value: DealValue,
    pub stage: DealStage,
    pub probability: Probability,
    pub expected_close: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Full replacement of the editable deal fields.
pub type UpdateDeal = NewDeal;

impl Deal {
    pub fn from_new(id: DealId, new: NewDeal) -> Self {
        Self {
            id,
            title: new.title,
            company: new.company,
            contact: new.contact,
            value: new.value,
            stage: new.stage,
            probability: new.probability,
            expected_close: new.expected_close,
            last_activity: None,
            notes: new.notes,
        }
    }

    pub fn apply(&mut self, updates: &UpdateDeal) {
        self.title = updates.title.clone();
        self.company = updates.company.clone();
        self.contact = updates.contact.clone();
        self.value = updates.value;
        self.stage = updates.stage;
        self.probability = updates.probability;
        self.expected_close = updates.expected_close;
        self.notes = updates.notes.clone();
    }

    /// Value scaled by the win probability.
    pub fn weighted_value(&self) -> f64 {
        self.value.get() * f64::from(self.probability.get()) / 100.0
    }
}

/// Headline figures shown above the deals table.
#[derive(Clone, Debug, Serialize, PartialEq, Default)]
pub struct PipelineSummary {
    pub deal_count: usize,
    pub total_value: f64,
    pub weighted_value: f64,
    /// Mean deal value rounded to the nearest whole unit, zero without deals.
    pub average_deal_size: f64,
    /// Share of closed-won deals in whole percent, zero without deals.
    pub win_rate: u32,
}

impl PipelineSummary {
    pub fn from_deals<'a, I>(deals: I) -> Self
    where
        I: IntoIterator<Item = &'a Deal>,
    {
        let mut summary = Self::default();
        let mut won = 0usize;

        for deal in deals {
            summary.deal_count += 1;
            summary.total_value += deal.value.get();
            summary.weighted_value += deal.weighted_value();
            if deal.stage == DealStage::ClosedWon {
                won += 1;
            }
        }

        if summary.deal_count > 0 {
            let count = summary.deal_count as f64;
            summary.average_deal_size = (summary.total_value / count).round();
            summary.win_rate = (won as f64 / count * 100.0).round() as u32;
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn deal(id: i32, value: f64, stage: DealStage, probability: i64) -> Deal {
        Deal {
            id: DealId::new(id).unwrap(),
            title: Title::new("Deal").unwrap(),
            company: CompanyName::new("Acme Corp").unwrap(),
            contact: PersonName::new("John Doe").unwrap(),
            value: DealValue::new(value).unwrap(),
            stage,
            probability: Probability::new(probability).unwrap(),
            expected_close: None,
            last_activity: None,
            notes: None,
        }
    }

    #[test]
    fn stages_keep_pipeline_order() {
        assert!(DealStage::Discovery < DealStage::Negotiation);
        assert!(DealStage::ClosedWon.is_closed());
        assert_eq!("closed-lost".parse::<DealStage>(), Ok(DealStage::ClosedLost));
        assert_eq!(
            serde_json::to_string(&DealStage::ClosedWon).unwrap(),
            "\"closed-won\""
        );
    }

    #[test]
    fn summary_of_empty_pipeline_is_zero() {
        assert_eq!(PipelineSummary::from_deals(&[]), PipelineSummary::default());
    }

    #[test]
    fn summary_aggregates_values() {
        let deals = vec![
            deal(1, 50_000.0, DealStage::Proposal, 75),
            deal(2, 15_000.0, DealStage::ClosedWon, 100),
            deal(3, 25_000.0, DealStage::Negotiation, 60),
        ];

        let summary = PipelineSummary::from_deals(&deals);

        assert_eq!(summary.deal_count, 3);
        assert_eq!(summary.total_value, 90_000.0);
        assert_eq!(summary.weighted_value, 37_500.0 + 15_000.0 + 15_000.0);
        assert_eq!(summary.average_deal_size, 30_000.0);
        assert_eq!(summary.win_rate, 33);
    }
}
