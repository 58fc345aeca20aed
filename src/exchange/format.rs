//! Projection of typed records onto human readable export columns.

use serde_json::Value;

use crate::domain::customer::Customer;
use crate::domain::deal::Deal;
use crate::record::Record;

fn text(value: impl Into<String>) -> Value {
    Value::String(value.into())
}

/// Formats a number with `,` thousands separators and at most three decimals.
pub fn format_grouped(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    let fixed = format!("{:.3}", rounded.abs());
    let (integer, fraction) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    let digits = integer.as_bytes();
    let mut grouped = String::with_capacity(integer.len() + integer.len() / 3 + 5);
    if rounded < 0.0 {
        grouped.push('-');
    }
    for (index, digit) in digits.iter().enumerate() {
        if index > 0 && (digits.len() - index) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(char::from(*digit));
    }
    if !fraction.is_empty() {
        grouped.push('.');
        grouped.push_str(fraction);
    }
    grouped
}

/// Display columns for the customers table export.
pub fn format_customer_data(customers: &[Customer]) -> Vec<Record> {
    customers
        .iter()
        .map(|customer| {
            let mut record = Record::new();
            record.insert("Name".into(), text(customer.name.as_str()));
            record.insert("Email".into(), text(customer.email.as_str()));
            record.insert(
                "Phone".into(),
                text(customer.phone.clone().unwrap_or_default()),
            );
            record.insert("Company".into(), text(customer.company.as_str()));
            record.insert("Status".into(), text(customer.status.as_str()));
            record.insert(
                "Last Contact".into(),
                text(customer.last_contact.clone().unwrap_or_default()),
            );
            record
        })
        .collect()
}

/// Display columns for the deals table export.
pub fn format_deal_data(deals: &[Deal]) -> Vec<Record> {
    deals
        .iter()
        .map(|deal| {
            let mut record = Record::new();
            record.insert("Title".into(), text(deal.title.as_str()));
            record.insert("Company".into(), text(deal.company.as_str()));
            record.insert("Contact".into(), text(deal.contact.as_str()));
            record.insert(
                "Value".into(),
                text(format!("${}", format_grouped(deal.value.get()))),
            );
            record.insert("Stage".into(), text(deal.stage.as_str()));
            record.insert("Probability".into(), text(deal.probability.to_string()));
            record.insert(
                "Expected Close".into(),
                text(
                    deal.expected_close
                        .map(|date| date.format("%Y-%m-%d").to_string())
                        .unwrap_or_default(),
                ),
            );
            record
        })
        .collect()
}
