//! CSV spreadsheets offered as downloads on the report screens.

use csv::Writer;
use thiserror::Error;

use crate::domain::fulfilment::PropertyFulfilment;
use crate::domain::portfolio::ConsolidatedRow;
use crate::domain::quote::{Quote, QuoteLineItem, QuoteSummary};

pub const CSV_CONTENT_TYPE: &str = "text/csv; charset=utf-8";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush csv buffer: {0}")]
    Flush(String),
}

fn finish(writer: Writer<Vec<u8>>) -> Result<Vec<u8>, ExportError> {
    writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))
}

fn money(value: f64) -> String {
    format!("{value:.2}")
}

fn percent(value: Option<f64>) -> String {
    value.map(|v| format!("{v:.1}")).unwrap_or_default()
}

pub fn property_fulfilment_filename(property_id: i32, year: i32) -> String {
    format!("property_{property_id}_fulfilment_{year}.csv")
}

pub fn portfolio_fulfilment_filename(year: i32) -> String {
    format!("portfolio_fulfilment_{year}.csv")
}

pub const CONSOLIDATED_FILENAME: &str = "consolidated_report.csv";

pub fn quote_filename(quote_id: i32) -> String {
    format!("quote_{quote_id}.csv")
}

/// One row per service of the property.
pub fn property_fulfilment_csv(fulfilment: &PropertyFulfilment) -> Result<Vec<u8>, ExportError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record([
        "Service",
        "Frequency",
        "Planned Times / Year",
        "Completed",
        "Scheduled",
        "Pending",
        "Completion %",
        "Status",
    ])?;

    for row in &fulfilment.services {
        writer.write_record([
            row.category.clone(),
            row.frequency.clone(),
            row.tally.planned.to_string(),
            row.tally.completed.to_string(),
            row.tally.scheduled.to_string(),
            row.tally.pending.to_string(),
            percent(row.tally.completion_pct),
            row.tally.status.as_str().to_string(),
        ])?;
    }

    finish(writer)
}

/// One row per property of the portfolio.
pub fn portfolio_fulfilment_csv(rows: &[PropertyFulfilment]) -> Result<Vec<u8>, ExportError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record([
        "Property",
        "Planned Visits",
        "Completed Visits",
        "Pending Visits",
        "Completion %",
        "Status",
    ])?;

    for row in rows {
        writer.write_record([
            row.property_name.clone(),
            row.tally.planned.to_string(),
            row.tally.completed.to_string(),
            row.tally.pending.to_string(),
            percent(row.tally.completion_pct),
            row.tally.status.as_str().to_string(),
        ])?;
    }

    finish(writer)
}

pub fn consolidated_csv(rows: &[ConsolidatedRow]) -> Result<Vec<u8>, ExportError> {
    let mut writer = Writer::from_writer(Vec::new());
    writer.write_record([
        "Property ID",
        "Property Name",
        "Total Visits / Year",
        "Total Annual Cost",
        "Annual Quoted Revenue",
        "Annual Credited Revenue",
        "Credited Margin",
        "Credited ROI %",
    ])?;

    for row in rows {
        writer.write_record([
            row.property_id.to_string(),
            row.property_name.clone(),
            row.total_visits.to_string(),
            money(row.total_cost),
            money(row.annual_quote),
            money(row.annual_credited),
            money(row.credited_margin),
            row.roi_pct.map(money).unwrap_or_default(),
        ])?;
    }

    finish(writer)
}

/// Line items followed by a blank line and a metric/value summary block.
pub fn quote_csv(quote: &Quote, items: &[QuoteLineItem]) -> Result<Vec<u8>, ExportError> {
    let summary = QuoteSummary::from_annual(quote.annual_quote.get());

    // Rows of the two blocks differ in width.
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    writer.write_record([
        "Service",
        "Times / Year",
        "Price / Visit ($)",
        "Annual Line Total ($)",
        "Included",
    ])?;

    for item in items {
        writer.write_record([
            item.service_name.clone(),
            item.times_per_year.get().to_string(),
            money(item.price_per_visit.get()),
            money(item.annual_total.get()),
            if item.included { "Yes" } else { "No" }.to_string(),
        ])?;
    }

    writer.write_record([""])?;
    writer.write_record(["Metric", "Value"])?;
    let summary_rows = [
        ("Region", quote.region_label.clone()),
        ("Customer", quote.customer_name.clone().unwrap_or_default()),
        ("Property", quote.property_name.clone().unwrap_or_default()),
        ("Annual Quote", money(summary.annual)),
        ("Monthly (approx)", money(summary.monthly)),
        ("Estimated Cost", money(summary.est_cost)),
        ("Estimated Margin", money(summary.est_margin)),
    ];
    for (metric, value) in summary_rows {
        writer.write_record([metric.to_string(), value])?;
    }

    finish(writer)
}
