use serde::Serialize;

use crate::domain::property::Property;
use crate::domain::property_service::PropertyService;
use crate::domain::types::PropertyId;

/// Financial headline of the whole portfolio.
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct PortfolioTotals {
    pub property_count: usize,
    pub total_quote: f64,
    pub total_credited: f64,
    pub total_cost: f64,
    pub margin: f64,
    pub margin_pct: f64,
}

impl PortfolioTotals {
    pub fn from_properties(properties: &[Property]) -> Self {
        let total_quote: f64 = properties.iter().map(|p| p.annual_quote.get()).sum();
        let total_credited: f64 = properties.iter().map(|p| p.annual_credited.get()).sum();
        let total_cost: f64 = properties.iter().map(|p| p.annual_cost.get()).sum();
        let margin = total_credited - total_cost;
        let margin_pct = if total_credited > 0.0 {
            margin / total_credited * 100.0
        } else {
            0.0
        };

        Self {
            property_count: properties.len(),
            total_quote,
            total_credited,
            total_cost,
            margin,
            margin_pct,
        }
    }
}

/// Counters shown on the dashboard for each admin area.
#[derive(Clone, Copy, Debug, Default, Serialize, PartialEq, Eq)]
pub struct ModuleHealth {
    pub open_tickets: usize,
    pub overdue_events: usize,
    pub active_staff: usize,
    pub price_entries: usize,
}

/// One line of the consolidated portfolio report.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct ConsolidatedRow {
    pub property_id: PropertyId,
    pub property_name: String,
    pub total_visits: i32,
    pub total_cost: f64,
    pub annual_quote: f64,
    pub annual_credited: f64,
    pub credited_margin: f64,
    /// `None` when the property has no service cost.
    pub roi_pct: Option<f64>,
}

pub fn consolidated_rows(
    properties: &[Property],
    services: &[PropertyService],
) -> Vec<ConsolidatedRow> {
    properties
        .iter()
        .map(|property| {
            let own = services.iter().filter(|s| s.property_id == property.id);
            let (total_visits, total_cost) = own.fold((0, 0.0), |(visits, cost), s| {
                (visits + s.times_per_year.get(), cost + s.annual_cost())
            });
            let credited = property.annual_credited.get();
            let credited_margin = credited - total_cost;
            let roi_pct = (total_cost > 0.0).then(|| credited_margin / total_cost * 100.0);

            ConsolidatedRow {
                property_id: property.id,
                property_name: property.name.to_string(),
                total_visits,
                total_cost,
                annual_quote: property.annual_quote.get(),
                annual_credited: credited,
                credited_margin,
                roi_pct,
            }
        })
        .collect()
}
