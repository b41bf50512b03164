use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::property::{PropertyDetails, clean_optional};
use crate::domain::property_service::NewPropertyService;
use crate::domain::types::{
    Amount, Email, HubId, PropertyId, PropertyName, QuoteId, ServiceCategory, ServiceCode,
    TypeConstraintError, VisitCount,
};

/// Share of the annual quote assumed to be spent on delivery.
pub const ESTIMATED_COST_RATIO: f64 = 0.6;

/// Saved customer quote.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Quote {
    pub id: QuoteId,
    pub hub_id: HubId,
    pub region_label: String,
    pub customer_name: Option<String>,
    pub customer_email: Option<Email>,
    pub property_name: Option<String>,
    pub property_size_band: Option<String>,
    pub sqft_estimate: Option<i32>,
    pub notes: Option<String>,
    pub annual_quote: Amount,
    /// Property created from this quote, once converted.
    pub converted_property_id: Option<PropertyId>,
    pub created_at: NaiveDateTime,
}

#[derive(Clone, Debug, PartialEq)]
pub struct NewQuote {
    pub hub_id: HubId,
    pub region_label: String,
    pub customer_name: Option<String>,
    pub customer_email: Option<Email>,
    pub property_name: Option<String>,
    pub property_size_band: Option<String>,
    pub sqft_estimate: Option<i32>,
    pub notes: Option<String>,
    pub annual_quote: Amount,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct QuoteLineItem {
    pub id: i32,
    pub quote_id: QuoteId,
    pub service_code: ServiceCode,
    pub service_name: String,
    pub times_per_year: VisitCount,
    pub price_per_visit: Amount,
    pub annual_total: Amount,
    pub included: bool,
}

#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct NewQuoteLineItem {
    pub service_code: ServiceCode,
    pub service_name: String,
    pub times_per_year: VisitCount,
    pub price_per_visit: Amount,
    pub annual_total: Amount,
    pub included: bool,
}

impl NewQuoteLineItem {
    /// Builds a line, pricing it at `times * price` when included and zero
    /// otherwise.
    pub fn new(
        service_code: ServiceCode,
        service_name: impl Into<String>,
        times_per_year: VisitCount,
        price_per_visit: Amount,
        included: bool,
    ) -> Self {
        let annual_total = if included {
            Amount::new(f64::from(times_per_year.get()) * price_per_visit.get())
                .unwrap_or_default()
        } else {
            Amount::ZERO
        };

        Self {
            service_code,
            service_name: service_name.into(),
            times_per_year,
            price_per_visit,
            annual_total,
            included,
        }
    }
}

/// Headline figures of a quote.
#[derive(Clone, Copy, Debug, Serialize, PartialEq)]
pub struct QuoteSummary {
    pub annual: f64,
    pub monthly: f64,
    pub est_cost: f64,
    pub est_margin: f64,
    pub margin_pct: f64,
}

impl QuoteSummary {
    pub fn from_annual(annual: f64) -> Self {
        let est_cost = annual * ESTIMATED_COST_RATIO;
        let est_margin = annual - est_cost;
        let margin_pct = if annual > 0.0 {
            est_margin / annual * 100.0
        } else {
            0.0
        };

        Self {
            annual,
            monthly: annual / 12.0,
            est_cost,
            est_margin,
            margin_pct,
        }
    }

    pub fn from_lines<'a, I>(totals: I) -> Self
    where
        I: IntoIterator<Item = &'a Amount>,
    {
        Self::from_annual(totals.into_iter().map(|a| a.get()).sum())
    }
}

/// Property and service plan derived from a quote.
#[derive(Clone, Debug, PartialEq)]
pub struct QuoteConversion {
    pub property: PropertyDetails,
    pub services: Vec<NewPropertyService>,
}

/// Frequency label shown for a converted service line.
pub fn frequency_label(service_name: &str, times_per_year: i32) -> String {
    if service_name.to_lowercase().contains("mulch") {
        return "Every 6 Months".to_string();
    }
    match times_per_year {
        22 => "Weekly (22 visits)".to_string(),
        3 => "3 Times / Year".to_string(),
        5 => "5 Times / Year".to_string(),
        2 => "Twice / Year".to_string(),
        1 => "Once / Year".to_string(),
        n if n <= 0 => "Not configured".to_string(),
        n => format!("{n} Times / Year"),
    }
}

/// State and city taken from a `"{state} - {city} - ..."` region label.
pub fn region_location(label: &str) -> (Option<String>, Option<String>) {
    let mut parts = label.split('-').map(str::trim);
    let state = parts.next().filter(|s| !s.is_empty()).map(str::to_string);
    let city = parts.next().filter(|s| !s.is_empty()).map(str::to_string);
    (state, city)
}

impl Quote {
    /// Builds the property and one service per included line item.
    pub fn conversion(
        &self,
        items: &[QuoteLineItem],
    ) -> Result<QuoteConversion, TypeConstraintError> {
        let (state, city) = region_location(&self.region_label);
        let name = clean_optional(self.property_name.clone())
            .unwrap_or_else(|| format!("Quoted Property #{}", self.id));

        let property = PropertyDetails {
            name: PropertyName::new(name)?,
            address: None,
            city,
            state,
            zip: None,
            annual_quote: self.annual_quote,
            annual_credited: Amount::ZERO,
            annual_cost: Amount::ZERO,
        };

        let services = items
            .iter()
            .filter(|item| item.included)
            .map(|item| {
                let category = ServiceCategory::new(item.service_name.as_str())
                    .or_else(|_| ServiceCategory::new(item.service_code.as_str()))?;
                Ok(NewPropertyService::new(
                    category,
                    frequency_label(&item.service_name, item.times_per_year.get()),
                    item.times_per_year,
                    item.price_per_visit,
                    Some(format!("Imported from quote #{}", self.id)),
                ))
            })
            .collect::<Result<Vec<_>, TypeConstraintError>>()?;

        Ok(QuoteConversion { property, services })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn quote(property_name: Option<&str>) -> Quote {
        Quote {
            id: QuoteId::new(7).unwrap(),
            hub_id: HubId::new(1).unwrap(),
            region_label: "TX - Frisco - Small Industrial".to_string(),
            customer_name: Some("Acme".to_string()),
            customer_email: None,
            property_name: property_name.map(str::to_string),
            property_size_band: None,
            sqft_estimate: None,
            notes: None,
            annual_quote: Amount::new(3135.0).unwrap(),
            converted_property_id: None,
            created_at: NaiveDate::from_ymd_opt(2025, 1, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        }
    }

    fn item(code: &str, name: &str, times: i32, price: f64, included: bool) -> QuoteLineItem {
        let line = NewQuoteLineItem::new(
            ServiceCode::new(code).unwrap(),
            name,
            VisitCount::new(times).unwrap(),
            Amount::new(price).unwrap(),
            included,
        );
        QuoteLineItem {
            id: 1,
            quote_id: QuoteId::new(7).unwrap(),
            service_code: line.service_code,
            service_name: line.service_name,
            times_per_year: line.times_per_year,
            price_per_visit: line.price_per_visit,
            annual_total: line.annual_total,
            included: line.included,
        }
    }

    #[test]
    fn excluded_lines_are_priced_at_zero() {
        let included = item("MOWING", "Mowing", 22, 60.0, true);
        let excluded = item("MULCH", "Mulch", 2, 600.0, false);

        assert_eq!(included.annual_total.get(), 1320.0);
        assert_eq!(excluded.annual_total, Amount::ZERO);
    }

    #[test]
    fn summary_derives_monthly_cost_and_margin() {
        let summary = QuoteSummary::from_annual(1200.0);
        assert_eq!(summary.monthly, 100.0);
        assert_eq!(summary.est_cost, 720.0);
        assert_eq!(summary.est_margin, 480.0);
        assert!((summary.margin_pct - 40.0).abs() < 1e-9);

        let empty = QuoteSummary::from_annual(0.0);
        assert_eq!(empty.margin_pct, 0.0);
    }

    #[test]
    fn frequency_labels_follow_visit_counts() {
        assert_eq!(frequency_label("Mulch", 2), "Every 6 Months");
        assert_eq!(frequency_label("Mowing", 22), "Weekly (22 visits)");
        assert_eq!(frequency_label("Weed Control", 3), "3 Times / Year");
        assert_eq!(frequency_label("Fertilizer", 5), "5 Times / Year");
        assert_eq!(frequency_label("Tree & Shrub", 2), "Twice / Year");
        assert_eq!(frequency_label("Aeration", 1), "Once / Year");
        assert_eq!(frequency_label("Aeration", 0), "Not configured");
        assert_eq!(frequency_label("Aeration", 12), "12 Times / Year");
    }

    #[test]
    fn region_location_splits_label() {
        assert_eq!(
            region_location("TX - Frisco - Small Industrial"),
            (Some("TX".to_string()), Some("Frisco".to_string()))
        );
        assert_eq!(region_location("TX"), (Some("TX".to_string()), None));
        assert_eq!(region_location(""), (None, None));
    }

    #[test]
    fn conversion_keeps_only_included_lines() {
        let items = vec![
            item("MOWING", "Mowing", 22, 60.0, true),
            item("MULCH", "Mulch", 2, 600.0, false),
        ];

        let conversion = quote(None).conversion(&items).unwrap();

        assert_eq!(conversion.property.name.as_str(), "Quoted Property #7");
        assert_eq!(conversion.property.state.as_deref(), Some("TX"));
        assert_eq!(conversion.property.city.as_deref(), Some("Frisco"));
        assert_eq!(conversion.property.annual_quote.get(), 3135.0);
        assert_eq!(conversion.services.len(), 1);
        assert_eq!(conversion.services[0].frequency, "Weekly (22 visits)");
        assert_eq!(
            conversion.services[0].notes.as_deref(),
            Some("Imported from quote #7")
        );
    }

    #[test]
    fn conversion_uses_quoted_property_name() {
        let conversion = quote(Some("North Campus")).conversion(&[]).unwrap();
        assert_eq!(conversion.property.name.as_str(), "North Campus");
    }
}
