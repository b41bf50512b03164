//! Quote builder form.
//!
//! Each priced service is rendered as one row of repeated `code`, `times`
//! and `price` inputs; `include` repeats the codes whose checkbox is ticked.
//! The body is parsed with `serde_html_form` so the repeated keys collect
//! into vectors.

use serde::Deserialize;

use crate::domain::property::clean_optional;
use crate::domain::types::{Amount, Email, RegionId, ServiceCode, VisitCount};
use crate::forms::{FormError, non_blank, parse_amount_or_zero, parse_optional_i32};

/// Size bands offered by the builder.
pub const SIZE_BANDS: &[&str] = &[
    "0–5,000 sqft",
    "5,001–10,000 sqft",
    "10,001–20,000 sqft",
    ">20,000 sqft",
];

/// Square footage pre-filled in the builder.
pub const DEFAULT_SQFT_ESTIMATE: i32 = 8000;

#[derive(Debug, Deserialize)]
pub struct QuoteForm {
    pub region_id: i32,
    #[serde(default)]
    pub customer_name: String,
    #[serde(default)]
    pub customer_email: String,
    #[serde(default)]
    pub property_name: String,
    #[serde(default)]
    pub property_size_band: String,
    #[serde(default)]
    pub sqft_estimate: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub code: Vec<String>,
    #[serde(default)]
    pub times: Vec<String>,
    #[serde(default)]
    pub price: Vec<String>,
    #[serde(default)]
    pub include: Vec<String>,
}

impl QuoteForm {
    pub fn from_bytes(body: &[u8]) -> Result<Self, FormError> {
        serde_html_form::from_bytes(body).map_err(|e| FormError::Malformed(e.to_string()))
    }
}

/// One edited builder row before it is matched against the region rates.
#[derive(Debug, Clone, PartialEq)]
pub struct QuoteLineInput {
    pub code: ServiceCode,
    pub times_per_year: VisitCount,
    pub price_per_visit: Amount,
    pub included: bool,
}

pub struct QuotePayload {
    pub region_id: RegionId,
    pub customer_name: Option<String>,
    pub customer_email: Option<Email>,
    pub property_name: Option<String>,
    pub property_size_band: Option<String>,
    pub sqft_estimate: Option<i32>,
    pub notes: Option<String>,
    pub lines: Vec<QuoteLineInput>,
}

impl TryFrom<QuoteForm> for QuotePayload {
    type Error = FormError;

    fn try_from(form: QuoteForm) -> Result<Self, Self::Error> {
        if form.code.len() != form.times.len() || form.code.len() != form.price.len() {
            return Err(FormError::Malformed(
                "quote rows are incomplete".to_string(),
            ));
        }

        let included: Vec<ServiceCode> = form
            .include
            .iter()
            .map(|code| ServiceCode::new(code.as_str()))
            .collect::<Result<_, _>>()
            .map_err(|_| FormError::InvalidServiceCode)?;

        let lines = form
            .code
            .iter()
            .zip(form.times.iter())
            .zip(form.price.iter())
            .map(|((code, times), price)| {
                let code =
                    ServiceCode::new(code.as_str()).map_err(|_| FormError::InvalidServiceCode)?;
                let times_per_year = VisitCount::new(parse_optional_i32(times)?.unwrap_or(0))
                    .map_err(|_| FormError::InvalidCount)?;
                let price_per_visit = Amount::new(parse_amount_or_zero(price)?)
                    .map_err(|_| FormError::InvalidAmount)?;
                Ok(QuoteLineInput {
                    included: included.contains(&code),
                    code,
                    times_per_year,
                    price_per_visit,
                })
            })
            .collect::<Result<Vec<_>, FormError>>()?;

        let customer_email = non_blank(&form.customer_email)
            .map(Email::new)
            .transpose()
            .map_err(|_| FormError::InvalidEmail)?;

        let property_size_band = clean_optional(Some(form.property_size_band));
        if let Some(band) = &property_size_band
            && !SIZE_BANDS.contains(&band.as_str())
        {
            return Err(FormError::Malformed(format!("unknown size band {band}")));
        }

        let sqft_estimate = parse_optional_i32(&form.sqft_estimate)?;
        if sqft_estimate.is_some_and(|sqft| sqft < 0) {
            return Err(FormError::InvalidCount);
        }

        Ok(Self {
            region_id: RegionId::new(form.region_id).map_err(|_| FormError::InvalidId)?,
            customer_name: clean_optional(Some(form.customer_name)),
            customer_email,
            property_name: clean_optional(Some(form.property_name)),
            property_size_band,
            sqft_estimate,
            notes: clean_optional(Some(form.notes)),
            lines,
        })
    }
}
