//! Forms for pricing regions, the service catalogue and regional rates.

use serde::Deserialize;

use crate::domain::region::{NewCatalogEntry, NewRegion, NewRegionRate};
use crate::domain::types::{
    Amount, CatalogName, HubId, RegionId, RegionPart, ServiceCode, VisitCount,
};
use crate::forms::{FormError, non_blank, parse_amount_or_zero, parse_optional_i32};

#[derive(Debug, Deserialize)]
pub struct RegionForm {
    pub state: String,
    pub city: String,
    pub property_type: String,
    #[serde(default)]
    pub labor_factor: String,
    #[serde(default)]
    pub material_factor: String,
}

pub struct RegionPayload {
    pub state: RegionPart,
    pub city: RegionPart,
    pub property_type: RegionPart,
    pub labor_factor: f64,
    pub material_factor: f64,
}

/// Blank factors default to 1.0.
fn parse_factor(value: &str) -> Result<f64, FormError> {
    match non_blank(value) {
        Some(_) => parse_amount_or_zero(value),
        None => Ok(1.0),
    }
}

impl TryFrom<RegionForm> for RegionPayload {
    type Error = FormError;

    fn try_from(form: RegionForm) -> Result<Self, Self::Error> {
        let part = |value: String| RegionPart::new(value).map_err(|_| FormError::InvalidName);

        Ok(Self {
            labor_factor: parse_factor(&form.labor_factor)?,
            material_factor: parse_factor(&form.material_factor)?,
            state: part(form.state)?,
            city: part(form.city)?,
            property_type: part(form.property_type)?,
        })
    }
}

impl RegionPayload {
    pub fn into_domain(self, hub_id: HubId) -> NewRegion {
        NewRegion {
            hub_id,
            state: self.state,
            city: self.city,
            property_type: self.property_type,
            labor_factor: self.labor_factor,
            material_factor: self.material_factor,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct CatalogEntryForm {
    pub code: String,
    pub display_name: String,
    #[serde(default)]
    pub default_times_per_year: String,
}

pub struct CatalogEntryPayload {
    pub code: ServiceCode,
    pub display_name: CatalogName,
    pub default_times_per_year: VisitCount,
}

impl TryFrom<CatalogEntryForm> for CatalogEntryPayload {
    type Error = FormError;

    fn try_from(form: CatalogEntryForm) -> Result<Self, Self::Error> {
        let times = parse_optional_i32(&form.default_times_per_year)?.unwrap_or(0);

        Ok(Self {
            code: ServiceCode::new(form.code).map_err(|_| FormError::InvalidServiceCode)?,
            display_name: CatalogName::new(form.display_name)
                .map_err(|_| FormError::InvalidName)?,
            default_times_per_year: VisitCount::new(times)
                .map_err(|_| FormError::InvalidCount)?,
        })
    }
}

impl CatalogEntryPayload {
    pub fn into_domain(self, hub_id: HubId) -> NewCatalogEntry {
        NewCatalogEntry {
            hub_id,
            code: self.code,
            display_name: self.display_name,
            default_times_per_year: self.default_times_per_year,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegionRateForm {
    pub region_id: i32,
    pub service_code: String,
    pub base_price_per_visit: String,
    #[serde(default)]
    pub min_sqft: String,
    #[serde(default)]
    pub max_sqft: String,
    #[serde(default)]
    pub active: Option<String>,
}

impl TryFrom<RegionRateForm> for NewRegionRate {
    type Error = FormError;

    fn try_from(form: RegionRateForm) -> Result<Self, Self::Error> {
        let min_sqft = parse_optional_i32(&form.min_sqft)?;
        let max_sqft = parse_optional_i32(&form.max_sqft)?;
        if let (Some(min), Some(max)) = (min_sqft, max_sqft)
            && min > max
        {
            return Err(FormError::Malformed(
                "minimum square footage exceeds the maximum".to_string(),
            ));
        }

        Ok(Self {
            region_id: RegionId::new(form.region_id).map_err(|_| FormError::InvalidId)?,
            service_code: ServiceCode::new(form.service_code)
                .map_err(|_| FormError::InvalidServiceCode)?,
            base_price_per_visit: Amount::new(parse_amount_or_zero(&form.base_price_per_visit)?)
                .map_err(|_| FormError::InvalidAmount)?,
            min_sqft,
            max_sqft,
            active: form.active.is_some(),
        })
    }
}
