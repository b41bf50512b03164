use serde::{Deserialize, Serialize};

use crate::domain::types::{Amount, PropertyId, PropertyServiceId, ServiceCategory, VisitCount};

/// A recurring service line in the plan of a property.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct PropertyService {
    pub id: PropertyServiceId,
    pub property_id: PropertyId,
    pub category: ServiceCategory,
    pub frequency: String,
    pub times_per_year: VisitCount,
    pub each_time_cost: Amount,
    pub notes: Option<String>,
}

impl PropertyService {
    /// Yearly cost of this line: visits times the per-visit cost.
    pub fn annual_cost(&self) -> f64 {
        f64::from(self.times_per_year.get()) * self.each_time_cost.get()
    }
}

/// Service line fields used for both inserts and updates.
#[derive(Clone, Debug, PartialEq)]
pub struct NewPropertyService {
    pub category: ServiceCategory,
    pub frequency: String,
    pub times_per_year: VisitCount,
    pub each_time_cost: Amount,
    pub notes: Option<String>,
}

impl NewPropertyService {
    #[must_use]
    pub fn new(
        category: ServiceCategory,
        frequency: impl Into<String>,
        times_per_year: VisitCount,
        each_time_cost: Amount,
        notes: Option<String>,
    ) -> Self {
        Self {
            category,
            frequency: frequency.into().trim().to_string(),
            times_per_year,
            each_time_cost,
            notes: crate::domain::property::clean_optional(notes),
        }
    }
}
