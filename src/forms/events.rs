//! Forms for the visit scheduler.

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use validator::Validate;

use crate::domain::property::clean_optional;
use crate::domain::service_event::{EventStatusUpdate, NewServiceEvent};
use crate::domain::types::{
    EventStatus, HubId, PropertyId, PropertyServiceId, ServiceCategory, ServicePersonId,
};
use crate::forms::{FormError, non_blank, parse_date, parse_optional_id, parse_optional_time};

#[derive(Debug, Deserialize, Validate)]
pub struct ScheduleEventForm {
    pub property_id: i32,
    /// Service line of the property; blank for an ad-hoc visit.
    #[serde(default)]
    pub service_id: String,
    #[serde(default)]
    pub provider_id: String,
    /// Category of an ad-hoc visit.
    #[serde(default)]
    #[validate(length(max = 120))]
    pub category: String,
    pub scheduled_date: String,
    #[serde(default)]
    pub scheduled_time: String,
    #[serde(default)]
    pub followup_required: Option<String>,
    #[serde(default)]
    pub followup_notes: String,
}

pub struct ScheduleEventPayload {
    pub property_id: PropertyId,
    pub service_id: Option<PropertyServiceId>,
    pub provider_id: Option<ServicePersonId>,
    pub category: Option<ServiceCategory>,
    pub scheduled_date: NaiveDate,
    pub scheduled_time: Option<NaiveTime>,
    pub followup_required: bool,
    pub followup_notes: Option<String>,
}

impl TryFrom<ScheduleEventForm> for ScheduleEventPayload {
    type Error = FormError;

    fn try_from(form: ScheduleEventForm) -> Result<Self, Self::Error> {
        form.validate()?;

        let property_id = PropertyId::new(form.property_id).map_err(|_| FormError::InvalidId)?;
        let service_id = parse_optional_id(&form.service_id)?
            .map(PropertyServiceId::new)
            .transpose()
            .map_err(|_| FormError::InvalidId)?;
        let provider_id = parse_optional_id(&form.provider_id)?
            .map(ServicePersonId::new)
            .transpose()
            .map_err(|_| FormError::InvalidId)?;
        let category = non_blank(&form.category)
            .map(ServiceCategory::new)
            .transpose()
            .map_err(|_| FormError::MissingCategory)?;

        if service_id.is_none() && category.is_none() {
            return Err(FormError::MissingCategory);
        }

        Ok(Self {
            property_id,
            service_id,
            provider_id,
            category,
            scheduled_date: parse_date(&form.scheduled_date)?,
            scheduled_time: parse_optional_time(&form.scheduled_time)?,
            followup_required: form.followup_required.is_some(),
            followup_notes: clean_optional(Some(form.followup_notes)),
        })
    }
}

impl ScheduleEventPayload {
    /// `category` is the resolved category: the service line's when one was
    /// chosen, else the ad-hoc one.
    pub fn into_domain(self, hub_id: HubId, category: ServiceCategory) -> NewServiceEvent {
        NewServiceEvent {
            hub_id,
            property_id: self.property_id,
            service_id: self.service_id,
            provider_id: self.provider_id,
            service_category: category,
            scheduled_date: self.scheduled_date,
            scheduled_time: self.scheduled_time,
            followup_required: self.followup_required,
            followup_notes: self.followup_notes,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct EventStatusForm {
    pub status: String,
    #[serde(default)]
    pub followup_required: Option<String>,
    #[serde(default)]
    pub followup_notes: String,
    #[serde(default)]
    pub notify_owners: Option<String>,
}

pub struct EventStatusPayload {
    pub update: EventStatusUpdate,
    pub notify_owners: bool,
}

impl TryFrom<EventStatusForm> for EventStatusPayload {
    type Error = FormError;

    fn try_from(form: EventStatusForm) -> Result<Self, Self::Error> {
        let status = form
            .status
            .parse::<EventStatus>()
            .map_err(|_| FormError::InvalidStatus)?;

        Ok(Self {
            update: EventStatusUpdate {
                status,
                followup_required: form.followup_required.is_some(),
                followup_notes: clean_optional(Some(form.followup_notes)),
            },
            notify_owners: form.notify_owners.is_some(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schedule_form(service_id: &str, category: &str) -> ScheduleEventForm {
        ScheduleEventForm {
            property_id: 3,
            service_id: service_id.to_string(),
            provider_id: String::new(),
            category: category.to_string(),
            scheduled_date: "2025-05-10".to_string(),
            scheduled_time: "08:15".to_string(),
            followup_required: None,
            followup_notes: String::new(),
        }
    }

    #[test]
    fn ad_hoc_visit_requires_category() {
        assert!(matches!(
            ScheduleEventPayload::try_from(schedule_form("", " ")),
            Err(FormError::MissingCategory)
        ));

        let payload =
            ScheduleEventPayload::try_from(schedule_form("", "Irrigation check")).unwrap();
        assert!(payload.service_id.is_none());
        assert_eq!(
            payload.category.as_ref().map(ServiceCategory::as_str),
            Some("Irrigation check")
        );
        assert_eq!(payload.scheduled_time, NaiveTime::from_hms_opt(8, 15, 0));
    }

    #[test]
    fn service_visit_needs_no_category() {
        let payload = ScheduleEventPayload::try_from(schedule_form("12", "")).unwrap();
        assert_eq!(payload.service_id.map(PropertyServiceId::get), Some(12));
        assert!(payload.category.is_none());
    }

    #[test]
    fn bad_date_is_rejected() {
        let mut form = schedule_form("12", "");
        form.scheduled_date = "10/05/2025".to_string();
        assert!(matches!(
            ScheduleEventPayload::try_from(form),
            Err(FormError::InvalidDate)
        ));
    }

    #[test]
    fn status_form_parses_flags() {
        let form = EventStatusForm {
            status: "Completed".to_string(),
            followup_required: Some("on".to_string()),
            followup_notes: " check edging ".to_string(),
            notify_owners: None,
        };

        let payload = EventStatusPayload::try_from(form).unwrap();
        assert_eq!(payload.update.status, EventStatus::Completed);
        assert!(payload.update.followup_required);
        assert_eq!(payload.update.followup_notes.as_deref(), Some("check edging"));
        assert!(!payload.notify_owners);
    }

    #[test]
    fn unknown_status_is_rejected() {
        let form = EventStatusForm {
            status: "Done".to_string(),
            followup_required: None,
            followup_notes: String::new(),
            notify_owners: None,
        };
        assert!(matches!(
            EventStatusPayload::try_from(form),
            Err(FormError::InvalidStatus)
        ));
    }
}
