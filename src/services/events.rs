//! Visit scheduling, status tracking and reminders.

use chrono::{Duration, NaiveDate};

use crate::SERVICE_ADMIN_ROLE;
use crate::domain::owner::Owner;
use crate::domain::service_event::{ScheduledVisit, ServiceEvent};
use crate::domain::types::{HubId, ServiceEventId};
use crate::dto::NotifyOutcome;
use crate::dto::events::{EventRow, EventsPageData, EventsQuery};
use crate::forms::events::{
    EventStatusForm, EventStatusPayload, ScheduleEventForm, ScheduleEventPayload,
};
use crate::models::auth::AuthenticatedUser;
use crate::models::zmq::ZmqNotification;
use crate::notify::Notifier;
use crate::repository::{
    OwnerReader, PropertyListQuery, PropertyReader, ServiceEventListQuery, ServiceEventReader,
    ServiceEventWriter, ServicePersonReader,
};
use crate::services::{ServiceError, ServiceResult, deliver, ensure_role};

/// Days before today included in the default window.
pub const DEFAULT_WINDOW_PAST_DAYS: i64 = 7;
/// Days after today included in the default window.
pub const DEFAULT_WINDOW_FUTURE_DAYS: i64 = 30;

/// Loads the visits of the window with their due states, plus the choices
/// for the schedule form.
pub fn list_events<R>(
    repo: &R,
    user: &AuthenticatedUser,
    query: EventsQuery,
    today: NaiveDate,
) -> ServiceResult<EventsPageData>
where
    R: ServiceEventReader + PropertyReader + ServicePersonReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let from = query
        .from
        .unwrap_or(today - Duration::days(DEFAULT_WINDOW_PAST_DAYS));
    let to = query
        .to
        .unwrap_or(today + Duration::days(DEFAULT_WINDOW_FUTURE_DAYS));
    if from > to {
        return Err(ServiceError::Form(
            "The start of the window is after its end.".to_string(),
        ));
    }

    let rows = repo
        .list_service_events(ServiceEventListQuery::new(hub_id).between(from, to))
        .map_err(|err| {
            log::error!("Failed to list service events: {err}");
            err
        })?
        .into_iter()
        .map(|visit| EventRow {
            due_state: visit.event.due_state(today),
            visit,
        })
        .collect();

    let (_, properties) = repo.list_properties(PropertyListQuery::new(hub_id))?;
    let services = repo.list_hub_property_services(hub_id)?;
    let providers = repo.list_service_people(hub_id, true)?;

    Ok(EventsPageData {
        rows,
        from,
        to,
        properties,
        services,
        providers,
    })
}

/// Schedules a visit. A chosen service line supplies the category; ad-hoc
/// visits carry their own.
pub fn schedule_event<R>(
    repo: &R,
    user: &AuthenticatedUser,
    form: ScheduleEventForm,
) -> ServiceResult<ServiceEvent>
where
    R: PropertyReader + ServicePersonReader + ServiceEventWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let payload = ScheduleEventPayload::try_from(form)?;
    let hub_id = HubId::new(user.hub_id)?;

    repo.get_property_by_id(payload.property_id, hub_id)?
        .ok_or_else(|| ServiceError::Form("Unknown property.".to_string()))?;

    let category = match payload.service_id {
        Some(service_id) => {
            repo.get_property_service_by_id(service_id, payload.property_id)?
                .ok_or_else(|| {
                    ServiceError::Form("The service does not belong to the property.".to_string())
                })?
                .category
        }
        None => payload
            .category
            .clone()
            .ok_or_else(|| ServiceError::Form("Category is required.".to_string()))?,
    };

    if let Some(provider_id) = payload.provider_id {
        let provider = repo.get_service_person_by_id(provider_id, hub_id)?;
        if !provider.is_some_and(|p| p.is_active) {
            return Err(ServiceError::Form(
                "The provider is unknown or inactive.".to_string(),
            ));
        }
    }

    let event = repo
        .create_service_event(&payload.into_domain(hub_id, category))
        .map_err(|err| {
            log::error!("Failed to schedule service event: {err}");
            err
        })?;

    Ok(event)
}

fn status_messages(
    hub_id: HubId,
    visit: &ScheduledVisit,
    owners: &[Owner],
) -> Vec<ZmqNotification> {
    let event = &visit.event;
    let subject = format!(
        "{} visit {}: {}",
        event.service_category, event.status, visit.property_name
    );
    let body = format!(
        "The {} visit at {} scheduled for {} is now {}.",
        event.service_category, visit.property_name, event.scheduled_date, event.status
    );

    let mut messages = Vec::new();
    for owner in owners {
        messages.push(ZmqNotification::email(
            hub_id.get(),
            owner.email.as_str(),
            subject.clone(),
            body.clone(),
        ));
        if let Some(phone) = &owner.phone {
            messages.push(ZmqNotification::sms(hub_id.get(), phone.as_str(), body.clone()));
        }
    }
    messages
}

/// Records the new status. When asked, the property owners are e-mailed and
/// texted; delivery problems are reported in the outcome only.
pub fn update_event_status<R, N>(
    repo: &R,
    notifier: &N,
    user: &AuthenticatedUser,
    event_id: i32,
    form: EventStatusForm,
) -> ServiceResult<NotifyOutcome>
where
    R: ServiceEventWriter + PropertyReader + OwnerReader + ?Sized,
    N: Notifier + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let payload = EventStatusPayload::try_from(form)?;
    let hub_id = HubId::new(user.hub_id)?;
    let event_id = ServiceEventId::new(event_id)?;

    let event = repo.update_service_event_status(event_id, hub_id, &payload.update)?;

    if !payload.notify_owners {
        return Ok(NotifyOutcome::default());
    }

    let property_name = repo
        .get_property_by_id(event.property_id, hub_id)?
        .map(|p| p.name.into_inner())
        .unwrap_or_default();
    let owners = repo.list_property_owners(event.property_id, hub_id)?;
    let visit = ScheduledVisit {
        event,
        property_name,
        provider: None,
    };

    Ok(deliver(notifier, &status_messages(hub_id, &visit, &owners)))
}

pub fn delete_event<R>(repo: &R, user: &AuthenticatedUser, event_id: i32) -> ServiceResult<()>
where
    R: ServiceEventWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let event_id = ServiceEventId::new(event_id)?;

    repo.delete_service_event(event_id, hub_id)?;

    Ok(())
}

/// Reminds the assigned provider by e-mail and/or SMS. The reminder time is
/// stamped once at least one message went out.
pub fn send_reminder<R, N>(
    repo: &R,
    notifier: &N,
    user: &AuthenticatedUser,
    event_id: i32,
) -> ServiceResult<NotifyOutcome>
where
    R: ServiceEventReader + ServiceEventWriter + ServicePersonReader + PropertyReader + ?Sized,
    N: Notifier + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let event_id = ServiceEventId::new(event_id)?;

    let event = repo
        .get_service_event_by_id(event_id, hub_id)?
        .ok_or(ServiceError::NotFound)?;

    let provider = match event.provider_id {
        Some(provider_id) => repo.get_service_person_by_id(provider_id, hub_id)?,
        None => None,
    }
    .filter(|p| p.is_reachable())
    .ok_or_else(|| {
        ServiceError::Form("The visit has no provider with an e-mail or phone.".to_string())
    })?;

    let property_name = repo
        .get_property_by_id(event.property_id, hub_id)?
        .map(|p| p.name.into_inner())
        .unwrap_or_default();
    let when = match event.scheduled_time {
        Some(time) => format!("{} at {}", event.scheduled_date, time.format("%H:%M")),
        None => event.scheduled_date.to_string(),
    };
    let body = format!(
        "Reminder: {} at {} on {}.",
        event.service_category, property_name, when
    );

    let mut messages = Vec::new();
    if let Some(email) = &provider.email {
        messages.push(ZmqNotification::email(
            hub_id.get(),
            email.as_str(),
            format!("Visit reminder: {property_name}"),
            body.clone(),
        ));
    }
    if let Some(phone) = &provider.phone {
        messages.push(ZmqNotification::sms(hub_id.get(), phone.as_str(), body));
    }

    let outcome = deliver(notifier, &messages);
    if outcome.sent == 0 {
        return Err(ServiceError::Internal(
            "no reminder could be delivered".to_string(),
        ));
    }

    repo.mark_service_event_reminded(event_id, hub_id)?;

    Ok(outcome)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::types::{EventStatus, PhoneNumber, ServicePersonId};
    use crate::models::zmq::ZmqChannel;
    use crate::notify::{MockNotifier, NotifyError};
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{
        HUB, admin_user, event, owner, person, property, service, viewer_user, visit,
    };

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, 10).unwrap()
    }

    fn schedule_form(service_id: &str, provider_id: &str, category: &str) -> ScheduleEventForm {
        ScheduleEventForm {
            property_id: 1,
            service_id: service_id.to_string(),
            provider_id: provider_id.to_string(),
            category: category.to_string(),
            scheduled_date: "2025-05-12".to_string(),
            scheduled_time: String::new(),
            followup_required: None,
            followup_notes: String::new(),
        }
    }

    fn status_form(notify: bool) -> EventStatusForm {
        EventStatusForm {
            status: "Completed".to_string(),
            followup_required: None,
            followup_notes: String::new(),
            notify_owners: notify.then(|| "on".to_string()),
        }
    }

    #[test]
    fn default_window_spans_week_back_and_month_ahead() {
        let mut repo = MockRepository::new();
        repo.expect_list_service_events()
            .withf(|query| {
                query.hub_id.get() == HUB
                    && query.from == NaiveDate::from_ymd_opt(2025, 5, 3)
                    && query.to == NaiveDate::from_ymd_opt(2025, 6, 9)
            })
            .times(1)
            .returning(|_| {
                Ok(vec![
                    visit(1, 1, None, (2025, 5, 4), EventStatus::Scheduled),
                    visit(2, 1, None, (2025, 5, 10), EventStatus::Scheduled),
                    visit(3, 1, None, (2025, 5, 20), EventStatus::Scheduled),
                    visit(4, 1, None, (2025, 5, 5), EventStatus::Completed),
                ])
            });
        repo.expect_list_properties().returning(|_| Ok((0, vec![])));
        repo.expect_list_hub_property_services().returning(|_| Ok(vec![]));
        repo.expect_list_service_people()
            .withf(|_, active_only| *active_only)
            .returning(|_, _| Ok(vec![]));

        let data =
            list_events(&repo, &admin_user(), EventsQuery::default(), today()).expect("lists");

        let states: Vec<_> = data.rows.iter().map(|r| r.due_state.as_str()).collect();
        assert_eq!(states, vec!["Overdue", "Due today", "Upcoming", "Completed"]);
    }

    #[test]
    fn inverted_window_is_rejected() {
        let mut repo = MockRepository::new();
        repo.expect_list_service_events().times(0);

        let query = EventsQuery {
            from: NaiveDate::from_ymd_opt(2025, 6, 1),
            to: NaiveDate::from_ymd_opt(2025, 5, 1),
        };
        let result = list_events(&repo, &admin_user(), query, today());
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn scheduling_copies_service_category() {
        let mut repo = MockRepository::new();
        repo.expect_get_property_by_id()
            .returning(|id, _| Ok(Some(property(id.get(), "Oak Court"))));
        repo.expect_get_property_service_by_id()
            .returning(|id, property_id| {
                Ok(Some(service(id.get(), property_id.get(), "Fertilizer", 5, 80.0)))
            });
        repo.expect_create_service_event()
            .withf(|new_event| {
                new_event.service_category.as_str() == "Fertilizer"
                    && new_event.service_id.map(|s| s.get()) == Some(8)
            })
            .times(1)
            .returning(|_| Ok(event(1, 1, Some(8), (2025, 5, 12), EventStatus::Scheduled)));

        schedule_event(&repo, &admin_user(), schedule_form("8", "", "")).expect("schedules");
    }

    #[test]
    fn scheduling_rejects_inactive_provider() {
        let mut repo = MockRepository::new();
        repo.expect_get_property_by_id()
            .returning(|id, _| Ok(Some(property(id.get(), "Oak Court"))));
        repo.expect_get_service_person_by_id().returning(|id, _| {
            let mut p = person(id.get(), Some("crew@example.com"), None);
            p.is_active = false;
            Ok(Some(p))
        });
        repo.expect_create_service_event().times(0);

        let result = schedule_event(&repo, &admin_user(), schedule_form("", "4", "Irrigation"));
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn status_update_without_notification_sends_nothing() {
        let mut repo = MockRepository::new();
        repo.expect_update_service_event_status()
            .withf(|_, _, update| update.status == EventStatus::Completed)
            .times(1)
            .returning(|_, _, _| Ok(event(1, 1, None, (2025, 5, 10), EventStatus::Completed)));
        repo.expect_list_property_owners().times(0);
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().times(0);

        let outcome = update_event_status(&repo, &notifier, &admin_user(), 1, status_form(false))
            .expect("updates");
        assert_eq!(outcome, NotifyOutcome::default());
    }

    #[test]
    fn status_update_emails_and_texts_owners() {
        let mut repo = MockRepository::new();
        repo.expect_update_service_event_status()
            .returning(|_, _, _| Ok(event(1, 1, None, (2025, 5, 10), EventStatus::Completed)));
        repo.expect_get_property_by_id()
            .returning(|id, _| Ok(Some(property(id.get(), "Oak Court"))));
        repo.expect_list_property_owners().returning(|_, _| {
            let mut with_phone = owner(1, "a@example.com", Some(1));
            with_phone.phone = Some(PhoneNumber::new("+14155552671").unwrap());
            Ok(vec![with_phone, owner(2, "b@example.com", Some(1))])
        });
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|message| {
                message.hub_id == HUB
                    && match message.channel {
                        ZmqChannel::Email => message.body.contains("Oak Court"),
                        ZmqChannel::Sms => message.to == "+14155552671",
                    }
            })
            .times(3)
            .returning(|_| Ok(()));

        let outcome = update_event_status(&repo, &notifier, &admin_user(), 1, status_form(true))
            .expect("updates");
        assert_eq!(outcome.sent, 3);
    }

    #[test]
    fn reminder_requires_reachable_provider() {
        let mut repo = MockRepository::new();
        repo.expect_get_service_event_by_id().returning(|_, _| {
            let mut e = event(1, 1, None, (2025, 5, 12), EventStatus::Scheduled);
            e.provider_id = Some(ServicePersonId::new(4).unwrap());
            Ok(Some(e))
        });
        repo.expect_get_service_person_by_id()
            .returning(|id, _| Ok(Some(person(id.get(), None, None))));
        repo.expect_mark_service_event_reminded().times(0);
        let notifier = MockNotifier::new();

        let result = send_reminder(&repo, &notifier, &admin_user(), 1);
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn reminder_is_stamped_after_delivery() {
        let mut repo = MockRepository::new();
        repo.expect_get_service_event_by_id().returning(|_, _| {
            let mut e = event(1, 1, None, (2025, 5, 12), EventStatus::Scheduled);
            e.provider_id = Some(ServicePersonId::new(4).unwrap());
            Ok(Some(e))
        });
        repo.expect_get_service_person_by_id().returning(|id, _| {
            Ok(Some(person(id.get(), Some("crew@example.com"), Some("+14155552671"))))
        });
        repo.expect_get_property_by_id()
            .returning(|id, _| Ok(Some(property(id.get(), "Oak Court"))));
        repo.expect_mark_service_event_reminded()
            .times(1)
            .returning(|id, _| Ok(event(id.get(), 1, None, (2025, 5, 12), EventStatus::Scheduled)));
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().times(2).returning(|_| Ok(()));

        let outcome = send_reminder(&repo, &notifier, &admin_user(), 1).expect("reminds");
        assert_eq!(outcome.sent, 2);
    }

    #[test]
    fn failed_reminder_is_not_stamped() {
        let mut repo = MockRepository::new();
        repo.expect_get_service_event_by_id().returning(|_, _| {
            let mut e = event(1, 1, None, (2025, 5, 12), EventStatus::Scheduled);
            e.provider_id = Some(ServicePersonId::new(4).unwrap());
            Ok(Some(e))
        });
        repo.expect_get_service_person_by_id()
            .returning(|id, _| Ok(Some(person(id.get(), Some("crew@example.com"), None))));
        repo.expect_get_property_by_id()
            .returning(|id, _| Ok(Some(property(id.get(), "Oak Court"))));
        repo.expect_mark_service_event_reminded().times(0);
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .returning(|_| Err(NotifyError::Poisoned));

        let result = send_reminder(&repo, &notifier, &admin_user(), 1);
        assert!(matches!(result, Err(ServiceError::Internal(_))));
    }

    #[test]
    fn viewer_cannot_delete_events() {
        let mut repo = MockRepository::new();
        repo.expect_delete_service_event().times(0);

        let result = delete_event(&repo, &viewer_user(), 1);
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}
