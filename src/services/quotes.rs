//! Quote builder, saved quotes and quote-to-property conversion.

use crate::SERVICE_ADMIN_ROLE;
use crate::domain::property::Property;
use crate::domain::quote::{NewQuote, NewQuoteLineItem, Quote, QuoteSummary};
use crate::domain::region::{PricedService, Region, default_region, price_services};
use crate::domain::types::{Amount, HubId, QuoteId, RegionId};
use crate::dto::quotes::{QuoteBuilderData, QuotePageData, QuotesPageData};
use crate::dto::{CsvDownload, NotifyOutcome};
use crate::export::{CSV_CONTENT_TYPE, quote_csv, quote_filename};
use crate::forms::quotes::{DEFAULT_SQFT_ESTIMATE, QuoteForm, QuotePayload, SIZE_BANDS};
use crate::models::auth::AuthenticatedUser;
use crate::models::zmq::{ZmqAttachment, ZmqNotification};
use crate::notify::Notifier;
use crate::repository::errors::RepositoryError;
use crate::repository::{QuoteReader, QuoteWriter, RegionReader};
use crate::services::{ServiceError, ServiceResult, deliver, ensure_role};

/// Active rates of `region` priced against the hub catalogue.
fn region_services<R>(repo: &R, hub_id: HubId, region: &Region) -> ServiceResult<Vec<PricedService>>
where
    R: RegionReader + ?Sized,
{
    let catalog = repo.list_catalog_entries(hub_id)?;
    let rates = repo.list_region_rates(region.id, true)?;
    Ok(price_services(rates, &catalog))
}

/// Builder page for the chosen region, or the default one.
pub fn quote_builder<R>(
    repo: &R,
    user: &AuthenticatedUser,
    region_id: Option<i32>,
) -> ServiceResult<QuoteBuilderData>
where
    R: RegionReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let regions = repo.list_regions(hub_id)?;

    let selected = match region_id {
        Some(id) => {
            let id = RegionId::new(id)?;
            Some(
                regions
                    .iter()
                    .find(|r| r.id == id)
                    .cloned()
                    .ok_or(ServiceError::NotFound)?,
            )
        }
        None => default_region(&regions).cloned(),
    };

    let services = match &selected {
        Some(region) => region_services(repo, hub_id, region)?,
        None => Vec::new(),
    };

    Ok(QuoteBuilderData {
        regions,
        selected,
        services,
        size_bands: SIZE_BANDS,
        default_sqft: DEFAULT_SQFT_ESTIMATE,
    })
}

/// Prices the submitted rows against the region and stores the quote with
/// every row, included or not.
pub fn save_quote<R>(repo: &R, user: &AuthenticatedUser, body: &[u8]) -> ServiceResult<Quote>
where
    R: RegionReader + QuoteWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let payload = QuotePayload::try_from(QuoteForm::from_bytes(body)?)?;
    let hub_id = HubId::new(user.hub_id)?;

    let region = repo
        .get_region_by_id(payload.region_id, hub_id)?
        .ok_or_else(|| ServiceError::Form("Unknown region.".to_string()))?;
    let services = region_services(repo, hub_id, &region)?;

    let items = payload
        .lines
        .iter()
        .map(|line| {
            let priced = services
                .iter()
                .find(|s| s.rate.service_code == line.code)
                .ok_or_else(|| {
                    ServiceError::Form(format!("{} is not offered in this region.", line.code))
                })?;
            Ok(NewQuoteLineItem::new(
                line.code.clone(),
                priced.display_name.as_str(),
                line.times_per_year,
                line.price_per_visit,
                line.included,
            ))
        })
        .collect::<ServiceResult<Vec<_>>>()?;

    let summary = QuoteSummary::from_lines(items.iter().map(|item| &item.annual_total));
    if summary.annual <= 0.0 {
        return Err(ServiceError::Form(
            "Include at least one priced service before saving.".to_string(),
        ));
    }

    let quote = NewQuote {
        hub_id,
        region_label: region.label(),
        customer_name: payload.customer_name,
        customer_email: payload.customer_email,
        property_name: payload.property_name,
        property_size_band: payload.property_size_band,
        sqft_estimate: payload.sqft_estimate,
        notes: payload.notes,
        annual_quote: Amount::new(summary.annual)?,
    };

    let quote = repo.create_quote(&quote, &items).map_err(|err| {
        log::error!("Failed to save quote: {err}");
        err
    })?;

    Ok(quote)
}

pub fn list_quotes<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<QuotesPageData>
where
    R: QuoteReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let quotes = repo.list_quotes(hub_id)?;

    Ok(QuotesPageData { quotes })
}

pub fn show_quote<R>(
    repo: &R,
    user: &AuthenticatedUser,
    quote_id: i32,
) -> ServiceResult<QuotePageData>
where
    R: QuoteReader + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let quote_id = QuoteId::new(quote_id)?;

    let quote = repo
        .get_quote_by_id(quote_id, hub_id)?
        .ok_or(ServiceError::NotFound)?;
    let items = repo.list_quote_line_items(quote.id)?;
    let summary = QuoteSummary::from_lines(items.iter().map(|item| &item.annual_total));

    Ok(QuotePageData {
        quote,
        items,
        summary,
    })
}

pub fn export_quote<R>(
    repo: &R,
    user: &AuthenticatedUser,
    quote_id: i32,
) -> ServiceResult<CsvDownload>
where
    R: QuoteReader + ?Sized,
{
    let page = show_quote(repo, user, quote_id)?;

    Ok(CsvDownload {
        filename: quote_filename(page.quote.id.get()),
        content: quote_csv(&page.quote, &page.items)?,
    })
}

/// E-mails the quote spreadsheet to the customer.
pub fn email_quote<R, N>(
    repo: &R,
    notifier: &N,
    user: &AuthenticatedUser,
    quote_id: i32,
) -> ServiceResult<NotifyOutcome>
where
    R: QuoteReader + ?Sized,
    N: Notifier + ?Sized,
{
    let page = show_quote(repo, user, quote_id)?;
    let quote = &page.quote;

    let Some(email) = &quote.customer_email else {
        return Err(ServiceError::Form(
            "The quote has no customer e-mail.".to_string(),
        ));
    };

    let content = String::from_utf8(quote_csv(quote, &page.items)?)
        .map_err(|err| ServiceError::Internal(err.to_string()))?;
    let greeting = quote.customer_name.as_deref().unwrap_or("there");
    let body = format!(
        "Hello {greeting},\n\nPlease find attached your landscaping quote for {}.\n\
         Annual total: ${:.2} (about ${:.2} per month).",
        quote.region_label, page.summary.annual, page.summary.monthly
    );

    let message = ZmqNotification::email(
        quote.hub_id.get(),
        email.as_str(),
        format!("Your quote #{}", quote.id),
        body,
    )
    .with_attachment(ZmqAttachment {
        filename: quote_filename(quote.id.get()),
        content_type: CSV_CONTENT_TYPE.to_string(),
        content,
    });

    let outcome = deliver(notifier, &[message]);
    if outcome.sent == 0 {
        return Err(ServiceError::Internal(
            "quote e-mail could not be delivered".to_string(),
        ));
    }

    Ok(outcome)
}

/// Turns a quote into a property with one service per included line.
pub fn convert_quote<R>(
    repo: &R,
    user: &AuthenticatedUser,
    quote_id: i32,
) -> ServiceResult<Property>
where
    R: QuoteReader + QuoteWriter + ?Sized,
{
    ensure_role(user, SERVICE_ADMIN_ROLE)?;

    let hub_id = HubId::new(user.hub_id)?;
    let quote_id = QuoteId::new(quote_id)?;

    let quote = repo
        .get_quote_by_id(quote_id, hub_id)?
        .ok_or(ServiceError::NotFound)?;
    if let Some(property_id) = quote.converted_property_id {
        return Err(ServiceError::Form(format!(
            "The quote was already converted to property #{property_id}."
        )));
    }

    let items = repo.list_quote_line_items(quote.id)?;
    if !items.iter().any(|item| item.included) {
        return Err(ServiceError::Form(
            "The quote has no included services to convert.".to_string(),
        ));
    }

    let conversion = quote.conversion(&items)?;
    let property = repo
        .convert_quote(quote.id, hub_id, &conversion)
        .map_err(|err| match err {
            RepositoryError::ConstraintViolation(_) => {
                ServiceError::Form("The quote was already converted.".to_string())
            }
            other => {
                log::error!("Failed to convert quote {quote_id}: {other}");
                other.into()
            }
        })?;

    Ok(property)
}

#[cfg(all(test, feature = "test-mocks"))]
mod tests {
    use super::*;
    use crate::domain::quote::QuoteLineItem;
    use crate::domain::region::{CatalogEntry, RegionRate};
    use crate::domain::types::{
        CatalogEntryId, CatalogName, Email, PropertyId, RegionPart, RegionRateId, ServiceCode,
        VisitCount,
    };
    use crate::notify::MockNotifier;
    use crate::repository::mock::MockRepository;
    use crate::services::test_support::{HUB, admin_user, hub, property, timestamp, viewer_user};

    fn region(id: i32, city: &str) -> Region {
        Region {
            id: RegionId::new(id).unwrap(),
            hub_id: hub(),
            state: RegionPart::new("TX").unwrap(),
            city: RegionPart::new(city).unwrap(),
            property_type: RegionPart::new("Small Industrial").unwrap(),
            labor_factor: 1.0,
            material_factor: 1.0,
        }
    }

    fn catalog() -> Vec<CatalogEntry> {
        [("MOWING", "Mowing", 22), ("MULCH", "Mulch", 2)]
            .iter()
            .enumerate()
            .map(|(i, (code, name, times))| CatalogEntry {
                id: CatalogEntryId::new(i as i32 + 1).unwrap(),
                hub_id: hub(),
                code: ServiceCode::new(*code).unwrap(),
                display_name: CatalogName::new(*name).unwrap(),
                default_times_per_year: VisitCount::new(*times).unwrap(),
            })
            .collect()
    }

    fn rates(region_id: RegionId) -> Vec<RegionRate> {
        [("MOWING", 60.0), ("MULCH", 600.0)]
            .iter()
            .enumerate()
            .map(|(i, (code, price))| RegionRate {
                id: RegionRateId::new(i as i32 + 1).unwrap(),
                region_id,
                service_code: ServiceCode::new(*code).unwrap(),
                base_price_per_visit: Amount::new(*price).unwrap(),
                min_sqft: Some(0),
                max_sqft: Some(8000),
                active: true,
            })
            .collect()
    }

    fn quote(id: i32, email: Option<&str>, converted: Option<i32>) -> Quote {
        Quote {
            id: QuoteId::new(id).unwrap(),
            hub_id: hub(),
            region_label: "TX - Frisco - Small Industrial".to_string(),
            customer_name: Some("Acme".to_string()),
            customer_email: email.map(|e| Email::new(e).unwrap()),
            property_name: None,
            property_size_band: None,
            sqft_estimate: Some(8000),
            notes: None,
            annual_quote: Amount::new(1320.0).unwrap(),
            converted_property_id: converted.map(|p| PropertyId::new(p).unwrap()),
            created_at: timestamp(),
        }
    }

    fn line(
        id: i32,
        code: &str,
        name: &str,
        times: i32,
        price: f64,
        included: bool,
    ) -> QuoteLineItem {
        let new = NewQuoteLineItem::new(
            ServiceCode::new(code).unwrap(),
            name,
            VisitCount::new(times).unwrap(),
            Amount::new(price).unwrap(),
            included,
        );
        QuoteLineItem {
            id,
            quote_id: QuoteId::new(1).unwrap(),
            service_code: new.service_code,
            service_name: new.service_name,
            times_per_year: new.times_per_year,
            price_per_visit: new.price_per_visit,
            annual_total: new.annual_total,
            included: new.included,
        }
    }

    fn region_repo() -> MockRepository {
        let mut repo = MockRepository::new();
        repo.expect_get_region_by_id()
            .returning(|id, _| Ok(Some(region(id.get(), "Frisco"))));
        repo.expect_list_catalog_entries().returning(|_| Ok(catalog()));
        repo.expect_list_region_rates()
            .returning(|region_id, _| Ok(rates(region_id)));
        repo
    }

    #[test]
    fn builder_defaults_to_frisco_region() {
        let mut repo = MockRepository::new();
        repo.expect_list_regions()
            .returning(|_| Ok(vec![region(1, "Austin"), region(2, "Frisco")]));
        repo.expect_list_catalog_entries().returning(|_| Ok(catalog()));
        repo.expect_list_region_rates()
            .withf(|region_id, active_only| region_id.get() == 2 && *active_only)
            .returning(|region_id, _| Ok(rates(region_id)));

        let data = quote_builder(&repo, &admin_user(), None).expect("builds");
        assert_eq!(data.selected.map(|r| r.id.get()), Some(2));
        assert_eq!(data.services.len(), 2);
        assert_eq!(data.default_sqft, 8000);
    }

    #[test]
    fn save_prices_rows_and_keeps_excluded_lines() {
        let mut repo = region_repo();
        repo.expect_create_quote()
            .withf(|new_quote, items| {
                new_quote.hub_id.get() == HUB
                    && new_quote.region_label == "TX - Frisco - Small Industrial"
                    && new_quote.annual_quote.get() == 1320.0
                    && items.len() == 2
                    && items[0].service_name == "Mowing"
                    && !items[1].included
                    && items[1].annual_total.get() == 0.0
            })
            .times(1)
            .returning(|_, _| Ok(quote(1, None, None)));

        let body = b"region_id=1&code=MOWING&times=22&price=60&include=MOWING\
                     &code=MULCH&times=2&price=600";
        save_quote(&repo, &admin_user(), body).expect("saves");
    }

    #[test]
    fn save_rejects_zero_total() {
        let mut repo = region_repo();
        repo.expect_create_quote().times(0);

        let body = b"region_id=1&code=MOWING&times=22&price=60";
        let result = save_quote(&repo, &admin_user(), body);
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn save_rejects_codes_outside_region() {
        let mut repo = region_repo();
        repo.expect_create_quote().times(0);

        let body = b"region_id=1&code=POOL&times=4&price=90&include=POOL";
        let result = save_quote(&repo, &admin_user(), body);
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn show_summarises_included_lines() {
        let mut repo = MockRepository::new();
        repo.expect_get_quote_by_id()
            .returning(|id, _| Ok(Some(quote(id.get(), None, None))));
        repo.expect_list_quote_line_items().returning(|_| {
            Ok(vec![
                line(1, "MOWING", "Mowing", 22, 60.0, true),
                line(2, "MULCH", "Mulch", 2, 600.0, false),
            ])
        });

        let page = show_quote(&repo, &admin_user(), 1).expect("shows");
        assert_eq!(page.summary.annual, 1320.0);
        assert_eq!(page.summary.monthly, 110.0);
    }

    #[test]
    fn email_requires_customer_address() {
        let mut repo = MockRepository::new();
        repo.expect_get_quote_by_id()
            .returning(|id, _| Ok(Some(quote(id.get(), None, None))));
        repo.expect_list_quote_line_items().returning(|_| Ok(vec![]));
        let mut notifier = MockNotifier::new();
        notifier.expect_notify().times(0);

        let result = email_quote(&repo, &notifier, &admin_user(), 1);
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn email_attaches_quote_csv() {
        let mut repo = MockRepository::new();
        repo.expect_get_quote_by_id()
            .returning(|id, _| Ok(Some(quote(id.get(), Some("buyer@example.com"), None))));
        repo.expect_list_quote_line_items()
            .returning(|_| Ok(vec![line(1, "MOWING", "Mowing", 22, 60.0, true)]));
        let mut notifier = MockNotifier::new();
        notifier
            .expect_notify()
            .withf(|message| {
                message.to == "buyer@example.com"
                    && message.attachment.as_ref().is_some_and(|a| {
                        a.filename == "quote_1.csv" && a.content.contains("Mowing")
                    })
            })
            .times(1)
            .returning(|_| Ok(()));

        let outcome = email_quote(&repo, &notifier, &admin_user(), 1).expect("emails");
        assert_eq!(outcome.sent, 1);
    }

    #[test]
    fn converted_quote_cannot_be_converted_again() {
        let mut repo = MockRepository::new();
        repo.expect_get_quote_by_id()
            .returning(|id, _| Ok(Some(quote(id.get(), None, Some(9)))));
        repo.expect_convert_quote().times(0);

        let result = convert_quote(&repo, &admin_user(), 1);
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn quote_without_included_lines_is_not_converted() {
        let mut repo = MockRepository::new();
        repo.expect_get_quote_by_id()
            .returning(|id, _| Ok(Some(quote(id.get(), None, None))));
        repo.expect_list_quote_line_items()
            .returning(|_| Ok(vec![line(1, "MOWING", "Mowing", 22, 60.0, false)]));
        repo.expect_convert_quote().times(0);

        let result = convert_quote(&repo, &admin_user(), 1);
        assert!(matches!(result, Err(ServiceError::Form(_))));
    }

    #[test]
    fn conversion_copies_included_lines_only() {
        let mut repo = MockRepository::new();
        repo.expect_get_quote_by_id()
            .returning(|id, _| Ok(Some(quote(id.get(), None, None))));
        repo.expect_list_quote_line_items().returning(|_| {
            Ok(vec![
                line(1, "MOWING", "Mowing", 22, 60.0, true),
                line(2, "MULCH", "Mulch", 2, 600.0, false),
            ])
        });
        repo.expect_convert_quote()
            .withf(|_, _, conversion| {
                conversion.services.len() == 1
                    && conversion.property.name.as_str() == "Quoted Property #1"
                    && conversion.property.state.as_deref() == Some("TX")
                    && conversion.property.city.as_deref() == Some("Frisco")
            })
            .times(1)
            .returning(|_, _, _| Ok(property(5, "Quoted Property #1")));

        let created = convert_quote(&repo, &admin_user(), 1).expect("converts");
        assert_eq!(created.id.get(), 5);
    }

    #[test]
    fn viewer_cannot_convert() {
        let mut repo = MockRepository::new();
        repo.expect_get_quote_by_id().times(0);

        let result = convert_quote(&repo, &viewer_user(), 1);
        assert!(matches!(result, Err(ServiceError::Unauthorized)));
    }
}
