use chrono::Utc;
use diesel::prelude::*;

use crate::domain::ticket::{
    NewTicket, NewTicketAttachment, Ticket, TicketAdminUpdate, TicketAttachment, TicketListing,
};
use crate::domain::types::{AttachmentId, HubId, TicketId};
use crate::models::ticket::{
    NewTicket as DbNewTicket, NewTicketAttachment as DbNewTicketAttachment, Ticket as DbTicket,
    TicketAttachment as DbTicketAttachment, UpdateTicket,
};
use crate::repository::errors::{RepositoryError, RepositoryResult};
use crate::repository::{DieselRepository, TicketListQuery, TicketReader, TicketWriter};

impl TicketReader for DieselRepository {
    fn get_ticket_by_id(&self, id: TicketId, hub_id: HubId) -> RepositoryResult<Option<Ticket>> {
        use crate::schema::tickets;

        let mut conn = self.conn()?;
        let row = tickets::table
            .filter(tickets::id.eq(id.get()))
            .filter(tickets::hub_id.eq(hub_id.get()))
            .first::<DbTicket>(&mut conn)
            .optional()?;

        Ok(row.map(Ticket::try_from).transpose()?)
    }

    fn list_tickets(&self, query: TicketListQuery) -> RepositoryResult<Vec<TicketListing>> {
        use crate::schema::{owners, properties, tickets};

        let mut conn = self.conn()?;

        let mut items = tickets::table
            .inner_join(properties::table)
            .left_join(owners::table)
            .select((
                tickets::all_columns,
                properties::name,
                owners::email.nullable(),
            ))
            .filter(tickets::hub_id.eq(query.hub_id.get()))
            .into_boxed();

        if let Some(owner_id) = query.owner_id {
            items = items.filter(tickets::owner_id.eq(owner_id.get()));
        }
        if let Some(property_id) = query.property_id {
            items = items.filter(tickets::property_id.eq(property_id.get()));
        }
        if let Some(status) = query.status {
            items = items.filter(tickets::status.eq(status.as_str()));
        }

        let rows = items
            .order((tickets::created_at.desc(), tickets::id.desc()))
            .load::<(DbTicket, String, Option<String>)>(&mut conn)?;

        rows.into_iter()
            .map(|(ticket, property_name, owner_email)| {
                Ok(TicketListing {
                    ticket: Ticket::try_from(ticket)?,
                    property_name,
                    owner_email,
                })
            })
            .collect::<Result<Vec<_>, RepositoryError>>()
    }

    fn list_ticket_attachments(
        &self,
        ticket_id: TicketId,
    ) -> RepositoryResult<Vec<TicketAttachment>> {
        use crate::schema::ticket_attachments;

        let mut conn = self.conn()?;
        ticket_attachments::table
            .filter(ticket_attachments::ticket_id.eq(ticket_id.get()))
            .order((
                ticket_attachments::uploaded_at.desc(),
                ticket_attachments::id.desc(),
            ))
            .load::<DbTicketAttachment>(&mut conn)?
            .into_iter()
            .map(|row| TicketAttachment::try_from(row).map_err(RepositoryError::from))
            .collect()
    }

    fn get_ticket_attachment(
        &self,
        id: AttachmentId,
        ticket_id: TicketId,
    ) -> RepositoryResult<Option<TicketAttachment>> {
        use crate::schema::ticket_attachments;

        let mut conn = self.conn()?;
        let row = ticket_attachments::table
            .filter(ticket_attachments::id.eq(id.get()))
            .filter(ticket_attachments::ticket_id.eq(ticket_id.get()))
            .first::<DbTicketAttachment>(&mut conn)
            .optional()?;

        Ok(row.map(TicketAttachment::try_from).transpose()?)
    }
}

impl TicketWriter for DieselRepository {
    fn create_ticket(&self, ticket: &NewTicket) -> RepositoryResult<Ticket> {
        use crate::schema::tickets;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let row = diesel::insert_into(tickets::table)
            .values(&DbNewTicket::from_domain(ticket, now))
            .get_result::<DbTicket>(&mut conn)?;

        Ok(Ticket::try_from(row)?)
    }

    fn update_ticket(
        &self,
        id: TicketId,
        hub_id: HubId,
        update: &TicketAdminUpdate,
    ) -> RepositoryResult<Ticket> {
        use crate::schema::tickets;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let row = diesel::update(
            tickets::table
                .filter(tickets::id.eq(id.get()))
                .filter(tickets::hub_id.eq(hub_id.get())),
        )
        .set(&UpdateTicket::from_domain(update, now))
        .get_result::<DbTicket>(&mut conn)?;

        Ok(Ticket::try_from(row)?)
    }

    fn create_ticket_attachment(
        &self,
        attachment: &NewTicketAttachment,
    ) -> RepositoryResult<TicketAttachment> {
        use crate::schema::ticket_attachments;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let row = diesel::insert_into(ticket_attachments::table)
            .values(&DbNewTicketAttachment::from_domain(attachment, now))
            .get_result::<DbTicketAttachment>(&mut conn)?;

        Ok(TicketAttachment::try_from(row)?)
    }
}
