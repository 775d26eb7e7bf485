use std::sync::Arc;

use bss_core::{ListQuery, Page, RecordId};
use bss_crm::Ticket;

use crate::error::StoreResult;
use crate::repository::Repository;

/// Ticket list, optionally narrowed to one customer.
pub struct TicketService {
    tickets: Arc<Repository<Ticket>>,
}

impl TicketService {
    pub fn new(tickets: Arc<Repository<Ticket>>) -> Self {
        Self { tickets }
    }

    pub fn repository(&self) -> &Arc<Repository<Ticket>> {
        &self.tickets
    }

    pub async fn page(&self, query: &ListQuery, customer: Option<RecordId>) -> StoreResult<Page<Ticket>> {
        self.tickets
            .page(query, |t| customer.is_none_or(|c| t.belongs_to(c)))
            .await
    }

    pub async fn for_customer(&self, customer: RecordId) -> StoreResult<Vec<Ticket>> {
        Ok(self.page(&ListQuery::all(), Some(customer)).await?.records)
    }
}
