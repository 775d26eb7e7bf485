use std::sync::Arc;

use bss_catalog::Offering;
use bss_core::{ListQuery, Page};

use crate::error::StoreResult;
use crate::repository::Repository;

/// Offering list with an optional exact status filter.
pub struct OfferingService {
    offerings: Arc<Repository<Offering>>,
}

impl OfferingService {
    pub fn new(offerings: Arc<Repository<Offering>>) -> Self {
        Self { offerings }
    }

    pub fn repository(&self) -> &Arc<Repository<Offering>> {
        &self.offerings
    }

    pub async fn page(&self, query: &ListQuery, status: Option<&str>) -> StoreResult<Page<Offering>> {
        let status = status.filter(|s| !s.is_empty());
        self.offerings
            .page(query, |o| status.is_none_or(|s| o.status == s))
            .await
    }
}
