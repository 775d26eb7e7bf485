//! Support tickets.
//!
//! Ticket records come from several generations of the helpdesk screens, so
//! every load and write runs through [`Ticket::normalise`], which folds the
//! legacy spellings onto one shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use bss_core::id::opt_id;
use bss_core::{Entity, RecordId};

/// Well-known ticket statuses. Unknown values are kept upper-cased as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketStatus {
    New,
    Open,
    Pending,
    Hold,
    Solved,
    Closed,
}

impl TicketStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketStatus::New => "NEW",
            TicketStatus::Open => "OPEN",
            TicketStatus::Pending => "PENDING",
            TicketStatus::Hold => "HOLD",
            TicketStatus::Solved => "SOLVED",
            TicketStatus::Closed => "CLOSED",
        }
    }

    /// Canonical spelling of a raw status.
    pub fn normalise(raw: &str) -> String {
        let s = raw.trim().to_uppercase();
        match s.as_str() {
            "" => TicketStatus::New.as_str().to_string(),
            "IN PROGRESS" => TicketStatus::Pending.as_str().to_string(),
            _ => s,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TicketPriority {
    Low,
    Normal,
    High,
    Urgent,
}

impl TicketPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TicketPriority::Low => "LOW",
            TicketPriority::Normal => "NORMAL",
            TicketPriority::High => "HIGH",
            TicketPriority::Urgent => "URGENT",
        }
    }

    pub fn normalise(raw: &str) -> String {
        let p = raw.trim().to_uppercase();
        match p.as_str() {
            "" => TicketPriority::Low.as_str().to_string(),
            "MEDIUM" => TicketPriority::Normal.as_str().to_string(),
            _ => p,
        }
    }
}

/// Support ticket.
///
/// Optional text fields are only `None` before normalisation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default)]
    pub ds_id: String,
    #[serde(default, deserialize_with = "opt_id::deserialize")]
    pub customer_id: Option<RecordId>,
    #[serde(default)]
    pub customer_crm_id: String,
    #[serde(default, deserialize_with = "opt_id::deserialize")]
    pub requester_id: Option<RecordId>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, alias = "Status")]
    pub status: String,
    #[serde(default, alias = "Priority")]
    pub priority: String,
    #[serde(default)]
    pub submitter: String,
    #[serde(default)]
    pub assignee: Option<String>,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(default)]
    pub comments: Vec<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Ticket {
    pub fn normalise(&mut self, now: DateTime<Utc>) {
        if self.customer_id.is_none() {
            self.customer_id = self.requester_id;
        }
        if self.requester_id.is_none() {
            self.requester_id = self.customer_id;
        }

        let title = self.title.clone().or_else(|| self.subject.clone()).unwrap_or_default();
        let subject = self.subject.clone().unwrap_or_else(|| title.clone());
        if self.description.is_none() {
            self.description = Some(subject.clone());
        }
        self.title = Some(title);
        self.subject = Some(subject);

        self.status = TicketStatus::normalise(&self.status);
        self.priority = TicketPriority::normalise(&self.priority);

        let assignee = self.assignee.clone().or_else(|| self.owner.clone()).unwrap_or_default();
        if self.owner.is_none() {
            self.owner = Some(assignee.clone());
        }
        self.assignee = Some(assignee);

        self.created_at.get_or_insert(now);
        self.last_modified.get_or_insert(now);
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    /// Whether the ticket was raised by or for `customer`.
    pub fn belongs_to(&self, customer: RecordId) -> bool {
        self.customer_id == Some(customer) || self.requester_id == Some(customer)
    }
}

impl Entity for Ticket {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
