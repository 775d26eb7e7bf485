//! CRM domain module: customers and support tickets.

pub mod customer;
pub mod ticket;

pub use customer::{Customer, CustomerState, CUSTOMER_SEARCH_FIELDS};
pub use ticket::{Ticket, TicketPriority, TicketStatus};
