//! Orders domain module.
//!
//! An order moves through a fixed stage pipeline. Placement snapshots the
//! offering's activation sequence onto the order, and the stage guards check
//! that snapshot before the order may leave activation.

pub mod new_order;
pub mod order;
pub mod stage;
pub mod view;

pub use new_order::{contract_number, NewOrder};
pub use order::{Order, OrderComment, OrderItem, ProvisioningTask, TaskStatus};
pub use stage::OrderStage;
pub use view::{stage_counts, OrderView};
