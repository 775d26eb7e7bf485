//! Provisioning domain module.
//!
//! Everything the order wizard works on: the per-order wizard document, its
//! generation from an offering, which wizard pages apply to an order, and the
//! edits each page makes. Pure logic; the per-order documents are persisted
//! by `bss-infra`.

pub mod fulfillment;
pub mod steps;
pub mod wizard;

pub use fulfillment::{configured_families, generate, FulfillmentInputs};
pub use steps::{select_steps, DeviceFamily, WizardNavigator, WizardStep};
pub use wizard::{
    AllocatedEquipment, CheckStatus, EquipmentLine, EquipmentStatus, RequiredEquipment, TestCase,
    TestCategory, TestStatus, TimelineStage, ValidationItem, ValidationSection, WizardData,
};
