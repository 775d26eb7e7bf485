//! Per-order wizard document and the edits each wizard page makes.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use bss_catalog::DeviceTemplate;
use bss_core::serde_util::lenient_f64;
use bss_inventory::StockStatus;

/// One priced line of the equipment breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentLine {
    pub item: String,
    #[serde(default)]
    pub sku: String,
    pub qty: u32,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub unit_price: f64,
    #[serde(default, deserialize_with = "lenient_f64")]
    pub total: f64,
    #[serde(default)]
    pub resource_id: String,
    #[serde(default = "default_true")]
    pub allocatable: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EquipmentStatus {
    Available,
    #[serde(rename = "Low Stock")]
    LowStock,
    #[serde(rename = "Not Available")]
    NotAvailable,
    Allocated,
}

impl From<StockStatus> for EquipmentStatus {
    fn from(s: StockStatus) -> Self {
        match s {
            StockStatus::Available => EquipmentStatus::Available,
            StockStatus::LowStock => EquipmentStatus::LowStock,
            StockStatus::NotAvailable => EquipmentStatus::NotAvailable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RequiredEquipment {
    pub name: String,
    pub need: u32,
    #[serde(default)]
    pub stock: u32,
    pub status: EquipmentStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocatedEquipment {
    pub name: String,
    pub status: EquipmentStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TestStatus {
    Pending,
    Running,
    Passed,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub test: String,
    pub status: TestStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TestCategory {
    Firewall,
    Network,
    Wireless,
    Security,
}

impl TestCategory {
    pub const ALL: [TestCategory; 4] = [
        TestCategory::Firewall,
        TestCategory::Network,
        TestCategory::Wireless,
        TestCategory::Security,
    ];

    /// Field name in the wizard document.
    pub fn key(&self) -> &'static str {
        match self {
            TestCategory::Firewall => "firewallTests",
            TestCategory::Network => "networkTests",
            TestCategory::Wireless => "wirelessTests",
            TestCategory::Security => "securityTests",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|c| c.key() == key)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CheckStatus {
    Checked,
    Unchecked,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationItem {
    #[serde(default)]
    pub item: String,
    pub status: CheckStatus,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValidationSection {
    Hardware,
    Configuration,
    License,
    Documentation,
}

impl ValidationSection {
    pub const ALL: [ValidationSection; 4] = [
        ValidationSection::Hardware,
        ValidationSection::Configuration,
        ValidationSection::License,
        ValidationSection::Documentation,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            ValidationSection::Hardware => "hardwareValidation",
            ValidationSection::Configuration => "configurationValidation",
            ValidationSection::License => "licenseValidation",
            ValidationSection::Documentation => "documentationChecks",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.key() == key)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineStage {
    pub stage: String,
    pub status: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Wizard document for one order.
///
/// Seeded from the wizard template fixture and then filled in by fulfillment
/// generation and the wizard pages. Keys this type does not model are kept.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct WizardData {
    pub equipment_breakdown: Vec<EquipmentLine>,
    #[serde(deserialize_with = "lenient_f64")]
    pub equipment_subtotal: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub installation_services: f64,
    #[serde(deserialize_with = "lenient_f64")]
    pub total_order_value: f64,
    pub customer_info: Map<String, Value>,
    pub deployment_locations: Map<String, Value>,
    pub project_timeline: Map<String, Value>,
    pub special_requirements: Vec<Value>,

    pub required_equipment: Vec<RequiredEquipment>,
    pub allocated_equipment: Vec<AllocatedEquipment>,
    pub allocation_notes: Vec<String>,
    /// Keyed by resource id, suffixed `-N` per unit when a line has qty > 1.
    pub device_configs: BTreeMap<String, DeviceTemplate>,

    pub firewall_tests: Vec<TestCase>,
    pub network_tests: Vec<TestCase>,
    pub wireless_tests: Vec<TestCase>,
    pub security_tests: Vec<TestCase>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_failure_note: Option<String>,

    pub hardware_validation: Vec<ValidationItem>,
    pub configuration_validation: Vec<ValidationItem>,
    pub license_validation: Vec<ValidationItem>,
    pub documentation_checks: Vec<ValidationItem>,

    pub deployment_timeline: Vec<TimelineStage>,
    pub installation_team: Vec<Value>,
    pub deployment_kit: Vec<Value>,
    pub pre_deployment_checklist: Vec<Value>,

    #[serde(skip_serializing_if = "Value::is_null")]
    pub deployment_summary: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub go_live_validation: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub customer_handover_completed: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub training_completed: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub support_activated: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub customer_satisfaction_survey: Value,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl WizardData {
    /// Replace an existing deployment location entry; unknown keys are ignored.
    pub fn update_deployment_location(&mut self, key: &str, value: Value) -> bool {
        replace_existing(&mut self.deployment_locations, key, value)
    }

    pub fn update_project_timeline(&mut self, key: &str, value: Value) -> bool {
        replace_existing(&mut self.project_timeline, key, value)
    }

    pub fn set_allocation_notes(&mut self, notes: Vec<String>) {
        self.allocation_notes = notes;
    }

    pub fn required_item(&self, name: &str) -> Option<&RequiredEquipment> {
        self.required_equipment.iter().find(|i| i.name == name)
    }

    /// Flag a required line as allocated and record it once in the allocated list.
    pub fn mark_allocated(&mut self, name: &str) -> bool {
        let Some(item) = self.required_equipment.iter_mut().find(|i| i.name == name) else {
            return false;
        };
        item.status = EquipmentStatus::Allocated;
        if !self.allocated_equipment.iter().any(|a| a.name == name) {
            self.allocated_equipment.push(AllocatedEquipment {
                name: name.to_string(),
                status: EquipmentStatus::Allocated,
            });
        }
        true
    }

    pub fn mark_unavailable(&mut self, name: &str) -> bool {
        match self.required_equipment.iter_mut().find(|i| i.name == name) {
            Some(item) => {
                item.status = EquipmentStatus::NotAvailable;
                true
            }
            None => false,
        }
    }

    /// Units still waiting for allocation.
    pub fn pending_device_count(&self) -> u32 {
        self.required_equipment
            .iter()
            .filter(|i| i.status != EquipmentStatus::Allocated)
            .map(|i| i.need)
            .sum()
    }

    pub fn all_allocated(&self) -> bool {
        self.required_equipment
            .iter()
            .all(|i| i.status == EquipmentStatus::Allocated)
    }

    pub fn tests(&self, category: TestCategory) -> &[TestCase] {
        match category {
            TestCategory::Firewall => &self.firewall_tests,
            TestCategory::Network => &self.network_tests,
            TestCategory::Wireless => &self.wireless_tests,
            TestCategory::Security => &self.security_tests,
        }
    }

    fn tests_mut(&mut self, category: TestCategory) -> &mut Vec<TestCase> {
        match category {
            TestCategory::Firewall => &mut self.firewall_tests,
            TestCategory::Network => &mut self.network_tests,
            TestCategory::Wireless => &mut self.wireless_tests,
            TestCategory::Security => &mut self.security_tests,
        }
    }

    fn set_test_status(&mut self, category: TestCategory, name: &str, status: TestStatus) -> bool {
        match self.tests_mut(category).iter_mut().find(|t| t.test == name) {
            Some(test) => {
                test.status = status;
                true
            }
            None => false,
        }
    }

    pub fn start_test(&mut self, category: TestCategory, name: &str) -> bool {
        self.set_test_status(category, name, TestStatus::Running)
    }

    pub fn reset_test(&mut self, category: TestCategory, name: &str) -> bool {
        self.set_test_status(category, name, TestStatus::Pending)
    }

    pub fn set_timeline_status(&mut self, index: usize, status: &str) -> bool {
        match self.deployment_timeline.get_mut(index) {
            Some(stage) => {
                stage.status = status.to_string();
                true
            }
            None => false,
        }
    }

    /// Set one field of one device config. Any index out of range is a no-op.
    pub fn update_device_config(
        &mut self,
        resource_id: &str,
        section: usize,
        field: usize,
        value: Value,
    ) -> bool {
        let slot = self
            .device_configs
            .get_mut(resource_id)
            .and_then(|cfg| cfg.sections.get_mut(section))
            .and_then(|s| s.fields.get_mut(field));
        match slot {
            Some(f) => {
                f.value = value;
                true
            }
            None => false,
        }
    }

    pub fn validation(&self, section: ValidationSection) -> &[ValidationItem] {
        match section {
            ValidationSection::Hardware => &self.hardware_validation,
            ValidationSection::Configuration => &self.configuration_validation,
            ValidationSection::License => &self.license_validation,
            ValidationSection::Documentation => &self.documentation_checks,
        }
    }

    fn validation_mut(&mut self, section: ValidationSection) -> &mut Vec<ValidationItem> {
        match section {
            ValidationSection::Hardware => &mut self.hardware_validation,
            ValidationSection::Configuration => &mut self.configuration_validation,
            ValidationSection::License => &mut self.license_validation,
            ValidationSection::Documentation => &mut self.documentation_checks,
        }
    }

    pub fn set_validation_status(
        &mut self,
        section: ValidationSection,
        index: usize,
        status: CheckStatus,
    ) -> bool {
        match self.validation_mut(section).get_mut(index) {
            Some(item) => {
                item.status = status;
                true
            }
            None => false,
        }
    }

    /// Flip a checklist entry; returns the new status.
    pub fn toggle_validation(&mut self, section: ValidationSection, index: usize) -> Option<CheckStatus> {
        let item = self.validation_mut(section).get_mut(index)?;
        item.status = match item.status {
            CheckStatus::Checked => CheckStatus::Unchecked,
            CheckStatus::Unchecked => CheckStatus::Checked,
        };
        Some(item.status)
    }
}

fn replace_existing(map: &mut Map<String, Value>, key: &str, value: Value) -> bool {
    match map.get_mut(key) {
        Some(slot) => {
            *slot = value;
            true
        }
        None => false,
    }
}
