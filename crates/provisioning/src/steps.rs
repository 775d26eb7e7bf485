//! Wizard page selection and navigation.
//!
//! An order's activation sequence is free text ("Allocate hardware",
//! "Commission network", ...). Pages are switched on by keyword so that
//! custom step names still map onto the right pages.

use serde::{Deserialize, Serialize};

/// Device family served by a configuration page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceFamily {
    Firewall,
    Switch,
    #[serde(rename = "accesspoint")]
    AccessPoint,
}

impl DeviceFamily {
    /// Family of a device config `type` (`"firewall"`, `"Access Point"`, `"ap"`, ...).
    pub fn from_type(kind: &str) -> Option<Self> {
        let folded: String = kind
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match folded.as_str() {
            "firewall" => Some(DeviceFamily::Firewall),
            "switch" => Some(DeviceFamily::Switch),
            "accesspoint" | "ap" => Some(DeviceFamily::AccessPoint),
            _ => None,
        }
    }
}

/// Wizard pages, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WizardStep {
    OrderReview,
    InventoryAllocation,
    FirewallConfiguration,
    SwitchConfiguration,
    AccessPointConfiguration,
    TestingValidation,
    FinalValidation,
    DeploymentPlanning,
    GoLive,
}

impl WizardStep {
    pub const ALL: [WizardStep; 9] = [
        WizardStep::OrderReview,
        WizardStep::InventoryAllocation,
        WizardStep::FirewallConfiguration,
        WizardStep::SwitchConfiguration,
        WizardStep::AccessPointConfiguration,
        WizardStep::TestingValidation,
        WizardStep::FinalValidation,
        WizardStep::DeploymentPlanning,
        WizardStep::GoLive,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::OrderReview => "Order Review & Confirmation",
            WizardStep::InventoryAllocation => "Inventory Allocation",
            WizardStep::FirewallConfiguration => "Firewall Configuration",
            WizardStep::SwitchConfiguration => "Switch Configuration",
            WizardStep::AccessPointConfiguration => "Access Point Configuration",
            WizardStep::TestingValidation => "Testing & Validation",
            WizardStep::FinalValidation => "Final Validation Checklist",
            WizardStep::DeploymentPlanning => "Deployment Planning & Scheduling",
            WizardStep::GoLive => "Go-Live & Customer Handover",
        }
    }

    pub fn device_family(&self) -> Option<DeviceFamily> {
        match self {
            WizardStep::FirewallConfiguration => Some(DeviceFamily::Firewall),
            WizardStep::SwitchConfiguration => Some(DeviceFamily::Switch),
            WizardStep::AccessPointConfiguration => Some(DeviceFamily::AccessPoint),
            _ => None,
        }
    }
}

/// Pages that apply to an order.
///
/// `families` are the device families that have a config in the wizard
/// document; when it is empty every device page is kept. An empty activation
/// sequence keeps every page.
pub fn select_steps(activation_sequence: &[String], families: &[DeviceFamily]) -> Vec<WizardStep> {
    if activation_sequence.is_empty() {
        return WizardStep::ALL.to_vec();
    }
    let steps: Vec<String> = activation_sequence.iter().map(|s| s.to_lowercase()).collect();
    let mentions = |words: &[&str]| steps.iter().any(|s| words.iter().any(|w| s.contains(w)));

    let allocate = mentions(&["allocat"]);
    let configure = mentions(&["configur", "commission"]);
    let deploy = mentions(&["install", "ship", "deploy"]);

    WizardStep::ALL
        .into_iter()
        .filter(|step| match step {
            WizardStep::InventoryAllocation => allocate,
            WizardStep::DeploymentPlanning => deploy,
            WizardStep::FirewallConfiguration
            | WizardStep::SwitchConfiguration
            | WizardStep::AccessPointConfiguration => {
                configure
                    && step
                        .device_family()
                        .is_some_and(|f| families.is_empty() || families.contains(&f))
            }
            _ => true,
        })
        .collect()
}

/// Position within the selected pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardNavigator {
    steps: Vec<WizardStep>,
    current: usize,
}

impl WizardNavigator {
    pub fn new(steps: Vec<WizardStep>) -> Self {
        Self { steps, current: 0 }
    }

    pub fn steps(&self) -> &[WizardStep] {
        &self.steps
    }

    pub fn position(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> Option<WizardStep> {
        self.steps.get(self.current).copied()
    }

    pub fn next(&mut self) -> Option<WizardStep> {
        if self.current + 1 < self.steps.len() {
            self.current += 1;
        }
        self.current()
    }

    pub fn prev(&mut self) -> Option<WizardStep> {
        self.current = self.current.saturating_sub(1);
        self.current()
    }

    pub fn is_first(&self) -> bool {
        self.current == 0
    }

    pub fn is_last(&self) -> bool {
        self.current + 1 >= self.steps.len()
    }

    /// Page heading, e.g. `Step 2: Inventory Allocation`.
    pub fn heading(&self) -> Option<String> {
        self.current()
            .map(|s| format!("Step {}: {}", self.current + 1, s.title()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seq(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn empty_sequence_keeps_everything() {
        assert_eq!(select_steps(&[], &[DeviceFamily::Switch]).len(), 9);
    }

    #[test]
    fn steps_follow_keywords() {
        let picked = select_steps(&seq(&["Activate license", "Go live"]), &[]);
        assert_eq!(
            picked,
            vec![
                WizardStep::OrderReview,
                WizardStep::TestingValidation,
                WizardStep::FinalValidation,
                WizardStep::GoLive
            ]
        );

        let picked = select_steps(&seq(&["ALLOCATE HARDWARE", "Ship & install"]), &[]);
        assert!(picked.contains(&WizardStep::InventoryAllocation));
        assert!(picked.contains(&WizardStep::DeploymentPlanning));
        assert!(!picked.contains(&WizardStep::FirewallConfiguration));
    }

    #[test]
    fn device_pages_follow_known_families() {
        let s = seq(&["Commission network"]);
        let all = select_steps(&s, &[]);
        assert!(all.contains(&WizardStep::SwitchConfiguration));
        assert!(all.contains(&WizardStep::AccessPointConfiguration));

        let fw_only = select_steps(&s, &[DeviceFamily::Firewall]);
        assert!(fw_only.contains(&WizardStep::FirewallConfiguration));
        assert!(!fw_only.contains(&WizardStep::SwitchConfiguration));
        assert!(!fw_only.contains(&WizardStep::AccessPointConfiguration));
    }

    #[test]
    fn family_names_fold() {
        assert_eq!(DeviceFamily::from_type("Access Point"), Some(DeviceFamily::AccessPoint));
        assert_eq!(DeviceFamily::from_type("FIREWALL"), Some(DeviceFamily::Firewall));
        assert_eq!(DeviceFamily::from_type("camera"), None);
    }

    #[test]
    fn navigator_clamps() {
        let mut nav = WizardNavigator::new(select_steps(&seq(&["Go live"]), &[]));
        assert_eq!(nav.heading().as_deref(), Some("Step 1: Order Review & Confirmation"));
        assert_eq!(nav.prev(), Some(WizardStep::OrderReview));
        assert!(nav.is_first());
        for _ in 0..10 {
            nav.next();
        }
        assert!(nav.is_last());
        assert_eq!(nav.current(), Some(WizardStep::GoLive));
        assert_eq!(nav.heading().as_deref(), Some("Step 4: Go-Live & Customer Handover"));

        let empty = WizardNavigator::new(Vec::new());
        assert!(empty.is_last());
        assert_eq!(empty.heading(), None);
    }

    #[cfg(test)]
    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Review, testing, validation and go-live pages are never dropped.
            #[test]
            fn fixed_pages_always_present(names in proptest::collection::vec("[a-zA-Z &]{0,20}", 0..6)) {
                let picked = select_steps(&names, &[]);
                for fixed in [WizardStep::OrderReview, WizardStep::TestingValidation, WizardStep::FinalValidation, WizardStep::GoLive] {
                    prop_assert!(picked.contains(&fixed));
                }
                let mut sorted = picked.clone();
                sorted.sort_by_key(|s| WizardStep::ALL.iter().position(|x| x == s));
                prop_assert_eq!(picked, sorted);
            }
        }
    }
}
