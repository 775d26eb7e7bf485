//! Wizard document generation from an offering.

use bss_catalog::{find_price, find_product, DeviceTemplate, DeviceTemplates, Offering, Price, Product};
use bss_inventory::Inventory;

use crate::wizard::{EquipmentLine, RequiredEquipment, WizardData};
use crate::DeviceFamily;

/// Catalog, price and stock data the generator reads.
#[derive(Debug, Clone, Copy)]
pub struct FulfillmentInputs<'a> {
    pub products: &'a [Product],
    pub prices: &'a [Price],
    pub inventory: &'a Inventory,
    pub templates: &'a DeviceTemplates,
}

struct DeviceInfo {
    resource_id: String,
    qty: u32,
    display_name: String,
    device_family: String,
}

/// Decompose `offering` into equipment lines, stock requirements and device
/// configs on top of the `base` template document.
///
/// Components whose product cannot be resolved are skipped. Allocation
/// progress is reset.
pub fn generate(offering: &Offering, inputs: FulfillmentInputs<'_>, base: WizardData) -> WizardData {
    let mut breakdown = Vec::new();
    let mut devices = Vec::new();

    for comp in offering.effective_components() {
        let Some(product) = comp.product_id.and_then(|pid| find_product(inputs.products, pid)) else {
            continue;
        };
        let qty = comp.qty.max(1);
        let unit_price = find_price(inputs.prices, product.price_id.as_deref())
            .map(Price::unit_price)
            .unwrap_or(0.0);
        let resource_id = product.resource_id();
        let allocatable = product.is_allocatable();

        breakdown.push(EquipmentLine {
            item: product.name.clone(),
            sku: product.sku.clone(),
            qty,
            unit_price,
            total: unit_price * f64::from(qty),
            resource_id: resource_id.clone(),
            allocatable,
        });
        if allocatable {
            devices.push(DeviceInfo {
                resource_id,
                qty,
                display_name: product.name.clone(),
                device_family: product.device_family.clone().unwrap_or_default(),
            });
        }
    }

    let required = breakdown
        .iter()
        .filter(|l| l.allocatable)
        .map(|l| {
            let stock = inputs.inventory.available_stock(&l.item);
            RequiredEquipment {
                name: l.item.clone(),
                need: l.qty,
                stock: stock.unwrap_or(0),
                status: inputs.inventory.status_for(&l.item, l.qty).into(),
            }
        })
        .collect();

    let mut data = base;
    data.equipment_subtotal = breakdown.iter().map(|l| l.total).sum();
    data.total_order_value = data.equipment_subtotal + data.installation_services;
    data.equipment_breakdown = breakdown;
    data.required_equipment = required;
    data.allocated_equipment = Vec::new();
    data.device_configs.clear();

    for dev in devices {
        let template = inputs.templates.get(&dev.resource_id);
        let kind = match template.map(|t| t.kind.as_str()).filter(|k| !k.is_empty()) {
            Some(k) => k.to_string(),
            None => dev.device_family.to_lowercase(),
        };
        if kind.is_empty() {
            continue;
        }
        for unit in 1..=dev.qty {
            let key = if dev.qty > 1 {
                format!("{}-{unit}", dev.resource_id)
            } else {
                dev.resource_id.clone()
            };
            let config = match template {
                Some(t) => DeviceTemplate {
                    kind: kind.clone(),
                    display_name: dev.display_name.clone(),
                    sections: t.sections.clone(),
                },
                None => DeviceTemplate::placeholder(kind.clone(), dev.display_name.clone()),
            };
            data.device_configs.insert(key, config);
        }
    }

    data
}

/// Device families that have at least one config in `data`.
pub fn configured_families(data: &WizardData) -> Vec<DeviceFamily> {
    let mut out = Vec::new();
    for family in data.device_configs.values().filter_map(|c| DeviceFamily::from_type(&c.kind)) {
        if !out.contains(&family) {
            out.push(family);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EquipmentStatus;
    use bss_catalog::{BillingMode, Component, ConfigField, ConfigSection};
    use bss_core::RecordId;
    use bss_inventory::InventoryItem;
    use serde_json::Map;

    fn product(id: u64, name: &str, sku: &str, category: &str, price: &str) -> Product {
        Product {
            id: RecordId::new(id),
            name: name.into(),
            sku: sku.into(),
            category: category.into(),
            price_id: Some(price.into()),
            ..Product::default()
        }
    }

    fn price(key: &str, one_off: f64, monthly: f64) -> Price {
        Price {
            price_id: key.into(),
            one_off,
            monthly,
            ..Price::default()
        }
    }

    fn fixture() -> (Vec<Product>, Vec<Price>, Inventory, DeviceTemplates) {
        let mut ap = product(3, "FortiAP 231G", "FAP-231G-A", "networking", "P-AP");
        ap.device_family = Some("AccessPoint".into());
        let products = vec![
            product(1, "FortiGate 100F", "FG-100F-BDL", "networking", "P-FG"),
            product(2, "FortiCare", "FC-10-0100", "service", "P-FC"),
            ap,
            product(4, "Rack kit", "RK-1", "networking", "P-none"),
        ];
        let prices = vec![price("P-FG", 2500.0, 0.0), price("P-FC", 0.0, 40.0), price("P-AP", 600.0, 0.0)];
        let inventory = Inventory::new(vec![
            InventoryItem { sku: "FG-100F".into(), name: "FortiGate 100F".into(), stock: 4, extra: Map::new() },
            InventoryItem { sku: "FAP-231G".into(), name: "FortiAP 231G".into(), stock: 1, extra: Map::new() },
        ]);
        let mut templates = DeviceTemplates::new();
        templates.insert(
            "FG100F".into(),
            DeviceTemplate {
                kind: "firewall".into(),
                display_name: "Template name".into(),
                sections: vec![ConfigSection {
                    title: "WAN".into(),
                    fields: vec![ConfigField { label: "IP".into(), ..ConfigField::default() }],
                }],
            },
        );
        (products, prices, inventory, templates)
    }

    fn offering() -> Offering {
        Offering {
            components: vec![
                Component::new(RecordId::new(1), 1, BillingMode::OneOff),
                Component::new(RecordId::new(2), 1, BillingMode::Monthly),
                Component::new(RecordId::new(3), 2, BillingMode::OneOff),
                Component::new(RecordId::new(4), 1, BillingMode::OneOff),
                Component::new(RecordId::new(77), 1, BillingMode::OneOff),
            ],
            ..Offering::default()
        }
    }

    fn generated() -> WizardData {
        let (products, prices, inventory, templates) = fixture();
        let base = WizardData {
            installation_services: 750.0,
            allocated_equipment: vec![crate::AllocatedEquipment {
                name: "stale".into(),
                status: EquipmentStatus::Allocated,
            }],
            ..WizardData::default()
        };
        let inputs = FulfillmentInputs {
            products: &products,
            prices: &prices,
            inventory: &inventory,
            templates: &templates,
        };
        generate(&offering(), inputs, base)
    }

    #[test]
    fn breakdown_and_totals() {
        let d = generated();
        assert_eq!(d.equipment_breakdown.len(), 4);
        let ap = &d.equipment_breakdown[2];
        assert_eq!((ap.qty, ap.unit_price, ap.total), (2, 600.0, 1200.0));
        // Monthly-only support is not an equipment price.
        assert_eq!((d.equipment_breakdown[1].unit_price, d.equipment_breakdown[1].total), (0.0, 0.0));
        assert_eq!(d.equipment_breakdown[3].unit_price, 0.0);
        assert_eq!(d.equipment_subtotal, 2500.0 + 1200.0);
        assert_eq!(d.total_order_value, d.equipment_subtotal + 750.0);
        assert!(d.allocated_equipment.is_empty());
    }

    #[test]
    fn required_equipment_excludes_services_and_classifies_stock() {
        let d = generated();
        let req: Vec<_> = d.required_equipment.iter().map(|r| (r.name.as_str(), r.status)).collect();
        assert_eq!(
            req,
            vec![
                ("FortiGate 100F", EquipmentStatus::Available),
                ("FortiAP 231G", EquipmentStatus::LowStock),
                ("Rack kit", EquipmentStatus::NotAvailable),
            ]
        );
        assert_eq!(d.required_equipment[2].stock, 0);
    }

    #[test]
    fn device_configs_use_templates_placeholders_and_unit_suffixes() {
        let d = generated();
        let keys: Vec<_> = d.device_configs.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["FAP231G-1", "FAP231G-2", "FG100F"]);

        let fg = &d.device_configs["FG100F"];
        assert_eq!(fg.kind, "firewall");
        assert_eq!(fg.display_name, "FortiGate 100F");
        assert_eq!(fg.sections[0].title, "WAN");

        let ap = &d.device_configs["FAP231G-2"];
        assert_eq!(ap.kind, "accesspoint");
        assert_eq!(ap.sections[0].title, "Custom Configuration");

        let families = configured_families(&d);
        assert!(families.contains(&DeviceFamily::Firewall));
        assert!(families.contains(&DeviceFamily::AccessPoint));
        assert!(!families.contains(&DeviceFamily::Switch));
    }
}
