//! Service specifications: customer-facing (CFS) and resource-facing (RFS).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use bss_core::{Entity, RecordId};

/// Customer-facing service; realised by one or more RFS.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cfs {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cfs_code: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub rfs_ids: Vec<RecordId>,
    #[serde(default)]
    pub activation_sequence: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Resource-facing service (an API or device capability).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rfs {
    #[serde(default)]
    pub id: RecordId,
    #[serde(default)]
    pub name: String,
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub spec: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Entity for Cfs {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

impl Entity for Rfs {
    type Id = RecordId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// Every RFS referenced by the given services, first-seen order, no repeats.
pub fn all_rfs_ids(services: &[Cfs]) -> Vec<RecordId> {
    let mut out = Vec::new();
    for id in services.iter().flat_map(|c| c.rfs_ids.iter()) {
        if !out.contains(id) {
            out.push(*id);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rfs_ids_are_distinct_in_first_seen_order() {
        let ids = |v: &[u64]| v.iter().copied().map(RecordId::new).collect::<Vec<_>>();
        let services = vec![
            Cfs { rfs_ids: ids(&[3, 1]), ..Cfs::default() },
            Cfs { rfs_ids: ids(&[1, 2, 3]), ..Cfs::default() },
        ];
        assert_eq!(all_rfs_ids(&services), ids(&[3, 1, 2]));
        assert!(all_rfs_ids(&[]).is_empty());
    }

    #[test]
    fn rfs_type_keeps_its_wire_name() {
        let rfs: Rfs = serde_json::from_str(r#"{"id":1,"name":"NAC API","type":"REST"}"#).unwrap();
        assert_eq!(rfs.kind, "REST");
        assert_eq!(serde_json::to_value(&rfs).unwrap()["type"], "REST");
    }
}
