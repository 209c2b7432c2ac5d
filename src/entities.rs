use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Result code of a mutating call
#[derive(Deserialize, Debug)]
pub struct OperationResult {
    pub rc: String,
    #[serde(default)]
    pub msg: Option<String>,
}

impl OperationResult {
    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.rc == "OK"
    }
}

/// Which cloud folders a zone exposes
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum PolicyType {
    AllFolders,
    #[default]
    SelectedFolders,
    NoFolders,
}

/// Zone summary as returned by zone queries
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Zone {
    pub zone_id: u64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub policy_type: Option<PolicyType>,
    #[serde(default)]
    pub total_folders: Option<u32>,
    #[serde(default)]
    pub total_devices: Option<u32>,
}

/// Basic zone settings
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ZoneInfo {
    pub zone_id: u64,
    pub name: String,
    pub policy_type: PolicyType,
    #[serde(default)]
    pub description: Option<String>,
}

/// Team portal (tenant) summary
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Portal {
    pub name: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub external_portal_id: Option<String>,
    #[serde(default)]
    pub company_name: Option<String>,
    /// Class name, present when the query asked for it
    #[serde(rename = "_classname", default)]
    pub classname: Option<String>,
}

/// Managed device. Only attributes requested by the query are populated.
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub uid: Option<u64>,
    #[serde(default)]
    pub device_type: Option<String>,
}

/// File or folder returned by a directory listing
#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub name: String,
    pub href: String,
    #[serde(default)]
    pub is_folder: bool,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(rename = "lastmodified", default)]
    pub last_modified: Option<DateTime<Utc>>,
}
