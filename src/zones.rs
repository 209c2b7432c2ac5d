use crate::client::CteraError::{InvalidInput, NotFound, Operation};
use crate::client::{Command, CteraHost};
use crate::entities::{OperationResult, PolicyType, Zone, ZoneInfo};
use crate::pager::{Page, Pager};
use crate::query::{FilterBuilder, QueryParam};
use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use serde::Serialize;

const LIST_ZONES: &str = "getZonesDisplayInfo";

/// Parameter of `addZone` and `saveZone`
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SaveZoneParam {
    #[serde(rename = "_classname")]
    classname: &'static str,
    pub basic_info: ZoneBasicInfo,
    pub delta: ZoneDelta,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ZoneBasicInfo {
    #[serde(rename = "_classname")]
    classname: &'static str,
    pub name: String,
    pub policy_type: PolicyType,
    pub description: Option<String>,
    pub zone_id: Option<u64>,
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ZoneDelta {
    #[serde(rename = "_classname")]
    classname: &'static str,
    pub devices_delta: ZoneDeviceDelta,
}

#[derive(Serialize, Debug)]
pub struct ZoneDeviceDelta {
    #[serde(rename = "_classname")]
    classname: &'static str,
    pub added: Vec<u64>,
    pub removed: Vec<u64>,
}

impl SaveZoneParam {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        policy_type: PolicyType,
        description: Option<String>,
        zone_id: Option<u64>,
    ) -> Self {
        Self {
            classname: "SaveZoneParam",
            basic_info: ZoneBasicInfo {
                classname: "ZoneBasicInfo",
                name: name.into(),
                policy_type,
                description,
                zone_id,
            },
            delta: ZoneDelta {
                classname: "ZoneDelta",
                devices_delta: ZoneDeviceDelta {
                    classname: "ZoneDeviceDelta",
                    added: Vec::new(),
                    removed: Vec::new(),
                },
            },
        }
    }
}

/// Portal zone management
pub struct Zones<'a> {
    host: &'a CteraHost,
}

impl<'a> Zones<'a> {
    pub(crate) fn new(host: &'a CteraHost) -> Self {
        Self { host }
    }

    /// Looks up a zone by name
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No zone has the given name
    /// - Network request fails or the response cannot be parsed
    pub async fn get(&self, name: &str) -> Result<Zone> {
        let param = QueryParam::builder()
            .include_classname()
            .start_from(0)
            .count_limit(1)
            .add_filter(FilterBuilder::new("name").eq(name))
            .or_filter(false)
            .build()?;

        info!("Retrieving zone. name: {name}");

        let response: Page<Zone> = self
            .host
            .execute("", LIST_ZONES, &param)
            .await
            .context("Failed to retrieve zone")?;

        let Some(zone) = response.items.into_iter().next() else {
            error!("Zone not found. name: {name}");
            return Err(NotFound(format!("Zone not found: {name}")).into());
        };

        info!("Zone found. name: {name}, id: {}", zone.zone_id);
        Ok(zone)
    }

    /// Lists all zones, one page at a time
    ///
    /// # Errors
    ///
    /// Returns an error if the query parameter cannot be built
    pub fn list(&self) -> Result<Pager<Command<'a, QueryParam, Zone>>> {
        let param = QueryParam::builder().include_classname().build()?;
        Ok(self.host.iterator("", LIST_ZONES, param))
    }

    /// Reads the basic settings of a zone
    ///
    /// # Errors
    ///
    /// Returns an error if the network request fails or the response cannot be parsed
    pub async fn info(&self, zone_id: u64) -> Result<ZoneInfo> {
        debug!("Obtaining zone info. id: {zone_id}");

        let info = self
            .host
            .execute("", "getZoneBasicInfo", &zone_id)
            .await
            .context("Failed to obtain zone info")?;

        debug!("Obtained zone info. id: {zone_id}");
        Ok(info)
    }

    /// Creates a zone
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Network request fails or the response cannot be parsed
    /// - Server rejects the zone
    pub async fn add(
        &self,
        name: &str,
        policy_type: PolicyType,
        description: Option<&str>,
    ) -> Result<()> {
        let param = SaveZoneParam::new(name, policy_type, description.map(String::from), None);

        info!("Adding zone. name: {name}");

        let response: OperationResult = self
            .host
            .execute("", "addZone", &param)
            .await
            .context("Failed to add zone")?;

        if !response.is_ok() {
            error!("Zone creation failed. rc: {}", response.rc);
            return Err(Operation(format!("Zone creation failed: {}", response.rc)).into());
        }

        info!("Zone added. name: {name}");
        Ok(())
    }

    /// Deletes a zone by name
    ///
    /// # Errors
    ///
    /// Returns an error if the zone doesn't exist or the network request fails
    pub async fn delete(&self, name: &str) -> Result<()> {
        let zone = self.get(name).await?;

        info!("Deleting zone. name: {name}");

        let response: serde_json::Value = self
            .host
            .execute("", "deleteZones", &[zone.zone_id])
            .await
            .context("Failed to delete zone")?;

        if response == "ok" {
            info!("Zone deleted. name: {name}");
        } else {
            warn!("Unexpected response deleting zone. name: {name}, response: {response}");
        }
        Ok(())
    }

    /// Adds devices, looked up by name, to a zone
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Device names are empty
    /// - The zone doesn't exist
    /// - Network request fails or a response cannot be parsed
    /// - Server rejects the change
    pub async fn add_devices(&self, name: &str, device_names: &[&str]) -> Result<()> {
        // an unfiltered device query would match every device on the portal
        if device_names.is_empty() {
            return Err(InvalidInput("Device names cannot be empty".into()).into());
        }

        let zone = self.get(name).await?;
        let devices = self
            .host
            .devices()
            .by_name(device_names, &["uid"])?
            .collect_all()
            .await
            .context("Failed to look up devices")?;
        let info = self.info(zone.zone_id).await?;

        let mut param =
            SaveZoneParam::new(info.name, info.policy_type, info.description, Some(info.zone_id));
        param
            .delta
            .devices_delta
            .added
            .extend(devices.iter().filter_map(|device| device.uid));

        info!("Adding devices to zone. zone: {name}");

        self.save(&param).await.inspect_err(|_| {
            error!("Failed adding devices to zone.");
        })
    }

    async fn save(&self, param: &SaveZoneParam) -> Result<()> {
        let zone_name = &param.basic_info.name;

        debug!("Applying changes to zone. zone: {zone_name}");

        let response: OperationResult = self
            .host
            .execute("", "saveZone", param)
            .await
            .context("Failed to save zone")?;

        if !response.is_ok() {
            error!(
                "Failed applying changes to zone. zone: {zone_name}, rc: {}",
                response.rc
            );
            return Err(Operation(format!("Failed to save zone {zone_name}: {}", response.rc)).into());
        }

        debug!("Zone changes applied successfully. zone: {zone_name}");
        Ok(())
    }
}
