use anyhow::Result;
use chrono::Utc;
use ctera_client::client::CteraHost;
use ctera_client::files::CloudPath;
use std::env;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let portal = {
        let host = env::var("CTERA_HOST")?;
        CteraHost::builder().host(host).build()?
    };

    let mut tenants = portal.portals().tenants()?;
    while let Some(tenant) = tenants.next().await? {
        println!(
            "tenant: {}, display name: {:?}",
            tenant.name, tenant.display_name
        );
    }

    let mut zones = portal.zones().list()?;
    while let Some(zone) = zones.next().await? {
        println!("zone: {}, id: {}", zone.name, zone.zone_id);
    }

    let path = env::var("CTERA_PATH").unwrap_or_else(|_| String::from("My Files"));
    let now = Utc::now();
    let mut resources = portal.files().ls(&CloudPath::new(&path))?;
    while let Some(resource) = resources.next().await? {
        println!(
            "{}{} {} {}",
            resource.name,
            if resource.is_folder { "/" } else { "" },
            resource.calculate_size(),
            resource.calculate_age(now)
        );
    }

    Ok(())
}
