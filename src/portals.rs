use crate::client::{Command, CteraHost};
use crate::entities::Portal;
use crate::pager::Pager;
use crate::query::QueryParam;
use anyhow::{Context, Result};
use log::info;
use serde::Serialize;

/// Parameter of a new team portal
#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct TeamPortal {
    #[serde(rename = "_classname")]
    classname: &'static str,
    pub name: String,
    pub display_name: Option<String>,
    pub external_portal_id: Option<String>,
    pub company_name: Option<String>,
}

impl TeamPortal {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            classname: "TeamPortal",
            name: name.into(),
            display_name: None,
            external_portal_id: None,
            company_name: None,
        }
    }
}

/// Team portal (tenant) management, available to global administrators
pub struct Portals<'a> {
    host: &'a CteraHost,
}

impl<'a> Portals<'a> {
    pub(crate) fn new(host: &'a CteraHost) -> Self {
        Self { host }
    }

    /// Lists active tenants, one page at a time
    ///
    /// # Errors
    ///
    /// Returns an error if the query parameter cannot be built
    pub fn tenants(&self) -> Result<Pager<Command<'a, QueryParam, Portal>>> {
        let param = QueryParam::builder()
            .include_classname()
            .start_from(0)
            .build()?;
        Ok(self.host.iterator("", "getPortalsDisplayInfo", param))
    }

    /// Creates a team portal, returning the server's response
    ///
    /// # Errors
    ///
    /// Returns an error if the network request fails or the response cannot be parsed
    pub async fn add(
        &self,
        name: &str,
        display_name: Option<&str>,
        billing_id: Option<&str>,
        company: Option<&str>,
    ) -> Result<String> {
        let param = TeamPortal {
            display_name: display_name.map(String::from),
            external_portal_id: billing_id.map(String::from),
            company_name: company.map(String::from),
            ..TeamPortal::new(name)
        };

        info!("Adding team portal. name: {name}");

        let response = self
            .host
            .add("/teamPortals", &param)
            .await
            .context("Failed to add team portal")?;

        info!("Team portal added. name: {name}");
        Ok(response)
    }

    /// Moves a team portal to the trash can
    ///
    /// # Errors
    ///
    /// Returns an error if the network request fails or the response cannot be parsed
    pub async fn delete(&self, name: &str) -> Result<String> {
        info!("Deleting team portal. name: {name}");
        self.host
            .execute_no_param(&Self::portal_path(name), "delete")
            .await
            .context("Failed to delete team portal")
    }

    /// Restores a team portal from the trash can
    ///
    /// # Errors
    ///
    /// Returns an error if the network request fails or the response cannot be parsed
    pub async fn undelete(&self, name: &str) -> Result<String> {
        info!("Recovering team portal. name: {name}");
        self.host
            .execute_no_param(&Self::portal_path(name), "moveFromTrashcan")
            .await
            .context("Failed to recover team portal")
    }

    /// Switches the session into a tenant's context
    ///
    /// # Errors
    ///
    /// Returns an error if the network request fails
    pub async fn browse(&self, name: &str) -> Result<()> {
        info!("Browsing team portal. name: {name}");
        self.host.put("/currentPortal", name).await
    }

    /// Switches the session back to the global administration context
    ///
    /// # Errors
    ///
    /// Returns an error if the network request fails
    pub async fn browse_global_admin(&self) -> Result<()> {
        info!("Browsing global administration.");
        self.host.put("/currentPortal", "").await
    }

    fn portal_path(name: &str) -> String {
        format!("/teamPortals/{}", urlencoding::encode(name))
    }
}
