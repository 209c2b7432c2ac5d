use crate::client::{Command, CteraHost};
use crate::entities::Device;
use crate::pager::Pager;
use crate::query::{FilterBuilder, QueryParam};
use anyhow::Result;
use log::debug;

/// Managed device lookups
pub struct Devices<'a> {
    host: &'a CteraHost,
}

impl<'a> Devices<'a> {
    pub(crate) fn new(host: &'a CteraHost) -> Self {
        Self { host }
    }

    /// Lists devices whose name matches any of `names`, returning only the `include` attributes
    ///
    /// # Errors
    ///
    /// Returns an error if the query parameter cannot be built
    pub fn by_name(
        &self,
        names: &[&str],
        include: &[&str],
    ) -> Result<Pager<Command<'a, QueryParam, Device>>> {
        debug!("Querying devices by name. count: {}", names.len());

        let param = QueryParam::builder()
            .include(include.iter().copied())
            .add_filters(names.iter().map(|name| FilterBuilder::new("name").eq(*name)))
            .or_filter(true)
            .build()?;

        Ok(self.host.iterator("/devices", "query", param))
    }
}
