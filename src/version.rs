use std::env::consts;
use std::fmt;

const DEFAULT_PRODUCT: &str = "ctera-client";

/// Client identification sent with every request.
///
/// Built once when the [`CteraHost`](crate::client::CteraHost) is constructed and carried
/// by it, so two clients in one process may identify themselves differently.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Version {
    product: String,
    product_version: String,
    system: &'static str,
    machine: &'static str,
}

impl Version {
    #[must_use]
    pub fn new(product: impl Into<String>, product_version: impl Into<String>) -> Self {
        Self {
            product: product.into(),
            product_version: product_version.into(),
            system: consts::OS,
            machine: consts::ARCH,
        }
    }

    #[must_use]
    pub fn product(&self) -> &str {
        &self.product
    }

    #[must_use]
    pub fn product_version(&self) -> &str {
        &self.product_version
    }

    /// Renders the `User-Agent` header value
    #[must_use]
    pub fn as_header(&self) -> String {
        self.to_string()
    }
}

impl Default for Version {
    fn default() -> Self {
        Self::new(DEFAULT_PRODUCT, env!("CARGO_PKG_VERSION"))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} ({}; {}) Rust",
            self.product, self.product_version, self.system, self.machine
        )
    }
}
