use crate::client::CteraError::InvalidInput;
use crate::client::{Command, CteraHost};
use crate::entities::Resource;
use crate::pager::{Paginated, Pager};
use crate::query::DEFAULT_PAGE_SIZE;
use anyhow::Result;
use log::debug;
use serde::Serialize;
use std::fmt;

const WEBDAV_BASE: &str = "ServicesPortal/webdav";

/// A path in the cloud drive, relative to the WebDAV root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudPath {
    segments: Vec<String>,
}

impl CloudPath {
    #[must_use]
    pub fn new(path: &str) -> Self {
        Self {
            segments: path
                .split('/')
                .filter(|segment| !segment.is_empty())
                .map(String::from)
                .collect(),
        }
    }

    #[must_use]
    pub fn relative_path(&self) -> String {
        self.segments.join("/")
    }

    #[must_use]
    pub fn fullpath(&self) -> String {
        if self.segments.is_empty() {
            return WEBDAV_BASE.to_string();
        }
        format!("{WEBDAV_BASE}/{}", self.relative_path())
    }

    /// Full path with every segment percent-encoded
    #[must_use]
    pub fn encoded_fullpath(&self) -> String {
        self.segments
            .iter()
            .fold(WEBDAV_BASE.to_string(), |mut path, segment| {
                path.push('/');
                path.push_str(&urlencoding::encode(segment));
                path
            })
    }
}

impl fmt::Display for CloudPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fullpath())
    }
}

/// Parameter of `fetchResources`
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct FetchResourcesParam {
    #[serde(rename = "_classname")]
    classname: &'static str,
    start: u64,
    limit: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    root: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    depth: Option<u32>,
}

impl FetchResourcesParam {
    #[must_use]
    pub fn builder() -> FetchResourcesParamBuilder {
        FetchResourcesParamBuilder::default()
    }

    #[must_use]
    pub fn start(&self) -> u64 {
        self.start
    }

    #[must_use]
    pub fn limit(&self) -> u32 {
        self.limit
    }

    #[must_use]
    pub fn root(&self) -> Option<&str> {
        self.root.as_deref()
    }

    #[must_use]
    pub fn depth(&self) -> Option<u32> {
        self.depth
    }
}

impl Default for FetchResourcesParam {
    fn default() -> Self {
        Self {
            classname: "FetchResourcesParam",
            start: 0,
            limit: DEFAULT_PAGE_SIZE,
            root: None,
            depth: None,
        }
    }
}

impl Paginated for FetchResourcesParam {
    fn offset(&self) -> u64 {
        self.start
    }

    fn advance(&mut self) {
        self.start = self.start.saturating_add(u64::from(self.limit));
    }
}

/// Builder for [`FetchResourcesParam`]
#[derive(Default)]
pub struct FetchResourcesParamBuilder {
    param: FetchResourcesParam,
}

impl FetchResourcesParamBuilder {
    #[must_use]
    pub fn root(mut self, root: impl Into<String>) -> Self {
        self.param.root = Some(root.into());
        self
    }

    #[must_use]
    pub fn depth(mut self, depth: u32) -> Self {
        self.param.depth = Some(depth);
        self
    }

    #[must_use]
    pub fn count_limit(mut self, limit: u32) -> Self {
        self.param.limit = limit;
        self
    }

    /// Builds the [`FetchResourcesParam`]
    ///
    /// # Errors
    ///
    /// Returns an error if the page size is zero
    pub fn build(self) -> Result<FetchResourcesParam> {
        if self.param.limit == 0 {
            return Err(InvalidInput("Count limit must be positive".into()).into());
        }
        Ok(self.param)
    }
}

/// Cloud drive browsing
pub struct Files<'a> {
    host: &'a CteraHost,
}

impl<'a> Files<'a> {
    pub(crate) fn new(host: &'a CteraHost) -> Self {
        Self { host }
    }

    /// Lists the direct children of a folder, one page at a time
    ///
    /// # Errors
    ///
    /// Returns an error if the listing parameter cannot be built
    pub fn ls(&self, path: &CloudPath) -> Result<Pager<Command<'a, FetchResourcesParam, Resource>>> {
        debug!("Listing directory. path: {path}");

        let param = FetchResourcesParam::builder()
            .root(path.encoded_fullpath())
            .depth(1)
            .build()?;

        Ok(self.host.iterator("", "fetchResources", param))
    }
}
