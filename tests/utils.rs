use ctera_client::client::CteraHost;
use serde_json::Value;
use std::fs;
use wiremock::matchers::{method, path};
use wiremock::{Match, Mock, MockBuilder, MockServer, Request, ResponseTemplate};

pub const API_PATH: &str = "/admin/api";

/// # Panics
///
/// Will panic if a file can't be read or missing
#[must_use = "This function returns the body of the file as a string"]
pub fn body_from_file(path: &str) -> String {
    fs::read_to_string(path).expect("Failed to read file")
}

/// Matches requests whose JSON body holds `value` at the given JSON pointer
pub struct JsonFieldMatcher(String, Value);

impl JsonFieldMatcher {
    /// Specify the expected value at a JSON pointer, e.g. `/param/startFrom`.
    pub fn new<K: Into<String>, V: Into<Value>>(pointer: K, value: V) -> Self {
        Self(pointer.into(), value.into())
    }
}

/// Shorthand for [`JsonFieldMatcher::new`].
pub fn json_field<K, V>(pointer: K, value: V) -> JsonFieldMatcher
where
    K: Into<String>,
    V: Into<Value>,
{
    JsonFieldMatcher::new(pointer, value)
}

impl Match for JsonFieldMatcher {
    fn matches(&self, request: &Request) -> bool {
        serde_json::from_slice::<Value>(&request.body)
            .ok()
            .and_then(|body| body.pointer(&self.0).cloned())
            .is_some_and(|found| found == self.1)
    }
}

// Helper function to create a client with a mock server
pub async fn setup_client() -> (MockServer, CteraHost) {
    let server = MockServer::start().await;

    let host = CteraHost::builder()
        .host(server.uri())
        .build()
        .unwrap();

    (server, host)
}

/// Starts a mock for a user-defined method call on `subpath`
pub fn execute_mock(subpath: &str, name: &str) -> MockBuilder {
    Mock::given(method("POST"))
        .and(path(format!("{API_PATH}{subpath}")))
        .and(json_field("/type", "user-defined"))
        .and(json_field("/name", name))
}

pub fn json_response(response_file: &str) -> ResponseTemplate {
    ResponseTemplate::new(200)
        .append_header("content-type", "application/json")
        .set_body_string(body_from_file(response_file))
}
