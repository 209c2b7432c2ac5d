mod utils;

use crate::utils::{API_PATH, execute_mock, json_field, json_response, setup_client};
use ctera_client::client::CteraError;
use ctera_client::pager::PagerState;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

const TENANTS: [&str; 8] = ["a", "b", "c", "d", "e", "f", "g", "h"];

#[tokio::test]
async fn test_get_active_tenants() {
    let (server, host) = setup_client().await;

    execute_mock("", "getPortalsDisplayInfo")
        .and(json_field("/param/startFrom", 0))
        .and(json_field("/param/includeClasses", true))
        .respond_with(json_response("test-files/tenants_page_1.json"))
        .expect(1)
        .mount(&server)
        .await;

    execute_mock("", "getPortalsDisplayInfo")
        .and(json_field("/param/startFrom", 100))
        .respond_with(json_response("test-files/tenants_page_2.json"))
        .expect(1)
        .mount(&server)
        .await;

    let mut tenants = host.portals().tenants().unwrap();
    let mut names = Vec::new();
    while let Some(tenant) = tenants.next().await.unwrap() {
        names.push(tenant.name);
    }

    assert_eq!(TENANTS.to_vec(), names);
    assert_eq!(2, tenants.fetches());
    assert_eq!(PagerState::Exhausted, tenants.state());

    // exhausted pager never goes back to the server
    assert!(tenants.next().await.unwrap().is_none());
    server.verify().await;
}

#[tokio::test]
async fn test_tenants_stop_when_fetch_fails() {
    let (server, host) = setup_client().await;

    execute_mock("", "getPortalsDisplayInfo")
        .and(json_field("/param/startFrom", 0))
        .respond_with(json_response("test-files/tenants_page_1.json"))
        .expect(1)
        .mount(&server)
        .await;

    execute_mock("", "getPortalsDisplayInfo")
        .and(json_field("/param/startFrom", 100))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&server)
        .await;

    let mut tenants = host.portals().tenants().unwrap();
    for expected in &TENANTS[..4] {
        assert_eq!(*expected, tenants.next().await.unwrap().unwrap().name);
    }

    let error = tenants.next().await.unwrap_err();
    assert!(matches!(
        error.downcast_ref::<CteraError>(),
        Some(CteraError::Api { code: 500, .. })
    ));
    assert_eq!(PagerState::Failed, tenants.state());
    assert!(tenants.next().await.unwrap().is_none());

    server.verify().await;
}

#[tokio::test]
async fn test_add_tenant_default_args() {
    let (server, host) = setup_client().await;

    Mock::given(method("POST"))
        .and(path(format!("{API_PATH}/teamPortals")))
        .and(body_json(json!({
            "type": "add",
            "param": {
                "_classname": "TeamPortal",
                "name": "acme",
                "displayName": null,
                "externalPortalId": null,
                "companyName": null
            }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("Success")))
        .expect(1)
        .mount(&server)
        .await;

    let response = host.portals().add("acme", None, None, None).await.unwrap();

    server.verify().await;
    assert_eq!("Success", response);
}

#[tokio::test]
async fn test_add_tenant_with_display_name_with_billing_id_with_company() {
    let (server, host) = setup_client().await;

    Mock::given(method("POST"))
        .and(path(format!("{API_PATH}/teamPortals")))
        .and(json_field("/param/displayName", "Acme Corp."))
        .and(json_field("/param/externalPortalId", "billing-id"))
        .and(json_field("/param/companyName", "The Acme Corporation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("Success")))
        .expect(1)
        .mount(&server)
        .await;

    let response = host
        .portals()
        .add(
            "acme",
            Some("Acme Corp."),
            Some("billing-id"),
            Some("The Acme Corporation"),
        )
        .await
        .unwrap();

    server.verify().await;
    assert_eq!("Success", response);
}

#[tokio::test]
async fn test_delete_portal() {
    let (server, host) = setup_client().await;

    execute_mock("/teamPortals/acme", "delete")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("Success")))
        .expect(1)
        .mount(&server)
        .await;

    let response = host.portals().delete("acme").await.unwrap();

    server.verify().await;
    assert_eq!("Success", response);
}

#[tokio::test]
async fn test_undelete_portal() {
    let (server, host) = setup_client().await;

    execute_mock("/teamPortals/acme", "moveFromTrashcan")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("Success")))
        .expect(1)
        .mount(&server)
        .await;

    let response = host.portals().undelete("acme").await.unwrap();

    server.verify().await;
    assert_eq!("Success", response);
}

#[tokio::test]
async fn test_browse_tenant() {
    let (server, host) = setup_client().await;

    Mock::given(method("PUT"))
        .and(path(format!("{API_PATH}/currentPortal")))
        .and(body_json(json!("acme")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    host.portals().browse("acme").await.unwrap();

    server.verify().await;
}

#[tokio::test]
async fn test_browse_global_admin() {
    let (server, host) = setup_client().await;

    Mock::given(method("PUT"))
        .and(path(format!("{API_PATH}/currentPortal")))
        .and(body_json(json!("")))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    host.portals().browse_global_admin().await.unwrap();

    server.verify().await;
}

#[tokio::test]
async fn test_delete_portal_encodes_name() {
    let (server, host) = setup_client().await;

    execute_mock("/teamPortals/acme%20corp", "delete")
        .respond_with(ResponseTemplate::new(200).set_body_json(json!("Success")))
        .expect(1)
        .mount(&server)
        .await;

    let response = host.portals().delete("acme corp").await.unwrap();

    server.verify().await;
    assert_eq!("Success", response);
}
