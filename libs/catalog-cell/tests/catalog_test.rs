use std::sync::Arc;

use assert_matches::assert_matches;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::json;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use catalog_cell::{catalog_routes, CatalogError, CatalogService, CompanyRef};
use shared_backend::BackendError;
use shared_utils::test_utils::{MockBackendResponses, TestConfig};

async fn mount_catalog(mock_server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/companies/slug/central"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::company(1, "central")))
        .mount(mock_server)
        .await;

    let mut retired = MockBackendResponses::service(3, "Relaxamento", 80.0, 90);
    retired["active"] = json!(false);

    Mock::given(method("GET"))
        .and(path("/companies/1/services"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::service(1, "Corte", 35.0, 30),
            MockBackendResponses::service(2, "Barba", 25.0, 20),
            retired,
        ])))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/companies/1/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::product(2, "Pomada", 15.0),
        ])))
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/companies/1/professionals"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            MockBackendResponses::professional(7, "Rafael"),
        ])))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_load_catalog_hides_inactive_entries() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server).await;

    let service = CatalogService::new(&TestConfig::with_backend(&mock_server.uri()).to_app_config());
    let catalog = service
        .load_catalog(&CompanyRef::Slug("central".to_string()), None)
        .await
        .unwrap();

    assert_eq!(catalog.company.id, 1);
    assert_eq!(catalog.services.len(), 2);
    assert!(catalog.service(3).is_none());
    assert_eq!(catalog.service(1).map(|s| s.price), Some(35.0));
    assert_eq!(catalog.product(2).map(|p| p.name.as_str()), Some("Pomada"));
    assert_eq!(catalog.professional(7).map(|p| p.name.as_str()), Some("Rafael"));
}

#[tokio::test]
async fn test_unknown_company_is_reported() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/companies/slug/ghost"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&mock_server)
        .await;

    let service = CatalogService::new(&TestConfig::with_backend(&mock_server.uri()).to_app_config());
    let err = service
        .load_catalog(&CompanyRef::Slug("ghost".to_string()), None)
        .await
        .unwrap_err();

    assert_matches!(err, CatalogError::CompanyNotFound(_));
}

#[tokio::test]
async fn test_slug_cannot_escape_its_path_segment() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/companies/slug/central"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::company(1, "central")))
        .expect(0)
        .mount(&mock_server)
        .await;

    let service = CatalogService::new(&TestConfig::with_backend(&mock_server.uri()).to_app_config());
    let err = service
        .load_catalog(&CompanyRef::Slug("nope/../central".to_string()), None)
        .await
        .unwrap_err();

    assert_matches!(err, CatalogError::CompanyNotFound(_));

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), "/companies/slug/nope%2F..%2Fcentral");
}

#[tokio::test]
async fn test_list_failure_propagates() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/companies/4"))
        .respond_with(ResponseTemplate::new(200).set_body_json(MockBackendResponses::company(4, "norte")))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/companies/4/services"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/companies/4/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/companies/4/professionals"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&mock_server)
        .await;

    let service = CatalogService::new(&TestConfig::with_backend(&mock_server.uri()).to_app_config());
    let err = service.load_catalog(&CompanyRef::Id(4), None).await.unwrap_err();

    assert_matches!(err, CatalogError::Backend(BackendError::Unavailable { status: 500, .. }));
}

#[tokio::test]
async fn test_catalog_route() {
    let mock_server = MockServer::start().await;
    mount_catalog(&mock_server).await;

    let app = catalog_routes(Arc::new(TestConfig::with_backend(&mock_server.uri()).to_app_config()));

    let response = app
        .oneshot(Request::builder().uri("/central").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(json["company"]["slug"], "central");
    assert_eq!(json["services"].as_array().map(|a| a.len()), Some(2));
    assert_eq!(json["professionals"][0]["name"], "Rafael");
}
