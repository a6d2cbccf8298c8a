//! Single-entity operations against a wiremock server.

use postureapi::{
    ClientConfig, Collector, CollectorUpdateParams, Create, Credential, CredentialCreateParams,
    CredentialType, Delete, EnvironmentType, ErrorKind, Get, List, PageRequest, PostureClient,
    PostureError, ScanSummary, Scope, ScopeCreateParams, Update, Validation, ValidationRequest,
};
use wiremock::matchers::{any, body_json, body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> PostureClient {
    PostureClient::new(ClientConfig::new("test-token").with_base_url(server.uri())).unwrap()
}

#[tokio::test]
async fn test_get_credential() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posture/v2/credentials/7"))
        .and(header("authorization", "Bearer test-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "7",
            "name": "prod-account",
            "type": "ibm_cloud",
            "enabled": true,
            "purpose": "discovery_fact_collection",
            "created_at": "2024-01-15T09:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let credential = Credential::get(&client, "7".to_string()).await.unwrap();

    assert_eq!(credential.name, "prod-account");
    assert_eq!(credential.credential_type, CredentialType::IbmCloud);
    assert!(credential.is_cloud());
    assert!(credential.created_at.is_some());
}

#[tokio::test]
async fn test_account_id_sent_as_query_parameter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posture/v2/profiles/48"))
        .and(query_param("account_id", "acct-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "48",
            "name": "CIS Benchmark",
            "type": "predefined"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = ClientConfig::new("test-token")
        .with_base_url(server.uri())
        .with_account_id("acct-1");
    let client = PostureClient::new(config).unwrap();

    let profile = postureapi::Profile::get(&client, "48".to_string())
        .await
        .unwrap();
    assert!(profile.is_predefined());
}

#[tokio::test]
async fn test_create_credential_posts_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/posture/v2/credentials"))
        .and(body_json(serde_json::json!({
            "name": "aws-audit",
            "type": "aws_cloud",
            "enabled": true
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": "101",
            "name": "aws-audit",
            "type": "aws_cloud",
            "enabled": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let params = CredentialCreateParams {
        name: "aws-audit".to_string(),
        credential_type: CredentialType::AwsCloud,
        enabled: true,
        description: None,
        purpose: None,
        display_fields: None,
    };

    let created = Credential::create(&client, params).await.unwrap();
    assert_eq!(created.id, "101");
}

#[tokio::test]
async fn test_create_scope() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/posture/v2/scopes"))
        .and(body_partial_json(serde_json::json!({
            "name": "Production",
            "credential_id": "1",
            "credential_type": "ibm",
            "collector_ids": ["11"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
            "id": "21",
            "name": "Production",
            "credential_id": "1",
            "credential_type": "ibm",
            "collector_ids": ["11"]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let params = ScopeCreateParams {
        name: "Production".to_string(),
        description: None,
        collector_ids: vec!["11".to_string()],
        credential_id: "1".to_string(),
        credential_type: EnvironmentType::Ibm,
    };

    let scope = Scope::create(&client, params).await.unwrap();
    assert_eq!(scope.id, "21");
    assert_eq!(scope.credential_type, Some(EnvironmentType::Ibm));
}

#[tokio::test]
async fn test_update_collector_sends_only_set_fields() {
    let server = MockServer::start().await;

    Mock::given(method("PATCH"))
        .and(path("/posture/v2/collectors/11"))
        .and(body_json(serde_json::json!({ "display_name": "East" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "11",
            "name": "collector-east",
            "display_name": "East",
            "status": "active",
            "enabled": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let params = CollectorUpdateParams {
        display_name: Some("East".to_string()),
        ..Default::default()
    };

    let collector = Collector::update(&client, "11".to_string(), params)
        .await
        .unwrap();
    assert_eq!(collector.label(), "East");
    assert!(collector.is_active());
}

#[tokio::test]
async fn test_delete_scope() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/posture/v2/scopes/21"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    Scope::delete(&client, "21".to_string()).await.unwrap();
}

#[tokio::test]
async fn test_get_scan_summary() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posture/v2/scans/validations/262/summary"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "scan_id": "262",
            "scope_id": "3",
            "profile_id": "48",
            "status": "completed",
            "result": {
                "controls_pass_count": 9,
                "controls_fail_count": 1,
                "controls_total_count": 10
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let summary = ScanSummary::get(&client, "262".to_string()).await.unwrap();

    assert!(summary.is_finished());
    let rate = summary.result.unwrap().controls_pass_rate().unwrap();
    assert!((rate - 90.0).abs() < f64::EPSILON);
}

#[tokio::test]
async fn test_create_validation() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/posture/v2/scans/validations"))
        .and(body_json(serde_json::json!({ "scope_id": "3", "profile_id": "48" })))
        .respond_with(ResponseTemplate::new(202).set_body_json(serde_json::json!({
            "result": true,
            "message": "Validation scan queued"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let validation = Validation::create(&client, ValidationRequest::new("3", "48"))
        .await
        .unwrap();

    assert!(validation.result);
}

#[tokio::test]
async fn test_error_message_from_errors_envelope() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posture/v2/credentials/missing"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "errors": [{ "code": "not_found", "message": "Credential not found" }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = Credential::get(&client, "missing".to_string())
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.status_code(), Some(404));
    assert!(err.to_string().contains("Credential not found"));
}

#[tokio::test]
async fn test_rate_limit_reports_retry_after() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posture/v2/profiles/1"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "30"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = postureapi::Profile::get(&client, "1".to_string())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        PostureError::RateLimited {
            retry_after_secs: Some(30)
        }
    ));
}

#[tokio::test]
async fn test_malformed_body_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posture/v2/scopes/1"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = Scope::get(&client, "1".to_string()).await.unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Decode);
}

#[tokio::test]
async fn test_dot_segment_ids_rejected_before_sending() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(204))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);

    for id in ["", ".", ".."] {
        let err = Credential::delete(&client, id.to_string())
            .await
            .unwrap_err();
        assert!(matches!(err, PostureError::InvalidRequest(_)), "id {id:?}");
        assert_eq!(err.kind(), ErrorKind::InvalidRequest);
    }

    let err = Scope::get(&client, "..".to_string()).await.unwrap_err();
    assert!(matches!(err, PostureError::InvalidRequest(_)));

    let err = ScanSummary::get(&client, ".".to_string()).await.unwrap_err();
    assert!(matches!(err, PostureError::InvalidRequest(_)));

    let err = Collector::update(&client, "..".to_string(), CollectorUpdateParams::default())
        .await
        .unwrap_err();
    assert!(matches!(err, PostureError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_account_id_filter_rejected_before_sending() {
    let server = MockServer::start().await;

    Mock::given(any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let config = ClientConfig::new("test-token")
        .with_base_url(server.uri())
        .with_account_id("acct-1");
    let client = PostureClient::new(config).unwrap();

    let request = PageRequest::new().with_filter("account_id", "acct-2");
    let err = Credential::fetch_page(&client, &request)
        .await
        .unwrap_err();

    assert!(matches!(err, PostureError::InvalidRequest(_)));
}
