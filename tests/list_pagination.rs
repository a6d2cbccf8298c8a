//! Pagination behaviour of list operations against a wiremock server.

use postureapi::{
    ClientConfig, Credential, List, PageRequest, Paginator, PostureClient, ScanSummary,
};
use wiremock::matchers::{header, method, path, query_param, query_param_is_missing};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CREDENTIALS: &str = "/posture/v2/credentials";

fn client_for(server: &MockServer) -> PostureClient {
    PostureClient::new(ClientConfig::new("test-token").with_base_url(server.uri())).unwrap()
}

fn credential(id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "name": format!("credential-{id}"),
        "type": "ibm_cloud",
        "enabled": true
    })
}

/// A credentials envelope; `next` is the offset of the following page.
fn credential_page(ids: &[&str], offset: u64, next: Option<u64>) -> serde_json::Value {
    let mut body = serde_json::json!({
        "offset": offset,
        "limit": 1,
        "total_count": 3,
        "first": { "href": "https://api.example.com/posture/v2/credentials?offset=0&limit=1" },
        "credentials": ids.iter().map(|id| credential(id)).collect::<Vec<_>>()
    });
    if let Some(next) = next {
        body["next"] = serde_json::json!({
            "href": format!("https://api.example.com/posture/v2/credentials?limit=1&offset={next}")
        });
    }
    body
}

/// Mount the `[A, B, C]` backing set served one item per page.
async fn mount_three_pages(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(CREDENTIALS))
        .and(query_param("limit", "1"))
        .and(query_param_is_missing("offset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(credential_page(&["A"], 0, Some(1))))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(CREDENTIALS))
        .and(query_param("limit", "1"))
        .and(query_param("offset", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(credential_page(&["B"], 1, Some(2))))
        .expect(1)
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(CREDENTIALS))
        .and(query_param("limit", "1"))
        .and(query_param("offset", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(credential_page(&["C"], 2, None)))
        .expect(1)
        .mount(server)
        .await;
}

fn ids(credentials: &[Credential]) -> Vec<&str> {
    credentials.iter().map(|c| c.id.as_str()).collect()
}

#[tokio::test]
async fn test_pages_of_one_follow_next_links() {
    let server = MockServer::start().await;
    mount_three_pages(&server).await;
    let client = client_for(&server);

    let mut paginator = Credential::paginate(&client, PageRequest::new().with_limit(1));

    let first = paginator.next_page().await.unwrap().unwrap();
    assert_eq!(ids(&first.items), vec!["A"]);
    assert_eq!(first.next_offset, Some(1));

    let second = paginator.next_page().await.unwrap().unwrap();
    assert_eq!(ids(&second.items), vec!["B"]);
    assert_eq!(second.next_offset, Some(2));

    let third = paginator.next_page().await.unwrap().unwrap();
    assert_eq!(ids(&third.items), vec!["C"]);
    assert_eq!(third.next_offset, None);

    assert!(paginator.next_page().await.unwrap().is_none());
    assert!(paginator.is_done());
    assert_eq!(paginator.resume_offset(), None);
}

#[tokio::test]
async fn test_list_all_concatenates_pages_in_order() {
    let server = MockServer::start().await;
    mount_three_pages(&server).await;
    let client = client_for(&server);

    let all = Credential::list_all(&client, PageRequest::new().with_limit(1))
        .await
        .unwrap();

    assert_eq!(ids(&all), vec!["A", "B", "C"]);
}

/// Mount an empty credentials collection answering exactly one request.
async fn mount_empty_collection(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path(CREDENTIALS))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "offset": 0,
            "limit": 50,
            "total_count": 0,
            "credentials": []
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_empty_collection_yields_single_empty_page() {
    let server = MockServer::start().await;
    mount_empty_collection(&server).await;
    let client = client_for(&server);

    let page = Credential::fetch_page(&client, &PageRequest::new())
        .await
        .unwrap();

    assert!(page.is_empty());
    assert!(!page.has_more());
}

#[tokio::test]
async fn test_list_all_over_empty_collection_sends_one_request() {
    let server = MockServer::start().await;
    mount_empty_collection(&server).await;
    let client = client_for(&server);

    let all = Credential::list_all(&client, PageRequest::new()).await.unwrap();

    assert!(all.is_empty());
}

#[tokio::test]
async fn test_empty_page_with_next_link_ends_iteration() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CREDENTIALS))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "credentials": [],
            "next": { "href": "/posture/v2/credentials?offset=50" }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let all = Credential::list_all(&client, PageRequest::new()).await.unwrap();

    assert!(all.is_empty());
}

#[tokio::test]
async fn test_non_numeric_cursor_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CREDENTIALS))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "credentials": [credential("A")],
            "next": { "href": "/posture/v2/credentials?offset=abc" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = Credential::fetch_page(&client, &PageRequest::new())
        .await
        .unwrap_err();

    assert!(err.is_decode(), "expected decode error, got {err:?}");
}

#[tokio::test]
async fn test_missing_items_key_is_decode_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CREDENTIALS))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "offset": 0,
            "limit": 50
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = Credential::fetch_page(&client, &PageRequest::new())
        .await
        .unwrap_err();

    assert!(err.is_decode());
}

#[tokio::test]
async fn test_filters_and_limit_sent_on_every_page() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CREDENTIALS))
        .and(query_param("name", "prod"))
        .and(query_param("limit", "1"))
        .and(header("authorization", "Bearer test-token"))
        .and(query_param_is_missing("offset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(credential_page(&["A"], 0, Some(1))))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(CREDENTIALS))
        .and(query_param("name", "prod"))
        .and(query_param("limit", "1"))
        .and(header("authorization", "Bearer test-token"))
        .and(query_param("offset", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(credential_page(&["B"], 1, None)))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = PageRequest::new().with_limit(1).with_filter("name", "prod");
    let all = Credential::list_all(&client, request).await.unwrap();

    assert_eq!(ids(&all), vec!["A", "B"]);
}

#[tokio::test]
async fn test_failure_mid_drain_returns_error_and_no_items() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CREDENTIALS))
        .and(query_param_is_missing("offset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(credential_page(&["A"], 0, Some(1))))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path(CREDENTIALS))
        .and(query_param("offset", "1"))
        .respond_with(ResponseTemplate::new(500).set_body_json(serde_json::json!({
            "errors": [{ "code": "internal_error", "message": "backend unavailable" }]
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);

    let err = Credential::list_all(&client, PageRequest::new().with_limit(1))
        .await
        .unwrap_err();
    assert!(err.is_transport());
    assert_eq!(err.status_code(), Some(500));
    assert!(err.to_string().contains("backend unavailable"));

    // A paginator driven by hand reports where to resume.
    let mut paginator: Paginator<'_, Credential> =
        Paginator::new(&client, PageRequest::new().with_limit(1));
    assert!(paginator.next_page().await.unwrap().is_some());
    assert!(paginator.next_page().await.is_err());
    assert!(paginator.is_done());
    assert_eq!(paginator.resume_offset(), Some(1));
}

#[tokio::test]
async fn test_non_advancing_cursor_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path(CREDENTIALS))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "credentials": [credential("A")],
            "next": { "href": "/posture/v2/credentials?offset=0&limit=1" }
        })))
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = Credential::list_all(&client, PageRequest::new().with_limit(1))
        .await
        .unwrap_err();

    assert!(err.is_decode());
}

#[tokio::test]
async fn test_zero_limit_rejected_before_sending() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let err = Credential::fetch_page(&client, &PageRequest::new().with_limit(0))
        .await
        .unwrap_err();

    assert!(matches!(err, postureapi::PostureError::InvalidRequest(_)));
}

#[tokio::test]
async fn test_summaries_follow_start_token() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posture/v2/scans/validations/summaries"))
        .and(query_param("scope_id", "3"))
        .and(query_param_is_missing("offset"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "limit": 1,
            "summaries": [{ "scan_id": "262", "status": "completed" }],
            "next": {
                "href": "/posture/v2/scans/validations/summaries?scope_id=3&start=1",
                "start": "1"
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/posture/v2/scans/validations/summaries"))
        .and(query_param("scope_id", "3"))
        .and(query_param("offset", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "limit": 1,
            "summaries": [{ "scan_id": "263", "status": "in_progress" }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server);
    let request = PageRequest::new().with_limit(1).with_filter("scope_id", "3");
    let summaries = ScanSummary::list_all(&client, request).await.unwrap();

    let scan_ids: Vec<&str> = summaries.iter().map(|s| s.scan_id.as_str()).collect();
    assert_eq!(scan_ids, vec!["262", "263"]);
    assert!(summaries[0].is_finished());
    assert!(!summaries[1].is_finished());
}
