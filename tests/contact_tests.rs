use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use ccl_prep_client::config::ClientOptions;
use ccl_prep_client::notify::{MemorySink, NotificationSink, Severity};
use ccl_prep_client::resources::ContactClient;
use ccl_prep_client::CclPrep;

fn message(id: i64, subject: &str) -> serde_json::Value {
    json!({
        "id": id,
        "firstName": "Asha",
        "lastName": "Rai",
        "email": "asha@example.com",
        "phoneNumber": "0400000000",
        "subject": subject,
        "message": "Hello there",
        "createdAt": "2026-08-01T10:00:00Z"
    })
}

fn page_body(ids: &[i64], total: i64) -> serde_json::Value {
    let messages: Vec<_> = ids.iter().map(|id| message(*id, "Enquiry")).collect();
    json!({ "success": true, "data": { "messages": messages, "total": total } })
}

#[tokio::test]
async fn pages_with_same_search_are_independent_cache_entries() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/contact"))
        .and(query_param("page", "1"))
        .and(query_param("search", "foo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[1, 2], 4)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/contact"))
        .and(query_param("page", "2"))
        .and(query_param("search", "foo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[3, 4], 4)))
        .expect(1)
        .mount(&mock_server)
        .await;

    let client = CclPrep::new(&mock_server.uri());

    let page1 = client.contact().page(1, Some("foo")).await.unwrap();
    let page2 = client.contact().page(2, Some("foo")).await.unwrap();
    assert_eq!(page1.messages[0].id, 1);
    assert_eq!(page2.messages[0].id, 3);

    // Both entries coexist; re-reading either hits the cache.
    let again = client.contact().page(1, Some("foo")).await.unwrap();
    assert_eq!(again.messages.len(), 2);
}

#[tokio::test]
async fn optimistic_delete_removes_row_before_refetch_and_notifies() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/contact"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[1, 2, 3], 3)))
        .expect(1)
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/contact/2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Message deleted"
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let sink = MemorySink::new();
    let client = CclPrep::new_with_sink(
        &mock_server.uri(),
        ClientOptions::default(),
        sink.clone() as Arc<dyn NotificationSink>,
    );

    client.contact().page(1, None).await.unwrap();
    client.contact().delete(2, 1, None).await.unwrap();

    let cached: ccl_prep_client::models::ContactPage = client
        .cache()
        .read_as(&ContactClient::page_key(1, None))
        .unwrap();
    assert_eq!(cached.messages.len(), 2);
    assert!(cached.messages.iter().all(|msg| msg.id != 2));
    assert_eq!(cached.total, 2);

    let notes = sink.drain();
    assert!(notes
        .iter()
        .any(|note| note.severity == Severity::Success && note.message == "Message deleted"));
}

#[tokio::test]
async fn failed_delete_restores_the_page_snapshot_exactly() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/contact"))
        .and(query_param("page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(&[1, 2, 3], 3)))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/contact/2"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "message": "Could not delete message"
        })))
        .mount(&mock_server)
        .await;

    let sink = MemorySink::new();
    let client = CclPrep::new_with_sink(
        &mock_server.uri(),
        ClientOptions::default(),
        sink.clone() as Arc<dyn NotificationSink>,
    );

    client.contact().page(1, None).await.unwrap();
    let before = client
        .cache()
        .read(&ContactClient::page_key(1, None))
        .unwrap()
        .value;

    let err = client.contact().delete(2, 1, None).await.unwrap_err();
    assert_eq!(err.user_message(), "Could not delete message");

    let after = client
        .cache()
        .read(&ContactClient::page_key(1, None))
        .unwrap()
        .value;
    assert_eq!(after, before);

    let notes = sink.drain();
    assert!(notes
        .iter()
        .any(|note| note.severity == Severity::Error
            && note.message == "Could not delete message"));
}

#[tokio::test]
async fn detail_read_unwraps_the_message_object() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/contact/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "message": message(7, "Pricing question") }
        })))
        .mount(&mock_server)
        .await;

    let client = CclPrep::new(&mock_server.uri());
    let msg = client.contact().get(7).await.unwrap();
    assert_eq!(msg.id, 7);
    assert_eq!(msg.subject, "Pricing question");
}
