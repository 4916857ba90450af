//! HTTP contract tests for the OpenSearch provider.
//!
//! A wiremock server stands in for the search engine so the requests the
//! provider sends, and its handling of responses, can be checked offline.

use around_repository::{IndexConfig, OpenSearchProvider, SearchIndexError, SearchIndexProvider};
use around_shared::{Coordinate, Distance, GeoQuery, IndexedPost, Post};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn provider_for(server: &MockServer) -> OpenSearchProvider {
    OpenSearchProvider::new(&server.uri(), IndexConfig::new("around", 25))
        .await
        .expect("provider")
}

fn sample_post() -> Post {
    Post::new("jack", "hello", Coordinate::new(37.0, -118.0).unwrap())
}

#[tokio::test]
async fn test_ensure_index_creates_geo_mapping_once() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/around"))
        .respond_with(ResponseTemplate::new(404))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("HEAD"))
        .and(path("/around"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/around"))
        .and(body_partial_json(json!({
            "mappings": { "properties": { "location": { "type": "geo_point" } } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "acknowledged": true })))
        .expect(1)
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;

    provider.ensure_index_exists().await.unwrap();
    provider.ensure_index_exists().await.unwrap();
}

#[tokio::test]
async fn test_ensure_index_tolerates_concurrent_creation() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/around"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/around"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "type": "resource_already_exists_exception", "reason": "index [around] already exists" },
            "status": 400
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    provider.ensure_index_exists().await.unwrap();
}

#[tokio::test]
async fn test_index_document_refreshes_and_reports_rejection() {
    let server = MockServer::start().await;

    Mock::given(path("/around/_doc/post-1"))
        .and(query_param("refresh", "true"))
        .and(body_partial_json(json!({
            "user": "jack",
            "message": "hello",
            "location": { "lat": 37.0, "lon": -118.0 },
            "url": ""
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "result": "created" })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(path("/around/_doc/post-2"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "type": "mapper_parsing_exception" }
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;

    provider
        .index_document(&IndexedPost::new("post-1", sample_post()))
        .await
        .unwrap();

    let rejected = provider
        .index_document(&IndexedPost::new("post-2", sample_post()))
        .await;
    assert!(matches!(rejected, Err(SearchIndexError::IndexError(_))));
}

#[tokio::test]
async fn test_geo_search_decodes_hits_and_skips_bad_ones() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/around/_search"))
        .and(body_partial_json(json!({
            "size": 25,
            "query": { "bool": { "filter": { "geo_distance": {
                "distance": "10km",
                "location": { "lat": 37.0, "lon": -118.0 }
            } } } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "took": 4,
            "hits": {
                "total": { "value": 2, "relation": "eq" },
                "hits": [
                    { "_id": "post-1", "_source": {
                        "user": "jack", "message": "hello",
                        "location": { "lat": 37.0, "lon": -118.0 }, "url": ""
                    } },
                    { "_id": "legacy", "_source": { "location": "not a point" } }
                ]
            }
        })))
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let query = GeoQuery::new(
        Coordinate::new(37.0, -118.0).unwrap(),
        Distance::km(10.0).unwrap(),
    );

    let result = provider.geo_search(&query).await.unwrap();

    assert_eq!(result.posts, vec![sample_post()]);
    assert_eq!(result.skipped, 1);
    assert_eq!(result.total_hits, 2);
    assert_eq!(result.took_ms, 4);
}

#[tokio::test]
async fn test_geo_search_classifies_failures() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/around/_search"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": { "type": "parsing_exception" }
        })))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/around/_search"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    let query = GeoQuery::with_default_radius(Coordinate::new(0.0, 0.0).unwrap());

    assert!(matches!(
        provider.geo_search(&query).await,
        Err(SearchIndexError::QueryError(_))
    ));
    assert!(matches!(
        provider.geo_search(&query).await,
        Err(SearchIndexError::SearchError(_))
    ));
}

#[tokio::test]
async fn test_ping_reports_cluster_health() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let provider = provider_for(&server).await;
    provider.ping().await.unwrap();
}

#[tokio::test]
async fn test_unreachable_engine_is_connection_error() {
    let provider = OpenSearchProvider::new("http://127.0.0.1:1", IndexConfig::default())
        .await
        .unwrap();

    assert!(matches!(
        provider.ping().await,
        Err(SearchIndexError::ConnectionError(_))
    ));

    let result = provider.ensure_index_exists().await;

    match result {
        Err(err @ SearchIndexError::ConnectionError(_)) => assert!(err.is_unavailable()),
        other => panic!("expected connection error, got {:?}", other),
    }
}
