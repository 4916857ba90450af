//! Utility functions for decoding search engine responses.

use around_shared::Post;
use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

use crate::errors::SearchIndexError;
use crate::types::GeoSearchResult;

#[derive(Debug, Deserialize)]
struct SearchResponseBody {
    #[serde(default)]
    took: u64,
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    total: Option<TotalHits>,
    #[serde(default)]
    hits: Vec<RawHit>,
}

/// Older engines report `total` as a bare number, newer ones as an object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TotalHits {
    Count(u64),
    Object { value: u64 },
}

impl TotalHits {
    fn value(&self) -> u64 {
        match self {
            TotalHits::Count(value) | TotalHits::Object { value } => *value,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_id", default)]
    id: Option<String>,
    #[serde(rename = "_source", default)]
    source: Option<Value>,
}

/// Decode a search response body into posts.
///
/// The envelope (`took`, `hits`) must be well formed, otherwise the whole
/// response is rejected with a parse error. Individual hits whose `_source`
/// does not decode as a [`Post`] are logged and skipped.
///
/// # Returns
///
/// * `Ok(GeoSearchResult)` - Posts in hit order with totals and skip count
/// * `Err(SearchIndexError)` - If the envelope cannot be parsed
pub fn parse_search_response(body: Value) -> Result<GeoSearchResult, SearchIndexError> {
    let response: SearchResponseBody = serde_json::from_value(body)
        .map_err(|e| SearchIndexError::parse(format!("Malformed search response: {}", e)))?;

    let mut posts = Vec::with_capacity(response.hits.hits.len());
    let mut skipped = 0;

    for hit in response.hits.hits {
        let doc_id = hit.id.unwrap_or_default();
        let Some(source) = hit.source else {
            warn!(doc_id = %doc_id, "Skipping search hit without _source");
            skipped += 1;
            continue;
        };

        match serde_json::from_value::<Post>(source) {
            Ok(post) => posts.push(post),
            Err(e) => {
                warn!(
                    doc_id = %doc_id,
                    error = %e,
                    "Skipping search hit that failed to deserialize"
                );
                skipped += 1;
            }
        }
    }

    let total_hits = response
        .hits
        .total
        .map(|total| total.value())
        .unwrap_or((posts.len() + skipped) as u64);

    Ok(GeoSearchResult {
        posts,
        total_hits,
        took_ms: response.took,
        skipped,
    })
}
