//! `/news` support: query the remote news search and flatten the answer
//! into one displayable string.
//!
//! Every failure of the remote call is absorbed here. The caller always
//! gets a string back, either the formatted results or a diagnostic.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;

/// Fallback when the search could not be reached at all.
pub const NEWS_UNAVAILABLE: &str = "No can read Watson news";

/// Prefix of the diagnostic for a response with nothing usable in it.
pub const QUERY_PROBLEM: &str = "problem with this query: ";

pub const DEFAULT_NEWS_URL: &str = "https://gateway-a.watsonplatform.net/calls/data/GetNews";
pub const DEFAULT_API_KEY: &str = "YOUR_KEY_HERE";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const WINDOW_START: &str = "now-1d";
const WINDOW_END: &str = "now";
const MAX_RESULTS: u32 = 100;
const RETURN_FIELDS: &str = "enriched.url.title,enriched.url.url";

/// Where the search service lives and how to authenticate with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsEndpoint {
    pub base_url: String,
    pub api_key: String,
}

impl Default for NewsEndpoint {
    fn default() -> Self {
        NewsEndpoint {
            base_url: DEFAULT_NEWS_URL.to_string(),
            api_key: DEFAULT_API_KEY.to_string(),
        }
    }
}

/// A time-windowed, count-bounded search for one company.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewsQuery {
    pub keyword: String,
    pub start: &'static str,
    pub end: &'static str,
    pub count: u32,
}

impl NewsQuery {
    pub fn for_company(keyword: &str) -> Self {
        NewsQuery {
            keyword: keyword.trim().to_string(),
            start: WINDOW_START,
            end: WINDOW_END,
            count: MAX_RESULTS,
        }
    }

    /// Render the exact request URL against `endpoint`.
    pub fn url(&self, endpoint: &NewsEndpoint) -> Result<Url, url::ParseError> {
        let count = self.count.to_string();
        let entity_filter = format!("|text={},type=company|", self.keyword);

        Url::parse_with_params(
            &endpoint.base_url,
            &[
                ("apikey", endpoint.api_key.as_str()),
                ("outputMode", "json"),
                ("start", self.start),
                ("end", self.end),
                ("count", count.as_str()),
                ("q.enriched.url.entities.entity", entity_filter.as_str()),
                ("return", RETURN_FIELDS),
            ],
        )
    }
}

/// Errors from the search capability.
#[derive(Debug, thiserror::Error)]
pub enum NewsError {
    #[error("news request failed: {0}")]
    RequestFailed(String),

    #[error("news service returned status {0}")]
    Status(u16),

    #[error("invalid news response: {0}")]
    InvalidResponse(String),
}

// -----------------------------------------------------------------------------
// Response shape. Every level is optional; the service is not consistent.
// -----------------------------------------------------------------------------

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewsResponse {
    pub result: Option<NewsResult>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewsResult {
    /// `null` entries mark the end of usable results.
    pub docs: Option<Vec<Option<NewsDoc>>>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct NewsDoc {
    pub source: Option<DocSource>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct DocSource {
    pub enriched: Option<Enriched>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct Enriched {
    pub url: Option<EnrichedUrl>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct EnrichedUrl {
    pub title: Option<String>,
    pub url: Option<String>,
}

impl NewsDoc {
    fn enriched_url(&self) -> Option<&EnrichedUrl> {
        self.source.as_ref()?.enriched.as_ref()?.url.as_ref()
    }

    fn title(&self) -> &str {
        self.enriched_url()
            .and_then(|u| u.title.as_deref())
            .unwrap_or("title")
    }

    fn link(&self) -> &str {
        self.enriched_url()
            .and_then(|u| u.url.as_deref())
            .unwrap_or("not available")
    }
}

/// Remote search capability.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NewsSearch: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<NewsResponse, NewsError>;
}

/// Reduce a search response to display lines.
///
/// `query_url` is the request that produced `response`; it is echoed back
/// when the response has no results so the failing query can be inspected.
pub fn summarize(response: &NewsResponse, query_url: &str) -> String {
    let docs = match response.result.as_ref().and_then(|r| r.docs.as_ref()) {
        Some(docs) if !docs.is_empty() => docs,
        _ => return format!("{QUERY_PROBLEM}{query_url}"),
    };

    let mut out = String::new();
    for doc in docs.iter().map_while(Option::as_ref) {
        out.push_str(&format!("[{}]({})  \n", doc.title(), doc.link()));
    }
    out
}

/// Adapter between `/news` and the [`NewsSearch`] capability.
#[derive(Clone)]
pub struct NewsLookup {
    search: Arc<dyn NewsSearch>,
    endpoint: NewsEndpoint,
    timeout: Duration,
}

impl NewsLookup {
    pub fn new(search: Arc<dyn NewsSearch>, endpoint: NewsEndpoint, timeout: Duration) -> Self {
        NewsLookup {
            search,
            endpoint,
            timeout,
        }
    }

    /// Look up recent news for `keyword`. Never fails.
    pub async fn lookup(&self, keyword: &str) -> String {
        let query = NewsQuery::for_company(keyword);

        let url = match query.url(&self.endpoint) {
            Ok(url) => url,
            Err(err) => {
                warn!(base_url = %self.endpoint.base_url, error = %err, "malformed news query");
                return NEWS_UNAVAILABLE.to_string();
            }
        };

        debug!(keyword = %query.keyword, "querying news");

        match tokio::time::timeout(self.timeout, self.search.fetch(&url)).await {
            Ok(Ok(response)) => summarize(&response, url.as_str()),
            Ok(Err(err)) => {
                warn!(error = %err, "news lookup failed");
                NEWS_UNAVAILABLE.to_string()
            }
            Err(_) => {
                warn!(timeout = ?self.timeout, "news lookup timed out");
                NEWS_UNAVAILABLE.to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: serde_json::Value) -> NewsResponse {
        serde_json::from_value(value).unwrap()
    }

    fn lookup_with(mock: MockNewsSearch) -> NewsLookup {
        NewsLookup::new(Arc::new(mock), NewsEndpoint::default(), Duration::from_secs(5))
    }

    #[test]
    fn query_url_carries_all_parameters() {
        let url = NewsQuery::for_company("  ibm \n")
            .url(&NewsEndpoint::default())
            .unwrap();
        let params: Vec<(String, String)> = url.query_pairs().into_owned().collect();

        assert!(url.as_str().starts_with(DEFAULT_NEWS_URL));
        assert!(params.contains(&("apikey".into(), DEFAULT_API_KEY.into())));
        assert!(params.contains(&("outputMode".into(), "json".into())));
        assert!(params.contains(&("start".into(), "now-1d".into())));
        assert!(params.contains(&("end".into(), "now".into())));
        assert!(params.contains(&("count".into(), "100".into())));
        assert!(params.contains(&(
            "q.enriched.url.entities.entity".into(),
            "|text=ibm,type=company|".into()
        )));
        assert!(params.contains(&("return".into(), RETURN_FIELDS.into())));
    }

    #[test]
    fn bad_base_url_is_a_parse_error() {
        let endpoint = NewsEndpoint {
            base_url: "not a url".into(),
            api_key: "k".into(),
        };
        assert!(NewsQuery::for_company("ibm").url(&endpoint).is_err());
    }

    #[test]
    fn summarize_formats_each_doc() {
        let resp = response(json!({
            "result": { "docs": [
                { "source": { "enriched": { "url": { "title": "IBM wins", "url": "http://a" } } } },
                { "source": { "enriched": { "url": { "url": "http://b" } } } },
                { "source": { "enriched": { "url": { "title": "No link" } } } },
            ]}
        }));

        assert_eq!(
            summarize(&resp, "q"),
            "[IBM wins](http://a)  \n[title](http://b)  \n[No link](not available)  \n"
        );
    }

    #[test]
    fn summarize_stops_at_null_entry() {
        let resp = response(json!({
            "result": { "docs": [
                { "source": { "enriched": { "url": { "title": "one", "url": "u1" } } } },
                null,
                { "source": { "enriched": { "url": { "title": "two", "url": "u2" } } } },
            ]}
        }));

        assert_eq!(summarize(&resp, "q"), "[one](u1)  \n");
    }

    #[test]
    fn summarize_reports_query_when_nothing_usable() {
        for value in [json!({}), json!({ "result": {} }), json!({ "result": { "docs": [] } })] {
            let text = summarize(&response(value), "http://x/?q=1");
            assert_eq!(text, "problem with this query: http://x/?q=1");
        }
    }

    #[tokio::test]
    async fn lookup_formats_successful_response() {
        let mut mock = MockNewsSearch::new();
        mock.expect_fetch()
            .withf(|url| url.as_str().contains("ibm"))
            .times(1)
            .returning(|_| {
                Ok(response(json!({
                    "result": { "docs": [
                        { "source": { "enriched": { "url": { "title": "t", "url": "u" } } } }
                    ]}
                })))
            });

        assert_eq!(lookup_with(mock).lookup(" ibm ").await, "[t](u)  \n");
    }

    #[tokio::test]
    async fn lookup_empty_docs_includes_query_url() {
        let mut mock = MockNewsSearch::new();
        mock.expect_fetch()
            .returning(|_| Ok(response(json!({ "result": { "docs": [] } }))));

        let text = lookup_with(mock).lookup("ibm").await;
        assert!(text.starts_with("problem with this query: "));
        assert!(text.contains(DEFAULT_NEWS_URL));
    }

    #[tokio::test]
    async fn lookup_failure_falls_back() {
        let mut mock = MockNewsSearch::new();
        mock.expect_fetch()
            .returning(|_| Err(NewsError::RequestFailed("connection refused".into())));

        assert_eq!(lookup_with(mock).lookup("ibm").await, NEWS_UNAVAILABLE);
    }

    #[tokio::test]
    async fn lookup_malformed_endpoint_never_calls_search() {
        let mut mock = MockNewsSearch::new();
        mock.expect_fetch().times(0);
        let lookup = NewsLookup::new(
            Arc::new(mock),
            NewsEndpoint {
                base_url: "::nope".into(),
                api_key: "k".into(),
            },
            Duration::from_secs(1),
        );

        assert_eq!(lookup.lookup("ibm").await, NEWS_UNAVAILABLE);
    }

    struct Stalled;

    #[async_trait]
    impl NewsSearch for Stalled {
        async fn fetch(&self, _url: &Url) -> Result<NewsResponse, NewsError> {
            std::future::pending().await
        }
    }

    #[tokio::test(start_paused = true)]
    async fn lookup_times_out() {
        let lookup = NewsLookup::new(
            Arc::new(Stalled),
            NewsEndpoint::default(),
            Duration::from_millis(50),
        );

        assert_eq!(lookup.lookup("ibm").await, NEWS_UNAVAILABLE);
    }
}
