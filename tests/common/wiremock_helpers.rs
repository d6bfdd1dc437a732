use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a mock web server that serves HTML content at the root path.
///
/// Useful for testing page fetching and candidate extraction end to end.
pub async fn mock_html_page(html: &str) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(html.to_string(), "text/html; charset=utf-8"),
        )
        .mount(&server)
        .await;

    server
}

/// Creates a mock server that serves a non-HTML content type at the root.
pub async fn mock_non_html_page(body: &str, content_type: &str) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(body.to_string(), content_type),
        )
        .mount(&server)
        .await;

    server
}

/// Creates a mock enrichment API that returns a company record for lookups
/// with the given `domain` query parameter.
///
/// The response body mirrors the remote service's wire format, not our
/// normalized `CompanyFacts`.
pub async fn mock_enrichment_server(domain: &str, record: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/companies/lookup"))
        .and(query_param("domain", domain))
        .respond_with(ResponseTemplate::new(200).set_body_json(record))
        .mount(&server)
        .await;

    server
}

/// Creates a mock enrichment API matching a name-based lookup.
pub async fn mock_enrichment_by_name(name: &str, record: serde_json::Value) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/companies/lookup"))
        .and(query_param("name", name))
        .respond_with(ResponseTemplate::new(200).set_body_json(record))
        .mount(&server)
        .await;

    server
}

/// Creates a mock HTTP server that returns the specified HTTP error status
/// for every request.
pub async fn mock_error_server(status_code: u16) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(status_code))
        .mount(&server)
        .await;

    server
}

/// Creates a mock HTTP server that delays responses to simulate network
/// timeouts.
pub async fn mock_timeout_server(delay_ms: u64) -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw("delayed response", "text/html")
                .set_delay(Duration::from_millis(delay_ms)),
        )
        .mount(&server)
        .await;

    server
}
