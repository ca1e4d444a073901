//! HTTP API tests: the router is driven in-process with `oneshot`, upstreams are wiremock.

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use paperai::config::Config;
use paperai::server::{AppState, PaperAiServer};

const BOUNDARY: &str = "paperai-test-boundary";

fn router_with(config: &Config) -> Router {
    PaperAiServer::from_state(AppState::new(config).unwrap()).router()
}

fn router(server: &MockServer) -> Router {
    router_with(&Config::for_testing(&server.uri()))
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn upload(name: &str, mime: &str, content: &str) -> Request<Body> {
    let body = format!(
        "--{BOUNDARY}\r\n\
         Content-Disposition: form-data; name=\"file\"; filename=\"{name}\"\r\n\
         Content-Type: {mime}\r\n\r\n\
         {content}\r\n\
         --{BOUNDARY}--\r\n"
    );
    Request::builder()
        .method("POST")
        .uri("/api/files/upload")
        .header("content-type", format!("multipart/form-data; boundary={BOUNDARY}"))
        .body(Body::from(body))
        .unwrap()
}

fn completion(content: &str) -> Value {
    json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_root_and_health() {
    let server = MockServer::start().await;

    let (status, body) = send(router(&server), get("/")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "PaperAI API is running");

    let (status, body) = send(router(&server), get("/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["chatConfigured"], true);
}

// =============================================================================
// Search
// =============================================================================

#[tokio::test]
async fn test_search_endpoint_filters_by_type() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .and(query_param("sort", "year:desc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 900,
            "offset": 0,
            "next": 2,
            "data": [
                {"paperId": "1", "title": "A", "publicationTypes": ["Review"]},
                {"paperId": "2", "title": "B", "publicationTypes": ["JournalArticle"]}
            ]
        })))
        .mount(&server)
        .await;

    let (status, body) =
        send(router(&server), get("/api/semantic/search?query=mapping&sortBy=year&type=review")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["data"][0]["paperId"], "1");
    assert_eq!(body["next"], 2);
}

#[tokio::test]
async fn test_search_total_without_type_is_page_length() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 900,
            "offset": 20,
            "next": 22,
            "data": [{"paperId": "1", "title": "A"}, {"paperId": "2", "title": "B"}]
        })))
        .mount(&server)
        .await;

    let (status, body) = send(router(&server), get("/api/semantic/search?query=mapping&offset=20")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 2);
    assert_eq!(body["offset"], 20);
    assert_eq!(body["next"], 22);

    let (_, body) = send(router(&server), get("/api/semantic/search?query=mapping&type=all")).await;
    assert_eq!(body["total"], 900);
}

#[tokio::test]
async fn test_search_validation_happens_before_network() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"total": 0, "data": []})))
        .expect(0)
        .mount(&server)
        .await;

    let (status, body) = send(router(&server), get("/api/semantic/search?query=%20%20")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("query"));

    let (status, _) = send(router(&server), get("/api/semantic/search?query=x&limit=0")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(router(&server), get("/api/semantic/search?query=x&sortBy=hype")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) =
        send(router(&server), get("/api/semantic/search?query=x&yearMin=2022&yearMax=2020")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_search_rate_limit_maps_to_429() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .respond_with(ResponseTemplate::new(429))
        .mount(&server)
        .await;

    let (status, body) = send(router(&server), get("/api/semantic/search?query=x")).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert!(body["error"].as_str().unwrap().contains("Rate limit"));
    assert!(body["details"].as_str().unwrap().contains("60s"));
}

#[tokio::test]
async fn test_search_upstream_failure_maps_to_500() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/search"))
        .respond_with(ResponseTemplate::new(503).set_body_string("maintenance"))
        .mount(&server)
        .await;

    let (status, body) = send(router(&server), get("/api/semantic/search?query=x")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Failed to fetch data from Semantic Scholar");
    assert!(body["details"].as_str().unwrap().contains("maintenance"));
}

#[tokio::test]
async fn test_paper_detail_endpoint() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/graph/v1/paper/xyz"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "paperId": "xyz",
            "title": "Science mapping",
            "references": [{"paperId": "r1", "title": "Ref"}]
        })))
        .mount(&server)
        .await;

    let (status, body) = send(router(&server), get("/api/semantic/paper/xyz")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["references"][0]["paperId"], "r1");
}

// =============================================================================
// Files
// =============================================================================

#[tokio::test]
async fn test_file_crud() {
    let server = MockServer::start().await;
    let app = router(&server);

    let (status, body) = send(app.clone(), upload("notes.txt", "text/plain", "Co-word analysis")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["file"]["originalName"], "notes.txt");
    assert_eq!(body["file"]["content"], "Co-word analysis");
    let id = body["file"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(app.clone(), get("/api/files")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().unwrap().len(), 1);
    assert!(body[0].get("content").is_none());

    let (status, body) = send(app.clone(), get(&format!("/api/files/{id}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["mimeType"], "text/plain");

    let delete = Request::builder().method("DELETE").uri(format!("/api/files/{id}")).body(Body::empty()).unwrap();
    let (status, body) = send(app.clone(), delete).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "File deleted successfully");

    let (status, _) = send(app.clone(), get(&format!("/api/files/{id}"))).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(app, get("/api/files/not-a-uuid")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_upload_rejections() {
    let server = MockServer::start().await;
    let mut config = Config::for_testing(&server.uri());
    config.max_upload_bytes = 8;
    let app = router_with(&config);

    let (status, _) = send(app.clone(), upload("big.txt", "text/plain", "more than eight bytes")).await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);

    let (status, _) = send(app.clone(), upload("pic.png", "image/png", "png")).await;
    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);

    let (status, _) = send(app.clone(), upload("empty.txt", "text/plain", "")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(app.clone(), upload("broken.pdf", "application/pdf", "not pdf")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (_, body) = send(app, get("/api/files")).await;
    assert_eq!(body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_upload_above_default_body_limit() {
    let server = MockServer::start().await;
    let content = "a".repeat(3 * 1024 * 1024);

    let (status, body) = send(router(&server), upload("large.txt", "text/plain", &content)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["file"]["size"], content.len());
}

// =============================================================================
// Chat and analysis
// =============================================================================

#[tokio::test]
async fn test_chat_sends_file_context_with_server_key() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-chat-key"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "messages": [
                {"role": "system", "content": "--- notes.txt ---\nCo-word analysis"},
                {"role": "user", "content": "What method is used?"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("Co-word analysis.")))
        .expect(1)
        .mount(&server)
        .await;

    let app = router(&server);
    send(app.clone(), upload("notes.txt", "text/plain", "Co-word analysis")).await;

    let (status, body) = send(
        app,
        post_json("/api/chat", &json!({"messages": [], "question": "What method is used?"})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"]["content"], "Co-word analysis.");
    assert_eq!(body["reply"]["status"], "ready");
    assert_eq!(body["transcript"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_chat_failure_is_reported_in_transcript() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(json!({"error": {"message": "model overloaded"}})),
        )
        .mount(&server)
        .await;

    let (status, body) = send(
        router(&server),
        post_json(
            "/api/chat",
            &json!({
                "messages": [
                    {"role": "user", "content": "Hi"},
                    {"role": "assistant", "content": "Hello"}
                ],
                "question": "Summarize"
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["reply"]["status"], "error");
    assert_eq!(body["reply"]["content"], "model overloaded");
    assert_eq!(body["transcript"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn test_chat_blank_question_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    let (status, _) =
        send(router(&server), post_json("/api/chat", &json!({"messages": [], "question": " "}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_analysis_summary_strips_asterisks() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("**Objective**: mapping")))
        .mount(&server)
        .await;

    let (status, body) = send(
        router(&server),
        post_json("/api/analysis/summary", &json!({"text": "A paper about science mapping."})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["kind"], "summary");
    assert_eq!(body["result"], "Objective: mapping");
}

#[tokio::test]
async fn test_analysis_rejects_unknown_kind_and_missing_input() {
    let server = MockServer::start().await;
    let app = router(&server);

    let (status, _) = send(app.clone(), post_json("/api/analysis/poetry", &json!({"text": "x"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(app.clone(), post_json("/api/analysis/keywords", &json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        app,
        post_json("/api/analysis/keywords", &json!({"fileId": "00000000-0000-0000-0000-000000000000"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_chat_rate_limit_is_reported_with_detail() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({"error": "quota exceeded"})))
        .mount(&server)
        .await;

    let (status, body) =
        send(router(&server), post_json("/api/analysis/analysis", &json!({"text": "x"}))).await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["details"], "quota exceeded");
}

// =============================================================================
// Graphs
// =============================================================================

fn graph_papers() -> Value {
    json!([
        {"id": "1", "title": "Science mapping software tools", "authors": ["M. J. Cobo", "E. Herrera-Viedma"], "year": 2011, "citations": 2072},
        {"id": "2", "title": "SciMAT: A new science mapping analysis software tool", "authors": ["M.  J. Cobo"], "year": 2012, "citations": 450},
        {"title": "Missing id", "authors": [], "year": 2015, "citations": 10}
    ])
}

#[tokio::test]
async fn test_connected_graph_scene() {
    let server = MockServer::start().await;

    let (status, body) = send(
        router(&server),
        post_json(
            "/api/graph/connected",
            &json!({
                "papers": graph_papers(),
                "connections": [
                    {"source": "1", "target": "2", "weight": 0.8},
                    {"source": "1", "target": "ghost", "weight": 0.5}
                ]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let nodes = body["nodes"].as_array().unwrap();
    assert_eq!(nodes.len(), 2);
    assert_eq!(body["edges"].as_array().unwrap().len(), 1);
    assert_eq!(nodes[0]["size"], 80.0);
    assert_eq!(nodes[1]["size"], 45.0);
    assert_eq!(nodes[0]["color"], "hsl(200, 80%, 75%)");
    for node in nodes {
        assert!(node["x"].as_f64().unwrap() >= 30.0);
        assert!(node["y"].as_f64().unwrap() >= 30.0);
    }
}

#[tokio::test]
async fn test_knowledge_graph_scene() {
    let server = MockServer::start().await;

    let (status, body) = send(
        router(&server),
        post_json(
            "/api/graph/knowledge",
            &json!({
                "papers": graph_papers(),
                "topics": [{"name": "Science Mapping", "count": 2}, {"name": "Co-word", "count": 1}]
            }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["nodes"].as_array().unwrap().iter().map(|n| n["id"].as_str().unwrap()).collect();
    assert_eq!(
        ids,
        vec!["p-1", "p-2", "a-M.-J.-Cobo", "a-E.-Herrera%2DViedma", "t-Science-Mapping", "t-Co%2Dword"]
    );

    let edges = body["edges"].as_array().unwrap();
    let topic_edges = edges.iter().filter(|e| e["source"] == "t-Science-Mapping").count();
    assert_eq!(topic_edges, 2);
    assert_eq!(edges.iter().filter(|e| e["source"] == "t-Co%2Dword").count(), 0);
    assert_eq!(body["nodes"][2]["shape"], "diamond");
    assert_eq!(body["nodes"][4]["color"], "#ed64a6");
}

#[tokio::test]
async fn test_citation_trend_endpoint() {
    let server = MockServer::start().await;

    let (status, body) =
        send(router(&server), post_json("/api/graph/trend", &json!({"papers": graph_papers()}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["years"], json!([2011, 2012]));
    assert_eq!(body["counts"], json!([2072, 450]));
}

#[tokio::test]
async fn test_citation_trend_sums_beyond_u32() {
    let server = MockServer::start().await;
    let papers = json!([
        {"id": "1", "title": "A", "year": 2020, "citations": 4294967295u64},
        {"id": "2", "title": "B", "year": 2020, "citations": 5}
    ]);

    let (status, body) = send(router(&server), post_json("/api/graph/trend", &json!({"papers": papers}))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["counts"], json!([4294967300u64]));
}

#[tokio::test]
async fn test_graph_skips_null_fields_instead_of_rejecting() {
    let server = MockServer::start().await;
    let papers = json!([
        {"id": null, "title": "No id", "year": null, "citations": null},
        {"id": "1", "title": "Science mapping", "authors": ["M. J. Cobo", null], "year": 2011, "citations": -7}
    ]);

    let (status, body) = send(
        router(&server),
        post_json(
            "/api/graph/knowledge",
            &json!({"papers": papers, "topics": [{"name": null}, {"name": "mapping", "count": -1}]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let ids: Vec<&str> = body["nodes"].as_array().unwrap().iter().map(|n| n["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["p-1", "a-M.-J.-Cobo", "t-mapping"]);

    let (status, body) = send(
        router(&server),
        post_json(
            "/api/graph/connected",
            &json!({"papers": papers, "connections": [{"source": "1", "target": null, "weight": null}]}),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["nodes"].as_array().unwrap().len(), 1);
    assert!(body["edges"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_graph_rejects_malformed_body() {
    let server = MockServer::start().await;

    let (status, body) =
        send(router(&server), post_json("/api/graph/connected", &json!({"papers": "nope"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["details"].is_string());
}
