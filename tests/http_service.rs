use axum::{http::StatusCode, routing::post, Json, Router};
use finreport::{
    config::Config,
    service::{FetchError, HttpReportService, ReportService},
};
use serde_json::{json, Value};

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/run")
}

async fn echo(Json(body): Json<Value>) -> Json<Value> {
    let company = body["input"].as_str().unwrap_or_default().to_string();
    Json(json!({
        "result": {
            "raw": format!("## Summary\n{company} had a good year\n## Outlook\nPositive\n"),
            "pydantic": null,
            "json_dict": null,
            "tasks_output": [{
                "description": "research",
                "name": null,
                "expected_output": "notes",
                "summary": "research...",
                "raw": "notes"
            }],
            "token_usage": {
                "total_tokens": 1000,
                "prompt_tokens": 800,
                "cached_prompt_tokens": 0,
                "completion_tokens": 200,
                "successful_requests": 2
            }
        }
    }))
}

#[tokio::test]
async fn posts_company_and_decodes_report() {
    let url = serve(Router::new().route("/run", post(echo))).await;
    let svc = HttpReportService::with_endpoint(&Config::default(), &url).unwrap();
    assert_eq!(svc.endpoint(), url);

    let report = svc.fetch("Apple Inc.").await.expect("report");
    assert!(report.raw.contains("Apple Inc. had a good year"));
    assert_eq!(report.token_usage.total_tokens, 1000);
    assert_eq!(report.token_usage.successful_requests, 2);
    assert_eq!(report.tasks_output.len(), 1);
}

#[tokio::test]
async fn non_success_status_uses_reason_phrase() {
    let app = Router::new().route("/run", post(|| async { StatusCode::BAD_GATEWAY }));
    let url = serve(app).await;
    let svc = HttpReportService::with_endpoint(&Config::default(), &url).unwrap();

    let err = svc.fetch("Apple Inc.").await.unwrap_err();
    assert_eq!(
        err,
        FetchError::Http {
            status: 502,
            status_text: "Bad Gateway".into()
        }
    );
    assert_eq!(err.to_string(), "Error: Bad Gateway");
}

#[tokio::test]
async fn undecodable_body_is_malformed() {
    let app = Router::new().route("/run", post(|| async { "definitely not json" }));
    let url = serve(app).await;
    let svc = HttpReportService::with_endpoint(&Config::default(), &url).unwrap();

    let err = svc.fetch("Apple Inc.").await.unwrap_err();
    assert!(matches!(err, FetchError::MalformedResponse(_)), "{err:?}");
}

#[tokio::test]
async fn missing_raw_field_is_malformed() {
    let app = Router::new().route(
        "/run",
        post(|| async { Json(json!({ "result": { "token_usage": {} } })) }),
    );
    let url = serve(app).await;
    let svc = HttpReportService::with_endpoint(&Config::default(), &url).unwrap();

    let err = svc.fetch("Apple Inc.").await.unwrap_err();
    assert!(matches!(err, FetchError::MalformedResponse(_)), "{err:?}");
}

#[tokio::test]
async fn refused_connection_is_transport_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = format!("http://{addr}/run");
    let svc = HttpReportService::with_endpoint(&Config::default(), &url).unwrap();
    let err = svc.fetch("Apple Inc.").await.unwrap_err();
    match err {
        FetchError::Transport(msg) => assert!(!msg.is_empty()),
        other => panic!("expected transport error, got {other:?}"),
    }
}

#[tokio::test]
async fn null_ancillary_fields_are_accepted() {
    let app = Router::new().route(
        "/run",
        post(|| async {
            Json(json!({
                "result": {
                    "raw": "## Summary\nGood year\n",
                    "pydantic": null,
                    "json_dict": null,
                    "tasks_output": [{
                        "description": "research",
                        "name": null,
                        "expected_output": null,
                        "summary": null,
                        "raw": "notes"
                    }],
                    "token_usage": { "total_tokens": 10 }
                }
            }))
        }),
    );
    let url = serve(app).await;
    let svc = HttpReportService::with_endpoint(&Config::default(), &url).unwrap();

    let report = svc.fetch("Apple Inc.").await.expect("report");
    assert_eq!(report.raw, "## Summary\nGood year\n");
    assert_eq!(report.tasks_output.len(), 1);
    assert_eq!(report.tasks_output[0].summary, None);
    assert_eq!(report.tasks_output[0].raw.as_deref(), Some("notes"));
}

#[tokio::test]
async fn null_task_list_is_empty() {
    let app = Router::new().route(
        "/run",
        post(|| async {
            Json(json!({
                "result": {
                    "raw": "## Summary\nGood year\n",
                    "tasks_output": null,
                    "token_usage": { "total_tokens": 10 }
                }
            }))
        }),
    );
    let url = serve(app).await;
    let svc = HttpReportService::with_endpoint(&Config::default(), &url).unwrap();

    let report = svc.fetch("Apple Inc.").await.expect("report");
    assert!(report.tasks_output.is_empty());
    assert_eq!(report.token_usage.total_tokens, 10);
}
