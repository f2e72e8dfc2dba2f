//! Integration tests for the template-headers middleware.
//!
//! The handler chain is an axum router whose handler echoes the request
//! headers it received back into the response, so every test observes
//! exactly what the next handler saw.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware,
    response::IntoResponse,
    routing::any,
    Router,
};
use template_headers::{
    template_headers_middleware, DiagnosticSink, TemplateHeaderConfig, TemplateHeaders,
    TemplateHeadersConfig, TemplateHeadersLayer, Verbosity,
};
use tower::ServiceExt;

/// Echo handler: reflects received request headers into the response.
async fn echo(req: Request<Body>) -> impl IntoResponse {
    (StatusCode::OK, req.headers().clone(), "ok")
}

fn build(specs: Vec<TemplateHeaderConfig>, verbosity: Verbosity) -> TemplateHeaders {
    let config = TemplateHeadersConfig {
        template_headers: specs,
        log_level: verbosity,
    };
    TemplateHeaders::from_config(&config, DiagnosticSink::new(verbosity)).unwrap()
}

fn app(headers: TemplateHeaders) -> Router {
    Router::new()
        .route("/", any(echo))
        .route("/{*path}", any(echo))
        .layer(TemplateHeadersLayer::new(headers))
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

fn header<'a>(res: &'a axum::response::Response, name: &str) -> &'a str {
    res.headers().get(name).unwrap().to_str().unwrap()
}

#[tokio::test]
async fn test_rsc_request_template() {
    let headers = build(
        vec![TemplateHeaderConfig::new(
            "X-RSC-Request",
            "{{.Scheme}}://{{.Host}}/rsc{{.RequestURI}}",
        )],
        Verbosity::Off,
    );

    let res = get(app(headers.clone()), "http://localhost:80/").await;
    assert_eq!(header(&res, "X-RSC-Request"), "http://localhost:80/rsc/");

    let res = get(app(headers), "http://localhost:80/something?hello=1").await;
    assert_eq!(
        header(&res, "X-RSC-Request"),
        "http://localhost:80/rsc/something?hello=1"
    );
}

#[tokio::test]
async fn test_exact_request_template() {
    let config = TemplateHeadersConfig {
        template_headers: vec![TemplateHeaderConfig::new(
            "X-Exact-Req",
            "{{.Scheme}}://{{.Host}}{{.RequestURI}}",
        )],
        log_level: Verbosity::Off,
    };
    let layer = TemplateHeadersLayer::from_config(&config, DiagnosticSink::default()).unwrap();
    let app = Router::new().route("/{*path}", any(echo)).layer(layer);

    let uri = "https://some.example.com/some-path/level?query=true";
    let res = get(app, uri).await;
    assert_eq!(header(&res, "X-Exact-Req"), uri);
}

#[tokio::test]
async fn test_construction_fails_on_syntax_error() {
    let config = TemplateHeadersConfig {
        template_headers: vec![
            TemplateHeaderConfig::new("X-Ok", "fine"),
            TemplateHeaderConfig::new("X-Bad", "{{ .Scheme }"),
        ],
        log_level: Verbosity::Off,
    };

    let err = TemplateHeaders::from_config(&config, DiagnosticSink::default()).unwrap_err();
    assert!(err.to_string().contains("{{ .Scheme }"));
}

#[tokio::test]
async fn test_duplicate_header_gets_two_values_in_order() {
    let headers = build(
        vec![
            TemplateHeaderConfig::new("X-Dup", "one"),
            TemplateHeaderConfig::new("X-Dup", "two"),
        ],
        Verbosity::Off,
    );

    let res = get(app(headers), "/").await;
    let values: Vec<_> = res
        .headers()
        .get_all("X-Dup")
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect();
    assert_eq!(values, ["one", "two"]);
}

#[tokio::test]
async fn test_upstream_header_values_survive() {
    let headers = build(
        vec![TemplateHeaderConfig::new("X-Dup", "{{.Method}}")],
        Verbosity::Off,
    );

    let req = Request::builder()
        .uri("/")
        .header("X-Dup", "from-upstream")
        .body(Body::empty())
        .unwrap();
    let res = app(headers).oneshot(req).await.unwrap();

    let values: Vec<_> = res
        .headers()
        .get_all("X-Dup")
        .iter()
        .map(|v| v.to_str().unwrap())
        .collect();
    assert_eq!(values, ["from-upstream", "GET"]);
}

#[tokio::test]
async fn test_failed_entry_is_isolated_and_request_proceeds() {
    let headers = build(
        vec![
            TemplateHeaderConfig::new("X-Before", "{{.Method}}"),
            TemplateHeaderConfig::new("X-Broken", "{{.NoSuchField}}"),
            TemplateHeaderConfig::new("X-After", "{{.Path}}"),
        ],
        Verbosity::Info,
    );

    let res = get(app(headers), "http://localhost/p").await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(header(&res, "X-Before"), "GET");
    assert!(res.headers().get("X-Broken").is_none());
    assert_eq!(header(&res, "X-After"), "/p");
}

#[tokio::test]
async fn test_next_handler_invoked_exactly_once() {
    let counter = Arc::new(AtomicUsize::new(0));
    let handler_counter = counter.clone();

    let headers = build(
        vec![TemplateHeaderConfig::new("X-Broken", "{{.NoSuchField}}")],
        Verbosity::Off,
    );

    let app = Router::new()
        .route(
            "/",
            any(move |_req: Request<Body>| {
                let counter = handler_counter.clone();
                async move {
                    counter.fetch_add(1, Ordering::SeqCst);
                    "ok"
                }
            }),
        )
        .layer(TemplateHeadersLayer::new(headers));

    let res = get(app, "/").await;

    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_forwarded_headers_visible_to_templates() {
    let headers = build(
        vec![TemplateHeaderConfig::new(
            "X-Origin",
            "{{.HttpXForwardedProto}}://{{.HttpXForwardedHost}} via {{.HttpHost}}",
        )],
        Verbosity::Off,
    );

    let req = Request::builder()
        .uri("/")
        .header("X-Forwarded-Proto", "https")
        .header("X-Forwarded-Host", "edge.example.com")
        .header("Host", "origin.example.com")
        .body(Body::empty())
        .unwrap();
    let res = app(headers).oneshot(req).await.unwrap();

    assert_eq!(
        header(&res, "X-Origin"),
        "https://edge.example.com via origin.example.com"
    );
}

#[tokio::test]
async fn test_axum_adapter_over_socket() {
    init_tracing();

    let headers = Arc::new(build(
        vec![TemplateHeaderConfig::new(
            "X-Exact-Req",
            "{{.HttpHost}}{{.RequestURI}}",
        )],
        Verbosity::Debug,
    ));

    let app = Router::new()
        .route("/", any(echo))
        .route("/{*path}", any(echo))
        .layer(middleware::from_fn_with_state(
            headers,
            template_headers_middleware,
        ));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    let res = reqwest::Client::new()
        .get(format!("http://{addr}/some-path/level?query=true"))
        .send()
        .await
        .expect("middleware server unreachable");

    assert_eq!(res.status(), 200);
    assert_eq!(
        res.headers().get("X-Exact-Req").unwrap().to_str().unwrap(),
        format!("{addr}/some-path/level?query=true")
    );
}

fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "template_headers=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}
