use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use kube_usage_metrics::error::{Result, UsageError};
use kube_usage_metrics::k8s::{ContainerReading, UsageSample, UsageSource};
use kube_usage_metrics::metrics::NamespaceCollector;
use kube_usage_metrics::server::create_router;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

/// Serves scripted responses, one per fetch, repeating the last one
struct ScriptedSource {
    responses: Vec<std::result::Result<Vec<UsageSample>, String>>,
    calls: AtomicUsize,
}

impl ScriptedSource {
    fn new(responses: Vec<std::result::Result<Vec<UsageSample>, String>>) -> Arc<Self> {
        Arc::new(Self {
            responses,
            calls: AtomicUsize::new(0),
        })
    }
}

#[async_trait]
impl UsageSource for ScriptedSource {
    async fn fetch(&self) -> Result<Vec<UsageSample>> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        let response = &self.responses[call.min(self.responses.len() - 1)];
        response.clone().map_err(UsageError::KubernetesError)
    }
}

fn pod(namespace: &str, containers: &[(&str, &str)]) -> UsageSample {
    UsageSample {
        namespace: namespace.to_string(),
        containers: containers
            .iter()
            .map(|(cpu, memory)| {
                ContainerReading::new(cpu.parse().unwrap(), memory.parse().unwrap())
            })
            .collect(),
    }
}

fn example_pods() -> Vec<UsageSample> {
    vec![
        pod("a", &[("100m", "200Mi")]),
        pod("a", &[("50m", "50Mi")]),
        pod("b", &[("10m", "10Mi")]),
    ]
}

async fn scrape(app: axum::Router) -> (StatusCode, String) {
    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    (status, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_namespace_gauges() {
    let source = ScriptedSource::new(vec![Ok(example_pods())]);
    let app = create_router(NamespaceCollector::new(source, Duration::from_secs(5)));

    let (status, body) = scrape(app).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("# HELP namespace_cpu CPU usage per namespace"));
    assert!(body.contains("# TYPE namespace_cpu gauge"));
    assert!(body.contains("namespace_cpu{namespace=\"a\"} 0.15"));
    assert!(body.contains("namespace_cpu{namespace=\"b\"} 0.01"));
    assert!(body.contains("# HELP namespace_memory_bytes Memory usage per namespace"));
    assert!(body.contains("namespace_memory_bytes{namespace=\"a\"} 262144000"));
    assert!(body.contains("namespace_memory_bytes{namespace=\"b\"} 10485760"));
}

#[tokio::test]
async fn test_scrape_error_is_isolated() {
    let source = ScriptedSource::new(vec![
        Err("the server is currently unable to handle the request".to_string()),
        Ok(example_pods()),
    ]);
    let app = create_router(NamespaceCollector::new(source.clone(), Duration::from_secs(5)));

    let (status, body) = scrape(app.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!body.contains("namespace_cpu"));
    assert!(!body.contains("namespace_memory_bytes"));

    let (status, body) = scrape(app).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.contains("namespace_cpu{namespace=\"a\"} 0.15"));
    assert!(body.contains("namespace_memory_bytes{namespace=\"b\"} 10485760"));
    assert_eq!(source.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_each_scrape_is_a_fresh_snapshot() {
    let source = ScriptedSource::new(vec![
        Ok(example_pods()),
        Ok(vec![pod("b", &[("20m", "20Mi")])]),
    ]);
    let app = create_router(NamespaceCollector::new(source, Duration::from_secs(5)));

    let (_, first) = scrape(app.clone()).await;
    assert!(first.contains("namespace=\"a\""));

    let (_, second) = scrape(app).await;
    assert!(!second.contains("namespace=\"a\""));
    assert!(second.contains("namespace_cpu{namespace=\"b\"} 0.02"));
}

#[tokio::test]
async fn test_healthz() {
    let source = ScriptedSource::new(vec![Err("unused".to_string())]);
    let app = create_router(NamespaceCollector::new(source.clone(), Duration::from_secs(5)));

    let response = app
        .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(source.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn test_error_types() {
    let err = UsageError::InvalidQuantity {
        value: "12Zi".to_string(),
        reason: "unknown suffix".to_string(),
    };

    assert!(err.to_string().contains("12Zi"));
    assert!(err.to_string().contains("unknown suffix"));
}

#[test]
fn test_version_const() {
    assert!(!kube_usage_metrics::VERSION.is_empty());
}
