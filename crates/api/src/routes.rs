use anyhow::Result;
use axum::{
    Form, Json, Router,
    extract::State,
    response::Html,
    routing::get,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use graphview::{GRAPH_EDGE_LIMIT, mention_graph_page, save_graph};
use ingest::{DataLayout, load_cleaned};
use query::{DetectionOutcome, Detector};
use report::{DatasetStats, label_pie_svg, subject_bars_svg};

use crate::config::Connection;
use crate::metrics::{Metrics, MetricsSnapshot, TimedOperation};
use crate::pages::{self, DashboardData, GraphPanel, Page, Sidebar};

const CHART_SIZE: (u32, u32) = (480, 320);

pub struct AppState {
    pub detector: Detector,
    pub graph_status: Connection,
    pub llm_status: Connection,
    pub layout: DataLayout,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    pub fn new(
        detector: Detector,
        graph_status: Connection,
        llm_status: Connection,
        layout: DataLayout,
    ) -> Self {
        Self {
            detector,
            graph_status,
            llm_status,
            layout,
            metrics: Metrics::new(),
        }
    }

    fn render(&self, page: Page, body: &str) -> Html<String> {
        self.metrics.record_page_view();
        let sidebar = Sidebar {
            graph: &self.graph_status,
            llm: &self.llm_status,
        };
        Html(pages::layout(page, &sidebar, body))
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard))
        .route("/detector", get(detector_form).post(detector_submit))
        .route("/graph", get(graph_view))
        .route("/about", get(about))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn load_dashboard(layout: &DataLayout) -> Result<DashboardData> {
    let articles = load_cleaned(layout)?;
    let stats = DatasetStats::from_articles(&articles);
    let pie_svg = label_pie_svg(&stats, CHART_SIZE)?;
    let bars_svg = subject_bars_svg(&stats, CHART_SIZE)?;
    Ok(DashboardData {
        stats,
        pie_svg,
        bars_svg,
    })
}

async fn dashboard(State(state): State<Arc<AppState>>) -> Html<String> {
    let layout = state.layout.clone();
    let loaded = tokio::task::spawn_blocking(move || load_dashboard(&layout))
        .await
        .map_err(anyhow::Error::from)
        .and_then(|r| r);

    let body = match loaded {
        Ok(data) => pages::dashboard(Ok(&data)),
        Err(e) => {
            warn!(error = %e, "Could not load analysis data");
            pages::dashboard(Err(e.to_string().as_str()))
        }
    };
    state.render(Page::Dashboard, &body)
}

async fn detector_form(State(state): State<Arc<AppState>>) -> Html<String> {
    state.render(Page::Detector, &pages::detector("", None))
}

#[derive(Debug, Deserialize)]
struct DetectForm {
    #[serde(default)]
    query: String,
}

async fn detector_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<DetectForm>,
) -> Html<String> {
    let timer = TimedOperation::start();
    let outcome = state.detector.run(&form.query).await;

    match &outcome {
        DetectionOutcome::EmptyQuery => {
            info!("Empty submission");
            state.metrics.record_empty_submission();
        }
        DetectionOutcome::Report(report) => {
            state
                .metrics
                .record_detection(report.analysis.verdict, timer.elapsed());
        }
    }

    state.render(Page::Detector, &pages::detector(&form.query, Some(&outcome)))
}

async fn graph_view(State(state): State<Arc<AppState>>) -> Html<String> {
    let graph = state.detector.graph();
    if !graph.is_connected() {
        return state.render(Page::Graph, &pages::graph(&GraphPanel::Disconnected));
    }

    let counts = graph.node_label_counts().await;
    let rendered = match mention_graph_page(graph, GRAPH_EDGE_LIMIT).await {
        Ok(Some(html)) => {
            if let Err(e) = save_graph(&state.layout.graph_html(), &html) {
                warn!(error = %e, "Could not save graph page");
            }
            Ok(Some(html))
        }
        Ok(None) => Ok(None),
        Err(e) => {
            warn!(error = %e, "Could not render interactive graph");
            Err(e.to_string())
        }
    };

    let panel = GraphPanel::Ready {
        counts,
        graph: rendered,
    };
    state.render(Page::Graph, &pages::graph(&panel))
}

async fn about(State(state): State<Arc<AppState>>) -> Html<String> {
    state.render(Page::About, &pages::about())
}

#[derive(Serialize)]
struct HealthResponse {
    neo4j: Connection,
    groq: Connection,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        neo4j: state.graph_status.clone(),
        groq: state.llm_status.clone(),
    })
}

async fn metrics(State(state): State<Arc<AppState>>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}
