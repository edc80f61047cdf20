mod config;
mod metrics;
mod pages;
mod routes;

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{info, warn};

use index::{GraphReader, Neo4jStore};
use ingest::DataLayout;
use query::{Detector, GroqClient, VerdictGenerator};

use crate::config::{AppConfig, Connection};
use crate::routes::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    ingest::init_tracing();

    let config = AppConfig::from_env();
    info!(
        data_dir = %config.data_dir,
        chat_model = %config.chat_model,
        embedding_model = %config.embedding_model,
        sample_size = config.sample_size,
        "Loaded configuration"
    );
    let errors = config.validate();
    if errors.is_empty() {
        info!("Configuration validated successfully");
    } else {
        for error in &errors {
            warn!(%error, "Configuration error");
        }
        warn!("Please update your .env file with correct values");
    }

    let (graph, graph_status) = connect_graph(&config).await;
    let (generator, llm_status) = connect_llm(&config);

    let state = Arc::new(AppState::new(
        Detector::new(graph, generator),
        graph_status,
        llm_status,
        DataLayout::new(&config.data_dir),
    ));
    let app = routes::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;

    info!("GuardianAI listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn connect_graph(config: &AppConfig) -> (GraphReader, Connection) {
    let (Some(uri), Some(password)) = (&config.neo4j_uri, &config.neo4j_password) else {
        return (
            GraphReader::disconnected(),
            Connection::Disconnected("NEO4J_URI and NEO4J_PASSWORD are required".to_string()),
        );
    };

    match Neo4jStore::connect(uri, &config.neo4j_user, password).await {
        Ok(store) => (GraphReader::new(Arc::new(store)), Connection::Connected),
        Err(e) => {
            warn!(error = %e, "Failed to connect to Neo4j");
            (
                GraphReader::disconnected(),
                Connection::Disconnected(format!("Failed to connect to Neo4j: {}", e)),
            )
        }
    }
}

fn connect_llm(config: &AppConfig) -> (VerdictGenerator, Connection) {
    let Some(api_key) = &config.groq_api_key else {
        warn!("GROQ_API_KEY not found in environment variables.");
        return (
            VerdictGenerator::disconnected(),
            Connection::Disconnected("GROQ_API_KEY not set".to_string()),
        );
    };

    let client = GroqClient::new(
        config.groq_base_url.clone(),
        api_key.clone(),
        config.chat_model.clone(),
    );
    info!(model = client.model(), "Groq client ready");
    (VerdictGenerator::new(Arc::new(client)), Connection::Connected)
}
