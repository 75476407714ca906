mod config;
mod llm;
mod routes;
mod services;
mod state;

use std::sync::Arc;

use crate::llm::LlmChat;

#[tokio::main]
async fn main() {
    if let Err(e) = dotenvy::dotenv() {
        if !e.not_found() {
            eprintln!("failed to load .env: {e}");
        }
    }
    tracing_subscriber::fmt::init();

    let config = config::ServerConfig::from_env();

    // LLM is optional: without a key the AI endpoints answer 503.
    let (llm, models) = match llm::LlmConfig::from_env() {
        Ok(cfg) => match llm::openai::OpenAiClient::from_config(&cfg) {
            Ok(client) => {
                tracing::info!(fast = %cfg.models.fast, advanced = %cfg.models.advanced, suggest = %cfg.models.suggest, "LLM client initialized");
                (Some(Arc::new(client) as Arc<dyn LlmChat>), cfg.models)
            }
            Err(e) => {
                tracing::warn!(error = %e, "LLM client failed to build, AI search disabled");
                (None, cfg.models)
            }
        },
        Err(e) => {
            tracing::warn!(error = %e, "LLM client not configured, AI search disabled");
            (None, llm::LlmModels::default())
        }
    };

    let corpus = services::testimonies::Corpus::load(&config.testimonies_path);
    let state = state::AppState::new(llm, models, corpus);

    let app = routes::app(state, &config.cors_origins);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", config.port))
        .await
        .expect("failed to bind");

    tracing::info!(port = config.port, origins = config.cors_origins.len(), "bible search listening");
    axum::serve(listener, app).await.expect("server failed");
}
