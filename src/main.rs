use std::sync::Arc;

use anyhow::Context;

use symptom_intake::config::ServerConfig;
use symptom_intake::dataset::{GuidelineTable, ScriptCorpus};
use symptom_intake::intake::{IntakeEngine, RandomPicker, cors_layer, intake_routes};
use symptom_intake::store::InMemorySessionStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    let config = ServerConfig::from_env();
    config.validate()?;

    eprintln!("🩺 Symptom Intake v{}", env!("CARGO_PKG_VERSION"));

    // ── Datasets ─────────────────────────────────────────────────────────
    // Load failures degrade: empty corpus, built-in guidelines.
    let corpus = match &config.scripts_path {
        Some(path) => ScriptCorpus::load(path).unwrap_or_else(|e| {
            tracing::error!(path = %path.display(), error = %e, "Failed to load script corpus, continuing without scripts");
            ScriptCorpus::empty()
        }),
        None => {
            tracing::warn!("INTAKE_SCRIPTS_PATH not set, running without conversation scripts");
            ScriptCorpus::empty()
        }
    };

    let guidelines = match &config.guidelines_path {
        Some(path) => GuidelineTable::load(path).unwrap_or_else(|e| {
            tracing::error!(path = %path.display(), error = %e, "Failed to load guideline table, using built-in table");
            GuidelineTable::builtin()
        }),
        None => GuidelineTable::builtin(),
    };

    eprintln!("   Scripts: {}", corpus.len());
    eprintln!("   Guidelines: {}", guidelines.len());

    // ── Engine ───────────────────────────────────────────────────────────
    let engine = Arc::new(IntakeEngine::new(
        Arc::new(corpus),
        Arc::new(guidelines),
        Arc::new(InMemorySessionStore::new()),
        Arc::new(RandomPicker),
    ));

    let app = intake_routes(engine).layer(cors_layer(&config.cors_origins));

    // ── Serve ────────────────────────────────────────────────────────────
    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("binding {addr}"))?;
    eprintln!("   API: http://{}\n", addr);
    tracing::info!(addr = %addr, "Symptom intake server started");

    axum::serve(listener, app).await.context("server error")?;

    Ok(())
}
