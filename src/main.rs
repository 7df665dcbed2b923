//! Tutor CLI entrypoint: answers one question and prints the JSON response.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, bail};
use mimalloc::MiMalloc;

use tutor::cache::ResponseCache;
use tutor::config::Config;
use tutor::constants::STUB_EMBEDDING_DIM;
use tutor::embedding::{HashEmbedder, OllamaEmbedder, QueryEmbedder};
use tutor::generation::{GenaiGenerator, GradeLevel};
use tutor::pipeline::{Pipeline, Question};
use tutor::search::{NoopSearch, SearchProvider, SerperSearch};
use tutor::vectordb::QdrantIndex;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

const USAGE: &str = "usage: tutor [--grade LEVEL] [--topic TOPIC] [--restrict-grade] \
[--best-effort] QUESTION...\n       tutor --health-check";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let config = Config::from_env()?;
    config.validate()?;

    if std::env::args().any(|arg| arg == "--health-check") {
        std::process::exit(run_health_check(&config).await);
    }

    let question = parse_question(std::env::args().skip(1))?;

    tracing::info!(
        qdrant_url = %config.qdrant_url,
        collection = %config.collection,
        model = %config.llm_model,
        "Tutor starting"
    );

    let index = Arc::new(QdrantIndex::new(&config.qdrant_url)?);

    let embedder: Arc<dyn QueryEmbedder> = if config.embedding_model == HashEmbedder::MODEL_NAME
    {
        tracing::warn!("Stub embedding model configured, vector scores are not semantic");
        Arc::new(HashEmbedder::new(STUB_EMBEDDING_DIM))
    } else {
        Arc::new(OllamaEmbedder::new(
            &config.ollama_url,
            config.embedding_model.clone(),
            config.embed_timeout,
        ))
    };

    let search: Arc<dyn SearchProvider> = match &config.serper_api_key {
        Some(key) => Arc::new(SerperSearch::new(key.clone(), config.search_timeout)),
        None => {
            tracing::warn!("No TUTOR_SERPER_API_KEY configured, web search disabled");
            Arc::new(NoopSearch)
        }
    };

    let generator = Arc::new(GenaiGenerator::new(config.llm_model.clone()));
    let cache = Arc::new(ResponseCache::new(config.cache_max_size, config.cache_ttl));

    let pipeline = Pipeline::new(
        config.pipeline_config(),
        index,
        embedder,
        generator,
        search,
        cache,
    );

    if let Err(e) = pipeline.is_ready().await {
        tracing::warn!(error = %e, "Knowledge index not ready, answers will fall back");
    }

    let response = pipeline.answer(&question).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

fn parse_question(mut args: impl Iterator<Item = String>) -> anyhow::Result<Question> {
    let mut words = Vec::new();
    let mut grade = GradeLevel::default();
    let mut topic = None;
    let mut restrict = false;
    let mut best_effort = false;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--grade" => {
                let value = args.next().context("--grade needs a value")?;
                grade = value
                    .parse()
                    .map_err(|e: String| anyhow::anyhow!(e))?;
            }
            "--topic" => topic = Some(args.next().context("--topic needs a value")?),
            "--restrict-grade" => restrict = true,
            "--best-effort" => best_effort = true,
            "-h" | "--help" => bail!(USAGE),
            _ => words.push(arg),
        }
    }

    if words.is_empty() {
        bail!(USAGE);
    }

    let mut question = Question::new(words.join(" "))
        .with_grade(grade)
        .restrict_to_grade(restrict)
        .best_effort(best_effort);
    if let Some(topic) = topic {
        question = question.with_topic(topic);
    }
    Ok(question)
}

async fn run_health_check(config: &Config) -> i32 {
    let index = match QdrantIndex::new(&config.qdrant_url) {
        Ok(index) => index,
        Err(_) => return 1,
    };

    let check = tutor::vectordb::KnowledgeIndex::is_ready(&index, &config.collection);
    match tokio::time::timeout(Duration::from_secs(2), check).await {
        Ok(Ok(())) => 0,
        _ => 1,
    }
}
