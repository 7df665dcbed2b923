use super::*;
use serial_test::serial;
use std::env;
use std::time::Duration;

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    clear_tutor_env();
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    clear_tutor_env();
    result
}

fn clear_tutor_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for key in Config::ENV_VARS {
        unsafe { env::remove_var(key) };
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.qdrant_url, "http://localhost:6334");
    assert_eq!(config.collection, "math_knowledge");
    assert_eq!(config.ollama_url, "http://localhost:11434");
    assert_eq!(config.llm_model, "llama3.1:8b");
    assert!(config.serper_api_key.is_none());
    assert_eq!(config.cache_max_size, 500);
    assert_eq!(config.cache_ttl, Duration::from_secs(1800));
    assert_eq!(config.top_k, 5);
    assert_eq!(config.generation_timeout, Duration::from_secs(180));
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_from_env_defaults() {
    let config = with_env_vars(&[], Config::from_env).unwrap();
    assert_eq!(config.qdrant_url, DEFAULT_QDRANT_URL);
    assert_eq!(config.keyword_page_size, 100);
    assert!(config.serper_api_key.is_none());
}

#[test]
#[serial]
fn test_from_env_overrides() {
    let config = with_env_vars(
        &[
            ("TUTOR_QDRANT_URL", "http://qdrant:6334"),
            ("TUTOR_COLLECTION", "algebra"),
            ("TUTOR_LLM_MODEL", "mistral"),
            ("TUTOR_SERPER_API_KEY", "  secret  "),
            ("TUTOR_CACHE_MAX_SIZE", "42"),
            ("TUTOR_CACHE_TTL_SECS", "60"),
            ("TUTOR_TOP_K", "3"),
            ("TUTOR_SCORE_THRESHOLD", "0.5"),
            ("TUTOR_KB_MIN_SCORE", "0.4"),
            ("TUTOR_GENERATION_TIMEOUT_SECS", "30"),
        ],
        Config::from_env,
    )
    .unwrap();

    assert_eq!(config.qdrant_url, "http://qdrant:6334");
    assert_eq!(config.collection, "algebra");
    assert_eq!(config.llm_model, "mistral");
    assert_eq!(config.serper_api_key.as_deref(), Some("secret"));
    assert_eq!(config.cache_max_size, 42);
    assert_eq!(config.cache_ttl, Duration::from_secs(60));
    assert_eq!(config.top_k, 3);
    assert_eq!(config.score_threshold, 0.5);
    assert_eq!(config.kb_min_score, 0.4);
    assert_eq!(config.generation_timeout, Duration::from_secs(30));
}

#[test]
#[serial]
fn test_blank_values_fall_back_to_defaults() {
    let config = with_env_vars(
        &[
            ("TUTOR_COLLECTION", "   "),
            ("TUTOR_SERPER_API_KEY", ""),
            ("TUTOR_TOP_K", " "),
        ],
        Config::from_env,
    )
    .unwrap();

    assert_eq!(config.collection, "math_knowledge");
    assert!(config.serper_api_key.is_none());
    assert_eq!(config.top_k, 5);
}

#[test]
#[serial]
fn test_invalid_number_is_error() {
    let err = with_env_vars(&[("TUTOR_CACHE_MAX_SIZE", "lots")], Config::from_env).unwrap_err();
    match err {
        ConfigError::InvalidNumber { name, value, .. } => {
            assert_eq!(name, "TUTOR_CACHE_MAX_SIZE");
            assert_eq!(value, "lots");
        }
        other => panic!("unexpected error: {other}"),
    }

    let err = with_env_vars(&[("TUTOR_INDEX_TIMEOUT_SECS", "-1")], Config::from_env).unwrap_err();
    assert!(matches!(err, ConfigError::InvalidNumber { .. }));
}

#[test]
fn test_validate_rejects_bad_url() {
    let config = Config {
        qdrant_url: "localhost:6334".to_string(),
        ..Config::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidUrl { name: "TUTOR_QDRANT_URL", .. })
    ));
}

#[test]
fn test_validate_rejects_out_of_range_scores() {
    let config = Config {
        score_threshold: 1.5,
        ..Config::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::ScoreOutOfRange { .. })
    ));

    let config = Config {
        kb_min_score: f32::NAN,
        ..Config::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_zero_values() {
    let config = Config {
        top_k: 0,
        ..Config::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Zero { name: "TUTOR_TOP_K" })
    ));

    let config = Config {
        search_timeout: Duration::ZERO,
        ..Config::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::Zero { name: "TUTOR_SEARCH_TIMEOUT_SECS" })
    ));
}

#[test]
fn test_validate_rejects_empty_model() {
    let config = Config {
        embedding_model: " ".to_string(),
        ..Config::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::Empty { .. })));
}

#[test]
fn test_pipeline_config_carries_settings() {
    let config = Config {
        collection: "geometry".to_string(),
        top_k: 2,
        kb_min_score: 0.45,
        index_timeout: Duration::from_secs(2),
        ..Config::default()
    };
    let pipeline = config.pipeline_config();

    assert_eq!(pipeline.collection, "geometry");
    assert_eq!(pipeline.merge.top_k, 2);
    assert_eq!(pipeline.kb_min_score, 0.45);
    assert_eq!(pipeline.index_timeout, Duration::from_secs(2));
    assert_eq!(pipeline.merge.vector_weight, crate::constants::VECTOR_WEIGHT);
}

#[test]
fn test_error_display() {
    let err = ConfigError::ScoreOutOfRange {
        name: "TUTOR_SCORE_THRESHOLD",
        value: 2.0,
    };
    assert_eq!(
        err.to_string(),
        "TUTOR_SCORE_THRESHOLD must be between 0.0 and 1.0, got 2"
    );
}
