use std::sync::Arc;
use std::time::Duration;

use tutor::cache::{Clock, ManualClock, ResponseCache};
use tutor::embedding::MockEmbedder;
use tutor::generation::MockGenerator;
use tutor::pipeline::{Answer, Pipeline, PipelineConfig};
use tutor::search::MockSearch;
use tutor::vectordb::MockKnowledgeIndex;

use super::fixtures::{COLLECTION, DIM, SOLVED_REPLY, seeded_index};

pub const CACHE_TTL: Duration = Duration::from_secs(1800);

pub struct TestPipeline {
    pub index: Arc<MockKnowledgeIndex>,
    pub embedder: Arc<MockEmbedder>,
    pub generator: Arc<MockGenerator>,
    pub search: Arc<MockSearch>,
    pub clock: Arc<ManualClock>,
    pub cache: Arc<ResponseCache<Answer>>,
    pub pipeline: Pipeline<MockKnowledgeIndex>,
}

pub struct TestPipelineConfig {
    pub cache_max_size: usize,
    pub seed_knowledge_base: bool,
    pub timeout: Duration,
}

impl Default for TestPipelineConfig {
    fn default() -> Self {
        Self {
            cache_max_size: 100,
            seed_knowledge_base: true,
            timeout: Duration::from_millis(250),
        }
    }
}

pub fn spawn_pipeline(config: TestPipelineConfig) -> TestPipeline {
    let index = if config.seed_knowledge_base {
        seeded_index()
    } else {
        let index = MockKnowledgeIndex::new();
        index.create_collection(COLLECTION);
        index
    };
    let index = Arc::new(index);
    let embedder = Arc::new(MockEmbedder::new(DIM));
    let generator = Arc::new(MockGenerator::replying(SOLVED_REPLY));
    let search = Arc::new(MockSearch::new());
    let clock = Arc::new(ManualClock::at_epoch());
    let cache = Arc::new(ResponseCache::with_clock(
        config.cache_max_size,
        CACHE_TTL,
        clock.clone() as Arc<dyn Clock>,
    ));

    let pipeline_config = PipelineConfig {
        collection: COLLECTION.to_string(),
        embed_timeout: config.timeout,
        index_timeout: config.timeout,
        generation_timeout: config.timeout,
        search_timeout: config.timeout,
        ..PipelineConfig::default()
    };

    let pipeline = Pipeline::new(
        pipeline_config,
        index.clone(),
        embedder.clone(),
        generator.clone(),
        search.clone(),
        cache.clone(),
    );

    TestPipeline {
        index,
        embedder,
        generator,
        search,
        clock,
        cache,
        pipeline,
    }
}
