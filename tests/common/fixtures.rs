use tutor::embedding::HashEmbedder;
use tutor::search::WebResult;
use tutor::vectordb::{IndexedDocument, MockKnowledgeIndex};

pub const DIM: usize = 32;
pub const COLLECTION: &str = "math_knowledge";

pub const SOLVED_REPLY: &str = "Step 1: subtract 3 from both sides\n2x = 4\n\
Step 2: divide both sides by 2\nx = 2\nKey concept: inverse operations";

/// Questions indexed with the embedding of their own text, so asking one verbatim
/// yields a cosine similarity of 1.0.
pub const KNOWLEDGE_BASE: &[KbFixture] = &[
    KbFixture {
        id: "alg-linear-1",
        question: "Solve 2x + 3 = 7",
        content: "To solve 2x + 3 = 7, subtract 3 from both sides then divide by 2. x = 2.",
        topic: "algebra",
        level: "intermediate",
    },
    KbFixture {
        id: "geo-circle-1",
        question: "Area of a circle with radius 3 cm",
        content: "The area of a circle is pi r^2. With r = 3 cm the area is 9 pi cm^2.",
        topic: "geometry",
        level: "elementary",
    },
    KbFixture {
        id: "calc-deriv-1",
        question: "What is the derivative of x^2",
        content: "Using the power rule, f(x) = x^2 has derivative 2x.",
        topic: "calculus",
        level: "advanced",
    },
];

pub struct KbFixture {
    pub id: &'static str,
    pub question: &'static str,
    pub content: &'static str,
    pub topic: &'static str,
    pub level: &'static str,
}

impl KbFixture {
    pub fn document(&self) -> IndexedDocument {
        IndexedDocument::new(self.id, self.content)
            .with_topic(self.topic)
            .with_grade_level(self.level)
    }
}

pub fn embedding_of(text: &str) -> Vec<f32> {
    HashEmbedder::new(DIM).embed_sync(text)
}

pub fn seeded_index() -> MockKnowledgeIndex {
    let index = MockKnowledgeIndex::new();
    index.create_collection(COLLECTION);
    for fixture in KNOWLEDGE_BASE {
        index.insert(COLLECTION, embedding_of(fixture.question), fixture.document());
    }
    index
}

pub fn web_results() -> Vec<WebResult> {
    (1..=4)
        .map(|i| WebResult {
            id: format!("https://example.org/math/{i}"),
            title: format!("Worked example {i}"),
            snippet: format!("Snippet {i} about inverse operations"),
            content: format!("Content {i}: isolate the variable using inverse operations."),
        })
        .collect()
}
