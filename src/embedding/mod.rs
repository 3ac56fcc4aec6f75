// Embedding providers: text to normalized vectors, plus cosine similarity.

pub mod cache;
pub mod download;
pub mod hashing;
pub mod onnx;
pub mod traits;

pub use cache::CachedEmbedder;
pub use hashing::HashingEmbedder;
pub use onnx::{SentenceEmbedder, EMBEDDING_DIM};
pub use traits::{cosine_similarity, Embedding, EmbeddingProvider};
