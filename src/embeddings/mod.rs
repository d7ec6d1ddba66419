pub mod openai;

pub use openai::OpenAiEmbedder;

use crate::error::Result;

/// How a text should be framed before embedding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionMode {
    /// A free-text relevance query; framed with a path-matching instruction.
    Query,
    /// A path step encoding; embedded as-is.
    Passage,
}

/// Anything that can turn texts into fixed-dimension vectors.
///
/// Vectors for the same model are comparable via cosine similarity.
#[allow(async_fn_in_trait)]
pub trait Embedder {
    /// Embed a batch of texts, returning one vector per input in order.
    async fn embed_batch(&self, texts: Vec<String>, mode: InstructionMode) -> Result<Vec<Vec<f32>>>;
}
