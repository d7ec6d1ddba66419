use crate::cache::EmbeddingCache;
use crate::embeddings::{Embedder, InstructionMode};
use crate::error::{OntopathError, Result};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Instruction prepended to relevance queries so the model embeds them in
/// "find matching relation paths" space rather than plain retrieval space.
const QUERY_INSTRUCTION: &str =
    "Given a question about how two entities are related, represent it for matching \
     against chains of subject-relation-object statements: ";

/// Request structure for OpenAI-compatible embeddings API
#[derive(Serialize)]
struct EmbeddingRequest {
    model: String,
    input: Vec<String>,
}

/// Response structure from the embeddings API
#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}

/// OpenAI-compatible embeddings client.
///
/// Handles batch splitting, retry with exponential backoff on transient API
/// errors, and an optional LRU cache for query-mode embeddings.
pub struct OpenAiEmbedder {
    client: Client,
    api_key: String,
    model: String,
    batch_size: usize,
    cache: Option<Arc<EmbeddingCache>>,
}

impl OpenAiEmbedder {
    const MAX_RETRIES: usize = 3;

    /// Create a new embedder without caching.
    ///
    /// # Panics
    ///
    /// Panics if the HTTP client cannot be created (should not happen in
    /// normal operation).
    pub fn new(api_key: String, model: String, batch_size: usize) -> Self {
        Self::new_with_cache(api_key, model, batch_size, None)
    }

    /// Create a new embedder with an optional query-embedding cache.
    pub fn new_with_cache(
        api_key: String,
        model: String,
        batch_size: usize,
        cache: Option<Arc<EmbeddingCache>>,
    ) -> Self {
        // At least one input per request, at most the API limit
        let batch_size = batch_size.clamp(1, 2048);

        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            model,
            batch_size,
            cache,
        }
    }

    /// Frame a text according to the instruction mode.
    fn frame(text: &str, mode: InstructionMode) -> String {
        match mode {
            InstructionMode::Query => format!("{}{}", QUERY_INSTRUCTION, text),
            InstructionMode::Passage => text.to_string(),
        }
    }

    /// One API request with retry on 429/5xx.
    async fn request_with_retry(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let start = std::time::Instant::now();
        let mut attempt = 0;
        let mut delay = Duration::from_secs(1);

        loop {
            match self.request(texts.clone()).await {
                Ok(embeddings) => {
                    log::debug!(
                        "Embedding API call for {} texts took {:?} (attempt {})",
                        texts.len(),
                        start.elapsed(),
                        attempt + 1
                    );
                    return Ok(embeddings);
                }
                Err(e) if attempt < Self::MAX_RETRIES => {
                    let msg = e.to_string();
                    let should_retry = msg.contains("429")
                        || msg.contains("500")
                        || msg.contains("502")
                        || msg.contains("503")
                        || msg.contains("504");

                    if should_retry {
                        log::warn!("Retry {}/{} after error: {}", attempt + 1, Self::MAX_RETRIES, e);
                        tokio::time::sleep(delay).await;
                        delay *= 2;
                        attempt += 1;
                    } else {
                        return Err(e);
                    }
                }
                Err(e) => return Err(e),
            }
        }
    }

    /// One raw API request, no retry.
    async fn request(&self, texts: Vec<String>) -> Result<Vec<Vec<f32>>> {
        let request = EmbeddingRequest {
            model: self.model.clone(),
            input: texts,
        };

        let response = self
            .client
            .post("https://api.openai.com/v1/embeddings")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| OntopathError::Embedding(format!("Network error: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());

            return Err(OntopathError::Embedding(format!(
                "Embeddings API error {}: {}",
                status, body
            )));
        }

        let result: EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| OntopathError::Embedding(format!("Failed to parse response: {}", e)))?;

        Ok(result.data.into_iter().map(|d| d.embedding).collect())
    }
}

impl Embedder for OpenAiEmbedder {
    async fn embed_batch(&self, texts: Vec<String>, mode: InstructionMode) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        // Query-mode embeddings repeat across explorations; serve them from
        // the cache when possible. Cache keys are the raw (unframed) texts.
        if mode == InstructionMode::Query {
            if let Some(cache) = &self.cache {
                if texts.len() == 1 {
                    if let Some(cached) = cache.get(&texts[0]) {
                        log::debug!("Embedding cache hit for query: {}", texts[0]);
                        return Ok(vec![cached]);
                    }
                }
            }
        }

        let framed: Vec<String> = texts.iter().map(|t| Self::frame(t, mode)).collect();

        let mut all_embeddings = Vec::with_capacity(framed.len());
        for chunk in framed.chunks(self.batch_size) {
            let embeddings = self.request_with_retry(chunk.to_vec()).await?;
            all_embeddings.extend(embeddings);

            // Small delay between full batches to stay under rate limits
            if chunk.len() == self.batch_size {
                tokio::time::sleep(Duration::from_millis(100)).await;
            }
        }

        if all_embeddings.len() != texts.len() {
            return Err(OntopathError::Embedding(format!(
                "Expected {} embeddings, got {}",
                texts.len(),
                all_embeddings.len()
            )));
        }

        if mode == InstructionMode::Query {
            if let Some(cache) = &self.cache {
                if texts.len() == 1 {
                    cache.put(texts[0].clone(), all_embeddings[0].clone());
                }
            }
        }

        Ok(all_embeddings)
    }
}
