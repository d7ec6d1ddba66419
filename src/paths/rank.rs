//! Scores candidate paths against a free-text relevance query.

use crate::embeddings::{Embedder, InstructionMode};
use crate::error::Result;
use crate::paths::Path;

/// Additive bonus favoring shorter paths: a path's raw score gains
/// `DEPTH_BIAS_FACTOR / depth`, so at equal semantic similarity a depth-1
/// path outranks a depth-5 path by a factor-of-5 larger bonus.
pub const DEPTH_BIAS_FACTOR: f64 = 0.15;

/// Ranks paths by mean step similarity to a relevance query, softmax-normalized.
pub struct PathRanker<'a, E: Embedder> {
    embedder: &'a E,
}

impl<'a, E: Embedder> PathRanker<'a, E> {
    pub fn new(embedder: &'a E) -> Self {
        Self { embedder }
    }

    /// Rank `paths` against `relevance_query` and return at most `top_n`,
    /// best first, with `score` set to the softmax probability.
    ///
    /// If any embedding call fails or returns nothing, ranking degrades to
    /// ascending-depth order with no scores. That branch is a deliberate
    /// graceful fallback, never an error.
    pub async fn rank(&self, paths: Vec<Path>, relevance_query: &str, top_n: usize) -> Vec<Path> {
        if paths.is_empty() {
            return paths;
        }

        let query_vec = match self
            .embedder
            .embed_batch(vec![relevance_query.to_string()], InstructionMode::Query)
            .await
        {
            Ok(mut vecs) if !vecs.is_empty() && !vecs[0].is_empty() => vecs.remove(0),
            Ok(_) => {
                log::warn!("Empty relevance-query embedding; falling back to depth ordering");
                return fallback_by_depth(paths, top_n);
            }
            Err(e) => {
                log::warn!(
                    "Relevance-query embedding failed ({}); falling back to depth ordering",
                    e
                );
                return fallback_by_depth(paths, top_n);
            }
        };

        let raw_scores = match self.raw_scores(&paths, &query_vec).await {
            Ok(scores) => scores,
            Err(e) => {
                log::warn!(
                    "Step embedding failed ({}); falling back to depth ordering",
                    e
                );
                return fallback_by_depth(paths, top_n);
            }
        };

        // Softmax over the entire candidate set, before truncation
        let probs = softmax(&raw_scores);

        let mut scored: Vec<Path> = paths
            .into_iter()
            .zip(probs)
            .map(|(mut path, prob)| {
                path.score = Some(prob);
                path
            })
            .collect();

        // Stable sort keeps original order for exact ties
        scored.sort_by(|a, b| {
            b.score
                .unwrap_or(0.0)
                .total_cmp(&a.score.unwrap_or(0.0))
        });
        scored.truncate(top_n);
        scored
    }

    /// One batched embedding call per path over its step texts, then
    /// `mean cosine similarity + depth bias`.
    async fn raw_scores(&self, paths: &[Path], query_vec: &[f32]) -> Result<Vec<f64>> {
        let mut raw_scores = Vec::with_capacity(paths.len());

        for path in paths {
            let step_texts: Vec<String> = path
                .steps
                .iter()
                .map(|step| format!("{} {} {}", step.from, step.property, step.to))
                .collect();

            let step_vecs = self
                .embedder
                .embed_batch(step_texts, InstructionMode::Passage)
                .await?;

            if step_vecs.len() != path.steps.len() {
                return Err(crate::error::OntopathError::Embedding(format!(
                    "Expected {} step embeddings, got {}",
                    path.steps.len(),
                    step_vecs.len()
                )));
            }

            let mean_similarity: f64 = step_vecs
                .iter()
                .map(|v| cosine_similarity(query_vec, v) as f64)
                .sum::<f64>()
                / step_vecs.len() as f64;

            raw_scores.push(mean_similarity + DEPTH_BIAS_FACTOR / path.depth as f64);
        }

        Ok(raw_scores)
    }
}

/// Degraded ranking when no embeddings are available: shortest paths first,
/// scores left unset.
fn fallback_by_depth(mut paths: Vec<Path>, top_n: usize) -> Vec<Path> {
    paths.sort_by_key(|path| path.depth);
    paths.truncate(top_n);
    paths
}

fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let mut dot = 0.0f32;
    let mut norm_a = 0.0f32;
    let mut norm_b = 0.0f32;
    for (x, y) in a.iter().zip(b.iter()) {
        dot += x * y;
        norm_a += x * x;
        norm_b += y * y;
    }

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    dot / (norm_a.sqrt() * norm_b.sqrt())
}

/// Max-shifted softmax; the shift cancels out and leaves the distribution
/// unchanged while avoiding overflow for large raw scores.
fn softmax(raw: &[f64]) -> Vec<f64> {
    let max = raw.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = raw.iter().map(|x| (x - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    exps.into_iter().map(|e| e / sum).collect()
}
