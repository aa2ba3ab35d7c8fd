//! Embedding service abstraction.
//!
//! The pipeline never hosts an embedding model itself; it only consumes the
//! similarity contract exposed by whatever the caller injects. This mirrors
//! the other injected capabilities in this crate: the implementation is
//! someone else's concern, the shape of the call is ours.

use async_trait::async_trait;

use crate::error::Result;

/// Intended use of an embedding call.
///
/// Some providers tune the embedding for the purpose it will be used for
/// (e.g. asymmetric query/document embeddings); this lets callers opt in
/// without the pipeline needing to know about provider-specific prompts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbeddingPurpose {
    /// General-purpose analysis (clustering, topic extraction).
    Analysis,
    /// Embedding a query for nearest-neighbor search.
    SemanticSearch,
    /// Embedding a chunk for long-term storage/indexing.
    Storage,
}

/// Converts text into vector representations and compares them.
///
/// This trait abstracts over embedding providers the same way
/// [`TextCompletionService`](crate::TextCompletionService) abstracts over
/// completion providers: the pipeline only ever calls through this
/// interface, never against a concrete model.
#[async_trait]
pub trait EmbeddingService: Send + Sync {
    /// Embeds a single piece of text for the given purpose.
    async fn embed(&self, text: &str, purpose: EmbeddingPurpose) -> Result<Vec<f32>>;

    /// Embeds a batch of texts in one call when
    /// [`supports_batch`](Self::supports_batch) is `true`; falls back to
    /// sequential [`embed`](Self::embed) calls otherwise.
    async fn embed_batch(&self, texts: &[String], purpose: EmbeddingPurpose) -> Result<Vec<Vec<f32>>> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text, purpose).await?);
        }
        Ok(out)
    }

    /// Cosine similarity between two embeddings, clamped to `[0, 1]`.
    fn cosine(&self, a: &[f32], b: &[f32]) -> f32 {
        cosine_similarity(a, b)
    }

    /// The fixed length of vectors returned by [`embed`](Self::embed).
    fn dimension(&self) -> usize;

    /// Maximum input length, in tokens, accepted by the provider.
    fn max_tokens(&self) -> usize;

    /// Whether [`embed_batch`](Self::embed_batch) is implemented as a true
    /// batch call rather than the sequential default.
    fn supports_batch(&self) -> bool {
        false
    }
}

/// Computes cosine similarity between two vectors, clamped to `[0, 1]`.
///
/// Negative cosine similarity is clamped to 0 because the pipeline treats
/// embedding similarity as a relatedness score, not a signed correlation.
#[must_use]
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let (mut dot, mut norm_a, mut norm_b) = (0.0f32, 0.0f32, 0.0f32);
    for (lhs, rhs) in a.iter().zip(b) {
        dot += lhs * rhs;
        norm_a += lhs * lhs;
        norm_b += rhs * rhs;
    }
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    (dot / (norm_a.sqrt() * norm_b.sqrt())).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_are_maximally_similar() {
        let v = vec![0.5, 0.2, 0.9];
        assert!((cosine_similarity(&v, &v) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn orthogonal_vectors_have_zero_similarity() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 1.0]), 0.0);
    }

    #[test]
    fn opposite_vectors_clamp_to_zero() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[-1.0, 0.0]), 0.0);
    }

    #[test]
    fn zero_vector_is_defined_as_zero_similarity() {
        assert_eq!(cosine_similarity(&[0.0, 0.0], &[1.0, 1.0]), 0.0);
    }

    struct MockEmbedder;

    #[async_trait]
    impl EmbeddingService for MockEmbedder {
        async fn embed(&self, text: &str, _purpose: EmbeddingPurpose) -> Result<Vec<f32>> {
            Ok(vec![text.len() as f32, 1.0])
        }

        fn dimension(&self) -> usize {
            2
        }

        fn max_tokens(&self) -> usize {
            8192
        }
    }

    #[tokio::test]
    async fn default_batch_falls_back_to_sequential() {
        let embedder = MockEmbedder;
        let texts = vec!["a".to_string(), "bb".to_string()];
        let out = embedder
            .embed_batch(&texts, EmbeddingPurpose::Storage)
            .await
            .unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0][0], 1.0);
        assert_eq!(out[1][0], 2.0);
        assert!(!embedder.supports_batch());
    }
}
