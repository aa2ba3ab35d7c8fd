//! Quality engine: computes chunking/density/structure metric bundles for a
//! chunk sequence, folds them into an overall score, and emits
//! threshold-triggered recommendations.

pub mod chunking;
pub mod context;
pub mod density;
pub mod structure;

pub use chunking::ChunkingQuality;
pub use density::DensityQuality;
pub use structure::StructureQuality;

use crate::types::DocumentChunk;

/// How urgently a [`Recommendation`] should be acted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum Priority {
    /// Worth considering.
    Low,
    /// Should be addressed soon.
    Medium,
    /// Materially hurting retrieval quality.
    High,
}

/// A single actionable suggestion emitted when a metric crosses its
/// configured threshold.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct Recommendation {
    /// Name of the metric that triggered this recommendation.
    pub metric: String,
    /// Human-readable description of the issue.
    pub message: String,
    /// Urgency of the fix.
    pub priority: Priority,
    /// Estimated fractional improvement to the overall score if addressed.
    pub expected_improvement: f32,
    /// Suggested parameter change, if any (e.g. `"max_chunk_size: 512 -> 384"`).
    pub suggested_change: Option<String>,
}

/// The full quality assessment for a document's chunk sequence.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct QualityReport {
    /// Chunking-quality bundle.
    pub chunking: ChunkingQuality,
    /// Information-density bundle.
    pub density: DensityQuality,
    /// Structural-coherence bundle.
    pub structure: StructureQuality,
    /// `0.4 * chunking + 0.3 * density(redundancy inverted) + 0.3 * structure`.
    pub overall: f32,
    /// Threshold-triggered improvement suggestions.
    pub recommendations: Vec<Recommendation>,
}

fn density_mean_with_redundancy_inverted(density: &DensityQuality) -> f32 {
    let redundancy_inverted = 1.0 - density.redundancy_level;
    (density.meaningful_word_ratio
        + density.keyword_richness
        + density.factual_content_ratio
        + redundancy_inverted)
        / 4.0
}

fn build_recommendations(chunking: &ChunkingQuality, density: &DensityQuality, structure: &StructureQuality) -> Vec<Recommendation> {
    let mut out = Vec::new();

    if chunking.size_distribution < 0.7 {
        out.push(Recommendation {
            metric: "size_distribution".to_string(),
            message: "chunk sizes vary widely; narrow the max/min gap".to_string(),
            priority: Priority::Medium,
            expected_improvement: 0.7 - chunking.size_distribution,
            suggested_change: Some("reduce max_chunk_size variance across strategies".to_string()),
        });
    }
    if chunking.boundary_quality < 0.6 {
        out.push(Recommendation {
            metric: "boundary_quality".to_string(),
            message: "many chunk boundaries split mid-sentence".to_string(),
            priority: Priority::High,
            expected_improvement: 0.6 - chunking.boundary_quality,
            suggested_change: Some("switch to a sentence-boundary-respecting strategy".to_string()),
        });
    }
    if density.redundancy_level > 0.7 {
        out.push(Recommendation {
            metric: "redundancy_level".to_string(),
            message: "adjacent chunks overlap too heavily in content".to_string(),
            priority: Priority::Medium,
            expected_improvement: density.redundancy_level - 0.7,
            suggested_change: Some("reduce overlap_size".to_string()),
        });
    }
    if structure.structure_preservation < 0.7 {
        out.push(Recommendation {
            metric: "structure_preservation".to_string(),
            message: "few chunks retain heading or list markers".to_string(),
            priority: Priority::Low,
            expected_improvement: 0.7 - structure.structure_preservation,
            suggested_change: Some("enable preserve_structure".to_string()),
        });
    }

    out
}

/// Assesses the full quality report for a chunk sequence.
#[must_use]
pub fn assess(chunks: &[DocumentChunk]) -> QualityReport {
    let chunking = chunking::assess(chunks);
    let density = density::assess(chunks);
    let structure = structure::assess(chunks);

    let overall = 0.4 * chunking.mean()
        + 0.3 * density_mean_with_redundancy_inverted(&density)
        + 0.3 * ((structure.structure_preservation
            + structure.context_continuity
            + structure.reference_integrity
            + structure.metadata_richness)
            / 4.0);

    let recommendations = build_recommendations(&chunking, &density, &structure);

    QualityReport { chunking, density, structure, overall: overall.clamp(0.0, 1.0), recommendations }
}

/// Fills in each chunk's [`ChunkQuality`] completeness/coherence/density
/// fields from the document-wide bundles, and its context-dependency score
/// from the per-chunk text.
pub fn annotate_chunks(chunks: &mut [DocumentChunk], language_code: &str) {
    let report = assess(chunks);
    for chunk in chunks.iter_mut() {
        chunk.quality.completeness = report.chunking.completeness;
        chunk.quality.coherence = report.chunking.boundary_quality;
        chunk.quality.density = report.density.meaningful_word_ratio;
    }
    context::annotate(chunks, language_code);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChunkQuality, PropertyBag};

    fn chunk(content: &str) -> DocumentChunk {
        DocumentChunk {
            id: "c".into(),
            content: content.to_string(),
            start: 0,
            end: content.len(),
            page: None,
            heading_path: vec![],
            sequence: 0,
            total: 1,
            quality: ChunkQuality::default(),
            strategy: "fixed".into(),
            tokens: 0,
            props: PropertyBag::new(),
            parent_id: None,
        }
    }

    #[test]
    fn overall_score_stays_within_bounds() {
        let chunks = vec![
            chunk("The system processes documents reliably and efficiently."),
            chunk("However the pipeline then validates every output chunk."),
        ];
        let report = assess(&chunks);
        assert!(report.overall >= 0.0 && report.overall <= 1.0);
    }

    #[test]
    fn low_boundary_quality_triggers_a_recommendation() {
        let chunks = vec![chunk("lowercase start no period"), chunk("another fragment no end")];
        let report = assess(&chunks);
        assert!(report.recommendations.iter().any(|r| r.metric == "boundary_quality"));
    }

    #[test]
    fn annotate_chunks_populates_per_chunk_fields() {
        let mut chunks = vec![chunk("Some text that ends cleanly.")];
        annotate_chunks(&mut chunks, "en");
        assert!(chunks[0].quality.context_dependency >= 0.0);
    }
}
