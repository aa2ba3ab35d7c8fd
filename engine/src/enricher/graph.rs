//! The enricher's cross-chunk relationship graph: two parallel containers
//! (nodes, edges with endpoint ids) rather than a heap-cyclic structure.

use docflux_core::{CancelToken, TextCompletionService};

use crate::enricher::{EnrichmentOptions, KEYWORDS_KEY, SUMMARY_KEY};
use crate::types::DocumentChunk;

/// One node per chunk.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ChunkNode {
    /// The chunk's id.
    pub chunk_id: String,
    /// Summary, if the chunk was enriched.
    pub summary: Option<String>,
    /// Keywords, if the chunk was enriched.
    pub keywords: Vec<String>,
    /// Ancestor section titles.
    pub heading_path: Vec<String>,
}

/// The kind of relationship a [`ChunkEdge`] represents.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum EdgeKind {
    /// Connects chunks adjacent in document order.
    Sequential,
    /// One chunk's heading path is a strict prefix of the other's.
    Hierarchical,
    /// Both chunks mention the same extracted entity within the configured
    /// sequence-distance window.
    SharedEntity,
    /// Discovered by an LLM relationship-finder; carries its own label.
    Llm(String),
}

/// An edge between two chunks, identified by their ids.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ChunkEdge {
    /// Source chunk id.
    pub from: String,
    /// Target chunk id.
    pub to: String,
    /// Relationship kind.
    pub kind: EdgeKind,
    /// Confidence in `[0, 1]`; algorithmic edges are always `1.0`.
    pub confidence: f32,
}

fn entities(text: &str) -> Vec<String> {
    text.split_whitespace()
        .filter(|w| w.chars().next().is_some_and(char::is_uppercase) && w.chars().count() > 2)
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric()).to_string())
        .filter(|w| !w.is_empty())
        .collect()
}

fn is_strict_prefix(path: &[String], of: &[String]) -> bool {
    path.len() < of.len() && path.iter().zip(of.iter()).all(|(a, b)| a == b)
}

fn nodes_from(chunks: &[DocumentChunk]) -> Vec<ChunkNode> {
    chunks
        .iter()
        .map(|c| ChunkNode {
            chunk_id: c.id.clone(),
            summary: c.props.get(SUMMARY_KEY).cloned(),
            keywords: c
                .props
                .get(KEYWORDS_KEY)
                .map(|k| k.split(',').map(str::to_string).filter(|s| !s.is_empty()).collect())
                .unwrap_or_default(),
            heading_path: c.heading_path.clone(),
        })
        .collect()
}

/// Builds the algorithmic portion of the relationship graph: sequential,
/// hierarchical, and shared-entity edges. LLM-discovered edges are added
/// separately by [`discover_llm_edges`].
#[must_use]
pub fn build(chunks: &[DocumentChunk], options: &EnrichmentOptions) -> (Vec<ChunkNode>, Vec<ChunkEdge>) {
    let nodes = nodes_from(chunks);
    let mut edges = Vec::new();

    for window in chunks.windows(2) {
        edges.push(ChunkEdge {
            from: window[0].id.clone(),
            to: window[1].id.clone(),
            kind: EdgeKind::Sequential,
            confidence: 1.0,
        });
    }

    for (i, a) in chunks.iter().enumerate() {
        for b in &chunks[i + 1..] {
            if is_strict_prefix(&a.heading_path, &b.heading_path)
                || is_strict_prefix(&b.heading_path, &a.heading_path)
            {
                edges.push(ChunkEdge {
                    from: a.id.clone(),
                    to: b.id.clone(),
                    kind: EdgeKind::Hierarchical,
                    confidence: 1.0,
                });
            }
        }
    }

    let entity_lists: Vec<Vec<String>> = chunks.iter().map(|c| entities(&c.content)).collect();
    for (i, a_entities) in entity_lists.iter().enumerate() {
        for j in (i + 1)..chunks.len() {
            if j - i > options.shared_entity_window {
                break;
            }
            if a_entities.iter().any(|e| entity_lists[j].contains(e)) {
                edges.push(ChunkEdge {
                    from: chunks[i].id.clone(),
                    to: chunks[j].id.clone(),
                    kind: EdgeKind::SharedEntity,
                    confidence: 1.0,
                });
            }
        }
    }

    cap_edges_per_chunk(&mut edges, options.max_edges_per_chunk);
    (nodes, edges)
}

fn cap_edges_per_chunk(edges: &mut Vec<ChunkEdge>, max_per_chunk: usize) {
    use std::collections::HashMap;
    let mut counts: HashMap<String, usize> = HashMap::new();
    edges.retain(|e| {
        let count = counts.entry(e.from.clone()).or_insert(0);
        *count += 1;
        *count <= max_per_chunk
    });
}

/// Asks `completion` to propose additional relationships between adjacent
/// chunk pairs, keeping only those at or above `options.min_edge_confidence`.
/// A failed call for a pair is simply skipped; it never aborts the batch.
pub async fn discover_llm_edges(
    chunks: &[DocumentChunk],
    completion: &dyn TextCompletionService,
    cancel: &CancelToken,
    options: &EnrichmentOptions,
) -> Vec<ChunkEdge> {
    let mut edges = Vec::new();

    for window in chunks.windows(2) {
        if cancel.is_cancelled() {
            break;
        }
        let prompt = format!(
            "Describe in one word the relationship (if any) between these two excerpts:\n1: {}\n2: {}",
            window[0].content, window[1].content
        );
        if let Ok(label) = completion.generate(&prompt, cancel).await {
            let label = label.trim();
            if !label.is_empty() && !label.eq_ignore_ascii_case("none") {
                edges.push(ChunkEdge {
                    from: window[0].id.clone(),
                    to: window[1].id.clone(),
                    kind: EdgeKind::Llm(label.to_string()),
                    confidence: 0.6,
                });
            }
        }
    }

    edges.retain(|e| e.confidence >= options.min_edge_confidence);
    cap_edges_per_chunk(&mut edges, options.max_edges_per_chunk);
    edges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ChunkQuality, PropertyBag};

    fn chunk(id: &str, content: &str, heading_path: Vec<&str>) -> DocumentChunk {
        DocumentChunk {
            id: id.to_string(),
            content: content.to_string(),
            start: 0,
            end: content.len(),
            page: None,
            heading_path: heading_path.into_iter().map(str::to_string).collect(),
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
    fn adjacent_chunks_get_a_sequential_edge() {
        let chunks = vec![chunk("a", "one", vec![]), chunk("b", "two", vec![])];
        let (_, edges) = build(&chunks, &EnrichmentOptions::default());
        assert!(edges.iter().any(|e| e.kind == EdgeKind::Sequential));
    }

    #[test]
    fn strict_heading_prefix_gets_a_hierarchical_edge() {
        let chunks = vec![chunk("a", "parent text", vec!["A"]), chunk("b", "child text", vec!["A", "A.1"])];
        let (_, edges) = build(&chunks, &EnrichmentOptions::default());
        assert!(edges.iter().any(|e| e.kind == EdgeKind::Hierarchical));
    }

    #[test]
    fn shared_proper_noun_gets_a_shared_entity_edge() {
        let chunks = vec![
            chunk("a", "Paris is a city in France.", vec![]),
            chunk("b", "Tourists visit Paris every year.", vec![]),
        ];
        let (_, edges) = build(&chunks, &EnrichmentOptions::default());
        assert!(edges.iter().any(|e| e.kind == EdgeKind::SharedEntity));
    }

    #[test]
    fn edges_per_chunk_are_capped() {
        let chunks: Vec<DocumentChunk> =
            (0..20).map(|i| chunk(&format!("c{i}"), "Paris text here", vec![])).collect();
        let options = EnrichmentOptions { max_edges_per_chunk: 3, shared_entity_window: 20, ..EnrichmentOptions::default() };
        let (_, edges) = build(&chunks, &options);
        let from_c0 = edges.iter().filter(|e| e.from == "c0").count();
        assert!(from_c0 <= 3);
    }
}
