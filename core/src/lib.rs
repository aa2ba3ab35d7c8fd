//! # docflux-core
//!
//! Narrow trait abstractions for the capabilities the
//! [`docflux-engine`](https://docs.rs/docflux-engine) pipeline requires from
//! the outside world: text completion, image-to-text, and embeddings. The
//! pipeline depends only on these traits; concrete providers (OpenAI,
//! a local model, a test double) live entirely on the implementer's side.
//!
//! ```text
//! ┌──────────────┐    ┌────────────────────┐    ┌───────────────┐
//! │  docflux     │───▶│    docflux-core    │◀───│   Providers   │
//! │  pipeline    │    │   (this crate)     │    │               │
//! │              │    │                    │    │ - your LLM    │
//! │ - parser     │    │ - TextCompletion   │    │ - your OCR    │
//! │ - enricher   │    │ - ImageToText      │    │ - your        │
//! │ - cache      │    │ - Embedding        │    │   embedder    │
//! └──────────────┘    └────────────────────┘    └───────────────┘
//! ```

mod cancel;
pub mod embedding;
pub mod error;
pub mod image_to_text;
pub mod text_completion;

pub use cancel::CancelToken;
pub use embedding::{EmbeddingPurpose, EmbeddingService};
pub use error::{CapabilityError, Result};
pub use image_to_text::{
    ImageSource, ImageToTextOptions, ImageToTextResult, ImageToTextService,
};
pub use text_completion::{
    MetadataExtraction, QualityAssessment, StructureAnalysis, StructureSection,
    SummaryResult, TextCompletionService,
};
