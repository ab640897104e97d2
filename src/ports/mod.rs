//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `VisionProvider` - multimodal model that extracts check fields

mod vision_provider;

pub use vision_provider::{
    AIError, InlineImage, ProviderInfo, RequestMetadata, VisionProvider, VisionRequest,
    VisionResponse,
};
