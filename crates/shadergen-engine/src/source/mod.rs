//! Shader source ingestion.
//!
//! Sources arrive as two opaque text blobs. The only validation performed here
//! is an emptiness check; syntax is the compiler's business.

mod pair;

pub use pair::{ShaderSourcePair, StageKind};
