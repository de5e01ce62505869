use std::fmt;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::{EngineError, EngineResult};

/// Pipeline stage a source blob belongs to.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum StageKind {
    Vertex,
    Fragment,
}

impl StageKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            StageKind::Vertex => "vertex",
            StageKind::Fragment => "fragment",
        }
    }
}

impl fmt::Display for StageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

static NEXT_GENERATION: AtomicU64 = AtomicU64::new(1);

/// Immutable vertex + fragment source pair.
///
/// Identity is the `generation`, not the text: two pairs with identical
/// contents are still distinct submissions and each triggers a full rebuild.
#[derive(Debug, Clone)]
pub struct ShaderSourcePair {
    vertex: String,
    fragment: String,
    generation: u64,
}

impl ShaderSourcePair {
    /// Accepts a new pair, rejecting empty or whitespace-only stages.
    pub fn new(vertex: impl Into<String>, fragment: impl Into<String>) -> EngineResult<Self> {
        let vertex = vertex.into();
        let fragment = fragment.into();

        if vertex.trim().is_empty() {
            return Err(EngineError::EmptySource { stage: StageKind::Vertex });
        }
        if fragment.trim().is_empty() {
            return Err(EngineError::EmptySource { stage: StageKind::Fragment });
        }

        Ok(Self {
            vertex,
            fragment,
            generation: NEXT_GENERATION.fetch_add(1, Ordering::Relaxed),
        })
    }

    /// Reads both stages from disk.
    pub fn from_files(vertex: &Path, fragment: &Path) -> EngineResult<Self> {
        let read = |path: &Path| {
            std::fs::read_to_string(path).map_err(|source| EngineError::SourceRead {
                path: path.to_path_buf(),
                source,
            })
        };
        Self::new(read(vertex)?, read(fragment)?)
    }

    pub fn vertex(&self) -> &str {
        &self.vertex
    }

    pub fn fragment(&self) -> &str {
        &self.fragment
    }

    pub fn source(&self, stage: StageKind) -> &str {
        match stage {
            StageKind::Vertex => &self.vertex,
            StageKind::Fragment => &self.fragment,
        }
    }

    /// Monotonic submission id.
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_blank_vertex() {
        let err = ShaderSourcePair::new("  \n\t", "void main() {}").unwrap_err();
        assert!(matches!(err, EngineError::EmptySource { stage: StageKind::Vertex }));
    }

    #[test]
    fn rejects_empty_fragment() {
        let err = ShaderSourcePair::new("void main() {}", "").unwrap_err();
        assert!(matches!(err, EngineError::EmptySource { stage: StageKind::Fragment }));
    }

    #[test]
    fn identical_text_gets_distinct_generations() {
        let a = ShaderSourcePair::new("v", "f").unwrap();
        let b = ShaderSourcePair::new("v", "f").unwrap();
        assert!(b.generation() > a.generation());
        assert_eq!(a.vertex(), b.vertex());
    }

    #[test]
    fn source_by_stage() {
        let pair = ShaderSourcePair::new("vs", "fs").unwrap();
        assert_eq!(pair.source(StageKind::Vertex), "vs");
        assert_eq!(pair.source(StageKind::Fragment), "fs");
    }

    #[test]
    fn missing_file_reports_path() {
        let missing = Path::new("/nonexistent/shadergen/vertex.glsl");
        let err = ShaderSourcePair::from_files(missing, missing).unwrap_err();
        match err {
            EngineError::SourceRead { path, .. } => assert_eq!(path, missing),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
