use shadergen_engine::backend::recording::{Call, RecordingBackend, UniformValue};
use shadergen_engine::schedule::{FrameOutcome, LoopState, ManualFrameRequester};
use shadergen_engine::session::SurfaceSize;
use shadergen_engine::{EngineConfig, EngineError, ShaderEngine, ShaderSourcePair, StageKind};

const SIZE: SurfaceSize = SurfaceSize::new(800, 600);

const QUAD_VS: &str = r#"
attribute vec2 position;

void main() {
    gl_Position = vec4(position, 0.0, 1.0);
}
"#;

const SOLID_FS: &str = r#"
precision mediump float;

void main() {
    gl_FragColor = vec4(1.0, 0.5, 0.0, 1.0);
}
"#;

const ANIMATED_FS: &str = r#"
precision mediump float;
uniform float u_time;
uniform vec2 u_resolution;

void main() {
    vec2 uv = gl_FragCoord.xy / u_resolution;
    gl_FragColor = vec4(uv, 0.5 + 0.5 * sin(u_time), 1.0);
}
"#;

struct Harness {
    engine: ShaderEngine<RecordingBackend>,
    frames: ManualFrameRequester,
}

impl Harness {
    fn new() -> Self {
        let backend = RecordingBackend::new();
        let frames = ManualFrameRequester::with_journal(backend.journal());
        Self { engine: ShaderEngine::new(backend, EngineConfig::default()), frames }
    }

    fn submit(&mut self, vertex: &str, fragment: &str) -> Result<(), EngineError> {
        let pair = ShaderSourcePair::new(vertex, fragment)?;
        self.engine.submit(&pair, SIZE, &mut self.frames)
    }

    /// Delivers the next scheduled frame, if any.
    fn tick(&mut self) -> Option<FrameOutcome> {
        let token = self.frames.next_due()?;
        Some(self.engine.frame(token, &mut self.frames))
    }

    fn backend(&self) -> &RecordingBackend {
        self.engine.backend()
    }
}

#[test]
fn solid_color_quad_renders_every_frame() {
    let mut h = Harness::new();
    h.submit(QUAD_VS, SOLID_FS).unwrap();
    assert_eq!(h.engine.loop_state(), Some(LoopState::Running));

    for _ in 0..10 {
        assert!(matches!(h.tick(), Some(FrameOutcome::Drawn { .. })));
    }

    let calls = h.backend().calls();
    let draws: Vec<_> = calls.iter().filter(|c| matches!(c, Call::Draw { .. })).collect();
    assert_eq!(draws.len(), 10);
    assert!(draws.iter().all(|c| matches!(c, Call::Draw { program: Some(_), vertices: 4 })));
    assert!(!calls.iter().any(|c| matches!(c, Call::Uniform { .. })));
    assert!(h.backend().violations().is_empty());
}

#[test]
fn time_uniform_increases_across_frames() {
    let mut h = Harness::new();
    h.submit(QUAD_VS, ANIMATED_FS).unwrap();

    let mut drawn = Vec::new();
    for _ in 0..6 {
        match h.tick() {
            Some(FrameOutcome::Drawn { elapsed }) => drawn.push(elapsed),
            other => panic!("expected a drawn frame, got {other:?}"),
        }
    }
    assert!(drawn.windows(2).all(|w| w[0] < w[1]), "{drawn:?}");

    let uploaded: Vec<f32> = h
        .backend()
        .uniform_values("u_time")
        .into_iter()
        .filter_map(|v| match v {
            UniformValue::F32(t) => Some(t),
            _ => None,
        })
        .collect();
    assert_eq!(uploaded, drawn);

    let resolution = h.backend().uniform_values("u_resolution");
    assert_eq!(resolution.len(), 6);
    assert!(resolution.iter().all(|v| *v == UniformValue::Vec2([800.0, 600.0])));
}

#[test]
fn vertex_syntax_error_never_draws() {
    let mut h = Harness::new();
    let broken = "attribute vec2 position;\nvoid main( {\n    gl_Position = vec4(position, 0.0, 1.0);\n}";

    match h.submit(broken, SOLID_FS) {
        Err(EngineError::Compile { stage: StageKind::Vertex, log }) => {
            assert!(!log.trim().is_empty());
        }
        other => panic!("expected a vertex compile error, got {other:?}"),
    }

    assert!(h.tick().is_none());
    assert_eq!(h.backend().draw_count(), 0);
    assert!(h.engine.session().is_none());
}

#[test]
fn undeclared_attribute_fails_with_fallback_name() {
    let mut h = Harness::new();
    let vs = "#version 300 es\nin vec2 vtx;\nvoid main() { gl_Position = vec4(vtx, 0.0, 1.0); }";
    let fs = "#version 300 es\nprecision mediump float;\nout vec4 color;\nvoid main() { color = vec4(1.0); }";

    let err = h.submit(vs, fs).unwrap_err();
    assert!(matches!(&err, EngineError::AttributeNotFound { name } if name == "position"));
    assert!(err.to_string().contains("attribute vec2 position;"));
    assert_eq!(h.engine.status().map(|s| s.text.as_str()), Some(err.to_string().as_str()));
}

#[test]
fn compile_failures_leak_nothing() {
    let cases = [
        ("void main() {", SOLID_FS),
        (QUAD_VS, "void main() { gl_FragColor = vec4(1.0; }"),
        ("attribute vec2 position;", SOLID_FS),
    ];

    for (vs, fs) in cases {
        let mut h = Harness::new();
        let err = h.submit(vs, fs).unwrap_err();
        assert!(matches!(err, EngineError::Compile { .. }), "{err}");
        assert_eq!(h.backend().live_shaders(), 0);
        assert_eq!(h.backend().live_programs(), 0);
        assert_eq!(h.backend().live_buffers(), 0);
        assert!(h.backend().violations().is_empty());
    }
}

#[test]
fn link_failure_releases_both_stages() {
    let mut h = Harness::new();
    h.backend().fail_links_with("ERROR: too many varyings");

    match h.submit(QUAD_VS, SOLID_FS) {
        Err(EngineError::Link { log }) => assert!(log.contains("varyings")),
        other => panic!("expected a link error, got {other:?}"),
    }
    assert_eq!(h.backend().live_objects(), 0);
}

#[test]
fn empty_source_is_rejected_before_any_gl_work() {
    let err = ShaderSourcePair::new(QUAD_VS, "  \n\t").unwrap_err();
    assert!(matches!(err, EngineError::EmptySource { stage: StageKind::Fragment }));
}
