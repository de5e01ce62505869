use shadergen_engine::backend::ContextVersion;
use shadergen_engine::backend::recording::{Call, RecordingBackend};
use shadergen_engine::schedule::{FrameOutcome, LoopState, ManualFrameRequester};
use shadergen_engine::session::SurfaceSize;
use shadergen_engine::{EngineConfig, Severity, ShaderEngine, ShaderSourcePair};

const SIZE: SurfaceSize = SurfaceSize::new(320, 240);

const VS: &str = "attribute vec2 a_pos;\nvoid main() { gl_Position = vec4(a_pos, 0.0, 1.0); }";
const FS_RED: &str = "void main() { gl_FragColor = vec4(1.0, 0.0, 0.0, 1.0); }";
const FS_BLUE: &str = "void main() { gl_FragColor = vec4(0.0, 0.0, 1.0, 1.0); }";

fn setup(version: ContextVersion) -> (ShaderEngine<RecordingBackend>, ManualFrameRequester) {
    let backend = RecordingBackend::with_version(version);
    let frames = ManualFrameRequester::with_journal(backend.journal());
    (ShaderEngine::new(backend, EngineConfig::default()), frames)
}

fn pair(fs: &str) -> ShaderSourcePair {
    ShaderSourcePair::new(VS, fs).unwrap()
}

fn program_of(engine: &ShaderEngine<RecordingBackend>) -> u32 {
    engine.session().map(|s| s.program().handle()).unwrap()
}

#[test]
fn replacement_stops_old_loop_before_new_one_runs() {
    let (mut engine, mut frames) = setup(ContextVersion::Modern);
    engine.submit(&pair(FS_RED), SIZE, &mut frames).unwrap();
    let token = frames.next_due().unwrap();
    engine.frame(token, &mut frames);

    let program_a = program_of(&engine);
    let pending_a = frames.outstanding().unwrap();

    engine.submit(&pair(FS_BLUE), SIZE, &mut frames).unwrap();
    let program_b = program_of(&engine);
    assert_ne!(program_a, program_b);
    assert_eq!(engine.loop_state(), Some(LoopState::Running));
    assert_eq!(frames.cancelled(), vec![pending_a]);

    let journal = engine.backend().journal();
    let a_stopped = journal.position(|c| *c == Call::FrameCancelled(pending_a)).unwrap();
    let a_deleted = journal.position(|c| *c == Call::DeleteProgram(program_a)).unwrap();
    let b_created = journal.position(|c| *c == Call::CreateProgram(program_b)).unwrap();
    let b_running = journal
        .position(|c| matches!(c, Call::FrameRequested(t) if t.id() > pending_a.id()))
        .unwrap();
    assert!(a_stopped < a_deleted);
    assert!(a_deleted < b_created);
    assert!(b_created < b_running);
}

#[test]
fn late_callback_from_replaced_session_is_ignored() {
    let (mut engine, mut frames) = setup(ContextVersion::Modern);
    engine.submit(&pair(FS_RED), SIZE, &mut frames).unwrap();
    let stale = frames.outstanding().unwrap();

    engine.submit(&pair(FS_BLUE), SIZE, &mut frames).unwrap();
    let program_b = program_of(&engine);
    let before = engine.backend().calls().len();

    // The platform delivers A's callback anyway.
    assert_eq!(engine.frame(stale, &mut frames), FrameOutcome::Skipped);
    assert_eq!(engine.backend().calls().len(), before);

    // B keeps drawing with its own program.
    let token = frames.next_due().unwrap();
    assert!(matches!(engine.frame(token, &mut frames), FrameOutcome::Drawn { .. }));
    let last_draw = engine
        .backend()
        .calls()
        .into_iter()
        .rev()
        .find(|c| matches!(c, Call::Draw { .. }))
        .unwrap();
    assert_eq!(last_draw, Call::Draw { program: Some(program_b), vertices: 4 });
    assert!(engine.backend().violations().is_empty());
}

#[test]
fn callback_after_shutdown_is_ignored() {
    let (mut engine, mut frames) = setup(ContextVersion::Modern);
    engine.submit(&pair(FS_RED), SIZE, &mut frames).unwrap();
    let token = frames.outstanding().unwrap();

    assert!(engine.shutdown(&mut frames));
    assert!(frames.outstanding().is_none());
    assert_eq!(engine.frame(token, &mut frames), FrameOutcome::Skipped);
    assert_eq!(engine.backend().draw_count(), 0);
}

#[test]
fn double_teardown_frees_once() {
    let (mut engine, mut frames) = setup(ContextVersion::Modern);
    engine.submit(&pair(FS_RED), SIZE, &mut frames).unwrap();

    assert!(engine.shutdown(&mut frames));
    let after_first = engine.backend().calls().len();
    assert!(!engine.shutdown(&mut frames));

    assert_eq!(engine.backend().calls().len(), after_first);
    assert_eq!(engine.backend().live_objects(), 0);
    assert!(engine.backend().violations().is_empty());
    assert_eq!(engine.loop_state(), None);
}

#[test]
fn many_replacements_keep_one_live_program() {
    let (mut engine, mut frames) = setup(ContextVersion::Modern);
    for i in 0..8 {
        let fs = if i % 2 == 0 { FS_RED } else { FS_BLUE };
        engine.submit(&pair(fs), SIZE, &mut frames).unwrap();
        let token = frames.next_due().unwrap();
        engine.frame(token, &mut frames);

        assert_eq!(engine.backend().live_programs(), 1);
        assert_eq!(engine.backend().live_buffers(), 1);
    }
    assert_eq!(engine.teardown_count(), 7);
}

#[test]
fn legacy_context_renders_without_vertex_array() {
    let (mut engine, mut frames) = setup(ContextVersion::Legacy);
    engine.submit(&pair(FS_RED), SIZE, &mut frames).unwrap();
    let token = frames.next_due().unwrap();
    assert!(matches!(engine.frame(token, &mut frames), FrameOutcome::Drawn { .. }));

    assert!(!engine.backend().calls().iter().any(|c| matches!(c, Call::CreateVertexArray(_))));
    let status = engine.status().unwrap();
    assert_eq!(status.severity, Severity::Warning);
    assert!(status.to_string().starts_with("warning: "));
}

#[test]
fn generations_are_distinct_for_identical_text() {
    let a = pair(FS_RED);
    let b = pair(FS_RED);
    assert_ne!(a.generation(), b.generation());
    assert_eq!(a.vertex(), b.vertex());
}
