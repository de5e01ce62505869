//! Software [`GraphicsBackend`] that records every call.
//!
//! Compilation is simulated with a shallow syntax check (a `main` entry point
//! and balanced delimiters), and attribute/uniform lookup scans the stage
//! sources for top-level declarations. Object lifetimes are tracked exactly,
//! so leak and use-after-delete checks are precise.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use crate::schedule::FrameToken;
use crate::session::SurfaceSize;
use crate::source::StageKind;

use super::{ContextVersion, GraphicsBackend};

pub type ObjectId = u32;

#[derive(Debug, Clone, PartialEq)]
pub enum UniformValue {
    F32(f32),
    Vec2([f32; 2]),
    Mat4([f32; 16]),
}

/// One observable side effect, in issue order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateShader { shader: ObjectId, stage: StageKind },
    CompileShader { shader: ObjectId, ok: bool },
    DeleteShader(ObjectId),
    CreateProgram(ObjectId),
    LinkProgram { program: ObjectId, ok: bool },
    DeleteProgram(ObjectId),
    CreateBuffer(ObjectId),
    DeleteBuffer(ObjectId),
    CreateVertexArray(ObjectId),
    DeleteVertexArray(ObjectId),
    BeginFrame(SurfaceSize),
    UseProgram(ObjectId),
    BindAttribute { location: u32, buffer: ObjectId, components: i32 },
    Uniform { name: String, value: UniformValue },
    Draw { program: Option<ObjectId>, vertices: i32 },
    FrameRequested(FrameToken),
    FrameCancelled(FrameToken),
}

/// Shared, append-only call log.
///
/// Clone it into a `ManualFrameRequester` to interleave scheduling events
/// with GL calls on one timeline.
#[derive(Debug, Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Call>>>);

impl Journal {
    pub fn push(&self, call: Call) {
        self.0.borrow_mut().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.borrow().clone()
    }

    pub fn clear(&self) {
        self.0.borrow_mut().clear();
    }

    /// Index of the first call matching `pred`.
    pub fn position(&self, pred: impl Fn(&Call) -> bool) -> Option<usize> {
        self.0.borrow().iter().position(pred)
    }
}

/// Uniform handle: the owning program plus the declared name.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedUniform {
    pub program: ObjectId,
    pub name: String,
}

struct ShaderObject {
    stage: StageKind,
    source: String,
    compiled: bool,
    log: String,
}

struct ProgramObject {
    linked: bool,
    log: String,
    attributes: Vec<String>,
    uniforms: Vec<String>,
}

#[derive(Default)]
struct State {
    next_id: ObjectId,
    shaders: HashMap<ObjectId, ShaderObject>,
    programs: HashMap<ObjectId, ProgramObject>,
    buffers: HashSet<ObjectId>,
    vertex_arrays: HashSet<ObjectId>,
    current_program: Option<ObjectId>,
    violations: Vec<String>,
    fail_link: Option<String>,
    fail_buffer: bool,
}

impl State {
    fn alloc(&mut self) -> ObjectId {
        self.next_id += 1;
        self.next_id
    }
}

pub struct RecordingBackend {
    version: ContextVersion,
    state: RefCell<State>,
    journal: Journal,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::with_version(ContextVersion::Modern)
    }

    pub fn with_version(version: ContextVersion) -> Self {
        Self {
            version,
            state: RefCell::new(State::default()),
            journal: Journal::default(),
        }
    }

    pub fn journal(&self) -> Journal {
        self.journal.clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.journal.calls()
    }

    /// Makes every subsequent link fail with `log`.
    pub fn fail_links_with(&self, log: impl Into<String>) {
        self.state.borrow_mut().fail_link = Some(log.into());
    }

    /// Makes every subsequent buffer allocation fail.
    pub fn fail_buffer_creation(&self, fail: bool) {
        self.state.borrow_mut().fail_buffer = fail;
    }

    pub fn live_shaders(&self) -> usize {
        self.state.borrow().shaders.len()
    }

    pub fn live_programs(&self) -> usize {
        self.state.borrow().programs.len()
    }

    pub fn live_buffers(&self) -> usize {
        self.state.borrow().buffers.len()
    }

    /// Every GL object still allocated.
    pub fn live_objects(&self) -> usize {
        let s = self.state.borrow();
        s.shaders.len() + s.programs.len() + s.buffers.len() + s.vertex_arrays.len()
    }

    /// Double deletes and uses of deleted objects, in the order they happened.
    pub fn violations(&self) -> Vec<String> {
        self.state.borrow().violations.clone()
    }

    pub fn draw_count(&self) -> usize {
        self.calls()
            .iter()
            .filter(|c| matches!(c, Call::Draw { .. }))
            .count()
    }

    /// Values uploaded to the uniform called `name`, oldest first.
    pub fn uniform_values(&self, name: &str) -> Vec<UniformValue> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Uniform { name: n, value } if n == name => Some(value),
                _ => None,
            })
            .collect()
    }

    fn violation(&self, msg: String) {
        self.state.borrow_mut().violations.push(msg);
    }
}

impl Default for RecordingBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphicsBackend for RecordingBackend {
    type Shader = ObjectId;
    type Program = ObjectId;
    type Buffer = ObjectId;
    type VertexArray = ObjectId;
    type UniformLocation = RecordedUniform;

    fn context_version(&self) -> ContextVersion {
        self.version
    }

    fn create_shader(&self, stage: StageKind) -> Result<ObjectId, String> {
        let mut s = self.state.borrow_mut();
        let id = s.alloc();
        s.shaders.insert(
            id,
            ShaderObject { stage, source: String::new(), compiled: false, log: String::new() },
        );
        self.journal.push(Call::CreateShader { shader: id, stage });
        Ok(id)
    }

    fn compile_shader(&self, shader: ObjectId, source: &str) -> bool {
        if !self.state.borrow().shaders.contains_key(&shader) {
            self.violation(format!("compile of deleted shader {shader}"));
            return false;
        }
        let ok = {
            let mut s = self.state.borrow_mut();
            let Some(obj) = s.shaders.get_mut(&shader) else {
                return false;
            };
            obj.source = source.to_string();
            match check_syntax(source) {
                Ok(()) => {
                    obj.compiled = true;
                    obj.log.clear();
                }
                Err(log) => {
                    obj.compiled = false;
                    obj.log = log;
                }
            }
            obj.compiled
        };
        self.journal.push(Call::CompileShader { shader, ok });
        ok
    }

    fn shader_info_log(&self, shader: ObjectId) -> String {
        self.state
            .borrow()
            .shaders
            .get(&shader)
            .map(|o| o.log.clone())
            .unwrap_or_default()
    }

    fn delete_shader(&self, shader: ObjectId) {
        if self.state.borrow_mut().shaders.remove(&shader).is_none() {
            self.violation(format!("double delete of shader {shader}"));
        }
        self.journal.push(Call::DeleteShader(shader));
    }

    fn create_program(&self) -> Result<ObjectId, String> {
        let mut s = self.state.borrow_mut();
        let id = s.alloc();
        s.programs.insert(
            id,
            ProgramObject {
                linked: false,
                log: String::new(),
                attributes: Vec::new(),
                uniforms: Vec::new(),
            },
        );
        self.journal.push(Call::CreateProgram(id));
        Ok(id)
    }

    fn link_program(&self, program: ObjectId, vertex: ObjectId, fragment: ObjectId) -> bool {
        let ok = {
            let mut guard = self.state.borrow_mut();
            let s = &mut *guard;

            let stages = (s.shaders.get(&vertex), s.shaders.get(&fragment));
            let outcome = match stages {
                (Some(vs), Some(fs)) => {
                    if let Some(log) = &s.fail_link {
                        Err(log.clone())
                    } else if !(vs.compiled && fs.compiled) {
                        Err("ERROR: one or more attached shaders not successfully compiled".into())
                    } else if vs.stage != StageKind::Vertex || fs.stage != StageKind::Fragment {
                        Err("ERROR: attached shader stages do not form a pipeline".into())
                    } else {
                        let mut uniforms = declared_names(&vs.source, "uniform");
                        for name in declared_names(&fs.source, "uniform") {
                            if !uniforms.contains(&name) {
                                uniforms.push(name);
                            }
                        }
                        Ok((vertex_inputs(&vs.source), uniforms))
                    }
                }
                _ => Err("ERROR: attached shader was deleted".into()),
            };

            match s.programs.get_mut(&program) {
                Some(p) => {
                    match outcome {
                        Ok((attributes, uniforms)) => {
                            p.linked = true;
                            p.attributes = attributes;
                            p.uniforms = uniforms;
                        }
                        Err(log) => {
                            p.linked = false;
                            p.log = log;
                        }
                    }
                    p.linked
                }
                None => {
                    s.violations.push(format!("link of deleted program {program}"));
                    false
                }
            }
        };
        self.journal.push(Call::LinkProgram { program, ok });
        ok
    }

    fn program_info_log(&self, program: ObjectId) -> String {
        self.state
            .borrow()
            .programs
            .get(&program)
            .map(|p| p.log.clone())
            .unwrap_or_default()
    }

    fn delete_program(&self, program: ObjectId) {
        {
            let mut s = self.state.borrow_mut();
            if s.programs.remove(&program).is_none() {
                s.violations.push(format!("double delete of program {program}"));
            }
            if s.current_program == Some(program) {
                s.current_program = None;
            }
        }
        self.journal.push(Call::DeleteProgram(program));
    }

    fn attrib_location(&self, program: ObjectId, name: &str) -> Option<u32> {
        let s = self.state.borrow();
        let p = s.programs.get(&program).filter(|p| p.linked)?;
        p.attributes.iter().position(|a| a == name).map(|i| i as u32)
    }

    fn uniform_location(&self, program: ObjectId, name: &str) -> Option<RecordedUniform> {
        let s = self.state.borrow();
        let p = s.programs.get(&program).filter(|p| p.linked)?;
        p.uniforms
            .iter()
            .any(|u| u == name)
            .then(|| RecordedUniform { program, name: name.to_string() })
    }

    fn create_vertex_buffer(&self, data: &[u8]) -> Result<ObjectId, String> {
        let mut s = self.state.borrow_mut();
        if s.fail_buffer {
            return Err("out of memory".into());
        }
        if data.is_empty() {
            return Err("empty buffer data".into());
        }
        let id = s.alloc();
        s.buffers.insert(id);
        self.journal.push(Call::CreateBuffer(id));
        Ok(id)
    }

    fn delete_buffer(&self, buffer: ObjectId) {
        if !self.state.borrow_mut().buffers.remove(&buffer) {
            self.violation(format!("double delete of buffer {buffer}"));
        }
        self.journal.push(Call::DeleteBuffer(buffer));
    }

    fn create_vertex_array(&self) -> Result<Option<ObjectId>, String> {
        if self.version == ContextVersion::Legacy {
            return Ok(None);
        }
        let mut s = self.state.borrow_mut();
        let id = s.alloc();
        s.vertex_arrays.insert(id);
        self.journal.push(Call::CreateVertexArray(id));
        Ok(Some(id))
    }

    fn delete_vertex_array(&self, vertex_array: ObjectId) {
        if !self.state.borrow_mut().vertex_arrays.remove(&vertex_array) {
            self.violation(format!("double delete of vertex array {vertex_array}"));
        }
        self.journal.push(Call::DeleteVertexArray(vertex_array));
    }

    fn begin_frame(&self, size: SurfaceSize, _clear: [f32; 4]) {
        self.journal.push(Call::BeginFrame(size));
    }

    fn use_program(&self, program: ObjectId) {
        {
            let mut s = self.state.borrow_mut();
            if s.programs.contains_key(&program) {
                s.current_program = Some(program);
            } else {
                s.violations.push(format!("use of deleted program {program}"));
            }
        }
        self.journal.push(Call::UseProgram(program));
    }

    fn bind_vertex_attribute(
        &self,
        vertex_array: Option<ObjectId>,
        buffer: ObjectId,
        location: u32,
        components: i32,
    ) {
        {
            let s = self.state.borrow();
            let dead_vao = vertex_array.is_some_and(|v| !s.vertex_arrays.contains(&v));
            let dead_buffer = !s.buffers.contains(&buffer);
            drop(s);
            if dead_vao || dead_buffer {
                self.violation(format!("attribute bound to deleted geometry (buffer {buffer})"));
            }
        }
        self.journal.push(Call::BindAttribute { location, buffer, components });
    }

    fn set_uniform_f32(&self, location: &RecordedUniform, value: f32) {
        self.upload(location, UniformValue::F32(value));
    }

    fn set_uniform_vec2(&self, location: &RecordedUniform, value: [f32; 2]) {
        self.upload(location, UniformValue::Vec2(value));
    }

    fn set_uniform_mat4(&self, location: &RecordedUniform, value: &[f32; 16]) {
        self.upload(location, UniformValue::Mat4(*value));
    }

    fn draw_triangle_strip(&self, vertex_count: i32) {
        let program = self.state.borrow().current_program;
        if program.is_none() {
            self.violation("draw without a live program".into());
        }
        self.journal.push(Call::Draw { program, vertices: vertex_count });
    }
}

impl RecordingBackend {
    fn upload(&self, location: &RecordedUniform, value: UniformValue) {
        let current = self.state.borrow().current_program;
        if current != Some(location.program) {
            self.violation(format!(
                "uniform '{}' set while program {} is not current",
                location.name, location.program
            ));
        }
        self.journal.push(Call::Uniform { name: location.name.clone(), value });
    }
}

// ── simulated compiler ────────────────────────────────────────────────────

fn check_syntax(source: &str) -> Result<(), String> {
    let body = strip_comments(source);

    if !body.contains("main") {
        return Err("ERROR: 0:1: 'main' : function not defined".into());
    }

    let mut depth_brace = 0i32;
    let mut depth_paren = 0i32;
    for (line_no, line) in body.lines().enumerate() {
        for ch in line.chars() {
            match ch {
                '{' => depth_brace += 1,
                '}' => depth_brace -= 1,
                '(' => depth_paren += 1,
                ')' => depth_paren -= 1,
                _ => {}
            }
            if depth_brace < 0 || depth_paren < 0 {
                return Err(format!("ERROR: 0:{}: '{ch}' : syntax error", line_no + 1));
            }
        }
    }
    if depth_brace != 0 || depth_paren != 0 {
        let last = body.lines().count().max(1);
        return Err(format!("ERROR: 0:{last}: '' : syntax error: unexpected end of input"));
    }
    Ok(())
}

fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    while !rest.is_empty() {
        if let Some(after) = rest.strip_prefix("//") {
            rest = after.find('\n').map_or("", |i| &after[i..]);
        } else if let Some(after) = rest.strip_prefix("/*") {
            rest = after.find("*/").map_or("", |i| &after[i + 2..]);
        } else {
            let ch = rest.chars().next().unwrap_or_default();
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
        }
    }
    out
}

/// Top-level statements of `source`, preprocessor lines removed.
fn statements(source: &str) -> Vec<Vec<String>> {
    let body: String = strip_comments(source)
        .lines()
        .filter(|l| !l.trim_start().starts_with('#'))
        .collect::<Vec<_>>()
        .join("\n");

    body.split([';', '{', '}'])
        .map(|stmt| stmt.split_whitespace().map(str::to_string).collect::<Vec<_>>())
        .filter(|words| !words.is_empty())
        .collect()
}

fn declared_name(words: &[String]) -> Option<String> {
    let last = words.last()?;
    let name = last.split('[').next().unwrap_or(last);
    (!name.is_empty()).then(|| name.to_string())
}

fn declared_names(source: &str, qualifier: &str) -> Vec<String> {
    statements(source)
        .into_iter()
        .filter(|w| w[0] == qualifier)
        .filter_map(|w| declared_name(&w))
        .collect()
}

/// Vertex inputs in declaration order: `attribute ...` and `[layout(...)] in ...`.
fn vertex_inputs(source: &str) -> Vec<String> {
    statements(source)
        .into_iter()
        .filter_map(|mut words| {
            if words[0].starts_with("layout") {
                let close = words.iter().position(|w| w.ends_with(')'))?;
                words.drain(..=close);
            }
            match words.first().map(String::as_str) {
                Some("attribute") | Some("in") => declared_name(&words),
                _ => None,
            }
        })
        .collect()
}
