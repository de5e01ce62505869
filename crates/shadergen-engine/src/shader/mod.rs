//! Shader compilation, linking and attribute discovery.

mod attribute;
mod compile;
mod link;

pub use attribute::{
    bind_attribute, find_attribute_declaration, resolve_attribute, AttributeBinding,
    AttributeResolution, DEFAULT_ATTRIBUTE,
};
pub use compile::{compile_stage, CompiledStage};
pub use link::{link_program, LinkedProgram};
