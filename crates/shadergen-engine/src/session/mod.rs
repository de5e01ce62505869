//! The live render session aggregate.
//!
//! A session owns every GPU object built from one `ShaderSourcePair` plus the
//! render loop that draws with them. Only the lifecycle manager creates or
//! destroys sessions.

mod frame;
mod render_session;
mod uniforms;

pub use frame::{FrameContext, SurfaceSize};
pub use render_session::RenderSession;
pub use uniforms::{UniformSlots, IDENTITY_MAT4, U_MODEL_VIEW, U_PROJECTION, U_RESOLUTION, U_TIME};
