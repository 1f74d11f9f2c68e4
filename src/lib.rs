//! Image-based CSG rendering for OpenGL via [glow].
//!
//! This crate renders Boolean combinations of 3-D primitives with stencil and
//! depth-buffer techniques instead of building the combined mesh. It owns two
//! things:
//!
//! - **Dispatch.** [`CsgRenderer`] picks the CSG algorithm (Goldfeather or
//!   SCS) and a depth complexity strategy from the primitive set and the
//!   capabilities of the current context, then calls the matching
//!   [`CsgAlgorithms`] implementation.
//! - **Per-context resources.** [`ContextRegistry`] lazily creates offscreen
//!   buffers and memoizes compiled shaders and linked programs per
//!   application-chosen [`ContextId`], so several windows can share one
//!   renderer without mixing up each other's GL objects.
//!
//! # Contexts
//!
//! The crate never binds a native context. Before each call the application
//! makes its context current and passes the matching id to
//! [`CsgRenderer::set_active_context`]. Before destroying a native context it
//! calls [`CsgRenderer::release_context_resources`] with that context still
//! current; otherwise the context's GL objects leak.
//!
//! # Failures
//!
//! Rendering never aborts. Requests for occlusion queries on hardware
//! without them are downgraded to depth complexity sampling. Shader compile
//! and program link failures are logged through [`log`] and the handle is
//! cached anyway. Unrenderable setting combinations are skipped.
//!
//! # Safety
//!
//! Methods that issue GL calls are `unsafe` and require the native context
//! identified by the active id to be current on the calling thread. Nothing
//! here is thread-safe; drive each context from the thread that owns it.
//!
//! [glow]: https://docs.rs/glow

mod cache;
mod capabilities;
mod device;
mod error;
mod offscreen;
mod render;
mod select;
mod settings;
mod shaders;
mod types;

#[cfg(test)]
mod testing;

pub use cache::{ContextRegistry, ContextResources};
pub use capabilities::{
    choose_offscreen_type, has_hardware_occlusion_queries, OCCLUSION_QUERY_EXTENSIONS,
};
pub use device::GlDevice;
pub use error::GlError;
pub use offscreen::OffscreenBuffer;
pub use render::{CsgAlgorithms, CsgRenderer, Frame};
pub use select::{
    choose_algorithm, choose_depth_complexity_algorithm, max_convexity, plan, RenderPlan,
    OCCLUSION_QUERY_THRESHOLD, SAMPLING_THRESHOLD,
};
pub use settings::Settings;
pub use types::{
    Algorithm, AlgorithmSetting, ContextId, DepthComplexityAlgorithm, DepthComplexitySetting,
    OffscreenSetting, OffscreenType, Operation, Primitive, ShaderStage,
};
