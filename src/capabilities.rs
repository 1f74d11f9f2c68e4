//! Extension checks against the current context.
//!
//! Nothing is cached: a context's capabilities cannot change, and a new
//! context may be current on the next call.

use crate::device::GlDevice;
use crate::types::OffscreenType;

/// Extensions providing hardware occlusion queries.
pub const OCCLUSION_QUERY_EXTENSIONS: [&str; 2] =
    ["GL_ARB_occlusion_query", "GL_NV_occlusion_query"];

const ARB_FRAMEBUFFER_OBJECT: &str = "GL_ARB_framebuffer_object";
const EXT_FRAMEBUFFER_OBJECT: &str = "GL_EXT_framebuffer_object";

/// Whether the current context supports hardware occlusion queries.
pub fn has_hardware_occlusion_queries<G: GlDevice>(gl: &G) -> bool {
    OCCLUSION_QUERY_EXTENSIONS
        .iter()
        .any(|ext| gl.supports_extension(ext))
}

/// Pick the framebuffer flavour for the current context.
///
/// Prefers `ARB_framebuffer_object`, falls back to `EXT_framebuffer_object`,
/// and assumes core GL 3.0 framebuffers when neither is advertised.
pub fn choose_offscreen_type<G: GlDevice>(gl: &G) -> OffscreenType {
    if gl.supports_extension(ARB_FRAMEBUFFER_OBJECT) {
        OffscreenType::FrameBufferObjectArb
    } else if gl.supports_extension(EXT_FRAMEBUFFER_OBJECT) {
        OffscreenType::FrameBufferObjectExt
    } else {
        OffscreenType::FrameBufferObjectArb
    }
}
