//! Offscreen render targets used by the algorithm renderers.
//!
//! An [`OffscreenBuffer`] is cheap to construct: no GL object exists until
//! [`initialize`](OffscreenBuffer::initialize) is called with a size. The
//! resource cache creates at most one buffer per [`OffscreenType`] and
//! context and destroys it on context teardown.

use crate::device::GlDevice;
use crate::error::GlError;
use crate::types::OffscreenType;

/// GL internal format for RGBA8 textures, pre-cast to the `i32` that
/// `tex_image_2d` expects.
#[expect(clippy::cast_possible_wrap)]
const RGBA8_INTERNAL_FORMAT: i32 = glow::RGBA8 as i32;

/// Stencil precision of the packed depth-stencil attachment.
const STENCIL_BITS: u32 = 8;

/// Convert a `u32` to `i32` for GL API calls, saturating at `i32::MAX`.
fn gl_size(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}

/// GL objects backing an initialized buffer.
struct Targets<G: GlDevice> {
    framebuffer: G::Framebuffer,
    color: G::Texture,
    depth_stencil: G::Renderbuffer,
}

/// A framebuffer object with an RGBA8 color texture and a packed 24/8
/// depth-stencil renderbuffer.
pub struct OffscreenBuffer<G: GlDevice> {
    kind: OffscreenType,
    targets: Option<Targets<G>>,
    size: [u32; 2],
}

impl<G: GlDevice> OffscreenBuffer<G> {
    /// Create an uninitialized buffer. Issues no GL calls.
    #[must_use]
    pub fn new(kind: OffscreenType) -> Self {
        Self {
            kind,
            targets: None,
            size: [0, 0],
        }
    }

    /// The framebuffer flavour this buffer was created for.
    #[must_use]
    pub fn kind(&self) -> OffscreenType {
        self.kind
    }

    /// Current size in pixels, `[0, 0]` before initialization.
    #[must_use]
    pub fn size(&self) -> [u32; 2] {
        self.size
    }

    /// Whether GL objects have been created for this buffer.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.targets.is_some()
    }

    /// Number of stencil bits available for CSG counting.
    #[must_use]
    pub fn stencil_bits(&self) -> u32 {
        STENCIL_BITS
    }

    /// The framebuffer handle, if initialized.
    #[must_use]
    pub fn framebuffer(&self) -> Option<G::Framebuffer> {
        self.targets.as_ref().map(|t| t.framebuffer)
    }

    /// The color attachment texture, if initialized.
    #[must_use]
    pub fn color_texture(&self) -> Option<G::Texture> {
        self.targets.as_ref().map(|t| t.color)
    }

    /// Create the GL objects and allocate storage for `width` x `height`.
    ///
    /// Any previously created objects are released first.
    ///
    /// # Safety
    ///
    /// Requires the context owning this buffer to be current.
    ///
    /// # Errors
    ///
    /// Returns an error if an object cannot be created or the framebuffer is
    /// incomplete. The buffer is left uninitialized in both cases.
    pub unsafe fn initialize(&mut self, gl: &G, width: u32, height: u32) -> Result<(), GlError> {
        unsafe { self.destroy(gl) };

        let targets = unsafe {
            let framebuffer = gl
                .create_framebuffer()
                .map_err(|message| GlError::creation("framebuffer", message))?;
            let color = match gl.create_texture() {
                Ok(color) => color,
                Err(message) => {
                    gl.delete_framebuffer(framebuffer);
                    return Err(GlError::creation("texture", message));
                }
            };
            let depth_stencil = match gl.create_renderbuffer() {
                Ok(depth_stencil) => depth_stencil,
                Err(message) => {
                    gl.delete_texture(color);
                    gl.delete_framebuffer(framebuffer);
                    return Err(GlError::creation("renderbuffer", message));
                }
            };
            Targets {
                framebuffer,
                color,
                depth_stencil,
            }
        };
        self.targets = Some(targets);

        let status = unsafe { self.allocate(gl, width, height) };
        if status != glow::FRAMEBUFFER_COMPLETE {
            unsafe { self.destroy(gl) };
            return Err(GlError::IncompleteFramebuffer { status });
        }

        log::debug!(
            "initialized {:?} offscreen buffer at {width}x{height}",
            self.kind
        );
        Ok(())
    }

    /// Make sure the buffer exists and has the given size, reallocating only
    /// when something changed.
    ///
    /// # Safety
    ///
    /// Requires the context owning this buffer to be current.
    ///
    /// # Errors
    ///
    /// See [`initialize`](Self::initialize).
    pub unsafe fn resize(&mut self, gl: &G, width: u32, height: u32) -> Result<(), GlError> {
        if self.targets.is_none() {
            return unsafe { self.initialize(gl, width, height) };
        }
        if self.size == [width, height] {
            return Ok(());
        }

        let status = unsafe { self.allocate(gl, width, height) };
        if status != glow::FRAMEBUFFER_COMPLETE {
            unsafe { self.destroy(gl) };
            return Err(GlError::IncompleteFramebuffer { status });
        }
        Ok(())
    }

    /// Direct rendering into this buffer. Does nothing if uninitialized.
    ///
    /// # Safety
    ///
    /// Requires the context owning this buffer to be current.
    pub unsafe fn bind(&self, gl: &G) {
        if let Some(targets) = &self.targets {
            unsafe { gl.bind_framebuffer(glow::FRAMEBUFFER, Some(targets.framebuffer)) };
        }
    }

    /// Restore the default framebuffer.
    ///
    /// # Safety
    ///
    /// Requires the context owning this buffer to be current.
    pub unsafe fn unbind(&self, gl: &G) {
        unsafe { gl.bind_framebuffer(glow::FRAMEBUFFER, None) };
    }

    /// Delete all GL objects owned by this buffer. Safe to call repeatedly.
    ///
    /// # Safety
    ///
    /// Requires the context owning this buffer to be current.
    pub unsafe fn destroy(&mut self, gl: &G) {
        if let Some(targets) = self.targets.take() {
            unsafe {
                gl.delete_framebuffer(targets.framebuffer);
                gl.delete_texture(targets.color);
                gl.delete_renderbuffer(targets.depth_stencil);
            }
        }
        self.size = [0, 0];
    }

    /// Allocate storage, wire up the attachments and return the completeness
    /// status.
    unsafe fn allocate(&mut self, gl: &G, width: u32, height: u32) -> u32 {
        let Some(targets) = &self.targets else {
            return 0;
        };
        let w = gl_size(width);
        let h = gl_size(height);

        let status = unsafe {
            gl.bind_texture(glow::TEXTURE_2D, Some(targets.color));
            gl.tex_image_2d_empty(
                glow::TEXTURE_2D,
                RGBA8_INTERNAL_FORMAT,
                w,
                h,
                glow::RGBA,
                glow::UNSIGNED_BYTE,
            );
            // Filter enums are passed through the signed parameter API.
            #[expect(clippy::cast_possible_wrap)]
            {
                gl.tex_parameter_i32(
                    glow::TEXTURE_2D,
                    glow::TEXTURE_MIN_FILTER,
                    glow::NEAREST as i32,
                );
                gl.tex_parameter_i32(
                    glow::TEXTURE_2D,
                    glow::TEXTURE_MAG_FILTER,
                    glow::NEAREST as i32,
                );
            }

            gl.bind_renderbuffer(glow::RENDERBUFFER, Some(targets.depth_stencil));
            gl.renderbuffer_storage(glow::RENDERBUFFER, glow::DEPTH24_STENCIL8, w, h);

            gl.bind_framebuffer(glow::FRAMEBUFFER, Some(targets.framebuffer));
            gl.framebuffer_texture_2d(
                glow::FRAMEBUFFER,
                glow::COLOR_ATTACHMENT0,
                glow::TEXTURE_2D,
                Some(targets.color),
                0,
            );
            match self.kind {
                OffscreenType::FrameBufferObjectArb => {
                    gl.framebuffer_renderbuffer(
                        glow::FRAMEBUFFER,
                        glow::DEPTH_STENCIL_ATTACHMENT,
                        glow::RENDERBUFFER,
                        Some(targets.depth_stencil),
                    );
                }
                // EXT_packed_depth_stencil: the same renderbuffer goes to both points.
                OffscreenType::FrameBufferObjectExt => {
                    gl.framebuffer_renderbuffer(
                        glow::FRAMEBUFFER,
                        glow::DEPTH_ATTACHMENT,
                        glow::RENDERBUFFER,
                        Some(targets.depth_stencil),
                    );
                    gl.framebuffer_renderbuffer(
                        glow::FRAMEBUFFER,
                        glow::STENCIL_ATTACHMENT,
                        glow::RENDERBUFFER,
                        Some(targets.depth_stencil),
                    );
                }
            }

            let status = gl.check_framebuffer_status(glow::FRAMEBUFFER);

            gl.bind_framebuffer(glow::FRAMEBUFFER, None);
            gl.bind_renderbuffer(glow::RENDERBUFFER, None);
            gl.bind_texture(glow::TEXTURE_2D, None);
            status
        };

        self.size = [width, height];
        status
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::testing::MockGl;

    #[test]
    fn construction_issues_no_gl_calls() {
        let gl = MockGl::new();
        let buffer = OffscreenBuffer::<MockGl>::new(OffscreenType::FrameBufferObjectArb);
        assert!(!buffer.is_initialized());
        assert_eq!(buffer.size(), [0, 0]);
        assert_eq!(gl.total_calls(), 0);
    }

    #[test]
    fn arb_attaches_packed_depth_stencil_once() {
        let gl = MockGl::new();
        let mut buffer = OffscreenBuffer::new(OffscreenType::FrameBufferObjectArb);
        unsafe { buffer.initialize(&gl, 640, 480) }.unwrap();
        assert!(buffer.is_initialized());
        assert_eq!(buffer.size(), [640, 480]);
        assert_eq!(
            *gl.renderbuffer_attachments.borrow(),
            vec![glow::DEPTH_STENCIL_ATTACHMENT]
        );
    }

    #[test]
    fn ext_attaches_depth_and_stencil_separately() {
        let gl = MockGl::new();
        let mut buffer = OffscreenBuffer::new(OffscreenType::FrameBufferObjectExt);
        unsafe { buffer.initialize(&gl, 64, 64) }.unwrap();
        assert_eq!(
            *gl.renderbuffer_attachments.borrow(),
            vec![glow::DEPTH_ATTACHMENT, glow::STENCIL_ATTACHMENT]
        );
    }

    #[test]
    fn resize_to_same_size_is_free() {
        let gl = MockGl::new();
        let mut buffer = OffscreenBuffer::new(OffscreenType::FrameBufferObjectArb);
        unsafe { buffer.resize(&gl, 100, 100) }.unwrap();
        let calls = gl.total_calls();
        unsafe { buffer.resize(&gl, 100, 100) }.unwrap();
        assert_eq!(gl.total_calls(), calls);

        unsafe { buffer.resize(&gl, 200, 100) }.unwrap();
        assert_eq!(buffer.size(), [200, 100]);
        assert_eq!(gl.count("create_framebuffer"), 1);
        assert_eq!(gl.count("renderbuffer_storage"), 2);
    }

    #[test]
    fn incomplete_framebuffer_is_torn_down() {
        let gl = MockGl::new();
        gl.framebuffer_status
            .set(glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT);
        let mut buffer = OffscreenBuffer::new(OffscreenType::FrameBufferObjectExt);
        let err = unsafe { buffer.initialize(&gl, 32, 32) }.unwrap_err();
        assert!(matches!(err, GlError::IncompleteFramebuffer { .. }));
        assert!(!buffer.is_initialized());
        assert_eq!(gl.count("delete_framebuffer"), 1);
        assert_eq!(gl.count("delete_texture"), 1);
        assert_eq!(gl.count("delete_renderbuffer"), 1);
    }

    #[test]
    fn destroy_twice_deletes_once() {
        let gl = MockGl::new();
        let mut buffer = OffscreenBuffer::new(OffscreenType::FrameBufferObjectArb);
        unsafe {
            buffer.initialize(&gl, 8, 8).unwrap();
            buffer.destroy(&gl);
            buffer.destroy(&gl);
        }
        assert_eq!(gl.count("delete_framebuffer"), 1);
        assert!(buffer.framebuffer().is_none());
    }

    #[test]
    fn texture_creation_failure_deletes_the_framebuffer() {
        let gl = MockGl::new();
        gl.fail_create.set(Some("create_texture"));
        let mut buffer = OffscreenBuffer::new(OffscreenType::FrameBufferObjectArb);
        let err = unsafe { buffer.initialize(&gl, 32, 32) }.unwrap_err();
        assert!(matches!(
            err,
            GlError::ObjectCreation {
                object: "texture",
                ..
            }
        ));
        assert!(!buffer.is_initialized());
        assert_eq!(gl.count("delete_framebuffer"), 1);
        assert_eq!(gl.count("delete_texture"), 0);
        assert_eq!(gl.count("create_renderbuffer"), 0);
    }

    #[test]
    fn renderbuffer_creation_failure_deletes_framebuffer_and_texture() {
        let gl = MockGl::new();
        gl.fail_create.set(Some("create_renderbuffer"));
        let mut buffer = OffscreenBuffer::new(OffscreenType::FrameBufferObjectExt);
        let err = unsafe { buffer.initialize(&gl, 32, 32) }.unwrap_err();
        assert!(matches!(
            err,
            GlError::ObjectCreation {
                object: "renderbuffer",
                ..
            }
        ));
        assert!(!buffer.is_initialized());
        assert_eq!(gl.count("delete_framebuffer"), 1);
        assert_eq!(gl.count("delete_texture"), 1);
        assert_eq!(gl.count("delete_renderbuffer"), 0);
        assert_eq!(gl.count("renderbuffer_storage"), 0);
    }

    #[test]
    fn failed_reinitialize_leaves_buffer_uninitialized() {
        let gl = MockGl::new();
        let mut buffer = OffscreenBuffer::new(OffscreenType::FrameBufferObjectArb);
        unsafe { buffer.initialize(&gl, 16, 16) }.unwrap();

        gl.fail_create.set(Some("create_framebuffer"));
        let err = unsafe { buffer.initialize(&gl, 32, 32) }.unwrap_err();
        assert!(matches!(
            err,
            GlError::ObjectCreation {
                object: "framebuffer",
                ..
            }
        ));
        assert!(!buffer.is_initialized());
        assert_eq!(buffer.size(), [0, 0]);
        // The objects from the first initialization are gone.
        assert_eq!(gl.count("delete_framebuffer"), 1);
        assert_eq!(gl.count("delete_texture"), 1);
        assert_eq!(gl.count("delete_renderbuffer"), 1);

        gl.fail_create.set(None);
        unsafe { buffer.initialize(&gl, 32, 32) }.unwrap();
        assert!(buffer.is_initialized());
    }

    #[test]
    fn bind_and_unbind_switch_the_framebuffer() {
        let gl = MockGl::new();
        let mut buffer = OffscreenBuffer::new(OffscreenType::FrameBufferObjectArb);
        unsafe { buffer.initialize(&gl, 128, 64) }.unwrap();
        assert_eq!(gl.bound_framebuffer.get(), None);

        let framebuffer = buffer.framebuffer().unwrap();
        let color = buffer.color_texture().unwrap();
        assert_ne!(framebuffer, color);
        assert_eq!(buffer.stencil_bits(), 8);

        unsafe { buffer.bind(&gl) };
        assert_eq!(gl.bound_framebuffer.get(), Some(framebuffer));
        unsafe { buffer.unbind(&gl) };
        assert_eq!(gl.bound_framebuffer.get(), None);
    }

    #[test]
    fn bind_before_initialize_does_nothing() {
        let gl = MockGl::new();
        let buffer = OffscreenBuffer::<MockGl>::new(OffscreenType::FrameBufferObjectArb);
        unsafe { buffer.bind(&gl) };
        assert_eq!(gl.count("bind_framebuffer"), 0);
    }
}
