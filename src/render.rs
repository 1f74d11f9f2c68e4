//! The per-frame entry point: resolves the configured algorithm, corrects it
//! against the context's capabilities and hands the primitives to the
//! matching algorithm renderer.

use crate::cache::{ContextRegistry, ContextResources};
use crate::capabilities;
use crate::device::GlDevice;
use crate::error::GlError;
use crate::offscreen::OffscreenBuffer;
use crate::select::{self, RenderPlan};
use crate::settings::Settings;
use crate::types::{
    Algorithm, AlgorithmSetting, ContextId, DepthComplexityAlgorithm, DepthComplexitySetting,
    OffscreenSetting, OffscreenType, Primitive,
};

/// Upper bound on queued GL errors drained after a dispatch. A lost context
/// can keep reporting errors forever.
const MAX_DRAINED_ERRORS: usize = 16;

/// The stencil and depth-peeling passes of each CSG algorithm.
///
/// Implementations draw the visible surface of the CSG product into the
/// current color and depth buffers, requesting shaders, programs and
/// offscreen buffers through the [`Frame`] so they stay scoped to the active
/// context.
pub trait CsgAlgorithms<G: GlDevice> {
    /// Render with the Goldfeather algorithm.
    ///
    /// # Safety
    ///
    /// Called with the native context identified by `frame.context()`
    /// current.
    unsafe fn render_goldfeather(
        &mut self,
        frame: &mut Frame<'_, G>,
        primitives: &[&dyn Primitive],
        depth_complexity: DepthComplexityAlgorithm,
    );

    /// Render with the Sequenced Convex Subtraction algorithm.
    ///
    /// # Safety
    ///
    /// Called with the native context identified by `frame.context()`
    /// current.
    unsafe fn render_scs(
        &mut self,
        frame: &mut Frame<'_, G>,
        primitives: &[&dyn Primitive],
        depth_complexity: DepthComplexityAlgorithm,
    );
}

/// What an algorithm renderer sees of the active context for one dispatch.
pub struct Frame<'a, G: GlDevice> {
    gl: &'a G,
    registry: &'a mut ContextRegistry<G>,
    offscreen: OffscreenSetting,
}

impl<'a, G: GlDevice> Frame<'a, G> {
    /// The GL device to issue calls through.
    #[must_use]
    pub fn gl(&self) -> &'a G {
        self.gl
    }

    /// The id of the context being rendered to.
    #[must_use]
    pub fn context(&self) -> ContextId {
        self.registry.active_context()
    }

    /// The active context's resource record, created on first access.
    pub fn resources(&mut self) -> &mut ContextResources<G> {
        self.registry.resources()
    }

    /// The configured offscreen type, or the best one the context supports.
    #[must_use]
    pub fn offscreen_type(&self) -> OffscreenType {
        self.offscreen
            .fixed()
            .unwrap_or_else(|| capabilities::choose_offscreen_type(self.gl))
    }

    /// The active context's offscreen buffer of the configured type.
    pub fn offscreen_buffer(&mut self) -> &mut OffscreenBuffer<G> {
        let kind = self.offscreen_type();
        self.registry.offscreen_buffer(kind)
    }

    /// See [`ContextResources::program_from_sources`].
    ///
    /// # Safety
    ///
    /// Requires the native context identified by [`context`](Self::context)
    /// to be current.
    ///
    /// # Errors
    ///
    /// Returns an error only if the driver cannot create a GL object.
    pub unsafe fn program_from_sources(
        &mut self,
        vertex_source: &'static str,
        fragment_source: &'static str,
    ) -> Result<G::Program, GlError> {
        let gl = self.gl;
        unsafe {
            self.registry
                .program_from_sources(gl, vertex_source, fragment_source)
        }
    }
}

/// Image-based CSG renderer.
///
/// Owns the per-context resource registry, the [`Settings`] and the
/// algorithm implementations. Create one per application and share it
/// between all windows: switch contexts with
/// [`set_active_context`](Self::set_active_context) whenever another native
/// context is made current.
///
/// # Example
///
/// ```no_run
/// # use csg_renderer_glow::{CsgAlgorithms, CsgRenderer, Primitive};
/// # fn example<A: CsgAlgorithms<glow::Context>>(
/// #     gl: &glow::Context,
/// #     algorithms: A,
/// #     primitives: &[&dyn Primitive],
/// # ) {
/// let mut renderer = CsgRenderer::new(algorithms);
///
/// // Each frame, with the window's context current:
/// renderer.set_active_context(1);
/// unsafe { renderer.render(gl, primitives) };
///
/// // Before destroying the window's context:
/// unsafe { renderer.release_context_resources(gl) };
/// # }
/// ```
pub struct CsgRenderer<G: GlDevice, A> {
    registry: ContextRegistry<G>,
    settings: Settings,
    algorithms: A,
}

impl<G: GlDevice, A: CsgAlgorithms<G>> CsgRenderer<G, A> {
    /// Create a renderer with default [`Settings`] and context `0` active.
    pub fn new(algorithms: A) -> Self {
        Self::with_settings(algorithms, Settings::default())
    }

    /// Create a renderer with the given settings.
    pub fn with_settings(algorithms: A, settings: Settings) -> Self {
        Self {
            registry: ContextRegistry::new(),
            settings,
            algorithms,
        }
    }

    /// Set the id of the context the application has made current.
    pub fn set_active_context(&mut self, id: impl Into<ContextId>) {
        self.registry.set_active_context(id);
    }

    /// The currently active context id.
    #[must_use]
    pub fn active_context(&self) -> ContextId {
        self.registry.active_context()
    }

    /// The settings read by [`render`](Self::render).
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable access to the settings.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// The per-context resource registry.
    #[must_use]
    pub fn registry(&self) -> &ContextRegistry<G> {
        &self.registry
    }

    /// Mutable access to the per-context resource registry.
    pub fn registry_mut(&mut self) -> &mut ContextRegistry<G> {
        &mut self.registry
    }

    /// The algorithm implementations.
    pub fn algorithms_mut(&mut self) -> &mut A {
        &mut self.algorithms
    }

    /// Render the CSG product of `primitives` using the configured
    /// algorithm and depth complexity preferences.
    ///
    /// # Safety
    ///
    /// Requires the native context identified by the active id to be current.
    pub unsafe fn render(
        &mut self,
        gl: &G,
        primitives: &[&dyn Primitive],
    ) -> Option<RenderPlan> {
        let Settings {
            algorithm,
            depth_complexity,
            ..
        } = self.settings;
        unsafe { self.render_dispatch(gl, primitives, algorithm, depth_complexity) }
    }

    /// Render the CSG product of `primitives` with explicit preferences.
    ///
    /// Returns the plan that was handed to an algorithm renderer, or `None`
    /// if nothing was rendered: the set was empty, or a fixed algorithm was
    /// paired with an automatic depth complexity setting. An empty set
    /// issues no GL calls at all.
    ///
    /// # Safety
    ///
    /// Requires the native context identified by the active id to be current.
    pub unsafe fn render_dispatch(
        &mut self,
        gl: &G,
        primitives: &[&dyn Primitive],
        algorithm: AlgorithmSetting,
        depth_complexity: DepthComplexitySetting,
    ) -> Option<RenderPlan> {
        if primitives.is_empty() {
            return None;
        }

        let hardware_occlusion_queries = capabilities::has_hardware_occlusion_queries(gl);
        let Some(plan) = select::plan(
            primitives,
            algorithm,
            depth_complexity,
            hardware_occlusion_queries,
        ) else {
            log::debug!(
                "nothing to dispatch for {algorithm:?} with {depth_complexity:?}"
            );
            return None;
        };

        log::debug!(
            "rendering {} primitives on context {} with {:?} / {:?}",
            primitives.len(),
            self.registry.active_context(),
            plan.algorithm,
            plan.depth_complexity
        );

        let mut frame = Frame {
            gl,
            registry: &mut self.registry,
            offscreen: self.settings.offscreen_type,
        };
        unsafe {
            match plan.algorithm {
                Algorithm::Goldfeather => {
                    self.algorithms
                        .render_goldfeather(&mut frame, primitives, plan.depth_complexity);
                }
                Algorithm::Scs => {
                    self.algorithms
                        .render_scs(&mut frame, primitives, plan.depth_complexity);
                }
            }
        }

        if cfg!(debug_assertions) {
            unsafe { drain_gl_errors(gl, plan.algorithm) };
        }

        Some(plan)
    }

    /// See [`ContextRegistry::release_context_resources`].
    ///
    /// # Safety
    ///
    /// Requires the native context identified by the active id to be current.
    pub unsafe fn release_context_resources(&mut self, gl: &G) {
        unsafe { self.registry.release_context_resources(gl) };
    }
}

/// Log every GL error queued by an algorithm renderer.
unsafe fn drain_gl_errors<G: GlDevice>(gl: &G, algorithm: Algorithm) {
    for _ in 0..MAX_DRAINED_ERRORS {
        let error = unsafe { gl.get_error() };
        if error == glow::NO_ERROR {
            break;
        }
        log::warn!("GL error {error:#06x} after {algorithm:?} pass");
    }
}
