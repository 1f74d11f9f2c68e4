//! Per-context GL resource cache.
//!
//! GL objects belong to the context that created them, so every offscreen
//! buffer, shader and program is recorded under the [`ContextId`] that was
//! active when it was requested. The application picks the ids, keeps the
//! active id in sync with whichever native context it made current, and
//! calls [`ContextRegistry::release_context_resources`] before destroying a
//! native context. The registry cannot notice a destroyed context on its
//! own; skipping the release leaks the context's objects.

use std::collections::HashMap;

use crate::device::GlDevice;
use crate::error::GlError;
use crate::offscreen::OffscreenBuffer;
use crate::shaders::{self, Built, SourceKey};
use crate::types::{ContextId, OffscreenType, ShaderStage};

/// GL objects created for one context.
///
/// Offscreen buffers are boxed so their address stays the same while other
/// contexts are added to the registry.
pub struct ContextResources<G: GlDevice> {
    fbo_arb: Option<Box<OffscreenBuffer<G>>>,
    fbo_ext: Option<Box<OffscreenBuffer<G>>>,
    shaders: HashMap<SourceKey, G::Shader>,
    programs: HashMap<(G::Shader, G::Shader), G::Program>,
}

impl<G: GlDevice> Default for ContextResources<G> {
    fn default() -> Self {
        Self {
            fbo_arb: None,
            fbo_ext: None,
            shaders: HashMap::new(),
            programs: HashMap::new(),
        }
    }
}

impl<G: GlDevice> ContextResources<G> {
    /// The offscreen buffer of the given kind, created on first request.
    ///
    /// Construction issues no GL calls; the caller initializes the buffer
    /// with a size when it first renders into it.
    pub fn offscreen_buffer(&mut self, kind: OffscreenType) -> &mut OffscreenBuffer<G> {
        let slot = match kind {
            OffscreenType::FrameBufferObjectArb => &mut self.fbo_arb,
            OffscreenType::FrameBufferObjectExt => &mut self.fbo_ext,
        };
        slot.get_or_insert_with(|| {
            log::debug!("creating {kind:?} offscreen buffer");
            Box::new(OffscreenBuffer::new(kind))
        })
    }

    /// The compiled shader for `source`, compiling it on first request.
    ///
    /// Sources are keyed by the address of the `'static` string and the
    /// stage, not by the text: keep each shader variant in one `const` so
    /// every caller shares the entry. A compile failure is logged with the
    /// driver's info log and the handle is cached and returned anyway.
    ///
    /// # Safety
    ///
    /// Requires the context this record belongs to to be current.
    ///
    /// # Errors
    ///
    /// Returns an error only if the driver cannot create a shader object.
    pub unsafe fn shader(
        &mut self,
        gl: &G,
        stage: ShaderStage,
        source: &'static str,
    ) -> Result<G::Shader, GlError> {
        let key = SourceKey::new(stage, source);
        if let Some(&shader) = self.shaders.get(&key) {
            return Ok(shader);
        }

        let Built { handle, diagnostic } = unsafe { shaders::compile_shader(gl, stage, source)? };
        if let Some(err) = diagnostic {
            log::error!("{err}");
        } else {
            log::debug!("compiled {stage} shader {handle:?}");
        }
        self.shaders.insert(key, handle);
        Ok(handle)
    }

    /// The program linking `vertex` and `fragment`, linked on first request.
    ///
    /// Programs are keyed by the exact pair of shader handles. A link failure
    /// is logged and the handle is cached and returned anyway.
    ///
    /// # Safety
    ///
    /// Requires the context this record belongs to to be current, and both
    /// shaders to belong to it.
    ///
    /// # Errors
    ///
    /// Returns an error only if the driver cannot create a program object.
    pub unsafe fn program(
        &mut self,
        gl: &G,
        vertex: G::Shader,
        fragment: G::Shader,
    ) -> Result<G::Program, GlError> {
        if let Some(&program) = self.programs.get(&(vertex, fragment)) {
            return Ok(program);
        }

        let Built { handle, diagnostic } =
            unsafe { shaders::link_program(gl, vertex, fragment)? };
        if let Some(err) = diagnostic {
            log::error!("{err}");
        } else {
            log::debug!("linked program {handle:?} from {vertex:?} and {fragment:?}");
        }
        self.programs.insert((vertex, fragment), handle);
        Ok(handle)
    }

    /// Shader lookups for both stages followed by the program lookup.
    ///
    /// # Safety
    ///
    /// Requires the context this record belongs to to be current.
    ///
    /// # Errors
    ///
    /// Returns an error only if the driver cannot create a GL object.
    pub unsafe fn program_from_sources(
        &mut self,
        gl: &G,
        vertex_source: &'static str,
        fragment_source: &'static str,
    ) -> Result<G::Program, GlError> {
        unsafe {
            let vertex = self.shader(gl, ShaderStage::Vertex, vertex_source)?;
            let fragment = self.shader(gl, ShaderStage::Fragment, fragment_source)?;
            self.program(gl, vertex, fragment)
        }
    }

    /// Number of cached shader objects.
    #[must_use]
    pub fn shader_count(&self) -> usize {
        self.shaders.len()
    }

    /// Number of cached program objects.
    #[must_use]
    pub fn program_count(&self) -> usize {
        self.programs.len()
    }

    /// Delete every GL object in the record.
    ///
    /// # Safety
    ///
    /// Requires the context this record belongs to to be current.
    unsafe fn release(mut self, gl: &G) {
        for mut buffer in [self.fbo_arb.take(), self.fbo_ext.take()].into_iter().flatten() {
            unsafe { buffer.destroy(gl) };
        }
        // Programs first so no program still references a deleted shader.
        for (_, program) in self.programs.drain() {
            unsafe { gl.delete_program(program) };
        }
        for (_, shader) in self.shaders.drain() {
            unsafe { gl.delete_shader(shader) };
        }
    }
}

/// Resource records for every live context, plus the active context id.
pub struct ContextRegistry<G: GlDevice> {
    active: ContextId,
    records: HashMap<ContextId, ContextResources<G>>,
}

impl<G: GlDevice> Default for ContextRegistry<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: GlDevice> ContextRegistry<G> {
    /// An empty registry with context `0` active.
    #[must_use]
    pub fn new() -> Self {
        Self {
            active: ContextId::default(),
            records: HashMap::new(),
        }
    }

    /// Set the id of the context the application has made current.
    pub fn set_active_context(&mut self, id: impl Into<ContextId>) {
        self.active = id.into();
    }

    /// The id set by the last [`set_active_context`](Self::set_active_context).
    #[must_use]
    pub fn active_context(&self) -> ContextId {
        self.active
    }

    /// Whether a record exists for `id`.
    #[must_use]
    pub fn contains(&self, id: ContextId) -> bool {
        self.records.contains_key(&id)
    }

    /// Number of contexts with a record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no context has a record.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The active context's record, created on first access.
    pub fn resources(&mut self) -> &mut ContextResources<G> {
        let active = self.active;
        self.records.entry(active).or_insert_with(|| {
            log::debug!("creating resource record for context {active}");
            ContextResources::default()
        })
    }

    /// See [`ContextResources::offscreen_buffer`].
    pub fn offscreen_buffer(&mut self, kind: OffscreenType) -> &mut OffscreenBuffer<G> {
        self.resources().offscreen_buffer(kind)
    }

    /// See [`ContextResources::shader`].
    ///
    /// # Safety
    ///
    /// Requires the native context identified by the active id to be current.
    ///
    /// # Errors
    ///
    /// Returns an error only if the driver cannot create a shader object.
    pub unsafe fn shader(
        &mut self,
        gl: &G,
        stage: ShaderStage,
        source: &'static str,
    ) -> Result<G::Shader, GlError> {
        unsafe { self.resources().shader(gl, stage, source) }
    }

    /// See [`ContextResources::program`].
    ///
    /// # Safety
    ///
    /// Requires the native context identified by the active id to be current.
    ///
    /// # Errors
    ///
    /// Returns an error only if the driver cannot create a program object.
    pub unsafe fn program(
        &mut self,
        gl: &G,
        vertex: G::Shader,
        fragment: G::Shader,
    ) -> Result<G::Program, GlError> {
        unsafe { self.resources().program(gl, vertex, fragment) }
    }

    /// See [`ContextResources::program_from_sources`].
    ///
    /// # Safety
    ///
    /// Requires the native context identified by the active id to be current.
    ///
    /// # Errors
    ///
    /// Returns an error only if the driver cannot create a GL object.
    pub unsafe fn program_from_sources(
        &mut self,
        gl: &G,
        vertex_source: &'static str,
        fragment_source: &'static str,
    ) -> Result<G::Program, GlError> {
        unsafe {
            self.resources()
                .program_from_sources(gl, vertex_source, fragment_source)
        }
    }

    /// Delete every GL object recorded for the active context and forget the
    /// record. Does nothing (and creates nothing) if there is no record.
    ///
    /// # Safety
    ///
    /// Requires the native context identified by the active id to be current.
    /// Call it before that native context is destroyed.
    pub unsafe fn release_context_resources(&mut self, gl: &G) {
        if let Some(record) = self.records.remove(&self.active) {
            log::info!(
                "releasing {} shaders and {} programs for context {}",
                record.shader_count(),
                record.program_count(),
                self.active
            );
            unsafe { record.release(gl) };
        }
    }
}
