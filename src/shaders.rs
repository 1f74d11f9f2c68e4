//! Shader compilation and program linking.
//!
//! Unlike a one-shot renderer, nothing here deletes an object when the
//! driver rejects it. The handle is returned together with the diagnostic so
//! the resource cache can log it and keep the handle, instead of retrying a
//! broken shader every frame.

use crate::device::GlDevice;
use crate::error::GlError;
use crate::types::ShaderStage;

/// Identity of a shader source string: the address and length of the
/// `'static` text.
///
/// Two textually identical sources stored at different addresses get
/// different keys, so keep each shader variant in one `const`/`static`.
/// Restricting sources to `'static` means an address can never be reused by
/// a different string while the cache holds it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct SourceKey {
    stage: ShaderStage,
    addr: usize,
    len: usize,
}

impl SourceKey {
    pub(crate) fn new(stage: ShaderStage, source: &'static str) -> Self {
        Self {
            stage,
            addr: source.as_ptr() as usize,
            len: source.len(),
        }
    }
}

/// A GL object that went through compile or link, with the driver's
/// complaint if it failed.
pub(crate) struct Built<H> {
    pub handle: H,
    pub diagnostic: Option<GlError>,
}

/// Compile a single shader stage from source.
///
/// # Safety
///
/// Requires a valid, current OpenGL context.
///
/// # Errors
///
/// Returns an error only if the shader object itself cannot be created.
pub(crate) unsafe fn compile_shader<G: GlDevice>(
    gl: &G,
    stage: ShaderStage,
    source: &str,
) -> Result<Built<G::Shader>, GlError> {
    unsafe {
        let shader = gl
            .create_shader(stage.gl_enum())
            .map_err(|message| GlError::creation("shader", message))?;
        gl.shader_source(shader, source);
        gl.compile_shader(shader);

        let diagnostic = if gl.get_shader_compile_status(shader) {
            None
        } else {
            Some(GlError::ShaderCompile {
                stage,
                log: gl.get_shader_info_log(shader),
            })
        };

        Ok(Built {
            handle: shader,
            diagnostic,
        })
    }
}

/// Attach a vertex and a fragment shader to a new program and link it.
///
/// The shaders stay attached: they are owned by the cache and shared between
/// programs.
///
/// # Safety
///
/// Requires a valid, current OpenGL context that owns both shaders.
///
/// # Errors
///
/// Returns an error only if the program object itself cannot be created.
pub(crate) unsafe fn link_program<G: GlDevice>(
    gl: &G,
    vertex: G::Shader,
    fragment: G::Shader,
) -> Result<Built<G::Program>, GlError> {
    unsafe {
        let program = gl
            .create_program()
            .map_err(|message| GlError::creation("program", message))?;
        gl.attach_shader(program, vertex);
        gl.attach_shader(program, fragment);
        gl.link_program(program);

        let diagnostic = if gl.get_program_link_status(program) {
            None
        } else {
            Some(GlError::ProgramLink {
                log: gl.get_program_info_log(program),
            })
        };

        Ok(Built {
            handle: program,
            diagnostic,
        })
    }
}
