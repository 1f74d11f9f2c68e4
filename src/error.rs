//! Error type for GL object management.

use thiserror::Error;

use crate::types::ShaderStage;

/// A failure reported by the GL driver while creating or preparing objects.
///
/// Only [`ObjectCreation`](Self::ObjectCreation) and
/// [`IncompleteFramebuffer`](Self::IncompleteFramebuffer) are ever returned to
/// callers. Compile and link failures are logged through this type but the
/// (possibly invalid) handle is still cached and handed out, so a broken
/// shader is not recompiled every frame.
#[derive(Debug, Error)]
pub enum GlError {
    /// The driver refused to create a GL object.
    #[error("failed to create {object}: {message}")]
    ObjectCreation {
        /// Kind of object, e.g. `"shader"` or `"framebuffer"`.
        object: &'static str,
        /// Message returned by the driver.
        message: String,
    },
    /// A shader stage did not compile.
    #[error("{stage} shader failed to compile: {log}")]
    ShaderCompile {
        /// Pipeline stage of the failed shader.
        stage: ShaderStage,
        /// Driver info log.
        log: String,
    },
    /// A program did not link.
    #[error("program link failed: {log}")]
    ProgramLink {
        /// Driver info log.
        log: String,
    },
    /// An offscreen framebuffer did not pass the completeness check.
    #[error("framebuffer incomplete (status {status:#06x})")]
    IncompleteFramebuffer {
        /// Value returned by `glCheckFramebufferStatus`.
        status: u32,
    },
}

impl GlError {
    pub(crate) fn creation(object: &'static str, message: String) -> Self {
        Self::ObjectCreation { object, message }
    }
}
