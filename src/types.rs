//! Core value types shared by the cache, the selector and the dispatcher.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Application-chosen identifier for a GL context.
///
/// The value is opaque to this crate and is never derived from a native
/// context handle. Resource records are keyed by it.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContextId(pub i32);

impl From<i32> for ContextId {
    fn from(id: i32) -> Self {
        Self(id)
    }
}

impl fmt::Display for ContextId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Programmable pipeline stage of a shader object.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    /// `GL_VERTEX_SHADER`
    Vertex,
    /// `GL_FRAGMENT_SHADER`
    Fragment,
}

impl ShaderStage {
    /// The GL enum passed to `glCreateShader`.
    #[must_use]
    pub fn gl_enum(self) -> u32 {
        match self {
            Self::Vertex => glow::VERTEX_SHADER,
            Self::Fragment => glow::FRAGMENT_SHADER,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
        })
    }
}

/// How a primitive takes part in the CSG product.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Operation {
    /// The primitive is intersected with the result.
    Intersection,
    /// The primitive is subtracted from the result.
    Subtraction,
}

/// A shape taking part in a CSG product.
///
/// Primitives stay owned by the application. The crate only borrows them for
/// the duration of a render call and never copies or drops them.
pub trait Primitive {
    /// Whether the primitive is intersected or subtracted.
    fn operation(&self) -> Operation;

    /// Maximum number of front faces any ray can cross on this primitive.
    ///
    /// Convex shapes report `1`. Anything `>= 2` requires the Goldfeather
    /// algorithm.
    fn convexity(&self) -> u32;

    /// Issue the draw calls for the primitive's geometry.
    ///
    /// Called by the algorithm renderers with the context already current.
    fn render(&self);
}

/// A concrete CSG rendering algorithm.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Algorithm {
    /// Goldfeather: handles concave primitives, more passes per frame.
    Goldfeather,
    /// Sequenced Convex Subtraction: cheaper, convex primitives only.
    Scs,
}

/// Configured algorithm preference.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlgorithmSetting {
    /// Pick the algorithm (and the depth complexity strategy) per call.
    #[default]
    Automatic,
    /// Always use Goldfeather.
    Goldfeather,
    /// Always use SCS.
    Scs,
}

impl AlgorithmSetting {
    /// The fixed algorithm, or `None` when the choice is automatic.
    #[must_use]
    pub fn fixed(self) -> Option<Algorithm> {
        match self {
            Self::Automatic => None,
            Self::Goldfeather => Some(Algorithm::Goldfeather),
            Self::Scs => Some(Algorithm::Scs),
        }
    }
}

impl From<Algorithm> for AlgorithmSetting {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Goldfeather => Self::Goldfeather,
            Algorithm::Scs => Self::Scs,
        }
    }
}

/// A concrete depth complexity strategy passed to the algorithm renderers.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthComplexityAlgorithm {
    /// Do not measure depth complexity.
    NoDepthComplexitySampling,
    /// Estimate depth complexity by counting in the stencil buffer.
    DepthComplexitySampling,
    /// Use hardware occlusion queries.
    OcclusionQuery,
}

/// Configured depth complexity preference.
///
/// [`Automatic`](Self::Automatic) only has an effect together with
/// [`AlgorithmSetting::Automatic`]. Paired with a fixed algorithm it means
/// "unused" and nothing is rendered.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DepthComplexitySetting {
    /// Chosen together with the algorithm; unused otherwise.
    Automatic,
    /// See [`DepthComplexityAlgorithm::NoDepthComplexitySampling`].
    #[default]
    NoDepthComplexitySampling,
    /// See [`DepthComplexityAlgorithm::DepthComplexitySampling`].
    DepthComplexitySampling,
    /// See [`DepthComplexityAlgorithm::OcclusionQuery`].
    OcclusionQuery,
}

impl DepthComplexitySetting {
    /// The fixed strategy, or `None` for [`Automatic`](Self::Automatic).
    #[must_use]
    pub fn fixed(self) -> Option<DepthComplexityAlgorithm> {
        match self {
            Self::Automatic => None,
            Self::NoDepthComplexitySampling => {
                Some(DepthComplexityAlgorithm::NoDepthComplexitySampling)
            }
            Self::DepthComplexitySampling => Some(DepthComplexityAlgorithm::DepthComplexitySampling),
            Self::OcclusionQuery => Some(DepthComplexityAlgorithm::OcclusionQuery),
        }
    }
}

impl From<DepthComplexityAlgorithm> for DepthComplexitySetting {
    fn from(algorithm: DepthComplexityAlgorithm) -> Self {
        match algorithm {
            DepthComplexityAlgorithm::NoDepthComplexitySampling => Self::NoDepthComplexitySampling,
            DepthComplexityAlgorithm::DepthComplexitySampling => Self::DepthComplexitySampling,
            DepthComplexityAlgorithm::OcclusionQuery => Self::OcclusionQuery,
        }
    }
}

/// Which framebuffer-object flavour backs an offscreen buffer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffscreenType {
    /// `ARB_framebuffer_object` / core GL 3.0 framebuffers.
    FrameBufferObjectArb,
    /// `EXT_framebuffer_object` with a packed depth-stencil attachment.
    FrameBufferObjectExt,
}

/// Configured offscreen buffer preference.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffscreenSetting {
    /// Pick from the extensions the context advertises.
    #[default]
    Automatic,
    /// Always use [`OffscreenType::FrameBufferObjectArb`].
    FrameBufferObjectArb,
    /// Always use [`OffscreenType::FrameBufferObjectExt`].
    FrameBufferObjectExt,
}

impl OffscreenSetting {
    /// The fixed type, or `None` when the choice is automatic.
    #[must_use]
    pub fn fixed(self) -> Option<OffscreenType> {
        match self {
            Self::Automatic => None,
            Self::FrameBufferObjectArb => Some(OffscreenType::FrameBufferObjectArb),
            Self::FrameBufferObjectExt => Some(OffscreenType::FrameBufferObjectExt),
        }
    }
}
