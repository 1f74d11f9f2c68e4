//! Renderer configuration.

use serde::{Deserialize, Serialize};

use crate::types::{AlgorithmSetting, DepthComplexitySetting, OffscreenSetting};

/// Preferences read by [`CsgRenderer::render`](crate::CsgRenderer::render).
///
/// Deserializable from any `serde` format so hosts can keep it in their own
/// config files. Missing fields take their defaults.
///
/// ```
/// # use csg_renderer_glow::{AlgorithmSetting, Settings};
/// let settings = Settings {
///     algorithm: AlgorithmSetting::Goldfeather,
///     ..Settings::default()
/// };
/// # let _ = settings;
/// ```
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Which CSG algorithm to run.
    pub algorithm: AlgorithmSetting,
    /// Which depth complexity strategy to pass to it.
    pub depth_complexity: DepthComplexitySetting,
    /// Which framebuffer flavour backs offscreen rendering.
    pub offscreen_type: OffscreenSetting,
}
