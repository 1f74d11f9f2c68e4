//! Algorithm and depth complexity selection.
//!
//! Everything here is a pure function of the primitive set, the configured
//! preferences and the occlusion query capability, so the decision procedure
//! can be tested without a context.

use crate::types::{
    Algorithm, AlgorithmSetting, DepthComplexityAlgorithm, DepthComplexitySetting, Primitive,
};

/// Without occlusion queries, depth complexity sampling pays off above this
/// many primitives.
pub const SAMPLING_THRESHOLD: usize = 40;

/// With occlusion queries, they pay off above this many primitives.
pub const OCCLUSION_QUERY_THRESHOLD: usize = 20;

/// Convexity from which only Goldfeather renders correctly.
const GOLDFEATHER_CONVEXITY: u32 = 2;

/// What the dispatcher hands to an algorithm renderer.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RenderPlan {
    /// The algorithm to run.
    pub algorithm: Algorithm,
    /// The depth complexity strategy passed to it.
    pub depth_complexity: DepthComplexityAlgorithm,
}

/// Largest convexity in the set, `0` when it is empty.
pub fn max_convexity(primitives: &[&dyn Primitive]) -> u32 {
    primitives
        .iter()
        .map(|p| p.convexity())
        .max()
        .unwrap_or(0)
}

/// Goldfeather if any primitive has convexity 2 or more, SCS otherwise.
pub fn choose_algorithm(primitives: &[&dyn Primitive]) -> Algorithm {
    if max_convexity(primitives) >= GOLDFEATHER_CONVEXITY {
        Algorithm::Goldfeather
    } else {
        Algorithm::Scs
    }
}

/// Depth complexity strategy for a primitive set.
///
/// Sampling above [`SAMPLING_THRESHOLD`] primitives without occlusion
/// queries, occlusion queries above [`OCCLUSION_QUERY_THRESHOLD`] with them,
/// nothing otherwise.
pub fn choose_depth_complexity_algorithm(
    primitives: &[&dyn Primitive],
    hardware_occlusion_queries: bool,
) -> DepthComplexityAlgorithm {
    let count = primitives.len();
    if !hardware_occlusion_queries && count > SAMPLING_THRESHOLD {
        DepthComplexityAlgorithm::DepthComplexitySampling
    } else if hardware_occlusion_queries && count > OCCLUSION_QUERY_THRESHOLD {
        DepthComplexityAlgorithm::OcclusionQuery
    } else {
        DepthComplexityAlgorithm::NoDepthComplexitySampling
    }
}

/// Resolve the configured preferences into a concrete plan.
///
/// An automatic algorithm resolves both values and ignores `depth_complexity`.
/// A fixed algorithm with an automatic depth complexity setting is not a
/// renderable combination and yields `None`, as does an empty set. Occlusion
/// queries are downgraded to sampling when the hardware lacks them, whoever
/// asked for them.
pub fn plan(
    primitives: &[&dyn Primitive],
    algorithm: AlgorithmSetting,
    depth_complexity: DepthComplexitySetting,
    hardware_occlusion_queries: bool,
) -> Option<RenderPlan> {
    if primitives.is_empty() {
        return None;
    }

    let (algorithm, depth_complexity) = match algorithm.fixed() {
        Some(algorithm) => (algorithm, depth_complexity.fixed()),
        None => (
            choose_algorithm(primitives),
            Some(choose_depth_complexity_algorithm(
                primitives,
                hardware_occlusion_queries,
            )),
        ),
    };

    let mut depth_complexity = depth_complexity?;
    if depth_complexity == DepthComplexityAlgorithm::OcclusionQuery && !hardware_occlusion_queries
    {
        log::debug!("occlusion queries unavailable, falling back to depth complexity sampling");
        depth_complexity = DepthComplexityAlgorithm::DepthComplexitySampling;
    }

    Some(RenderPlan {
        algorithm,
        depth_complexity,
    })
}
