//! Visual mode selection for scan decals.

use serde::{Deserialize, Serialize};

/// Which visual a committed scan projects onto hit surfaces.
///
/// The mode is a pure tag: the renderer maps it to a binding set in one
/// lookup rather than branching through the render path.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisualMode {
    /// Small soft dots, one per hit point.
    Dots,
    /// Larger "window" quads carrying a projected mesh-grid pattern.
    #[default]
    Grid,
}
