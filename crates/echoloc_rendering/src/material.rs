//! Visual-mode binding sets.
//!
//! The mode is a tag; everything it implies - which texture slot the
//! shader samples, how large the quads are, whether the mesh-grid path is
//! on, how deep the projection reaches - comes out of one pure lookup
//! here. The render path never branches on the mode again.

use bytemuck::{Pod, Zeroable};
use echoloc_shared::VisualMode;

/// Texture slot a visual mode samples. The actual texture objects belong
/// to the presentation layer; the renderer only selects the slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureSlot {
    /// The soft dot sprite.
    Dot,
    /// The mesh-grid pattern.
    Grid,
}

/// Everything a visual mode binds, resolved in one lookup.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisualBindingSet {
    /// Which texture slot the shader samples.
    pub texture: TextureSlot,
    /// In-plane quad size for this mode.
    pub quad_scale: f32,
    /// Whether the mesh-grid shader path is active.
    pub mesh_grid: bool,
    /// How far past the floating quad surfaces may lie and still receive
    /// the projection: standoff + grid depth, so a larger standoff never
    /// starves the projection of reach.
    pub falloff: f32,
}

/// Resolves the binding set for a mode.
///
/// `dot_scale` and `grid_quad_size` are the per-mode quad sizes;
/// `standoff` and `grid_depth` combine into the projection falloff.
#[must_use]
pub fn visual_bindings(
    mode: VisualMode,
    dot_scale: f32,
    grid_quad_size: f32,
    standoff: f32,
    grid_depth: f32,
) -> VisualBindingSet {
    let falloff = standoff + grid_depth;
    match mode {
        VisualMode::Dots => VisualBindingSet {
            texture: TextureSlot::Dot,
            quad_scale: dot_scale,
            mesh_grid: false,
            falloff,
        },
        VisualMode::Grid => VisualBindingSet {
            texture: TextureSlot::Grid,
            quad_scale: grid_quad_size,
            mesh_grid: true,
            falloff,
        },
    }
}

/// GPU uniform carrying the resolved mode parameters.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, Pod, Zeroable)]
pub struct ModeUniforms {
    /// In-plane quad size.
    pub quad_scale: f32,
    /// Projection falloff distance.
    pub falloff: f32,
    /// 1 when the mesh-grid path is active, 0 for dots.
    pub mesh_grid: u32,
    /// Padding to 16 bytes for uniform layout.
    pub _pad: u32,
}

impl ModeUniforms {
    /// Packs a binding set for upload.
    #[must_use]
    pub fn from_bindings(bindings: &VisualBindingSet) -> Self {
        Self {
            quad_scale: bindings.quad_scale,
            falloff: bindings.falloff,
            mesh_grid: u32::from(bindings.mesh_grid),
            _pad: 0,
        }
    }
}
