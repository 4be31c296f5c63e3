//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }

    pub fn desc() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Vertex>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &[
                wgpu::VertexAttribute {
                    offset: 0,
                    shader_location: 0,
                    format: wgpu::VertexFormat::Float32x2,
                },
                wgpu::VertexAttribute {
                    offset: std::mem::size_of::<[f32; 2]>() as wgpu::BufferAddress,
                    shader_location: 1,
                    format: wgpu::VertexFormat::Float32x4,
                },
            ],
        }
    }
}

/// Scene colors
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.039, 1.0];
    pub const STAR_BRIGHT: [f32; 3] = [1.0, 1.0, 1.0];
    pub const STAR_DIM: [f32; 3] = [0.863, 0.902, 1.0];

    pub const SUN_CORE: [f32; 3] = [1.0, 1.0, 1.0];
    pub const SUN_MID: [f32; 3] = [1.0, 0.961, 0.753];
    pub const SUN_EDGE: [f32; 3] = [0.992, 0.722, 0.075];
    pub const SUN_CORE_WARM: [f32; 3] = [1.0, 0.953, 0.800];
    pub const SUN_MID_WARM: [f32; 3] = [1.0, 0.827, 0.541];
    pub const SUN_EDGE_WARM: [f32; 3] = [0.816, 0.478, 0.180];
    /// Outer to inner glow shell tints
    pub const SUN_GLOW: [[f32; 3]; 4] = [
        [0.498, 0.227, 0.086],
        [1.0, 0.533, 0.0],
        [1.0, 0.702, 0.0],
        [1.0, 0.843, 0.0],
    ];
    pub const SUN_GLOW_WARM: [[f32; 3]; 4] = [
        [0.498, 0.227, 0.086],
        [0.714, 0.361, 0.122],
        [0.847, 0.545, 0.165],
        [0.941, 0.753, 0.337],
    ];

    pub const EARTH_LIGHT: [f32; 3] = [0.478, 0.878, 1.0];
    pub const EARTH_DARK: [f32; 3] = [0.035, 0.188, 0.353];
    pub const EARTH_GLOW: [f32; 3] = [0.345, 0.718, 1.0];
    pub const EARTH_LAND: [f32; 3] = [0.227, 0.478, 0.165];

    pub const MOON_LIGHT: [f32; 3] = [0.816, 0.812, 0.784];
    pub const MOON_DARK: [f32; 3] = [0.333, 0.329, 0.314];
    pub const MOON_GLOW: [f32; 3] = [0.667, 0.667, 0.667];

    pub const CENTAURI_GLOW: [f32; 3] = [0.608, 0.839, 1.0];
    pub const CENTAURI_STAR: [f32; 4] = [0.902, 0.961, 1.0, 0.95];
    pub const CENTAURI_LINE: [f32; 4] = [0.706, 0.863, 1.0, 0.45];

    pub const SATURN_RING: [f32; 4] = [0.831, 0.725, 0.376, 0.55];

    pub const GALAXY_EDGE: [f32; 4] = [0.392, 0.235, 0.706, 0.35];
    pub const GALAXY_CORE: [f32; 4] = [0.627, 0.392, 1.0, 0.45];

    pub const FOG: [f32; 3] = [0.0, 0.0, 0.039];
    pub const VIGNETTE: [f32; 3] = [0.0, 0.0, 0.0];

    pub const SLOT_EMPTY: [f32; 4] = [0.580, 0.639, 0.722, 0.52];
    pub const SLOT_RING: [f32; 4] = [1.0, 1.0, 1.0, 0.75];
    pub const SLOT_RING_EMPTY: [f32; 4] = [0.580, 0.639, 0.722, 0.6];

    pub const MARKER_RING: [f32; 3] = [1.0, 1.0, 1.0];
    pub const MARKER_FLASH: [f32; 3] = [1.0, 0.706, 0.314];
}
