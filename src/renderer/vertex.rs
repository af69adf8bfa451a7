//! Vertex types for 2D rendering

use bytemuck::{Pod, Zeroable};

/// 2D vertex with position (canvas pixels until uploaded) and RGBA color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
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

/// Fixed scene colors (8-bit channels)
pub mod colors {
    use crate::color::Rgb;

    pub const BACKGROUND: Rgb = Rgb::new(20, 20, 30);
    pub const GROUND: Rgb = Rgb::new(40, 40, 50);
    pub const GRID: Rgb = Rgb::new(40, 40, 50);
    pub const SHADOW: Rgb = Rgb::new(0, 0, 0);
    pub const STICK: Rgb = Rgb::new(100, 80, 60);
    pub const PIVOT: Rgb = Rgb::new(200, 200, 200);
    pub const PIVOT_SUPPORT: Rgb = Rgb::new(150, 150, 150);
    pub const STRING: Rgb = Rgb::new(100, 100, 100);
    pub const OUTLINE: Rgb = Rgb::new(255, 255, 255);
    pub const FORCE_GRAVITY: Rgb = Rgb::new(255, 0, 0);
    pub const FORCE_TENSION: Rgb = Rgb::new(0, 255, 0);
    pub const FORCE_VELOCITY: Rgb = Rgb::new(0, 0, 255);
}
