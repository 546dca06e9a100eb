use bytemuck::{Pod, Zeroable};

use crate::anim::{FrameRect, Placement};

/// Per-instance quad data uploaded to the GPU each frame.
/// Stride = 36 bytes.
#[repr(C)]
#[derive(Debug, Clone, Copy, Pod, Zeroable)]
pub struct QuadInstance {
    /// Destination origin in logical screen pixels (top-left).
    pub dst_pos: [f32; 2],
    /// Destination size in logical screen pixels.
    pub dst_size: [f32; 2],
    /// Source-rect origin in normalized texture coordinates.
    pub uv_pos: [f32; 2],
    /// Source-rect size in normalized texture coordinates.
    pub uv_size: [f32; 2],
    /// RGBA color packed as u32, multiplied with the sampled texel.
    pub tint: u32,
}

const WHITE: u32 = 0xFFFF_FFFF;

impl QuadInstance {
    /// One animation frame: sample `frame` out of a `sheet_w` x `sheet_h`
    /// sheet and place it at `placement`.
    pub fn sprite(placement: &Placement, frame: FrameRect, sheet_w: u32, sheet_h: u32) -> Self {
        Self {
            dst_pos: [placement.x as f32, placement.y as f32],
            dst_size: [placement.w as f32, placement.h as f32],
            uv_pos: [
                frame.x as f32 / sheet_w as f32,
                frame.y as f32 / sheet_h as f32,
            ],
            uv_size: [
                frame.w as f32 / sheet_w as f32,
                frame.h as f32 / sheet_h as f32,
            ],
            tint: WHITE,
        }
    }

    /// A whole texture stretched over the given destination.
    pub fn full_texture(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            dst_pos: [x, y],
            dst_size: [w, h],
            uv_pos: [0.0, 0.0],
            uv_size: [1.0, 1.0],
            tint: WHITE,
        }
    }

    /// A solid rectangle. Drawn through the 1x1 white texture, colored by
    /// the tint channel.
    pub fn solid(x: f32, y: f32, w: f32, h: f32, color: u32) -> Self {
        Self {
            dst_pos: [x, y],
            dst_size: [w, h],
            uv_pos: [0.0, 0.0],
            uv_size: [1.0, 1.0],
            tint: color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sprite_uv_selects_the_frame_cell() {
        let placement = Placement::new(10, 20, 256, 252);
        let frame = FrameRect { x: 384, y: 126, w: 128, h: 126 };
        let inst = QuadInstance::sprite(&placement, frame, 512, 252);

        assert_eq!(inst.dst_pos, [10.0, 20.0]);
        assert_eq!(inst.uv_pos, [0.75, 0.5]);
        assert_eq!(inst.uv_size, [0.25, 0.5]);
    }
}
