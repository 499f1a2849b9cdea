//! # Constants — Per-Draw and Persistent Shader Parameters
//!
//! Two uniform buffers feed the shaders, both in bind group 0:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │ binding 0 — FrameConstants (per draw, dynamic offset)       │
//! │   model_view_projection: mat4x4   64 bytes                  │
//! │   model:                 mat4x4   64 bytes                  │
//! │   light_dir:         2 × vec4     32 bytes → 160            │
//! ├─────────────────────────────────────────────────────────────┤
//! │ binding 1 — PersistentConstants (written once at creation)  │
//! │   light_color:       2 × vec4     32 bytes                  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## One Slot per Draw
//!
//! Each drawable needs its own `FrameConstants`. `queue.write_buffer` only
//! lands at submit time, so rewriting one 160-byte block between draws would
//! leave every draw seeing the last write. Instead the buffer holds one slot
//! per drawable at `min_uniform_buffer_offset_alignment` strides; the CPU
//! fills the slots in [`FrameConstantsStaging`], uploads them in one write,
//! and each draw binds its slot through a dynamic offset.
//!
//! ## Matrix Convention
//!
//! glam matrices act on column vectors and are stored column-major, which is
//! what WGSL's `mat4x4<f32>` expects. In row-vector notation the combined
//! transform is `object × view × projection` and has to be transposed before
//! upload; in glam that same matrix is `projection * view * object`, and
//! storing its columns is that transpose.

use bytemuck::{Pod, Zeroable};

use super::renderer::DrawPlan;
use crate::math::{Mat4, Vec4};
use crate::scene::MAX_LIGHTS;

/// Constants written before every draw.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct FrameConstants {
    pub model_view_projection: [[f32; 4]; 4], // 64 bytes
    pub model: [[f32; 4]; 4],                 // 64 bytes
    pub light_dir: [[f32; 4]; MAX_LIGHTS],    // 32 bytes → total 160
}

impl FrameConstants {
    /// Build the constants for one object drawn through `view` and `projection`.
    pub fn new(object: Mat4, view: Mat4, projection: Mat4, lights: [Vec4; MAX_LIGHTS]) -> Self {
        Self {
            model_view_projection: (projection * view * object).to_cols_array_2d(),
            model: object.to_cols_array_2d(),
            light_dir: lights.map(|l| l.to_array()),
        }
    }

    /// The combined transform as uploaded.
    pub fn model_view_projection(&self) -> Mat4 {
        Mat4::from_cols_array_2d(&self.model_view_projection)
    }
}

/// Constants written once at creation and never changed.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PersistentConstants {
    pub light_color: [[f32; 4]; MAX_LIGHTS], // 32 bytes
}

impl Default for PersistentConstants {
    fn default() -> Self {
        Self {
            light_color: [
                // Neutral gray.
                [0.5, 0.5, 0.5, 1.0],
                // Dim red.
                [0.5, 0.0, 0.0, 1.0],
            ],
        }
    }
}

/// CPU-side copy of the per-draw constant buffer, one aligned slot per draw.
pub struct FrameConstantsStaging {
    bytes: Vec<u8>,
    stride: usize,
}

impl FrameConstantsStaging {
    /// Allocate `slots` slots aligned to `alignment` bytes (a power of two).
    pub fn new(slots: usize, alignment: u32) -> Self {
        let stride = align_up(std::mem::size_of::<FrameConstants>(), alignment as usize);
        Self {
            bytes: vec![0; stride * slots.max(1)],
            stride,
        }
    }

    /// Number of slots.
    pub fn slots(&self) -> usize {
        self.bytes.len() / self.stride
    }

    /// Byte distance between slots.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Total buffer size the GPU copy needs.
    pub fn size(&self) -> u64 {
        self.bytes.len() as u64
    }

    /// Dynamic offset to bind `slot` with.
    pub fn dynamic_offset(&self, slot: usize) -> u32 {
        (slot * self.stride) as u32
    }

    /// Take exclusive write access to one slot. The write becomes part of
    /// the next upload once the returned guard is dropped.
    pub fn map(&mut self, slot: usize) -> MappedSlot<'_> {
        debug_assert!(slot < self.slots(), "slot {slot} out of range");
        let start = slot * self.stride;
        MappedSlot {
            data: &mut self.bytes[start..start + std::mem::size_of::<FrameConstants>()],
        }
    }

    /// Write each planned draw's constants into its own slot, in draw order.
    /// Returns the dynamic offset to bind for each draw.
    pub fn stage(&mut self, plan: &DrawPlan) -> Vec<u32> {
        debug_assert!(plan.items.len() <= self.slots(), "more draws than slots");
        plan.items
            .iter()
            .enumerate()
            .map(|(slot, item)| {
                self.map(slot).write(&item.constants);
                self.dynamic_offset(slot)
            })
            .collect()
    }

    /// Read back what a slot holds.
    pub fn read(&self, slot: usize) -> FrameConstants {
        let start = slot * self.stride;
        bytemuck::pod_read_unaligned(
            &self.bytes[start..start + std::mem::size_of::<FrameConstants>()],
        )
    }

    /// All slots, ready for `queue.write_buffer`.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

/// Exclusive write access to one slot of [`FrameConstantsStaging`].
pub struct MappedSlot<'a> {
    data: &'a mut [u8],
}

impl MappedSlot<'_> {
    /// Overwrite the slot.
    pub fn write(&mut self, constants: &FrameConstants) {
        self.data.copy_from_slice(bytemuck::bytes_of(constants));
    }
}

/// Round `value` up to the next multiple of `align`.
fn align_up(value: usize, align: usize) -> usize {
    (value + align - 1) & !(align - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::Vec3;

    fn view() -> Mat4 {
        Mat4::look_at_lh(Vec3::new(0.0, 2.5, 5.0), Vec3::ZERO, Vec3::Y)
    }

    fn projection() -> Mat4 {
        Mat4::perspective_lh(std::f32::consts::FRAC_PI_2, 4.0 / 3.0, 0.1, 100.0)
    }

    #[test]
    fn layouts_match_shader_sizes() {
        assert_eq!(std::mem::size_of::<FrameConstants>(), 160);
        assert_eq!(std::mem::size_of::<PersistentConstants>(), 32);
    }

    #[test]
    fn uploaded_transform_is_transposed_row_vector_product() {
        let object = Mat4::from_rotation_y(0.7);
        let constants = FrameConstants::new(object, view(), projection(), [Vec4::ZERO; 2]);

        // Row-vector matrices are the transposes of glam's column-vector ones.
        let row_product = object.transpose() * view().transpose() * projection().transpose();
        let expected_upload = row_product.transpose();

        assert!(constants.model_view_projection().abs_diff_eq(expected_upload, 1e-5));
    }

    #[test]
    fn transform_survives_staging_bytes() {
        let object = Mat4::from_scale_rotation_translation(
            Vec3::splat(0.25),
            Default::default(),
            Vec3::new(0.0, 0.0, 4.0),
        );
        let lights = [Vec4::new(0.0, 0.0, 1.0, 1.0), Vec4::new(0.0, 0.0, -1.0, 1.0)];
        let constants = FrameConstants::new(object, view(), projection(), lights);

        let mut staging = FrameConstantsStaging::new(3, 256);
        staging.map(2).write(&constants);

        let start = staging.dynamic_offset(2) as usize;
        let raw = &staging.as_bytes()[start..start + 64];
        let cols: Vec<f32> = raw
            .chunks_exact(4)
            .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        let rebuilt = Mat4::from_cols_slice(&cols);

        assert!(rebuilt.abs_diff_eq(projection() * view() * object, 1e-6));
        assert_eq!(staging.read(2), constants);
        assert_eq!(staging.read(2).light_dir, [[0.0, 0.0, 1.0, 1.0], [0.0, 0.0, -1.0, 1.0]]);
    }

    #[test]
    fn slots_are_aligned() {
        let staging = FrameConstantsStaging::new(3, 256);
        assert_eq!(staging.stride(), 256);
        assert_eq!(staging.slots(), 3);
        assert_eq!(staging.size(), 768);
        assert_eq!(staging.dynamic_offset(1), 256);

        let tight = FrameConstantsStaging::new(2, 32);
        assert_eq!(tight.stride(), 160);
    }

    #[test]
    fn writing_one_slot_leaves_others_alone() {
        let mut staging = FrameConstantsStaging::new(2, 256);
        let constants = FrameConstants::new(Mat4::IDENTITY, Mat4::IDENTITY, Mat4::IDENTITY, [Vec4::ONE; 2]);
        staging.map(0).write(&constants);
        assert_eq!(staging.read(0), constants);
        assert_eq!(staging.read(1), FrameConstants::zeroed());
    }

    #[test]
    fn persistent_colors_are_gray_and_dim_red() {
        let persistent = PersistentConstants::default();
        assert_eq!(persistent.light_color[0], [0.5, 0.5, 0.5, 1.0]);
        assert_eq!(persistent.light_color[1], [0.5, 0.0, 0.0, 1.0]);
    }
}
