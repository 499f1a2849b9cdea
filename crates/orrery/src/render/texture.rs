//! # Texture — Image Loading and Sampling
//!
//! The textured sample binds one texture and one sampler at group 1. The
//! image is decoded on the CPU with the `image` crate, converted to RGBA8, and
//! uploaded as `Rgba8UnormSrgb` so the sampler returns linear values.
//!
//! The sampler filters linearly in all three dimensions and repeats in both
//! directions.

use std::path::{Path, PathBuf};

use wgpu::util::DeviceExt;

use crate::error::{RenderError, RenderResult};
use crate::render::GpuContext;

/// Decoded RGBA8 pixels ready for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

impl ImageData {
    /// Decode an image file.
    pub fn load(path: &Path) -> RenderResult<Self> {
        let img = image::open(path)
            .map_err(|source| RenderError::TextureLoad {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        let (width, height) = img.dimensions();
        Ok(Self {
            width,
            height,
            rgba: img.into_raw(),
        })
    }
}

/// The bound texture, its sampler, and the bind group that ties them together.
pub(crate) struct SampleTexture {
    pub path: PathBuf,
    pub sampler: wgpu::Sampler,
    pub bind_group: wgpu::BindGroup,
    pub size: (u32, u32),
}

impl SampleTexture {
    /// Load `path` and build the group 1 bind group against `layout`.
    pub fn load(gpu: &GpuContext, layout: &wgpu::BindGroupLayout, path: &Path) -> RenderResult<Self> {
        let image = ImageData::load(path)?;

        let sampler = gpu.device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sample sampler"),
            address_mode_u: wgpu::AddressMode::Repeat,
            address_mode_v: wgpu::AddressMode::Repeat,
            address_mode_w: wgpu::AddressMode::Repeat,
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bind_group = create_bind_group(gpu, layout, &sampler, &image);
        log::debug!(
            "Loaded texture '{}' ({}x{})",
            path.display(),
            image.width,
            image.height
        );

        Ok(Self {
            path: path.to_path_buf(),
            sampler,
            bind_group,
            size: (image.width, image.height),
        })
    }

    /// Replace the image (hot-reload). The sampler is kept.
    pub fn reload(&mut self, gpu: &GpuContext, layout: &wgpu::BindGroupLayout) -> RenderResult<()> {
        let image = ImageData::load(&self.path)?;
        self.bind_group = create_bind_group(gpu, layout, &self.sampler, &image);
        self.size = (image.width, image.height);
        Ok(())
    }
}

fn create_bind_group(
    gpu: &GpuContext,
    layout: &wgpu::BindGroupLayout,
    sampler: &wgpu::Sampler,
    image: &ImageData,
) -> wgpu::BindGroup {
    let texture = gpu.device.create_texture_with_data(
        &gpu.queue,
        &wgpu::TextureDescriptor {
            label: Some("sample texture"),
            size: wgpu::Extent3d {
                width: image.width,
                height: image.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8UnormSrgb,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        },
        wgpu::util::TextureDataOrder::LayerMajor,
        &image.rgba,
    );
    let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

    gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some("texture bind group"),
        layout,
        entries: &[
            wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::TextureView(&view),
            },
            wgpu::BindGroupEntry {
                binding: 1,
                resource: wgpu::BindingResource::Sampler(sampler),
            },
        ],
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bundled_texture_decodes_to_rgba() {
        let path = crate::config::SampleConfig::default().texture_path;
        let image = ImageData::load(&path).unwrap();
        assert!(image.width > 0 && image.height > 0);
        assert_eq!(image.rgba.len(), (image.width * image.height * 4) as usize);
    }

    #[test]
    fn missing_file_is_a_texture_load_error() {
        let err = ImageData::load(Path::new("does/not/exist.png")).unwrap_err();
        match err {
            RenderError::TextureLoad { path, .. } => {
                assert_eq!(path, PathBuf::from("does/not/exist.png"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
