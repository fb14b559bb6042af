use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::{TextureFormat, XrdsTextureError};

/// CPU-side pixels of a single texture slice at one mip level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SliceImage {
    format: TextureFormat,
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl SliceImage {
    /// Zero-filled image
    pub fn new(format: TextureFormat, width: u32, height: u32) -> Self {
        Self {
            format,
            width,
            height,
            data: vec![0; format.slice_size(width, height)],
        }
    }

    pub fn from_bytes(
        format: TextureFormat,
        width: u32,
        height: u32,
        data: Vec<u8>,
    ) -> anyhow::Result<Self> {
        let expected = format.slice_size(width, height);
        if data.len() != expected {
            return Err(XrdsTextureError::InvalidArgument(format!(
                "{}x{} {:?} image needs {} bytes, got {}",
                width,
                height,
                format.as_wgpu(),
                expected,
                data.len()
            ))
            .into());
        }
        Ok(Self {
            format,
            width,
            height,
            data,
        })
    }

    pub fn format(&self) -> TextureFormat {
        self.format
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Source images of a texture addressed by (slice, mip).
#[derive(Debug, Clone, Default)]
pub struct SliceStore {
    images: FxHashMap<(u32, u32), Arc<SliceImage>>,
}

impl SliceStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, slice: u32, mip: u32) -> Option<&Arc<SliceImage>> {
        self.images.get(&(slice, mip))
    }

    pub fn set(&mut self, slice: u32, mip: u32, image: Arc<SliceImage>) {
        self.images.insert((slice, mip), image);
    }

    pub fn remove(&mut self, slice: u32, mip: u32) -> Option<Arc<SliceImage>> {
        self.images.remove(&(slice, mip))
    }

    pub fn clear(&mut self) {
        self.images.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }

    /// Number of mip levels holding data, counted up to the highest one
    pub fn mipmap_count(&self) -> u32 {
        self.images
            .keys()
            .map(|(_, mip)| mip + 1)
            .max()
            .unwrap_or(0)
    }

    /// Number of slices holding data at `mip`, counted up to the highest one
    pub fn slice_count(&self, mip: u32) -> u32 {
        self.images
            .keys()
            .filter(|(_, m)| *m == mip)
            .map(|(slice, _)| slice + 1)
            .max()
            .unwrap_or(0)
    }

    /// Total byte size of all images at `mip`
    pub fn mip_byte_size(&self, mip: u32) -> usize {
        self.images
            .iter()
            .filter(|((_, m), _)| *m == mip)
            .map(|(_, image)| image.len())
            .sum()
    }
}
