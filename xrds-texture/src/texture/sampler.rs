use wgpu_types::{AddressMode, CompareFunction, FilterMode};

/// Sampler configuration pushed to the driver alongside a texture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerState {
    pub min_filter: FilterMode,
    pub mag_filter: FilterMode,
    /// `None` disables mipmapping
    pub mipmap_filter: Option<FilterMode>,
    pub wrap_u: AddressMode,
    pub wrap_v: AddressMode,
    pub wrap_w: AddressMode,
    pub lod_min_clamp: f32,
    pub lod_max_clamp: f32,
    pub max_anisotropy: u16,
    /// Depth comparison mode for shadow sampling
    pub compare: Option<CompareFunction>,
}

impl Default for SamplerState {
    fn default() -> Self {
        Self {
            min_filter: FilterMode::Linear,
            mag_filter: FilterMode::Linear,
            mipmap_filter: None,
            wrap_u: AddressMode::ClampToEdge,
            wrap_v: AddressMode::ClampToEdge,
            wrap_w: AddressMode::ClampToEdge,
            lod_min_clamp: 0.0,
            lod_max_clamp: 1000.0,
            max_anisotropy: 1,
            compare: None,
        }
    }
}

impl SamplerState {
    pub fn nearest() -> Self {
        Self {
            min_filter: FilterMode::Nearest,
            mag_filter: FilterMode::Nearest,
            ..Default::default()
        }
    }

    pub(crate) fn force_nearest(&mut self) {
        self.min_filter = FilterMode::Nearest;
        self.mag_filter = FilterMode::Nearest;
    }

    pub(crate) fn clamp_all(&mut self) {
        self.wrap_u = AddressMode::ClampToEdge;
        self.wrap_v = AddressMode::ClampToEdge;
        self.wrap_w = AddressMode::ClampToEdge;
    }
}
