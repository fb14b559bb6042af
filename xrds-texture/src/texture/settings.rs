use wgpu_types::{Extent3d, TextureDimension};

use crate::{Constant, DeviceCaps, SamplerState, TextureFormat, XrdsTextureError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextureType {
    D2,
    Cube,
    D2Array,
    Volume,
}

impl TextureType {
    pub fn dimension(&self) -> TextureDimension {
        match self {
            TextureType::Volume => TextureDimension::D3,
            _ => TextureDimension::D2,
        }
    }

    /// Array and volume textures address slices through a third coordinate
    pub fn is_layered(&self) -> bool {
        matches!(self, TextureType::D2Array | TextureType::Volume)
    }

    pub fn face_count(&self) -> u32 {
        match self {
            TextureType::Cube => Constant::CUBE_FACE_COUNT,
            _ => 1,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MipmapsMode {
    #[default]
    None,
    Manual,
    Auto,
}

/// Declarative description of a texture resource.
#[derive(Debug, Clone)]
pub struct TextureSettings {
    pub label: Option<String>,
    pub texture_type: TextureType,
    pub format: TextureFormat,
    pub srgb: bool,
    pub width: u32,
    pub height: u32,
    /// Array layer count for 2D-array textures, depth for volume textures
    pub layers: u32,
    pub mipmaps: MipmapsMode,
    /// Explicit mip count; the full chain is used when unset
    pub mipmap_count: Option<u32>,
    pub render_target: bool,
    /// Defaults to `true` except for depth/stencil render targets
    pub readable: Option<bool>,
    pub msaa: u32,
    pub sampler: SamplerState,
}

impl Default for TextureSettings {
    fn default() -> Self {
        Self {
            label: None,
            texture_type: TextureType::D2,
            format: wgpu_types::TextureFormat::Rgba8Unorm.into(),
            srgb: false,
            width: 1,
            height: 1,
            layers: 1,
            mipmaps: MipmapsMode::None,
            mipmap_count: None,
            render_target: false,
            readable: None,
            msaa: 1,
            sampler: SamplerState::default(),
        }
    }
}

/// Policy decisions derived from settings and driver capabilities.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadPlan {
    /// Mipmaps are unusable because of limited NPOT support
    pub drop_mipmaps: bool,
    pub samples: u32,
    /// The request cannot be represented and a placeholder must be used
    pub use_placeholder: bool,
}

impl TextureSettings {
    pub fn new_2d(format: impl Into<TextureFormat>, width: u32, height: u32) -> Self {
        Self {
            format: format.into(),
            width,
            height,
            ..Default::default()
        }
    }

    pub fn is_readable(&self) -> bool {
        self.readable
            .unwrap_or(!(self.render_target && self.format.is_depth_stencil()))
    }

    pub fn depth(&self) -> u32 {
        match self.texture_type {
            TextureType::Volume => self.layers,
            _ => 1,
        }
    }

    pub fn layer_count(&self) -> u32 {
        match self.texture_type {
            TextureType::D2Array => self.layers,
            _ => 1,
        }
    }

    /// Base level extent; the third axis holds array layers or volume depth.
    pub fn extent(&self) -> Extent3d {
        Extent3d {
            width: self.width,
            height: self.height,
            depth_or_array_layers: self.depth().max(self.layer_count()),
        }
    }

    pub fn full_mip_chain(&self) -> u32 {
        self.extent().max_mips(self.texture_type.dimension())
    }

    pub fn mip_count(&self) -> u32 {
        match self.mipmaps {
            MipmapsMode::None => 1,
            _ => self.mipmap_count.unwrap_or_else(|| self.full_mip_chain()),
        }
    }

    pub fn is_power_of_two(&self) -> bool {
        self.width.is_power_of_two()
            && self.height.is_power_of_two()
            && self.depth().is_power_of_two()
    }

    /// Checks the settings without touching the driver.
    pub fn validate(&self) -> anyhow::Result<()> {
        let invalid = |message: String| -> anyhow::Result<()> {
            Err(XrdsTextureError::InvalidArgument(message).into())
        };

        if self.width == 0 || self.height == 0 || self.layers == 0 {
            return invalid(format!(
                "Texture dimensions must be greater than 0 (got {}x{}x{})",
                self.width, self.height, self.layers
            ));
        }
        match self.texture_type {
            TextureType::D2 | TextureType::Cube if self.layers != 1 => {
                return invalid(format!(
                    "{:?} textures cannot have {} layers",
                    self.texture_type, self.layers
                ));
            }
            TextureType::Cube if self.width != self.height => {
                return invalid("Cube textures must have equal width and height".to_owned());
            }
            _ => {}
        }
        if self.render_target && self.format.is_compressed() {
            return invalid("Render targets cannot use a compressed format".to_owned());
        }
        if !self.render_target && !self.is_readable() {
            return invalid("Only render targets can be non-readable".to_owned());
        }
        if self.mipmaps != MipmapsMode::None {
            if !self.is_readable() {
                return invalid("Non-readable textures cannot have mipmaps".to_owned());
            }
            if self.msaa > 1 {
                return invalid("Multisampled textures cannot have mipmaps".to_owned());
            }
            let chain = self.full_mip_chain();
            if let Some(count) = self.mipmap_count {
                if count == 0 || count > chain {
                    return invalid(format!(
                        "Mipmap count {} is outside of the valid range 1..={}",
                        count, chain
                    ));
                }
            }
        }

        Ok(())
    }

    pub fn exceeds_limits(&self, caps: &DeviceCaps) -> bool {
        let max_2d = self.width.max(self.height);
        match self.texture_type {
            TextureType::Volume => max_2d.max(self.layers) > caps.max_3d_texture_size,
            TextureType::D2Array => {
                max_2d > caps.max_texture_size || self.layers > caps.max_texture_layers
            }
            TextureType::Cube => max_2d > caps.max_cube_texture_size,
            TextureType::D2 => max_2d > caps.max_texture_size,
        }
    }

    pub fn plan(&self, caps: &DeviceCaps) -> LoadPlan {
        LoadPlan {
            drop_mipmaps: !caps.full_npot
                && !(self.width.is_power_of_two() && self.height.is_power_of_two()),
            samples: self.msaa.min(caps.max_samples).max(1),
            use_placeholder: !self.render_target && self.exceeds_limits(caps),
        }
    }
}
