use wgpu_types::{Features, TextureFormatFeatureFlags};

use crate::XrdsTextureError;

/// Pixel formats understood by texture resources.
/// This is a thin wrapper over the graphics library's texture formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureFormat(wgpu_types::TextureFormat);

impl TextureFormat {
    pub fn as_wgpu(&self) -> wgpu_types::TextureFormat {
        self.0
    }

    pub fn is_compressed(&self) -> bool {
        self.0.is_compressed()
    }

    pub fn is_depth_stencil(&self) -> bool {
        self.0.is_depth_stencil_format()
    }

    pub fn has_depth(&self) -> bool {
        self.0.has_depth_aspect()
    }

    pub fn has_stencil(&self) -> bool {
        self.0.has_stencil_aspect()
    }

    pub fn is_srgb(&self) -> bool {
        self.0.is_srgb()
    }

    /// Same format without the sRGB transfer function, used for readback.
    pub fn linear(&self) -> Self {
        Self(self.0.remove_srgb_suffix())
    }

    pub fn with_srgb(&self, srgb: bool) -> Self {
        if srgb {
            Self(self.0.add_srgb_suffix())
        } else {
            *self
        }
    }

    /// Filtering capability without any optional device features
    pub fn is_filterable(&self) -> bool {
        self.0
            .guaranteed_format_features(Features::empty())
            .flags
            .contains(TextureFormatFeatureFlags::FILTERABLE)
    }

    pub fn block_dimensions(&self) -> (u32, u32) {
        self.0.block_dimensions()
    }

    /// Bytes per block (per texel for uncompressed formats).
    pub fn block_size(&self) -> u32 {
        match self.0 {
            wgpu_types::TextureFormat::Depth24Plus => 4,
            wgpu_types::TextureFormat::Depth24PlusStencil8 => 4,
            wgpu_types::TextureFormat::Depth32FloatStencil8 => 8,
            fmt => fmt.block_copy_size(None).unwrap_or(4),
        }
    }

    /// Size in bytes of one `width` x `height` image of this format.
    pub fn slice_size(&self, width: u32, height: u32) -> usize {
        let (block_width, block_height) = self.block_dimensions();
        let blocks_x = width.div_ceil(block_width) as usize;
        let blocks_y = height.div_ceil(block_height) as usize;
        blocks_x * blocks_y * self.block_size() as usize
    }
}

impl From<wgpu_types::TextureFormat> for TextureFormat {
    fn from(value: wgpu_types::TextureFormat) -> Self {
        Self(value)
    }
}

/// Framebuffer binding point a format occupies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttachmentRole {
    None,
    Color,
    Depth,
    Stencil,
    DepthStencil,
}

/// Driver-side storage description for a [`TextureFormat`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverFormat {
    format: TextureFormat,
    internal: u32,
    external: u32,
    transfer: u32,
    attachments: [AttachmentRole; 2],
}

impl DriverFormat {
    pub fn new(
        format: TextureFormat,
        internal: u32,
        external: u32,
        transfer: u32,
        attachments: [AttachmentRole; 2],
    ) -> Self {
        Self {
            format,
            internal,
            external,
            transfer,
            attachments,
        }
    }

    pub fn format(&self) -> TextureFormat {
        self.format
    }

    pub fn internal(&self) -> u32 {
        self.internal
    }

    pub fn external(&self) -> u32 {
        self.external
    }

    pub fn transfer(&self) -> u32 {
        self.transfer
    }

    pub fn is_compressed(&self) -> bool {
        self.format.is_compressed()
    }

    /// Attachment roles in binding order, `None` entries skipped
    pub fn attachments(&self) -> impl Iterator<Item = AttachmentRole> + '_ {
        self.attachments
            .iter()
            .copied()
            .filter(|role| *role != AttachmentRole::None)
    }
}

/// Reference OpenGL translation table.
///
/// `renderbuffer` selects storage for a renderbuffer, which cannot hold
/// block-compressed data.
pub fn gl_format(
    format: TextureFormat,
    srgb: bool,
    renderbuffer: bool,
) -> anyhow::Result<DriverFormat> {
    use wgpu_types::TextureFormat as F;
    use AttachmentRole::{Color, Depth, DepthStencil, None as NoRole, Stencil};

    let format = format.with_srgb(srgb);
    if renderbuffer && format.is_compressed() {
        return Err(XrdsTextureError::UnsupportedFeature(format!(
            "Compressed format {:?} cannot back a renderbuffer",
            format.as_wgpu()
        ))
        .into());
    }

    let (internal, external, transfer, attachments) = match format.as_wgpu() {
        F::R8Unorm => (glow::R8, glow::RED, glow::UNSIGNED_BYTE, [Color, NoRole]),
        F::Rg8Unorm => (glow::RG8, glow::RG, glow::UNSIGNED_BYTE, [Color, NoRole]),
        F::Rgba8Unorm => (glow::RGBA8, glow::RGBA, glow::UNSIGNED_BYTE, [Color, NoRole]),
        F::Rgba8UnormSrgb => (
            glow::SRGB8_ALPHA8,
            glow::RGBA,
            glow::UNSIGNED_BYTE,
            [Color, NoRole],
        ),
        F::Bgra8Unorm => (glow::RGBA8, glow::BGRA, glow::UNSIGNED_BYTE, [Color, NoRole]),
        F::Bgra8UnormSrgb => (
            glow::SRGB8_ALPHA8,
            glow::BGRA,
            glow::UNSIGNED_BYTE,
            [Color, NoRole],
        ),
        F::R16Float => (glow::R16F, glow::RED, glow::HALF_FLOAT, [Color, NoRole]),
        F::Rg16Float => (glow::RG16F, glow::RG, glow::HALF_FLOAT, [Color, NoRole]),
        F::Rgba16Float => (glow::RGBA16F, glow::RGBA, glow::HALF_FLOAT, [Color, NoRole]),
        F::R32Float => (glow::R32F, glow::RED, glow::FLOAT, [Color, NoRole]),
        F::Rg32Float => (glow::RG32F, glow::RG, glow::FLOAT, [Color, NoRole]),
        F::Rgba32Float => (glow::RGBA32F, glow::RGBA, glow::FLOAT, [Color, NoRole]),
        F::Rgb10a2Unorm => (
            glow::RGB10_A2,
            glow::RGBA,
            glow::UNSIGNED_INT_2_10_10_10_REV,
            [Color, NoRole],
        ),
        F::Stencil8 => (
            glow::STENCIL_INDEX8,
            glow::STENCIL_INDEX,
            glow::UNSIGNED_BYTE,
            [Stencil, NoRole],
        ),
        F::Depth16Unorm => (
            glow::DEPTH_COMPONENT16,
            glow::DEPTH_COMPONENT,
            glow::UNSIGNED_SHORT,
            [Depth, NoRole],
        ),
        F::Depth24Plus => (
            glow::DEPTH_COMPONENT24,
            glow::DEPTH_COMPONENT,
            glow::UNSIGNED_INT,
            [Depth, NoRole],
        ),
        F::Depth32Float => (
            glow::DEPTH_COMPONENT32F,
            glow::DEPTH_COMPONENT,
            glow::FLOAT,
            [Depth, NoRole],
        ),
        F::Depth24PlusStencil8 => (
            glow::DEPTH24_STENCIL8,
            glow::DEPTH_STENCIL,
            glow::UNSIGNED_INT_24_8,
            [DepthStencil, NoRole],
        ),
        F::Depth32FloatStencil8 => (
            glow::DEPTH32F_STENCIL8,
            glow::DEPTH_STENCIL,
            glow::FLOAT_32_UNSIGNED_INT_24_8_REV,
            [DepthStencil, NoRole],
        ),
        F::Bc4RUnorm => (glow::COMPRESSED_RED_RGTC1, 0, 0, [Color, NoRole]),
        F::Bc5RgUnorm => (glow::COMPRESSED_RG_RGTC2, 0, 0, [Color, NoRole]),
        F::Bc6hRgbUfloat => (glow::COMPRESSED_RGB_BPTC_UNSIGNED_FLOAT, 0, 0, [Color, NoRole]),
        F::Bc7RgbaUnorm => (glow::COMPRESSED_RGBA_BPTC_UNORM, 0, 0, [Color, NoRole]),
        F::Bc7RgbaUnormSrgb => (glow::COMPRESSED_SRGB_ALPHA_BPTC_UNORM, 0, 0, [Color, NoRole]),
        F::Etc2Rgb8Unorm => (glow::COMPRESSED_RGB8_ETC2, 0, 0, [Color, NoRole]),
        F::Etc2Rgb8UnormSrgb => (glow::COMPRESSED_SRGB8_ETC2, 0, 0, [Color, NoRole]),
        F::Etc2Rgba8Unorm => (glow::COMPRESSED_RGBA8_ETC2_EAC, 0, 0, [Color, NoRole]),
        F::Etc2Rgba8UnormSrgb => (glow::COMPRESSED_SRGB8_ALPHA8_ETC2_EAC, 0, 0, [Color, NoRole]),
        F::EacR11Unorm => (glow::COMPRESSED_R11_EAC, 0, 0, [Color, NoRole]),
        F::EacRg11Unorm => (glow::COMPRESSED_RG11_EAC, 0, 0, [Color, NoRole]),
        other => {
            return Err(XrdsTextureError::UnsupportedFeature(format!(
                "Could not convert {:?} to an OpenGL format",
                other
            ))
            .into())
        }
    };

    Ok(DriverFormat::new(
        format,
        internal,
        external,
        transfer,
        attachments,
    ))
}
