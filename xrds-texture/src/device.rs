use std::fmt::Display;

use wgpu_types::Extent3d;

use crate::{
    gl_format, AttachmentRole, DriverFormat, RenderTargetOps, SamplerState, TextureFormat,
    TextureType,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TextureHandle(u32);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct FramebufferHandle(u32);

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RenderbufferHandle(u32);

impl TextureHandle {
    pub const NONE: Self = Self(0);

    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }

    pub fn is_valid(&self) -> bool {
        self.0 != 0
    }
}

impl FramebufferHandle {
    /// Also the window-system framebuffer
    pub const NONE: Self = Self(0);

    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }

    pub fn is_valid(&self) -> bool {
        self.0 != 0
    }
}

impl RenderbufferHandle {
    pub const NONE: Self = Self(0);

    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u32 {
        self.0
    }

    pub fn is_valid(&self) -> bool {
        self.0 != 0
    }
}

/// Error code polled from the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverError(pub u32);

impl Display for DriverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            glow::INVALID_ENUM => write!(f, "GL_INVALID_ENUM"),
            glow::INVALID_VALUE => write!(f, "GL_INVALID_VALUE"),
            glow::INVALID_OPERATION => write!(f, "GL_INVALID_OPERATION"),
            glow::INVALID_FRAMEBUFFER_OPERATION => write!(f, "GL_INVALID_FRAMEBUFFER_OPERATION"),
            glow::OUT_OF_MEMORY => write!(f, "GL_OUT_OF_MEMORY"),
            glow::STACK_OVERFLOW => write!(f, "GL_STACK_OVERFLOW"),
            glow::STACK_UNDERFLOW => write!(f, "GL_STACK_UNDERFLOW"),
            other => write!(f, "0x{:X}", other),
        }
    }
}

/// Framebuffer completeness as reported by the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramebufferStatus(pub u32);

impl FramebufferStatus {
    pub const COMPLETE: Self = Self(glow::FRAMEBUFFER_COMPLETE);
    pub const INCOMPLETE_ATTACHMENT: Self = Self(glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT);
    pub const INCOMPLETE_MISSING_ATTACHMENT: Self =
        Self(glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT);
    pub const UNSUPPORTED: Self = Self(glow::FRAMEBUFFER_UNSUPPORTED);

    pub fn is_complete(&self) -> bool {
        *self == Self::COMPLETE
    }
}

impl Default for FramebufferStatus {
    fn default() -> Self {
        Self::COMPLETE
    }
}

impl Display for FramebufferStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            glow::FRAMEBUFFER_COMPLETE => write!(f, "complete"),
            glow::FRAMEBUFFER_UNDEFINED => write!(f, "undefined"),
            glow::FRAMEBUFFER_INCOMPLETE_ATTACHMENT => write!(f, "incomplete attachment"),
            glow::FRAMEBUFFER_INCOMPLETE_MISSING_ATTACHMENT => write!(f, "missing attachment"),
            glow::FRAMEBUFFER_INCOMPLETE_DRAW_BUFFER => write!(f, "incomplete draw buffer"),
            glow::FRAMEBUFFER_INCOMPLETE_READ_BUFFER => write!(f, "incomplete read buffer"),
            glow::FRAMEBUFFER_UNSUPPORTED => write!(f, "unsupported format combination"),
            glow::FRAMEBUFFER_INCOMPLETE_MULTISAMPLE => write!(f, "inconsistent sample counts"),
            glow::FRAMEBUFFER_INCOMPLETE_LAYER_TARGETS => write!(f, "incomplete layer targets"),
            other => write!(f, "unknown status 0x{:X}", other),
        }
    }
}

/// Driver limits and capability flags.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceCaps {
    pub max_texture_size: u32,
    pub max_cube_texture_size: u32,
    pub max_texture_layers: u32,
    pub max_3d_texture_size: u32,
    pub max_samples: u32,
    /// Mipmapping and repeat wrapping work on non-power-of-two textures
    pub full_npot: bool,
    pub depth_compare_sample: bool,
    /// Depth-only framebuffers need draw/read buffers set to none
    pub explicit_draw_buffers: bool,
}

impl Default for DeviceCaps {
    fn default() -> Self {
        Self {
            max_texture_size: 16384,
            max_cube_texture_size: 16384,
            max_texture_layers: 2048,
            max_3d_texture_size: 2048,
            max_samples: 8,
            full_npot: true,
            depth_compare_sample: true,
            explicit_draw_buffers: true,
        }
    }
}

/// Pixel rectangle within a mip level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn fits_within(&self, width: u32, height: u32) -> bool {
        self.x.checked_add(self.width).is_some_and(|right| right <= width)
            && self.y.checked_add(self.height).is_some_and(|bottom| bottom <= height)
    }
}

/// Upload destination: a whole texture, or one face of a cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureTarget {
    Texture(TextureType),
    CubeFace(u32),
}

impl TextureTarget {
    pub fn for_slice(texture_type: TextureType, slice: u32) -> Self {
        match texture_type {
            TextureType::Cube => TextureTarget::CubeFace(slice),
            other => TextureTarget::Texture(other),
        }
    }

    pub fn texture_type(&self) -> TextureType {
        match self {
            TextureTarget::Texture(ty) => *ty,
            TextureTarget::CubeFace(_) => TextureType::Cube,
        }
    }
}

/// The graphics context a texture talks to.
///
/// Binding state (bound texture, bound framebuffer, error flag) is global to
/// the context; use [`with_bound_texture`] and [`with_bound_framebuffer`] to
/// change it so the previous binding comes back on every path.
pub trait DeviceContext {
    fn caps(&self) -> &DeviceCaps;

    /// Pops one pending driver error.
    fn take_error(&mut self) -> Option<DriverError>;

    fn push_debug_group(&mut self, _label: &str) {}

    fn pop_debug_group(&mut self) {}

    fn create_texture(&mut self, texture_type: TextureType) -> TextureHandle;
    fn delete_texture(&mut self, texture: TextureHandle);
    fn bound_texture(&self, texture_type: TextureType) -> TextureHandle;
    fn bind_texture(&mut self, texture_type: TextureType, texture: TextureHandle);

    /// Immutable storage for `levels` mip levels of the bound texture.
    fn texture_storage(
        &mut self,
        texture_type: TextureType,
        levels: u32,
        format: &DriverFormat,
        size: Extent3d,
    );
    /// (Re)specifies one compressed level of a layered texture.
    fn compressed_image_3d(
        &mut self,
        texture_type: TextureType,
        level: u32,
        format: &DriverFormat,
        size: Extent3d,
        data: Option<&[u8]>,
        byte_len: usize,
    );
    fn compressed_image_2d(
        &mut self,
        target: TextureTarget,
        level: u32,
        format: &DriverFormat,
        width: u32,
        height: u32,
        data: &[u8],
    );
    fn compressed_sub_image_3d(
        &mut self,
        texture_type: TextureType,
        level: u32,
        rect: Rect,
        slice: u32,
        format: &DriverFormat,
        data: &[u8],
    );
    fn sub_image_2d(
        &mut self,
        target: TextureTarget,
        level: u32,
        rect: Rect,
        format: &DriverFormat,
        data: &[u8],
    );
    fn sub_image_3d(
        &mut self,
        texture_type: TextureType,
        level: u32,
        rect: Rect,
        slice: u32,
        format: &DriverFormat,
        data: &[u8],
    );
    fn generate_mipmap(&mut self, texture_type: TextureType);
    fn apply_sampler(&mut self, texture_type: TextureType, sampler: &SamplerState);

    fn create_framebuffer(&mut self) -> FramebufferHandle;
    fn delete_framebuffer(&mut self, framebuffer: FramebufferHandle);
    fn bound_framebuffer(&self) -> FramebufferHandle;
    fn bind_framebuffer(&mut self, framebuffer: FramebufferHandle);
    fn framebuffer_texture(
        &mut self,
        role: AttachmentRole,
        texture_type: TextureType,
        texture: TextureHandle,
        level: u32,
        layer: u32,
        face: u32,
    );
    fn framebuffer_renderbuffer(
        &mut self,
        role: AttachmentRole,
        renderbuffer: RenderbufferHandle,
    );
    /// Sets draw and read buffers of the bound framebuffer to none.
    fn disable_color_buffers(&mut self);
    fn framebuffer_status(&mut self) -> FramebufferStatus;

    fn create_renderbuffer(&mut self) -> RenderbufferHandle;
    fn delete_renderbuffer(&mut self, renderbuffer: RenderbufferHandle);
    /// Allocates renderbuffer storage and returns the sample count the
    /// driver actually granted.
    fn renderbuffer_storage(
        &mut self,
        renderbuffer: RenderbufferHandle,
        format: &DriverFormat,
        samples: u32,
        width: u32,
        height: u32,
    ) -> u32;

    fn depth_writes(&self) -> bool;
    fn set_depth_writes(&mut self, enabled: bool);
    /// Clears every attachment of the bound framebuffer.
    fn clear(&mut self, ops: &RenderTargetOps);
    fn read_pixels(&mut self, rect: Rect, format: &DriverFormat, out: &mut [u8]);

    /// Format/capability adapter.
    fn convert_format(
        &self,
        format: TextureFormat,
        srgb: bool,
        renderbuffer: bool,
    ) -> anyhow::Result<DriverFormat> {
        gl_format(format, srgb, renderbuffer)
    }

    fn supports_filtering(&self, format: TextureFormat) -> bool {
        format.is_filterable()
    }
}

/// Drains the driver error queue so later checks only see new errors.
pub fn clear_errors(ctx: &mut dyn DeviceContext) {
    while let Some(err) = ctx.take_error() {
        log::trace!("Discarding stale driver error {}", err);
    }
}

pub fn with_bound_framebuffer<R>(
    ctx: &mut dyn DeviceContext,
    framebuffer: FramebufferHandle,
    f: impl FnOnce(&mut dyn DeviceContext) -> R,
) -> R {
    let previous = ctx.bound_framebuffer();
    ctx.bind_framebuffer(framebuffer);
    let result = f(&mut *ctx);
    ctx.bind_framebuffer(previous);
    result
}

pub fn with_bound_texture<R>(
    ctx: &mut dyn DeviceContext,
    texture_type: TextureType,
    texture: TextureHandle,
    f: impl FnOnce(&mut dyn DeviceContext) -> R,
) -> R {
    let previous = ctx.bound_texture(texture_type);
    ctx.bind_texture(texture_type, texture);
    let result = f(&mut *ctx);
    ctx.bind_texture(texture_type, previous);
    result
}

pub fn with_debug_group<R>(
    ctx: &mut dyn DeviceContext,
    label: &str,
    f: impl FnOnce(&mut dyn DeviceContext) -> R,
) -> R {
    ctx.push_debug_group(label);
    let result = f(&mut *ctx);
    ctx.pop_debug_group();
    result
}
