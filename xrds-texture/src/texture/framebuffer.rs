use wgpu_types::Extent3d;

use super::render_target::clear_attachments;
use crate::{
    with_bound_framebuffer, DeviceContext, DriverFormat, FramebufferHandle, FramebufferStatus,
    TextureHandle, TextureType,
};

/// Result of building the framebuffer that owns a render target's attachments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FramebufferBuild {
    pub framebuffer: FramebufferHandle,
    pub status: FramebufferStatus,
}

/// Creates a framebuffer for `texture` and attaches every mip level, layer and
/// cube face in turn, optionally clearing each one.
///
/// Attachment runs from the last mip/layer/face down to the first, so the
/// framebuffer is left with mip 0, layer 0, face 0 attached. The caller's
/// framebuffer binding is restored before returning.
pub fn new_framebuffer(
    ctx: &mut dyn DeviceContext,
    texture_type: TextureType,
    format: &DriverFormat,
    texture: TextureHandle,
    size: Extent3d,
    mip_count: u32,
    clear: bool,
) -> FramebufferBuild {
    let framebuffer = ctx.create_framebuffer();
    let status = with_bound_framebuffer(ctx, framebuffer, |ctx| {
        if !texture.is_valid() {
            return ctx.framebuffer_status();
        }

        let pixel_format = format.format();
        if pixel_format.is_depth_stencil() && ctx.caps().explicit_draw_buffers {
            ctx.disable_color_buffers();
        }

        let faces = texture_type.face_count();
        for mip in (0..mip_count).rev() {
            let mip_size = size.mip_level_size(mip, texture_type.dimension());
            let layers = match texture_type {
                TextureType::Volume => mip_size.depth_or_array_layers,
                TextureType::D2Array => size.depth_or_array_layers,
                _ => 1,
            };

            for layer in (0..layers).rev() {
                for face in (0..faces).rev() {
                    for role in format.attachments() {
                        ctx.framebuffer_texture(role, texture_type, texture, mip, layer, face);
                    }
                    if clear {
                        clear_attachments(ctx, pixel_format);
                    }
                }
            }
        }

        ctx.framebuffer_status()
    });

    if !status.is_complete() {
        log::warn!(
            "Framebuffer for texture {:?} is not complete: {}",
            texture,
            status
        );
    }

    FramebufferBuild {
        framebuffer,
        status,
    }
}
