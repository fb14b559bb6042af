use super::render_target::clear_attachments;
use crate::{
    with_bound_framebuffer, DeviceContext, FramebufferStatus, RenderbufferHandle, TextureFormat,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderbufferBuild {
    /// `NONE` when the renderbuffer was rejected
    pub renderbuffer: RenderbufferHandle,
    /// Granted sample count, 1 after a rejection
    pub samples: u32,
    pub status: FramebufferStatus,
}

impl RenderbufferBuild {
    pub fn is_complete(&self) -> bool {
        self.status.is_complete() && self.renderbuffer.is_valid()
    }
}

/// Creates a (possibly multisampled) renderbuffer and clears it through a
/// scratch framebuffer.
///
/// The renderbuffer is kept only if the scratch framebuffer is complete and a
/// multisample request was actually honoured. Otherwise it is deleted and the
/// sample count falls back to 1; multisampling is best-effort.
pub fn new_renderbuffer(
    ctx: &mut dyn DeviceContext,
    width: u32,
    height: u32,
    requested_samples: u32,
    format: TextureFormat,
) -> anyhow::Result<RenderbufferBuild> {
    let driver_format = ctx.convert_format(format, false, true)?;

    let scratch = ctx.create_framebuffer();
    let build = with_bound_framebuffer(ctx, scratch, |ctx| {
        if format.is_depth_stencil() && ctx.caps().explicit_draw_buffers {
            ctx.disable_color_buffers();
        }

        let mut renderbuffer = ctx.create_renderbuffer();
        let mut samples =
            ctx.renderbuffer_storage(renderbuffer, &driver_format, requested_samples, width, height);

        for role in driver_format.attachments() {
            ctx.framebuffer_renderbuffer(role, renderbuffer);
        }

        let status = ctx.framebuffer_status();
        if status.is_complete() && (requested_samples <= 1 || samples > 1) {
            clear_attachments(ctx, format);
        } else {
            log::warn!(
                "Renderbuffer rejected (status: {}, samples {} of {} requested)",
                status,
                samples,
                requested_samples
            );
            ctx.delete_renderbuffer(renderbuffer);
            renderbuffer = RenderbufferHandle::NONE;
            samples = 1;
        }

        RenderbufferBuild {
            renderbuffer,
            samples,
            status,
        }
    });
    ctx.delete_framebuffer(scratch);

    Ok(build)
}
