use wgpu_types::Color;

use crate::{Constant, DeviceContext, TextureFormat};

/// Clear applied to a freshly attached render target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderTargetOps {
    ColorAttachment(Color),
    DepthStencilAttachment {
        depth: Option<f32>,
        stencil: Option<u32>,
    },
}

impl RenderTargetOps {
    /// Deterministic initial contents for `format`: transparent black for
    /// color, far depth and zero stencil otherwise.
    pub fn initial(format: TextureFormat) -> Self {
        if format.is_depth_stencil() {
            RenderTargetOps::DepthStencilAttachment {
                depth: format.has_depth().then_some(Constant::CLEAR_DEPTH),
                stencil: format.has_stencil().then_some(Constant::CLEAR_STENCIL),
            }
        } else {
            RenderTargetOps::ColorAttachment(Constant::CLEAR_COLOR)
        }
    }

    pub fn is_color_target(&self) -> bool {
        matches!(self, RenderTargetOps::ColorAttachment(_))
    }

    pub fn is_depth_stencil_target(&self) -> bool {
        matches!(self, RenderTargetOps::DepthStencilAttachment { .. })
    }

    pub fn as_color(&self) -> Option<Color> {
        match self {
            RenderTargetOps::ColorAttachment(color) => Some(*color),
            _ => None,
        }
    }

    pub fn as_depth(&self) -> Option<f32> {
        match self {
            RenderTargetOps::DepthStencilAttachment { depth, .. } => *depth,
            _ => None,
        }
    }

    pub fn as_stencil(&self) -> Option<u32> {
        match self {
            RenderTargetOps::DepthStencilAttachment { stencil, .. } => *stencil,
            _ => None,
        }
    }
}

/// Clears whatever is attached to the bound framebuffer to the initial
/// contents of `format`.
///
/// Depth writes gate depth clears, so they are enabled for the clear and
/// restored afterwards.
pub(crate) fn clear_attachments(ctx: &mut dyn DeviceContext, format: TextureFormat) {
    let ops = RenderTargetOps::initial(format);
    if ops.is_depth_stencil_target() {
        let had_depth_writes = ctx.depth_writes();
        if !had_depth_writes {
            ctx.set_depth_writes(true);
        }
        ctx.clear(&ops);
        if !had_depth_writes {
            ctx.set_depth_writes(false);
        }
    } else {
        ctx.clear(&ops);
    }
}
