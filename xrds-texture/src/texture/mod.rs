mod format;
mod framebuffer;
mod render_target;
mod renderbuffer;
mod sampler;
mod settings;
mod slices;
mod upload;


pub use format::*;
pub use framebuffer::*;
pub use render_target::*;
pub use renderbuffer::*;
pub use sampler::*;
pub use settings::*;
pub use slices::*;
pub use upload::*;

use std::sync::Arc;

use uuid::Uuid;
use wgpu_types::{Extent3d, FilterMode};

use crate::{
    clear_errors, with_bound_framebuffer, with_bound_texture, with_debug_group, Constant,
    DeviceContext, FramebufferHandle, FramebufferStatus, Rect, RenderbufferHandle, ResourceHooks,
    TextureHandle, Volatile, XrdsTextureError,
};

/// Driver object to render into for a render target texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderTargetHandle {
    Texture(TextureHandle),
    Renderbuffer(RenderbufferHandle),
}

/// A texture and the driver objects backing it.
///
/// Driver objects are created on construction and whenever [`load`] runs
/// after an [`unload`], e.g. after the graphics context was lost. The source
/// slices survive unloading; driver handles do not.
///
/// [`load`]: XrdsTexture::load
/// [`unload`]: XrdsTexture::unload
#[derive(Debug)]
pub struct XrdsTexture {
    id: Uuid,
    settings: TextureSettings,
    mip_count: u32,
    sampler: SamplerState,
    slices: SliceStore,
    hooks: ResourceHooks,

    texture: TextureHandle,
    framebuffer: FramebufferHandle,
    renderbuffer: RenderbufferHandle,
    framebuffer_status: FramebufferStatus,
    actual_samples: u32,
    using_default_texture: bool,
    memory_size: u64,
}

/// Unloads the texture when dropped unless disarmed, so a failed load never
/// leaves partially created driver objects behind.
struct UnloadGuard<'a> {
    texture: &'a mut XrdsTexture,
    ctx: &'a mut dyn DeviceContext,
    armed: bool,
}

impl<'a> UnloadGuard<'a> {
    fn new(texture: &'a mut XrdsTexture, ctx: &'a mut dyn DeviceContext) -> Self {
        Self {
            texture,
            ctx,
            armed: true,
        }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for UnloadGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            self.texture.unload(&mut *self.ctx);
        }
    }
}

impl XrdsTexture {
    pub fn new(
        ctx: &mut dyn DeviceContext,
        settings: TextureSettings,
        slices: Option<SliceStore>,
        hooks: ResourceHooks,
    ) -> anyhow::Result<Self> {
        settings.validate()?;
        let slices = slices.unwrap_or_default();
        if settings.format.is_compressed() && slices.get(0, 0).is_none() {
            return Err(XrdsTextureError::InvalidArgument(
                "Compressed textures must be created with image data".to_owned(),
            )
            .into());
        }

        let mut texture = Self {
            id: Uuid::new_v4(),
            mip_count: settings.mip_count(),
            sampler: settings.sampler,
            settings,
            slices,
            hooks,
            texture: TextureHandle::NONE,
            framebuffer: FramebufferHandle::NONE,
            renderbuffer: RenderbufferHandle::NONE,
            framebuffer_status: FramebufferStatus::COMPLETE,
            actual_samples: 1,
            using_default_texture: false,
            memory_size: 0,
        };
        texture.load(ctx)?;

        Ok(texture)
    }

    /// Creates the driver objects. Does nothing if they already exist.
    ///
    /// On failure every object created so far is released again before the
    /// error is returned.
    pub fn load(&mut self, ctx: &mut dyn DeviceContext) -> anyhow::Result<()> {
        if self.is_loaded() {
            return Ok(());
        }

        let plan = self.settings.plan(ctx.caps());
        if plan.drop_mipmaps {
            if self.mip_count > 1 {
                log::warn!(
                    "{}x{} texture cannot be mipmapped without full NPOT support",
                    self.settings.width,
                    self.settings.height
                );
            }
            self.mip_count = 1;
            self.sampler.mipmap_filter = None;
        }
        self.actual_samples = plan.samples;
        self.using_default_texture = false;

        let group = match &self.settings.label {
            Some(label) => format!("{} ({})", Constant::DEBUG_GROUP_LOAD, label),
            None => Constant::DEBUG_GROUP_LOAD.to_owned(),
        };
        with_debug_group(ctx, &group, |ctx| {
            let mut guard = UnloadGuard::new(self, ctx);
            guard.texture.allocate(&mut *guard.ctx, &plan)?;
            guard.disarm();
            anyhow::Ok(())
        })
        .inspect_err(|err| log::error!("Texture {} failed to load: {}", self.id, err))?;

        self.set_memory_size(self.compute_memory_size());
        log::debug!(
            "Loaded texture {} ({:?} {:?} {}x{}x{}, {} mips, {} samples, {} bytes)",
            self.id,
            self.settings.texture_type,
            self.settings.format.as_wgpu(),
            self.settings.width,
            self.settings.height,
            self.settings.layers,
            self.mip_count,
            self.actual_samples,
            self.memory_size
        );

        Ok(())
    }

    /// Releases the driver objects. Safe to call repeatedly.
    pub fn unload(&mut self, ctx: &mut dyn DeviceContext) {
        let had_handles =
            self.framebuffer.is_valid() || self.renderbuffer.is_valid() || self.texture.is_valid();

        if self.settings.render_target && had_handles {
            if let Some(cache) = &self.hooks.render_targets {
                cache.cleanup_render_texture(self.id);
            }
        }

        if self.framebuffer.is_valid() {
            ctx.delete_framebuffer(self.framebuffer);
        }
        if self.renderbuffer.is_valid() {
            ctx.delete_renderbuffer(self.renderbuffer);
        }
        if self.texture.is_valid() {
            ctx.delete_texture(self.texture);
        }

        self.framebuffer = FramebufferHandle::NONE;
        self.renderbuffer = RenderbufferHandle::NONE;
        self.texture = TextureHandle::NONE;

        if had_handles {
            log::debug!("Unloaded texture {}", self.id);
        }
        self.set_memory_size(0);
    }

    fn allocate(&mut self, ctx: &mut dyn DeviceContext, plan: &LoadPlan) -> anyhow::Result<()> {
        clear_errors(ctx);

        if self.settings.is_readable() {
            self.create_texture(ctx, plan)?;
        }
        if !self.settings.is_readable() || self.actual_samples > 1 {
            self.create_renderbuffer(ctx)?;
        }

        if let Some(err) = ctx.take_error() {
            return Err(XrdsTextureError::resource_creation(format!(
                "Cannot create texture (driver error: {})",
                err
            ))
            .into());
        }

        Ok(())
    }

    fn create_texture(&mut self, ctx: &mut dyn DeviceContext, plan: &LoadPlan) -> anyhow::Result<()> {
        let texture_type = self.settings.texture_type;
        self.texture = ctx.create_texture(texture_type);

        let handle = self.texture;
        with_bound_texture(ctx, texture_type, handle, |ctx| {
            if plan.use_placeholder {
                self.fill_placeholder(ctx)
            } else {
                self.fill_storage(ctx)
            }
        })
    }

    /// Stands in a 2x2 checker for a texture the driver cannot represent.
    fn fill_placeholder(&mut self, ctx: &mut dyn DeviceContext) -> anyhow::Result<()> {
        log::warn!(
            "{}x{}x{} {:?} texture exceeds driver limits, substituting a placeholder",
            self.settings.width,
            self.settings.height,
            self.settings.layers,
            self.settings.texture_type
        );
        self.using_default_texture = true;
        self.set_sampler_state(ctx, self.sampler)?;

        let texture_type = self.settings.texture_type;
        let format: TextureFormat = wgpu_types::TextureFormat::Rgba8Unorm.into();
        let driver_format = ctx.convert_format(format, false, false)?;
        let size = Constant::PLACEHOLDER_SIZE;
        ctx.texture_storage(
            texture_type,
            1,
            &driver_format,
            Extent3d {
                width: size,
                height: size,
                depth_or_array_layers: 1,
            },
        );

        let pixels: &[u8] = bytemuck::cast_slice(Constant::PLACEHOLDER_PIXELS.as_slice());
        let rect = Rect::new(0, 0, size, size);
        for slice in 0..texture_type.face_count() {
            self.upload_bytes(ctx, format, pixels, 0, slice, rect, None)?;
        }

        Ok(())
    }

    fn fill_storage(&mut self, ctx: &mut dyn DeviceContext) -> anyhow::Result<()> {
        self.set_sampler_state(ctx, self.sampler)?;

        let texture_type = self.settings.texture_type;
        let format = self.settings.format;
        let driver_format = ctx.convert_format(format, self.settings.srgb, false)?;
        let size = self.settings.extent();

        // Compressed levels are specified per upload instead.
        if !format.is_compressed() {
            ctx.texture_storage(texture_type, self.mip_count, &driver_format, size);
        }

        for mip in 0..self.mip_count {
            if format.is_compressed() && texture_type.is_layered() {
                let byte_len = self.slices.mip_byte_size(mip);
                if byte_len > 0 {
                    let mip_size = size.mip_level_size(mip, texture_type.dimension());
                    ctx.compressed_image_3d(
                        texture_type,
                        mip,
                        &driver_format,
                        mip_size,
                        None,
                        byte_len,
                    );
                }
            }

            for slice in 0..self.slice_count(mip) {
                if let Some(image) = self.slices.get(slice, mip).cloned() {
                    self.upload_image_data(ctx, &image, mip, slice, 0, 0)?;
                }
            }
        }

        let has_data = self.slices.get(0, 0).is_some();
        if self.settings.render_target {
            let build = new_framebuffer(
                ctx,
                texture_type,
                &driver_format,
                self.texture,
                size,
                self.mip_count,
                !has_data,
            );
            self.framebuffer = build.framebuffer;
            self.framebuffer_status = build.status;
            if !build.status.is_complete() {
                return Err(XrdsTextureError::resource_creation(format!(
                    "Cannot create render target framebuffer ({})",
                    build.status
                ))
                .into());
            }
        } else if !has_data {
            let blank = vec![0u8; format.slice_size(size.width, size.height)];
            let rect = Rect::new(0, 0, size.width, size.height);
            for slice in 0..self.slice_count(0) {
                self.upload_bytes(ctx, format, &blank, 0, slice, rect, None)?;
            }
        }

        if self.mip_count > 1 && self.slices.mipmap_count() <= 1 && !format.is_compressed() {
            self.generate_mipmaps(ctx)?;
        }

        Ok(())
    }

    fn create_renderbuffer(&mut self, ctx: &mut dyn DeviceContext) -> anyhow::Result<()> {
        let readable = self.settings.is_readable();
        if readable && self.actual_samples <= 1 {
            return Ok(());
        }

        let requested = self.actual_samples;
        let format = self.settings.format.with_srgb(self.settings.srgb);
        let (width, height) = (self.settings.width, self.settings.height);
        let mut build = new_renderbuffer(ctx, width, height, requested, format)?;

        // Non-readable targets have nothing else to render into.
        if !build.is_complete() && !readable && requested > 1 {
            log::warn!(
                "{} samples rejected for non-readable render target {}, retrying with 1",
                requested,
                self.id
            );
            build = new_renderbuffer(ctx, width, height, 1, format)?;
        }
        self.renderbuffer = build.renderbuffer;
        self.actual_samples = build.samples;

        // Readable textures still have their texture to fall back to.
        if !build.is_complete() && !readable {
            return Err(XrdsTextureError::resource_creation(format!(
                "Cannot create renderbuffer (status: {}, {} samples requested)",
                build.status, requested
            ))
            .into());
        }

        Ok(())
    }

    /// Uploads raw bytes into one slice of one mip level.
    ///
    /// If `image` is given and the store already holds an image of the same
    /// size for that slice, the stored image is replaced by it.
    #[allow(clippy::too_many_arguments)]
    pub fn upload_bytes(
        &mut self,
        ctx: &mut dyn DeviceContext,
        format: TextureFormat,
        data: &[u8],
        level: u32,
        slice: u32,
        rect: Rect,
        image: Option<&Arc<SliceImage>>,
    ) -> anyhow::Result<()> {
        let texture_type = self.settings.texture_type;
        let path = UploadPath::resolve(texture_type, format.is_compressed());
        if path.is_compressed() && (rect.x != 0 || rect.y != 0) {
            return Err(XrdsTextureError::InvalidArgument(
                "x and y must be 0 for compressed textures".to_owned(),
            )
            .into());
        }
        if self.using_default_texture {
            let size = Constant::PLACEHOLDER_SIZE;
            if level > 0 || !rect.fits_within(size, size) {
                return Err(XrdsTextureError::InvalidOperation(format!(
                    "Texture {} is a placeholder and only has a {}x{} base level",
                    self.id, size, size
                ))
                .into());
            }
        }
        let expected = format.slice_size(rect.width, rect.height);
        if data.len() < expected || (path.is_compressed() && data.is_empty()) {
            return Err(XrdsTextureError::InvalidArgument(format!(
                "{}x{} {:?} upload needs {} bytes, got {}",
                rect.width,
                rect.height,
                format.as_wgpu(),
                expected,
                data.len()
            ))
            .into());
        }

        if let Some(image) = image {
            let same_size = self.slices.get(slice, level).is_some_and(|old| {
                old.width() == image.width() && old.height() == image.height()
            });
            if same_size {
                self.slices.set(slice, level, image.clone());
            }
        }

        let driver_format = ctx.convert_format(format, self.settings.srgb, false)?;
        let texture = self.texture;
        with_debug_group(ctx, Constant::DEBUG_GROUP_UPLOAD, |ctx| {
            with_bound_texture(ctx, texture_type, texture, |ctx| {
                path.upload(ctx, texture_type, level, slice, rect, &driver_format, data)
            })
        });

        Ok(())
    }

    pub fn upload_image_data(
        &mut self,
        ctx: &mut dyn DeviceContext,
        image: &Arc<SliceImage>,
        mip: u32,
        slice: u32,
        x: u32,
        y: u32,
    ) -> anyhow::Result<()> {
        let rect = Rect::new(x, y, image.width(), image.height());
        self.upload_bytes(
            ctx,
            image.format(),
            image.data(),
            mip,
            slice,
            rect,
            Some(image),
        )
    }

    /// Replaces a region of one slice with `image` after validating it.
    #[allow(clippy::too_many_arguments)]
    pub fn replace_pixels(
        &mut self,
        ctx: &mut dyn DeviceContext,
        image: Arc<SliceImage>,
        slice: u32,
        mip: u32,
        x: u32,
        y: u32,
        reload_mipmaps: bool,
    ) -> anyhow::Result<()> {
        if !self.settings.is_readable() {
            return Err(XrdsTextureError::InvalidOperation(
                "replace_pixels can only be called on readable textures".to_owned(),
            )
            .into());
        }
        if self.settings.msaa > 1 {
            return Err(XrdsTextureError::InvalidOperation(
                "replace_pixels cannot be called on a multisampled texture".to_owned(),
            )
            .into());
        }
        if self.using_default_texture {
            return Err(XrdsTextureError::InvalidOperation(
                "replace_pixels cannot be called on a placeholder texture".to_owned(),
            )
            .into());
        }
        if image.format() != self.settings.format {
            return Err(XrdsTextureError::InvalidArgument(format!(
                "Pixel format {:?} does not match texture format {:?}",
                image.format().as_wgpu(),
                self.settings.format.as_wgpu()
            ))
            .into());
        }
        self.check_subresource(slice, mip)?;
        let rect = Rect::new(x, y, image.width(), image.height());
        if !rect.fits_within(self.pixel_width(mip), self.pixel_height(mip)) {
            return Err(XrdsTextureError::InvalidArgument(format!(
                "Region {:?} does not fit within mip level {}",
                rect, mip
            ))
            .into());
        }

        self.upload_image_data(ctx, &image, mip, slice, x, y)?;

        if reload_mipmaps
            && self.mip_count > 1
            && self.settings.mipmaps != MipmapsMode::None
            && !self.settings.format.is_compressed()
        {
            self.generate_mipmaps(ctx)?;
        }

        Ok(())
    }

    pub fn generate_mipmaps(&mut self, ctx: &mut dyn DeviceContext) -> anyhow::Result<()> {
        if self.mip_count == 1 || self.settings.mipmaps == MipmapsMode::None {
            return Err(XrdsTextureError::InvalidOperation(
                "generate_mipmaps can only be called on a texture created with mipmaps enabled"
                    .to_owned(),
            )
            .into());
        }
        if self.settings.format.is_compressed() {
            return Err(XrdsTextureError::InvalidOperation(
                "generate_mipmaps cannot be called on a compressed texture".to_owned(),
            )
            .into());
        }

        let texture_type = self.settings.texture_type;
        with_bound_texture(ctx, texture_type, self.texture, |ctx| {
            ctx.generate_mipmap(texture_type)
        });

        Ok(())
    }

    /// Reads a region of a render target back into a new image.
    pub fn new_image_data(
        &self,
        ctx: &mut dyn DeviceContext,
        slice: u32,
        mip: u32,
        rect: Rect,
    ) -> anyhow::Result<SliceImage> {
        self.check_readback(slice, mip, rect)?;

        let format = self.settings.format.linear();
        let mut image = SliceImage::new(format, rect.width, rect.height);
        if !self.framebuffer.is_valid() {
            return Ok(image);
        }

        let driver_format = ctx.convert_format(format, false, false)?;
        let texture_type = self.settings.texture_type;
        let texture = self.texture;
        with_bound_framebuffer(ctx, self.framebuffer, |ctx| {
            let reattach = slice > 0 || mip > 0;
            if reattach {
                let (layer, face) = match texture_type {
                    TextureType::Cube => (0, slice),
                    _ => (slice, 0),
                };
                ctx.framebuffer_texture(
                    AttachmentRole::Color,
                    texture_type,
                    texture,
                    mip,
                    layer,
                    face,
                );
            }

            ctx.read_pixels(rect, &driver_format, image.data_mut());

            if reattach {
                ctx.framebuffer_texture(AttachmentRole::Color, texture_type, texture, 0, 0, 0);
            }
        });

        Ok(image)
    }

    /// Validates `state`, applies the driver-specific downgrades and pushes
    /// the result to the driver.
    pub fn set_sampler_state(
        &mut self,
        ctx: &mut dyn DeviceContext,
        state: SamplerState,
    ) -> anyhow::Result<()> {
        if state.compare.is_some() && !ctx.caps().depth_compare_sample {
            return Err(XrdsTextureError::UnsupportedFeature(
                "Depth comparison sampling in shaders is not supported on this system".to_owned(),
            )
            .into());
        }
        if state.compare.is_some() && !self.settings.format.has_depth() {
            return Err(XrdsTextureError::InvalidArgument(
                "Only depth textures can have a depth sample compare mode".to_owned(),
            )
            .into());
        }

        let mut sampler = state;
        if self.mip_count == 1 {
            sampler.mipmap_filter = None;
        }
        if self.settings.texture_type == TextureType::Cube {
            sampler.clamp_all();
        }

        if !ctx.supports_filtering(self.settings.format) {
            sampler.force_nearest();
            if sampler.mipmap_filter == Some(FilterMode::Linear) {
                sampler.mipmap_filter = Some(FilterMode::Nearest);
            }
        }
        if self.using_default_texture {
            sampler.force_nearest();
            sampler.mipmap_filter = None;
        }
        if !ctx.caps().full_npot && !self.settings.is_power_of_two() {
            sampler.clamp_all();
        }

        self.sampler = sampler;
        let texture_type = self.settings.texture_type;
        with_bound_texture(ctx, texture_type, self.texture, |ctx| {
            ctx.apply_sampler(texture_type, &sampler)
        });

        Ok(())
    }

    fn check_subresource(&self, slice: u32, mip: u32) -> anyhow::Result<()> {
        if mip >= self.mip_count {
            return Err(XrdsTextureError::InvalidArgument(format!(
                "Invalid mipmap index {} (texture has {})",
                mip, self.mip_count
            ))
            .into());
        }
        if slice >= self.slice_count(mip) {
            return Err(XrdsTextureError::InvalidArgument(format!(
                "Invalid slice index {} (mip level {} has {})",
                slice,
                mip,
                self.slice_count(mip)
            ))
            .into());
        }
        Ok(())
    }

    fn check_readback(&self, slice: u32, mip: u32, rect: Rect) -> anyhow::Result<()> {
        if !self.settings.render_target {
            return Err(XrdsTextureError::InvalidOperation(
                "new_image_data can only be called on render target textures".to_owned(),
            )
            .into());
        }
        if self.settings.format.is_depth_stencil() {
            return Err(XrdsTextureError::InvalidOperation(
                "new_image_data cannot be called on depth/stencil textures".to_owned(),
            )
            .into());
        }
        if !self.settings.is_readable() {
            return Err(XrdsTextureError::InvalidOperation(
                "new_image_data cannot be called on non-readable textures".to_owned(),
            )
            .into());
        }
        self.check_subresource(slice, mip)?;
        if rect.width == 0
            || rect.height == 0
            || !rect.fits_within(self.pixel_width(mip), self.pixel_height(mip))
        {
            return Err(XrdsTextureError::InvalidArgument(format!(
                "Invalid rectangle {:?} for mip level {}",
                rect, mip
            ))
            .into());
        }
        Ok(())
    }

    fn compute_memory_size(&self) -> u64 {
        let texture_type = self.settings.texture_type;
        if self.using_default_texture {
            let size = Constant::PLACEHOLDER_SIZE;
            let format: TextureFormat = wgpu_types::TextureFormat::Rgba8Unorm.into();
            return format.slice_size(size, size) as u64 * texture_type.face_count() as u64;
        }

        let format = self.settings.format;
        let size = self.settings.extent();
        let mut bytes: u64 = (0..self.mip_count)
            .map(|mip| {
                let mip_size = size.mip_level_size(mip, texture_type.dimension());
                format.slice_size(mip_size.width, mip_size.height) as u64
                    * self.slice_count(mip) as u64
            })
            .sum();

        let samples = self.actual_samples as u64;
        if samples > 1 && self.settings.is_readable() {
            bytes += format.slice_size(size.width, size.height) as u64
                * self.slice_count(0) as u64
                * samples;
        } else if samples > 1 {
            bytes *= samples;
        }

        bytes
    }

    fn set_memory_size(&mut self, bytes: u64) {
        self.memory_size = bytes;
        if let Some(memory) = &self.hooks.memory {
            memory.set_graphics_memory_size(self.id, bytes);
        }
    }
}

impl XrdsTexture {
    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn settings(&self) -> &TextureSettings {
        &self.settings
    }

    pub fn texture_type(&self) -> TextureType {
        self.settings.texture_type
    }

    pub fn format(&self) -> TextureFormat {
        self.settings.format
    }

    pub fn is_srgb(&self) -> bool {
        self.settings.srgb
    }

    pub fn is_render_target(&self) -> bool {
        self.settings.render_target
    }

    pub fn is_readable(&self) -> bool {
        self.settings.is_readable()
    }

    pub fn pixel_width(&self, mip: u32) -> u32 {
        (self.settings.width >> mip).max(1)
    }

    pub fn pixel_height(&self, mip: u32) -> u32 {
        (self.settings.height >> mip).max(1)
    }

    pub fn depth(&self, mip: u32) -> u32 {
        (self.settings.depth() >> mip).max(1)
    }

    pub fn layer_count(&self) -> u32 {
        self.settings.layer_count()
    }

    /// Addressable slices at `mip`: cube faces, array layers or volume depth.
    pub fn slice_count(&self, mip: u32) -> u32 {
        match self.settings.texture_type {
            TextureType::D2 => 1,
            TextureType::Cube => Constant::CUBE_FACE_COUNT,
            TextureType::D2Array => self.settings.layer_count(),
            TextureType::Volume => self.depth(mip),
        }
    }

    pub fn mipmap_count(&self) -> u32 {
        self.mip_count
    }

    pub fn mipmaps_mode(&self) -> MipmapsMode {
        self.settings.mipmaps
    }

    pub fn requested_msaa(&self) -> u32 {
        self.settings.msaa
    }

    pub fn actual_samples(&self) -> u32 {
        self.actual_samples
    }

    pub fn sampler_state(&self) -> &SamplerState {
        &self.sampler
    }

    pub fn slices(&self) -> &SliceStore {
        &self.slices
    }

    pub fn framebuffer_status(&self) -> FramebufferStatus {
        self.framebuffer_status
    }

    pub fn is_using_default_texture(&self) -> bool {
        self.using_default_texture
    }

    pub fn memory_size(&self) -> u64 {
        self.memory_size
    }

    pub fn is_loaded(&self) -> bool {
        self.texture.is_valid() || self.renderbuffer.is_valid()
    }

    pub fn handle(&self) -> TextureHandle {
        self.texture
    }

    pub fn framebuffer(&self) -> FramebufferHandle {
        self.framebuffer
    }

    pub fn renderbuffer(&self) -> RenderbufferHandle {
        self.renderbuffer
    }

    pub fn render_target_handle(&self) -> Option<RenderTargetHandle> {
        if !self.settings.render_target {
            None
        } else if self.renderbuffer.is_valid() {
            Some(RenderTargetHandle::Renderbuffer(self.renderbuffer))
        } else if self.texture.is_valid() {
            Some(RenderTargetHandle::Texture(self.texture))
        } else {
            None
        }
    }
}

impl Volatile for XrdsTexture {
    fn load_volatile(&mut self, ctx: &mut dyn DeviceContext) -> anyhow::Result<()> {
        self.load(ctx)
    }

    fn unload_volatile(&mut self, ctx: &mut dyn DeviceContext) {
        self.unload(ctx)
    }
}

impl Drop for XrdsTexture {
    fn drop(&mut self) {
        if self.is_loaded() {
            log::warn!(
                "Texture {} dropped while loaded; its driver objects live until the context is destroyed",
                self.id
            );
        }
    }
}
