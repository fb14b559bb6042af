//! In-memory device the texture tests run against.
//!
//! Texel storage is tracked per mip level and slice so uploads, clears,
//! mipmap generation and readback can be observed. Every driver call that
//! creates, deletes, writes or attaches something is appended to `calls`.

use std::collections::VecDeque;

use rustc_hash::FxHashMap;
use wgpu_types::Extent3d;

use crate::{
    AttachmentRole, Constant, DeviceCaps, DeviceContext, DriverError, DriverFormat,
    FramebufferHandle, FramebufferStatus, Rect, RenderTargetOps, RenderbufferHandle, SamplerState,
    TextureFormat, TextureHandle, TextureTarget, TextureType,
};

/// Storage of a fresh allocation before anything is written to it.
pub const GARBAGE: u8 = 0xCD;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    PushDebugGroup(String),
    PopDebugGroup,
    CreateTexture(TextureHandle),
    DeleteTexture(TextureHandle),
    TextureStorage {
        levels: u32,
        size: Extent3d,
    },
    CompressedImage3d {
        level: u32,
        byte_len: usize,
    },
    CompressedImage2d {
        target: TextureTarget,
        level: u32,
    },
    CompressedSubImage3d {
        level: u32,
        slice: u32,
        rect: Rect,
    },
    SubImage2d {
        target: TextureTarget,
        level: u32,
        rect: Rect,
    },
    SubImage3d {
        level: u32,
        slice: u32,
        rect: Rect,
    },
    GenerateMipmap,
    CreateFramebuffer(FramebufferHandle),
    DeleteFramebuffer(FramebufferHandle),
    AttachTexture {
        role: AttachmentRole,
        level: u32,
        layer: u32,
        face: u32,
    },
    AttachRenderbuffer(AttachmentRole, RenderbufferHandle),
    CreateRenderbuffer(RenderbufferHandle),
    DeleteRenderbuffer(RenderbufferHandle),
    Clear {
        ops: RenderTargetOps,
        depth_writes: bool,
    },
    ReadPixels(Rect),
}

#[derive(Debug, Clone)]
pub struct Level {
    pub width: u32,
    pub height: u32,
    pub slices: Vec<Vec<u8>>,
}

impl Level {
    fn empty() -> Self {
        Self {
            width: 0,
            height: 0,
            slices: Vec::new(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct TextureObject {
    pub texture_type: TextureType,
    pub format: Option<DriverFormat>,
    pub levels: Vec<Level>,
    pub sampler: Option<SamplerState>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attachment {
    Texture {
        texture: TextureHandle,
        level: u32,
        slice: u32,
    },
    Renderbuffer(RenderbufferHandle),
}

#[derive(Debug, Clone, Default)]
pub struct FramebufferObject {
    pub attachments: FxHashMap<AttachmentRole, Attachment>,
    pub color_buffers_disabled: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct RenderbufferObject {
    pub samples: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug)]
pub struct HeadlessDevice {
    caps: DeviceCaps,
    next_name: u32,
    errors: VecDeque<DriverError>,
    bound_textures: FxHashMap<TextureType, TextureHandle>,
    bound_framebuffer: FramebufferHandle,
    depth_writes: bool,
    debug_depth: i32,

    pub textures: FxHashMap<TextureHandle, TextureObject>,
    pub framebuffers: FxHashMap<FramebufferHandle, FramebufferObject>,
    pub renderbuffers: FxHashMap<RenderbufferHandle, RenderbufferObject>,
    pub calls: Vec<Call>,

    /// Highest sample count `renderbuffer_storage` grants
    pub granted_samples: u32,
    /// Every framebuffer reports `INCOMPLETE_ATTACHMENT`
    pub incomplete_framebuffers: bool,
    /// Raised on every `texture_storage` call
    pub storage_error: Option<DriverError>,
    /// Answer of `supports_filtering`; `None` defers to the format table
    pub filtering: Option<bool>,
}

impl Default for HeadlessDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessDevice {
    pub fn new() -> Self {
        Self::with_caps(DeviceCaps::default())
    }

    pub fn with_caps(caps: DeviceCaps) -> Self {
        let granted_samples = caps.max_samples;
        Self {
            caps,
            next_name: 1,
            errors: VecDeque::new(),
            bound_textures: FxHashMap::default(),
            bound_framebuffer: FramebufferHandle::NONE,
            depth_writes: false,
            debug_depth: 0,
            textures: FxHashMap::default(),
            framebuffers: FxHashMap::default(),
            renderbuffers: FxHashMap::default(),
            calls: Vec::new(),
            granted_samples,
            incomplete_framebuffers: false,
            storage_error: None,
            filtering: None,
        }
    }

    pub fn push_error(&mut self, err: DriverError) {
        self.errors.push_back(err);
    }

    pub fn debug_depth(&self) -> i32 {
        self.debug_depth
    }

    pub fn live_objects(&self) -> usize {
        self.textures.len() + self.framebuffers.len() + self.renderbuffers.len()
    }

    pub fn texture(&self, texture: TextureHandle) -> &TextureObject {
        &self.textures[&texture]
    }

    pub fn slice(&self, texture: TextureHandle, level: u32, slice: u32) -> &[u8] {
        &self.texture(texture).levels[level as usize].slices[slice as usize]
    }

    pub fn count_calls(&self, pred: impl Fn(&Call) -> bool) -> usize {
        self.calls.iter().filter(|call| pred(call)).count()
    }

    fn name(&mut self) -> u32 {
        let name = self.next_name;
        self.next_name += 1;
        name
    }

    fn bound_texture_object(&mut self, texture_type: TextureType) -> Option<&mut TextureObject> {
        let handle = self.bound_textures.get(&texture_type).copied()?;
        self.textures.get_mut(&handle)
    }

    fn slice_count(texture_type: TextureType, size: Extent3d) -> u32 {
        match texture_type {
            TextureType::D2 => 1,
            TextureType::Cube => Constant::CUBE_FACE_COUNT,
            TextureType::D2Array | TextureType::Volume => size.depth_or_array_layers,
        }
    }

    fn allocate_level(format: &DriverFormat, width: u32, height: u32, slices: u32) -> Level {
        let len = format.format().slice_size(width, height);
        Level {
            width,
            height,
            slices: (0..slices).map(|_| vec![GARBAGE; len]).collect(),
        }
    }

    fn write_rect(
        &mut self,
        texture_type: TextureType,
        level: u32,
        slice: u32,
        rect: Rect,
        format: &DriverFormat,
        data: &[u8],
    ) {
        let texel = format.format().block_size() as usize;
        let Some(object) = self.bound_texture_object(texture_type) else {
            self.errors.push_back(DriverError(glow::INVALID_OPERATION));
            return;
        };
        let Some(target) = object
            .levels
            .get_mut(level as usize)
            .filter(|level| rect.fits_within(level.width, level.height))
        else {
            self.errors.push_back(DriverError(glow::INVALID_VALUE));
            return;
        };
        let width = target.width as usize;
        let Some(pixels) = target.slices.get_mut(slice as usize) else {
            self.errors.push_back(DriverError(glow::INVALID_VALUE));
            return;
        };

        let row = rect.width as usize * texel;
        for y in 0..rect.height as usize {
            let src = y * row;
            let dst = ((rect.y as usize + y) * width + rect.x as usize) * texel;
            pixels[dst..dst + row].copy_from_slice(&data[src..src + row]);
        }
    }

    fn write_whole_slice(
        &mut self,
        texture_type: TextureType,
        level: u32,
        slice: u32,
        data: &[u8],
    ) {
        let Some(object) = self.bound_texture_object(texture_type) else {
            self.errors.push_back(DriverError(glow::INVALID_OPERATION));
            return;
        };
        match object
            .levels
            .get_mut(level as usize)
            .and_then(|level| level.slices.get_mut(slice as usize))
        {
            Some(pixels) => *pixels = data.to_vec(),
            None => self.errors.push_back(DriverError(glow::INVALID_VALUE)),
        }
    }

    fn clear_attachment(&mut self, attachment: Attachment, ops: &RenderTargetOps) {
        let Attachment::Texture {
            texture,
            level,
            slice,
        } = attachment
        else {
            return;
        };
        let Some(object) = self.textures.get_mut(&texture) else {
            return;
        };
        let Some(format) = object.format else {
            return;
        };
        let texel = format.format().block_size() as usize;
        if let Some(pixels) = object
            .levels
            .get_mut(level as usize)
            .and_then(|level| level.slices.get_mut(slice as usize))
        {
            for chunk in pixels.chunks_exact_mut(texel) {
                write_clear_texel(&format, ops, chunk);
            }
        }
    }
}

/// Encodes the components `ops` clears into one texel of `format`, leaving
/// the others untouched.
fn write_clear_texel(format: &DriverFormat, ops: &RenderTargetOps, texel: &mut [u8]) {
    if ops.as_color().is_some() {
        texel.fill(0);
        return;
    }
    let depth = ops.as_depth().map(|depth| depth.clamp(0.0, 1.0));
    let stencil = ops.as_stencil().map(|stencil| stencil & 0xFF);

    match (format.external(), format.transfer()) {
        (glow::STENCIL_INDEX, _) => {
            if let Some(stencil) = stencil {
                texel[0] = stencil as u8;
            }
        }
        (_, glow::FLOAT) => {
            if let Some(depth) = depth {
                texel[..4].copy_from_slice(&depth.to_le_bytes());
            }
        }
        (_, glow::UNSIGNED_SHORT) => {
            if let Some(depth) = depth {
                let value = (depth * 65535.0).round() as u16;
                texel[..2].copy_from_slice(&value.to_le_bytes());
            }
        }
        (_, glow::UNSIGNED_INT) | (_, glow::UNSIGNED_INT_24_8) => {
            let mut packed = u32::from_le_bytes([texel[0], texel[1], texel[2], texel[3]]);
            if let Some(depth) = depth {
                packed = (packed & 0xFF) | (((depth * 16_777_215.0).round() as u32) << 8);
            }
            if let Some(stencil) = stencil.filter(|_| format.transfer() == glow::UNSIGNED_INT_24_8) {
                packed = (packed & !0xFF) | stencil;
            }
            texel[..4].copy_from_slice(&packed.to_le_bytes());
        }
        (_, glow::FLOAT_32_UNSIGNED_INT_24_8_REV) => {
            if let Some(depth) = depth {
                texel[..4].copy_from_slice(&depth.to_le_bytes());
            }
            if let Some(stencil) = stencil {
                texel[4..8].copy_from_slice(&stencil.to_le_bytes());
            }
        }
        _ => {}
    }
}

impl DeviceContext for HeadlessDevice {
    fn caps(&self) -> &DeviceCaps {
        &self.caps
    }

    fn take_error(&mut self) -> Option<DriverError> {
        self.errors.pop_front()
    }

    fn push_debug_group(&mut self, label: &str) {
        self.debug_depth += 1;
        self.calls.push(Call::PushDebugGroup(label.to_owned()));
    }

    fn pop_debug_group(&mut self) {
        self.debug_depth -= 1;
        self.calls.push(Call::PopDebugGroup);
    }

    fn create_texture(&mut self, texture_type: TextureType) -> TextureHandle {
        let handle = TextureHandle::new(self.name());
        self.textures.insert(
            handle,
            TextureObject {
                texture_type,
                format: None,
                levels: Vec::new(),
                sampler: None,
            },
        );
        self.calls.push(Call::CreateTexture(handle));
        handle
    }

    fn delete_texture(&mut self, texture: TextureHandle) {
        self.textures.remove(&texture);
        for bound in self.bound_textures.values_mut() {
            if *bound == texture {
                *bound = TextureHandle::NONE;
            }
        }
        self.calls.push(Call::DeleteTexture(texture));
    }

    fn bound_texture(&self, texture_type: TextureType) -> TextureHandle {
        self.bound_textures
            .get(&texture_type)
            .copied()
            .unwrap_or_default()
    }

    fn bind_texture(&mut self, texture_type: TextureType, texture: TextureHandle) {
        self.bound_textures.insert(texture_type, texture);
    }

    fn texture_storage(
        &mut self,
        texture_type: TextureType,
        levels: u32,
        format: &DriverFormat,
        size: Extent3d,
    ) {
        self.calls.push(Call::TextureStorage { levels, size });
        if let Some(err) = self.storage_error {
            self.errors.push_back(err);
        }

        let format = *format;
        let Some(object) = self.bound_texture_object(texture_type) else {
            self.errors.push_back(DriverError(glow::INVALID_OPERATION));
            return;
        };
        object.format = Some(format);
        object.levels = (0..levels)
            .map(|level| {
                let mip = size.mip_level_size(level, texture_type.dimension());
                Self::allocate_level(
                    &format,
                    mip.width,
                    mip.height,
                    Self::slice_count(texture_type, mip),
                )
            })
            .collect();
    }

    fn compressed_image_3d(
        &mut self,
        texture_type: TextureType,
        level: u32,
        format: &DriverFormat,
        size: Extent3d,
        data: Option<&[u8]>,
        byte_len: usize,
    ) {
        self.calls.push(Call::CompressedImage3d { level, byte_len });
        let format = *format;
        let Some(object) = self.bound_texture_object(texture_type) else {
            return;
        };
        object.format = Some(format);
        let mut allocated =
            Self::allocate_level(&format, size.width, size.height, size.depth_or_array_layers);
        if let Some(data) = data {
            for (slice, chunk) in allocated
                .slices
                .iter_mut()
                .zip(data.chunks(format.format().slice_size(size.width, size.height)))
            {
                slice[..chunk.len()].copy_from_slice(chunk);
            }
        }
        let level = level as usize;
        if object.levels.len() <= level {
            object.levels.resize(level + 1, Level::empty());
        }
        object.levels[level] = allocated;
    }

    fn compressed_image_2d(
        &mut self,
        target: TextureTarget,
        level: u32,
        format: &DriverFormat,
        width: u32,
        height: u32,
        data: &[u8],
    ) {
        self.calls.push(Call::CompressedImage2d { target, level });
        let texture_type = target.texture_type();
        let format = *format;
        let Some(object) = self.bound_texture_object(texture_type) else {
            return;
        };
        object.format = Some(format);
        let index = level as usize;
        if object.levels.len() <= index {
            object.levels.resize(index + 1, Level::empty());
        }
        let faces = texture_type.face_count();
        let entry = &mut object.levels[index];
        if entry.width != width || entry.height != height || entry.slices.is_empty() {
            *entry = Self::allocate_level(&format, width, height, faces);
        }
        let slice = match target {
            TextureTarget::CubeFace(face) => face,
            TextureTarget::Texture(_) => 0,
        };
        self.write_whole_slice(texture_type, level, slice, data);
    }

    fn compressed_sub_image_3d(
        &mut self,
        texture_type: TextureType,
        level: u32,
        rect: Rect,
        slice: u32,
        _format: &DriverFormat,
        data: &[u8],
    ) {
        self.calls
            .push(Call::CompressedSubImage3d { level, slice, rect });
        self.write_whole_slice(texture_type, level, slice, data);
    }

    fn sub_image_2d(
        &mut self,
        target: TextureTarget,
        level: u32,
        rect: Rect,
        format: &DriverFormat,
        data: &[u8],
    ) {
        self.calls.push(Call::SubImage2d {
            target,
            level,
            rect,
        });
        let slice = match target {
            TextureTarget::CubeFace(face) => face,
            TextureTarget::Texture(_) => 0,
        };
        self.write_rect(target.texture_type(), level, slice, rect, format, data);
    }

    fn sub_image_3d(
        &mut self,
        texture_type: TextureType,
        level: u32,
        rect: Rect,
        slice: u32,
        format: &DriverFormat,
        data: &[u8],
    ) {
        self.calls.push(Call::SubImage3d { level, slice, rect });
        self.write_rect(texture_type, level, slice, rect, format, data);
    }

    /// Nearest-neighbour downsampling from each level to the next.
    fn generate_mipmap(&mut self, texture_type: TextureType) {
        self.calls.push(Call::GenerateMipmap);
        let Some(object) = self.bound_texture_object(texture_type) else {
            return;
        };
        let Some(texel) = object.format.map(|f| f.format().block_size() as usize) else {
            return;
        };
        let volume = texture_type == TextureType::Volume;

        for level in 1..object.levels.len() {
            let (src_levels, dst_levels) = object.levels.split_at_mut(level);
            let src = &src_levels[level - 1];
            let dst = &mut dst_levels[0];
            for (slice, pixels) in dst.slices.iter_mut().enumerate() {
                let src_slice = if volume {
                    (slice * 2).min(src.slices.len() - 1)
                } else {
                    slice
                };
                let source = &src.slices[src_slice];
                for y in 0..dst.height as usize {
                    for x in 0..dst.width as usize {
                        let sx = (x * 2).min(src.width as usize - 1);
                        let sy = (y * 2).min(src.height as usize - 1);
                        let from = (sy * src.width as usize + sx) * texel;
                        let to = (y * dst.width as usize + x) * texel;
                        pixels[to..to + texel].copy_from_slice(&source[from..from + texel]);
                    }
                }
            }
        }
    }

    fn apply_sampler(&mut self, texture_type: TextureType, sampler: &SamplerState) {
        if let Some(object) = self.bound_texture_object(texture_type) {
            object.sampler = Some(*sampler);
        }
    }

    fn create_framebuffer(&mut self) -> FramebufferHandle {
        let handle = FramebufferHandle::new(self.name());
        self.framebuffers
            .insert(handle, FramebufferObject::default());
        self.calls.push(Call::CreateFramebuffer(handle));
        handle
    }

    fn delete_framebuffer(&mut self, framebuffer: FramebufferHandle) {
        self.framebuffers.remove(&framebuffer);
        if self.bound_framebuffer == framebuffer {
            self.bound_framebuffer = FramebufferHandle::NONE;
        }
        self.calls.push(Call::DeleteFramebuffer(framebuffer));
    }

    fn bound_framebuffer(&self) -> FramebufferHandle {
        self.bound_framebuffer
    }

    fn bind_framebuffer(&mut self, framebuffer: FramebufferHandle) {
        self.bound_framebuffer = framebuffer;
    }

    fn framebuffer_texture(
        &mut self,
        role: AttachmentRole,
        texture_type: TextureType,
        texture: TextureHandle,
        level: u32,
        layer: u32,
        face: u32,
    ) {
        self.calls.push(Call::AttachTexture {
            role,
            level,
            layer,
            face,
        });
        let slice = match texture_type {
            TextureType::Cube => face,
            _ => layer,
        };
        if let Some(object) = self.framebuffers.get_mut(&self.bound_framebuffer) {
            object.attachments.insert(
                role,
                Attachment::Texture {
                    texture,
                    level,
                    slice,
                },
            );
        }
    }

    fn framebuffer_renderbuffer(
        &mut self,
        role: AttachmentRole,
        renderbuffer: RenderbufferHandle,
    ) {
        self.calls
            .push(Call::AttachRenderbuffer(role, renderbuffer));
        if let Some(object) = self.framebuffers.get_mut(&self.bound_framebuffer) {
            object
                .attachments
                .insert(role, Attachment::Renderbuffer(renderbuffer));
        }
    }

    fn disable_color_buffers(&mut self) {
        if let Some(object) = self.framebuffers.get_mut(&self.bound_framebuffer) {
            object.color_buffers_disabled = true;
        }
    }

    fn framebuffer_status(&mut self) -> FramebufferStatus {
        if self.incomplete_framebuffers {
            return FramebufferStatus::INCOMPLETE_ATTACHMENT;
        }
        match self.framebuffers.get(&self.bound_framebuffer) {
            Some(object) if !object.attachments.is_empty() => FramebufferStatus::COMPLETE,
            _ => FramebufferStatus::INCOMPLETE_MISSING_ATTACHMENT,
        }
    }

    fn create_renderbuffer(&mut self) -> RenderbufferHandle {
        let handle = RenderbufferHandle::new(self.name());
        self.renderbuffers.insert(
            handle,
            RenderbufferObject {
                samples: 0,
                width: 0,
                height: 0,
            },
        );
        self.calls.push(Call::CreateRenderbuffer(handle));
        handle
    }

    fn delete_renderbuffer(&mut self, renderbuffer: RenderbufferHandle) {
        self.renderbuffers.remove(&renderbuffer);
        self.calls.push(Call::DeleteRenderbuffer(renderbuffer));
    }

    fn renderbuffer_storage(
        &mut self,
        renderbuffer: RenderbufferHandle,
        _format: &DriverFormat,
        samples: u32,
        width: u32,
        height: u32,
    ) -> u32 {
        let granted = samples.min(self.granted_samples);
        if let Some(object) = self.renderbuffers.get_mut(&renderbuffer) {
            *object = RenderbufferObject {
                samples: granted,
                width,
                height,
            };
        }
        granted
    }

    fn depth_writes(&self) -> bool {
        self.depth_writes
    }

    fn set_depth_writes(&mut self, enabled: bool) {
        self.depth_writes = enabled;
    }

    fn clear(&mut self, ops: &RenderTargetOps) {
        self.calls.push(Call::Clear {
            ops: *ops,
            depth_writes: self.depth_writes,
        });
        let Some(object) = self.framebuffers.get(&self.bound_framebuffer) else {
            return;
        };
        let attachments: Vec<_> = object.attachments.values().copied().collect();

        for attachment in attachments {
            self.clear_attachment(attachment, ops);
        }
    }

    fn read_pixels(&mut self, rect: Rect, format: &DriverFormat, out: &mut [u8]) {
        self.calls.push(Call::ReadPixels(rect));
        let texel = format.format().block_size() as usize;
        let attachment = self
            .framebuffers
            .get(&self.bound_framebuffer)
            .and_then(|object| object.attachments.get(&AttachmentRole::Color))
            .copied();
        let Some(Attachment::Texture {
            texture,
            level,
            slice,
        }) = attachment
        else {
            self.errors
                .push_back(DriverError(glow::INVALID_FRAMEBUFFER_OPERATION));
            return;
        };
        let Some(source) = self
            .textures
            .get(&texture)
            .and_then(|object| object.levels.get(level as usize))
        else {
            return;
        };

        let row = rect.width as usize * texel;
        let pixels = &source.slices[slice as usize];
        for y in 0..rect.height as usize {
            let from = ((rect.y as usize + y) * source.width as usize + rect.x as usize) * texel;
            out[y * row..(y + 1) * row].copy_from_slice(&pixels[from..from + row]);
        }
    }

    fn supports_filtering(&self, format: TextureFormat) -> bool {
        self.filtering.unwrap_or_else(|| format.is_filterable())
    }
}
