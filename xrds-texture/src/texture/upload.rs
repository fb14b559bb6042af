use crate::{DeviceContext, DriverFormat, Rect, TextureTarget, TextureType};

/// Driver entry point for writing one slice of one mip level.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadPath {
    /// Whole compressed image of a 2D texture or cube face
    CompressedImage,
    /// Compressed slice of an array or volume level, one slice deep
    CompressedSlice,
    /// Uncompressed rectangle of a 2D texture or cube face
    SubImage,
    /// Uncompressed rectangle of an array or volume slice
    SubImageSlice,
}

impl UploadPath {
    pub fn resolve(texture_type: TextureType, compressed: bool) -> Self {
        match (texture_type.is_layered(), compressed) {
            (false, true) => UploadPath::CompressedImage,
            (true, true) => UploadPath::CompressedSlice,
            (false, false) => UploadPath::SubImage,
            (true, false) => UploadPath::SubImageSlice,
        }
    }

    pub fn is_compressed(&self) -> bool {
        matches!(
            self,
            UploadPath::CompressedImage | UploadPath::CompressedSlice
        )
    }

    /// Issues the upload against the currently bound texture.
    #[allow(clippy::too_many_arguments)]
    pub fn upload(
        &self,
        ctx: &mut dyn DeviceContext,
        texture_type: TextureType,
        level: u32,
        slice: u32,
        rect: Rect,
        format: &DriverFormat,
        data: &[u8],
    ) {
        let target = TextureTarget::for_slice(texture_type, slice);
        match self {
            UploadPath::CompressedImage => {
                ctx.compressed_image_2d(target, level, format, rect.width, rect.height, data)
            }
            UploadPath::CompressedSlice => {
                ctx.compressed_sub_image_3d(texture_type, level, rect, slice, format, data)
            }
            UploadPath::SubImage => ctx.sub_image_2d(target, level, rect, format, data),
            UploadPath::SubImageSlice => {
                ctx.sub_image_3d(texture_type, level, rect, slice, format, data)
            }
        }
    }
}
