use wgpu_types::Color;

pub struct Constant {}

impl Constant {
    pub const CUBE_FACE_COUNT: u32 = 6;

    /// Edge length of the substitute texture used when a request exceeds driver limits
    pub const PLACEHOLDER_SIZE: u32 = 2;
    /// White / light pink checker, RGBA8
    pub const PLACEHOLDER_PIXELS: [[u8; 4]; 4] = [
        [0xFF, 0xFF, 0xFF, 0xFF],
        [0xFF, 0xA0, 0xA0, 0xFF],
        [0xFF, 0xA0, 0xA0, 0xFF],
        [0xFF, 0xFF, 0xFF, 0xFF],
    ];

    pub const CLEAR_COLOR: Color = Color::TRANSPARENT;
    pub const CLEAR_DEPTH: f32 = 1.0;
    pub const CLEAR_STENCIL: u32 = 0;

    pub const DEBUG_GROUP_LOAD: &'static str = "Texture load";
    pub const DEBUG_GROUP_UPLOAD: &'static str = "Texture data upload";
}
