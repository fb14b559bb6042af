mod constant;
mod device;
mod error;
mod memory;
mod texture;
mod volatile;

#[cfg(test)]
mod headless;

pub use constant::*;
pub use device::*;
pub use error::*;
pub use memory::*;
pub use texture::*;
pub use volatile::*;
