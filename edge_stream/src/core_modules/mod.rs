pub mod convolver;
pub mod geometry;
pub mod line_buffer;
pub mod luma;
pub mod packer;
pub mod transport;
pub mod window;
