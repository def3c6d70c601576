//! Grayscale image buffers and file IO.
//!
//! - [`ImageU8`]: borrowed 8-bit view over caller-owned pixels.
//! - [`ImageF32`]: owned float buffer the processing stages work on,
//!   normalized to `[0, 1]`.
//! - [`io`]: PNG load/save and a JSON dump helper for reports.

pub mod f32;
pub mod io;
pub mod u8;

pub use self::f32::ImageF32;
pub use self::u8::ImageU8;
