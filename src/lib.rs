//! TGIF: a compact, lossy-palette, LZW-compressed raster codec for decoders with only a few
//! kilobytes of SRAM to spare.
//!
//! The format trades full GIF compatibility for a declared decoder-SRAM budget embedded in the
//! header, which bounds how large the LZW dictionary is allowed to grow on both ends of the
//! wire. [`encoder::Encoder`] and [`decoder`] are the two halves of that contract; see
//! [`header::ImageHeader`] for the wire layout they agree on.

pub mod bitstream;
pub mod color;
pub mod consts;
pub mod decoder;
pub mod dict;
pub mod encoder;
pub mod error;
pub mod header;
pub mod palette;

pub mod prelude {
	pub use crate::color::Rgb565;
	pub use crate::decoder::{decompress, ImageInfo};
	pub use crate::encoder::Encoder;
	pub use crate::error::{DecodeError, EncodeError};
	pub use crate::palette::Palette;
}
