//! The LZW encoder: consumes pixels, emits codes, and tracks code-width escalation and the
//! dictionary-full policy in lockstep with [`crate::decoder`].

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::{debug, trace};

use crate::bitstream::BitWriter;
use crate::consts::{bit_size, LZ_MAX_CODE};
use crate::dict::EncoderDict;
use crate::error::EncodeError;
use crate::header::ImageHeader;
use crate::palette::{Palette, PaletteError};

/// Encodes a single image into the TGIF wire format.
///
/// The typical lifecycle is [`Encoder::new`], one call to [`Encoder::put_screen_desc`], one or
/// more calls to [`Encoder::put_line`] until every pixel has been supplied, then
/// [`Encoder::close`]. Dropping an `Encoder` without calling `close` discards any buffered
/// output without flushing it.
pub struct Encoder<W: Write> {
	writer: W,
	bit_writer: BitWriter,
	dict: EncoderDict,

	has_screen_desc: bool,
	color_count: u16,
	clear_code: u16,
	running_code: u16,
	init_code_bits: u8,
	running_bits: u8,
	max_code1: u16,
	max_code_point: u16,
	crnt_code: Option<u16>,
	pixel_count: u64,
	max_code_used: u16,
}

impl<W: Write> Encoder<W> {
	pub fn new(writer: W) -> Self {
		Encoder {
			writer,
			bit_writer: BitWriter::new(),
			dict: EncoderDict::new(),
			has_screen_desc: false,
			color_count: 0,
			clear_code: 0,
			running_code: 0,
			init_code_bits: 0,
			running_bits: 0,
			max_code1: 0,
			max_code_point: 0,
			crnt_code: None,
			pixel_count: 0,
			max_code_used: 0,
		}
	}

	/// Writes the header, palette and initial code-count byte, and resets the compression
	/// state for a new image. May only be called once per encoder.
	pub fn put_screen_desc(
		&mut self,
		width: u16,
		height: u16,
		palette: &Palette,
		sram_limit: u16,
	) -> Result<(), EncodeError> {
		if self.has_screen_desc {
			return Err(EncodeError::HasScreenDesc);
		}
		if palette.is_empty() {
			return Err(EncodeError::NoColorMap);
		}

		let sram_masked = sram_limit & !0xFF;
		if sram_masked == 0 {
			return Err(EncodeError::NoColorMap);
		}

		let color_count = palette.len();
		let header = ImageHeader { width, height, sram_limit: sram_masked, color_count };
		self.writer.write_all(&header.write()).map_err(EncodeError::WriteFailed)?;
		palette.write_to(&mut self.writer).map_err(palette_write_err)?;
		self.writer
			.write_all(&[palette.color_count_byte()])
			.map_err(EncodeError::WriteFailed)?;

		self.color_count = color_count as u16;
		self.clear_code = self.color_count;
		// `color_count + 1 + sram/4 - 1` collapses to `color_count + sram/4`; written this way to
		// mirror the decoder's `DictBase + DictSize - 1` derivation so the two never disagree on
		// the last code the dictionary may hand out before a CLEAR is forced.
		self.max_code_point = (self.color_count + sram_masked / 4).min(LZ_MAX_CODE);
		self.running_code = self.clear_code + 1;
		self.running_bits = bit_size(self.running_code);
		self.init_code_bits = self.running_bits;
		self.max_code1 = 1 << self.running_bits;
		self.crnt_code = None;
		self.max_code_used = 0;
		self.dict.clear();
		self.pixel_count = width as u64 * height as u64;
		self.has_screen_desc = true;

		debug!(
			"put_screen_desc: {}x{}, {} colors, sram_limit={}, max_code_point={}",
			width, height, color_count, sram_masked, self.max_code_point
		);
		Ok(())
	}

	/// Compresses a run of pixels. May be called repeatedly until all `width * height` pixels
	/// of the image have been supplied, at which point the trailing code is flushed.
	pub fn put_line(&mut self, pixels: &[u8]) -> Result<(), EncodeError> {
		if !self.has_screen_desc {
			return Err(EncodeError::HasImageDesc);
		}
		if pixels.len() as u64 > self.pixel_count {
			return Err(EncodeError::DataTooBig);
		}
		self.pixel_count -= pixels.len() as u64;
		self.compress_line(pixels)
	}

	/// Finishes the image and returns the underlying writer. Must be called exactly once.
	pub fn close(mut self) -> Result<W, EncodeError> {
		self.bit_writer.flush(&mut self.writer).map_err(EncodeError::WriteFailed)?;
		self.writer.flush().map_err(EncodeError::WriteFailed)?;
		Ok(self.writer)
	}

	/// The largest code emitted during compression, for diagnostics.
	pub fn max_code_used(&self) -> u16 {
		self.max_code_used
	}

	fn emit_code(&mut self, code: u16) -> Result<(), EncodeError> {
		self.bit_writer
			.put_code(&mut self.writer, code, self.running_bits)
			.map_err(EncodeError::WriteFailed)?;
		if self.running_code >= self.max_code1 && code <= LZ_MAX_CODE {
			self.running_bits += 1;
			self.max_code1 = 1 << self.running_bits;
		}
		Ok(())
	}

	fn compress_line(&mut self, pixels: &[u8]) -> Result<(), EncodeError> {
		let mut iter = pixels.iter();

		let mut crnt_code = match self.crnt_code {
			Some(c) => c,
			None => match iter.next() {
				Some(&p) => {
					debug_assert!((p as u16) < self.color_count);
					p as u16
				}
				None => return Ok(()), // nothing to do yet; still waiting for the first pixel
			},
		};

		for &pixel in iter {
			debug_assert!((pixel as u16) < self.color_count);
			let new_key = ((crnt_code as u32) << 8) | pixel as u32;
			if let Some(existing) = self.dict.find(new_key) {
				crnt_code = existing;
			} else {
				self.emit_code(crnt_code)?;
				crnt_code = pixel as u16;

				if self.running_code >= self.max_code_point {
					self.max_code_used = self.max_code_point;
					self.emit_code(self.clear_code)?;
					self.running_code = self.clear_code + 1;
					self.running_bits = self.init_code_bits;
					self.max_code1 = 1 << self.running_bits;
					self.dict.clear();
					trace!("dictionary full, emitted CLEAR");
				} else {
					self.dict.insert(new_key, self.running_code);
					self.running_code += 1;
				}
			}
		}

		self.crnt_code = Some(crnt_code);

		if self.pixel_count == 0 {
			if self.max_code_used < self.running_code - 1 {
				self.max_code_used = self.running_code - 1;
			}
			self.emit_code(crnt_code)?;
			self.bit_writer.flush(&mut self.writer).map_err(EncodeError::WriteFailed)?;
		}

		Ok(())
	}
}

impl Encoder<BufWriter<File>> {
	/// Convenience constructor mirroring the original file-based encoder entry point.
	pub fn create_file<P: AsRef<Path>>(path: P) -> Result<Self, EncodeError> {
		let file = File::create(path).map_err(|_| EncodeError::OpenFailed)?;
		Ok(Encoder::new(BufWriter::new(file)))
	}
}

fn palette_write_err(err: PaletteError) -> EncodeError {
	match err {
		PaletteError::Io(io) => EncodeError::WriteFailed(io),
		PaletteError::BadColorCount(_) => EncodeError::NoColorMap,
	}
}
