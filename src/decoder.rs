//! The LZW decoder: consumes codes, emits pixels, and resolves the classic LZW "KwKwK"
//! ambiguity in lockstep with [`crate::encoder`].

use log::trace;

use crate::bitstream::BitReader;
use crate::consts::{bit_size, LZ_MAX_CODE};
use crate::dict::{DecoderDict, NO_SUCH_CODE};
use crate::error::DecodeError;
use crate::header::{ImageHeader, HEADER_SIZE};
use crate::palette::Palette;

/// Parsed header, palette and code-stream bounds for a single image, borrowed out of the
/// caller-supplied buffer for the lifetime `'a`.
///
/// Mirrors the original decoder's `Info` struct: it stores offsets into the source buffer
/// rather than copying anything, so `buffer` must outlive this value.
pub struct ImageInfo<'a> {
	pub width: u16,
	pub height: u16,
	pub sram_limit: u16,
	pub palette: Palette,
	code_count: u16,
	data: &'a [u8],
}

impl<'a> ImageInfo<'a> {
	/// Parses the header and palette out of `buffer` and locates the code stream, mirroring the
	/// original `GetInfo(buffer, maxW, maxH, maxSz)` entry point.
	///
	/// `max_sz` is the caller's declared logical size of the data backing `buffer` (which may be
	/// physically longer, e.g. a whole mmap'd file); reads never go past it even if `buffer`
	/// itself does. Fails with [`DecodeError::MaxSz`] if `max_sz` is too small to hold a header,
	/// palette and at least one code byte, [`DecodeError::ZeroWidthOrHeight`] if either dimension
	/// is zero, and [`DecodeError::TooBig`] if the declared dimensions exceed
	/// `max_width`/`max_height`.
	pub fn parse(
		buffer: &'a [u8],
		max_width: u16,
		max_height: u16,
		max_sz: u16,
	) -> Result<Self, DecodeError> {
		if max_sz < 8 {
			// 8: 4-byte header + one color + code-count byte + one LZW data byte.
			return Err(DecodeError::MaxSz);
		}

		let header = ImageHeader::parse(buffer)?;
		if header.width > max_width || header.height > max_height {
			return Err(DecodeError::TooBig);
		}

		let color_table_size = header.color_count * 2;
		if (max_sz as usize) < 6 + color_table_size {
			return Err(DecodeError::MaxSz);
		}

		let palette_bytes = &buffer[HEADER_SIZE..HEADER_SIZE + color_table_size];
		let palette = Palette::read_from(&mut &palette_bytes[..], header.color_count)
			.map_err(|_| DecodeError::MaxSz)?;

		let remaining = max_sz as usize - (color_table_size + HEADER_SIZE);
		let rest = &buffer[HEADER_SIZE + color_table_size..];
		if rest.is_empty() || remaining == 0 {
			return Err(DecodeError::MaxSz);
		}
		let code_count = Palette::color_count_from_byte(rest[0]) as u16;

		let data_end = (remaining - 1).min(rest.len() - 1);
		Ok(ImageInfo {
			width: header.width,
			height: header.height,
			sram_limit: header.sram_limit,
			palette,
			code_count,
			data: &rest[1..1 + data_end],
		})
	}
}

/// Decompresses the code stream described by `info`, invoking `output` once per pixel in
/// strict raster order.
///
/// Allocates exactly one scratch buffer (`Prefix`, `Suffix` and a trace `Stack`, sized off
/// `info.sram_limit`) for the duration of the call; it is dropped on return whether decoding
/// succeeds or fails partway through.
pub fn decompress<F: FnMut(u8)>(info: &ImageInfo, mut output: F) -> Result<(), DecodeError> {
	let clear_code = info.code_count;
	let dict_base = info.code_count + 1;
	let dict_size = (info.sram_limit / 4).min(LZ_MAX_CODE + 1 - dict_base) as usize;
	let max_code_point = dict_base + dict_size as u16 - 1;
	let max_code_bits = bit_size(max_code_point);

	let mut running_code = clear_code + 1;
	let init_code_bits = bit_size(running_code);
	let mut running_bits = init_code_bits;
	let mut max_code1 = 1u16 << running_bits;

	let mut reader = BitReader::new(info.data);
	let mut dict = DecoderDict::new(dict_base, dict_size);
	let mut stack: Vec<u8> = Vec::with_capacity(dict_size);
	let mut last_code = NO_SUCH_CODE;

	let pixel_count = info.width as u64 * info.height as u64;
	let mut emitted: u64 = 0;

	while emitted < pixel_count {
		let code = reader.get_code(running_bits)?;

		if code == clear_code {
			dict.clear();
			running_code = clear_code + 1;
			running_bits = init_code_bits;
			max_code1 = 1 << running_bits;
			last_code = NO_SUCH_CODE;
			trace!("decoder observed CLEAR, dictionary reset");
			continue;
		}

		// Escalation happens here, right after the CLEAR check, rather than unconditionally
		// before it: a CLEAR code's bump would just be discarded by the reset above, so there's
		// no point doing it. The running total this produces is identical either way.
		if running_code < max_code_point + 2 {
			running_code += 1;
			if running_code > max_code1 && running_bits < max_code_bits {
				max_code1 <<= 1;
				running_bits += 1;
			}
		}

		if code < clear_code {
			output(code as u8);
			emitted += 1;
		} else {
			if code > max_code_point {
				return Err(DecodeError::ImageDefect);
			}

			let mut crnt_prefix = if dict.is_assigned(code) {
				code
			} else {
				// KwKwK: `code` is the very entry about to be installed below. Trace from
				// `last_code` instead, and the suffix is `last_code`'s own first pixel.
				let source = if code == running_code - 2 { last_code } else { code };
				let suffix_char = trace_prefix_char(&dict, source, clear_code, max_code_point)?;
				stack.push(suffix_char);
				last_code
			};

			while stack.len() < dict_size && crnt_prefix > clear_code && crnt_prefix <= max_code_point
			{
				stack.push(dict.suffix_of(crnt_prefix));
				crnt_prefix = dict.prefix_of(crnt_prefix);
			}
			if stack.len() >= dict_size || crnt_prefix > max_code_point {
				return Err(DecodeError::ImageDefect);
			}

			output(crnt_prefix as u8);
			emitted += 1;
			while let Some(pixel) = stack.pop() {
				if emitted >= pixel_count {
					break;
				}
				output(pixel);
				emitted += 1;
			}
		}

		let pending = running_code - 2;
		if last_code != NO_SUCH_CODE && !dict.is_assigned(pending) {
			let source = if code == pending { last_code } else { code };
			let suffix_char = trace_prefix_char(&dict, source, clear_code, max_code_point)?;
			dict.set(pending, last_code, suffix_char);
		}
		last_code = code;
	}

	Ok(())
}

/// Traces the prefix chain from `code` until it reaches a literal pixel (a code below
/// `clear_code`), bounded by [`LZ_MAX_CODE`] iterations so a malformed stream can't loop forever.
fn trace_prefix_char(
	dict: &DecoderDict,
	mut code: u16,
	clear_code: u16,
	max_code_point: u16,
) -> Result<u8, DecodeError> {
	let mut iterations = 0u32;
	while code > clear_code {
		if code > max_code_point || iterations > LZ_MAX_CODE as u32 {
			return Err(DecodeError::ImageDefect);
		}
		code = dict.prefix_of(code);
		iterations += 1;
	}
	Ok(code as u8)
}
