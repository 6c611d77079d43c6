//! `tgif-convert`: reads a standard GIF via the `gif` crate, remaps its palette down to RGB565
//! with the codec's dedupe rules, and writes it out as a TGIF file.
//!
//! This binary is the out-of-scope CLI collaborator the core codec is built to be driven by; it
//! holds no codec logic of its own beyond the palette remap.

use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::info;

use tgif::color::Rgb565;
use tgif::encoder::Encoder;
use tgif::error::EncodeError;
use tgif::palette::{Palette, PaletteError};

/// Default decoder SRAM budget assumed when the caller doesn't pass one, matching the upstream
/// `convert` tool's default.
const DEFAULT_SRAM_LIMIT: u16 = 3072;

#[derive(Parser)]
#[command(name = "tgif-convert", about = "Convert a GIF image into a TGIF file")]
struct Args {
	/// Source GIF file.
	input: PathBuf,

	/// Destination TGIF file.
	output: PathBuf,

	/// Declared decoder SRAM budget in bytes (rounded down to a multiple of 256).
	#[arg(default_value_t = DEFAULT_SRAM_LIMIT)]
	sram_limit: u16,
}

#[derive(thiserror::Error, Debug)]
enum ConvertError {
	#[error("failed to read input GIF")]
	Gif(#[from] gif::DecodingError),

	#[error("input GIF has no frames")]
	NoFrames,

	#[error("input GIF dimensions {0}x{1} exceed the 1023x1023 format limit")]
	TooBig(u16, u16),

	#[error("palette remap produced an invalid palette")]
	Palette(#[from] PaletteError),

	#[error("encoding failed")]
	Encode(#[from] EncodeError),
}

/// Maps an RGB888 triple to RGB565, deduplicating against colors already seen so the output
/// palette only ever grows by colors that are actually distinct once quantized. Mirrors the
/// upstream `MapColor` routine: a linear scan is fine here since the palette never exceeds 256
/// entries.
fn map_color(colors: &mut Vec<Rgb565>, r: u8, g: u8, b: u8) -> u8 {
	let packed = Rgb565::from_rgb888(r, g, b);
	if let Some(index) = colors.iter().position(|&c| c == packed) {
		return index as u8;
	}
	colors.push(packed);
	(colors.len() - 1) as u8
}

fn convert(args: &Args) -> Result<(), ConvertError> {
	let input_file = File::open(&args.input).map_err(|e| {
		ConvertError::Gif(gif::DecodingError::Io(e))
	})?;
	let mut decoder = gif::DecodeOptions::new().read_info(input_file)?;

	let frame = decoder.read_next_frame()?.ok_or(ConvertError::NoFrames)?;
	let width = frame.width;
	let height = frame.height;
	if width == 0 || height == 0 || width > 1023 || height > 1023 {
		return Err(ConvertError::TooBig(width, height));
	}

	let source_palette =
		frame.palette.as_deref().or_else(|| decoder.global_palette()).unwrap_or(&[]);

	let mut palette_map: Vec<Option<u8>> = vec![None; 256];
	let mut new_colors: Vec<Rgb565> = Vec::new();
	let mut out_pixels = Vec::with_capacity(frame.buffer.len());

	for &index in frame.buffer.iter() {
		let mapped = match palette_map[index as usize] {
			Some(mapped) => mapped,
			None => {
				let offset = index as usize * 3;
				let (r, g, b) = match source_palette.get(offset..offset + 3) {
					Some(rgb) => (rgb[0], rgb[1], rgb[2]),
					None => (0, 0, 0),
				};
				let mapped = map_color(&mut new_colors, r, g, b);
				palette_map[index as usize] = Some(mapped);
				mapped
			}
		};
		out_pixels.push(mapped);
	}

	info!("processing {}x{} image with {} colors", width, height, new_colors.len());
	info!("encoding for a decoder with {} bytes of SRAM", args.sram_limit);

	let palette = Palette::new(new_colors)?;
	let output_file = File::create(&args.output).map_err(EncodeError::WriteFailed)?;
	let mut encoder = Encoder::new(BufWriter::new(output_file));
	encoder.put_screen_desc(width, height, &palette, args.sram_limit)?;
	encoder.put_line(&out_pixels)?;
	encoder.close()?;

	Ok(())
}

fn main() -> ExitCode {
	env_logger::init();
	let args = Args::parse();

	match convert(&args) {
		Ok(()) => ExitCode::SUCCESS,
		Err(err) => {
			eprintln!("tgif-convert: {err}");
			ExitCode::from(2)
		}
	}
}
