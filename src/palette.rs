//! Palette: an ordered list of RGB565 colors, 1 to 256 entries.

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};
use thiserror::Error;

use crate::color::Rgb565;

#[derive(Error, Debug)]
pub enum PaletteError {
	#[error("palette must have between 1 and 256 colors, got {0}")]
	BadColorCount(usize),

	#[error(transparent)]
	Io(#[from] std::io::Error),
}

/// An ordered sequence of RGB565 colors. Pixel index `i` refers to the i-th entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Palette {
	colors: Vec<Rgb565>,
}

impl Palette {
	/// Builds a palette from an explicit color list. Fails if the list is empty or has more
	/// than 256 entries, since both sizes are unrepresentable in the single `ColorCount` byte.
	pub fn new(colors: Vec<Rgb565>) -> Result<Self, PaletteError> {
		if colors.is_empty() || colors.len() > 256 {
			return Err(PaletteError::BadColorCount(colors.len()));
		}
		Ok(Palette { colors })
	}

	pub fn colors(&self) -> &[Rgb565] {
		&self.colors
	}

	pub fn len(&self) -> usize {
		self.colors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.colors.is_empty()
	}

	pub fn get(&self, index: u8) -> Option<Rgb565> {
		self.colors.get(index as usize).copied()
	}

	/// The byte written on the wire for this palette's size: 256 colors wrap around to 0.
	pub fn color_count_byte(&self) -> u8 {
		if self.colors.len() == 256 {
			0
		} else {
			self.colors.len() as u8
		}
	}

	/// Reconstructs the logical color count from a `ColorCount` byte read off the wire.
	pub fn color_count_from_byte(byte: u8) -> usize {
		if byte == 0 {
			256
		} else {
			byte as usize
		}
	}

	pub fn write_to<W: Write>(&self, writer: &mut W) -> Result<(), PaletteError> {
		for color in &self.colors {
			writer.write_u16::<LittleEndian>(color.raw())?;
		}
		Ok(())
	}

	pub fn read_from<R: Read>(reader: &mut R, color_count: usize) -> Result<Self, PaletteError> {
		let mut colors = Vec::with_capacity(color_count);
		for _ in 0..color_count {
			colors.push(Rgb565(reader.read_u16::<LittleEndian>()?));
		}
		Palette::new(colors)
	}
}

impl std::ops::Index<u8> for Palette {
	type Output = Rgb565;

	fn index(&self, index: u8) -> &Self::Output {
		&self.colors[index as usize]
	}
}
