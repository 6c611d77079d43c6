use thiserror::Error;

/// Errors produced by [`crate::encoder::Encoder`].
///
/// Numeric codes mirror the error table a C caller would switch on; they are not used
/// internally but are handy for callers bridging to that world (see [`EncodeError::code`]).
#[derive(Error, Debug)]
pub enum EncodeError {
	#[error("failed to open output for writing")]
	OpenFailed,

	#[error("write to output failed")]
	WriteFailed(#[from] std::io::Error),

	#[error("put_screen_desc was already called on this encoder")]
	HasScreenDesc,

	#[error("put_screen_desc has not been called yet")]
	HasImageDesc,

	#[error("palette is empty or sram_limit is zero after masking")]
	NoColorMap,

	#[error("more pixels were written than width * height")]
	DataTooBig,

	#[error("not enough memory to allocate encoder state")]
	NotEnoughMem,

	#[error("disk is full")]
	DiskIsFull,

	#[error("failed to close output")]
	CloseFailed,

	#[error("output is not writeable")]
	NotWriteable,
}

impl EncodeError {
	/// The numeric error code a C caller of the original encoder would see.
	pub fn code(&self) -> i32 {
		match self {
			EncodeError::OpenFailed => 1,
			EncodeError::WriteFailed(_) => 2,
			EncodeError::HasScreenDesc => 3,
			EncodeError::HasImageDesc => 4,
			EncodeError::NoColorMap => 5,
			EncodeError::DataTooBig => 6,
			EncodeError::NotEnoughMem => 7,
			EncodeError::DiskIsFull => 8,
			EncodeError::CloseFailed => 9,
			EncodeError::NotWriteable => 10,
		}
	}
}

/// Errors produced while parsing a header or decompressing a code stream.
#[derive(Error, Debug)]
pub enum DecodeError {
	#[error("buffer is too small to hold a valid header, palette or code stream")]
	MaxSz,

	#[error("width or height is zero")]
	ZeroWidthOrHeight,

	#[error("width or height exceeds the caller-supplied bound")]
	TooBig,

	#[error("not enough memory to allocate decoder scratch space")]
	NotEnoughMem,

	#[error("code stream is malformed (defective input)")]
	ImageDefect,
}

impl DecodeError {
	/// The numeric error code a C caller of the original decoder would see.
	pub fn code(&self) -> i32 {
		match self {
			DecodeError::MaxSz => 20,
			DecodeError::ZeroWidthOrHeight => 21,
			DecodeError::TooBig => 22,
			DecodeError::NotEnoughMem => 23,
			DecodeError::ImageDefect => 24,
		}
	}
}
