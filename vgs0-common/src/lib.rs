//! Shared formats and code generation for the VGS0 packaging tools
//!
//! This crate is used by:
//! - `bmp2img` (palette image converter)
//! - `pkg2src` (package to C source)
//! - `makepkg` (game package assembler)
//! - `vgs0-frontend` (package consumer)
//!
//! # Modules
//!
//! - [`formats`] - BMP decoding and the `VGS0PKG` game package layout
//! - [`codegen`] - Deterministic C array emission
//! - [`fs`] - Size-capped reads and atomic writes

pub mod codegen;
pub mod formats;
pub mod fs;

// Re-export commonly used format items
pub use formats::{
    BitmapError, BitmapHeader, GamePackage, IndexedBitmap, MIN_ROM_SIZE, PACKAGE_MAGIC,
    PackageError, Palette, PixelTable, Segment, decode_indexed_bmp,
};

// Re-export code generation entry points
pub use codegen::{
    C_UCHAR, C_UINT, CArrayWriter, VALUES_PER_LINE, render_c_array, symbol_from_path,
    write_c_array, write_extern_header,
};
