#![forbid(unsafe_code)]
//! # qrpath
//!
//! A Rust library for turning QR code module grids into vector path geometry.
//!
//! `qrpath` takes the boolean module matrix an external QR encoder produces and
//! renders it as an ordered sequence of rounded-rectangle primitives, ready for
//! an SVG writer, a raster painter, or any other vector consumer. The core is a
//! pixel-shape strategy that merges vertically contiguous modules into single
//! tall rectangles, parameterized by an inset and a corner-rounding fraction,
//! while keeping the three finder-eye regions free for separate styling.
//!
//! ## Features
//!
//! - Merge vertical module runs into minimal rounded-rectangle sequences.
//! - Generate dark-module and light-module passes, plus an unmasked template
//!   mode for layout and hit-testing.
//! - Exclude the finder-eye regions from ordinary module rendering through a
//!   derived masked grid view.
//! - Construct strategies by name from string-keyed settings maps, and read
//!   or write their parameters through the same surface.
//! - Render the resulting shapes as SVG, PNG, or in-memory image buffers.
//! - Safe Rust implementation with no unsafe code.
//!
//! ## Installation
//!
//! Add to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! qrpath = "0.1" # Replace with the latest version
//! ```
//!
//! ## Example
//!
//! Generate the dark-module path of a grid and write it out as SVG:
//!
//! ```rust
//! use qrpath::geometry::Size;
//! use qrpath::grid::ModuleGrid;
//! use qrpath::helper::to_svg_string;
//! use qrpath::shape::{PixelShape, VerticalShape};
//!
//! fn main() {
//!     // A stand-in for the matrix an encoder would supply.
//!     let grid = ModuleGrid::from_fn(23, |row, col| (row * col) % 3 == 0);
//!     let size = Size::new(230.0, 230.0);
//!
//!     let shape = VerticalShape::new(1.0, 0.75);
//!     let shapes = shape.on_path(size, &grid, false);
//!     let svg = to_svg_string(&shapes, size);
//!     assert!(svg.contains("<rect"));
//! }
//! ```
//!
//! Construct a strategy from serialized settings:
//!
//! ```rust
//! use qrpath::shape::shape_named;
//! use serde_json::json;
//!
//! fn main() {
//!     let mut settings = serde_json::Map::new();
//!     settings.insert("inset".to_string(), json!(0.5));
//!     settings.insert("cornerRadiusFraction".to_string(), json!(1.0));
//!
//!     let shape = shape_named("vertical", &settings).unwrap();
//!     assert_eq!(shape.name(), "vertical");
//! }
//! ```
//!
//! ## Modules
//!
//! - [`geometry`]: Rectangle and size value types plus styling parameters.
//! - [`grid`]: The module grid and its finder-eye masking.
//! - [`shape`]: Pixel-shape strategies and their settings surface.
//! - [`helper`]: Utilities for rendering shape sequences in various formats.

pub mod geometry;
pub mod grid;
pub mod helper;
pub mod shape;
