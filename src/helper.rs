use crate::geometry::{RoundedRect, Size};
use crate::grid::ModuleGrid;

use image::{ImageBuffer, Luma};
use log::debug;
use std::path::Path;
use std::fs;
use std::time::{SystemTime, UNIX_EPOCH};

/*---- Utilities ----*/

// Returns a string of SVG code for an image depicting the given shape
// sequence on the given canvas. The string always uses Unix newlines (\n),
// regardless of the platform.
pub fn to_svg_string(shapes: &[RoundedRect], size: Size) -> String {
	assert!(!size.is_empty(), "Canvas size must be positive");
	let mut result = String::new();
	result += "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n";
	result += "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">\n";
	result += &format!(
		"<svg xmlns=\"http://www.w3.org/2000/svg\" version=\"1.1\" viewBox=\"0 0 {} {}\" stroke=\"none\">\n",
		size.width, size.height);
	result += "\t<rect width=\"100%\" height=\"100%\" fill=\"#FFFFFF\"/>\n";
	for shape in shapes {
		result += &format!(
			"\t<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" rx=\"{}\" fill=\"#000000\"/>\n",
			shape.rect.x, shape.rect.y, shape.rect.width, shape.rect.height, shape.corner_radius);
	}
	result += "</svg>\n";
	result
}

/// Renders the given module grid as console text, two characters per module.
pub fn grid_to_string(grid: &ModuleGrid) -> String {
	let mut result = String::new();
	for row in 0..grid.dimension() {
		for col in 0..grid.dimension() {
			let c: char = if grid.value_at(row, col) { '█' } else { ' ' };
			result.push(c);
			result.push(c);
		}
		result.push('\n');
	}
	result
}

/// Prints the given module grid to the console.
pub fn print_grid(grid: &ModuleGrid) {
	print!("{}", grid_to_string(grid));
}

/// Rasterizes a shape sequence into a grayscale image buffer.
///
/// The canvas starts white; every pixel whose center falls inside a shape is
/// painted black. The buffer dimensions are the canvas extents rounded up to
/// whole pixels.
///
/// # Arguments
///
/// * `shapes` - The rounded rectangles to paint, as produced by a pixel shape.
/// * `size` - The canvas the shapes were generated for.
///
/// # Returns
///
/// An `ImageBuffer` with the shapes rendered onto it.
///
/// # Example
///
/// ```rust
/// use qrpath::geometry::Size;
/// use qrpath::grid::ModuleGrid;
/// use qrpath::helper::render_image_buffer;
/// use qrpath::shape::{PixelShape, VerticalShape};
///
/// let grid = ModuleGrid::from_fn(23, |row, col| (row + col) % 3 == 0);
/// let size = Size::new(115.0, 115.0);
/// let shapes = VerticalShape::new(0.5, 1.0).on_path(size, &grid, false);
/// let img = render_image_buffer(&shapes, size);
/// assert_eq!(img.dimensions(), (115, 115));
/// ```
pub fn render_image_buffer(shapes: &[RoundedRect], size: Size) -> ImageBuffer<Luma<u8>, Vec<u8>> {
    let width = size.width.ceil().max(0.0) as u32;
    let height = size.height.ceil().max(0.0) as u32;
    debug!("rasterizing {} shapes onto a {}x{} canvas", shapes.len(), width, height);
    let mut img = ImageBuffer::from_pixel(width, height, Luma([255u8]));

    for shape in shapes {
        let x0 = shape.rect.x.floor().max(0.0) as u32;
        let y0 = shape.rect.y.floor().max(0.0) as u32;
        let x1 = (shape.rect.max_x().ceil() as u32).min(width);
        let y1 = (shape.rect.max_y().ceil() as u32).min(height);
        for y in y0..y1 {
            for x in x0..x1 {
                if shape.contains_point(x as f64 + 0.5, y as f64 + 0.5) {
                    img.put_pixel(x, y, Luma([0u8]));
                }
            }
        }
    }

    img
}

/// Rasterizes a shape sequence and saves it to a PNG file.
///
/// # Arguments
///
/// * `shapes` - The rounded rectangles to paint.
/// * `size` - The canvas the shapes were generated for.
/// * `directory_path` - Optional. The directory path where the image will be saved. If not provided, the default directory is "generated".
/// * `filename` - Optional. The name of the image file. If not provided, a timestamp-based filename will be used.
///
/// # Errors
///
/// Returns an `image::ImageError` if there is an error saving the image.
///
/// # Example
///
/// ```rust,no_run
/// use qrpath::geometry::Size;
/// use qrpath::grid::ModuleGrid;
/// use qrpath::helper::render_image_and_save;
/// use qrpath::shape::{PixelShape, VerticalShape};
///
/// let grid = ModuleGrid::from_fn(23, |row, col| row % 2 == col % 2);
/// let size = Size::new(230.0, 230.0);
/// let shapes = VerticalShape::new(1.0, 0.5).on_path(size, &grid, false);
/// render_image_and_save(&shapes, size, Some("images"), Some("shapes")).unwrap();
/// ```
pub fn render_image_and_save(
    shapes: &[RoundedRect],
    size: Size,
    directory_path: Option<&str>,
    filename: Option<&str>
) -> Result<(), image::ImageError> {
    let img = render_image_buffer(shapes, size);

    let directory_path = directory_path.unwrap_or("generated");
    let filename = match filename {
    Some(name) => name.to_string(),
    None => {
        let start = SystemTime::now();
        let since_the_epoch = start.duration_since(UNIX_EPOCH)
            .expect("Time went backwards");
        format!("{:?}", since_the_epoch)
    	},
		};

    let file_path = format!("{}/{}.png", directory_path, filename);

    // Check if the directory exists, create it if it doesn't
    if !Path::new(directory_path).exists() {
        fs::create_dir_all(directory_path)?;
    }

    debug!("saving rendered shapes to {}", file_path);
    img.save(&Path::new(&file_path))
}
