//! C source emission for the grlib `Graphics_Image` format.

use super::style::BracketStyle;
use crate::pack::ImageMetadata;

/// Packed bytes per line in the pixel array.
const PIXEL_COLUMNS: usize = 8;

/// Palette entries per line in the palette array.
const PALETTE_COLUMNS: usize = 4;

/// Indent used for every array line.
const INDENT: &str = "    ";

/// Render `metadata` as a C translation unit defining a
/// `Graphics_Image` named `{prefix}{depth}BPP_UNCOMP`.
///
/// The output is byte-for-byte reproducible for equal inputs. The last line
/// has no terminating newline.
///
/// # Example
///
/// ```
/// use palette_pack::{render_source, BracketStyle, ColorDepth, ImageMetadata, PixelBuffer, Rgb};
///
/// let buffer = PixelBuffer::filled(2, 1, Rgb::WHITE);
/// let meta = ImageMetadata::from_buffer(&buffer, ColorDepth::One).unwrap();
/// let source = render_source(&meta, "logo", BracketStyle::SameLine);
///
/// assert!(source.contains("const Graphics_Image logo1BPP_UNCOMP = {"));
/// assert!(source.contains("    0x00\n};"));
/// ```
pub fn render_source(metadata: &ImageMetadata, prefix: &str, style: BracketStyle) -> String {
    let depth = metadata.depth().bits();
    let colors = metadata.depth().color_count();
    let (width, height) = (metadata.width(), metadata.height());
    let open = style.separator();
    let name = format!("{prefix}{depth}BPP_UNCOMP");

    let pixels = hex_array(metadata.pixels().iter().map(|&b| b as u32), 2, PIXEL_COLUMNS);
    let palette = hex_array(
        metadata.palette().entries().iter().copied(),
        6,
        PALETTE_COLUMNS,
    );

    format!(
        "/** Generated with imgreform\n\
         \x20 *\n\
         \x20 * Image name: {prefix}\n\
         \x20 * {width}x{height}@{depth}bpp ({colors} colors)\n\
         \x20 */\n\
         \n\
         #include <ti/grlib/grlib.h>\n\
         // Change this include as needed if it doesn't work\n\
         \n\
         static const uint8_t pixel_{name}[] ={open}{{\n\
         {pixels}\n\
         }};\n\
         \n\
         static const uint32_t palette_{name}[] ={open}{{\n\
         {palette}\n\
         }};\n\
         \n\
         const Graphics_Image {name} ={open}{{\n\
         {INDENT}IMAGE_FMT_{depth}BPP_UNCOMP,\n\
         {INDENT}{width},\n\
         {INDENT}{height},\n\
         {INDENT}{colors},\n\
         {INDENT}palette_{name},\n\
         {INDENT}pixel_{name}\n\
         }};\n\
         \n\
         // extern const Graphics_Image {name};\n\
         // Use the above line in the source file where you reference the image."
    )
}

/// Format `values` as indented, comma-separated `0x` literals with `digits`
/// lowercase hex digits and `columns` values per line. No trailing comma.
fn hex_array(values: impl Iterator<Item = u32>, digits: usize, columns: usize) -> String {
    let mut out = String::from(INDENT);
    for (i, value) in values.enumerate() {
        out.push_str(&format!("0x{value:0digits$x},"));
        if (i + 1) % columns == 0 {
            out.push('\n');
            out.push_str(INDENT);
        }
    }
    let trimmed = out.strip_suffix(&format!("\n{INDENT}")).unwrap_or(&out);
    trimmed.strip_suffix(',').unwrap_or(trimmed).to_string()
}
