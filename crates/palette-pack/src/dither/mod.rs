//! Error diffusion dithering.
//!
//! Nine classic diffusion kernels are available through [`DitherKernel`].
//! Dithering is optional: the quantizer takes an `Option<DitherKernel>` and
//! falls back to plain nearest-color mapping on `None`.
//!
//! # Scan Order
//!
//! Rows are always processed left-to-right, top-to-bottom. Error is computed
//! and accumulated in 8-bit RGB units, and a pixel's working value
//! (original + accumulated error) is clamped to `0.0..=255.0` before it is
//! matched against the palette.
//!
//! # Example
//!
//! ```
//! use palette_pack::DitherKernel;
//!
//! let kernel: DitherKernel = "SierraLite".parse().unwrap();
//! assert_eq!(kernel, DitherKernel::SierraLite);
//! assert_eq!(kernel.kernel().divisor, 4);
//! ```

mod kernel;

pub use kernel::*;

use std::fmt;
use std::str::FromStr;

use crate::api::ReformError;
use crate::color::PixelBuffer;
use crate::palette::QuantPalette;

/// Error diffusion kernel selection.
///
/// Names parse case-insensitively; `TwoSierra` is accepted as an alias of
/// [`DitherKernel::TwoRowSierra`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DitherKernel {
    /// Floyd-Steinberg, 4 neighbors, 100% propagation.
    FloydSteinberg,
    /// Right / below / below-right only, 100% propagation.
    FalseFloydSteinberg,
    /// Stucki, 12 neighbors over 3 rows.
    Stucki,
    /// Atkinson, 6 neighbors, 75% propagation.
    Atkinson,
    /// Jarvis-Judice-Ninke, 12 neighbors over 3 rows.
    Jarvis,
    /// Burkes, 7 neighbors over 2 rows.
    Burkes,
    /// Sierra-3, 10 neighbors over 3 rows.
    Sierra,
    /// Two-row Sierra, 7 neighbors.
    TwoRowSierra,
    /// Sierra Lite, 3 neighbors.
    SierraLite,
}

impl DitherKernel {
    /// Every kernel, in the order they are usually listed.
    pub const ALL: [DitherKernel; 9] = [
        DitherKernel::FloydSteinberg,
        DitherKernel::FalseFloydSteinberg,
        DitherKernel::Stucki,
        DitherKernel::Atkinson,
        DitherKernel::Jarvis,
        DitherKernel::Burkes,
        DitherKernel::Sierra,
        DitherKernel::TwoRowSierra,
        DitherKernel::SierraLite,
    ];

    /// The coefficient matrix for this kernel.
    pub fn kernel(self) -> &'static Kernel {
        match self {
            DitherKernel::FloydSteinberg => &FLOYD_STEINBERG,
            DitherKernel::FalseFloydSteinberg => &FALSE_FLOYD_STEINBERG,
            DitherKernel::Stucki => &STUCKI,
            DitherKernel::Atkinson => &ATKINSON,
            DitherKernel::Jarvis => &JARVIS,
            DitherKernel::Burkes => &BURKES,
            DitherKernel::Sierra => &SIERRA,
            DitherKernel::TwoRowSierra => &SIERRA_TWO_ROW,
            DitherKernel::SierraLite => &SIERRA_LITE,
        }
    }

    /// Canonical name, the inverse of [`FromStr`].
    pub fn name(self) -> &'static str {
        match self {
            DitherKernel::FloydSteinberg => "FloydSteinberg",
            DitherKernel::FalseFloydSteinberg => "FalseFloydSteinberg",
            DitherKernel::Stucki => "Stucki",
            DitherKernel::Atkinson => "Atkinson",
            DitherKernel::Jarvis => "Jarvis",
            DitherKernel::Burkes => "Burkes",
            DitherKernel::Sierra => "Sierra",
            DitherKernel::TwoRowSierra => "TwoRowSierra",
            DitherKernel::SierraLite => "SierraLite",
        }
    }

    /// Parse an optional kernel setting where `none`, `off` and the empty
    /// string mean "no dithering".
    ///
    /// # Errors
    ///
    /// [`ReformError::UnknownDitherKernel`] for unrecognized names.
    pub fn parse_optional(s: &str) -> Result<Option<Self>, ReformError> {
        let trimmed = s.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("none")
            || trimmed.eq_ignore_ascii_case("off")
        {
            return Ok(None);
        }
        trimmed.parse().map(Some)
    }
}

impl FromStr for DitherKernel {
    type Err = ReformError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .chars()
            .filter(|c| !matches!(c, '-' | '_' | ' '))
            .collect::<String>()
            .to_ascii_lowercase();

        match normalized.as_str() {
            "floydsteinberg" => Ok(DitherKernel::FloydSteinberg),
            "falsefloydsteinberg" => Ok(DitherKernel::FalseFloydSteinberg),
            "stucki" => Ok(DitherKernel::Stucki),
            "atkinson" => Ok(DitherKernel::Atkinson),
            "jarvis" | "jarvisjudiceninke" => Ok(DitherKernel::Jarvis),
            "burkes" => Ok(DitherKernel::Burkes),
            "sierra" => Ok(DitherKernel::Sierra),
            "tworowsierra" | "twosierra" => Ok(DitherKernel::TwoRowSierra),
            "sierralite" => Ok(DitherKernel::SierraLite),
            _ => Err(ReformError::UnknownDitherKernel(s.to_string())),
        }
    }
}

impl fmt::Display for DitherKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error buffer for efficient error diffusion.
///
/// Keeps only the rows the kernel can reach: `rows[0]` is the current row,
/// `rows[1]` the next one, and so on.
#[derive(Debug)]
pub(crate) struct ErrorBuffer {
    rows: Vec<Vec<[f32; 3]>>,
    width: usize,
}

impl ErrorBuffer {
    /// `row_depth` is the kernel's `max_dy + 1`.
    pub(crate) fn new(width: usize, row_depth: usize) -> Self {
        Self {
            rows: (0..row_depth).map(|_| vec![[0.0; 3]; width]).collect(),
            width,
        }
    }

    #[inline]
    pub(crate) fn get_accumulated(&self, x: usize) -> [f32; 3] {
        self.rows[0][x]
    }

    /// Add error to a pixel `row_offset` rows below the current one.
    /// Out-of-bounds targets are ignored.
    #[inline]
    pub(crate) fn add_error(&mut self, x: usize, row_offset: usize, error: [f32; 3]) {
        if x < self.width && row_offset < self.rows.len() {
            for c in 0..3 {
                self.rows[row_offset][x][c] += error[c];
            }
        }
    }

    /// Drop the finished row and append a zeroed one.
    pub(crate) fn advance_row(&mut self) {
        self.rows.rotate_left(1);
        if let Some(last) = self.rows.last_mut() {
            last.fill([0.0; 3]);
        }
    }
}

/// Dither `image` against `palette`, returning one palette index per pixel.
///
/// For each pixel in raster order: add the accumulated error, clamp each
/// channel to `0..=255`, pick the nearest palette entry, then spread
/// `working - chosen` over the kernel's neighbors that lie inside the image.
pub(crate) fn dither_with_kernel(
    image: &PixelBuffer,
    palette: &QuantPalette,
    kernel: &Kernel,
) -> Vec<u8> {
    let (width, height) = (image.width(), image.height());
    let mut output = Vec::with_capacity(width * height);
    let mut error_buf = ErrorBuffer::new(width, kernel.max_dy + 1);
    let divisor = kernel.divisor as f32;

    for y in 0..height {
        for x in 0..width {
            let original = image.rgb_at(x, y).to_f32();
            let accumulated = error_buf.get_accumulated(x);
            let pixel = [
                (original[0] + accumulated[0]).clamp(0.0, 255.0),
                (original[1] + accumulated[1]).clamp(0.0, 255.0),
                (original[2] + accumulated[2]).clamp(0.0, 255.0),
            ];

            let nearest_idx = palette.find_nearest_f32(pixel);
            output.push(nearest_idx as u8);

            let chosen = palette.color(nearest_idx).to_f32();
            let error = [
                pixel[0] - chosen[0],
                pixel[1] - chosen[1],
                pixel[2] - chosen[2],
            ];
            if error == [0.0; 3] {
                continue;
            }

            for &(dx, dy, weight) in kernel.entries {
                let nx = x as i32 + dx;
                if nx < 0 || nx as usize >= width || y + dy as usize >= height {
                    continue;
                }
                let share = weight as f32 / divisor;
                error_buf.add_error(
                    nx as usize,
                    dy as usize,
                    [error[0] * share, error[1] * share, error[2] * share],
                );
            }
        }

        error_buf.advance_row();
    }

    output
}
