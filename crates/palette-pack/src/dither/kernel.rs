//! Error diffusion kernel definitions.
//!
//! Each kernel lists which not-yet-visited neighbors of a pixel receive a
//! share of its quantization error during a left-to-right, top-to-bottom
//! scan, and how large that share is.

/// An error diffusion kernel.
///
/// Each entry is `(dx, dy, weight)`; the neighbor at `(x + dx, y + dy)`
/// receives `error * weight / divisor`. `dy` is never negative and entries
/// with `dy == 0` always have `dx > 0`, so error only flows forward.
///
/// # Error Propagation
///
/// The total error propagated is `sum(weights) / divisor`. All kernels here
/// propagate 100% except Atkinson, which propagates 75%.
///
/// # Buffer Sizing
///
/// `max_dy` is how many rows ahead the kernel reaches; the error buffer
/// keeps `max_dy + 1` rows.
#[derive(Debug, Clone, Copy)]
pub struct Kernel {
    /// (dx, dy, weight) entries.
    pub entries: &'static [(i32, i32, u8)],

    /// Divisor applied to every weight.
    pub divisor: u8,

    /// Largest `dy` among the entries.
    pub max_dy: usize,
}

/// Floyd-Steinberg (1976).
///
/// ```text
///        X   7
///    3   5   1      / 16
/// ```
pub const FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[(1, 0, 7), (-1, 1, 3), (0, 1, 5), (1, 1, 1)],
    divisor: 16,
    max_dy: 1,
};

/// "False" Floyd-Steinberg.
///
/// Reduced kernel touching only the right, below and below-right
/// neighbors.
///
/// ```text
///    X   3
///    3   2          / 8
/// ```
pub const FALSE_FLOYD_STEINBERG: Kernel = Kernel {
    entries: &[(1, 0, 3), (0, 1, 3), (1, 1, 2)],
    divisor: 8,
    max_dy: 1,
};

/// Stucki.
///
/// ```text
///            X   8   4
///    2   4   8   4   2
///    1   2   4   2   1      / 42
/// ```
pub const STUCKI: Kernel = Kernel {
    entries: &[
        (1, 0, 8),
        (2, 0, 4),
        (-2, 1, 2),
        (-1, 1, 4),
        (0, 1, 8),
        (1, 1, 4),
        (2, 1, 2),
        (-2, 2, 1),
        (-1, 2, 2),
        (0, 2, 4),
        (1, 2, 2),
        (2, 2, 1),
    ],
    divisor: 42,
    max_dy: 2,
};

/// Atkinson (Apple Macintosh).
///
/// Only 6/8 of the error is passed on; the rest is dropped, which keeps
/// highlights and shadows crisp with small palettes.
///
/// ```text
///        X   1   1
///    1   1   1
///        1              / 8
/// ```
pub const ATKINSON: Kernel = Kernel {
    entries: &[
        (1, 0, 1),
        (2, 0, 1),
        (-1, 1, 1),
        (0, 1, 1),
        (1, 1, 1),
        (0, 2, 1),
    ],
    divisor: 8,
    max_dy: 2,
};

/// Jarvis, Judice and Ninke.
///
/// ```text
///            X   7   5
///    3   5   7   5   3
///    1   3   5   3   1      / 48
/// ```
pub const JARVIS: Kernel = Kernel {
    entries: &[
        (1, 0, 7),
        (2, 0, 5),
        (-2, 1, 3),
        (-1, 1, 5),
        (0, 1, 7),
        (1, 1, 5),
        (2, 1, 3),
        (-2, 2, 1),
        (-1, 2, 3),
        (0, 2, 5),
        (1, 2, 3),
        (2, 2, 1),
    ],
    divisor: 48,
    max_dy: 2,
};

/// Burkes: Stucki's first two rows.
///
/// ```text
///            X   8   4
///    2   4   8   4   2      / 32
/// ```
pub const BURKES: Kernel = Kernel {
    entries: &[
        (1, 0, 8),
        (2, 0, 4),
        (-2, 1, 2),
        (-1, 1, 4),
        (0, 1, 8),
        (1, 1, 4),
        (2, 1, 2),
    ],
    divisor: 32,
    max_dy: 1,
};

/// Sierra (Sierra-3).
///
/// ```text
///            X   5   3
///    2   4   5   4   2
///        2   3   2          / 32
/// ```
pub const SIERRA: Kernel = Kernel {
    entries: &[
        (1, 0, 5),
        (2, 0, 3),
        (-2, 1, 2),
        (-1, 1, 4),
        (0, 1, 5),
        (1, 1, 4),
        (2, 1, 2),
        (-1, 2, 2),
        (0, 2, 3),
        (1, 2, 2),
    ],
    divisor: 32,
    max_dy: 2,
};

/// Two-row Sierra.
///
/// ```text
///            X   4   3
///    1   2   3   2   1      / 16
/// ```
pub const SIERRA_TWO_ROW: Kernel = Kernel {
    entries: &[
        (1, 0, 4),
        (2, 0, 3),
        (-2, 1, 1),
        (-1, 1, 2),
        (0, 1, 3),
        (1, 1, 2),
        (2, 1, 1),
    ],
    divisor: 16,
    max_dy: 1,
};

/// Sierra Lite.
///
/// ```text
///    X   2
///    1   1              / 4
/// ```
pub const SIERRA_LITE: Kernel = Kernel {
    entries: &[(1, 0, 2), (-1, 1, 1), (0, 1, 1)],
    divisor: 4,
    max_dy: 1,
};
