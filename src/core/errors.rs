/// Everything that can go wrong while setting up or writing a render.
///
/// Numerical trouble inside the Newton iteration (vanishing derivative,
/// overflow to infinity or NaN) is not in here: those points are simply
/// reported as non-convergent.
#[derive(Debug, thiserror::Error)]
pub enum NewtonFractalError {
    #[error("image resolution must be positive in both dimensions, got {width}x{height}")]
    InvalidResolution { width: usize, height: usize },

    #[error("grid bound must be finite and positive, got {0}")]
    InvalidBound(f64),

    #[error("grid has {expected} cells but {actual} points were supplied")]
    PointCountMismatch { expected: usize, actual: usize },

    #[error("convergence tolerance must be finite and positive, got {0}")]
    InvalidTolerance(f64),

    #[error("at most {max} roots are supported, got {actual}")]
    TooManyRoots { max: usize, actual: usize },

    #[error("palette has {actual} root colors, but the function has {expected} roots")]
    PaletteSizeMismatch { expected: usize, actual: usize },

    #[error("palette color {index} has a component outside of [0, 1]: {rgb:?}")]
    PaletteComponentOutOfRange { index: usize, rgb: [f32; 3] },

    #[error("shading exponents must be finite and positive, got depth = {depth_exponent}, gamma = {gamma}")]
    InvalidShading { depth_exponent: f64, gamma: f64 },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Image(#[from] image::ImageError),

    #[error(transparent)]
    Bincode(#[from] bincode::Error),
}

pub type Result<T> = std::result::Result<T, NewtonFractalError>;
