//! Affine panel calibration
//!
//! Raw panel readings are mapped to millimetres with an affine transform
//! fitted by least squares to a handful of touched reference points:
//!
//! ```text
//! [x_mm y_mm] = [raw_x raw_y 1] · B        B is 3×2
//! ```
//!
//! `B` is stored row-major as six coefficients `[b0 .. b5]`:
//!
//! ```text
//! x_mm = b0·raw_x + b2·raw_y + b4
//! y_mm = b1·raw_x + b3·raw_y + b5
//! ```

use crate::readings::Position;

/// Relative determinant below which the fit is rejected
const DEGENERATE_EPSILON: f64 = 1.0e-9;

/// Fitted raw-to-millimetre transform
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Beta {
    coefficients: [f32; 6],
}

impl Beta {
    /// Transform that passes raw readings through unchanged
    pub const IDENTITY: Beta = Beta {
        coefficients: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
    };

    pub const fn from_coefficients(coefficients: [f32; 6]) -> Self {
        Self { coefficients }
    }

    pub const fn coefficients(&self) -> [f32; 6] {
        self.coefficients
    }

    /// Map a raw (filtered) reading to millimetres
    pub fn apply(&self, raw_x: f32, raw_y: f32) -> Position {
        let [b0, b1, b2, b3, b4, b5] = self.coefficients;
        Position::new(b0 * raw_x + b2 * raw_y + b4, b1 * raw_x + b3 * raw_y + b5)
    }
}

impl Default for Beta {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Raw panel reading captured for one reference point
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RawPoint {
    pub x: f32,
    pub y: f32,
}

/// Calibration fit failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CalibrationError {
    /// Fewer than three points, or raw and target counts differ
    TooFewPoints,
    /// Raw points are (nearly) collinear or coincident
    Degenerate,
}

/// Fit `B` so that `apply(raw[i]) ≈ targets[i]` in the least-squares sense
///
/// The sums are centred on the raw mean and accumulated in `f64`, which
/// keeps the 2×2 slope system well conditioned for 12-bit ADC readings.
pub fn solve(raw: &[RawPoint], targets: &[Position]) -> Result<Beta, CalibrationError> {
    if raw.len() < 3 || raw.len() != targets.len() {
        return Err(CalibrationError::TooFewPoints);
    }

    let n = raw.len() as f64;
    let (mut mx, mut my, mut mtx, mut mty) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
    for (p, t) in raw.iter().zip(targets) {
        mx += p.x as f64;
        my += p.y as f64;
        mtx += t.x_mm as f64;
        mty += t.y_mm as f64;
    }
    mx /= n;
    my /= n;
    mtx /= n;
    mty /= n;

    let (mut sxx, mut sxy, mut syy) = (0.0f64, 0.0f64, 0.0f64);
    let (mut sx_tx, mut sy_tx, mut sx_ty, mut sy_ty) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);

    for (p, t) in raw.iter().zip(targets) {
        let dx = p.x as f64 - mx;
        let dy = p.y as f64 - my;
        let tx = t.x_mm as f64 - mtx;
        let ty = t.y_mm as f64 - mty;

        sxx += dx * dx;
        sxy += dx * dy;
        syy += dy * dy;
        sx_tx += dx * tx;
        sy_tx += dy * tx;
        sx_ty += dx * ty;
        sy_ty += dy * ty;
    }

    let det = sxx * syy - sxy * sxy;
    if !(det > DEGENERATE_EPSILON * sxx * syy) {
        return Err(CalibrationError::Degenerate);
    }

    // Slopes for each output column by Cramer's rule
    let b0 = (sx_tx * syy - sy_tx * sxy) / det;
    let b2 = (sy_tx * sxx - sx_tx * sxy) / det;
    let b1 = (sx_ty * syy - sy_ty * sxy) / det;
    let b3 = (sy_ty * sxx - sx_ty * sxy) / det;
    let b4 = mtx - b0 * mx - b2 * my;
    let b5 = mty - b1 * mx - b3 * my;

    let coefficients = [b0, b1, b2, b3, b4, b5].map(|c| c as f32);
    if coefficients.iter().any(|c| !c.is_finite()) {
        return Err(CalibrationError::Degenerate);
    }

    Ok(Beta::from_coefficients(coefficients))
}
