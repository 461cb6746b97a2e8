//! sRGB <-> CIE L*a*b* conversion (D65, 2° observer).
//!
//! The forward path linearises sRGB, maps linear RGB to XYZ with the D65
//! matrix, normalises by the reference white and applies the CIE f(t)
//! companding. The inverse runs the algebraic inverse of every stage in
//! reverse order, so `lab_to_rgb(rgb_to_lab(c)) == c` for every 8-bit colour;
//! the only loss is the final rounding back to integers.

use super::{Lab, Rgb};

/// D65 reference white (X, Y, Z).
const WHITE_D65: [f64; 3] = [0.95047, 1.0, 1.08883];

/// Linear sRGB -> XYZ (D65).
const RGB_TO_XYZ: [[f64; 3]; 3] = [
    [0.4124564, 0.3575761, 0.1804375],
    [0.2126729, 0.7151522, 0.0721750],
    [0.0193339, 0.1191920, 0.9503041],
];

/// Exact inverse of `RGB_TO_XYZ`.
const XYZ_TO_RGB: [[f64; 3]; 3] = [
    [3.2404548360214083, -1.5371388501025751, -0.4985315468684809],
    [-0.9692663898756537, 1.8760109288424913, 0.041556082346673524],
    [0.05564341960421366, -0.20402585426769815, 1.0572251624579287],
];

const SRGB_KNEE: f64 = 0.04045;
const SRGB_LINEAR_KNEE: f64 = SRGB_KNEE / 12.92;
const CIE_EPSILON: f64 = 0.008856;
const CIE_KAPPA: f64 = 7.787;
const CIE_OFFSET: f64 = 16.0 / 116.0;

/// Converts an 8-bit sRGB colour to CIE L*a*b*.
pub fn rgb_to_lab(rgb: Rgb) -> Lab {
    let linear = [
        srgb_to_linear(rgb.r),
        srgb_to_linear(rgb.g),
        srgb_to_linear(rgb.b),
    ];
    let xyz = mat_mul(&RGB_TO_XYZ, linear);
    let fx = lab_f(xyz[0] / WHITE_D65[0]);
    let fy = lab_f(xyz[1] / WHITE_D65[1]);
    let fz = lab_f(xyz[2] / WHITE_D65[2]);
    Lab {
        l: 116.0 * fy - 16.0,
        a: 500.0 * (fx - fy),
        b: 200.0 * (fy - fz),
    }
}

/// Converts a CIE L*a*b* colour to 8-bit sRGB, rounding to the nearest
/// integer and clamping out-of-gamut channels to `[0, 255]`.
pub fn lab_to_rgb(lab: Lab) -> Rgb {
    let fy = (lab.l + 16.0) / 116.0;
    let fx = fy + lab.a / 500.0;
    let fz = fy - lab.b / 200.0;
    let xyz = [
        lab_f_inv(fx) * WHITE_D65[0],
        lab_f_inv(fy) * WHITE_D65[1],
        lab_f_inv(fz) * WHITE_D65[2],
    ];
    let linear = mat_mul(&XYZ_TO_RGB, xyz);
    Rgb {
        r: linear_to_srgb(linear[0]),
        g: linear_to_srgb(linear[1]),
        b: linear_to_srgb(linear[2]),
    }
}

#[inline]
fn srgb_to_linear(channel: u8) -> f64 {
    let v = f64::from(channel) / 255.0;
    if v > SRGB_KNEE {
        ((v + 0.055) / 1.055).powf(2.4)
    } else {
        v / 12.92
    }
}

#[inline]
fn linear_to_srgb(linear: f64) -> u8 {
    let v = if linear > SRGB_LINEAR_KNEE {
        1.055 * linear.powf(1.0 / 2.4) - 0.055
    } else {
        12.92 * linear
    };
    let scaled = (v * 255.0).round();
    // NaN maps to 0 through the saturating cast.
    scaled.clamp(0.0, 255.0) as u8
}

#[inline]
fn lab_f(t: f64) -> f64 {
    if t > CIE_EPSILON {
        t.cbrt()
    } else {
        CIE_KAPPA * t + CIE_OFFSET
    }
}

#[inline]
fn lab_f_inv(f: f64) -> f64 {
    let cube = f * f * f;
    if cube > CIE_EPSILON {
        cube
    } else {
        (f - CIE_OFFSET) / CIE_KAPPA
    }
}

#[inline]
fn mat_mul(m: &[[f64; 3]; 3], v: [f64; 3]) -> [f64; 3] {
    [
        m[0][0] * v[0] + m[0][1] * v[1] + m[0][2] * v[2],
        m[1][0] * v[0] + m[1][1] * v[1] + m[1][2] * v[2],
        m[2][0] * v[0] + m[2][1] * v[1] + m[2][2] * v[2],
    ]
}
