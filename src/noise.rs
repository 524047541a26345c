//! Gradient lattice noise at 1-4 input dimensions.
//!
//! All four functions are pure and total: the same coordinates always give
//! the same value, every output lies in [-1, 1], and integer lattice points
//! are exact zero crossings. Gradients are hashed through Ken Perlin's
//! reference permutation table.

/// Ken Perlin's reference permutation, a fixed shuffle of 0..=255.
const PERMUTATION: [u8; 256] = [
    151, 160, 137, 91,  90,  15,  131, 13,  201, 95,  96,  53,  194, 233, 7,   225,
    140, 36,  103, 30,  69,  142, 8,   99,  37,  240, 21,  10,  23,  190, 6,   148,
    247, 120, 234, 75,  0,   26,  197, 62,  94,  252, 219, 203, 117, 35,  11,  32,
    57,  177, 33,  88,  237, 149, 56,  87,  174, 20,  125, 136, 171, 168, 68,  175,
    74,  165, 71,  134, 139, 48,  27,  166, 77,  146, 158, 231, 83,  111, 229, 122,
    60,  211, 133, 230, 220, 105, 92,  41,  55,  46,  245, 40,  244, 102, 143, 54,
    65,  25,  63,  161, 1,   216, 80,  73,  209, 76,  132, 187, 208, 89,  18,  169,
    200, 196, 135, 130, 116, 188, 159, 86,  164, 100, 109, 198, 173, 186, 3,   64,
    52,  217, 226, 250, 124, 123, 5,   202, 38,  147, 118, 126, 255, 82,  85,  212,
    207, 206, 59,  227, 47,  16,  58,  17,  182, 189, 28,  42,  223, 183, 170, 213,
    119, 248, 152, 2,   44,  154, 163, 70,  221, 153, 101, 155, 167, 43,  172, 9,
    129, 22,  39,  253, 19,  98,  108, 110, 79,  113, 224, 232, 178, 185, 112, 104,
    218, 246, 97,  228, 251, 34,  242, 193, 238, 210, 144, 12,  191, 179, 162, 241,
    81,  51,  145, 235, 249, 14,  239, 107, 49,  192, 214, 31,  181, 199, 106, 157,
    184, 84,  204, 176, 115, 121, 50,  45,  127, 4,   150, 254, 138, 236, 205, 93,
    222, 114, 67,  29,  24,  72,  243, 141, 128, 195, 78,  66,  215, 61,  156, 180,
];

// Doubled so chained lookups like `P[P[xi] as usize + yi + 1]` never need a
// wrap check: the largest reachable index is 255 + 255 + 1 = 511.
const P: [u8; 512] = double(PERMUTATION);

const fn double(base: [u8; 256]) -> [u8; 512] {
    let mut out = [0u8; 512];
    let mut i = 0;
    while i < 512 {
        out[i] = base[i & 255];
        i += 1;
    }
    out
}

/// Splits a coordinate into its lattice cell (wrapped modulo 256, so
/// negative coordinates hash the same way the table expects) and the
/// fractional offset into that cell.
#[inline]
fn lattice(v: f64) -> (usize, f64) {
    let floor = v.floor();
    (((floor as i64) & 255) as usize, v - floor)
}

/// Quintic fade, C2-continuous at the cell boundaries.
fn fade(t: f64) -> f64 {
    t * t * t * (t * (6.0 * t - 15.0) + 10.0)
}

fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

fn grad1(h: u8, x: f64) -> f64 {
    if h & 1 == 0 {
        x
    } else {
        -x
    }
}

fn grad2(h: u8, x: f64, y: f64) -> f64 {
    match h & 7 {
        0 => x + y,
        1 => x - y,
        2 => -x + y,
        3 => -x - y,
        4 => x,
        5 => -x,
        6 => y,
        _ => -y,
    }
}

// 12 edge-diagonal directions, with the 4 spare hash values folded back
// onto existing directions per Perlin's improved-noise paper.
fn grad3(h: u8, x: f64, y: f64, z: f64) -> f64 {
    match h & 15 {
        0 | 12 => x + y,
        1 | 14 => y - x,
        2 => x - y,
        3 => -x - y,
        4 => x + z,
        5 => z - x,
        6 => x - z,
        7 => -x - z,
        8 => y + z,
        9 | 13 => z - y,
        10 => y - z,
        11 | 15 => -y - z,
        _ => unreachable!(),
    }
}

// 32 directions: pick three of the four axes, then a sign per axis.
fn grad4(h: u8, x: f64, y: f64, z: f64, w: f64) -> f64 {
    let (a, b, c) = match (h >> 3) & 3 {
        0 => (x, y, z),
        1 => (w, x, y),
        2 => (z, w, x),
        _ => (y, z, w),
    };
    (if h & 4 == 0 { a } else { -a })
        + (if h & 2 == 0 { b } else { -b })
        + (if h & 1 == 0 { c } else { -c })
}

pub fn noise1(x: f64) -> f64 {
    let (xi, xf) = lattice(x);
    let u = fade(xf);

    lerp(
        u,
        grad1(P[xi], xf),
        grad1(P[xi + 1], xf - 1.0),
    )
}

pub fn noise2(x: f64, y: f64) -> f64 {
    let (xi, xf) = lattice(x);
    let (yi, yf) = lattice(y);
    let u = fade(xf);
    let v = fade(yf);

    let a = P[xi] as usize + yi;
    let b = P[xi + 1] as usize + yi;

    lerp(
        v,
        lerp(
            u,
            grad2(P[a], xf, yf),
            grad2(P[b], xf - 1.0, yf),
        ),
        lerp(
            u,
            grad2(P[a + 1], xf, yf - 1.0),
            grad2(P[b + 1], xf - 1.0, yf - 1.0),
        ),
    )
}

pub fn noise3(x: f64, y: f64, z: f64) -> f64 {
    let (xi, xf) = lattice(x);
    let (yi, yf) = lattice(y);
    let (zi, zf) = lattice(z);
    let u = fade(xf);
    let v = fade(yf);
    let w = fade(zf);

    // Hash coordinates of the 8 cube corners
    let a = P[xi] as usize + yi;
    let b = P[xi + 1] as usize + yi;
    let aa = P[a] as usize + zi;
    let ab = P[a + 1] as usize + zi;
    let ba = P[b] as usize + zi;
    let bb = P[b + 1] as usize + zi;

    lerp(
        w,
        lerp(
            v,
            lerp(
                u,
                grad3(P[aa], xf, yf, zf),
                grad3(P[ba], xf - 1.0, yf, zf),
            ),
            lerp(
                u,
                grad3(P[ab], xf, yf - 1.0, zf),
                grad3(P[bb], xf - 1.0, yf - 1.0, zf),
            ),
        ),
        lerp(
            v,
            lerp(
                u,
                grad3(P[aa + 1], xf, yf, zf - 1.0),
                grad3(P[ba + 1], xf - 1.0, yf, zf - 1.0),
            ),
            lerp(
                u,
                grad3(P[ab + 1], xf, yf - 1.0, zf - 1.0),
                grad3(P[bb + 1], xf - 1.0, yf - 1.0, zf - 1.0),
            ),
        ),
    )
}

pub fn noise4(x: f64, y: f64, z: f64, w: f64) -> f64 {
    let (xi, xf) = lattice(x);
    let (yi, yf) = lattice(y);
    let (zi, zf) = lattice(z);
    let (wi, wf) = lattice(w);
    let u = fade(xf);
    let v = fade(yf);
    let s = fade(zf);
    let t = fade(wf);

    // Hash coordinates of the 16 tesseract corners; the final +0/+1 on each
    // index selects the w side.
    let a = P[xi] as usize + yi;
    let b = P[xi + 1] as usize + yi;
    let aa = P[a] as usize + zi;
    let ab = P[a + 1] as usize + zi;
    let ba = P[b] as usize + zi;
    let bb = P[b + 1] as usize + zi;
    let aaa = P[aa] as usize + wi;
    let aab = P[aa + 1] as usize + wi;
    let aba = P[ab] as usize + wi;
    let abb = P[ab + 1] as usize + wi;
    let baa = P[ba] as usize + wi;
    let bab = P[ba + 1] as usize + wi;
    let bba = P[bb] as usize + wi;
    let bbb = P[bb + 1] as usize + wi;

    lerp(
        t,
        lerp(
            s,
            lerp(
                v,
                lerp(
                    u,
                    grad4(P[aaa], xf, yf, zf, wf),
                    grad4(P[baa], xf - 1.0, yf, zf, wf),
                ),
                lerp(
                    u,
                    grad4(P[aba], xf, yf - 1.0, zf, wf),
                    grad4(P[bba], xf - 1.0, yf - 1.0, zf, wf),
                ),
            ),
            lerp(
                v,
                lerp(
                    u,
                    grad4(P[aab], xf, yf, zf - 1.0, wf),
                    grad4(P[bab], xf - 1.0, yf, zf - 1.0, wf),
                ),
                lerp(
                    u,
                    grad4(P[abb], xf, yf - 1.0, zf - 1.0, wf),
                    grad4(P[bbb], xf - 1.0, yf - 1.0, zf - 1.0, wf),
                ),
            ),
        ),
        lerp(
            s,
            lerp(
                v,
                lerp(
                    u,
                    grad4(P[aaa + 1], xf, yf, zf, wf - 1.0),
                    grad4(P[baa + 1], xf - 1.0, yf, zf, wf - 1.0),
                ),
                lerp(
                    u,
                    grad4(P[aba + 1], xf, yf - 1.0, zf, wf - 1.0),
                    grad4(P[bba + 1], xf - 1.0, yf - 1.0, zf, wf - 1.0),
                ),
            ),
            lerp(
                v,
                lerp(
                    u,
                    grad4(P[aab + 1], xf, yf, zf - 1.0, wf - 1.0),
                    grad4(P[bab + 1], xf - 1.0, yf, zf - 1.0, wf - 1.0),
                ),
                lerp(
                    u,
                    grad4(P[abb + 1], xf, yf - 1.0, zf - 1.0, wf - 1.0),
                    grad4(P[bbb + 1], xf - 1.0, yf - 1.0, zf - 1.0, wf - 1.0),
                ),
            ),
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn doubled_table_repeats_base() {
        for i in 0..512 {
            assert_eq!(P[i], PERMUTATION[i & 255]);
        }
    }

    #[test]
    fn lattice_points_are_zero_crossings() {
        for i in -8i32..=8 {
            let f = i as f64;
            assert_eq!(noise1(f), 0.0, "noise1({f})");
            assert_eq!(noise2(f, f + 3.0), 0.0, "noise2 at ({f}, {})", f + 3.0);
            assert_eq!(noise3(f, -f, f + 1.0), 0.0, "noise3 at {f}");
            assert_eq!(noise4(f, f + 2.0, -f, f - 5.0), 0.0, "noise4 at {f}");
        }
    }

    #[test]
    fn output_stays_within_unit_range() {
        let step = 0.137;
        for i in 0..60 {
            for j in 0..60 {
                let x = -4.0 + i as f64 * step;
                let y = -4.0 + j as f64 * step;
                for v in [
                    noise1(x),
                    noise2(x, y),
                    noise3(x, y, x * 0.7 - y),
                    noise4(x, y, x - y, 0.3 * (x + y)),
                ] {
                    assert!((-1.0..=1.0).contains(&v), "value {v} at ({x}, {y})");
                }
            }
        }
    }

    #[test]
    fn continuous_across_cell_boundaries() {
        // Step over integer lattice lines in tiny increments; the jump per
        // step must stay proportional to the step size.
        let eps = 1e-3;
        for i in 0..40 {
            let x = 0.98 + i as f64 * eps;
            assert!((noise1(x + eps) - noise1(x)).abs() < 0.01);
            assert!((noise2(x + eps, 2.4) - noise2(x, 2.4)).abs() < 0.01);
            assert!((noise3(x + eps, 2.4, -1.3) - noise3(x, 2.4, -1.3)).abs() < 0.01);
            assert!(
                (noise4(x + eps, 2.4, -1.3, 0.7) - noise4(x, 2.4, -1.3, 0.7)).abs() < 0.01
            );
        }
    }

    #[test]
    fn deterministic_for_identical_inputs() {
        assert_eq!(noise3(3.14, 2.71, 1.41), noise3(3.14, 2.71, 1.41));
        assert_eq!(
            noise4(-3.14, 2.71, 1.41, 0.577),
            noise4(-3.14, 2.71, 1.41, 0.577)
        );
    }

    #[test]
    fn negative_coordinates_are_well_defined() {
        for v in [
            noise1(-123.456),
            noise2(-55.5, -0.25),
            noise3(-1.5, -200.75, -3.125),
            noise4(-1.5, -2.5, -3.5, -4.5),
        ] {
            assert!((-1.0..=1.0).contains(&v));
        }
    }
}
