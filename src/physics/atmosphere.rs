// ---------------------------------------------------------------------------
// Piecewise-exponential atmosphere (sea level to 1000+ km)
// ---------------------------------------------------------------------------

/// (base altitude m, nominal density kg/m^3, scale height m)
///
/// Standard exponential-strata fit; adequate for drag at orbital altitudes
/// where the density enters the force model linearly.
const STRATA: &[(f64, f64, f64)] = &[
    (0.0, 1.225, 7_249.0),
    (25_000.0, 3.899e-2, 6_349.0),
    (30_000.0, 1.774e-2, 6_682.0),
    (40_000.0, 3.972e-3, 7_554.0),
    (50_000.0, 1.057e-3, 8_382.0),
    (60_000.0, 3.206e-4, 7_714.0),
    (70_000.0, 8.770e-5, 6_549.0),
    (80_000.0, 1.905e-5, 5_799.0),
    (90_000.0, 3.396e-6, 5_382.0),
    (100_000.0, 5.297e-7, 5_877.0),
    (110_000.0, 9.661e-8, 7_263.0),
    (120_000.0, 2.438e-8, 9_473.0),
    (130_000.0, 8.484e-9, 12_636.0),
    (140_000.0, 3.845e-9, 16_149.0),
    (150_000.0, 2.070e-9, 22_523.0),
    (180_000.0, 5.464e-10, 29_740.0),
    (200_000.0, 2.789e-10, 37_105.0),
    (250_000.0, 7.248e-11, 45_546.0),
    (300_000.0, 2.418e-11, 53_628.0),
    (350_000.0, 9.518e-12, 53_298.0),
    (400_000.0, 3.725e-12, 58_515.0),
    (450_000.0, 1.585e-12, 60_828.0),
    (500_000.0, 6.967e-13, 63_822.0),
    (600_000.0, 1.454e-13, 71_835.0),
    (700_000.0, 3.614e-14, 88_667.0),
    (800_000.0, 1.170e-14, 124_640.0),
    (900_000.0, 5.245e-15, 181_050.0),
    (1_000_000.0, 3.019e-15, 268_000.0),
];

/// Atmospheric mass density at a geometric altitude, kg/m^3.
///
/// Negative altitudes clamp to sea level; above the last stratum the final
/// scale height keeps the profile decaying smoothly.
pub fn density(altitude_m: f64) -> f64 {
    let h = altitude_m.max(0.0);
    let (base, rho0, scale) = STRATA
        .iter()
        .rev()
        .find(|(base, _, _)| h >= *base)
        .copied()
        .unwrap_or(STRATA[0]);
    rho0 * (-(h - base) / scale).exp()
}
