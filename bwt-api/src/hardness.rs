//! Water hardness and blending calculations
//!
//! The softener reports hardness in German degrees (°dH) and all of its
//! volume counters in liters of *treated* water. What comes out of the
//! tap is blended water: fully softened water mixed with enough raw water
//! to reach the configured outlet hardness. The conversions here turn
//! treated volumes into the blended volumes a household actually sees.

use serde::{Deserialize, Serialize};

/// Water hardness in German degrees (°dH)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hardness(f64);

impl Hardness {
    /// Create a hardness value from German degrees
    pub fn from_dh(value: f64) -> Self {
        Self(value)
    }

    /// Hardness in German degrees (°dH)
    pub fn dh(&self) -> f64 {
        self.0
    }

    /// Hardness in French degrees (°fH)
    pub fn fh(&self) -> f64 {
        self.0 * 1.78
    }

    /// Hardness as parts per million CaCO3
    pub fn ppm_caco3(&self) -> f64 {
        self.0 * 17.85
    }
}

/// Convert a treated-water volume to the corresponding blended output
///
/// Mass balance over the blending valve: blended water at `out_hardness`
/// is treated water (0 °dH) plus raw water at `in_hardness`, so
/// `blended = treated * in / (in - out)`.
///
/// Degenerate hardness configurations (outlet not softer than inlet)
/// fall back to the treated volume itself.
pub fn treated_to_blended(treated_l: u64, in_hardness: Hardness, out_hardness: Hardness) -> f64 {
    let delta = in_hardness.dh() - out_hardness.dh();
    if delta <= 0.0 {
        return treated_l as f64;
    }
    treated_l as f64 * in_hardness.dh() / delta
}

/// Convert a raw column capacity to liters of blended water
///
/// The device reports remaining exchange capacity per column in
/// milli-°dH·liters; dividing by the hardness removed per liter gives
/// how much more blended water the column can deliver before it needs
/// to regenerate.
pub fn blended_capacity(raw_mdh_l: f64, in_hardness: Hardness, out_hardness: Hardness) -> f64 {
    let delta = in_hardness.dh() - out_hardness.dh();
    if delta <= 0.0 {
        return 0.0;
    }
    raw_mdh_l / (delta * 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hardness_conversions() {
        let hardness = Hardness::from_dh(10.0);
        assert_eq!(hardness.dh(), 10.0);
        assert!((hardness.fh() - 17.8).abs() < 1e-9);
        assert!((hardness.ppm_caco3() - 178.5).abs() < 1e-9);
    }

    #[test]
    fn test_treated_to_blended() {
        // 20 °dH in, 5 °dH out: every liter of blended water is 3/4 treated.
        let blended = treated_to_blended(300, Hardness::from_dh(20.0), Hardness::from_dh(5.0));
        assert!((blended - 400.0).abs() < 1e-9);
    }

    #[test]
    fn test_treated_to_blended_degenerate_hardness() {
        // Outlet as hard as inlet: no blending is happening.
        let blended = treated_to_blended(250, Hardness::from_dh(10.0), Hardness::from_dh(10.0));
        assert_eq!(blended, 250.0);
    }

    #[test]
    fn test_blended_capacity() {
        let capacity = blended_capacity(3_000_000.0, Hardness::from_dh(20.0), Hardness::from_dh(5.0));
        assert!((capacity - 200.0).abs() < 1e-9);
    }

    #[test]
    fn test_blended_capacity_degenerate_hardness() {
        let capacity = blended_capacity(3_000_000.0, Hardness::from_dh(5.0), Hardness::from_dh(5.0));
        assert_eq!(capacity, 0.0);
    }
}
