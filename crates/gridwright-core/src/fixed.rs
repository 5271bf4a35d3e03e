use fixed::types::I32F32;

/// Q32.32 fixed-point: 32 integer bits, 32 fractional bits.
///
/// Energy (kWh), prices, income and fuel amounts all use this type so that
/// repeated resolutions of the same snapshot are bit-identical.
pub type Fixed64 = I32F32;

/// Convert an f64 to Fixed64. Use only for initialization, never in the resolver.
#[inline]
pub fn f64_to_fixed64(v: f64) -> Fixed64 {
    Fixed64::from_num(v)
}

/// Convert Fixed64 to f64. Use only for display, never in the resolver.
#[inline]
pub fn fixed64_to_f64(v: Fixed64) -> f64 {
    v.to_num::<f64>()
}

/// Whole kWh as Fixed64.
#[inline]
pub fn kwh(v: u32) -> Fixed64 {
    Fixed64::from_num(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixed64_basic_arithmetic() {
        let a = f64_to_fixed64(1.5);
        let b = f64_to_fixed64(2.0);
        assert_eq!(fixed64_to_f64(a + b), 3.5);
    }

    #[test]
    fn fixed64_price_times_energy() {
        let income = kwh(10) * f64_to_fixed64(0.1);
        assert!((fixed64_to_f64(income) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn fixed64_determinism() {
        let a = f64_to_fixed64(1.0 / 3.0);
        let b = f64_to_fixed64(1.0 / 3.0);
        assert_eq!(a, b);
        assert_eq!(a * kwh(3), b * kwh(3));
    }

    #[test]
    fn fixed64_floor_at_zero() {
        let remaining = f64_to_fixed64(0.5) - f64_to_fixed64(2.0);
        assert_eq!(remaining.max(Fixed64::ZERO), Fixed64::ZERO);
    }
}
