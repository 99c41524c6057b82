//! Simulated live occupancy for the station gauge.
//!
//! The load factor is a fixed step function of the hour of day. The caller
//! supplies the hour (usually from the local wall clock) so the rules stay
//! testable.

use rand::Rng;

use crate::domain::{LiveReading, LoadLevel};

/// Passengers per minute for each percentage point of occupancy.
pub const PAX_PER_LOAD_POINT: u32 = 45;

/// Half-open jitter range (in percentage points) applied to the gauge.
const JITTER: std::ops::Range<i32> = -5..5;

/// Fractional occupancy for an hour of the day (0-23).
///
/// Morning (8-9h) and evening (17-19h) peaks run near capacity, office hours
/// at 60%, everything else at 20%.
pub fn load_factor(hour: u32) -> f64 {
    match hour {
        8..=9 | 17..=19 => 0.95,
        10..=16 => 0.60,
        _ => 0.20,
    }
}

/// One jittered gauge reading for `hour`.
pub fn live_reading<R: Rng + ?Sized>(hour: u32, rng: &mut R) -> LiveReading {
    let factor = load_factor(hour);
    let jitter = rng.gen_range(JITTER);
    let pct = ((factor * 100.0).round() as i32 + jitter).clamp(0, 100) as u8;

    LiveReading {
        hour,
        load_factor: factor,
        load_pct: pct,
        pax_per_minute: u32::from(pct) * PAX_PER_LOAD_POINT,
        level: LoadLevel::from_pct(pct),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn load_factor_bands() {
        for hour in [8, 9, 17, 18, 19] {
            assert_eq!(load_factor(hour), 0.95, "hour {hour}");
        }
        for hour in 10..=16 {
            assert_eq!(load_factor(hour), 0.60, "hour {hour}");
        }
        for hour in [0, 1, 5, 7, 20, 23] {
            assert_eq!(load_factor(hour), 0.20, "hour {hour}");
        }
    }

    #[test]
    fn readings_stay_within_jitter_of_the_band() {
        let mut rng = StdRng::seed_from_u64(11);
        for hour in 0..24 {
            for _ in 0..50 {
                let r = live_reading(hour, &mut rng);
                let base = (load_factor(hour) * 100.0).round() as i32;
                let pct = i32::from(r.load_pct);
                assert!(pct >= base - 5 && pct < base + 5, "hour {hour}: {pct}");
                assert!(r.load_pct <= 100);
                assert_eq!(r.pax_per_minute, u32::from(r.load_pct) * 45);
                assert_eq!(r.level, LoadLevel::from_pct(r.load_pct));
            }
        }
    }

    #[test]
    fn peak_hours_read_as_saturation() {
        let mut rng = StdRng::seed_from_u64(5);
        let r = live_reading(8, &mut rng);
        assert_eq!(r.level, LoadLevel::Saturation);
        let r = live_reading(3, &mut rng);
        assert_eq!(r.level, LoadLevel::Nominal);
    }
}
