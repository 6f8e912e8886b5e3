/// Difficulty ramp: enemy speed factor for a player at `x`.
///
/// Grows linearly from 1 at the origin and is capped at `max`.
pub fn speed_multiplier(x: f32, ramp_distance: f32, max: f32) -> f32 {
    if ramp_distance <= 0.0 {
        return max.max(1.0);
    }
    (1.0 + x.max(0.0) / ramp_distance).min(max.max(1.0))
}

/// Score lost on death: `amount` per full `step` of distance travelled.
pub fn death_penalty(x: f32, step: f32, amount: u32) -> u32 {
    if step <= 0.0 || x <= 0.0 {
        return 0;
    }
    (x / step).floor() as u32 * amount
}

/// Bonus for the `combo`-th consecutive defeat (1-based). The first hit
/// earns no bonus.
pub fn combo_bonus(combo: u32, step: u32) -> u32 {
    combo.saturating_sub(1) * step
}

/// Distance shown in summaries.
pub fn distance(x: f32) -> u32 {
    x.max(0.0).floor() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn penalty_per_thousand() {
        assert_eq!(death_penalty(999.0, 1000.0, 100), 0);
        assert_eq!(death_penalty(1000.0, 1000.0, 100), 100);
        assert_eq!(death_penalty(4321.0, 1000.0, 100), 400);
        assert_eq!(death_penalty(-50.0, 1000.0, 100), 0);
    }

    #[test]
    fn combo_bonus_grows() {
        assert_eq!(combo_bonus(0, 25), 0);
        assert_eq!(combo_bonus(1, 25), 0);
        assert_eq!(combo_bonus(2, 25), 25);
        assert_eq!(combo_bonus(4, 25), 75);
    }

    #[test]
    fn multiplier_caps() {
        assert_eq!(speed_multiplier(0.0, 10_000.0, 2.5), 1.0);
        assert_eq!(speed_multiplier(5_000.0, 10_000.0, 2.5), 1.5);
        assert_eq!(speed_multiplier(1e9, 10_000.0, 2.5), 2.5);
        assert_eq!(speed_multiplier(100.0, 0.0, 2.0), 2.0);
    }

    #[test]
    fn distance_floors() {
        assert_eq!(distance(123.9), 123);
        assert_eq!(distance(-4.0), 0);
    }

    proptest! {
        #[test]
        fn multiplier_is_monotonic(a in 0.0f32..1e6, b in 0.0f32..1e6) {
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(speed_multiplier(lo, 10_000.0, 2.5) <= speed_multiplier(hi, 10_000.0, 2.5));
        }
    }
}
