use std::ops::RangeInclusive;
use std::time::Duration;

use rand::Rng;

// ─── Rolls ───────────────────────────────────────────────────────

/// First draw of a sample, always in `1..=100`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Roll(u8);

impl Roll {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 100;

    /// `None` outside `1..=100`.
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(rng.gen_range(Self::MIN..=Self::MAX))
    }

    pub fn get(self) -> u8 {
        self.0
    }
}

// ─── Tiers ───────────────────────────────────────────────────────

/// Latency bucket picked by a 1–100 roll.
///
///   roll 1–70   → fast       5–50 ms
///   roll 71–90  → medium    50–200 ms
///   roll 91–98  → slow     200–500 ms
///   roll 99–100 → very_slow 500–2000 ms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LatencyTier {
    Fast,
    Medium,
    Slow,
    VerySlow,
}

impl LatencyTier {
    pub const ALL: [LatencyTier; 4] = [Self::Fast, Self::Medium, Self::Slow, Self::VerySlow];

    /// Cumulative thresholds, first match wins.
    pub fn for_roll(roll: Roll) -> Self {
        match roll.get() {
            1..=70 => Self::Fast,
            71..=90 => Self::Medium,
            91..=98 => Self::Slow,
            // 99..=100; `Roll` holds nothing else.
            _ => Self::VerySlow,
        }
    }

    /// Sleep bounds in milliseconds, both inclusive.
    pub fn range_ms(self) -> RangeInclusive<u64> {
        match self {
            Self::Fast => 5..=50,
            Self::Medium => 50..=200,
            Self::Slow => 200..=500,
            Self::VerySlow => 500..=2_000,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Fast => "fast",
            Self::Medium => "medium",
            Self::Slow => "slow",
            Self::VerySlow => "very_slow",
        }
    }

    /// Second draw: a uniform sleep inside this tier's bounds.
    pub fn sample_ms<R: Rng + ?Sized>(self, rng: &mut R) -> u64 {
        rng.gen_range(self.range_ms())
    }
}

// ─── Samples ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatencySample {
    pub tier: LatencyTier,
    pub sleep_ms: u64,
}

impl LatencySample {
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.sleep_ms)
    }
}

/// Roll 1–100, pick the tier, then pick the sleep inside it.
pub fn draw<R: Rng + ?Sized>(rng: &mut R) -> LatencySample {
    let roll = Roll::draw(rng);
    draw_for_roll(roll, rng)
}

/// Same as [`draw`] with the first roll fixed.
pub fn draw_for_roll<R: Rng + ?Sized>(roll: Roll, rng: &mut R) -> LatencySample {
    let tier = LatencyTier::for_roll(roll);
    LatencySample {
        tier,
        sleep_ms: tier.sample_ms(rng),
    }
}

/// Draw a sample and actually wait it out.
///
/// Only the calling task is suspended; other requests keep running.
pub async fn simulate() -> LatencySample {
    // ThreadRng is !Send, so it must be gone before the await.
    let sample = draw(&mut rand::thread_rng());
    tokio::time::sleep(sample.duration()).await;
    sample
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashMap;

    fn roll(value: u8) -> Roll {
        Roll::new(value).unwrap()
    }

    #[test]
    fn every_roll_maps_to_exactly_one_tier() {
        let mut counts: HashMap<LatencyTier, u32> = HashMap::new();
        for value in 1..=100u8 {
            *counts.entry(LatencyTier::for_roll(roll(value))).or_default() += 1;
        }
        assert_eq!(counts[&LatencyTier::Fast], 70);
        assert_eq!(counts[&LatencyTier::Medium], 20);
        assert_eq!(counts[&LatencyTier::Slow], 8);
        assert_eq!(counts[&LatencyTier::VerySlow], 2);
        assert_eq!(counts.values().sum::<u32>(), 100);
    }

    #[test]
    fn rolls_outside_one_to_hundred_are_refused() {
        assert_eq!(Roll::new(0), None);
        assert_eq!(Roll::new(101), None);
        assert_eq!(Roll::new(u8::MAX), None);
        assert_eq!(Roll::new(1).map(Roll::get), Some(1));
        assert_eq!(Roll::new(100).map(Roll::get), Some(100));

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..10_000 {
            let r = Roll::draw(&mut rng).get();
            assert!((1..=100).contains(&r), "drew {r}");
        }
    }

    #[test]
    fn tier_boundaries() {
        assert_eq!(LatencyTier::for_roll(roll(1)), LatencyTier::Fast);
        assert_eq!(LatencyTier::for_roll(roll(70)), LatencyTier::Fast);
        assert_eq!(LatencyTier::for_roll(roll(71)), LatencyTier::Medium);
        assert_eq!(LatencyTier::for_roll(roll(90)), LatencyTier::Medium);
        assert_eq!(LatencyTier::for_roll(roll(91)), LatencyTier::Slow);
        assert_eq!(LatencyTier::for_roll(roll(98)), LatencyTier::Slow);
        assert_eq!(LatencyTier::for_roll(roll(99)), LatencyTier::VerySlow);
        assert_eq!(LatencyTier::for_roll(roll(100)), LatencyTier::VerySlow);
    }

    #[test]
    fn forced_rolls_at_the_fast_medium_edge() {
        let mut rng = StdRng::seed_from_u64(70);
        for _ in 0..1_000 {
            let fast = draw_for_roll(roll(70), &mut rng);
            assert_eq!(fast.tier, LatencyTier::Fast);
            assert!((5..=50).contains(&fast.sleep_ms));

            let medium = draw_for_roll(roll(71), &mut rng);
            assert_eq!(medium.tier, LatencyTier::Medium);
            assert!((50..=200).contains(&medium.sleep_ms));
        }
    }

    #[test]
    fn sleeps_stay_inside_tier_bounds() {
        let mut rng = StdRng::seed_from_u64(1000);
        for tier in LatencyTier::ALL {
            let range = tier.range_ms();
            let mut seen_low = false;
            let mut seen_high = false;
            for _ in 0..20_000 {
                let ms = tier.sample_ms(&mut rng);
                assert!(range.contains(&ms), "{} produced {ms}", tier.as_str());
                seen_low |= ms == *range.start();
                seen_high |= ms == *range.end();
            }
            // Bounds are inclusive on both ends.
            assert!(seen_low && seen_high, "{} never hit an edge", tier.as_str());
        }
    }

    #[test]
    fn tier_frequencies_match_distribution() {
        const TRIALS: u32 = 100_000;
        let mut rng = StdRng::seed_from_u64(42);
        let mut counts: HashMap<LatencyTier, u32> = HashMap::new();
        for _ in 0..TRIALS {
            *counts.entry(draw(&mut rng).tier).or_default() += 1;
        }

        let expected = [
            (LatencyTier::Fast, 0.70),
            (LatencyTier::Medium, 0.20),
            (LatencyTier::Slow, 0.08),
            (LatencyTier::VerySlow, 0.02),
        ];
        for (tier, p) in expected {
            let observed = counts.get(&tier).copied().unwrap_or(0) as f64 / TRIALS as f64;
            assert!(
                (observed - p).abs() < 0.015,
                "{}: observed {observed:.4}, expected {p}",
                tier.as_str()
            );
        }
    }

    #[tokio::test(start_paused = true)]
    async fn simulate_waits_for_the_drawn_duration() {
        let before = tokio::time::Instant::now();
        let sample = simulate().await;
        let waited = before.elapsed();
        assert!(sample.tier.range_ms().contains(&sample.sleep_ms));
        assert!(waited >= sample.duration());
    }
}
