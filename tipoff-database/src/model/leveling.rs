/// XP curve: the threshold for a level is `level * xp_per_level`. Injectable
/// rather than a global so tests and future tuning can swap it out.
#[derive(Clone, Copy, Debug)]
pub struct LevelCurve {
    xp_per_level: u64,
}

impl LevelCurve {
    pub const fn new(xp_per_level: u64) -> Self {
        Self { xp_per_level }
    }

    /// The production curve: level 1 needs 100 XP, level 2 needs 200, and so on.
    pub const fn standard() -> Self {
        Self::new(100)
    }

    /// XP required to finish `level`. Callers must pass `level >= 1`.
    pub fn xp_needed(&self, level: u32) -> u64 {
        u64::from(level) * self.xp_per_level
    }

    pub fn progress(&self, xp: u64, level: u32) -> LevelProgress {
        let needed = self.xp_needed(level).max(1);
        let percent = (100.0 * xp as f64 / needed as f64).min(100.0);
        LevelProgress {
            current: xp,
            needed,
            percent,
        }
    }
}

impl Default for LevelCurve {
    fn default() -> Self {
        Self::standard()
    }
}

/// Progress toward the next level, ready for an XP bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LevelProgress {
    pub current: u64,
    pub needed: u64,
    pub percent: f64,
}

#[cfg(test)]
mod tests {
    use super::LevelCurve;

    #[test]
    fn threshold_is_level_times_hundred() {
        let curve = LevelCurve::standard();
        for level in 1..=50 {
            assert_eq!(curve.xp_needed(level), u64::from(level) * 100);
        }
    }

    #[test]
    fn percent_stays_within_bounds() {
        let curve = LevelCurve::standard();
        for (xp, level) in [(0, 1), (50, 1), (100, 1), (450, 4), (10_000, 3)] {
            let progress = curve.progress(xp, level);
            assert!(progress.percent >= 0.0);
            assert!(progress.percent <= 100.0);
        }
    }

    #[test]
    fn percent_caps_at_hundred_once_threshold_crossed() {
        let curve = LevelCurve::standard();
        assert_eq!(curve.progress(500, 5).percent, 100.0);
        assert_eq!(curve.progress(9_999, 5).percent, 100.0);
        assert_eq!(curve.progress(250, 5).percent, 50.0);
    }

    #[test]
    fn progress_reports_current_and_needed() {
        let progress = LevelCurve::standard().progress(450, 4);
        assert_eq!(progress.current, 450);
        assert_eq!(progress.needed, 400);
    }
}
