use super::domain::{Risk, RiskLevel};

/// Score assigned to a project with no identified risks.
pub const BASELINE_SCORE: u8 = 10;

const MAX_SCORE: u32 = 100;

/// Stateless reducer from risk severities to a 0-100 project score.
pub struct RiskScoreCalculator;

impl RiskScoreCalculator {
    /// Mean of the level weights, rounded half-up and capped at 100.
    pub fn score<I>(levels: I) -> u8
    where
        I: IntoIterator<Item = RiskLevel>,
    {
        let (sum, count) = levels
            .into_iter()
            .fold((0u64, 0u64), |(sum, count), level| {
                (sum + u64::from(level.weight()), count + 1)
            });

        if count == 0 {
            return BASELINE_SCORE;
        }

        let rounded = (2 * sum + count) / (2 * count);
        rounded.min(u64::from(MAX_SCORE)) as u8
    }

    pub fn score_risks(risks: &[Risk]) -> u8 {
        Self::score(risks.iter().map(|risk| risk.level))
    }
}
