/// Blend of reputation and revenue share used to rank providers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreWeights {
    pub rating: f64,
    pub earnings: f64,
}

impl ScoreWeights {
    pub const LEADERBOARD: Self = Self {
        rating: 0.6,
        earnings: 0.4,
    };
}

/// Hybrid leaderboard score.
///
/// The rating term is `avg_rating * ln(1 + rating_count)`, so volume is
/// log-damped and a provider with no ratings contributes nothing on that
/// side. Earnings are normalized against `max_earnings`; a non-positive
/// maximum zeroes the earnings term.
pub fn hybrid_score(avg_rating: f64, rating_count: u32, earnings: f64, max_earnings: f64) -> f64 {
    let weights = ScoreWeights::LEADERBOARD;
    let rating_component = avg_rating * f64::from(rating_count).ln_1p();
    let earnings_component = if max_earnings > 0.0 {
        earnings / max_earnings
    } else {
        0.0
    };

    weights.rating * rating_component + weights.earnings * earnings_component
}
