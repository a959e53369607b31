//! Admin analytics: the dashboard aggregation engine, leaderboard scoring,
//! and the fixed-shape report handed back to administrators.

pub mod calendar;
pub mod engine;
pub mod report;
pub mod router;
pub mod scoring;
pub mod service;

#[cfg(test)]
mod tests;

pub use calendar::{parse_reference_time, ReportWindow, YearMonth};
pub use engine::{cancellation_rate, AggregationEngine, LEADERBOARD_CANDIDATES};
pub use report::{
    assemble, AdminAdvancedResponse, CategoryDistributionItem, DashboardComputation,
    HeatmapPoint, LeaderboardItem, MonthlyRevenuePoint, ProviderGrowthPoint, ReportShapeError,
};
pub use router::{actor_from_headers, dashboard_router, ActorError, ACTOR_ID_HEADER, ACTOR_ROLE_HEADER};
pub use scoring::{hybrid_score, ScoreWeights};
pub use service::{Actor, AdminAccessView, AdminDashboardService, DashboardError};
