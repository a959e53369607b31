mod assembler;
pub mod views;

pub use assembler::{
    assemble, DashboardComputation, ReportShapeError, CATEGORY_LIMIT, GROWTH_DAYS,
    LEADERBOARD_LIMIT, REVENUE_MONTHS,
};
pub use views::{
    AdminAdvancedResponse, CategoryDistributionItem, HeatmapPoint, LeaderboardItem,
    MonthlyRevenuePoint, ProviderGrowthPoint,
};
