pub mod calculator;

pub use calculator::{
    calculate_yield, compute, compute_yield, financing_breakdown, interest_accrual, validate,
    FinancingBreakdown, Metric, YieldInput, YieldMetrics,
};
