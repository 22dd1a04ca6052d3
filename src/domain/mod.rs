pub mod kpi;
pub mod location;
pub mod period_row;
