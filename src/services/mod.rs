pub mod data_converter;
pub mod data_source;
pub mod kpi_engine;
pub mod kpi_plot;
pub mod narrative;
pub mod normalizer;
pub mod pt_engine;
pub mod report_api;
pub mod report_writer;
pub mod row_source;
pub mod trend_table;
