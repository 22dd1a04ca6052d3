use std::io::{self, Write};

use clap::ValueEnum;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    #[default]
    Yaml,
    Json,
}

/// Writes any report as YAML or pretty JSON.
pub fn serialize_report<W: Write, T: Serialize>(
    writer: &mut W,
    report: &T,
    format: ReportFormat,
) -> io::Result<()> {
    let contents = match format {
        ReportFormat::Yaml => serde_yaml::to_string(report).map_err(io::Error::other)?,
        ReportFormat::Json => {
            let mut json = serde_json::to_string_pretty(report).map_err(io::Error::other)?;
            json.push('\n');
            json
        }
    };
    writer.write_all(contents.as_bytes())
}

pub fn write_report_file<T: Serialize>(path: &str, report: &T, format: ReportFormat) -> io::Result<()> {
    let mut buffer = Vec::new();
    serialize_report(&mut buffer, report, format)?;
    std::fs::write(path, buffer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::data_converter::build_kpi_report;
    use crate::test_support::build_month_row;

    fn render(format: ReportFormat) -> String {
        let row = build_month_row("Jan", 180.0, 100.0, (250000.0, 90000.0), (230000.0, 85000.0));
        let report = build_kpi_report("rows.csv".to_string(), &[row]);
        let mut buf = Vec::new();
        serialize_report(&mut buf, &report, format).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn serialize_report_as_yaml() {
        let output = render(ReportFormat::Yaml);
        assert!(output.contains("source: rows.csv"));
        assert!(output.contains("productionTotal:"));
        assert!(output.contains("collectionRatioPct: 93"));
    }

    #[test]
    fn serialize_report_as_json() {
        let output = render(ReportFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["source"], "rows.csv");
        assert_eq!(parsed["periods"][0], "Jan");
        assert_eq!(parsed["kpis"]["latest"]["newPatientGoal"], 200.0);
    }
}
