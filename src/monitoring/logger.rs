use anyhow::Result;
use chrono::Utc;
use std::fs::OpenOptions;
use std::io::Write;
use crate::pipeline::runner::RunReport;

/// Appends one CSV row per run
pub struct RunLogger {
    log_path: String,
}

impl RunLogger {
    pub fn new(log_path: String) -> Result<Self> {
        // Create CSV file with headers if it doesn't exist
        if !std::path::Path::new(&log_path).exists() {
            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .open(&log_path)?;

            writeln!(file, "timestamp,date,mode,outcome,detail")?;
        }

        Ok(Self { log_path })
    }

    pub fn log_run(&self, report: &RunReport) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.log_path)?;

        writeln!(
            file,
            "{},{},{},{},{}",
            Utc::now().to_rfc3339(),
            report.date.format("%Y-%m-%d"),
            report.mode,
            report.outcome.label(),
            csv_field(&report.outcome.detail()),
        )?;

        Ok(())
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
