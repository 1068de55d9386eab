//! Schema command - Display the JSON Schema for the QA report

use colored::Colorize;

use super::SchemaArgs;
use crate::cli::exit_codes;
use crate::error::{QaError, ReportError};
use crate::report::REPORT_SCHEMA;

pub async fn execute(args: SchemaArgs) -> Result<i32, QaError> {
    match args.output {
        Some(output_path) => {
            std::fs::write(&output_path, REPORT_SCHEMA).map_err(|e| ReportError::Write {
                path: output_path.display().to_string(),
                source: e,
            })?;

            println!(
                "{} Schema written to: {}",
                "Success:".green().bold(),
                output_path.display().to_string().cyan()
            );
        }
        None => {
            println!("{REPORT_SCHEMA}");
        }
    }

    Ok(exit_codes::SUCCESS)
}
