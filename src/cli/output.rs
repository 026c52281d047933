//! Output formatting for CLI commands.

use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, WordbookArgs};
use crate::error::Result;
use crate::extraction::ExtractionMode;
use crate::report::PipelineReport;
use crate::verifier::VerificationSummary;

/// Result structure for extraction.
#[derive(Debug, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub input: String,
    pub output: String,
    pub mode: ExtractionMode,
    pub words: usize,
    pub phrases: usize,
}

/// Result structure for a word-list check.
#[derive(Debug, Serialize, Deserialize)]
pub struct CheckResult {
    pub file: String,
    pub total: usize,
    pub recognized_count: usize,
    pub unrecognized_count: usize,
    pub recognition_rate: f64,
    pub unrecognized: Vec<String>,
}

impl CheckResult {
    pub fn new(file: String, summary: VerificationSummary) -> Self {
        CheckResult {
            file,
            total: summary.total,
            recognized_count: summary.recognized.len(),
            unrecognized_count: summary.unrecognized.len(),
            recognition_rate: summary.recognition_rate(),
            unrecognized: summary.unrecognized,
        }
    }
}

/// Result structure for the env command.
#[derive(Debug, Serialize, Deserialize)]
pub struct EnvStatus {
    pub config_file: Option<String>,
    pub lookup: String,
    pub llm_base_url: String,
    pub llm_model: String,
    pub llm_api_key_set: bool,
    pub correction_enabled: bool,
}

/// Output result based on format.
pub fn output_result<T: Serialize>(message: &str, result: &T, args: &WordbookArgs) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => output_human(message, result, args),
        OutputFormat::Json => output_json(result, args),
    }
}

/// Output in human-readable format.
fn output_human<T: Serialize>(message: &str, result: &T, args: &WordbookArgs) -> Result<()> {
    if args.verbosity() > 0 {
        println!("{message}");
        println!();
    }

    // Convert to JSON value for easier manipulation
    let value = serde_json::to_value(result)?;

    match result {
        _ if std::any::type_name::<T>().contains("PipelineReport") => {
            output_report_human(&value, args)
        }
        _ if std::any::type_name::<T>().contains("CheckResult") => output_check_human(&value, args),
        _ => output_generic_human(&value, args),
    }
}

/// Output a pipeline report in human format.
fn output_report_human(value: &serde_json::Value, args: &WordbookArgs) -> Result<()> {
    let Some(obj) = value.as_object() else {
        return Ok(());
    };

    println!("Correction Report:");
    println!("══════════════════");

    if let Some(counts) = obj.get("counts").and_then(|c| c.as_object()) {
        let count = |key: &str| counts.get(key).and_then(|v| v.as_u64()).unwrap_or(0);
        println!("Total entries: {}", count("total"));
        println!("Confirmed: {}", count("confirmed"));
        println!("Corrected (round 1): {}", count("corrected_first_pass"));
        println!("Corrected (round 2): {}", count("corrected_candidate"));
        println!("Unresolved: {}", count("unresolved"));
    }

    if let Some(changes) = obj.get("changes").and_then(|c| c.as_array())
        && !changes.is_empty()
    {
        println!();
        println!("Changes:");
        println!("────────");
        for change in changes {
            let field = |key: &str| change.get(key).and_then(|v| v.as_str()).unwrap_or("");
            println!(
                "  {} -> {} ({})",
                field("original"),
                field("replacement"),
                field("reason")
            );
        }
    }

    if let Some(unresolved) = obj.get("unresolved").and_then(|u| u.as_array())
        && !unresolved.is_empty()
    {
        println!();
        println!("Unresolved:");
        println!("───────────");
        for entry in unresolved {
            if let Some(text) = entry.get("original_text").and_then(|t| t.as_str()) {
                println!("  {text}");
            }
        }
    }

    println!();
    if let Some(backup) = obj.get("backup_path").and_then(|b| b.as_str()) {
        println!("Backup: {backup}");
    }
    if obj.get("cancelled").and_then(|c| c.as_bool()) == Some(true) {
        println!("Run cancelled; the word list was not modified.");
    }
    if args.verbosity() > 1
        && let Some(run_id) = obj.get("run_id").and_then(|r| r.as_str())
    {
        println!("Run: {run_id}");
    }
    Ok(())
}

/// Output a check result in human format.
fn output_check_human(value: &serde_json::Value, _args: &WordbookArgs) -> Result<()> {
    let Some(obj) = value.as_object() else {
        return Ok(());
    };

    println!("Check Result:");
    println!("═════════════");

    let count = |key: &str| obj.get(key).and_then(|v| v.as_u64()).unwrap_or(0);
    println!("Total: {}", count("total"));
    println!("Recognized: {}", count("recognized_count"));
    println!("Unrecognized: {}", count("unrecognized_count"));
    if let Some(rate) = obj.get("recognition_rate").and_then(|r| r.as_f64()) {
        println!("Recognition rate: {rate:.2}%");
    }

    if let Some(words) = obj.get("unrecognized").and_then(|u| u.as_array())
        && !words.is_empty()
    {
        println!();
        println!("Unrecognized words:");
        println!("───────────────────");
        for word in words.iter().filter_map(|w| w.as_str()) {
            println!("  {word}");
        }
    }
    Ok(())
}

/// Output generic data in human format.
fn output_generic_human(value: &serde_json::Value, _args: &WordbookArgs) -> Result<()> {
    match value {
        serde_json::Value::Object(obj) => {
            for (key, val) in obj {
                let formatted_val = format_value(val);
                println!("{key}: {formatted_val}");
            }
        }
        _ => {
            let formatted_value = format_value(value);
            println!("{formatted_value}");
        }
    }
    Ok(())
}

/// Output in JSON format.
fn output_json<T: Serialize>(result: &T, args: &WordbookArgs) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    println!("{json}");
    Ok(())
}

/// Format a JSON value for display.
fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Array(arr) => {
            let formatted_values = arr.iter().map(format_value).collect::<Vec<_>>().join(", ");
            format!("[{formatted_values}]")
        }
        serde_json::Value::Object(_) => "[object]".to_string(),
        serde_json::Value::Null => "-".to_string(),
    }
}

/// Human summary line of a finished report, for commands that print it inline.
pub fn report_headline(report: &PipelineReport) -> String {
    format!(
        "{} entries: {} confirmed, {} corrected, {} unresolved",
        report.counts.total,
        report.counts.confirmed,
        report.counts.corrected(),
        report.counts.unresolved
    )
}
