//! Validation command implementation

use std::fs;
use std::path::Path;
use std::process::ExitCode;

use crate::config::WeftConfig;
use crate::models::Draft;
use crate::validate::{validate_draft, Severity};

use super::{EXIT_ERROR, EXIT_INVALID_ARGS, EXIT_SUCCESS};

/// Execute the validate command
pub fn run_validate(
    input: &Path,
    loom_from_config: bool,
    format: &str,
    strict: bool,
) -> ExitCode {
    if format != "text" && format != "json" {
        eprintln!("Error: --format must be 'text' or 'json'");
        return ExitCode::from(EXIT_INVALID_ARGS);
    }

    let text = match fs::read_to_string(input) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error: cannot read {}: {}", input.display(), e);
            return ExitCode::from(EXIT_ERROR);
        }
    };
    let mut draft: Draft = match serde_json::from_str(&text) {
        Ok(draft) => draft,
        Err(e) => {
            eprintln!("Error: invalid draft in {}: {}", input.display(), e);
            return ExitCode::from(EXIT_INVALID_ARGS);
        }
    };

    if loom_from_config {
        match WeftConfig::load_or_default() {
            Ok(config) => draft.loom = config.loom.capacity(),
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::from(EXIT_ERROR);
            }
        }
    }

    let issues = validate_draft(&draft);

    if format == "json" {
        let json = serde_json::json!({
            "valid": issues.is_empty(),
            "issues": issues.iter().map(|i| {
                serde_json::json!({
                    "severity": i.severity.to_string(),
                    "type": i.issue_type.to_string(),
                    "message": i.message,
                })
            }).collect::<Vec<_>>(),
        });
        println!("{}", json);
    } else {
        for issue in &issues {
            println!("{}", issue);
        }
        if issues.is_empty() {
            println!("Draft is valid");
        }
    }

    let has_error = issues.iter().any(|i| i.severity == Severity::Error);
    let blocking = has_error || (strict && !issues.is_empty());
    if blocking {
        ExitCode::from(EXIT_ERROR)
    } else {
        ExitCode::from(EXIT_SUCCESS)
    }
}
