//! The `quizdeck validate` command.

use std::path::PathBuf;

use anyhow::Result;

use quizdeck_core::loader::parse_bank_file;
use quizdeck_core::parser::validate_bank;

pub fn execute(bank_path: PathBuf) -> Result<()> {
    let bank = parse_bank_file(&bank_path)?;

    println!(
        "Bank: {} ({} questions, format: {})",
        bank.source_name,
        bank.len(),
        bank.format
    );

    let warnings = validate_bank(&bank);
    for w in &warnings {
        let prefix = w
            .question_id
            .map(|id| format!("  [#{id}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Bank valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
