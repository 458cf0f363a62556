use std::path::Path;
use std::process;

use tuberdx_eval::{DiagnosisResult, JsonFactProvider};

use crate::{report_error, OutputFormat};

pub(crate) fn cmd_diagnose(facts_path: &Path, wire: bool, output: OutputFormat, quiet: bool) {
    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            let msg = format!("error: failed to start runtime: {}", e);
            report_error(&msg, output, quiet);
            process::exit(1);
        }
    };

    let provider = JsonFactProvider::from_arg(facts_path);
    let result = match runtime.block_on(tuberdx_eval::diagnose_from(&provider)) {
        Ok(result) => result,
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    };

    if wire {
        print_wire(&result, output, quiet);
        return;
    }

    match output {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&result.to_json())
                    .unwrap_or_else(|e| format!("serialization error: {}", e))
            );
        }
        OutputFormat::Text => print_text(&result, quiet),
    }
}

fn print_wire(result: &DiagnosisResult, output: OutputFormat, quiet: bool) {
    match result.to_wire() {
        Ok(lines) => {
            for line in lines {
                println!("{}", line);
            }
        }
        Err(e) => {
            report_error(&format!("error: {}", e), output, quiet);
            process::exit(1);
        }
    }
}

fn print_text(result: &DiagnosisResult, quiet: bool) {
    for (i, diagnosis) in result.iter().enumerate() {
        if i > 0 {
            println!();
        }
        println!("{}. {}", i + 1, diagnosis.record.title);
        if !quiet {
            let p = &diagnosis.provenance;
            println!("   rule: {} (salience {})", p.rule, p.salience);
        }
        for line in diagnosis.record.body.lines() {
            println!("   {}", line);
        }
    }
}
