//! reqlog CLI
//!
//! Adds request logging to a shell API test script and prints the result.
//! The input file is left as is; redirect stdout to keep the output.
//!
//! Usage:
//!   reqlog [script] [OPTIONS] > annotated.sh

use clap::Parser;
use reqlog::{
    rewrite_file, Pass, RewriteOptions, RewriteReport, DEFAULT_BODY_VAR, DEFAULT_HELPER,
    DEFAULT_RESPONSE_LABEL, DEFAULT_SCRIPT,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

// ANSI color codes
const GREEN: &str = "\x1b[32m";
const RED: &str = "\x1b[31m";
const YELLOW: &str = "\x1b[33m";
const CYAN: &str = "\x1b[36m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const RESET: &str = "\x1b[0m";

/// Shell test script request-logging annotator
#[derive(Parser, Debug)]
#[command(name = "reqlog")]
#[command(
    author,
    version,
    about = "Insert request logging into a shell API test script"
)]
struct Args {
    /// Path to the test script
    #[arg(default_value = DEFAULT_SCRIPT)]
    path: PathBuf,

    /// Name of the logging helper the script defines
    #[arg(long, env = "REQLOG_HELPER", default_value = DEFAULT_HELPER)]
    helper: String,

    /// Variable that receives each request body
    #[arg(long, env = "REQLOG_BODY_VAR", default_value = DEFAULT_BODY_VAR)]
    body_var: String,

    /// Label echoed before each response body
    #[arg(long, env = "REQLOG_RESPONSE_LABEL", default_value = DEFAULT_RESPONSE_LABEL)]
    response_label: String,

    /// Print per-pass rewrite counts to stderr
    #[arg(short, long)]
    summary: bool,

    /// Summary format: text (default), json
    #[arg(short, long, default_value = "text")]
    format: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let options = RewriteOptions {
        helper: args.helper.clone(),
        body_var: args.body_var.clone(),
        response_label: args.response_label.clone(),
    };

    let rewrite = match rewrite_file(&args.path, &options) {
        Ok(rewrite) => rewrite,
        Err(e) => {
            eprintln!("{RED}{BOLD}error:{RESET} {e}");
            std::process::exit(1);
        }
    };

    println!("{}", rewrite.text);

    if args.summary {
        if args.format == "json" {
            print_summary_json(&rewrite.report);
        } else {
            print_summary(&rewrite.report, &args);
        }
    }
}

/// Logs go to stderr so they never mix with the rewritten script.
fn init_tracing(verbose: bool) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn print_summary_json(report: &RewriteReport) {
    match serde_json::to_string_pretty(report) {
        Ok(output) => eprintln!("{output}"),
        Err(e) => eprintln!("{RED}Error serializing summary: {e}{RESET}"),
    }
}

fn print_summary(report: &RewriteReport, args: &Args) {
    eprintln!("{DIM}━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━{RESET}");
    eprintln!("{BOLD}{CYAN}Summary{RESET} {DIM}{}{RESET}", args.path.display());
    eprintln!("{DIM}━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━{RESET}");

    for pass in Pass::ALL {
        let count = report.count(pass);
        let color = if count > 0 { GREEN } else { DIM };
        eprintln!(
            "  {DIM}{:<18}{RESET} {BOLD}{color}{count}{RESET}",
            format!("{}:", pass.label())
        );
    }

    eprintln!();

    if report.is_empty() {
        eprintln!("{YELLOW}{BOLD}No test cases matched{RESET}");
    } else {
        eprintln!(
            "{GREEN}{BOLD}{} rewrite(s) applied{RESET}",
            report.total()
        );
    }
}
