//! inlay-dump CLI
//!
//! Prints the tokens of a document as the inlay scanners see them.

use std::process::ExitCode;

use inlay_dump::{init_tracing, parse_args, run};

fn main() -> ExitCode {
    let config = match parse_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("error: {err}");
            eprintln!();
            print_usage();
            return ExitCode::from(2);
        }
    };
    if config.help {
        print_usage();
        return ExitCode::SUCCESS;
    }

    init_tracing(config.tree);
    match run(&config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn print_usage() {
    eprintln!("Usage: inlay-dump <file> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --format=<name>   yaml, properties, template, html, expression");
    eprintln!("                    (default: from the file extension, else template)");
    eprintln!("  --offset=<n>      Byte offset to start scanning at");
    eprintln!("  --state=<name>    Scanner state to start in, e.g. WithinFlowMapping");
    eprintln!("  --injections      Also scan injected regions (template only)");
    eprintln!("  --positions       Print line:character ranges (UTF-16)");
    eprintln!("  --tree            Hierarchical log output");
    eprintln!();
    eprintln!("Logging: set INLAY_LOG (or RUST_LOG), e.g. INLAY_LOG=inlay_core=trace");
}
