//! # memsh
//!
//! Main entry point for the in-memory file system shell.

use memsh::{HostRuntime, HostRuntimeConfig};
use services_fs_view::NamePolicy;
use std::env;
use std::fs;
use std::path::PathBuf;
use std::process;

fn main() {
    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("memsh");

    let config = parse_args(&args).unwrap_or_else(|e| {
        eprintln!("Error: {}", e);
        print_usage(program);
        process::exit(1);
    });

    let mut runtime = HostRuntime::new(config);

    if let Err(e) = runtime.run() {
        eprintln!("Runtime error: {}", e);
        process::exit(1);
    }
}

fn parse_args(args: &[String]) -> Result<HostRuntimeConfig, String> {
    let mut config = HostRuntimeConfig::default();
    let mut i = 1;

    while i < args.len() {
        match args[i].as_str() {
            "load_state" | "--load" | "-l" => {
                config.load_state = true;
            }
            "--state-file" | "-f" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --state-file".to_string());
                }
                config.state_file = PathBuf::from(&args[i]);
            }
            "--script" | "-s" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --script".to_string());
                }
                let script_path = &args[i];
                let script_text = fs::read_to_string(script_path)
                    .map_err(|e| format!("Failed to read script file: {}", e))?;
                config.script = Some(script_text);
            }
            "--max-steps" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --max-steps".to_string());
                }
                config.max_steps = args[i]
                    .parse()
                    .map_err(|_| format!("Invalid max-steps value: {}", args[i]))?;
            }
            "--log-level" => {
                i += 1;
                if i >= args.len() {
                    return Err("Missing value for --log-level".to_string());
                }
                config.log_level = args[i]
                    .parse()
                    .map_err(|e: services_logger::ParseLevelError| e.to_string())?;
            }
            "--lenient-names" => {
                config.name_policy = NamePolicy::Lenient;
            }
            "--help" | "-h" => {
                print_usage(&args[0]);
                process::exit(0);
            }
            other => {
                return Err(format!("Unknown option: {}", other));
            }
        }
        i += 1;
    }

    Ok(config)
}

fn print_usage(program: &str) {
    eprintln!("Usage: {} [load_state] [OPTIONS]", program);
    eprintln!();
    eprintln!("Options:");
    eprintln!("  load_state, -l, --load   Restore the saved state at startup");
    eprintln!("  -f, --state-file <FILE>  State file (default: filesystem_state.ser)");
    eprintln!("  -s, --script <FILE>      Read commands from FILE instead of stdin");
    eprintln!("  --max-steps <N>          Maximum commands to run (0 = unlimited)");
    eprintln!("  --log-level <LEVEL>      debug, info, warn (default) or error");
    eprintln!("  --lenient-names          Allow duplicate sibling names");
    eprintln!("  -h, --help               Show this help message");
    eprintln!();
    eprintln!("Examples:");
    eprintln!("  {} load_state", program);
    eprintln!("  {} --script session.txt --log-level debug", program);
}
