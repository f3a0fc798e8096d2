//! nbindc: native binding generator CLI.

use std::error::Error;

use nbindc::{generate, GenerateError, GeneratorConfig};

fn main() {
    nbindc::init_tracing();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        print_usage();
        return;
    }

    match args[1].as_str() {
        "generate" => {
            let config = match GeneratorConfig::from_args(&args[2..], |key| std::env::var(key).ok()) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("error: {e}");
                    eprintln!("Usage: nbindc generate <manifest.json> [options]");
                    std::process::exit(1);
                }
            };
            match generate(&config) {
                Ok(summary) => println!("{summary}"),
                Err(e) => {
                    report(&e);
                    std::process::exit(1);
                }
            }
        }
        "help" | "--help" | "-h" => print_usage(),
        "version" | "--version" | "-V" => println!("nbindc {}", env!("CARGO_PKG_VERSION")),
        other => {
            eprintln!("Unknown command: {other}");
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}

fn report(e: &GenerateError) {
    eprintln!("error: {e}");
    let mut source = e.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
    for type_error in e.type_errors() {
        eprintln!("  - {type_error}");
        let mut source = type_error.source();
        while let Some(cause) = source {
            eprintln!("      caused by: {cause}");
            source = cause.source();
        }
    }
}

fn print_usage() {
    println!("nbindc - native binding generator");
    println!();
    println!("Usage: nbindc <command> [options]");
    println!();
    println!("Commands:");
    println!("  generate <manifest.json>   Merge scanned types and write bindings");
    println!("  help                       Show this help message");
    println!("  version                    Show version information");
    println!();
    println!("Generate options:");
    println!("  -o <dir>                   Output directory (default: generated)");
    println!("  --runtime-package=<pkg>    Runtime package (default: org.nbind.runtime,");
    println!("                             or $NBIND_RUNTIME_PACKAGE)");
    println!("  --header=<file>            Text written before every generated class");
    println!("  --no-parallel              Write files on one thread");
    println!();
    println!("Environment:");
    println!("  RUST_LOG                   Enable logging (e.g. nbind::merge=info)");
    println!("  NBIND_LOG_TREE             Nest log output by span");
}
