use clap::{CommandFactory, Parser};
use codeinspector::cli::Cli;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    // Initialize tracing with RUST_LOG env filter
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout with success; usage errors exit 1
            let failed = e.use_stderr();
            let _ = e.print();
            if failed {
                println!();
                let _ = Cli::command().print_help();
            }
            std::process::exit(if failed { 1 } else { 0 });
        }
    };

    if let Err(e) = cli.run() {
        eprintln!("Error: {}", e);

        // Print error chain
        let mut source = std::error::Error::source(&e);
        while let Some(s) = source {
            eprintln!("  Caused by: {}", s);
            source = std::error::Error::source(s);
        }

        std::process::exit(1);
    }
}
