use anyhow::{bail, Result};
use clap::Parser;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use verigen_core::logger::generate_rid;
use verigen_core::{gauntlet, Config, GeminiClient, Generator, History, Logger, ModelInvoker};

#[derive(Parser)]
#[command(name = "verigen-cli", about = "Turn a hardware specification into a Verilog module")]
struct Cli {
    /// Free-text specification, e.g. "8-bit synchronous up-counter with async reset"
    spec: Option<String>,
    /// Read specifications line by line and keep a session history
    #[arg(short, long)]
    interactive: bool,
    #[arg(short, long, default_value = "out")]
    out_dir: PathBuf,
    /// Run the fixture gauntlet instead of calling the model
    #[arg(long)]
    self_test: bool,
    /// Emit JSONL log records (info on stdout, errors on stderr)
    #[arg(long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.self_test {
        let report = gauntlet::run();
        println!("{}", report.log);
        if !report.success() {
            std::process::exit(1);
        }
        return Ok(());
    }

    let config = match Config::from_env() {
        Ok(c) => c.with_out_dir(&cli.out_dir),
        Err(e) => bail!("❌ {}", e.user_message()),
    };
    let generator = Generator::new(GeminiClient::new(&config)?, &config);
    let logger = Logger::new(generate_rid()).with_quiet(!cli.verbose);

    if cli.interactive {
        return interactive(&generator, &logger);
    }

    let Some(spec) = cli.spec else {
        bail!("Please enter a specification first (or pass --interactive).");
    };
    match generator.generate(&spec, &logger) {
        Ok(gen) => {
            print!("{}", gen.code());
            eprintln!("✅ Verilog code written to {}", gen.path.display());
            if gen.blocks.dropped() > 0 {
                eprintln!("ℹ {} additional block(s) ignored", gen.blocks.dropped());
            }
            Ok(())
        }
        Err(e) => bail!("❌ {}", e.user_message()),
    }
}

fn interactive<M: ModelInvoker>(generator: &Generator<M>, logger: &Logger) -> Result<()> {
    let mut history = History::new();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("Enter a module specification (:history, :clear, :quit).");
    loop {
        print!("spec> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        match line.trim() {
            ":quit" | ":q" => break,
            ":history" => print_history(&history),
            ":clear" => {
                history.clear();
                println!("History cleared.");
            }
            spec => match generator.generate(spec, logger) {
                Ok(gen) => {
                    history.record(&gen);
                    println!("```verilog{}```", gen.code());
                    println!("✅ Saved to {}", gen.path.display());
                }
                Err(e) => println!("❌ {}", e.user_message()),
            },
        }
    }
    Ok(())
}

fn print_history(history: &History) {
    if history.is_empty() {
        println!("No history yet. Generate something first!");
        return;
    }
    for (i, entry) in history.newest_first().enumerate() {
        println!("{}. Spec: {}", i + 1, entry.spec);
        println!("```verilog{}```", entry.code);
        println!("---");
    }
}
