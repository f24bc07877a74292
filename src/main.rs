//! Terminal client: one command per line, battle turns play out in real time.

use rise_of_elites::persistence::default_store;
use rise_of_elites::text_interface::Console;
use rise_of_elites::{GameConfig, GameSession};
use std::io::{self, BufRead, Write};
use std::path::Path;
use std::thread;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    // Optional first argument: a RON config file.
    let config = match std::env::args_os().nth(1) {
        Some(path) => GameConfig::load(Path::new(&path)),
        None => GameConfig::default(),
    };

    let mut console = Console::new(GameSession::new(config), default_store());
    println!("=== Rise of Elites ===");
    print_reply(&console.execute("load"));
    println!("Type 'help' for commands, 'quit' to exit.");

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        io::stdout().flush()?;

        line.clear();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let command = line.trim();
        match command {
            "" => continue,
            "quit" | "exit" => break,
            _ => {}
        }

        print_reply(&console.execute(command));

        // Let the queued battle steps play out at their configured pace.
        while let Some(wait) = console.time_until_next_task() {
            thread::sleep(wait);
            print_reply(&console.advance(wait));
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn print_reply(text: &str) {
    if !text.is_empty() {
        println!("{}", text);
    }
}
