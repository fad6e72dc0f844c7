use colored::Colorize;

pub fn handle_error(err: anyhow::Error) -> ! {
    eprintln!("{} {:#}", "Error:".red().bold(), err);

    let msg = format!("{:#}", err).to_lowercase();

    if msg.contains("main server url is not configured") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Point folio at the portfolio API with:");
        eprintln!(
            "  {} export FOLIO_MAIN_SERVER=https://api.example.com",
            "$".dimmed()
        );
    }

    if msg.contains("connection refused") || msg.contains("error sending request") {
        eprintln!("\n{}", "Suggestion:".yellow().bold());
        eprintln!("  Check that the server is running and reachable.");
    }

    std::process::exit(1);
}
