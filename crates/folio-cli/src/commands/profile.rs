use anyhow::Result;
use colored::Colorize;

use folio_store::{Action, AppStore, HttpPortfolioApi, Profile};

use crate::cli::OutputFormat;
use crate::output::json::print_json;

pub async fn run(store: &AppStore, api: &HttpPortfolioApi, format: OutputFormat) -> Result<()> {
    store.dispatch(Action::ShowLoader);
    let result = store.load_profile(api).await;
    store.dispatch(Action::HideLoader);
    result?;

    let Some(profile) = store.select(|s| s.profile.profile.clone()) else {
        return Ok(());
    };

    if format.is_json() {
        return print_json(&profile);
    }

    print_profile(&profile);
    Ok(())
}

fn print_profile(profile: &Profile) {
    println!("{}", profile.name.bold());
    println!("{}", profile.title);
    println!();
    println!("{}", profile.description);
    println!();
    println!("{}", profile.about_me.heading.bold());
    println!("{}", profile.about_me.description);

    if !profile.stack.is_empty() {
        println!();
        println!("{}", "Stack".bold());
        for item in &profile.stack {
            println!("  - {}", item.description);
        }
    }

    println!();
    println!("Email:    {}", profile.email);
    println!("GitHub:   {}", profile.github_link);
    println!("LinkedIn: {}", profile.linked_in_link);
    println!("{}", format!("(c) {}", profile.copyright).dimmed());
}
