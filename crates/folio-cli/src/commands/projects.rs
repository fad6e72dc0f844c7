use anyhow::Result;
use comfy_table::Table;
use serde_json::json;

use folio_store::{Action, AppStore, HttpPortfolioApi, ProjectsState};

use crate::cli::{OutputFormat, ProjectsArgs};
use crate::output::json::print_json;
use crate::output::table::{new_table, print_table};

pub async fn run(
    store: &AppStore,
    api: &HttpPortfolioApi,
    args: ProjectsArgs,
    format: OutputFormat,
) -> Result<()> {
    store.dispatch(Action::ShowLoader);
    let result = store.load_projects(api, args.page).await;
    store.dispatch(Action::HideLoader);
    result?;

    let state = store.select(|s| s.projects.clone());

    if format.is_json() {
        return print_json(&json!({
            "projects": state.projects,
            "total_projects": state.total_projects,
            "total_pages": state.total_pages,
            "current_page": state.current_page,
        }));
    }

    if state.projects.is_empty() {
        println!("No projects found.");
        return Ok(());
    }

    print_table(projects_table(&state))?;
    println!(
        "Page {} of {} ({} projects)",
        state.current_page, state.total_pages, state.total_projects
    );
    Ok(())
}

fn projects_table(state: &ProjectsState) -> Table {
    let mut table = new_table(&["Title", "Category", "Stack", "Live"]);
    for project in &state.projects {
        table.add_row(vec![
            project.title.clone(),
            project.category.clone(),
            project.stack.join(", "),
            project.live.clone(),
        ]);
    }
    table
}
