use anyhow::{Context, Result, bail};
use snapline_application::SearchDebouncer;
use std::sync::Arc;
use std::time::Duration;

use super::{App, render};

pub async fn run(app: &App, query: String) -> Result<()> {
    app.require_session()?;
    if query.chars().count() < app.config.min_query_len {
        bail!(
            "Type at least {} characters to search",
            app.config.min_query_len
        );
    }

    let search = Arc::new(SearchDebouncer::with_timing(
        app.api.clone(),
        app.session.clone(),
        app.config.search_debounce(),
        app.config.min_query_len,
    ));
    let settled = search.settled();
    search.set_query(query);
    tokio::time::timeout(Duration::from_secs(30), settled)
        .await
        .context("Search timed out")?;

    let results = search.results();
    if results.is_empty() {
        println!("No users found");
    }
    for user in &results {
        println!("{}", render::user_line(user));
    }
    Ok(())
}
