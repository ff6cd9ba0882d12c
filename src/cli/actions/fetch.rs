use crate::{
    cli::globals::GlobalArgs,
    enrich::{fetch_user_details, fetch_user_repos},
    fanout::Concurrency,
    github::{search_users, SearchQuery},
    output,
};
use anyhow::{Context, Result};
use secrecy::SecretString;
use std::{path::PathBuf, time::Duration};
use tracing::{debug, info};

#[derive(Debug)]
pub struct Args {
    pub api_url: String,
    pub token: Option<SecretString>,
    pub timeout: Duration,
    pub query: SearchQuery,
    pub per_page: u32,
    pub concurrency: Concurrency,
    pub output_dir: PathBuf,
}

/// Run search, enrichment and CSV export.
///
/// Failures, including an unusable client configuration, are printed and end
/// the run early, but are not returned.
///
/// # Errors
/// Never fails today; the `Result` keeps the signature shared by every action.
pub async fn execute(args: Args) -> Result<()> {
    let mut globals = GlobalArgs::new(args.api_url);

    if let Some(token) = args.token {
        globals.set_token(token);
    }

    globals.set_timeout(args.timeout);

    debug!("Global args: {:?}", globals);

    let client = match globals
        .client()
        .context("Could not build GitHub API client")
    {
        Ok(client) => client,
        Err(e) => {
            println!("Error building client: {e:#}");
            return Ok(());
        }
    };

    println!("Searching users: {}", args.query);

    let users = match search_users(&client, &args.query, args.per_page).await {
        Ok(users) => users,
        Err(e) => {
            println!("Error fetching users: {e}");
            return Ok(());
        }
    };

    println!("Found {} users, fetching profiles", users.len());

    let details = fetch_user_details(&client, &users, args.concurrency).await;

    match output::write_users(&args.output_dir, &details) {
        Ok(path) => println!("Saved {} users to {}", details.len(), path.display()),
        Err(e) => {
            println!("Error saving users to CSV: {e}");
            return Ok(());
        }
    }

    let repos = fetch_user_repos(&client, &details, args.concurrency).await;

    match output::write_repos(&args.output_dir, &repos) {
        Ok(path) => println!("Saved {} repositories to {}", repos.len(), path.display()),
        Err(e) => println!("Error saving repos to CSV: {e}"),
    }

    info!(
        "run finished: {} users, {} profiles, {} repositories",
        users.len(),
        details.len(),
        repos.len()
    );

    println!("Done");

    Ok(())
}
