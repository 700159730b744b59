use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process;

use wikinote_client::{ApiClient, load_home, open_page, refresh_pages};
use wikinote_config::Config;
use wikinote_engine::{
    AppState, CreatePageRequest, Page, PageId, ResolvedWikiLink, UpdatePageRequest,
    missing_targets, outbound_page_ids, render_html,
};

#[derive(Parser)]
#[command(name = "wikinote", version, about = "Browse and edit pages on a wikinote backend")]
struct Cli {
    /// Backend base URL (overrides PUBLIC_API_URL and the config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Config file to read instead of ~/.config/wikinote/config.toml
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List all pages
    List,
    /// Show a page with its resolved links and backlinks
    Show { id: PageId },
    /// Show a page by name
    Open { name: String },
    /// List the wikilinks in a page and whether their targets exist
    Links {
        id: PageId,
        /// Only list targets that have no page yet
        #[arg(long, conflicts_with = "ids")]
        missing: bool,
        /// Only list the ids of existing link targets
        #[arg(long)]
        ids: bool,
    },
    /// List pages linking to a page
    Backlinks {
        id: PageId,
        /// Compute from page contents instead of asking the backend
        #[arg(long)]
        local: bool,
    },
    /// Create a page
    Create {
        name: String,
        #[arg(long, default_value = "")]
        content: String,
    },
    /// Rename a page or replace its content
    Update {
        id: PageId,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        content: Option<String>,
    },
    /// Delete a page
    Delete { id: PageId },
    /// Render a page's content as HTML with wikilink spans
    Render { id: PageId },
    /// Print where the root route leads
    Home,
    /// Print the effective configuration
    Config {
        /// Write it to the config file
        #[arg(long)]
        save: bool,
    },
}

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    if let Err(e) = run(cli) {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match cli.api_url {
        Some(url) => Config {
            api_url: wikinote_config::normalize_url(&url),
        },
        None => Config::resolve(cli.config.as_deref()).context("Failed to load configuration")?,
    };

    log::info!("Using backend at {}", config.api_url);
    let client = ApiClient::new(&config.api_url)?;
    let mut state = AppState::new();

    match cli.command {
        Command::List => {
            refresh_pages(&mut state, &client)?;
            print!("{}", format_page_list(state.pages()));
        }
        Command::Show { id } => {
            refresh_pages(&mut state, &client)?;
            open_page(&mut state, &client, id)?;
            let Some(page) = state.current_page() else {
                bail!("Page {id} was not loaded");
            };
            println!("# {}\n", page.name);
            println!("{}\n", page.content);
            print!("{}", format_links(&state.resolve_current()));
            let backlinks = client.get_backlinks(id)?;
            println!("\nBacklinks:");
            print!("{}", format_page_list(&backlinks));
        }
        Command::Open { name } => match client.get_page_by_name(&name)? {
            Some(page) => {
                println!("# {} ({})\n", page.name, page.id);
                println!("{}", page.content);
            }
            None => bail!("No page named {name:?}"),
        },
        Command::Links { id, missing, ids } => {
            refresh_pages(&mut state, &client)?;
            open_page(&mut state, &client, id)?;
            let content = state.current_page().map(|p| p.content.as_str()).unwrap_or("");
            if missing {
                for name in missing_targets(content, &state.index()) {
                    println!("{name}");
                }
            } else if ids {
                for target in outbound_page_ids(content, &state.index()) {
                    println!("{target}");
                }
            } else {
                print!("{}", format_links(&state.resolve_current()));
            }
        }
        Command::Backlinks { id, local } => {
            let pages = if local {
                refresh_pages(&mut state, &client)?;
                local_backlinks(&state, id)?
            } else {
                client.get_backlinks(id)?
            };
            print!("{}", format_page_list(&pages));
        }
        Command::Create { name, content } => {
            let page = client.create_page(&CreatePageRequest::new(name, content))?;
            println!("Created page {} ({})", page.name, page.id);
        }
        Command::Update { id, name, content } => {
            let request = UpdatePageRequest { name, content };
            if request.is_empty() {
                bail!("Nothing to update: pass --name and/or --content");
            }
            let page = client.update_page(id, &request)?;
            println!("Updated page {} ({})", page.name, page.id);
        }
        Command::Delete { id } => {
            client.delete_page(id)?;
            println!("Deleted page {id}");
        }
        Command::Render { id } => {
            refresh_pages(&mut state, &client)?;
            open_page(&mut state, &client, id)?;
            if let Some(page) = state.current_page() {
                println!("{}", render_html(&page.content, state.pages()));
            }
        }
        Command::Home => match load_home(&client).location() {
            Some(location) => println!("{location}"),
            None => println!("No Home page yet"),
        },
        Command::Config { save } => {
            println!("api_url = {:?}", config.api_url);
            if save {
                let path = save_config(&config, cli.config.as_deref())?;
                println!("Saved to {}", path.display());
            }
        }
    }

    Ok(())
}

/// Pages linking to `id`, computed from the loaded page contents.
fn local_backlinks(state: &AppState, id: PageId) -> Result<Vec<Page>> {
    let Some(target) = state.pages().iter().find(|p| p.id == id) else {
        bail!("Page {id} not found");
    };
    Ok(state
        .index()
        .referencing(&target.name)
        .into_iter()
        .cloned()
        .collect())
}

/// Writes `config` to `path`, or to the default location. Returns where it went.
fn save_config(config: &Config, path: Option<&Path>) -> Result<PathBuf> {
    let path = path.map(Path::to_path_buf).unwrap_or_else(Config::config_path);
    config
        .save_to_path(&path)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(path)
}

fn format_page_list(pages: &[Page]) -> String {
    if pages.is_empty() {
        return "(none)\n".to_string();
    }
    pages
        .iter()
        .map(|page| format!("{:>6}  {}\n", page.id, page.name))
        .collect()
}

fn format_links(links: &[ResolvedWikiLink]) -> String {
    let mut out = String::from("Links:\n");
    if links.is_empty() {
        out.push_str("(none)\n");
    }
    for link in links {
        match link.page_id {
            Some(id) => out.push_str(&format!("  [x] {} -> /page/{id}\n", link.page_name)),
            None => out.push_str(&format!("  [ ] {} (missing)\n", link.page_name)),
        }
    }
    out
}
