use clap::Parser;
use pagesearch::cli::{Cli, Commands};
use pagesearch::commands;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "pagesearch=warn".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Search { query, limit, json }) => {
            let response = commands::search(&query, limit)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&response)?);
            } else if response.pages.is_empty() {
                println!("No results for '{query}'");
            } else {
                for entry in &response.pages {
                    let section = if entry.section.is_empty() {
                        String::new()
                    } else {
                        format!("{} (#{})", entry.section, entry.anchor)
                    };
                    println!("[{:.2}] {}  {section}", entry.ratio, entry.page.id);
                    println!("    {}", entry.short_body);
                }
            }
            Ok(())
        }
        Some(Commands::Index) => {
            let summary = commands::index()?;
            println!("Indexed {} pages ({} terms)", summary.pages, summary.terms);
            Ok(())
        }
        Some(Commands::List) => {
            let pages = commands::list()?;
            if pages.is_empty() {
                println!("No pages found");
            }
            for page in pages {
                println!("{}\t{}", page.id, page.title);
            }
            Ok(())
        }
        Some(Commands::Get { id }) => {
            println!("{}", commands::get(&id)?);
            Ok(())
        }
        None => {
            Cli::parse_from(["pagesearch", "--help"]);
            Ok(())
        }
    }
}
