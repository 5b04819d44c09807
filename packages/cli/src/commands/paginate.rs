use crate::config::Config;
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use covenant_editor::Document;
use covenant_layout::Page;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct PaginateArgs {
    /// Agreement file
    pub file: String,

    /// Print the page list as JSON
    #[arg(long)]
    pub json: bool,
}

pub fn paginate(args: PaginateArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let doc = Document::load(PathBuf::from(cwd).join(&args.file))?;
    let paginator = config.paginator();
    let pages = paginator.paginate(&doc.structure().nodes);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&pages)?);
        return Ok(());
    }

    println!(
        "{} {} ({} pages)",
        "📄".bright_blue(),
        doc.structure().title.bold(),
        pages.len()
    );

    let geometry = paginator.geometry();
    for page in &pages {
        let capacity = geometry.capacity(page.number);
        let usage = format!("{}/{}", page.height, capacity);
        let usage = if page.height > capacity {
            usage.red()
        } else {
            usage.green()
        };

        println!(
            "  Page {:>3}  {:>9}  {}",
            page.number,
            usage,
            summary(page).dimmed()
        );
    }

    Ok(())
}

/// First and last labelled item on a page
fn summary(page: &Page) -> String {
    let mut labels = page.nodes.iter().filter_map(|n| n.label.as_deref());
    match (labels.next(), labels.last()) {
        (Some(first), Some(last)) => format!("{} – {}", first, last),
        (Some(first), None) => first.to_string(),
        _ => String::new(),
    }
}
