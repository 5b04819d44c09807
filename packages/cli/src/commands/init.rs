use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::Result;
use clap::Args;
use colored::Colorize;
use covenant_editor::Document;
use std::fs;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct InitArgs {
    /// Agreement file to create
    #[arg(default_value = "agreement.json")]
    pub out: String,

    /// Document kind (lease, sale, management, service, acceptance)
    #[arg(short, long)]
    pub kind: Option<String>,

    /// Force overwrite existing files
    #[arg(short, long)]
    pub force: bool,
}

pub fn init(args: InitArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let out_path = PathBuf::from(cwd).join(&args.out);

    if out_path.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            args.out.bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    let kind = args.kind.unwrap_or_else(|| config.kind.clone());
    println!(
        "{}",
        format!("📝 Creating {} agreement...", kind).bright_blue().bold()
    );

    let mut doc = Document::create(out_path, &kind);
    doc.save()?;
    println!(
        "  {} Created {} ({})",
        "✓".green(),
        args.out,
        doc.structure().title
    );

    let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);
    if !config_path.exists() {
        let config = Config { kind, ..config };
        fs::write(&config_path, serde_json::to_string_pretty(&config)?)?;
        println!("  {} Created {}", "✓".green(), DEFAULT_CONFIG_NAME);
    }

    println!();
    println!("Next steps:");
    println!("  1. Run: covenant apply {} <mutations.json>", args.out);
    println!("  2. Run: covenant compile {} --target print", args.out);

    Ok(())
}
