use crate::config::Config;
use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use covenant_editor::{Document, EditSession, Mutation, Pipeline};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct ApplyArgs {
    /// Agreement file
    pub file: String,

    /// JSON array of mutations
    pub mutations: String,

    /// Write the result here instead of back to the agreement file
    #[arg(short, long)]
    pub out: Option<String>,

    /// Report what would change without saving
    #[arg(long)]
    pub dry_run: bool,
}

pub fn apply(args: ApplyArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let mutations = read_mutations(&PathBuf::from(cwd).join(&args.mutations))?;

    let doc = Document::load(PathBuf::from(cwd).join(&args.file))?;
    if doc.is_recovered() && args.out.is_none() && !args.dry_run {
        bail!(
            "{} is not a readable agreement; refusing to overwrite it (use --out)",
            args.file
        );
    }

    let pipeline = Pipeline::with_paginator(doc, config.paginator());
    let mut session = EditSession::with_pipeline("cli", pipeline);

    let results = session.apply_batch(mutations.iter().cloned(), args.mutations.clone());

    for (mutation, result) in mutations.iter().zip(&results) {
        match &result.rejection {
            None => println!("  {} {}", "✓".green(), mutation.name()),
            Some(reason) => println!(
                "  {} {} ({})",
                "–".yellow(),
                mutation.name(),
                reason.to_string().dimmed()
            ),
        }
    }

    let applied = results.iter().filter(|r| r.applied).count();
    println!();
    println!(
        "Applied {} of {} mutations, {} pages",
        applied,
        results.len(),
        session.pages().map_or(0, |p| p.len())
    );

    if args.dry_run || applied == 0 {
        return Ok(());
    }

    match &args.out {
        Some(out) => {
            let out_path = PathBuf::from(cwd).join(out);
            fs::write(&out_path, session.document().to_json_pretty())?;
            println!("{} Wrote {}", "✅".green(), out);
        }
        None => {
            session.save()?;
            println!("{} Saved {}", "✅".green(), args.file);
        }
    }

    Ok(())
}

fn read_mutations(path: &Path) -> Result<Vec<Mutation>> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Cannot read mutations from {}", path.display()))?;
    let mutations = serde_json::from_str(&content)
        .with_context(|| format!("Invalid mutation list in {}", path.display()))?;
    Ok(mutations)
}
