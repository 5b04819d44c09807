use crate::config::{Config, DEFAULT_CONFIG_NAME};
use anyhow::{anyhow, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use covenant_compiler_html::{compile_markup, compile_print};
use covenant_editor::Document;
use covenant_parser::to_json_pretty;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::WalkDir;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Target {
    /// Flat markup of the whole agreement
    Markup,
    /// Paginated HTML
    Print,
    /// Normalized, renumbered JSON
    Json,
}

impl Target {
    fn extension(self) -> &'static str {
        match self {
            Target::Markup => "markup.html",
            Target::Print => "html",
            Target::Json => "json",
        }
    }
}

#[derive(Debug, Args)]
pub struct CompileArgs {
    /// Agreement file, or directory of agreement files
    #[arg(default_value = ".")]
    pub path: String,

    /// Output format
    #[arg(short, long, value_enum, default_value = "print")]
    pub target: Target,

    /// Output file (single input) or directory (directory input, defaults to dist)
    #[arg(short, long)]
    pub out: Option<String>,
}

pub fn compile(args: CompileArgs, cwd: &str) -> Result<()> {
    let config = Config::load(cwd)?;
    let input = PathBuf::from(cwd).join(&args.path);

    if input.is_file() {
        let output = compile_file(&input, args.target, &config)?;
        match &args.out {
            Some(out) => {
                fs::write(PathBuf::from(cwd).join(out), output)?;
                println!("  {} {} → {}", "✓".green(), args.path, out);
            }
            None => print!("{}", output),
        }
        return Ok(());
    }

    if !input.is_dir() {
        return Err(anyhow!("Input path does not exist: {}", input.display()));
    }

    println!("{}", "🔨 Compiling agreements...".bright_blue().bold());

    let files = find_agreement_files(&input);
    if files.is_empty() {
        println!("{}", "⚠️  No agreement files found".yellow());
        return Ok(());
    }

    let out_dir = PathBuf::from(cwd).join(args.out.as_deref().unwrap_or("dist"));
    fs::create_dir_all(&out_dir)?;

    let mut success_count = 0;
    let mut error_count = 0;

    for file in &files {
        let relative_path = file.strip_prefix(&input).unwrap_or(file);
        let result = compile_file(file, args.target, &config).and_then(|output| {
            let out_path = output_path(&out_dir, relative_path, args.target);
            if let Some(parent) = out_path.parent() {
                fs::create_dir_all(parent)?;
            }
            fs::write(&out_path, output)?;
            Ok(out_path)
        });

        match result {
            Ok(out_path) => {
                success_count += 1;
                println!(
                    "  {} {} → {}",
                    "✓".green(),
                    relative_path.display(),
                    out_path.display()
                );
            }
            Err(e) => {
                error_count += 1;
                eprintln!(
                    "  {} {} - {}",
                    "✗".red(),
                    relative_path.display(),
                    e.to_string().red()
                );
            }
        }
    }

    println!();
    if error_count == 0 {
        println!(
            "{} Compiled {} agreements successfully",
            "✅".green(),
            success_count
        );
    } else {
        println!(
            "{} Compiled {} agreements, {} errors",
            "⚠️".yellow(),
            success_count,
            error_count
        );
    }

    Ok(())
}

fn find_agreement_files(dir: &Path) -> Vec<PathBuf> {
    WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|e| e.ok())
        .map(|entry| entry.into_path())
        .filter(|path| path.is_file())
        .filter(|path| path.extension().and_then(|s| s.to_str()) == Some("json"))
        .filter(|path| path.file_name().and_then(|s| s.to_str()) != Some(DEFAULT_CONFIG_NAME))
        .collect()
}

fn output_path(out_dir: &Path, relative: &Path, target: Target) -> PathBuf {
    out_dir.join(relative).with_extension(target.extension())
}

fn compile_file(path: &Path, target: Target, config: &Config) -> Result<String> {
    let doc = Document::load(path.to_path_buf())?;
    let structure = doc.structure();

    let output = match target {
        Target::Markup => compile_markup(structure, &config.html),
        Target::Print => {
            let pages = config.paginator().paginate(&structure.nodes);
            compile_print(structure, &pages, &config.html)
        }
        Target::Json => to_json_pretty(structure),
    };

    debug!(path = %path.display(), target = ?target, bytes = output.len(), "Compiled agreement");

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_path_keeps_layout() {
        let path = output_path(
            Path::new("dist"),
            Path::new("leases/flat.json"),
            Target::Print,
        );
        assert_eq!(path, PathBuf::from("dist/leases/flat.html"));
    }

    #[test]
    fn test_config_file_is_not_an_agreement() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(DEFAULT_CONFIG_NAME), "{}").unwrap();
        fs::write(dir.path().join("lease.json"), "{}").unwrap();

        let files = find_agreement_files(dir.path());
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("lease.json"));
    }

    #[test]
    fn test_compile_print_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lease.json");
        Document::create(path.clone(), "lease").save().unwrap();

        let html = compile_file(&path, Target::Print, &Config::default()).unwrap();
        assert!(html.contains("LEASE AGREEMENT"));
        assert!(html.contains("data-page=\"1\""));
    }
}
