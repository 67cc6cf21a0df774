//! Check command - reports mock casts and optionally rewrites them in place

use crate::output::json::JsonFormatter;
use crate::output::pretty::PrettyFormatter;
use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use globset::GlobSet;
use mocklint_core::analysis::AnalysisEngine;
use mocklint_core::config::load_config_or_default_with_warnings;
use mocklint_core::diagnostic::Diagnostic;
use mocklint_core::fixer::fix_source;
use mocklint_core::rules::Severity;
use rayon::prelude::*;
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use walkdir::WalkDir;

const SUPPORTED_EXTENSIONS: &[&str] = &["js", "jsx", "ts", "tsx", "mjs", "cjs", "mts", "cts"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Pretty,
    Text,
    Json,
    Ndjson,
}

#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to file or directory to analyze
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Rewrite fixable casts in place
    #[arg(long)]
    pub fix: bool,

    /// Output format for diagnostics
    #[arg(short, long, value_enum, default_value = "pretty")]
    pub format: OutputFormat,

    /// Fail on warnings (exit code 1)
    #[arg(long)]
    pub fail_on_warnings: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,
}

/// Outcome of analyzing (and possibly fixing) one file.
struct FileReport {
    path: String,
    source: String,
    diagnostics: Vec<Diagnostic>,
    fixes_applied: usize,
}

/// Files matching the config's `exclude` globs, relative to `base`.
struct Exclusions {
    matcher: GlobSet,
    base: PathBuf,
}

impl Exclusions {
    fn is_excluded(&self, path: &Path) -> bool {
        if self.matcher.is_empty() {
            return false;
        }
        let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
        let relative = absolute.strip_prefix(&self.base).unwrap_or(path);
        self.matcher.is_match(relative)
    }
}

impl CheckArgs {
    pub fn run(&self) -> Result<ExitCode> {
        self.configure_colors();

        let config_result = load_config_or_default_with_warnings(&self.path)
            .context("failed to load mocklint configuration")?;
        for warning in &config_result.warnings {
            eprintln!("{} {}", "warning:".yellow().bold(), warning);
        }

        let exclusions = Exclusions {
            matcher: config_result.config.exclude_matcher()?,
            base: match config_result.base_dir() {
                Some(dir) => dir.to_path_buf(),
                None => std::path::absolute(search_root(&self.path))?,
            },
        };

        let engine = AnalysisEngine::with_config(&config_result.config);
        for warning in engine.config_warnings() {
            eprintln!("{} {}", "warning:".yellow().bold(), warning);
        }

        let files = discover_files(&self.path, &exclusions)?;
        tracing::info!(files = files.len(), fix = self.fix, "starting analysis");

        let reports: Vec<FileReport> = files
            .par_iter()
            .map(|file| self.process_file(&engine, file))
            .collect::<Result<Vec<_>>>()?
            .into_iter()
            .flatten()
            .collect();

        if self.fix {
            report_fixes(&reports);
        }

        let total_files = reports.len();
        let mut sources = HashMap::new();
        let mut diagnostics = Vec::new();
        for report in reports {
            diagnostics.extend(report.diagnostics);
            sources.insert(report.path, report.source);
        }

        let analyzed_path = self.path.to_string_lossy();
        match self.format {
            OutputFormat::Json => {
                let formatter = JsonFormatter::with_registry(engine.registry());
                println!("{}", formatter.format(&diagnostics, total_files, &analyzed_path)?);
            }
            OutputFormat::Ndjson => {
                let formatter = JsonFormatter::with_registry(engine.registry());
                let mut stdout = io::stdout().lock();
                formatter.format_ndjson(&diagnostics, total_files, &analyzed_path, &mut stdout)?;
            }
            OutputFormat::Text => print!("{}", format_text(&diagnostics)),
            OutputFormat::Pretty => {
                if total_files == 0 {
                    println!("No JavaScript/TypeScript files found.");
                }
                print!("{}", PrettyFormatter::with_sources(sources).format(&diagnostics));
            }
        }

        Ok(self.exit_code(&diagnostics))
    }

    /// Returns `None` for files that cannot be read; they are logged and skipped.
    fn process_file(&self, engine: &AnalysisEngine, path: &Path) -> Result<Option<FileReport>> {
        let name = path.to_string_lossy().to_string();
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(error) => {
                tracing::warn!(file = %name, %error, "skipping unreadable file");
                return Ok(None);
            }
        };

        if !self.fix {
            let diagnostics = engine.analyze_source(&name, &source);
            return Ok(Some(FileReport {
                path: name,
                source,
                diagnostics,
                fixes_applied: 0,
            }));
        }

        let result = fix_source(engine, &name, &source)?;
        if result.changed() {
            fs::write(path, &result.output)
                .with_context(|| format!("failed to write fixes to {}", name))?;
            tracing::debug!(file = %name, fixes = result.fixes_applied, passes = result.passes, "wrote fixes");
        }

        Ok(Some(FileReport {
            path: name,
            source: result.output,
            diagnostics: result.diagnostics,
            fixes_applied: result.fixes_applied,
        }))
    }

    fn exit_code(&self, diagnostics: &[Diagnostic]) -> ExitCode {
        let has_errors = diagnostics.iter().any(|d| d.severity == Severity::Error);
        let has_warnings = diagnostics.iter().any(|d| d.severity == Severity::Warning);

        if has_errors || (has_warnings && self.fail_on_warnings) {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        }
    }

    fn configure_colors(&self) {
        let no_color_env = std::env::var_os("NO_COLOR").is_some();
        if self.no_color || no_color_env {
            colored::control::set_override(false);
        }
    }
}

fn report_fixes(reports: &[FileReport]) {
    let fixed: Vec<&FileReport> = reports.iter().filter(|r| r.fixes_applied > 0).collect();
    let total: usize = fixed.iter().map(|r| r.fixes_applied).sum();
    if total > 0 {
        eprintln!(
            "{} {} fix(es) in {} file(s)",
            "fixed:".green().bold(),
            total,
            fixed.len()
        );
    }
}

fn format_text(diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();

    for diag in diagnostics {
        let severity_str = match diag.severity {
            Severity::Error => "error".red().bold(),
            Severity::Warning => "warning".yellow().bold(),
            Severity::Info => "info".blue().bold(),
            Severity::Hint => "hint".cyan().bold(),
        };

        out.push_str(&format!(
            "{}:{}:{}: {} [{}]: {}\n",
            diag.file,
            diag.line,
            diag.column,
            severity_str,
            diag.rule_id.dimmed(),
            diag.message
        ));

        if let Some(suggestion) = &diag.suggestion {
            out.push_str(&format!("  {} {}\n", "suggestion:".green(), suggestion));
        }
    }

    if !diagnostics.is_empty() {
        let error_count = diagnostics.iter().filter(|d| d.severity == Severity::Error).count();
        let warning_count = diagnostics.iter().filter(|d| d.severity == Severity::Warning).count();
        out.push_str(&format!(
            "\nFound {} error(s) and {} warning(s)\n",
            error_count, warning_count
        ));
    }

    out
}

/// Directory used for config lookup and relative exclude matching.
fn search_root(path: &Path) -> &Path {
    if path.is_file() {
        path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."))
    } else {
        path
    }
}

fn discover_files(path: &Path, exclusions: &Exclusions) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        anyhow::bail!("Path does not exist: {}", path.display());
    }

    if path.is_file() {
        if is_supported_file(path) && !exclusions.is_excluded(path) {
            return Ok(vec![path.to_path_buf()]);
        }
        return Ok(vec![]);
    }

    let files = WalkDir::new(path)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_hidden(e))
        .filter_map(|e| match e {
            Ok(entry) => Some(entry),
            Err(error) => {
                tracing::warn!(%error, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| is_supported_file(e.path()))
        .filter(|e| {
            let excluded = exclusions.is_excluded(e.path());
            if excluded {
                tracing::trace!(file = %e.path().display(), "excluded by config");
            }
            !excluded
        })
        .map(|e| e.path().to_path_buf())
        .collect();

    Ok(files)
}

fn is_supported_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| SUPPORTED_EXTENSIONS.contains(&ext))
        .unwrap_or(false)
}

fn is_hidden(entry: &walkdir::DirEntry) -> bool {
    if entry.depth() == 0 {
        return false;
    }
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.') || name == "node_modules")
        .unwrap_or(false)
}
