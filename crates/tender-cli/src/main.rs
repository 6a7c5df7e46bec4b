//! tender CLI - generate tender submission PDFs from project records

use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, bail, Context, Result};
use chrono::NaiveDate;
use clap::{ArgAction, Args, Parser, Subcommand};
use log::debug;

use tender::{
    Canvas, DirProjectSource, DrawOp, HttpProjectSource, ProjectSource, RecordingCanvas,
    TenderAssembler, TenderConfig,
};

#[derive(Parser)]
#[command(name = "tender")]
#[command(version)]
#[command(about = "Generate tender submission PDFs from project records", long_about = None)]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a submission and write it to a directory
    Generate {
        /// Project id
        #[arg(value_name = "ID")]
        project_id: String,

        #[command(flatten)]
        source: SourceArgs,

        /// Output directory
        #[arg(short, long, value_name = "DIR", default_value = ".")]
        out: PathBuf,
    },

    /// Lay out a submission without writing it and list its pages
    Layout {
        /// Project id
        #[arg(value_name = "ID")]
        project_id: String,

        #[command(flatten)]
        source: SourceArgs,
    },
}

#[derive(Args)]
struct SourceArgs {
    /// Base URL of the console API
    #[arg(long, value_name = "URL", env = "TENDER_API_BASE")]
    api_base: Option<String>,

    /// Directory of <ID>.json project records
    #[arg(long, value_name = "DIR", conflicts_with = "api_base")]
    records_dir: Option<PathBuf>,

    /// Configuration file (JSON)
    #[arg(short, long, value_name = "FILE", env = "TENDER_CONFIG")]
    config: Option<PathBuf>,

    /// Logo image, replaces the configured one
    #[arg(long, value_name = "FILE")]
    logo: Option<PathBuf>,

    /// Submission date (YYYY-MM-DD), today if not given
    #[arg(long, value_name = "DATE")]
    date: Option<NaiveDate>,
}

impl SourceArgs {
    fn load_config(&self) -> Result<TenderConfig> {
        let mut config = match &self.config {
            Some(path) => TenderConfig::from_json_file(path)
                .with_context(|| format!("loading {}", path.display()))?,
            None => TenderConfig::default(),
        };
        if let Some(logo) = &self.logo {
            config.logo_path = Some(logo.clone());
        }
        Ok(config)
    }

    fn project_source(&self) -> Result<Box<dyn ProjectSource>> {
        match (&self.records_dir, &self.api_base) {
            (Some(dir), _) => Ok(Box::new(DirProjectSource::new(dir))),
            (None, Some(base)) => Ok(Box::new(HttpProjectSource::new(base))),
            (None, None) => bail!("no record source: pass --api-base or --records-dir"),
        }
    }

    fn assembler(&self) -> Result<TenderAssembler> {
        Ok(TenderAssembler::new(
            self.load_config()?,
            self.project_source()?,
        ))
    }

    fn date(&self) -> NaiveDate {
        self.date
            .unwrap_or_else(|| chrono::Local::now().date_naive())
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    if let Err(e) = run(cli.command).await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
}

async fn run(command: Commands) -> Result<()> {
    match command {
        Commands::Generate {
            project_id,
            source,
            out,
        } => cmd_generate(&project_id, &source, out).await,
        Commands::Layout { project_id, source } => cmd_layout(&project_id, &source).await,
    }
}

async fn cmd_generate(project_id: &str, source: &SourceArgs, out: PathBuf) -> Result<()> {
    let assembler = source.assembler()?;

    // failures are already reported by the assembler
    let artifact = assembler
        .generate_on(project_id, source.date())
        .await
        .ok_or_else(|| anyhow!("no submission generated for project {project_id}"))?;

    fs::create_dir_all(&out).with_context(|| format!("creating {}", out.display()))?;
    let path = out.join(&artifact.file_name);
    fs::write(&path, &artifact.bytes).with_context(|| format!("writing {}", path.display()))?;

    debug!("Wrote {} bytes", artifact.bytes.len());
    println!("{} ({} pages)", path.display(), artifact.page_count);
    Ok(())
}

async fn cmd_layout(project_id: &str, source: &SourceArgs) -> Result<()> {
    let assembler = source.assembler()?;
    let config = assembler.config();
    let mut canvas = RecordingCanvas::new(config.page.width, config.page.height);

    let pages = assembler
        .render_into(&mut canvas, project_id, source.date())
        .await?;

    let heading_size = config.typography.heading_size;
    let title_size = config.typography.title_size;
    for page in 1..=pages {
        let titles: Vec<&str> = canvas
            .page(page)
            .iter()
            .filter_map(|op| match op {
                DrawOp::Text { text, style, .. }
                    if style.bold
                        && (style.size_pt == heading_size || style.size_pt == title_size) =>
                {
                    Some(text.as_str())
                }
                _ => None,
            })
            .collect();
        println!(
            "Page {page}: {} draw operations {}",
            canvas.page(page).len(),
            titles.join(" / ")
        );
    }
    println!("{} pages", canvas.page_count());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate() {
        let cli = Cli::try_parse_from([
            "tender",
            "generate",
            "42",
            "--records-dir",
            "records",
            "--date",
            "2024-03-05",
            "-o",
            "out",
            "-v",
        ])
        .unwrap();

        assert_eq!(cli.verbose, 1);
        match cli.command {
            Commands::Generate {
                project_id,
                source,
                out,
            } => {
                assert_eq!(project_id, "42");
                assert_eq!(out, PathBuf::from("out"));
                assert_eq!(source.date(), NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
                assert!(source.project_source().is_ok());
            }
            _ => panic!("expected generate"),
        }
    }

    #[test]
    fn test_logo_flag_overrides_config() {
        let dir = tempfile::tempdir().unwrap();
        let config_path = dir.path().join("tender.json");
        fs::write(&config_path, r#"{ "logoPath": "config-logo.png" }"#).unwrap();

        let cli = Cli::try_parse_from([
            "tender",
            "layout",
            "42",
            "--records-dir",
            "records",
            "--config",
            config_path.to_str().unwrap(),
            "--logo",
            "flag-logo.png",
        ])
        .unwrap();

        let Commands::Layout { source, .. } = cli.command else {
            panic!("expected layout");
        };
        let config = source.load_config().unwrap();
        assert_eq!(config.logo_path, Some(PathBuf::from("flag-logo.png")));
    }

    #[tokio::test]
    async fn test_generate_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let records = dir.path().join("records");
        fs::create_dir_all(&records).unwrap();
        fs::write(
            records.join("42.json"),
            r#"{ "id": 42, "projectName": "Riverside Kitchen" }"#,
        )
        .unwrap();
        let out = dir.path().join("out");

        let cli = Cli::try_parse_from([
            "tender",
            "generate",
            "42",
            "--records-dir",
            records.to_str().unwrap(),
            "--date",
            "2024-03-05",
            "--out",
            out.to_str().unwrap(),
        ])
        .unwrap();
        run(cli.command).await.unwrap();

        assert!(out
            .join("Tender_Submission_Riverside_Kitchen_2024-03-05.pdf")
            .exists());
    }

    #[tokio::test]
    async fn test_generate_unknown_project_fails() {
        let dir = tempfile::tempdir().unwrap();
        let cli = Cli::try_parse_from([
            "tender",
            "generate",
            "99",
            "--records-dir",
            dir.path().to_str().unwrap(),
            "--out",
            dir.path().to_str().unwrap(),
        ])
        .unwrap();
        assert!(run(cli.command).await.is_err());
    }
}
