use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Subcommand};
use serde_json::json;

use crate::applications::{applications_csv, filter_applications, Application, SortConfig, SortDirection, SortKey};
use crate::cli::utils::{fields, output_success};
use crate::cli::OutputFormat;

#[derive(Subcommand)]
pub enum ApplicationsCommands {
    #[command(about = "List applications, optionally filtered and sorted")]
    List {
        #[command(flatten)]
        view: ViewArgs,
    },

    #[command(about = "Export applications as CSV")]
    Export {
        #[command(flatten)]
        view: ViewArgs,
        #[arg(long, short, help = "Write to this file instead of stdout")]
        output: Option<PathBuf>,
    },
}

#[derive(Args)]
pub struct ViewArgs {
    #[arg(help = "JSON file holding an array of application records")]
    pub file: PathBuf,
    #[arg(long, short, help = "Match company or job title (case-insensitive)")]
    pub query: Option<String>,
    #[arg(long, help = "Column to sort by, e.g. application_date or priority")]
    pub sort: Option<SortKey>,
    #[arg(long, requires = "sort", help = "Sort descending")]
    pub descending: bool,
}

impl ViewArgs {
    async fn load(&self) -> anyhow::Result<Vec<Application>> {
        let raw = tokio::fs::read_to_string(&self.file)
            .await
            .with_context(|| format!("failed to read {}", self.file.display()))?;
        let applications: Vec<Application> =
            serde_json::from_str(&raw).with_context(|| format!("{} is not a list of applications", self.file.display()))?;

        let mut rows = match self.query.as_deref() {
            Some(query) => filter_applications(&applications, query),
            None => applications,
        };

        if let Some(key) = self.sort {
            let direction = if self.descending {
                SortDirection::Descending
            } else {
                SortDirection::Ascending
            };
            SortConfig::new(key, direction).apply(&mut rows);
        }
        Ok(rows)
    }
}

pub async fn handle(cmd: ApplicationsCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    match cmd {
        ApplicationsCommands::List { view } => {
            let rows = view.load().await?;

            match output_format {
                OutputFormat::Json => output_success(
                    &output_format,
                    &format!("{} applications", rows.len()),
                    fields(json!({ "applications": rows })),
                ),
                OutputFormat::Text => {
                    for app in &rows {
                        println!(
                            "{:<6} {:<24} {:<28} {}  {}",
                            app.id,
                            app.company_name,
                            app.job_title,
                            app.application_date,
                            app.status
                        );
                    }
                    output_success(&output_format, &format!("{} applications", rows.len()), Default::default())
                }
            }
        }
        ApplicationsCommands::Export { view, output } => {
            let rows = view.load().await?;
            let csv = applications_csv(&rows);

            match output {
                Some(path) => {
                    tokio::fs::write(&path, csv)
                        .await
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    output_success(
                        &output_format,
                        &format!("Exported {} applications", rows.len()),
                        fields(json!({ "path": path.display().to_string() })),
                    )
                }
                None => {
                    println!("{}", csv);
                    Ok(())
                }
            }
        }
    }
}
