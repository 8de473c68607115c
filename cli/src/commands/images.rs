//! `kpod images` command.

use clap::{Args, ValueEnum};
use kpod_core::KpodConfig;
use kpod_runtime::{project_images, ImageHandle, ImageRecord, RuntimeAccessor, RuntimeOptions};
use tokio_util::sync::CancellationToken;

use crate::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ImagesFormat {
    Table,
    Json,
}

#[derive(Args)]
pub struct ImagesArgs {
    /// Only show image IDs (one per line)
    #[arg(short, long)]
    pub quiet: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = ImagesFormat::Table)]
    pub format: ImagesFormat,
}

pub async fn execute(args: ImagesArgs, config: &KpodConfig) -> Result<(), Box<dyn std::error::Error>> {
    let accessor = RuntimeAccessor::new(RuntimeOptions::from(config));
    let runtime = accessor.get().await;
    let images = runtime.image_runtime().get_images().await?;

    // --quiet: print only IDs
    if args.quiet {
        for image in &images {
            println!("{}", output::short_id(image.id()));
        }
        return Ok(());
    }

    let records = project_images(&images, &CancellationToken::new()).await?;

    match args.format {
        ImagesFormat::Json => println!("{}", serde_json::to_string_pretty(&records)?),
        ImagesFormat::Table => {
            let mut table = output::new_table(&["REPOSITORY", "TAG", "IMAGE ID", "CREATED", "SIZE"]);
            for row in records.iter().flat_map(ImageRow::from_record) {
                table.add_row(&[&row.repository, &row.tag, &row.id, &row.created, &row.size]);
            }
            println!("{table}");
        }
    }
    Ok(())
}

/// Pre-computed display fields for a single table row.
#[derive(Debug, PartialEq)]
struct ImageRow {
    repository: String,
    tag: String,
    id: String,
    created: String,
    size: String,
}

impl ImageRow {
    /// One row per name; an unnamed image gets a single `<none>` row.
    fn from_record(record: &ImageRecord) -> Vec<Self> {
        let id = output::short_id(&record.id).to_string();
        let created = output::format_ago(&record.created);
        let size = record
            .size
            .map(output::format_bytes)
            .unwrap_or_else(|| "<unknown>".to_string());

        let row = |(repository, tag): (String, String)| Self {
            repository,
            tag,
            id: id.clone(),
            created: created.clone(),
            size: size.clone(),
        };

        if record.names.is_empty() {
            return vec![row(("<none>".to_string(), "<none>".to_string()))];
        }
        record.names.iter().map(|n| row(split_name(n))).collect()
    }
}

/// Split "registry/repo:tag" into repository and tag.
fn split_name(name: &str) -> (String, String) {
    let slash = name.rfind('/').map(|i| i + 1).unwrap_or(0);
    match name[slash..].rfind(':') {
        Some(colon) => {
            let at = slash + colon;
            (name[..at].to_string(), name[at + 1..].to_string())
        }
        None => (name.to_string(), "<none>".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn record(names: &[&str], size: Option<u64>) -> ImageRecord {
        ImageRecord {
            id: "599aae32efb4cafebabe".to_string(),
            names: names.iter().map(|s| s.to_string()).collect(),
            digest: "sha256:feed".to_string(),
            created: Utc::now(),
            size,
        }
    }

    #[test]
    fn test_split_name() {
        assert_eq!(
            split_name("docker.io/library/alpine:3.18"),
            ("docker.io/library/alpine".to_string(), "3.18".to_string())
        );
        assert_eq!(
            split_name("localhost:5000/app"),
            ("localhost:5000/app".to_string(), "<none>".to_string())
        );
    }

    #[test]
    fn test_row_per_name() {
        let rows = ImageRow::from_record(&record(&["app:1", "app:latest"], Some(2048)));
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].tag, "1");
        assert_eq!(rows[1].tag, "latest");
        assert_eq!(rows[0].id, "599aae32efb4");
        assert_eq!(rows[0].size, "2.0 KB");
    }

    #[test]
    fn test_unnamed_and_unknown_size() {
        let rows = ImageRow::from_record(&record(&[], None));
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].repository, "<none>");
        assert_eq!(rows[0].size, "<unknown>");
    }
}
