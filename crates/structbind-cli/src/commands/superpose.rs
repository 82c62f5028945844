use super::open_session;
use crate::cli::SuperposeArgs;
use crate::config::PartialSuperposeConfig;
use crate::error::Result;
use crate::utils::progress::CliProgressHandler;
use anyhow::Context;
use std::path::Path;
use structbind::engine::progress::ProgressReporter;
use structbind::engine::store::AssociationStore;
use structbind::workflows::superpose::{self, FitRange, SuperposePlan};
use tokio::sync::watch;
use tracing::{info, warn};

pub async fn run(args: SuperposeArgs) -> Result<()> {
    let partial_config = match &args.config {
        Some(path) => PartialSuperposeConfig::from_file(path)?,
        None => PartialSuperposeConfig::default(),
    };
    info!("Merging configuration from file and CLI arguments...");
    let final_config = partial_config.merge_with_cli(&args)?;

    let session = open_session(&args.input)?;

    let progress_handler = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress_handler.get_callback());

    let (cancel_tx, cancel_rx) = watch::channel(false);
    let interrupt = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("Interrupt received, cancelling.");
            let _ = cancel_tx.send(true);
        }
    });

    info!("Invoking the core superposition workflow...");
    let result = superpose::run(
        &session.store,
        &session.registry,
        &session.alignment,
        &final_config,
        &reporter,
        Some(cancel_rx),
    )
    .await;
    interrupt.abort();
    let plan = result?;

    print_plan(&plan, &session.store);

    if let Some(path) = &args.csv {
        write_csv(&plan, path)?;
        println!("Fit columns written to: {}", path.display());
    }

    Ok(())
}

fn print_plan(plan: &SuperposePlan, store: &AssociationStore) {
    let reference = store
        .entry(plan.reference)
        .map_or_else(|| "?".to_string(), |entry| entry.id().to_string());
    println!(
        "Reference structure: {} ({} fit column(s))",
        reference,
        plan.columns.len()
    );

    for fit in &plan.fits {
        let ranges: Vec<String> = fit.ranges.iter().map(format_range).collect();
        println!(
            "  {:<10} {:<10} {}",
            fit.entry.id(),
            fit.record.kind.to_string(),
            ranges.join(", ")
        );
    }
}

fn format_range(range: &FitRange) -> String {
    let chain = range.chain.as_deref().unwrap_or("-");
    if range.start == range.end {
        format!("{}:{}", chain, range.start)
    } else {
        format!("{}:{}-{}", chain, range.start, range.end)
    }
}

/// One row per selected column (1-based), one residue-number column per structure.
fn write_csv(plan: &SuperposePlan, path: &Path) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("Failed to create CSV file {}", path.display()))?;

    let mut header = vec!["column".to_string()];
    header.extend(plan.fits.iter().map(|fit| fit.entry.id().to_string()));
    writer.write_record(&header).context("Failed to write CSV header")?;

    for &column in &plan.columns {
        let mut row = vec![(column + 1).to_string()];
        row.extend(plan.fits.iter().map(|fit| {
            fit.record
                .residue_at(column)
                .map_or_else(String::new, |residue| residue.to_string())
        }));
        writer.write_record(&row).context("Failed to write CSV row")?;
    }

    writer.flush().context("Failed to flush CSV file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use crate::error::CliError;
    use clap::Parser;
    use structbind::engine::error::EngineError;
    use std::fs;
    use tempfile::TempDir;

    const ALIGNMENT: &str = ">s1\nACDEF-GHIK\n>s2\nACDEFGGHIK\n";
    const MANIFEST: &str = r#"
[[structure]]
id = "1AAA"
file = "1aaa.cif"

[[structure.mapping]]
sequence = "s1"
chain = "A"
first-residue = 10

[[structure]]
id = "2BBB"
file = "2bbb.cif"

[[structure.mapping]]
sequence = "s2"
chain = "B"
first-residue = 1
"#;

    fn args_for(dir: &TempDir, extra: &[&str]) -> SuperposeArgs {
        let alignment = dir.path().join("aln.fasta");
        let structures = dir.path().join("structures.toml");
        fs::write(&alignment, ALIGNMENT).unwrap();
        fs::write(&structures, MANIFEST).unwrap();

        let mut argv = vec![
            "structbind".to_string(),
            "superpose".to_string(),
            "-a".to_string(),
            alignment.to_string_lossy().into_owned(),
            "-s".to_string(),
            structures.to_string_lossy().into_owned(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        match Cli::parse_from(argv).command {
            Commands::Superpose(args) => args,
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn format_range_collapses_single_residues() {
        let single = FitRange {
            chain: None,
            start: 7,
            end: 7,
        };
        let span = FitRange {
            chain: Some("A".to_string()),
            start: 10,
            end: 18,
        };
        assert_eq!(format_range(&single), "-:7");
        assert_eq!(format_range(&span), "A:10-18");
    }

    #[tokio::test]
    async fn superpose_writes_fit_columns_to_csv() {
        let dir = tempfile::tempdir().unwrap();
        let csv_path = dir.path().join("fit.csv");
        let args = args_for(&dir, &["--csv", csv_path.to_str().unwrap()]);

        run(args).await.unwrap();

        let content = fs::read_to_string(&csv_path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "column,1AAA,2BBB");
        assert_eq!(lines[1], "1,10,1");
        assert_eq!(lines[6], "7,15,7");
        assert_eq!(lines.len(), 10);
    }

    #[tokio::test]
    async fn superpose_reports_too_few_columns() {
        let dir = tempfile::tempdir().unwrap();
        let args = args_for(&dir, &["--min-columns", "50"]);

        let result = run(args).await;

        assert!(matches!(
            result,
            Err(CliError::Core(EngineError::InsufficientColumns { .. }))
        ));
    }
}
