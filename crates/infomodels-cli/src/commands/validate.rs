//! Validate command - check data files against the model and report errors.

use std::path::{Path, PathBuf};

use colored::Colorize;
use infomodels::{
    validate_file, CsvChecker, DataDirectory, ReportFormat, ReportRenderer, Sampler,
    SamplingStrategy,
};

use crate::config::Config;

/// File counts for one or more validated directories.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    pub files_checked: usize,
    pub files_with_errors: usize,
}

impl Summary {
    pub fn found_errors(&self) -> bool {
        self.files_with_errors > 0
    }

    fn add(&mut self, other: Summary) {
        self.files_checked += other.files_checked;
        self.files_with_errors += other.files_with_errors;
    }
}

/// Validate every listed data directory.
///
/// Returns true if any file produced a validation error. Every directory is
/// processed before the caller decides the exit status.
pub fn run(
    config: &Config,
    dirs: Vec<PathBuf>,
    sampling: SamplingStrategy,
    seed: Option<u64>,
    format: ReportFormat,
) -> Result<bool, Box<dyn std::error::Error>> {
    let mut sampler = match seed {
        Some(seed) => Sampler::with_seed(sampling, seed),
        None => Sampler::new(sampling),
    };
    let renderer = ReportRenderer::new(format);
    let checker = CsvChecker::new();

    let mut summary = Summary::default();
    for dir in &dirs {
        summary.add(validate_directory(config, dir, &checker, &mut sampler, &renderer)?);
    }

    tracing::info!(
        files = summary.files_checked,
        files_with_errors = summary.files_with_errors,
        "validation finished"
    );

    if format == ReportFormat::Table {
        println!();
        if summary.found_errors() {
            println!(
                "{} {} of {} files have errors",
                "Invalid:".red().bold(),
                summary.files_with_errors,
                summary.files_checked
            );
        } else {
            println!("{} {} files checked", "Valid:".green().bold(), summary.files_checked);
        }
    }

    Ok(summary.found_errors())
}

/// Validate each file listed in one directory's metadata and print its report.
///
/// The directory must carry a `metadata.csv` whose checksums match. Files
/// naming an unknown table, or that cannot be read at all, are skipped with
/// a warning.
pub fn validate_directory(
    config: &Config,
    dir: &Path,
    checker: &CsvChecker,
    sampler: &mut Sampler,
    renderer: &ReportRenderer,
) -> Result<Summary, Box<dyn std::error::Error>> {
    let data = DataDirectory::open(dir)?;
    data.verify()?;

    let (model_name, version) = config.model_for(&data).ok_or_else(|| {
        format!(
            "No data model for {}: pass --model or annotate the directory",
            dir.display()
        )
    })?;
    let model = config.load_model(&model_name, version.as_deref())?;
    let format = renderer.format();

    if format == ReportFormat::Table {
        println!(
            "{} {} against {} {}",
            "Validating".cyan().bold(),
            dir.display().to_string().white(),
            model.name,
            model.version
        );
    }

    let mut summary = Summary::default();
    for record in data.records() {
        let Some(table) = model.table(&record.table) else {
            tracing::warn!(
                file = %record.filename,
                table = %record.table,
                choices = %model.table_names().join(", "),
                "unknown table, skipping file"
            );
            continue;
        };

        tracing::info!(table = %table.name, file = %record.filename, "evaluating table");
        let path = data.file_path(record);
        let report = match validate_file(checker, &path, table, sampler) {
            Ok(report) => report,
            Err(e) => {
                tracing::warn!(file = %path.display(), error = %e, "could not validate file");
                continue;
            }
        };
        summary.files_checked += 1;

        let Some(rendered) = renderer.render(&report)? else {
            tracing::info!(table = %table.name, file = %record.filename, "everything looks good");
            continue;
        };
        summary.files_with_errors += 1;

        match format {
            ReportFormat::Json => println!("{}", rendered),
            ReportFormat::Table => {
                println!();
                println!(
                    "{} {} ({} errors)",
                    record.filename.yellow().bold(),
                    format!("[{}]", table.name).dimmed(),
                    report.total_occurrences().to_string().red()
                );
                print!("{}", rendered);
            }
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::fixtures::{config, data_dir};
    use std::fs;
    use tempfile::TempDir;

    fn check(config: &Config, dir: &Path) -> Result<Summary, Box<dyn std::error::Error>> {
        let mut sampler = Sampler::with_seed(SamplingStrategy::Distinct, 7);
        let renderer = ReportRenderer::new(ReportFormat::Json);
        validate_directory(config, dir, &CsvChecker::new(), &mut sampler, &renderer)
    }

    #[test]
    fn test_skips_unknown_table_and_unreadable_file() {
        let root = TempDir::new().unwrap();
        let config = config(root.path());
        let dir = data_dir(
            root.path(),
            "site",
            &[
                ("person.csv", "person_id\n1\n"),
                ("drug.csv", "drug_id\n1\n"),
                ("visit_occurrence.csv", ""),
            ],
        );

        let summary = check(&config, &dir).unwrap();
        assert_eq!(
            summary,
            Summary {
                files_checked: 1,
                files_with_errors: 0
            }
        );
    }

    #[test]
    fn test_counts_files_with_errors() {
        let root = TempDir::new().unwrap();
        let config = config(root.path());
        let dir = data_dir(
            root.path(),
            "site",
            &[
                ("person.csv", "person_id\nx\n2\n"),
                ("visit_occurrence.csv", "visit_occurrence_id,person_id\n10,1\n"),
            ],
        );

        let summary = check(&config, &dir).unwrap();
        assert_eq!(summary.files_checked, 2);
        assert_eq!(summary.files_with_errors, 1);
        assert!(summary.found_errors());
    }

    #[test]
    fn test_directory_without_metadata_is_an_error() {
        let root = TempDir::new().unwrap();
        let config = config(root.path());
        let dir = root.path().join("bare");
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("person.csv"), "person_id\nx\ny\n").unwrap();

        let err = check(&config, &dir).unwrap_err();
        assert!(err.to_string().contains("metadata.csv"));
    }

    #[test]
    fn test_changed_file_fails_checksum() {
        let root = TempDir::new().unwrap();
        let config = config(root.path());
        let dir = data_dir(root.path(), "site", &[("person.csv", "person_id\n1\n")]);
        fs::write(dir.join("person.csv"), "person_id\n2\n").unwrap();

        assert!(check(&config, &dir).is_err());
    }

    #[test]
    fn test_errors_in_any_directory_fail_the_run() {
        let root = TempDir::new().unwrap();
        let config = config(root.path());
        let clean = data_dir(root.path(), "clean", &[("person.csv", "person_id\n1\n")]);
        let broken = data_dir(root.path(), "broken", &[("person.csv", "person_id\nx\n")]);

        let run_over = |dirs: Vec<PathBuf>| {
            run(&config, dirs, SamplingStrategy::Distinct, Some(1), ReportFormat::Json).unwrap()
        };

        assert!(!run_over(vec![clean.clone()]));
        assert!(run_over(vec![broken.clone(), clean.clone()]));
        assert!(run_over(vec![clean, broken]));
    }
}
