use crate::caption;
use crate::config::{Config, Mode};
use crate::error::{Error, Result};
use crate::pdf;
use crate::qr;
use log::{error, warn};
use rayon::prelude::*;
use rusttype::Font;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// A label that could not be turned into an image, with the reason.
#[derive(Debug)]
pub struct Failure {
    pub label: String,
    pub error: Error,
}

/// Outcome of a run. Only per-label failures end up here; anything that
/// stops the whole run is returned as an `Err` instead.
#[derive(Debug, Default)]
pub struct Report {
    pub written: Vec<PathBuf>,
    pub failures: Vec<Failure>,
}

impl Report {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Generates the QR code for one label and bakes its caption in. An image
/// whose caption could not be added is removed again.
fn process_label(label: &str, destination: &Path, font: &Font, config: &Config) -> Result<PathBuf> {
    let path = qr::generate_png(label, destination, config)?;
    if let Err(e) = caption::add_caption(&path, &config.caption(label), font, config) {
        if let Err(remove) = fs::remove_file(&path) {
            warn!("Could not remove uncaptioned {}: {remove}", path.display());
        }
        return Err(e);
    }
    Ok(path)
}

/// Drops repeated labels, keeping the first occurrence. Two workers writing
/// the same file would race.
fn unique_labels(labels: &[String]) -> Vec<&str> {
    let mut seen = HashSet::new();
    labels
        .iter()
        .map(String::as_str)
        .filter(|&label| {
            let first = seen.insert(label);
            if !first {
                warn!("Duplicate label {label:?} skipped");
            }
            first
        })
        .collect()
}

fn run_png(labels: &[String], destination: &Path, config: &Config) -> Result<Report> {
    let font = caption::resolve_font(config)?;

    fs::create_dir_all(destination).map_err(|e| {
        Error::InvalidConfiguration(format!(
            "cannot create destination {}: {e}",
            destination.display()
        ))
    })?;

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.jobs)
        .build()
        .map_err(|e| Error::InvalidConfiguration(format!("cannot start worker pool: {e}")))?;

    let labels = unique_labels(labels);
    let results: Vec<(&str, Result<PathBuf>)> = pool.install(|| {
        labels
            .par_iter()
            .map(|&label| (label, process_label(label, destination, &font, config)))
            .collect()
    });

    let mut report = Report::default();
    for (label, result) in results {
        match result {
            Ok(path) => report.written.push(path),
            Err(e) if !e.is_per_label() => return Err(e),
            Err(e) => {
                error!("{label}: {e}");
                report.failures.push(Failure {
                    label: label.to_string(),
                    error: e,
                });
            }
        }
    }

    Ok(report)
}

/// Runs the mode selected in `config` over `labels`.
pub fn run(config: &Config, labels: &[String]) -> Result<Report> {
    match &config.mode {
        Mode::Png { destination } => run_png(labels, destination, config),
        Mode::Pdf { path } => {
            pdf::build(labels, path, config)?;
            Ok(Report {
                written: vec![path.clone()],
                failures: Vec::new(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::qr::generate_qr_data;
    use crate::qr::tests::{config, sample_modules};
    use crate::source::parse_labels;
    use image::GenericImageView;
    use qrcode::EcLevel;

    fn png_config(destination: &Path, argv: &[&str]) -> Config {
        let dest = destination.to_str().unwrap();
        let mut full = vec!["-d", dest, "-w", "200", "--jobs", "2"];
        full.extend_from_slice(argv);
        config(&full)
    }

    fn file_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<_> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().into_string().unwrap())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn default_flags_caption_every_label() {
        let dir = tempfile::tempdir().unwrap();
        let config = config(&["-d", dir.path().to_str().unwrap()]);
        let labels = parse_labels("A\r\nB\r\nC");

        let report = run(&config, &labels).unwrap();
        assert!(report.is_success());
        assert_eq!(report.written.len(), 3);

        for path in &report.written {
            let image = image::open(path).unwrap();
            assert_eq!(image.dimensions(), (400, 440));
        }
    }

    #[test]
    fn png_mode_writes_one_decodable_file_per_label() {
        let dir = tempfile::tempdir().unwrap();
        let config = png_config(dir.path(), &["-p", "X-"]);
        let labels = parse_labels("A\r\nB\r\nC");

        let report = run(&config, &labels).unwrap();
        assert!(report.is_success());
        assert_eq!(report.written.len(), 3);

        for label in ["A", "B", "C"] {
            let path = dir.path().join(format!("{label}.png"));
            let image = image::open(&path).unwrap();
            assert_eq!(image.dimensions(), (200, 220));

            let expected = generate_qr_data(&format!("X-{label}"), EcLevel::H).unwrap();
            let qr_part = image.crop_imm(0, 0, 200, 200).to_rgba8();
            assert_eq!(sample_modules(&qr_part, 200, expected.len()), expected);
        }

        assert_eq!(file_names(dir.path()), ["A.png", "B.png", "C.png"]);
    }

    #[test]
    fn rerun_and_duplicates_overwrite_instead_of_adding() {
        let dir = tempfile::tempdir().unwrap();
        let config = png_config(dir.path(), &[]);
        let labels = parse_labels("A\nA\nB\n");

        let report = run(&config, &labels).unwrap();
        assert_eq!(report.written.len(), 2);
        run(&config, &labels).unwrap();

        assert_eq!(file_names(dir.path()), ["A.png", "B.png"]);
    }

    #[test]
    fn creates_missing_destination() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested/out");
        let config = png_config(&nested, &[]);

        run(&config, &["only".to_string()]).unwrap();
        assert!(nested.join("only.png").exists());
    }

    #[test]
    fn per_label_failures_are_collected() {
        let dir = tempfile::tempdir().unwrap();
        let config = png_config(dir.path(), &[]);

        let too_long = "x".repeat(4000);
        let labels = vec!["ok".to_string(), too_long.clone()];
        let report = run(&config, &labels).unwrap();

        assert!(!report.is_success());
        assert_eq!(report.written, [dir.path().join("ok.png")]);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].label, too_long);
        assert!(matches!(report.failures[0].error, Error::Encoding { .. }));
        assert_eq!(file_names(dir.path()), ["ok.png"]);
    }

    #[test]
    fn unusable_font_aborts_before_any_image_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("out");
        let mut config = png_config(&out, &[]);
        config.font = Some(dir.path().join("missing.ttf"));

        let err = run(&config, &["A".to_string(), "B".to_string()]).unwrap_err();
        assert!(matches!(err, Error::InvalidConfiguration(_)));
        assert!(!out.exists());
    }

    #[test]
    fn pdf_mode_writes_a_single_document() {
        let dir = tempfile::tempdir().unwrap();
        let pdf_path = dir.path().join("labels.pdf");
        let out = dir.path().join("png");
        let config = config(&[
            "--pdf",
            pdf_path.to_str().unwrap(),
            "-d",
            out.to_str().unwrap(),
        ]);
        let labels: Vec<String> = (1..=7).map(|i| format!("L{i}")).collect();

        let report = run(&config, &labels).unwrap();
        assert!(report.is_success());
        assert_eq!(report.written, [pdf_path.clone()]);
        assert!(pdf_path.exists());
        assert!(!out.exists(), "no PNG files in PDF mode");
    }
}
