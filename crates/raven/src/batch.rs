//! Batch conversion of files matched by a glob pattern.
//!
//! Files are converted in parallel on rayon's pool. A failure on one file
//! is recorded in the [`BatchReport`] and does not stop the others.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use log::{debug, warn};
use parking_lot::Mutex;
use rayon::prelude::*;
use rustc_hash::FxHashSet;

use crate::{convert_file, ConvertOptions, Direction, Error, Result};

/// One file to convert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchJob {
    pub input: PathBuf,
    pub output: PathBuf,
}

/// Outcome of a batch run.
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Number of files converted successfully.
    pub converted: usize,
    /// Files that failed, ordered by input path.
    pub failures: Vec<Error>,
}

impl BatchReport {
    /// Check if every file converted successfully.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Total number of files attempted.
    pub fn total(&self) -> usize {
        self.converted + self.failures.len()
    }
}

/// Expand a glob pattern into the regular files it matches, sorted.
///
/// A pattern without wildcards names a single file.
pub fn expand_inputs(pattern: &str) -> Result<Vec<PathBuf>> {
    let paths = glob::glob(pattern).map_err(|source| Error::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut inputs = Vec::new();
    for entry in paths {
        let path = entry.map_err(|e| Error::Io {
            path: e.path().to_path_buf(),
            source: e.into_error(),
        })?;
        if path.is_file() {
            inputs.push(path);
        }
    }

    if inputs.is_empty() {
        return Err(Error::NoMatches(pattern.to_string()));
    }
    inputs.sort();
    Ok(inputs)
}

/// Output path for one input: every `*` in the template is replaced by the
/// input's file stem. A template without `*` is used as is.
pub fn output_path(template: &str, input: &Path) -> PathBuf {
    if !template.contains('*') {
        return PathBuf::from(template);
    }
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    PathBuf::from(template.replace('*', &stem))
}

/// Pair every file matching `pattern` with its output path.
pub fn plan(pattern: &str, template: &str) -> Result<Vec<BatchJob>> {
    let jobs: Vec<BatchJob> = expand_inputs(pattern)?
        .into_iter()
        .map(|input| BatchJob {
            output: output_path(template, &input),
            input,
        })
        .collect();

    if shares_output(&jobs) {
        warn!(
            "{} inputs share outputs under {}; converting in order, the last match wins",
            jobs.len(),
            template
        );
    }
    debug!("{} files match {}", jobs.len(), pattern);

    Ok(jobs)
}

/// Check if two jobs write the same output path.
pub fn shares_output(jobs: &[BatchJob]) -> bool {
    let mut outputs = FxHashSet::default();
    !jobs.iter().all(|job| outputs.insert(job.output.as_path()))
}

/// Convert every job in parallel.
///
/// Jobs that share an output path are converted sequentially in order
/// instead, so the last of them is the one left on disk.
///
/// `progress` is called once per finished job with its result.
pub fn run<F>(jobs: &[BatchJob], direction: Direction, options: &ConvertOptions, progress: F) -> BatchReport
where
    F: FnMut(&BatchJob, std::result::Result<(), &Error>) + Send,
{
    let converted = AtomicUsize::new(0);
    let failures = Mutex::new(Vec::new());
    let progress = Mutex::new(progress);

    let convert = |job: &BatchJob| {
        let result = convert_file(&job.input, &job.output, direction, options);

        (*progress.lock())(job, result.as_ref().map(|_| ()));

        match result {
            Ok(()) => {
                converted.fetch_add(1, Ordering::Relaxed);
            }
            Err(e) => failures.lock().push(e),
        }
    };

    if shares_output(jobs) {
        jobs.iter().for_each(convert);
    } else {
        jobs.par_iter().for_each(convert);
    }

    let mut failures = failures.into_inner();
    failures.sort_by(|a, b| a.path().cmp(&b.path()));

    BatchReport {
        converted: converted.into_inner(),
        failures,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_output_path() {
        let input = Path::new("json/herostat.json");
        assert_eq!(output_path("data/*.xmlb", input), PathBuf::from("data/herostat.xmlb"));
        assert_eq!(output_path("*/*.engb", input), PathBuf::from("herostat/herostat.engb"));
        assert_eq!(output_path("out.xmlb", input), PathBuf::from("out.xmlb"));
    }

    #[test]
    fn test_expand_inputs() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.json"), "{}").unwrap();
        fs::write(dir.path().join("a.json"), "{}").unwrap();
        fs::write(dir.path().join("c.xml"), "<c/>").unwrap();
        fs::create_dir(dir.path().join("d.json")).unwrap();

        let pattern = format!("{}/*.json", dir.path().display());
        let inputs = expand_inputs(&pattern).unwrap();
        assert_eq!(inputs, vec![dir.path().join("a.json"), dir.path().join("b.json")]);
    }

    #[test]
    fn test_no_matches() {
        let dir = TempDir::new().unwrap();
        let pattern = format!("{}/*.xmlb", dir.path().display());

        let err = expand_inputs(&pattern).unwrap_err();
        assert!(matches!(err, Error::NoMatches(ref p) if *p == pattern));
        assert!(matches!(expand_inputs("[unclosed"), Err(Error::Pattern { .. })));
    }

    #[test]
    fn test_run_continues_after_failure() {
        let dir = TempDir::new().unwrap();
        let src = dir.path().join("json");
        fs::create_dir(&src).unwrap();
        fs::write(src.join("hero.json"), r#"{"stats": {"name": "storm", "level": 7}}"#).unwrap();
        fs::write(src.join("menu.json"), r#"{"menu": {"title": "Main"}}"#).unwrap();
        fs::write(src.join("broken.json"), r#"{"a": {}, "b": {}}"#).unwrap();

        let jobs = plan(
            &format!("{}/*.json", src.display()),
            &format!("{}/data/*.xmlb", dir.path().display()),
        )
        .unwrap();
        assert_eq!(jobs.len(), 3);

        let mut seen = Vec::new();
        let report = run(&jobs, Direction::Compile, &ConvertOptions::default(), |job, result| {
            seen.push((job.input.clone(), result.is_ok()));
        });

        assert_eq!(report.converted, 2);
        assert_eq!(report.total(), 3);
        assert!(!report.is_complete());
        assert_eq!(report.failures[0].path(), Some(src.join("broken.json").as_path()));

        seen.sort();
        assert_eq!(
            seen,
            vec![
                (src.join("broken.json"), false),
                (src.join("hero.json"), true),
                (src.join("menu.json"), true),
            ]
        );

        let data = dir.path().join("data");
        assert!(data.join("hero.xmlb").is_file());
        assert!(data.join("menu.xmlb").is_file());
        assert!(!data.join("broken.xmlb").exists());
    }

    #[test]
    fn test_shared_output_keeps_last_match() {
        let dir = TempDir::new().unwrap();
        for name in ["alpha", "bravo", "charlie", "delta"] {
            fs::write(dir.path().join(format!("{name}.json")), format!(r#"{{"{name}": {{}}}}"#)).unwrap();
        }
        let output = dir.path().join("out/all.xmlb");

        let jobs = plan(&format!("{}/*.json", dir.path().display()), &output.to_string_lossy()).unwrap();
        assert!(shares_output(&jobs));

        let mut order = Vec::new();
        let report = run(&jobs, Direction::Compile, &ConvertOptions::default(), |job, _| {
            order.push(job.input.clone());
        });

        assert_eq!(report.converted, 4);
        assert_eq!(order, jobs.iter().map(|job| job.input.clone()).collect::<Vec<_>>());
        let node = crate::read_tree(&output, crate::Format::Binary).unwrap();
        assert_eq!(node.name, "delta");
    }

    #[test]
    fn test_distinct_outputs_do_not_share() {
        let jobs = vec![
            BatchJob {
                input: PathBuf::from("a.json"),
                output: PathBuf::from("a.xmlb"),
            },
            BatchJob {
                input: PathBuf::from("b.json"),
                output: PathBuf::from("b.xmlb"),
            },
        ];
        assert!(!shares_output(&jobs));
        assert!(!shares_output(&[]));
    }

    #[test]
    fn test_run_round_trip() {
        let dir = TempDir::new().unwrap();
        let options = ConvertOptions::default();
        let node = raven_xmlb::Node::new("talents")
            .child(raven_xmlb::Node::new("talent").attr("name", "flight").attr("rank", 2));
        crate::write_tree(&node, &dir.path().join("talents.xmlb"), crate::Format::Binary, &options).unwrap();

        let decompile = plan(
            &format!("{}/*.xmlb", dir.path().display()),
            &format!("{}/xml/*.xml", dir.path().display()),
        )
        .unwrap();
        let report = run(&decompile, Direction::Decompile, &options, |_, _| {});
        assert!(report.is_complete());

        let compile = plan(
            &format!("{}/xml/*.xml", dir.path().display()),
            &format!("{}/bin/*.xmlb", dir.path().display()),
        )
        .unwrap();
        let report = run(&compile, Direction::Compile, &options, |_, _| {});
        assert_eq!(report.converted, 1);

        assert_eq!(
            fs::read(dir.path().join("talents.xmlb")).unwrap(),
            fs::read(dir.path().join("bin/talents.xmlb")).unwrap()
        );
    }
}
