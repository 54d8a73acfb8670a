//! Offline checker for phrase files.
//!
//! Loads a JSON phrase file the same way the bot does and reports blank
//! phrases, phrases too long for one Discord message, and repeats.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;

use nudge_bot::config::{MAX_MESSAGE_LENGTH, PhrasePool};

#[derive(Parser, Debug)]
#[command(name = "validate_phrases")]
#[command(about = "Checks a phrase file before handing it to nudge_bot")]
#[command(version)]
struct Args {
    /// Phrase files to check.
    #[arg(default_value = "phrases.json")]
    files: Vec<PathBuf>,

    /// Write the built-in phrases to this path instead of checking anything.
    #[arg(long, value_name = "PATH")]
    write_builtin: Option<PathBuf>,

    /// Treat repeated phrases as errors.
    #[arg(long)]
    strict: bool,
}

/// Findings for one phrase file.
#[derive(Debug, Default)]
struct Report {
    problems: Vec<String>,
    repeats: Vec<(String, Vec<usize>)>,
    longest: usize,
}

impl Report {
    fn for_pool(pool: &PhrasePool) -> Self {
        let problems = pool
            .validate_all()
            .into_iter()
            .filter_map(Result::err)
            .map(|e| e.to_string())
            .collect();

        let mut positions: HashMap<&str, Vec<usize>> = HashMap::new();
        for (index, phrase) in pool.phrases.iter().enumerate() {
            positions.entry(phrase.trim()).or_default().push(index);
        }
        let mut repeats: Vec<(String, Vec<usize>)> = positions
            .into_iter()
            .filter(|(_, at)| at.len() > 1)
            .map(|(phrase, at)| (phrase.to_owned(), at))
            .collect();
        repeats.sort_by_key(|(_, at)| at[0]);

        let longest = pool
            .phrases
            .iter()
            .map(|p| p.chars().count())
            .max()
            .unwrap_or(0);

        Self {
            problems,
            repeats,
            longest,
        }
    }

    fn passes(&self, strict: bool) -> bool {
        self.problems.is_empty() && !(strict && !self.repeats.is_empty())
    }
}

fn main() -> ExitCode {
    let args = Args::parse();

    if let Some(path) = args.write_builtin {
        return write_builtin(&path);
    }

    let mut failed = 0_usize;
    for path in &args.files {
        if !check_file(path, args.strict) {
            failed += 1;
        }
    }

    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        eprintln!("{failed} of {} file(s) failed", args.files.len());
        ExitCode::FAILURE
    }
}

fn write_builtin(path: &Path) -> ExitCode {
    let pool = PhrasePool::builtin();
    if let Err(e) = pool.save_to_file(path) {
        eprintln!("{}: cannot write: {e}", path.display());
        return ExitCode::FAILURE;
    }
    println!("{}: wrote {} built-in phrases", path.display(), pool.len());
    ExitCode::SUCCESS
}

fn check_file(path: &Path, strict: bool) -> bool {
    let pool = match PhrasePool::load_from_file(path) {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("{}: {e}", path.display());
            return false;
        }
    };

    let report = Report::for_pool(&pool);
    let name = path.display();

    for problem in &report.problems {
        println!("{name}: error: {problem}");
    }
    for (phrase, at) in &report.repeats {
        let level = if strict { "error" } else { "note" };
        println!("{name}: {level}: {phrase:?} appears at indexes {at:?}");
    }

    let ok = report.passes(strict);
    println!(
        "{name}: {} ({} phrases, longest {}/{MAX_MESSAGE_LENGTH} chars)",
        if ok { "ok" } else { "FAILED" },
        pool.len(),
        report.longest,
    );
    ok
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(phrases: &[&str]) -> PhrasePool {
        PhrasePool::new(phrases.iter().map(|p| (*p).to_owned()).collect())
    }

    #[test]
    fn test_builtin_passes_strict() {
        let report = Report::for_pool(&PhrasePool::builtin());
        assert!(report.passes(true));
    }

    #[test]
    fn test_repeats_fail_only_when_strict() {
        let report = Report::for_pool(&pool(&["hi", "there", " hi "]));
        assert_eq!(report.repeats, vec![("hi".to_owned(), vec![0, 2])]);
        assert!(report.passes(false));
        assert!(!report.passes(true));
    }

    #[test]
    fn test_blank_phrase_reported() {
        let report = Report::for_pool(&pool(&["fine", "  "]));
        assert_eq!(report.problems.len(), 1);
        assert!(!report.passes(false));
    }
}
