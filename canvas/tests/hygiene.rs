//! Source hygiene budgets for the canvas library.
//!
//! Each budget caps how often a pattern may appear in production code under
//! `src/` (sibling `*_test.rs` files and comment lines are not counted). The
//! caps only ever go down.

use std::fs;
use std::path::{Path, PathBuf};

struct Budget {
    pattern: &'static str,
    max: usize,
    hint: &'static str,
}

macro_rules! budget {
    ($name:ident, $pattern:literal, $max:literal, $hint:literal) => {
        #[test]
        fn $name() {
            enforce(&Budget { pattern: $pattern, max: $max, hint: $hint });
        }
    };
}

// Crashes.
budget!(unwrap_budget, ".unwrap()", 0, "propagate with `?` or handle the None/Err arm");
budget!(expect_budget, ".expect(", 0, "propagate with `?` or handle the None/Err arm");
budget!(panic_budget, "panic!(", 0, "return a CanvasError instead");
budget!(unreachable_budget, "unreachable!(", 0, "make the state unrepresentable");
budget!(todo_budget, "todo!(", 0, "finish the stub");
budget!(unimplemented_budget, "unimplemented!(", 0, "finish the stub");

// Errors dropped without a look.
budget!(silent_discard_budget, "let _ =", 0, "log or propagate the result");
budget!(dot_ok_budget, ".ok()", 0, "match on the error and log it");

// Structure.
budget!(allow_dead_code_budget, "#[allow(dead_code)]", 0, "delete the unused item");

// Output goes through `tracing`; only the host binary prints. Also catches `eprintln!`.
budget!(println_budget, "println!(", 0, "use tracing::debug!/info!");

struct SourceFile {
    path: PathBuf,
    content: String,
}

fn production_files(dir: &Path, out: &mut Vec<SourceFile>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for path in entries.flatten().map(|e| e.path()) {
        if path.is_dir() {
            production_files(&path, out);
            continue;
        }
        let is_rs = path.extension().is_some_and(|e| e == "rs");
        let is_test = path.file_stem().is_some_and(|s| s.to_string_lossy().ends_with("_test"));
        if is_rs && !is_test {
            if let Ok(content) = fs::read_to_string(&path) {
                out.push(SourceFile { path, content });
            }
        }
    }
}

fn occurrences(file: &SourceFile, pattern: &str) -> usize {
    file.content
        .lines()
        .filter(|line| !line.trim_start().starts_with("//"))
        .filter(|line| line.contains(pattern))
        .count()
}

fn enforce(budget: &Budget) {
    let mut files = Vec::new();
    production_files(Path::new("src"), &mut files);
    assert!(!files.is_empty(), "no sources found; run from the canvas crate root");

    let hits: Vec<(String, usize)> = files
        .iter()
        .map(|f| (f.path.display().to_string(), occurrences(f, budget.pattern)))
        .filter(|(_, n)| *n > 0)
        .collect();
    let found: usize = hits.iter().map(|(_, n)| n).sum();
    let listing: String = hits.iter().map(|(path, n)| format!("\n  {path}: {n}")).collect();

    assert!(
        found <= budget.max,
        "`{}` appears {found} times (budget {}); {}.{listing}",
        budget.pattern,
        budget.max,
        budget.hint
    );
}
