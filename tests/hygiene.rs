//! Hygiene for the `md2pic` binary: no panicking shortcuts in `src/`.
//!
//! Printing is the binary's job, so only crash and silent-loss patterns carry
//! a budget here. Test files and comment lines are skipped.

use std::fs;
use std::path::Path;

const BUDGETS: &[(&str, usize)] = &[
    (".unwrap()", 0),
    (".expect(", 0),
    ("panic!(", 0),
    ("todo!(", 0),
    ("unimplemented!(", 0),
    ("let _ =", 0),
    (".ok()", 0),
    ("dbg!(", 0),
    ("#[allow(dead_code)]", 0),
];

fn production_lines() -> Vec<(String, String)> {
    let mut lines = Vec::new();
    let Ok(entries) = fs::read_dir(Path::new("src")) else {
        return lines;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        let name = path.to_string_lossy().to_string();
        if path.extension().is_none_or(|e| e != "rs") || name.ends_with("_test.rs") {
            continue;
        }
        let Ok(content) = fs::read_to_string(&path) else {
            continue;
        };
        lines.extend(
            content
                .lines()
                .filter(|l| !l.trim_start().starts_with("//"))
                .map(|l| (name.clone(), l.to_owned())),
        );
    }
    lines
}

#[test]
fn binary_sources_are_found() {
    assert!(production_lines().iter().any(|(path, _)| path.ends_with("main.rs")));
}

#[test]
fn binary_budgets_hold() {
    let lines = production_lines();
    for (pattern, max) in BUDGETS {
        let offenders: Vec<&str> =
            lines.iter().filter(|(_, l)| l.contains(pattern)).map(|(path, _)| path.as_str()).collect();
        assert!(offenders.len() <= *max, "`{pattern}` budget exceeded ({} > {max}): {offenders:?}", offenders.len());
    }
}
