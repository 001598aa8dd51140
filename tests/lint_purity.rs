//! Lint: keep the game rules platform-free and panic-free.
//!
//! Everything under `src/game/` must run unchanged on native targets so it
//! can be unit tested, and must never panic on bad data. Browser access goes
//! through `storage.rs`, `clock.rs` and `console_log.rs` instead.
//!
//! This test scans the non-test part of every file under `src/game/` and
//! flags browser bindings and `.unwrap()` / `.expect(` calls.

use std::fs;
use std::path::Path;

const FORBIDDEN: &[&str] = &["web_sys::", "js_sys::", ".unwrap()", ".expect("];

/// Scan source up to its test module for forbidden patterns.
fn find_impure_lines(source: &str) -> Vec<(usize, String)> {
    let mut violations = Vec::new();

    for (line_num_0, line) in source.lines().enumerate() {
        let trimmed = line.trim();

        // Test code below this point may unwrap freely
        if trimmed == "#[cfg(test)]" {
            break;
        }

        // Skip comments
        if trimmed.starts_with("//") {
            continue;
        }

        if FORBIDDEN.iter().any(|p| line.contains(p)) {
            violations.push((line_num_0 + 1, trimmed.to_string()));
        }
    }

    violations
}

#[test]
fn game_rules_are_platform_free_and_panic_free() {
    let game_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("src/game");
    let mut all_violations = Vec::new();

    visit_source_files(&game_dir, &mut all_violations);

    if !all_violations.is_empty() {
        let mut msg = String::from(
            "Found browser bindings or panicking calls in src/game/.\n\
             Propagate errors or fall back to defaults, and keep platform code\n\
             in storage.rs / clock.rs / console_log.rs.\n\n",
        );
        for (file, line_num, line) in &all_violations {
            msg.push_str(&format!("  {}:{}: {}\n", file, line_num, line));
        }
        panic!("{}", msg);
    }
}

fn visit_source_files(dir: &Path, violations: &mut Vec<(String, usize, String)>) {
    let Ok(entries) = fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            visit_source_files(&path, violations);
        } else if path.extension().map(|e| e == "rs").unwrap_or(false) {
            let Ok(source) = fs::read_to_string(&path) else {
                continue;
            };
            let display_path = path.display().to_string();
            for (line_num, line) in find_impure_lines(&source) {
                violations.push((display_path.clone(), line_num, line));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detects_unwrap() {
        let source = "let v = serde_json::from_str(raw).unwrap();";
        assert_eq!(find_impure_lines(source).len(), 1);
    }

    #[test]
    fn detects_browser_bindings() {
        let source = "let now = js_sys::Date::now();\nweb_sys::console::log_1(&s.into());";
        assert_eq!(find_impure_lines(source).len(), 2);
    }

    #[test]
    fn allows_unwrap_or() {
        let source = "let n = u32::try_from(v).unwrap_or(u32::MAX);";
        assert!(find_impure_lines(source).is_empty());
    }

    #[test]
    fn ignores_test_module() {
        let source = "fn f() {}\n#[cfg(test)]\nmod tests {\n    fn g() { x.unwrap(); }\n}";
        assert!(find_impure_lines(source).is_empty());
    }

    #[test]
    fn ignores_comments() {
        let source = "// never call .unwrap() here";
        assert!(find_impure_lines(source).is_empty());
    }
}
