//! Fixture-driven self-test of the extract → persist path.
//!
//! Each case directory under `fixtures/` holds a canned model `reply.txt`
//! and a `meta.json` describing what the pipeline should make of it.

use crate::config::Config;
use crate::error::ErrorCode;
use crate::generator::Generator;
use crate::logger::{generate_rid, Logger};
use crate::test_helpers::*;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

pub const FIXTURES_DIR: &str = "fixtures";

const DEFAULT_SPEC: &str = "8-bit synchronous up-counter with async reset";

#[derive(Deserialize, Debug)]
struct CaseMeta {
    description: String,
    #[serde(default)]
    spec: Option<String>,
    expect_blocks: usize,
    #[serde(default)]
    expected_first: Option<String>,
    #[serde(default)]
    expected_log_contains: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Report {
    pub log: String,
    pub passed: usize,
    pub total: usize,
}

impl Report {
    pub fn success(&self) -> bool {
        self.total > 0 && self.passed == self.total
    }
}

/// Locates `fixtures/` from the working directory upwards and runs every case.
pub fn run() -> Report {
    match find_fixtures_dir() {
        Some(root) => run_dir(&root),
        None => Report {
            log: "❌ Could not find 'fixtures' directory in project root.".to_string(),
            ..Report::default()
        },
    }
}

pub fn run_dir(root: &Path) -> Report {
    let rid = generate_rid();
    let mut report = Report::default();
    logln(&mut report.log, "🧪 **Self-Test Gauntlet** starting…");
    logln(&mut report.log, format!("📂 Found fixtures at: {}", root.display()));

    let mut cases: Vec<PathBuf> = match fs::read_dir(root) {
        Ok(iter) => iter.flatten().map(|e| e.path()).filter(|p| p.is_dir()).collect(),
        Err(e) => {
            logln(&mut report.log, format!("❌ Failed to read fixtures directory: {}", e));
            return report;
        }
    };
    cases.sort();

    for case in &cases {
        report.total += 1;
        let name = case.file_name().map(|n| n.to_string_lossy().to_string()).unwrap_or_default();
        case_header(&mut report.log, &name);
        if run_case(rid, &mut report.log, case) {
            report.passed += 1;
            logln(&mut report.log, "  ✅ case passed");
        } else {
            logln(&mut report.log, "  ❌ case failed");
        }
    }

    logln(&mut report.log, format!("\n🧾 **Cases Passed**: {}/{}", report.passed, report.total));
    if report.success() {
        logln(&mut report.log, "\n✅ **Self-Test PASSED**");
    } else {
        logln(&mut report.log, "\n❌ **Self-Test FAILED** – see failed cases above");
    }
    report
}

fn run_case(rid: u64, log: &mut String, case_path: &Path) -> bool {
    let meta: CaseMeta = match fs::read_to_string(case_path.join("meta.json")) {
        Ok(text) => match serde_json::from_str(&text) {
            Ok(m) => m,
            Err(e) => {
                logln(log, format!("  ❌ Failed to parse meta.json: {}", e));
                return false;
            }
        },
        Err(e) => {
            logln(log, format!("  ❌ Failed to read meta.json: {}", e));
            return false;
        }
    };
    logln(log, format!("  • {}", meta.description));

    let reply = match fs::read_to_string(case_path.join("reply.txt")) {
        Ok(r) => r,
        Err(e) => {
            logln(log, format!("  ❌ Failed to read reply.txt: {}", e));
            return false;
        }
    };

    let sandbox = match make_sandbox() {
        Ok(p) => p,
        Err(e) => {
            logln(log, format!("  ❌ Sandbox creation failed: {}", e));
            return false;
        }
    };

    let log_buffer = Arc::new(Mutex::new(String::new()));
    let logger = Logger::capturing(rid, log_buffer.clone());
    let config = Config::new("gauntlet").with_out_dir(sandbox.join("out"));
    let generator = Generator::new(FakeModel::always(&reply), &config);
    let spec = meta.spec.as_deref().unwrap_or(DEFAULT_SPEC);

    let mut checks_passed = true;
    match generator.generate(spec, &logger) {
        Ok(gen) => {
            if gen.blocks.len() != meta.expect_blocks {
                logln(log, format!(
                    "    ❌ Block count mismatch. Expected {}, got {}.",
                    meta.expect_blocks,
                    gen.blocks.len()
                ));
                checks_passed = false;
            } else {
                logln(log, format!("    ✓ Block count matches ({})", gen.blocks.len()));
            }

            let expected = meta.expected_first.as_deref().unwrap_or(gen.code());
            match fs::read(&gen.path) {
                Ok(bytes) if bytes == expected.as_bytes() => {
                    logln(log, format!("    ✓ File verified: {}", config.file_name));
                }
                Ok(_) => {
                    logln(log, format!("    ❌ File mismatch: {}", config.file_name));
                    checks_passed = false;
                }
                Err(e) => {
                    logln(log, format!("    ❌ Could not read output: {}", e));
                    checks_passed = false;
                }
            }
        }
        Err(e) if meta.expect_blocks == 0 && e.code() == ErrorCode::NoCodeFound => {
            logln(log, "    ✓ No block extracted, as expected");
            if config.output_path().exists() {
                logln(log, "    ❌ Output file written despite missing block");
                checks_passed = false;
            }
        }
        Err(e) => {
            logln(log, format!("    ❌ Generation failed: {}", e));
            checks_passed = false;
        }
    }

    if let Some(expected_str) = &meta.expected_log_contains {
        let captured = log_buffer.lock().map(|b| b.clone()).unwrap_or_default();
        if captured.contains(expected_str.as_str()) {
            logln(log, format!("    ✓ Log verification passed. Found '{}'.", expected_str));
        } else {
            logln(log, format!("    ❌ Log verification failed. Did not find '{}'.", expected_str));
            checks_passed = false;
        }
    }

    cleanup(&sandbox).ok();
    checks_passed
}

fn find_fixtures_dir() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;
    loop {
        let candidate = current.join(FIXTURES_DIR);
        if candidate.is_dir() {
            return Some(candidate);
        }
        if !current.pop() {
            break;
        }
    }

    // Resolved when this crate is built, so it points at the repo that ships it.
    let fixtures = Path::new(env!("CARGO_MANIFEST_DIR")).parent()?.join(FIXTURES_DIR);
    fixtures.is_dir().then_some(fixtures)
}
