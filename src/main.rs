#![cfg_attr(not(debug_assertions), windows_subsystem = "windows")]

use slint::{ModelRc, SharedString, VecModel};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use verigen_core::logger::generate_rid;
use verigen_core::persist::export_copy;
use verigen_core::{gauntlet, Config, GeminiClient, Generator, History, Logger};

slint::include_modules!();

fn main() -> Result<(), slint::PlatformError> {
    let ui = MainWindow::new()?;

    // Session-scoped; only the UI thread touches it.
    let history = Arc::new(Mutex::new(History::new()));

    let generator = match Config::from_env().and_then(|config| {
        let client = GeminiClient::new(&config)?;
        Ok(Arc::new(Generator::new(client, &config)))
    }) {
        Ok(g) => Some(g),
        Err(e) => {
            ui.set_can_generate(false);
            set_status(&ui, &format!("❌ {}", e.user_message()), true);
            None
        }
    };

    // Generate
    if let Some(generator) = generator.clone() {
        let ui_handle = ui.as_weak();
        ui.on_generate(move || {
            let ui = ui_handle.unwrap();
            let spec = ui.get_spec_input().to_string();
            if spec.trim().is_empty() {
                set_status(&ui, "Please enter a specification first.", true);
                return;
            }

            ui.set_is_processing(true);
            set_status(&ui, "Generating Verilog code...", false);

            let ui_weak = ui.as_weak();
            let generator = generator.clone();
            let history = history.clone();
            std::thread::spawn(move || {
                let logger = Logger::new(generate_rid());
                let result = generator.generate(&spec, &logger);
                slint::invoke_from_event_loop(move || {
                    let ui = ui_weak.unwrap();
                    match result {
                        Ok(gen) => {
                            ui.set_preview_code(gen.code().into());
                            ui.set_has_output(true);
                            if let Ok(mut history) = history.lock() {
                                history.record(&gen);
                                render_history(&ui, &history);
                            }
                            let note = match gen.blocks.dropped() {
                                0 => String::new(),
                                n => format!(" ({} additional block(s) ignored)", n),
                            };
                            set_status(&ui, &format!("✅ Verilog code generated successfully!{}", note), false);
                        }
                        Err(e) => set_status(&ui, &format!("⚠️ {}", e.user_message()), true),
                    }
                    ui.set_is_processing(false);
                })
                .ok();
            });
        });
    }

    // Save as (download)
    {
        let ui_handle = ui.as_weak();
        let output_path: Option<PathBuf> = generator.as_ref().map(|g| g.output_path());
        ui.on_save_as(move || {
            let ui = ui_handle.unwrap();
            let Some(src) = output_path.as_ref() else {
                return;
            };
            let file_name = src
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            if let Some(dest) = rfd::FileDialog::new()
                .set_file_name(file_name.as_str())
                .add_filter("Verilog", &["v"])
                .save_file()
            {
                match export_copy(src, &dest) {
                    Ok(()) => set_status(&ui, &format!("💾 Saved to {}", dest.display()), false),
                    Err(e) => set_status(&ui, &format!("❌ {}", e.user_message()), true),
                }
            }
        });
    }

    // Copy to clipboard
    {
        let ui_handle = ui.as_weak();
        ui.on_copy_code(move || {
            let ui = ui_handle.unwrap();
            let code = ui.get_preview_code().to_string();
            match arboard::Clipboard::new().and_then(|mut cb| cb.set_text(code)) {
                Ok(()) => set_status(&ui, "📋 Copied to clipboard", false),
                Err(e) => set_status(&ui, &format!("❌ Clipboard unavailable: {}", e), true),
            }
        });
    }

    // Self-test gauntlet
    {
        let ui_handle = ui.as_weak();
        ui.on_run_self_test(move || {
            let ui = ui_handle.unwrap();
            ui.set_is_processing(true);
            ui.set_self_test_log("🧪 Running self-test gauntlet…".into());

            let ui_weak = ui.as_weak();
            std::thread::spawn(move || {
                let report = gauntlet::run();
                slint::invoke_from_event_loop(move || {
                    let ui = ui_weak.unwrap();
                    ui.set_self_test_log(report.log.into());
                    ui.set_is_processing(false);
                })
                .ok();
            });
        });
    }

    ui.run()
}

/* ========================== Helpers ========================== */

fn render_history(ui: &MainWindow, history: &History) {
    let rows: Vec<HistoryRow> = history
        .newest_first()
        .enumerate()
        .map(|(i, entry)| HistoryRow {
            number: (i + 1) as i32,
            spec: SharedString::from(entry.spec.as_str()),
            code: SharedString::from(entry.code.as_str()),
        })
        .collect();
    ui.set_history(ModelRc::new(VecModel::from(rows)));
}

fn set_status(ui: &MainWindow, msg: &str, is_error: bool) {
    ui.set_status_text(msg.into());
    ui.set_status_is_error(is_error);
}
