//! Build script for panelink-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Validates panel.toml at compile time

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Page types the panel firmware can show
const PAGE_TYPES: &[&str] = &[
    "screensaver",
    "cardGrid",
    "cardGrid2",
    "cardEntities",
    "cardThermo",
    "cardMedia",
    "cardUnlock",
    "cardQR",
    "cardPower",
    "cardAlarm",
];

fn main() {
    setup_linker();
    validate_config();
}

/// Set up linker search paths for memory.x
fn setup_linker() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Validate panel.toml configuration at compile time
fn validate_config() {
    println!("cargo:rerun-if-changed=panel.toml");

    let config_path = Path::new("panel.toml");
    if !config_path.exists() {
        fail("panel.toml not found", &["The firmware embeds panel.toml from the crate directory.".to_string()]);
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => fail("Failed to read panel.toml", &[e.to_string()]),
    };

    let config: toml::Value = match toml::from_str(&content) {
        Ok(value) => value,
        Err(e) => fail(
            "Invalid TOML syntax in panel.toml",
            &e.to_string().lines().map(str::to_string).collect::<Vec<_>>(),
        ),
    };

    let mut errors = Vec::new();
    validate_display(&config, &mut errors);
    validate_pages(&config, &content, &mut errors);

    if !errors.is_empty() {
        fail("Invalid panel configuration", &errors);
    }

    println!("cargo:warning=panel.toml validated successfully");
}

fn fail(title: &str, lines: &[String]) -> ! {
    panic!(
        "\n\
        ╔══════════════════════════════════════════════════════════════════╗\n\
        ║  ERROR: {:<56} ║\n\
        ╠══════════════════════════════════════════════════════════════════╣\n\
        {}\n\
        ╚══════════════════════════════════════════════════════════════════╝\n",
        title,
        lines
            .iter()
            .map(|line| {
                let line = if line.len() > 62 { &line[..62] } else { line.as_str() };
                format!("║  • {:<62} ║", line)
            })
            .collect::<Vec<_>>()
            .join("\n")
    );
}

fn validate_display(config: &toml::Value, errors: &mut Vec<String>) {
    let Some(display) = config.get("display").and_then(|d| d.as_table()) else {
        return;
    };

    for key in ["active_dim", "inactive_dim"] {
        if let Some(value) = display.get(key) {
            match value.as_integer() {
                Some(level) if (0..=100).contains(&level) => {}
                _ => errors.push(format!("[display] {} must be 0-100", key)),
            }
        }
    }
}

fn validate_pages(config: &toml::Value, content: &str, errors: &mut Vec<String>) {
    let Some(pages) = config.get("page").and_then(|p| p.as_table()) else {
        errors.push("Missing [page.*] section - at least one page is required".to_string());
        return;
    };

    let mut uuids: Vec<String> = Vec::new();
    for (name, page) in pages {
        let Some(page) = page.as_table() else {
            errors.push(format!("[page.{}] must be a table", name));
            continue;
        };

        match page.get("type").and_then(|t| t.as_str()) {
            Some(kind) if PAGE_TYPES.contains(&kind) => {
                if kind == "screensaver" && !is_first_page(content, name) {
                    errors.push(format!("[page.{}] screensaver must be the first page", name));
                }
            }
            Some(kind) => errors.push(format!("[page.{}] unknown type '{}'", name, kind)),
            None => errors.push(format!("[page.{}] missing 'type'", name)),
        }

        let Some(items) = page.get("items") else {
            continue;
        };
        let Some(items) = items.as_array() else {
            errors.push(format!("[page.{}] items must be an array", name));
            continue;
        };
        for (i, item) in items.iter().enumerate() {
            let Some(item) = item.as_table() else {
                errors.push(format!("[page.{}] item {} must be a table", name, i));
                continue;
            };
            match item.get("uuid").and_then(|u| u.as_str()) {
                Some(uuid) if uuids.iter().any(|u| u == uuid) => {
                    errors.push(format!("[page.{}] duplicate item uuid '{}'", name, uuid));
                }
                Some(uuid) => uuids.push(uuid.to_string()),
                None => errors.push(format!("[page.{}] item {} missing 'uuid'", name, i)),
            }
            if item.get("entity").and_then(|e| e.as_str()).is_none() {
                errors.push(format!("[page.{}] item {} missing 'entity'", name, i));
            }
        }
    }
}

/// Whether `[page.<name>]` is the first page header in the file
///
/// The `toml` table does not keep file order.
fn is_first_page(content: &str, name: &str) -> bool {
    content
        .lines()
        .map(str::trim)
        .find(|line| line.starts_with("[page."))
        .is_some_and(|line| line == format!("[page.{}]", name))
}
