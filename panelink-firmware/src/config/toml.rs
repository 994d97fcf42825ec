//! Simple TOML parser for the panel configuration
//!
//! Handles only the subset `panel.toml` uses. It does NOT support the full
//! TOML spec.
//!
//! Supported features:
//! - Key = value pairs (string, integer)
//! - [display], [timing] and [page.<uuid>] headers
//! - Inline tables for items: items = [{ uuid = "a", entity = "light.x" }]
//! - Comments (# ...)
//!
//! NOT supported:
//! - Multi-line strings or arrays
//! - Commas inside item values
//! - Nested inline tables

use alloc::string::String;
use alloc::vec::Vec;

use panelink_core::{EntityStore, Page, PageItem, PageKind, PageSet, PanelConfig};

/// Parse error
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParseError {
    /// Invalid section header
    InvalidSection,
    /// Invalid value type
    InvalidValue,
    /// `type` is not a known card layout
    UnknownPageType,
    /// A page or item lacks a required key
    MissingField,
}

/// Everything the controller needs at boot
#[derive(Debug)]
pub struct PanelSetup {
    pub config: PanelConfig,
    pub entities: EntityStore,
    pub pages: PageSet,
}

/// Current parsing context
#[derive(Debug, Clone)]
enum Section {
    Root,
    Display,
    Timing,
    Page(String),
}

/// Page being collected; built once its section ends
#[derive(Debug, Default)]
struct PageSpec {
    uuid: String,
    kind: Option<PageKind>,
    title: String,
    sleep_timeout: Option<u16>,
    items: Vec<ItemSpec>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ItemSpec {
    uuid: String,
    entity: String,
    name: Option<String>,
    icon: Option<String>,
}

/// Parse TOML configuration into the controller's inputs
pub fn parse_config(input: &str) -> Result<PanelSetup, ParseError> {
    let mut config = PanelConfig::default();
    let mut entities = EntityStore::new();
    let mut pages: Vec<Page> = Vec::new();

    let mut section = Section::Root;
    let mut current_page: Option<PageSpec> = None;

    for line in input.lines() {
        let line = line.trim();

        // Skip empty lines and comments
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if line.starts_with('[') && line.ends_with(']') {
            if let Some(spec) = current_page.take() {
                pages.push(build_page(spec, &mut entities)?);
            }

            section = parse_section_header(&line[1..line.len() - 1])?;
            if let Section::Page(uuid) = &section {
                current_page = Some(PageSpec {
                    uuid: uuid.clone(),
                    ..PageSpec::default()
                });
            }
            continue;
        }

        if let Some((key, value)) = parse_key_value(line) {
            apply_value(&section, &mut config, current_page.as_mut(), key, value)?;
        }
    }

    if let Some(spec) = current_page.take() {
        pages.push(build_page(spec, &mut entities)?);
    }

    Ok(PanelSetup {
        config,
        entities,
        pages: PageSet::new(pages),
    })
}

fn parse_section_header(header: &str) -> Result<Section, ParseError> {
    let header = header.trim();

    if let Some((section_type, name)) = header.split_once('.') {
        if section_type != "page" || name.is_empty() || name.contains('.') {
            return Err(ParseError::InvalidSection);
        }
        return Ok(Section::Page(String::from(name)));
    }

    match header {
        "display" => Ok(Section::Display),
        "timing" => Ok(Section::Timing),
        _ => Err(ParseError::InvalidSection),
    }
}

fn apply_value(
    section: &Section,
    config: &mut PanelConfig,
    page: Option<&mut PageSpec>,
    key: &str,
    value: &str,
) -> Result<(), ParseError> {
    match section {
        Section::Root => {}
        Section::Display => match key {
            "active_dim" => config.display.active_dim = parse_int(value)?,
            "inactive_dim" => config.display.inactive_dim = parse_int(value)?,
            "background" => config.display.background = parse_int(value)?,
            _ => {}
        },
        Section::Timing => {
            let timing = &mut config.timing;
            match key {
                "command_cooldown_ms" => timing.command_cooldown_ms = parse_int(value)?,
                "debounce_ms" => timing.debounce_ms = parse_int(value)?,
                "tick_interval_ms" => timing.tick_interval_ms = parse_int(value)?,
                "light_popup_timeout_s" => timing.light_popup_timeout_s = parse_int(value)?,
                "timer_popup_timeout_s" => timing.timer_popup_timeout_s = parse_int(value)?,
                _ => {}
            }
        }
        Section::Page(_) => {
            let page = page.ok_or(ParseError::InvalidSection)?;
            match key {
                "type" => {
                    let kind = PageKind::parse(parse_string(value)?)
                        .ok_or(ParseError::UnknownPageType)?;
                    page.kind = Some(kind);
                }
                "title" => page.title = String::from(parse_string(value)?),
                "sleep_timeout" => page.sleep_timeout = Some(parse_int(value)?),
                "items" => page.items = parse_items(value)?,
                _ => {}
            }
        }
    }
    Ok(())
}

fn build_page(spec: PageSpec, entities: &mut EntityStore) -> Result<Page, ParseError> {
    let kind = spec.kind.ok_or(ParseError::MissingField)?;
    let mut page = Page::new(&spec.uuid, kind).with_title(&spec.title);
    if let Some(seconds) = spec.sleep_timeout {
        page = page.with_sleep_timeout(seconds);
    }

    for item in spec.items {
        let mut page_item = PageItem::for_target(&item.uuid, &item.entity, entities);
        if let Some(name) = &item.name {
            page_item = page_item.with_name(name);
        }
        if let Some(icon) = &item.icon {
            page_item = page_item.with_icon(icon);
        }
        page = page.with_item(page_item);
    }

    Ok(page)
}

fn parse_key_value(line: &str) -> Option<(&str, &str)> {
    let eq_pos = line.find('=')?;
    let key = line[..eq_pos].trim();
    let value = line[eq_pos + 1..].trim();

    // Remove inline comments
    let value = match value.find('#') {
        Some(hash_pos) if value[..hash_pos].matches('"').count() % 2 == 0 => {
            value[..hash_pos].trim()
        }
        _ => value,
    };

    if key.is_empty() || value.is_empty() {
        return None;
    }

    Some((key, value))
}

fn parse_string(value: &str) -> Result<&str, ParseError> {
    if value.starts_with('"') && value.ends_with('"') && value.len() >= 2 {
        Ok(&value[1..value.len() - 1])
    } else {
        // Allow unquoted strings for simple values
        Ok(value)
    }
}

fn parse_int<T: core::str::FromStr>(value: &str) -> Result<T, ParseError> {
    value.parse().map_err(|_| ParseError::InvalidValue)
}

fn parse_items(value: &str) -> Result<Vec<ItemSpec>, ParseError> {
    let mut items = Vec::new();

    // Remove outer brackets
    let value = value.trim();
    if !value.starts_with('[') || !value.ends_with(']') {
        return Err(ParseError::InvalidValue);
    }
    let inner = &value[1..value.len() - 1];

    // Parse each item { uuid = "x", entity = "y" }
    let mut depth = 0;
    let mut start = 0;

    for (i, c) in inner.char_indices() {
        match c {
            '{' => {
                if depth == 0 {
                    start = i;
                }
                depth += 1;
            }
            '}' => {
                depth -= 1;
                if depth == 0 {
                    items.push(parse_single_item(&inner[start..=i])?);
                }
            }
            _ => {}
        }
    }

    if depth != 0 {
        return Err(ParseError::InvalidValue);
    }

    Ok(items)
}

fn parse_single_item(s: &str) -> Result<ItemSpec, ParseError> {
    let inner = &s[1..s.len() - 1];

    let mut uuid = None;
    let mut entity = None;
    let mut name = None;
    let mut icon = None;

    for part in inner.split(',') {
        let part = part.trim();
        if part.is_empty() {
            continue;
        }
        let (key, value) = parse_key_value(part).ok_or(ParseError::InvalidValue)?;
        let value = String::from(parse_string(value)?);
        match key {
            "uuid" => uuid = Some(value),
            "entity" => entity = Some(value),
            "name" => name = Some(value),
            "icon" => icon = Some(value),
            _ => {}
        }
    }

    Ok(ItemSpec {
        uuid: uuid.ok_or(ParseError::MissingField)?,
        entity: entity.ok_or(ParseError::MissingField)?,
        name,
        icon,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# comment
[display]
active_dim = 80
inactive_dim = 5   # dim at night

[timing]
debounce_ms = 150

[page.ss]
type = "screensaver"
items = [{ uuid = "wx", entity = "weather.home" }]

[page.kitchen]
type = "cardEntities"
title = "Kitchen"
sleep_timeout = 20
items = [{ uuid = "k1", entity = "light.kitchen", name = "Ceiling" }, { uuid = "k2", entity = "navigate.uuid.ss", icon = "X" }]
"#;

    #[test]
    fn test_parse_section_header() {
        match parse_section_header("page.kitchen").unwrap() {
            Section::Page(name) => assert_eq!(name, "kitchen"),
            _ => panic!("Wrong section type"),
        }
        assert!(matches!(parse_section_header("display"), Ok(Section::Display)));
        assert!(matches!(parse_section_header("timing"), Ok(Section::Timing)));
        assert_eq!(
            parse_section_header("page.a.b").unwrap_err(),
            ParseError::InvalidSection
        );
        assert_eq!(
            parse_section_header("stepper").unwrap_err(),
            ParseError::InvalidSection
        );
    }

    #[test]
    fn test_parse_items() {
        let items =
            parse_items(r#"[{ uuid = "a", entity = "light.x", name = "A" }, { uuid = "b", entity = "delete" }]"#)
                .unwrap();
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].name.as_deref(), Some("A"));
        assert_eq!(items[1].entity, "delete");
        assert_eq!(items[1].icon, None);

        assert_eq!(
            parse_items(r#"[{ entity = "light.x" }]"#).unwrap_err(),
            ParseError::MissingField
        );
        assert_eq!(
            parse_items(r#"{ uuid = "a" }"#).unwrap_err(),
            ParseError::InvalidValue
        );
    }

    #[test]
    fn test_parse_config() {
        let setup = parse_config(SAMPLE).unwrap();

        assert_eq!(setup.config.display.active_dim, 80);
        assert_eq!(setup.config.display.inactive_dim, 5);
        assert_eq!(setup.config.timing.debounce_ms, 150);
        assert_eq!(setup.config.timing.command_cooldown_ms, 75);

        assert_eq!(setup.pages.len(), 2);
        assert!(setup.pages.has_screensaver());
        let kitchen = setup.pages.get(1).unwrap();
        assert_eq!(kitchen.kind, PageKind::CardEntities);
        assert_eq!(kitchen.title, "Kitchen");
        assert_eq!(kitchen.sleep_timeout, 20);
        assert_eq!(kitchen.items[0].name, "Ceiling");
        assert!(kitchen.items[0].is_stateful());
        assert!(!kitchen.items[1].is_stateful());
        assert_eq!(kitchen.items[1].icon.as_deref(), Some("X"));

        // Only entity-backed items create entities
        assert_eq!(setup.entities.len(), 2);
        assert!(setup.entities.lookup("light.kitchen").is_some());
    }

    #[test]
    fn test_parse_config_errors() {
        assert_eq!(
            parse_config("[page.a]\ntype = \"cardFoo\"").unwrap_err(),
            ParseError::UnknownPageType
        );
        assert_eq!(
            parse_config("[page.a]\ntitle = \"x\"").unwrap_err(),
            ParseError::MissingField
        );
        assert_eq!(
            parse_config("[display]\nactive_dim = bright").unwrap_err(),
            ParseError::InvalidValue
        );
    }
}
