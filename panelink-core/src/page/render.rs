//! Default Lovelace card rendering
//!
//! Cards are sent as one `entityUpd` command:
//!
//! ```text
//! entityUpd~<title>~<nav prev>~<nav next>~<item>~<item>...
//! ```
//!
//! where every item (and navigation button) is six fields:
//! `type~id~icon~icon color~name~value`. The screensaver uses
//! `weatherUpdate` for its items and `statusUpdate` for up to two status
//! icons.

use alloc::string::String;

use panelink_protocol::CommandWriter;

use super::{Page, PageItem};
use crate::entity::{attr, EntityHandle, EntityKind, EntityStore};
use crate::traits::PageRenderer;

/// Navigation arrow colour
const NAV_ICON_COLOR: u16 = 65535;

/// arrow-left-bold
const ICON_NAV_PREV: &str = "\u{E730}";

/// arrow-right-bold
const ICON_NAV_NEXT: &str = "\u{E733}";

/// Status icons shown on the screensaver
const MAX_STATUS_ICONS: usize = 2;

/// Renderer for the stock Lovelace panel firmware
#[derive(Debug, Clone, Copy, Default)]
pub struct LovelaceRenderer;

impl LovelaceRenderer {
    fn write_item(writer: &mut CommandWriter<'_>, item: &PageItem, entities: &EntityStore) {
        let icon = item.icon.as_deref().unwrap_or("");

        let Some(binding) = item.stateful else {
            let render_type = internal_render_type(&item.target);
            if render_type == "delete" {
                writer.field("delete").empty().empty().empty().empty().empty();
            } else {
                writer
                    .field(render_type)
                    .field(&item.target)
                    .field(icon)
                    .field(super::ICON_COLOR_OFF)
                    .field(&item.name)
                    .field("PRESS");
            }
            return;
        };

        writer
            .field(binding.kind.render_type())
            .raw("~uuid.")
            .raw(&item.uuid)
            .field(icon)
            .field(item.icon_color(entities))
            .field(&item.name)
            .empty();

        let Some(entity) = entities.get(binding.entity) else {
            return;
        };
        match binding.kind {
            EntityKind::Light
            | EntityKind::Switch
            | EntityKind::InputBoolean
            | EntityKind::Automation
            | EntityKind::Fan => {
                writer.raw(if entity.is_on() { "1" } else { "0" });
            }
            EntityKind::Scene | EntityKind::Script => {
                writer.raw("ACTIVATE");
            }
            EntityKind::Lock => {
                writer.raw(if entity.state() == "unlocked" { "LOCK" } else { "UNLOCK" });
            }
            EntityKind::Button | EntityKind::InputButton | EntityKind::Vacuum => {
                writer.raw("PRESS");
            }
            EntityKind::Number | EntityKind::InputNumber => {
                writer.raw(entity.state()).raw("|0|100");
            }
            EntityKind::Cover => {
                writer.raw(entity.attribute_or(attr::CURRENT_POSITION, ""));
            }
            _ => {
                writer.raw(entity.state());
                if let Some(unit) = entity.attribute(attr::UNIT_OF_MEASUREMENT) {
                    if !unit.is_empty() {
                        writer.raw(" ").raw(unit);
                    }
                }
            }
        }
    }

    fn is_status_item(item: &PageItem) -> bool {
        item.stateful
            .is_some_and(|binding| binding.kind != EntityKind::Weather)
    }
}

impl PageRenderer for LovelaceRenderer {
    fn render(&self, page: &Page, entities: &EntityStore, out: &mut String) {
        if page.is_screensaver() {
            let mut writer = CommandWriter::new(out, "weatherUpdate");
            for item in page.items.iter().filter(|item| !Self::is_status_item(item)) {
                Self::write_item(&mut writer, item, entities);
            }
            return;
        }

        let mut writer = CommandWriter::new(out, "entityUpd");
        writer
            .field(&page.title)
            .field("button")
            .field("navPrev")
            .field(ICON_NAV_PREV)
            .field(NAV_ICON_COLOR)
            .empty()
            .empty()
            .field("button")
            .field("navNext")
            .field(ICON_NAV_NEXT)
            .field(NAV_ICON_COLOR)
            .empty()
            .empty();
        for item in &page.items {
            Self::write_item(&mut writer, item, entities);
        }
    }

    fn is_status_relevant(&self, page: &Page, _entities: &EntityStore, entity: EntityHandle) -> bool {
        page.shows_entity(entity)
    }

    fn render_status_update(&self, page: &Page, entities: &EntityStore, out: &mut String) -> bool {
        let mut status = page
            .items
            .iter()
            .filter(|item| Self::is_status_item(item))
            .take(MAX_STATUS_ICONS)
            .peekable();
        if status.peek().is_none() {
            return false;
        }

        let mut writer = CommandWriter::new(out, "statusUpdate");
        let mut written = 0;
        for item in status {
            writer
                .field(item.icon.as_deref().unwrap_or(""))
                .field(item.icon_color(entities));
            written += 1;
        }
        for _ in written..MAX_STATUS_ICONS {
            writer.empty().empty();
        }
        true
    }
}

/// Widget type for items that are not bound to an entity
fn internal_render_type(target: &str) -> &'static str {
    if target == "delete" || target.is_empty() {
        "delete"
    } else if target.starts_with("iText") {
        "text"
    } else {
        "button"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{PageKind, ICON_COLOR_OFF, ICON_COLOR_ON};
    use alloc::format;

    fn kitchen_page(entities: &mut EntityStore) -> Page {
        Page::new("p1", PageKind::CardEntities)
            .with_title("Kitchen")
            .with_item(
                PageItem::for_target("k1", "light.kitchen", entities)
                    .with_name("Ceiling")
                    .with_icon("L"),
            )
            .with_item(PageItem::internal("d1", "delete"))
    }

    #[test]
    fn test_render_card() {
        let mut entities = EntityStore::new();
        let page = kitchen_page(&mut entities);
        entities.set_state("light.kitchen", "on").unwrap();

        let mut out = String::new();
        LovelaceRenderer.render(&page, &entities, &mut out);

        let expected = format!(
            "entityUpd~Kitchen~button~navPrev~{}~65535~~~button~navNext~{}~65535~~\
             ~light~uuid.k1~L~{}~Ceiling~1~delete~~~~~",
            ICON_NAV_PREV, ICON_NAV_NEXT, ICON_COLOR_ON
        );
        assert_eq!(out, expected);
    }

    #[test]
    fn test_render_sensor_value_with_unit() {
        let mut entities = EntityStore::new();
        let page = Page::new("p1", PageKind::CardEntities).with_item(
            PageItem::for_target("t1", "sensor.temp", &mut entities).with_name("Temp"),
        );
        entities.set_state("sensor.temp", "21.5").unwrap();
        entities
            .set_attribute("sensor.temp", attr::UNIT_OF_MEASUREMENT, "°C")
            .unwrap();

        let mut out = String::new();
        LovelaceRenderer.render(&page, &entities, &mut out);
        assert!(out.ends_with(&format!("~text~uuid.t1~~{}~Temp~21.5 °C", ICON_COLOR_OFF)));
    }

    #[test]
    fn test_screensaver_status_update() {
        let mut entities = EntityStore::new();
        let page = Page::new("ss", PageKind::Screensaver)
            .with_item(PageItem::for_target("w", "weather.home", &mut entities))
            .with_item(PageItem::for_target("s1", "switch.heater", &mut entities).with_icon("H"));
        let heater = entities.find("switch.heater").unwrap();
        let other = entities.get_or_create("light.unrelated");

        assert!(LovelaceRenderer.is_status_relevant(&page, &entities, heater));
        assert!(!LovelaceRenderer.is_status_relevant(&page, &entities, other));

        let mut out = String::new();
        assert!(LovelaceRenderer.render_status_update(&page, &entities, &mut out));
        assert_eq!(out, format!("statusUpdate~H~{}~~", ICON_COLOR_OFF));
    }

    #[test]
    fn test_no_status_items() {
        let entities = EntityStore::new();
        let page = Page::new("ss", PageKind::Screensaver);
        let mut out = String::new();
        assert!(!LovelaceRenderer.render_status_update(&page, &entities, &mut out));
        assert!(out.is_empty());
    }
}
