//! Detail popups for lights and timers
//!
//! Both popups are a single `entityUpdateDetail` command:
//!
//! ```text
//! light: entityUpdateDetail~uuid.<item>~~<color>~<on>~<brightness>~<color temp>~<wheel>~<labels...>
//! timer: entityUpdateDetail~uuid.<item>~~<color>~uuid.<item>~<min>~<sec>~<editable>~<actions>~<labels>
//! ```

use alloc::string::String;

use panelink_protocol::{CommandWriter, TimerAction};

use crate::clock::{parse_hms, parse_iso8601, seconds_until, split_minutes};
use crate::color::scale_value;
use crate::dispatch::mired_range;
use crate::entity::kind::color_mode;
use crate::entity::{attr, supports_color_mode, Entity, EntityKind, EntityStore};
use crate::error::CoreError;
use crate::page::PageItem;

const DISABLE: &str = "disable";

/// Colour modes that enable the wheel
const WHEEL_MODES: [&str; 5] = [
    color_mode::XY,
    color_mode::HS,
    color_mode::RGB,
    color_mode::RGBW,
    color_mode::RGBWW,
];

/// Write the detail popup for `item` into `out`
///
/// Returns the kind of popup written. On error `out` may hold a partial
/// command and must be discarded.
pub fn render_detail(
    item: &PageItem,
    entities: &EntityStore,
    now: Option<i64>,
    out: &mut String,
) -> Result<EntityKind, CoreError> {
    let binding = item.stateful.ok_or(CoreError::UnresolvedReference)?;
    let entity = entities
        .get(binding.entity)
        .ok_or(CoreError::UnknownEntity)?;

    let mut writer = CommandWriter::new(out, "entityUpdateDetail");
    writer
        .raw("~uuid.")
        .raw(&item.uuid)
        .empty()
        .field(item.icon_color(entities));

    match binding.kind {
        EntityKind::Light => write_light(&mut writer, entity),
        EntityKind::Timer => write_timer(&mut writer, item, entity, now)?,
        _ => return Err(CoreError::UnresolvedReference),
    }
    Ok(binding.kind)
}

fn write_light(writer: &mut CommandWriter<'_>, light: &Entity) {
    let on = light.is_on();
    let modes = light.attribute_or(attr::SUPPORTED_COLOR_MODES, "");

    writer.field(if on { "1" } else { "0" });

    match light.attribute(attr::BRIGHTNESS).and_then(parse_number) {
        Some(brightness) if on => {
            let percent = libm::round(scale_value(brightness, (0.0, 255.0), (0.0, 100.0)));
            writer.field(percent as i32);
        }
        _ => {
            writer.field(DISABLE);
        }
    }

    if supports_color_mode(modes, color_mode::COLOR_TEMP) {
        let active = light.attribute(attr::COLOR_MODE) == Some(color_mode::COLOR_TEMP);
        match light.attribute(attr::COLOR_TEMP).and_then(parse_number) {
            Some(mireds) if on && active => {
                let (min, max) = mired_range(
                    light.attribute(attr::MIN_MIREDS),
                    light.attribute(attr::MAX_MIREDS),
                );
                let percent = scale_value(mireds, (f64::from(min), f64::from(max)), (0.0, 100.0));
                writer.field(libm::round(percent).clamp(0.0, 100.0) as i32);
            }
            _ => {
                writer.field("unknown");
            }
        }
    } else {
        writer.field(DISABLE);
    }

    let wheel = on && WHEEL_MODES.iter().any(|mode| supports_color_mode(modes, mode));
    writer
        .field(if wheel { "enable" } else { DISABLE })
        .field("Colour")
        .field("Colour temperature")
        .field("Brightness")
        .field(DISABLE);
}

fn write_timer(
    writer: &mut CommandWriter<'_>,
    item: &PageItem,
    timer: &Entity,
    now: Option<i64>,
) -> Result<(), CoreError> {
    // Anything that is neither idle nor paused counts as running
    let (idle, (minutes, seconds)) = match timer.state() {
        "idle" => (true, parse_hms(timer.attribute_or(attr::DURATION, ""))?),
        "paused" => (true, parse_hms(timer.attribute_or(attr::REMAINING, ""))?),
        _ => {
            let now = now.ok_or(CoreError::OutOfRange)?;
            let finishes_at = parse_iso8601(timer.attribute_or(attr::FINISHES_AT, ""))?;
            (false, split_minutes(seconds_until(finishes_at, now)))
        }
    };

    let editable = idle && matches!(timer.attribute(attr::EDITABLE), Some("on" | "true" | "True"));

    writer
        .raw("~uuid.")
        .raw(&item.uuid)
        .field(minutes)
        .field(seconds)
        .field(if editable { "1" } else { "0" });

    if !idle {
        writer
            .field(TimerAction::Pause.as_str())
            .field(TimerAction::Cancel.as_str())
            .field(TimerAction::Finish.as_str())
            .field("Pause")
            .field("Cancel")
            .field("Finish");
    } else {
        writer
            .empty()
            .field(TimerAction::Start.as_str())
            .empty()
            .empty()
            .field("Start")
            .empty();
    }
    Ok(())
}

fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{ICON_COLOR_OFF, ICON_COLOR_ON};
    use alloc::format;

    fn light(entities: &mut EntityStore) -> PageItem {
        PageItem::for_target("k1", "light.kitchen", entities)
    }

    fn timer(entities: &mut EntityStore) -> PageItem {
        PageItem::for_target("t1", "timer.tea", entities)
    }

    #[test]
    fn test_light_off_with_brightness_only() {
        let mut entities = EntityStore::new();
        let item = light(&mut entities);
        entities.set_state("light.kitchen", "off").unwrap();
        entities
            .set_attribute("light.kitchen", attr::SUPPORTED_COLOR_MODES, "['brightness']")
            .unwrap();

        let mut out = String::new();
        assert_eq!(render_detail(&item, &entities, None, &mut out), Ok(EntityKind::Light));
        assert_eq!(
            out,
            format!(
                "entityUpdateDetail~uuid.k1~~{}~0~disable~disable~disable~Colour~Colour temperature~Brightness~disable",
                ICON_COLOR_OFF
            )
        );
    }

    #[test]
    fn test_light_on_in_color_temp_mode() {
        let mut entities = EntityStore::new();
        let item = light(&mut entities);
        for (name, value) in [
            ("state", "on"),
            (attr::SUPPORTED_COLOR_MODES, "['color_temp', 'xy']"),
            (attr::COLOR_MODE, "color_temp"),
            (attr::BRIGHTNESS, "255"),
            (attr::COLOR_TEMP, "300"),
            (attr::MIN_MIREDS, "200"),
            (attr::MAX_MIREDS, "400"),
        ] {
            entities.set_attribute("light.kitchen", name, value).unwrap();
        }

        let mut out = String::new();
        render_detail(&item, &entities, None, &mut out).unwrap();
        assert_eq!(
            out,
            format!(
                "entityUpdateDetail~uuid.k1~~{}~1~100~50~enable~Colour~Colour temperature~Brightness~disable",
                ICON_COLOR_ON
            )
        );
    }

    #[test]
    fn test_light_color_temp_unknown_in_other_mode() {
        let mut entities = EntityStore::new();
        let item = light(&mut entities);
        for (name, value) in [
            ("state", "on"),
            (attr::SUPPORTED_COLOR_MODES, "['color_temp', 'xy']"),
            (attr::COLOR_MODE, "xy"),
            (attr::BRIGHTNESS, "128"),
            (attr::COLOR_TEMP, "300"),
        ] {
            entities.set_attribute("light.kitchen", name, value).unwrap();
        }

        let mut out = String::new();
        render_detail(&item, &entities, None, &mut out).unwrap();
        assert!(out.contains("~1~50~unknown~enable~"));
    }

    #[test]
    fn test_idle_timer_shows_duration() {
        let mut entities = EntityStore::new();
        let item = timer(&mut entities);
        entities.set_state("timer.tea", "idle").unwrap();
        entities.set_attribute("timer.tea", attr::DURATION, "00:05:00").unwrap();
        entities.set_attribute("timer.tea", attr::EDITABLE, "on").unwrap();

        let mut out = String::new();
        assert_eq!(render_detail(&item, &entities, None, &mut out), Ok(EntityKind::Timer));
        assert_eq!(
            out,
            format!(
                "entityUpdateDetail~uuid.t1~~{}~uuid.t1~5~0~1~~start~~~Start~",
                ICON_COLOR_OFF
            )
        );
    }

    #[test]
    fn test_paused_timer_uses_remaining() {
        let mut entities = EntityStore::new();
        let item = timer(&mut entities);
        entities.set_state("timer.tea", "paused").unwrap();
        entities.set_attribute("timer.tea", attr::DURATION, "00:05:00").unwrap();
        entities.set_attribute("timer.tea", attr::REMAINING, "0:01:30").unwrap();
        entities.set_attribute("timer.tea", attr::EDITABLE, "on").unwrap();

        let mut out = String::new();
        render_detail(&item, &entities, None, &mut out).unwrap();
        assert!(out.ends_with("~uuid.t1~1~30~1~~start~~~Start~"));
    }

    #[test]
    fn test_unknown_timer_state_counts_as_running() {
        let mut entities = EntityStore::new();
        let item = timer(&mut entities);
        entities.set_state("timer.tea", "unknown").unwrap();
        entities.set_attribute("timer.tea", attr::DURATION, "00:05:00").unwrap();
        entities.set_attribute("timer.tea", attr::EDITABLE, "on").unwrap();

        // The stored duration is only used while idle or paused
        let mut out = String::new();
        assert!(render_detail(&item, &entities, Some(0), &mut out).is_err());

        entities
            .set_attribute("timer.tea", attr::FINISHES_AT, "1970-01-01T00:01:00+00:00")
            .unwrap();
        out.clear();
        render_detail(&item, &entities, Some(0), &mut out).unwrap();
        assert!(out.ends_with("~uuid.t1~1~0~0~pause~cancel~finish~Pause~Cancel~Finish"));
    }

    #[test]
    fn test_active_timer_counts_down() {
        let mut entities = EntityStore::new();
        let item = timer(&mut entities);
        entities.set_state("timer.tea", "active").unwrap();
        entities
            .set_attribute("timer.tea", attr::FINISHES_AT, "1970-01-01T00:10:00+00:00")
            .unwrap();

        let mut out = String::new();
        render_detail(&item, &entities, Some(475), &mut out).unwrap();
        assert_eq!(
            out,
            format!(
                "entityUpdateDetail~uuid.t1~~{}~uuid.t1~2~5~0~pause~cancel~finish~Pause~Cancel~Finish",
                ICON_COLOR_ON
            )
        );
    }

    #[test]
    fn test_timer_failures() {
        let mut entities = EntityStore::new();
        let item = timer(&mut entities);
        entities.set_state("timer.tea", "active").unwrap();
        entities
            .set_attribute("timer.tea", attr::FINISHES_AT, "2024-01-01T00:00:00Z")
            .unwrap();

        let mut out = String::new();
        // No wall clock yet
        assert_eq!(
            render_detail(&item, &entities, None, &mut out),
            Err(CoreError::OutOfRange)
        );

        entities.set_state("timer.tea", "idle").unwrap();
        entities.set_attribute("timer.tea", attr::DURATION, "soon").unwrap();
        assert_eq!(
            render_detail(&item, &entities, Some(0), &mut out),
            Err(CoreError::MalformedValue)
        );
    }

    #[test]
    fn test_non_detail_item_rejected() {
        let mut entities = EntityStore::new();
        let item = PageItem::for_target("s1", "switch.fan", &mut entities);
        let mut out = String::new();
        assert_eq!(
            render_detail(&item, &entities, None, &mut out),
            Err(CoreError::UnresolvedReference)
        );
    }
}
