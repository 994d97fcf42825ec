//! Button press dispatch
//!
//! Turns a panel press into an [`Action`]: a navigation request, a redraw
//! of the current page, or a backend service call.

pub mod press;
pub mod reference;

pub use press::{Press, PressOutcome, PressTracker};
pub use reference::{classify, item_uuid, Reference, UUID_PREFIX};

use alloc::format;
use alloc::string::{String, ToString};

use panelink_protocol::ButtonType;

use crate::color::{format_rgb, parse_wheel_value, scale_value};
use crate::entity::{attr, EntityKind, EntityStore};
use crate::error::CoreError;
use crate::nav::NavTarget;
use crate::page::PageSet;
use crate::traits::ServiceCall;

/// Mired range used when a light reports none or a broken one
pub const FALLBACK_MIREDS: (u16, u16) = (153, 500);

/// Result of a press
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Navigate(NavTarget),
    /// Redraw the current page without moving
    RenderCurrent,
    Service(ServiceCall),
}

/// Presses handled before deduplication
///
/// A tap on the screensaver opens the default page, `sleepReached` shows
/// the screensaver and `bExit` redraws the current page.
pub fn control_action(id: &str, button: ButtonType) -> Option<Action> {
    match button {
        ButtonType::Exit if id == "screensaver" => Some(Action::Navigate(NavTarget::Default)),
        ButtonType::SleepReached => Some(Action::Navigate(NavTarget::Ambient)),
        ButtonType::Exit => Some(Action::RenderCurrent),
        _ => None,
    }
}

/// Map a press on a resolved id to its action
///
/// `id` must already have its `uuid.` reference replaced by the bound
/// entity id. `Ok(None)` means the press is valid but has no effect.
pub fn dispatch(
    id: &str,
    button: ButtonType,
    value: Option<&str>,
    pages: &PageSet,
    entities: &EntityStore,
) -> Result<Option<Action>, CoreError> {
    if let Some(action) = control_action(id, button) {
        return Ok(Some(action));
    }

    let reference = classify(id).ok_or(CoreError::UnresolvedReference)?;
    let (entity_id, kind) = match reference {
        Reference::Entity { id, kind } => (id, kind),
        Reference::NavPrev if button == ButtonType::Button => {
            return Ok(Some(Action::Navigate(NavTarget::Prev)));
        }
        Reference::NavNext if button == ButtonType::Button => {
            return Ok(Some(Action::Navigate(NavTarget::Next)));
        }
        Reference::NavUp if button == ButtonType::Button => {
            return Ok(Some(Action::Navigate(NavTarget::Default)));
        }
        Reference::NavigatePage(uuid) if button == ButtonType::Button => {
            let index = pages
                .find_page_index_by_uuid(uuid)
                .ok_or(CoreError::UnresolvedReference)?;
            return Ok(Some(Action::Navigate(NavTarget::Index(index))));
        }
        _ => return Ok(None),
    };

    let value = value.map(str::trim).filter(|v| !v.is_empty());
    let domain = kind.domain();
    let call = |action: &str| ServiceCall::for_entity(domain, action, entity_id);

    let service = match button {
        ButtonType::OnOff => {
            let Some(value) = value else {
                return Ok(None);
            };
            call(if value == "1" { "turn_on" } else { "turn_off" })
        }
        ButtonType::NumberSet => {
            let value = value.ok_or(CoreError::MalformedValue)?;
            call("set_value").with_data(attr::VALUE, value)
        }

        ButtonType::Up => call("open_cover"),
        ButtonType::Stop => call("stop_cover"),
        ButtonType::Down => call("close_cover"),
        ButtonType::PositionSlider => {
            let position = parse_int(value)?;
            call("set_cover_position").with_data(attr::POSITION, &position.to_string())
        }
        ButtonType::TiltOpen => call("open_cover_tilt"),
        ButtonType::TiltStop => call("stop_cover_tilt"),
        ButtonType::TiltClose => call("close_cover_tilt"),
        ButtonType::TiltSlider => {
            let position = parse_int(value)?;
            call("set_cover_tilt_position").with_data(attr::TILT_POSITION, &position.to_string())
        }

        ButtonType::Button => match kind {
            EntityKind::Scene | EntityKind::Script => call("turn_on"),
            EntityKind::Light
            | EntityKind::Switch
            | EntityKind::InputBoolean
            | EntityKind::Automation
            | EntityKind::Fan => call("toggle"),
            EntityKind::Button | EntityKind::InputButton => call("press"),
            EntityKind::Lock => {
                let unlocked = entities
                    .lookup(entity_id)
                    .is_some_and(|entity| entity.state() == "unlocked");
                call(if unlocked { "lock" } else { "unlock" })
            }
            _ => return Ok(None),
        },

        ButtonType::MediaNext => call("media_next_track"),
        ButtonType::MediaBack => call("media_previous_track"),
        ButtonType::MediaPause => call("media_play_pause"),
        ButtonType::MediaOnOff => {
            let off = entities
                .lookup(entity_id)
                .map_or(true, |entity| entity.state() == "off");
            call(if off { "turn_on" } else { "turn_off" })
        }
        ButtonType::VolumeSlider => {
            let volume = scale_value(f64::from(parse_int(value)?), (0.0, 100.0), (0.0, 1.0));
            call("volume_set").with_data(attr::VOLUME_LEVEL, &format!("{:.2}", volume))
        }

        ButtonType::BrightnessSlider => {
            let Some(value) = value else {
                return Ok(None);
            };
            let brightness = scale_value(f64::from(parse_int(Some(value))?), (0.0, 100.0), (0.0, 255.0)) as i32;
            call("turn_on").with_data(attr::BRIGHTNESS, &brightness.to_string())
        }
        ButtonType::ColorTempSlider => {
            let Some(value) = value else {
                return Ok(None);
            };
            let position = parse_int(Some(value))?;
            let entity = entities
                .lookup(entity_id)
                .ok_or(CoreError::UnknownEntity)?;
            let (min, max) = mired_range(
                entity.attribute(attr::MIN_MIREDS),
                entity.attribute(attr::MAX_MIREDS),
            );
            let mireds = scale_value(f64::from(position), (0.0, 100.0), (f64::from(min), f64::from(max))) as i32;
            call("turn_on").with_data(attr::COLOR_TEMP, &mireds.to_string())
        }
        ButtonType::ColorWheel => {
            let Some(value) = value else {
                return Ok(None);
            };
            let rgb = parse_wheel_value(value)?;
            call("turn_on").with_template(attr::RGB_COLOR, &format_rgb(rgb))
        }

        ButtonType::Alarm(action) => {
            let call = call(action.service_action());
            match value {
                Some(code) => call.with_data(attr::CODE, code),
                None => call,
            }
        }
        ButtonType::Timer(action) => {
            ServiceCall::for_entity(EntityKind::Timer.domain(), action.as_str(), entity_id)
        }

        ButtonType::Exit | ButtonType::SleepReached => return Ok(None),
    };

    Ok(Some(Action::Service(service)))
}

fn parse_int(value: Option<&str>) -> Result<i32, CoreError> {
    value
        .ok_or(CoreError::MalformedValue)?
        .parse()
        .map_err(|_| CoreError::MalformedValue)
}

/// Mired range from a light's attributes, falling back when missing,
/// unparsable or not increasing
pub fn mired_range(min: Option<&str>, max: Option<&str>) -> (u16, u16) {
    let parse = |text: Option<&str>, fallback: u16| {
        text.filter(|t| !t.is_empty())
            .and_then(|t| t.trim().parse::<f64>().ok())
            .map_or(fallback, |v| v as u16)
    };
    let min = parse(min, FALLBACK_MIREDS.0);
    let max = parse(max, FALLBACK_MIREDS.1);
    if min >= max {
        warn!("Invalid mired range {}..{}", min, max);
        return FALLBACK_MIREDS;
    }
    (min, max)
}

/// Replace a `uuid.<item>` reference with the bound entity id
///
/// Plain ids pass through unchanged.
pub fn resolve_id(id: &str, pages: &PageSet) -> Result<String, CoreError> {
    match item_uuid(id) {
        Some(uuid) => pages
            .stateful_item(uuid)
            .map(|item| item.target.clone())
            .ok_or(CoreError::UnresolvedReference),
        None if id.starts_with(UUID_PREFIX) => Err(CoreError::UnresolvedReference),
        None => Ok(String::from(id)),
    }
}
