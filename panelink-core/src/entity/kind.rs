//! Entity kinds and the backend attributes each one needs

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Backend attribute names used by the controller
pub mod attr {
    pub const STATE: &str = "state";
    pub const ENTITY_ID: &str = "entity_id";
    pub const BRIGHTNESS: &str = "brightness";
    pub const COLOR_MODE: &str = "color_mode";
    pub const COLOR_TEMP: &str = "color_temp";
    pub const MIN_MIREDS: &str = "min_mireds";
    pub const MAX_MIREDS: &str = "max_mireds";
    pub const RGB_COLOR: &str = "rgb_color";
    pub const SUPPORTED_COLOR_MODES: &str = "supported_color_modes";
    pub const SUPPORTED_FEATURES: &str = "supported_features";
    pub const CURRENT_POSITION: &str = "current_position";
    pub const POSITION: &str = "position";
    pub const TILT_POSITION: &str = "tilt_position";
    pub const DEVICE_CLASS: &str = "device_class";
    pub const UNIT_OF_MEASUREMENT: &str = "unit_of_measurement";
    pub const CODE: &str = "code";
    pub const CODE_ARM_REQUIRED: &str = "code_arm_required";
    pub const EDITABLE: &str = "editable";
    pub const DURATION: &str = "duration";
    pub const REMAINING: &str = "remaining";
    pub const FINISHES_AT: &str = "finishes_at";
    pub const TEMPERATURE: &str = "temperature";
    pub const TEMPERATURE_UNIT: &str = "temperature_unit";
    pub const VALUE: &str = "value";
    pub const VOLUME_LEVEL: &str = "volume_level";
}

/// Home automation domains the panel can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum EntityKind {
    Light,
    Switch,
    InputBoolean,
    Automation,
    Fan,
    Lock,
    Scene,
    Script,
    Button,
    InputButton,
    InputSelect,
    Select,
    Number,
    InputNumber,
    Vacuum,
    Timer,
    Person,
    Cover,
    Sensor,
    BinarySensor,
    InputText,
    AlarmControlPanel,
    MediaPlayer,
    Sun,
    Climate,
    Weather,
}

impl EntityKind {
    /// Kind for a domain name such as `light`
    pub fn from_domain(domain: &str) -> Option<Self> {
        let kind = match domain {
            "light" => EntityKind::Light,
            "switch" => EntityKind::Switch,
            "input_boolean" => EntityKind::InputBoolean,
            "automation" => EntityKind::Automation,
            "fan" => EntityKind::Fan,
            "lock" => EntityKind::Lock,
            "scene" => EntityKind::Scene,
            "script" => EntityKind::Script,
            "button" => EntityKind::Button,
            "input_button" => EntityKind::InputButton,
            "input_select" => EntityKind::InputSelect,
            "select" => EntityKind::Select,
            "number" => EntityKind::Number,
            "input_number" => EntityKind::InputNumber,
            "vacuum" => EntityKind::Vacuum,
            "timer" => EntityKind::Timer,
            "person" => EntityKind::Person,
            "cover" => EntityKind::Cover,
            "sensor" => EntityKind::Sensor,
            "binary_sensor" => EntityKind::BinarySensor,
            "input_text" => EntityKind::InputText,
            "alarm_control_panel" => EntityKind::AlarmControlPanel,
            "media_player" => EntityKind::MediaPlayer,
            "sun" => EntityKind::Sun,
            "climate" => EntityKind::Climate,
            "weather" => EntityKind::Weather,
            _ => return None,
        };
        Some(kind)
    }

    /// Kind for a full entity id such as `light.kitchen`
    pub fn from_entity_id(entity_id: &str) -> Option<Self> {
        let (domain, object_id) = entity_id.split_once('.')?;
        if object_id.is_empty() {
            return None;
        }
        Self::from_domain(domain)
    }

    /// Domain name, used as the service prefix
    pub fn domain(self) -> &'static str {
        match self {
            EntityKind::Light => "light",
            EntityKind::Switch => "switch",
            EntityKind::InputBoolean => "input_boolean",
            EntityKind::Automation => "automation",
            EntityKind::Fan => "fan",
            EntityKind::Lock => "lock",
            EntityKind::Scene => "scene",
            EntityKind::Script => "script",
            EntityKind::Button => "button",
            EntityKind::InputButton => "input_button",
            EntityKind::InputSelect => "input_select",
            EntityKind::Select => "select",
            EntityKind::Number => "number",
            EntityKind::InputNumber => "input_number",
            EntityKind::Vacuum => "vacuum",
            EntityKind::Timer => "timer",
            EntityKind::Person => "person",
            EntityKind::Cover => "cover",
            EntityKind::Sensor => "sensor",
            EntityKind::BinarySensor => "binary_sensor",
            EntityKind::InputText => "input_text",
            EntityKind::AlarmControlPanel => "alarm_control_panel",
            EntityKind::MediaPlayer => "media_player",
            EntityKind::Sun => "sun",
            EntityKind::Climate => "climate",
            EntityKind::Weather => "weather",
        }
    }

    /// Widget type the panel draws for this kind
    pub fn render_type(self) -> &'static str {
        match self {
            EntityKind::Light => "light",
            EntityKind::Switch | EntityKind::InputBoolean | EntityKind::Automation => "switch",
            EntityKind::Fan => "fan",
            EntityKind::Cover => "shutter",
            EntityKind::Lock
            | EntityKind::Scene
            | EntityKind::Script
            | EntityKind::Button
            | EntityKind::InputButton
            | EntityKind::Vacuum => "button",
            EntityKind::Number | EntityKind::InputNumber => "number",
            EntityKind::InputSelect | EntityKind::Select => "input_sel",
            EntityKind::Timer => "timer",
            EntityKind::MediaPlayer => "media_pl",
            EntityKind::Person
            | EntityKind::Sensor
            | EntityKind::BinarySensor
            | EntityKind::InputText
            | EntityKind::AlarmControlPanel
            | EntityKind::Sun
            | EntityKind::Climate
            | EntityKind::Weather => "text",
        }
    }

    /// Whether `state` means the entity is on
    pub fn is_on(self, state: &str) -> bool {
        match self {
            EntityKind::Cover => state == "open",
            EntityKind::Lock => state == "unlocked",
            EntityKind::Timer => state == "active",
            EntityKind::MediaPlayer => state == "playing",
            _ => state == "on",
        }
    }

    /// Whether the panel can open a detail popup for this kind
    pub fn has_detail(self) -> bool {
        matches!(self, EntityKind::Light | EntityKind::Timer)
    }

    /// Attributes to subscribe to when the entity is first seen
    ///
    /// The entity state is always included. Light colour attributes are
    /// requested later, once `supported_color_modes` is known.
    pub fn subscribed_attributes(self) -> &'static [&'static str] {
        match self {
            EntityKind::Light => &[attr::STATE, attr::SUPPORTED_COLOR_MODES, attr::BRIGHTNESS],
            EntityKind::Sensor | EntityKind::BinarySensor => {
                &[attr::STATE, attr::DEVICE_CLASS, attr::UNIT_OF_MEASUREMENT]
            }
            EntityKind::Cover => &[
                attr::STATE,
                attr::DEVICE_CLASS,
                attr::SUPPORTED_FEATURES,
                attr::CURRENT_POSITION,
            ],
            EntityKind::AlarmControlPanel => &[attr::STATE, attr::CODE_ARM_REQUIRED],
            EntityKind::Timer => &[
                attr::STATE,
                attr::EDITABLE,
                attr::DURATION,
                attr::REMAINING,
                attr::FINISHES_AT,
            ],
            EntityKind::Weather => &[attr::STATE, attr::TEMPERATURE, attr::TEMPERATURE_UNIT],
            _ => &[attr::STATE],
        }
    }
}

/// Light colour modes as reported in `supported_color_modes`
pub mod color_mode {
    pub const ONOFF: &str = "onoff";
    pub const BRIGHTNESS: &str = "brightness";
    pub const COLOR_TEMP: &str = "color_temp";
    pub const HS: &str = "hs";
    pub const XY: &str = "xy";
    pub const RGB: &str = "rgb";
    pub const RGBW: &str = "rgbw";
    pub const RGBWW: &str = "rgbww";
}

/// Iterate the modes in a `supported_color_modes` value
///
/// Accepts the list forms the backend produces, e.g. `['xy', 'color_temp']`
/// or `xy,color_temp`.
pub fn color_modes(value: &str) -> impl Iterator<Item = &str> {
    value
        .split(',')
        .map(|mode| mode.trim_matches(|c: char| c == '[' || c == ']' || c == '\'' || c == '"' || c.is_whitespace()))
        .filter(|mode| !mode.is_empty())
}

/// Whether `value` lists `mode`
pub fn supports_color_mode(value: &str, mode: &str) -> bool {
    color_modes(value).any(|m| m == mode)
}

/// Follow-up subscriptions once a light reports its colour modes
pub fn color_mode_attributes(supported_color_modes: &str) -> &'static [&'static str] {
    let mut modes = color_modes(supported_color_modes);
    match (modes.next(), modes.next()) {
        (None, _) => &[],
        (Some(color_mode::ONOFF), None) => &[],
        _ if supports_color_mode(supported_color_modes, color_mode::COLOR_TEMP) => &[
            attr::COLOR_MODE,
            attr::MIN_MIREDS,
            attr::MAX_MIREDS,
            attr::COLOR_TEMP,
        ],
        _ => &[attr::COLOR_MODE],
    }
}
