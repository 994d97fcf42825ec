//! Inbound message grammar
//!
//! Panel → Controller payloads are comma separated ASCII:
//! - `event,buttonPress2,<id>,<type>[,<value>]`
//! - `event,pageOpenDetail,<type>,<id>`
//! - `event,sleepReached[,...]`
//! - `event,startup[,...]`
//!
//! Parsing borrows from the payload; nothing is copied.

use heapless::Vec;

/// Upper bound on tokens inspected per message
///
/// The fifth token of a button press is the value and keeps any commas it
/// contains.
pub const MAX_TOKENS: usize = 5;

/// Errors from parsing an inbound payload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MessageError {
    /// First token is not `event` (includes empty payloads)
    NotAnEvent,
    /// A token required by the action is absent or empty
    MissingField,
    /// Action name is not part of the grammar
    UnknownAction,
    /// Payload bytes are not valid UTF-8
    InvalidUtf8,
}

/// Event reported by the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PanelEvent<'a> {
    /// A widget was pressed or dragged
    ButtonPress {
        /// Entity id, `uuid.<item>` reference or internal token
        id: &'a str,
        /// Raw button type token
        button: &'a str,
        /// Optional value (slider position, on/off, code...)
        value: Option<&'a str>,
    },
    /// The panel wants a detail popup for an item
    OpenDetail {
        /// `uuid.<item>` reference
        id: &'a str,
    },
    /// Panel inactivity timeout elapsed
    SleepReached,
    /// Panel (re)booted
    Startup,
}

impl<'a> PanelEvent<'a> {
    /// Parse a decoded frame payload
    pub fn parse(payload: &'a [u8]) -> Result<Self, MessageError> {
        let text = core::str::from_utf8(payload).map_err(|_| MessageError::InvalidUtf8)?;
        Self::parse_str(text)
    }

    /// Parse an already validated text payload
    pub fn parse_str(text: &'a str) -> Result<Self, MessageError> {
        let mut tokens: Vec<&'a str, MAX_TOKENS> = Vec::new();
        for token in text.splitn(MAX_TOKENS, ',') {
            // splitn never yields more than MAX_TOKENS items
            let _ = tokens.push(token);
        }

        if tokens.first().copied() != Some("event") {
            return Err(MessageError::NotAnEvent);
        }

        let action = tokens.get(1).copied().ok_or(MessageError::MissingField)?;
        match action {
            "buttonPress2" => {
                let id = required(&tokens, 2)?;
                let button = required(&tokens, 3)?;
                let value = tokens.get(4).copied();
                Ok(PanelEvent::ButtonPress { id, button, value })
            }
            "pageOpenDetail" => Ok(PanelEvent::OpenDetail {
                id: required(&tokens, 3)?,
            }),
            "sleepReached" => Ok(PanelEvent::SleepReached),
            "startup" => Ok(PanelEvent::Startup),
            _ => Err(MessageError::UnknownAction),
        }
    }
}

fn required<'a>(tokens: &[&'a str], index: usize) -> Result<&'a str, MessageError> {
    match tokens.get(index) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(MessageError::MissingField),
    }
}

/// Alarm panel actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmAction {
    Disarm,
    ArmHome,
    ArmAway,
    ArmNight,
    ArmVacation,
}

impl AlarmAction {
    /// Backend service action, e.g. `alarm_arm_home`
    pub fn service_action(self) -> &'static str {
        match self {
            AlarmAction::Disarm => "alarm_disarm",
            AlarmAction::ArmHome => "alarm_arm_home",
            AlarmAction::ArmAway => "alarm_arm_away",
            AlarmAction::ArmNight => "alarm_arm_night",
            AlarmAction::ArmVacation => "alarm_arm_vacation",
        }
    }
}

/// Timer detail actions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerAction {
    Start,
    Pause,
    Cancel,
    Finish,
}

impl TimerAction {
    /// Token used both on the panel and as the backend action name
    pub fn as_str(self) -> &'static str {
        match self {
            TimerAction::Start => "start",
            TimerAction::Pause => "pause",
            TimerAction::Cancel => "cancel",
            TimerAction::Finish => "finish",
        }
    }
}

/// Button types the controller acts on
///
/// Tokens outside this set (climate modes, speaker select...) parse to
/// `None` and are ignored by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonType {
    /// `bExit`: leave a popup or the screensaver
    Exit,
    /// `sleepReached`
    SleepReached,
    /// `OnOff`
    OnOff,
    /// `number-set`
    NumberSet,
    /// `button`
    Button,
    /// `up`
    Up,
    /// `stop`
    Stop,
    /// `down`
    Down,
    /// `positionSlider`
    PositionSlider,
    /// `tiltOpen`
    TiltOpen,
    /// `tiltStop`
    TiltStop,
    /// `tiltClose`
    TiltClose,
    /// `tiltSlider`
    TiltSlider,
    /// `media-next`
    MediaNext,
    /// `media-back`
    MediaBack,
    /// `media-pause`
    MediaPause,
    /// `media-OnOff`
    MediaOnOff,
    /// `volumeSlider`
    VolumeSlider,
    /// `brightnessSlider`
    BrightnessSlider,
    /// `colorTempSlider`
    ColorTempSlider,
    /// `colorWheel`
    ColorWheel,
    /// `disarm`, `arm_home`, `arm_away`, `arm_night`, `arm_vacation`
    Alarm(AlarmAction),
    /// `timer-start`, `timer-pause`, `timer-cancel`, `timer-finish`
    Timer(TimerAction),
}

impl ButtonType {
    /// Map a button type token to its variant
    pub fn parse(token: &str) -> Option<Self> {
        let button = match token {
            "bExit" => ButtonType::Exit,
            "sleepReached" => ButtonType::SleepReached,
            "OnOff" => ButtonType::OnOff,
            "number-set" => ButtonType::NumberSet,
            "button" => ButtonType::Button,
            "up" => ButtonType::Up,
            "stop" => ButtonType::Stop,
            "down" => ButtonType::Down,
            "positionSlider" => ButtonType::PositionSlider,
            "tiltOpen" => ButtonType::TiltOpen,
            "tiltStop" => ButtonType::TiltStop,
            "tiltClose" => ButtonType::TiltClose,
            "tiltSlider" => ButtonType::TiltSlider,
            "media-next" => ButtonType::MediaNext,
            "media-back" => ButtonType::MediaBack,
            "media-pause" => ButtonType::MediaPause,
            "media-OnOff" => ButtonType::MediaOnOff,
            "volumeSlider" => ButtonType::VolumeSlider,
            "brightnessSlider" => ButtonType::BrightnessSlider,
            "colorTempSlider" => ButtonType::ColorTempSlider,
            "colorWheel" => ButtonType::ColorWheel,
            "disarm" => ButtonType::Alarm(AlarmAction::Disarm),
            "arm_home" => ButtonType::Alarm(AlarmAction::ArmHome),
            "arm_away" => ButtonType::Alarm(AlarmAction::ArmAway),
            "arm_night" => ButtonType::Alarm(AlarmAction::ArmNight),
            "arm_vacation" => ButtonType::Alarm(AlarmAction::ArmVacation),
            "timer-start" => ButtonType::Timer(TimerAction::Start),
            "timer-pause" => ButtonType::Timer(TimerAction::Pause),
            "timer-cancel" => ButtonType::Timer(TimerAction::Cancel),
            "timer-finish" => ButtonType::Timer(TimerAction::Finish),
            _ => return None,
        };
        Some(button)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_button_press_with_value() {
        let event = PanelEvent::parse(b"event,buttonPress2,light.kitchen,brightnessSlider,42");
        assert_eq!(
            event,
            Ok(PanelEvent::ButtonPress {
                id: "light.kitchen",
                button: "brightnessSlider",
                value: Some("42"),
            })
        );
    }

    #[test]
    fn test_parse_button_press_without_value() {
        let event = PanelEvent::parse(b"event,buttonPress2,screensaver,bExit");
        assert_eq!(
            event,
            Ok(PanelEvent::ButtonPress {
                id: "screensaver",
                button: "bExit",
                value: None,
            })
        );
    }

    #[test]
    fn test_value_keeps_commas() {
        let event = PanelEvent::parse_str("event,buttonPress2,alarm_control_panel.home,arm_home,12,34");
        match event {
            Ok(PanelEvent::ButtonPress { value, .. }) => assert_eq!(value, Some("12,34")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_parse_open_detail() {
        let event = PanelEvent::parse(b"event,pageOpenDetail,popupLight,uuid.abc123");
        assert_eq!(event, Ok(PanelEvent::OpenDetail { id: "uuid.abc123" }));
    }

    #[test]
    fn test_parse_control_tokens() {
        assert_eq!(
            PanelEvent::parse(b"event,sleepReached,cardEntities"),
            Ok(PanelEvent::SleepReached)
        );
        assert_eq!(
            PanelEvent::parse(b"event,startup,45,eu"),
            Ok(PanelEvent::Startup)
        );
    }

    #[test]
    fn test_parse_rejects_non_event() {
        assert_eq!(PanelEvent::parse(b""), Err(MessageError::NotAnEvent));
        assert_eq!(
            PanelEvent::parse(b"action,startup"),
            Err(MessageError::NotAnEvent)
        );
    }

    #[test]
    fn test_parse_missing_fields() {
        assert_eq!(PanelEvent::parse(b"event"), Err(MessageError::MissingField));
        assert_eq!(
            PanelEvent::parse(b"event,buttonPress2,light.a"),
            Err(MessageError::MissingField)
        );
        assert_eq!(
            PanelEvent::parse(b"event,pageOpenDetail,popupLight"),
            Err(MessageError::MissingField)
        );
    }

    #[test]
    fn test_parse_unknown_action() {
        assert_eq!(
            PanelEvent::parse(b"event,renderCurrentPage,x"),
            Err(MessageError::UnknownAction)
        );
    }

    #[test]
    fn test_parse_invalid_utf8() {
        assert_eq!(
            PanelEvent::parse(&[b'e', 0xFF, 0xFE]),
            Err(MessageError::InvalidUtf8)
        );
    }

    #[test]
    fn test_button_type_tokens() {
        assert_eq!(ButtonType::parse("bExit"), Some(ButtonType::Exit));
        assert_eq!(ButtonType::parse("OnOff"), Some(ButtonType::OnOff));
        assert_eq!(
            ButtonType::parse("arm_vacation"),
            Some(ButtonType::Alarm(AlarmAction::ArmVacation))
        );
        assert_eq!(
            ButtonType::parse("timer-pause"),
            Some(ButtonType::Timer(TimerAction::Pause))
        );
        assert_eq!(ButtonType::parse("hvac_action"), None);
        assert_eq!(ButtonType::parse("onoff"), None);
    }

    #[test]
    fn test_alarm_service_action() {
        assert_eq!(AlarmAction::ArmNight.service_action(), "alarm_arm_night");
        assert_eq!(AlarmAction::Disarm.service_action(), "alarm_disarm");
    }
}
