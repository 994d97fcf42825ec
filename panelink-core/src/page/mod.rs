//! Page and page item model
//!
//! Pages are built once at startup and never change. Items bound to an
//! entity carry a [`StatefulBinding`]; everything else (navigation buttons,
//! spacers, static text) only has an internal id.

pub mod render;
pub mod set;

pub use render::LovelaceRenderer;
pub use set::PageSet;

use alloc::string::String;
use alloc::vec::Vec;

use crate::entity::{EntityHandle, EntityKind, EntityStore};

/// Icon colour for items whose entity is on
pub const ICON_COLOR_ON: u16 = 64909;

/// Icon colour for items whose entity is off
pub const ICON_COLOR_OFF: u16 = 17299;

/// Card layouts the panel knows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum PageKind {
    Screensaver,
    CardGrid,
    CardGrid2,
    CardEntities,
    CardThermo,
    CardMedia,
    CardUnlock,
    CardQr,
    CardPower,
    CardAlarm,
}

impl PageKind {
    /// Token sent with `pageType`
    pub fn as_str(self) -> &'static str {
        match self {
            PageKind::Screensaver => "screensaver",
            PageKind::CardGrid => "cardGrid",
            PageKind::CardGrid2 => "cardGrid2",
            PageKind::CardEntities => "cardEntities",
            PageKind::CardThermo => "cardThermo",
            PageKind::CardMedia => "cardMedia",
            PageKind::CardUnlock => "cardUnlock",
            PageKind::CardQr => "cardQR",
            PageKind::CardPower => "cardPower",
            PageKind::CardAlarm => "cardAlarm",
        }
    }

    pub fn parse(token: &str) -> Option<Self> {
        let kind = match token {
            "screensaver" => PageKind::Screensaver,
            "cardGrid" => PageKind::CardGrid,
            "cardGrid2" => PageKind::CardGrid2,
            "cardEntities" => PageKind::CardEntities,
            "cardThermo" => PageKind::CardThermo,
            "cardMedia" => PageKind::CardMedia,
            "cardUnlock" => PageKind::CardUnlock,
            "cardQR" => PageKind::CardQr,
            "cardPower" => PageKind::CardPower,
            "cardAlarm" => PageKind::CardAlarm,
            _ => return None,
        };
        Some(kind)
    }
}

/// Entity reference carried by a stateful item
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct StatefulBinding {
    pub entity: EntityHandle,
    pub kind: EntityKind,
}

/// One renderable unit on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageItem {
    /// Unique across the whole page set
    pub uuid: String,
    /// Entity id for stateful items, otherwise an internal id such as
    /// `navigate.uuid.<page>` or `delete`
    pub target: String,
    pub name: String,
    /// Icon glyph; on stateful items this overrides the kind's default
    pub icon: Option<String>,
    pub stateful: Option<StatefulBinding>,
}

impl PageItem {
    /// Item that is not bound to an entity
    pub fn internal(uuid: &str, target: &str) -> Self {
        Self {
            uuid: String::from(uuid),
            target: String::from(target),
            name: String::new(),
            icon: None,
            stateful: None,
        }
    }

    /// Item for `target`, bound to its entity when the domain is supported
    pub fn for_target(uuid: &str, target: &str, entities: &mut EntityStore) -> Self {
        let mut item = Self::internal(uuid, target);
        if let Some(kind) = EntityKind::from_entity_id(target) {
            item.stateful = Some(StatefulBinding {
                entity: entities.get_or_create(target),
                kind,
            });
        }
        item
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = String::from(name);
        self
    }

    pub fn with_icon(mut self, icon: &str) -> Self {
        self.icon = Some(String::from(icon));
        self
    }

    pub fn is_stateful(&self) -> bool {
        self.stateful.is_some()
    }

    /// Whether this item is bound to `entity`
    pub fn is_bound_to(&self, entity: EntityHandle) -> bool {
        self.stateful.is_some_and(|binding| binding.entity == entity)
    }

    /// Icon colour derived from the bound entity's state
    pub fn icon_color(&self, entities: &EntityStore) -> u16 {
        let on = self
            .stateful
            .and_then(|binding| entities.get(binding.entity))
            .is_some_and(|entity| entity.is_on());
        if on {
            ICON_COLOR_ON
        } else {
            ICON_COLOR_OFF
        }
    }
}

/// An ordered list of items with a layout
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub uuid: String,
    pub kind: PageKind,
    pub title: String,
    /// Panel inactivity timeout in seconds
    pub sleep_timeout: u16,
    pub items: Vec<PageItem>,
}

impl Page {
    pub fn new(uuid: &str, kind: PageKind) -> Self {
        Self {
            uuid: String::from(uuid),
            kind,
            title: String::new(),
            sleep_timeout: 10,
            items: Vec::new(),
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = String::from(title);
        self
    }

    pub fn with_sleep_timeout(mut self, seconds: u16) -> Self {
        self.sleep_timeout = seconds;
        self
    }

    pub fn with_item(mut self, item: PageItem) -> Self {
        self.items.push(item);
        self
    }

    pub fn is_screensaver(&self) -> bool {
        self.kind == PageKind::Screensaver
    }

    /// Stateful item with `uuid` on this page only
    pub fn stateful_item(&self, uuid: &str) -> Option<&PageItem> {
        self.items
            .iter()
            .find(|item| item.uuid == uuid)
            .filter(|item| item.is_stateful())
    }

    /// Whether any stateful item on this page is bound to `entity`
    pub fn shows_entity(&self, entity: EntityHandle) -> bool {
        self.items.iter().any(|item| item.is_bound_to(entity))
    }
}
