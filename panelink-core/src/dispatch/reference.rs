//! Classification of button press ids

use crate::entity::EntityKind;

/// Prefix of item references sent by the panel
pub const UUID_PREFIX: &str = "uuid.";

/// What a (resolved) press id refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Reference<'a> {
    /// The screensaver surface itself
    Screensaver,
    NavPrev,
    NavNext,
    NavUp,
    /// `navigate.uuid.<page>` or `navigate.<page>`
    NavigatePage(&'a str),
    /// A backend entity
    Entity { id: &'a str, kind: EntityKind },
}

/// Item uuid inside a `uuid.<item>` reference
pub fn item_uuid(id: &str) -> Option<&str> {
    id.strip_prefix(UUID_PREFIX).filter(|uuid| !uuid.is_empty())
}

/// Classify a press id that no longer carries a `uuid.` prefix
pub fn classify(id: &str) -> Option<Reference<'_>> {
    if id == "screensaver" {
        return Some(Reference::Screensaver);
    }

    let (head, tail) = match id.split_once('.') {
        Some((head, tail)) => (head, Some(tail)),
        None => (id, None),
    };

    match (head, tail) {
        ("navPrev", _) => Some(Reference::NavPrev),
        ("navNext", _) => Some(Reference::NavNext),
        ("navUp", _) => Some(Reference::NavUp),
        ("navigate", Some(rest)) => {
            let page = rest.strip_prefix("uuid.").unwrap_or(rest);
            (!page.is_empty()).then_some(Reference::NavigatePage(page))
        }
        (_, Some(_)) => EntityKind::from_entity_id(id).map(|kind| Reference::Entity { id, kind }),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_uuid() {
        assert_eq!(item_uuid("uuid.ab12"), Some("ab12"));
        assert_eq!(item_uuid("uuid."), None);
        assert_eq!(item_uuid("light.a"), None);
    }

    #[test]
    fn test_classify_navigation() {
        assert_eq!(classify("navPrev"), Some(Reference::NavPrev));
        assert_eq!(classify("navNext.x"), Some(Reference::NavNext));
        assert_eq!(classify("navUp"), Some(Reference::NavUp));
        assert_eq!(
            classify("navigate.uuid.p2"),
            Some(Reference::NavigatePage("p2"))
        );
        assert_eq!(classify("navigate.p3"), Some(Reference::NavigatePage("p3")));
        assert_eq!(classify("navigate."), None);
    }

    #[test]
    fn test_classify_entities() {
        assert_eq!(
            classify("light.kitchen"),
            Some(Reference::Entity {
                id: "light.kitchen",
                kind: EntityKind::Light
            })
        );
        assert_eq!(classify("screensaver"), Some(Reference::Screensaver));
        assert_eq!(classify("toaster.one"), None);
        assert_eq!(classify("delete"), None);
    }
}
