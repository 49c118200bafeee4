use serde::de::{Deserializer, MapAccess, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::numeric::{lenient, to_number};
use crate::types::Money;
use crate::MortgageEngineError;

/// Renovation intensity, used both per item and as the overall scope tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Light,
    #[default]
    Medium,
    Heavy,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Medium => "medium",
            Self::Heavy => "heavy",
        }
    }

    /// One tier down; `Light` is the floor.
    pub fn downgraded(self) -> Self {
        match self {
            Self::Heavy => Self::Medium,
            Self::Medium | Self::Light => Self::Light,
        }
    }

    fn parse(text: &str) -> Option<Self> {
        match text.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "medium" => Some(Self::Medium),
            "heavy" => Some(Self::Heavy),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Level {
    type Err = MortgageEngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| MortgageEngineError::InvalidInput {
            field: "level".into(),
            reason: format!("'{s}' is not one of light, medium, heavy"),
        })
    }
}

/// Scope tiers coming off the intake form fall back to `medium` when they
/// are not recognised.
impl<'de> Deserialize<'de> for Level {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let v = Value::deserialize(d)?;
        Ok(v.as_str().and_then(Self::parse).unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RehabItem {
    Kitchen,
    Bathroom,
    Flooring,
    Paint,
    Roof,
    Hvac,
    Tile,
}

impl RehabItem {
    pub const ALL: [RehabItem; 7] = [
        Self::Kitchen,
        Self::Bathroom,
        Self::Flooring,
        Self::Paint,
        Self::Roof,
        Self::Hvac,
        Self::Tile,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Kitchen => "kitchen",
            Self::Bathroom => "bathroom",
            Self::Flooring => "flooring",
            Self::Paint => "paint",
            Self::Roof => "roof",
            Self::Hvac => "hvac",
            Self::Tile => "tile",
        }
    }

    /// Sentence-case label used in notes ("Hvac", "Kitchen").
    pub fn label(&self) -> String {
        let s = self.as_str();
        let mut chars = s.chars();
        match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        }
    }
}

impl fmt::Display for RehabItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RehabItem {
    type Err = MortgageEngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|item| item.as_str() == key)
            .ok_or_else(|| MortgageEngineError::InvalidInput {
                field: "item".into(),
                reason: format!("'{s}' is not a rehab item"),
            })
    }
}

/// Item → level mapping for a renovation. `None` marks an item that is
/// listed but not scoped (removed by an optimiser or left blank on the form).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RehabItems(BTreeMap<RehabItem, Option<Level>>);

impl RehabItems {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, item: RehabItem, level: Level) -> Self {
        self.0.insert(item, Some(level));
        self
    }

    pub fn set(&mut self, item: RehabItem, level: Option<Level>) {
        self.0.insert(item, level);
    }

    /// Whether the item is listed at all, scoped or not.
    pub fn contains(&self, item: RehabItem) -> bool {
        self.0.contains_key(&item)
    }

    /// Level of a listed item; `None` when absent or unscoped.
    pub fn level(&self, item: RehabItem) -> Option<Level> {
        self.0.get(&item).copied().flatten()
    }

    /// Listed item's raw slot, distinguishing "unlisted" from "unscoped".
    pub fn slot(&self, item: RehabItem) -> Option<Option<Level>> {
        self.0.get(&item).copied()
    }

    /// Scoped items in item order.
    pub fn scoped(&self) -> impl Iterator<Item = (RehabItem, Level)> + '_ {
        self.0.iter().filter_map(|(item, level)| level.map(|l| (*item, l)))
    }

    pub fn items(&self) -> impl Iterator<Item = RehabItem> + '_ {
        self.0.keys().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<(RehabItem, Level)> for RehabItems {
    fn from_iter<I: IntoIterator<Item = (RehabItem, Level)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(i, l)| (i, Some(l))).collect())
    }
}

/// Unknown item names are dropped; unknown or blank levels become unscoped.
impl<'de> Deserialize<'de> for RehabItems {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        struct ItemsVisitor;

        impl<'de> Visitor<'de> for ItemsVisitor {
            type Value = RehabItems;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of rehab item to level")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut items = BTreeMap::new();
                while let Some((key, value)) = map.next_entry::<String, Value>()? {
                    if let Ok(item) = key.parse::<RehabItem>() {
                        items.insert(item, value.as_str().and_then(Level::parse));
                    }
                }
                Ok(RehabItems(items))
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(RehabItems::default())
            }

            fn visit_none<E: serde::de::Error>(self) -> Result<Self::Value, E> {
                Ok(RehabItems::default())
            }
        }

        d.deserialize_any(ItemsVisitor)
    }
}

/// Comparable-sales context for a deal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Comps {
    #[serde(default, deserialize_with = "lenient::money")]
    pub arv_estimate: Money,
    #[serde(default)]
    pub property: CompsProperty,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompsProperty {
    #[serde(default, deserialize_with = "lenient::money")]
    pub price: Money,
}

impl Comps {
    pub fn new(arv_estimate: Money, purchase_price: Money) -> Self {
        Self {
            arv_estimate,
            property: CompsProperty {
                price: purchase_price,
            },
        }
    }

    pub fn purchase_price(&self) -> Money {
        self.property.price
    }

    /// Resale margin before rehab.
    pub fn margin(&self) -> Money {
        self.arv_estimate.saturating_sub(self.property.price)
    }
}

/// Exit strategy for the notes generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    #[default]
    Flip,
    Rental,
    Airbnb,
    Other,
}

impl<'de> Deserialize<'de> for Strategy {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let v = Value::deserialize(d)?;
        Ok(match v.as_str().map(|s| s.trim().to_ascii_lowercase()).as_deref() {
            Some("flip") | None => Self::Flip,
            Some("rental") => Self::Rental,
            Some("airbnb") => Self::Airbnb,
            Some(_) => Self::Other,
        })
    }
}

/// Square footage off a form field; negatives and garbage count as zero.
pub fn sqft_from(value: &Value) -> Money {
    to_number(value, Money::ZERO).max(Money::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_margin_saturates() {
        let comps = Comps::new(Money::MAX, -Money::MAX);
        assert_eq!(comps.margin(), Money::MAX);
        assert_eq!(Comps::new(-Money::MAX, Money::MAX).margin(), Money::MIN);
    }

    #[test]
    fn test_items_deserialise_leniently() {
        let items: RehabItems = serde_json::from_value(json!({
            "kitchen": "Heavy",
            "bathroom": "",
            "pool": "heavy",
            "roof": 3
        }))
        .unwrap();
        assert_eq!(items.level(RehabItem::Kitchen), Some(Level::Heavy));
        assert!(items.contains(RehabItem::Bathroom));
        assert_eq!(items.level(RehabItem::Bathroom), None);
        assert_eq!(items.slot(RehabItem::Roof), Some(None));
        assert_eq!(items.items().count(), 3);
    }

    #[test]
    fn test_unknown_scope_is_medium() {
        let level: Level = serde_json::from_value(json!("gut job")).unwrap();
        assert_eq!(level, Level::Medium);
        assert!("gut job".parse::<Level>().is_err());
    }

    #[test]
    fn test_labels() {
        assert_eq!(RehabItem::Hvac.label(), "Hvac");
        assert_eq!(Level::Heavy.downgraded(), Level::Medium);
        assert_eq!(Level::Light.downgraded(), Level::Light);
    }
}
