//! Ordered variant-to-percentage map.
//!
//! Assignment walks the split in insertion order, so the order has to
//! survive JSON round trips. Serialized as a plain JSON object.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrafficSplit(Vec<(String, f64)>);

impl TrafficSplit {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Insert or overwrite an entry. Overwrites keep the original position.
    pub fn insert(&mut self, variant: impl Into<String>, percentage: f64) {
        let variant = variant.into();
        match self.0.iter_mut().find(|(id, _)| *id == variant) {
            Some(entry) => entry.1 = percentage,
            None => self.0.push((variant, percentage)),
        }
    }

    pub fn get(&self, variant: &str) -> Option<f64> {
        self.0
            .iter()
            .find(|(id, _)| id == variant)
            .map(|(_, pct)| *pct)
    }

    pub fn contains(&self, variant: &str) -> bool {
        self.get(variant).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(id, pct)| (id.as_str(), *pct))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total(&self) -> f64 {
        self.0.iter().map(|(_, pct)| pct).sum()
    }

    pub fn first(&self) -> Option<&str> {
        self.0.first().map(|(id, _)| id.as_str())
    }

    /// Rescale every entry so the split sums to 100. No-op on a zero total.
    pub fn normalized(&self) -> Self {
        let total = self.total();
        if total == 0.0 {
            return self.clone();
        }
        Self(
            self.0
                .iter()
                .map(|(id, pct)| (id.clone(), pct * 100.0 / total))
                .collect(),
        )
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for TrafficSplit {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        let mut split = TrafficSplit::new();
        for (k, v) in iter {
            split.insert(k, v);
        }
        split
    }
}

impl Serialize for TrafficSplit {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (id, pct) in &self.0 {
            map.serialize_entry(id, pct)?;
        }
        map.end()
    }
}

struct SplitVisitor;

impl<'de> Visitor<'de> for SplitVisitor {
    type Value = TrafficSplit;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of variant id to percentage")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut split = TrafficSplit::new();
        while let Some((id, pct)) = access.next_entry::<String, f64>()? {
            split.insert(id, pct);
        }
        Ok(split)
    }
}

impl<'de> Deserialize<'de> for TrafficSplit {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(SplitVisitor)
    }
}
