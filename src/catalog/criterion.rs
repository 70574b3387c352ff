use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};
use std::str::FromStr;

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::constants::CRITERION_COUNT;

use super::error::CatalogError;

/// One of the eight O-1A evidentiary categories.
///
/// Variant order is the catalog order and the order of every serialized map.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Criterion {
    #[serde(rename = "Awards")]
    Awards,
    #[serde(rename = "Memberships")]
    Memberships,
    #[serde(rename = "Press Mentions")]
    PressMentions,
    #[serde(rename = "Judging")]
    Judging,
    #[serde(rename = "Original Contribution")]
    OriginalContribution,
    #[serde(rename = "Scholarly Articles")]
    ScholarlyArticles,
    #[serde(rename = "Critical Employment")]
    CriticalEmployment,
    #[serde(rename = "High Remuneration")]
    HighRemuneration,
}

impl Criterion {
    /// All criteria, in catalog order.
    pub const ALL: [Criterion; CRITERION_COUNT] = [
        Criterion::Awards,
        Criterion::Memberships,
        Criterion::PressMentions,
        Criterion::Judging,
        Criterion::OriginalContribution,
        Criterion::ScholarlyArticles,
        Criterion::CriticalEmployment,
        Criterion::HighRemuneration,
    ];

    /// Position in [`Criterion::ALL`].
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Human-readable label used on the wire.
    pub const fn label(self) -> &'static str {
        match self {
            Criterion::Awards => "Awards",
            Criterion::Memberships => "Memberships",
            Criterion::PressMentions => "Press Mentions",
            Criterion::Judging => "Judging",
            Criterion::OriginalContribution => "Original Contribution",
            Criterion::ScholarlyArticles => "Scholarly Articles",
            Criterion::CriticalEmployment => "Critical Employment",
            Criterion::HighRemuneration => "High Remuneration",
        }
    }

    /// Looks up a criterion by label (trimmed, case-insensitive).
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(label))
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

const LABELS: &[&str] = &[
    "Awards",
    "Memberships",
    "Press Mentions",
    "Judging",
    "Original Contribution",
    "Scholarly Articles",
    "Critical Employment",
    "High Remuneration",
];

// Same leniency as `from_label`, so catalog files and score maps accept the same spellings.
impl<'de> Deserialize<'de> for Criterion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label = String::deserialize(deserializer)?;
        Criterion::from_label(&label).ok_or_else(|| de::Error::unknown_variant(&label, LABELS))
    }
}

impl FromStr for Criterion {
    type Err = CatalogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| CatalogError::UnknownCriterion {
            label: s.to_string(),
        })
    }
}

/// A value for every [`Criterion`].
///
/// Backed by a fixed array, so a map that is missing a criterion cannot be built. Serializes as
/// a JSON object keyed by label, in catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct CriterionMap<T>([T; CRITERION_COUNT]);

impl<T> CriterionMap<T> {
    /// Builds a map by calling `f` once per criterion, in catalog order.
    pub fn from_fn(mut f: impl FnMut(Criterion) -> T) -> Self {
        Self(std::array::from_fn(|i| f(Criterion::ALL[i])))
    }

    pub fn get(&self, criterion: Criterion) -> &T {
        &self.0[criterion.index()]
    }

    pub fn get_mut(&mut self, criterion: Criterion) -> &mut T {
        &mut self.0[criterion.index()]
    }

    /// Iterates `(criterion, value)` pairs in catalog order.
    pub fn iter(&self) -> impl Iterator<Item = (Criterion, &T)> + '_ {
        Criterion::ALL.into_iter().zip(self.0.iter())
    }

    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.0.iter()
    }

    pub fn map<U>(self, mut f: impl FnMut(Criterion, T) -> U) -> CriterionMap<U> {
        let mut position = 0;
        CriterionMap(self.0.map(|value| {
            let criterion = Criterion::ALL[position];
            position += 1;
            f(criterion, value)
        }))
    }
}

impl<T: Default> Default for CriterionMap<T> {
    fn default() -> Self {
        Self::from_fn(|_| T::default())
    }
}

impl<T> IntoIterator for CriterionMap<T> {
    type Item = (Criterion, T);
    type IntoIter = std::iter::Zip<
        std::array::IntoIter<Criterion, CRITERION_COUNT>,
        std::array::IntoIter<T, CRITERION_COUNT>,
    >;

    fn into_iter(self) -> Self::IntoIter {
        Criterion::ALL.into_iter().zip(self.0)
    }
}

impl<T> Index<Criterion> for CriterionMap<T> {
    type Output = T;

    fn index(&self, criterion: Criterion) -> &T {
        self.get(criterion)
    }
}

impl<T> IndexMut<Criterion> for CriterionMap<T> {
    fn index_mut(&mut self, criterion: Criterion) -> &mut T {
        self.get_mut(criterion)
    }
}

impl<T: Serialize> Serialize for CriterionMap<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(CRITERION_COUNT))?;
        for (criterion, value) in self.iter() {
            map.serialize_entry(criterion.label(), value)?;
        }
        map.end()
    }
}

impl<'de, T: Deserialize<'de> + Default> Deserialize<'de> for CriterionMap<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(CriterionMapVisitor(PhantomData))
    }
}

struct CriterionMapVisitor<T>(PhantomData<T>);

impl<'de, T: Deserialize<'de> + Default> Visitor<'de> for CriterionMapVisitor<T> {
    type Value = CriterionMap<T>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "a map with an entry for each of the {CRITERION_COUNT} criteria")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut slots: [Option<T>; CRITERION_COUNT] = std::array::from_fn(|_| None);

        while let Some(criterion) = access.next_key::<Criterion>()? {
            let slot = &mut slots[criterion.index()];
            if slot.is_some() {
                return Err(de::Error::custom(format!(
                    "duplicate criterion `{}`",
                    criterion.label()
                )));
            }
            *slot = Some(access.next_value()?);
        }

        if let Some(missing) = Criterion::ALL
            .into_iter()
            .find(|c| slots[c.index()].is_none())
        {
            return Err(de::Error::missing_field(missing.label()));
        }

        // Every slot is filled at this point.
        let mut values = slots.into_iter();
        Ok(CriterionMap::from_fn(|_| {
            values.next().flatten().unwrap_or_default()
        }))
    }
}
