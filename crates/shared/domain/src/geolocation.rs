use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// A time-zone suggestion derived from the device location.
///
/// The suggestion is in one of three states:
///
/// * **opinionated with zones**: `zone_ids` is non-empty. The first entry is the preferred
///   zone; the rest are equally plausible alternatives (e.g. near a border).
/// * **opinionated, no zone**: `zone_ids` is empty. The location has no time zone (open
///   ocean, for instance); consumers should stop looking.
/// * **unopinionated**: `zone_ids` is absent. The source cannot decide and withdraws any
///   previous suggestion.
///
/// Empty and absent are never folded into each other. Zone ids are not validated here.
///
/// `debug_info` is an append-only trail for logs. It shows up in [`fmt::Display`] but is
/// ignored by `PartialEq` and `Hash`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeolocationSuggestion {
    zone_ids: Option<Vec<String>>,
    #[serde(default)]
    debug_info: Vec<String>,
}

/// Borrowed view of the tri-state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionKind<'a> {
    Zones(&'a [String]),
    NoZone,
    Uncertain,
}

impl GeolocationSuggestion {
    #[must_use]
    pub const fn new(zone_ids: Option<Vec<String>>) -> Self {
        Self { zone_ids, debug_info: Vec::new() }
    }

    /// An opinionated suggestion; `zone_ids` may be empty.
    #[must_use]
    pub fn certain<I, S>(zone_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(Some(zone_ids.into_iter().map(Into::into).collect()))
    }

    #[must_use]
    pub const fn uncertain() -> Self {
        Self::new(None)
    }

    #[must_use]
    pub fn zone_ids(&self) -> Option<&[String]> {
        self.zone_ids.as_deref()
    }

    #[must_use]
    pub fn debug_info(&self) -> &[String] {
        &self.debug_info
    }

    #[must_use]
    pub fn kind(&self) -> SuggestionKind<'_> {
        match self.zone_ids.as_deref() {
            None => SuggestionKind::Uncertain,
            Some([]) => SuggestionKind::NoZone,
            Some(zones) => SuggestionKind::Zones(zones),
        }
    }

    /// Appends entries to the debug trail.
    pub fn add_debug_info<I, S>(&mut self, entries: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.debug_info.extend(entries.into_iter().map(Into::into));
    }

    #[must_use]
    pub fn with_debug_info(mut self, entry: impl Into<String>) -> Self {
        self.debug_info.push(entry.into());
        self
    }

    /// Human-readable rendering for diagnostics only.
    #[must_use]
    pub fn describe(&self) -> String {
        self.to_string()
    }
}

impl PartialEq for GeolocationSuggestion {
    fn eq(&self, other: &Self) -> bool {
        self.zone_ids == other.zone_ids
    }
}

impl Eq for GeolocationSuggestion {}

impl Hash for GeolocationSuggestion {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.zone_ids.hash(state);
    }
}

impl fmt::Display for GeolocationSuggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "GeolocationSuggestion{{zoneIds=")?;
        match &self.zone_ids {
            Some(zones) => write!(f, "[{}]", zones.join(", "))?,
            None => f.write_str("null")?,
        }
        write!(f, ", debugInfo=[{}]}}", self.debug_info.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::hash_map::DefaultHasher;

    fn hash_of(value: &GeolocationSuggestion) -> u64 {
        let mut hasher = DefaultHasher::new();
        value.hash(&mut hasher);
        hasher.finish()
    }

    #[test]
    fn empty_and_absent_stay_distinct() {
        let none = GeolocationSuggestion::uncertain();
        let empty = GeolocationSuggestion::certain(Vec::<String>::new());
        assert_ne!(none, empty);
        assert_eq!(none.kind(), SuggestionKind::Uncertain);
        assert_eq!(empty.kind(), SuggestionKind::NoZone);
    }

    #[test]
    fn debug_info_does_not_affect_equality_or_hash() {
        let plain = GeolocationSuggestion::certain(["Europe/Kyiv"]);
        let mut noisy = plain.clone();
        noisy.add_debug_info(["from fused provider", "accuracy=30m"]);

        assert_eq!(plain, noisy);
        assert_eq!(hash_of(&plain), hash_of(&noisy));
        assert_eq!(noisy.debug_info().len(), 2);
    }

    #[test]
    fn zone_order_matters() {
        let a = GeolocationSuggestion::certain(["America/Denver", "America/Phoenix"]);
        let b = GeolocationSuggestion::certain(["America/Phoenix", "America/Denver"]);
        assert_ne!(a, b);
    }

    #[test]
    fn describe_lists_zones_and_debug_info() {
        let suggestion =
            GeolocationSuggestion::certain(["Europe/London"]).with_debug_info("cell fix");
        assert_eq!(
            suggestion.describe(),
            "GeolocationSuggestion{zoneIds=[Europe/London], debugInfo=[cell fix]}"
        );
        assert_eq!(
            GeolocationSuggestion::uncertain().describe(),
            "GeolocationSuggestion{zoneIds=null, debugInfo=[]}"
        );
    }
}
