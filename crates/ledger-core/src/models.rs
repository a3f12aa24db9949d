use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;

// ── Amount ─────────────────────────────────────────────────────────────────────

/// A monetary figure as reported in a filing.
///
/// Either a finite, non-negative value or an explicit missing marker. There is
/// no third state: anything that fails coercion becomes [`Amount::MISSING`].
/// Serialises as a JSON number or `null`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(Option<f64>);

impl Amount {
    /// The missing-value sentinel.
    pub const MISSING: Amount = Amount(None);

    /// Wrap `value`, mapping negatives, NaN and infinities to missing.
    pub fn new(value: f64) -> Self {
        if value.is_finite() && value >= 0.0 {
            // Normalise -0.0 so equality and serialisation stay stable.
            Amount(Some(value + 0.0))
        } else {
            Amount::MISSING
        }
    }

    /// The reported value, if any.
    pub fn value(self) -> Option<f64> {
        self.0
    }

    /// The reported value, with missing counted as zero.
    pub fn or_zero(self) -> f64 {
        self.0.unwrap_or(0.0)
    }

    pub fn is_missing(self) -> bool {
        self.0.is_none()
    }

    /// `true` when a value is present and strictly positive.
    pub fn is_positive(self) -> bool {
        self.0.is_some_and(|v| v > 0.0)
    }
}

impl From<f64> for Amount {
    fn from(value: f64) -> Self {
        Amount::new(value)
    }
}

impl From<Option<f64>> for Amount {
    fn from(value: Option<f64>) -> Self {
        value.map(Amount::new).unwrap_or(Amount::MISSING)
    }
}

// ── AmountField ────────────────────────────────────────────────────────────────

/// Selects one of the four numeric columns of a [`FinancialRecord`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmountField {
    Raised,
    Spent,
    Loans,
    CashOnHand,
}

impl AmountField {
    /// Read this field from `record`.
    pub fn get(self, record: &FinancialRecord) -> Amount {
        match self {
            AmountField::Raised => record.raised,
            AmountField::Spent => record.spent,
            AmountField::Loans => record.loans,
            AmountField::CashOnHand => record.cash_on_hand,
        }
    }
}

// ── Records ────────────────────────────────────────────────────────────────────

/// One campaign-finance filing for one official in one report period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancialRecord {
    /// Filer name as it appears in the dataset.
    pub official_name: String,
    /// Office sought or held, e.g. "County Judge".
    #[serde(default)]
    pub position: String,
    #[serde(default)]
    pub precinct: Option<String>,
    /// Report period label. Chronology comes from dataset order, not from
    /// the label itself.
    pub report_period: String,
    pub year: i32,
    #[serde(default)]
    pub raised: Amount,
    #[serde(default)]
    pub spent: Amount,
    #[serde(default)]
    pub loans: Amount,
    #[serde(default)]
    pub cash_on_hand: Amount,
}

/// A single lobbyist registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LobbyistRecord {
    pub lobbyist_name: String,
    pub client: String,
    /// Open vocabulary; not validated against any list.
    pub category: String,
}

/// A county vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorRecord {
    pub vendor_name: String,
    pub category: String,
    pub department: String,
}

// ── Roster ─────────────────────────────────────────────────────────────────────

/// Static profile for one sitting official.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficialProfile {
    /// Filled from the roster map key when loaded from JSON.
    #[serde(default)]
    pub name: String,
    pub party: String,
    pub office_since: i32,
    #[serde(default)]
    pub notes: String,
    /// Seat label, e.g. "Commissioner Precinct 1".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

/// The current governing body: official name → profile.
///
/// Passed explicitly into every roster-scoped computation. Name matching is
/// exact; there is no normalisation at this layer.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Roster {
    profiles: BTreeMap<String, OfficialProfile>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a roster from profiles. A later profile with the same name
    /// replaces an earlier one.
    pub fn from_profiles(profiles: impl IntoIterator<Item = OfficialProfile>) -> Self {
        let mut roster = Self::new();
        for profile in profiles {
            roster.insert(profile);
        }
        roster
    }

    pub fn insert(&mut self, profile: OfficialProfile) {
        self.profiles.insert(profile.name.clone(), profile);
    }

    pub fn get(&self, name: &str) -> Option<&OfficialProfile> {
        self.profiles.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.profiles.contains_key(name)
    }

    /// Number of officials tracked.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    /// Official names in ascending order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.profiles.keys().map(String::as_str)
    }

    pub fn profiles(&self) -> impl Iterator<Item = &OfficialProfile> {
        self.profiles.values()
    }
}

impl<'de> Deserialize<'de> for Roster {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let map = BTreeMap::<String, OfficialProfile>::deserialize(deserializer)?;
        Ok(Self::from_profiles(map.into_iter().map(|(name, mut profile)| {
            profile.name = name;
            profile
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── Amount ─────────────────────────────────────────────────────────────

    #[test]
    fn test_amount_rejects_negative_and_non_finite() {
        assert!(Amount::new(-1.0).is_missing());
        assert!(Amount::new(f64::NAN).is_missing());
        assert!(Amount::new(f64::INFINITY).is_missing());
        assert_eq!(Amount::new(12.5).value(), Some(12.5));
    }

    #[test]
    fn test_amount_negative_zero_is_zero() {
        let amount = Amount::new(-0.0);
        assert_eq!(amount.value(), Some(0.0));
        assert!(!amount.is_positive());
    }

    #[test]
    fn test_amount_or_zero() {
        assert_eq!(Amount::MISSING.or_zero(), 0.0);
        assert_eq!(Amount::new(42.0).or_zero(), 42.0);
    }

    #[test]
    fn test_amount_serde_number_and_null() {
        assert_eq!(serde_json::to_string(&Amount::new(100.0)).unwrap(), "100.0");
        assert_eq!(serde_json::to_string(&Amount::MISSING).unwrap(), "null");
        let back: Amount = serde_json::from_str("null").unwrap();
        assert!(back.is_missing());
    }

    // ── AmountField ────────────────────────────────────────────────────────

    #[test]
    fn test_amount_field_get() {
        let record = FinancialRecord {
            official_name: "Jane Doe".into(),
            position: "County Judge".into(),
            precinct: None,
            report_period: "July 2024".into(),
            year: 2024,
            raised: Amount::new(1.0),
            spent: Amount::new(2.0),
            loans: Amount::new(3.0),
            cash_on_hand: Amount::new(4.0),
        };
        assert_eq!(AmountField::Raised.get(&record).value(), Some(1.0));
        assert_eq!(AmountField::Spent.get(&record).value(), Some(2.0));
        assert_eq!(AmountField::Loans.get(&record).value(), Some(3.0));
        assert_eq!(AmountField::CashOnHand.get(&record).value(), Some(4.0));
    }

    // ── Roster ─────────────────────────────────────────────────────────────

    #[test]
    fn test_roster_deserialize_fills_names_from_keys() {
        let json = r#"{
            "Jane Doe": {"party": "D", "office_since": 2019, "notes": "first term"},
            "John Roe": {"party": "R", "office_since": 2021, "position": "Commissioner Precinct 3"}
        }"#;
        let roster: Roster = serde_json::from_str(json).unwrap();
        assert_eq!(roster.len(), 2);
        let jane = roster.get("Jane Doe").unwrap();
        assert_eq!(jane.name, "Jane Doe");
        assert_eq!(jane.office_since, 2019);
        assert_eq!(
            roster.get("John Roe").unwrap().position.as_deref(),
            Some("Commissioner Precinct 3")
        );
        assert_eq!(roster.get("John Roe").unwrap().notes, "");
    }

    #[test]
    fn test_roster_matching_is_exact() {
        let roster = Roster::from_profiles([OfficialProfile {
            name: "Jane Doe".into(),
            party: "D".into(),
            office_since: 2019,
            notes: String::new(),
            position: None,
        }]);
        assert!(roster.contains("Jane Doe"));
        assert!(!roster.contains("jane doe"));
        assert!(!roster.contains("Jane Doe "));
    }

    #[test]
    fn test_roster_names_sorted() {
        let profile = |name: &str| OfficialProfile {
            name: name.into(),
            party: "I".into(),
            office_since: 2020,
            notes: String::new(),
            position: None,
        };
        let roster = Roster::from_profiles([profile("Zed"), profile("Amy"), profile("Moe")]);
        let names: Vec<&str> = roster.names().collect();
        assert_eq!(names, vec!["Amy", "Moe", "Zed"]);
    }
}
