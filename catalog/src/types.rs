use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

/// Lower bound of the price slider and of valid price filters.
pub const PRICE_FLOOR: f64 = 0.0;
/// Upper bound of the price slider and of valid price filters.
pub const PRICE_CEIL: f64 = 999.0;

/// Pricing classification of an item.
///
/// The discriminants are the wire codes used by the data source and the URL query.
/// With `feature = "serde"`, tiers (de)serialize as those numeric codes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u8", into = "u8"))]
pub enum PricingTier {
    Paid = 0,
    Free = 1,
    ViewOnly = 2,
}

impl PricingTier {
    /// All tiers, in the order a filter panel lists them.
    pub const ALL: [PricingTier; 3] = [Self::Paid, Self::Free, Self::ViewOnly];

    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Paid),
            1 => Some(Self::Free),
            2 => Some(Self::ViewOnly),
            _ => None,
        }
    }

    pub const fn code(self) -> u8 {
        self as u8
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Paid => "Paid",
            Self::Free => "Free",
            Self::ViewOnly => "View Only",
        }
    }
}

impl fmt::Display for PricingTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A numeric tier code outside of the known range.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidTierCode(pub u8);

impl fmt::Display for InvalidTierCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid pricing tier code: {}", self.0)
    }
}

impl TryFrom<u8> for PricingTier {
    type Error = InvalidTierCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        Self::from_code(code).ok_or(InvalidTierCode(code))
    }
}

impl From<PricingTier> for u8 {
    fn from(tier: PricingTier) -> Self {
        tier.code()
    }
}

/// A small set of pricing tiers.
///
/// An empty set means "no tier constraint". Iteration always yields tiers in code order.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "Vec<PricingTier>", into = "Vec<PricingTier>")
)]
pub struct TierSet(u8);

impl TierSet {
    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    pub const fn contains(self, tier: PricingTier) -> bool {
        self.0 & (1 << tier.code()) != 0
    }

    pub fn insert(&mut self, tier: PricingTier) {
        self.0 |= 1 << tier.code();
    }

    pub fn remove(&mut self, tier: PricingTier) {
        self.0 &= !(1 << tier.code());
    }

    /// Adds `tier` if absent, removes it otherwise. Returns whether it is now selected.
    pub fn toggle(&mut self, tier: PricingTier) -> bool {
        self.0 ^= 1 << tier.code();
        self.contains(tier)
    }

    pub fn iter(self) -> impl Iterator<Item = PricingTier> {
        PricingTier::ALL.into_iter().filter(move |t| self.contains(*t))
    }
}

impl FromIterator<PricingTier> for TierSet {
    fn from_iter<I: IntoIterator<Item = PricingTier>>(iter: I) -> Self {
        let mut set = Self::empty();
        for tier in iter {
            set.insert(tier);
        }
        set
    }
}

impl From<Vec<PricingTier>> for TierSet {
    fn from(tiers: Vec<PricingTier>) -> Self {
        tiers.into_iter().collect()
    }
}

impl From<TierSet> for Vec<PricingTier> {
    fn from(set: TierSet) -> Self {
        set.iter().collect()
    }
}

impl fmt::Debug for TierSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Ordering applied after filtering.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum SortMode {
    /// Arrival order.
    #[default]
    Relevance,
    Name,
    PriceHigh,
    PriceLow,
}

impl SortMode {
    pub const ALL: [SortMode; 4] = [Self::Relevance, Self::Name, Self::PriceHigh, Self::PriceLow];

    /// The wire name used in URL queries.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Relevance => "relevance",
            Self::Name => "name",
            Self::PriceHigh => "priceHigh",
            Self::PriceLow => "priceLow",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Relevance => "Relevance",
            Self::Name => "Item Name",
            Self::PriceHigh => "Higher Price",
            Self::PriceLow => "Lower Price",
        }
    }
}

impl fmt::Display for SortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A sort name that is not one of the known modes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownSortMode(pub String);

impl fmt::Display for UnknownSortMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown sort mode: {:?}", self.0)
    }
}

impl FromStr for SortMode {
    type Err = UnknownSortMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| UnknownSortMode(String::from(s)))
    }
}

/// Inclusive price bounds for `Paid` items.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    /// Creates a range, swapping the bounds if they are given in reverse.
    pub fn new(a: f64, b: f64) -> Self {
        if b < a {
            Self { min: b, max: a }
        } else {
            Self { min: a, max: b }
        }
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }

    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

impl Default for PriceRange {
    fn default() -> Self {
        Self {
            min: PRICE_FLOOR,
            max: PRICE_CEIL,
        }
    }
}

/// A record as delivered by the data source, before an id is assigned.
///
/// With `feature = "serde"`, this type deserializes from the source's camelCase JSON objects.
/// `id` accepts either a string or an integer.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct RawItem {
    #[cfg_attr(
        feature = "serde",
        serde(
            default,
            deserialize_with = "source_id::deserialize",
            skip_serializing_if = "Option::is_none"
        )
    )]
    pub id: Option<String>,
    pub title: Option<String>,
    pub user_name: Option<String>,
    pub image_path: Option<String>,
    pub pricing_option: PricingTier,
    pub price: Option<f64>,
}

impl RawItem {
    pub fn new(title: impl Into<String>, pricing_option: PricingTier) -> Self {
        Self {
            id: None,
            title: Some(title.into()),
            user_name: None,
            image_path: None,
            pricing_option,
            price: None,
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_user_name(mut self, user_name: impl Into<String>) -> Self {
        self.user_name = Some(user_name.into());
        self
    }

    pub fn with_image_path(mut self, image_path: impl Into<String>) -> Self {
        self.image_path = Some(image_path.into());
        self
    }

    pub fn with_price(mut self, price: f64) -> Self {
        self.price = Some(price);
        self
    }
}

#[cfg(feature = "serde")]
mod source_id {
    use alloc::string::{String, ToString};

    use serde::{Deserialize, Deserializer};

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        Text(String),
        Signed(i64),
        Unsigned(u64),
    }

    pub(super) fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<String>, D::Error> {
        Ok(match Option::<Repr>::deserialize(deserializer)? {
            Some(Repr::Text(s)) if s.is_empty() => None,
            Some(Repr::Text(s)) => Some(s),
            Some(Repr::Signed(n)) => Some(n.to_string()),
            Some(Repr::Unsigned(n)) => Some(n.to_string()),
            None => None,
        })
    }
}

/// A per-occurrence item identity, unique within one [`crate::Catalog`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ItemId(pub String);

impl ItemId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A catalog entry held by the engine.
///
/// Text fields missing from the source record are stored as empty strings.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub struct Item {
    pub id: ItemId,
    pub source_id: Option<String>,
    pub title: String,
    pub user_name: String,
    pub image_path: String,
    pub pricing_option: PricingTier,
    pub price: Option<f64>,
}

impl Item {
    pub fn from_raw(raw: RawItem, id: ItemId) -> Self {
        Self {
            id,
            source_id: raw.id,
            title: raw.title.unwrap_or_default(),
            user_name: raw.user_name.unwrap_or_default(),
            image_path: raw.image_path.unwrap_or_default(),
            pricing_option: raw.pricing_option,
            price: raw.price,
        }
    }

    /// The badge a card shows for this item's pricing.
    ///
    /// Returns `None` for a `Paid` item without a price.
    pub fn price_label(&self) -> Option<String> {
        match (self.pricing_option, self.price) {
            (PricingTier::Paid, Some(price)) => Some(format!("${price:.2}")),
            (PricingTier::Paid, None) => None,
            (PricingTier::Free, _) => Some(String::from("FREE")),
            (PricingTier::ViewOnly, _) => Some(String::from("View Only")),
        }
    }
}
