//! NFPA 704 hazard profile model.
//!
//! # Responsibility
//! - Define validated ratings and the special-symbol set of a fire diamond.
//! - Provide the strict profile comparison used by every index query.
//!
//! # Invariants
//! - A `Rating` is always within `0..=4`.
//! - Every `SpecialSymbol` has an explicit presence value; absence means `false`.
//! - Matching is a boolean predicate: no tolerance, no ranking.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Highest rating on the NFPA 704 scale.
pub const MAX_RATING: u8 = 4;

/// One NFPA 704 numeric rating (`0..=4`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    /// Validates one raw rating value for the given category.
    pub fn new(category: HazardCategory, value: u8) -> Result<Self, ProfileError> {
        if value > MAX_RATING {
            return Err(ProfileError::RatingOutOfRange {
                category,
                value: i64::from(value),
            });
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for Rating {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        if value > MAX_RATING {
            return Err(format!("rating {value} is outside 0..={MAX_RATING}"));
        }
        Ok(Self(value))
    }
}

impl From<Rating> for u8 {
    fn from(value: Rating) -> Self {
        value.0
    }
}

impl Display for Rating {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Numeric quadrants of the fire diamond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HazardCategory {
    Health,
    Flammability,
    Reactivity,
}

impl HazardCategory {
    /// Field name used by the bundled datasets.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Health => "HEALTH",
            Self::Flammability => "FLAMMABILITY",
            Self::Reactivity => "REACTIVITY",
        }
    }
}

impl Display for HazardCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Symbols drawn in the white (special) quadrant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SpecialSymbol {
    Oxidizer,
    SimpleAsphyxiant,
    WaterReactive,
}

impl SpecialSymbol {
    pub const ALL: [SpecialSymbol; 3] = [
        Self::Oxidizer,
        Self::SimpleAsphyxiant,
        Self::WaterReactive,
    ];

    /// Parses one dataset or user token, case-insensitively.
    ///
    /// Accepts the diamond abbreviations (`OX`, `SA`, `W`, `-W-`) and the
    /// spelled-out names.
    pub fn from_token(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "OX" | "OXY" | "OXIDIZER" => Some(Self::Oxidizer),
            "SA" | "SIMPLE_ASPHYXIANT" => Some(Self::SimpleAsphyxiant),
            "W" | "-W-" | "WATER_REACT" | "WATER_REACTIVE" => Some(Self::WaterReactive),
            _ => None,
        }
    }

    /// Diamond abbreviation.
    pub fn abbreviation(self) -> &'static str {
        match self {
            Self::Oxidizer => "OX",
            Self::SimpleAsphyxiant => "SA",
            Self::WaterReactive => "W",
        }
    }
}

/// Total presence map over all [`SpecialSymbol`] values.
///
/// Equality is full map equality over the three symbols.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct SpecialSymbols {
    oxidizer: bool,
    simple_asphyxiant: bool,
    water_reactive: bool,
}

impl SpecialSymbols {
    /// All symbols absent.
    pub fn none() -> Self {
        Self::default()
    }

    /// Builds a map from the listed present symbols; the rest are `false`.
    pub fn from_present<I>(present: I) -> Self
    where
        I: IntoIterator<Item = SpecialSymbol>,
    {
        let mut symbols = Self::none();
        for symbol in present {
            symbols.set(symbol, true);
        }
        symbols
    }

    pub fn get(&self, symbol: SpecialSymbol) -> bool {
        match symbol {
            SpecialSymbol::Oxidizer => self.oxidizer,
            SpecialSymbol::SimpleAsphyxiant => self.simple_asphyxiant,
            SpecialSymbol::WaterReactive => self.water_reactive,
        }
    }

    pub fn set(&mut self, symbol: SpecialSymbol, present: bool) {
        match symbol {
            SpecialSymbol::Oxidizer => self.oxidizer = present,
            SpecialSymbol::SimpleAsphyxiant => self.simple_asphyxiant = present,
            SpecialSymbol::WaterReactive => self.water_reactive = present,
        }
    }

    /// Present symbols in declaration order.
    pub fn present(&self) -> impl Iterator<Item = SpecialSymbol> + '_ {
        SpecialSymbol::ALL
            .into_iter()
            .filter(move |symbol| self.get(*symbol))
    }

    pub fn is_empty(&self) -> bool {
        self.present().next().is_none()
    }
}

/// Ratings plus special symbols of one fire diamond.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HazardProfile {
    pub health: Rating,
    pub flammability: Rating,
    pub reactivity: Rating,
    #[serde(default)]
    pub specials: SpecialSymbols,
}

impl HazardProfile {
    /// Creates a profile with no special symbols.
    pub fn new(health: u8, flammability: u8, reactivity: u8) -> Result<Self, ProfileError> {
        Ok(Self {
            health: Rating::new(HazardCategory::Health, health)?,
            flammability: Rating::new(HazardCategory::Flammability, flammability)?,
            reactivity: Rating::new(HazardCategory::Reactivity, reactivity)?,
            specials: SpecialSymbols::none(),
        })
    }

    /// Creates a profile from possibly-missing input ratings.
    ///
    /// # Errors
    /// - `MissingRating` for the first absent category. Ratings are never
    ///   defaulted, since a defaulted zero would silently match wrong records.
    /// - `RatingOutOfRange` for values above [`MAX_RATING`].
    pub fn from_parts(
        health: Option<u8>,
        flammability: Option<u8>,
        reactivity: Option<u8>,
        specials: SpecialSymbols,
    ) -> Result<Self, ProfileError> {
        let health = require(HazardCategory::Health, health)?;
        let flammability = require(HazardCategory::Flammability, flammability)?;
        let reactivity = require(HazardCategory::Reactivity, reactivity)?;
        Ok(Self {
            health,
            flammability,
            reactivity,
            specials,
        })
    }

    pub fn with_special(mut self, symbol: SpecialSymbol, present: bool) -> Self {
        self.specials.set(symbol, present);
        self
    }

    pub fn with_specials(mut self, specials: SpecialSymbols) -> Self {
        self.specials = specials;
        self
    }

    pub fn rating(&self, category: HazardCategory) -> Rating {
        match category {
            HazardCategory::Health => self.health,
            HazardCategory::Flammability => self.flammability,
            HazardCategory::Reactivity => self.reactivity,
        }
    }

    /// `(health, flammability, reactivity)` as plain numbers.
    pub fn bucket_key(&self) -> (u8, u8, u8) {
        (
            self.health.value(),
            self.flammability.value(),
            self.reactivity.value(),
        )
    }

    /// See [`matches`].
    pub fn matches(&self, other: &HazardProfile, include_specials: bool) -> bool {
        matches(self, other, include_specials)
    }
}

impl Display for HazardProfile {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "H{}-F{}-R{}",
            self.health, self.flammability, self.reactivity
        )?;
        for symbol in self.specials.present() {
            write!(f, "-{}", symbol.abbreviation())?;
        }
        Ok(())
    }
}

/// Strict fire-diamond equality.
///
/// True iff all three ratings are equal and, only when `include_specials`
/// is set, the special-symbol maps are equal as well.
pub fn matches(a: &HazardProfile, b: &HazardProfile, include_specials: bool) -> bool {
    let ratings_equal = a.bucket_key() == b.bucket_key();
    if include_specials {
        ratings_equal && a.specials == b.specials
    } else {
        ratings_equal
    }
}

fn require(category: HazardCategory, value: Option<u8>) -> Result<Rating, ProfileError> {
    match value {
        Some(value) => Rating::new(category, value),
        None => Err(ProfileError::MissingRating(category)),
    }
}

/// Profile construction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    MissingRating(HazardCategory),
    RatingOutOfRange { category: HazardCategory, value: i64 },
    NonNumericRating { category: HazardCategory, raw: String },
}

impl Display for ProfileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRating(category) => write!(f, "missing {category} rating"),
            Self::RatingOutOfRange { category, value } => write!(
                f,
                "{category} rating {value} is outside 0..={MAX_RATING}"
            ),
            Self::NonNumericRating { category, raw } => {
                write!(f, "{category} rating `{raw}` is not a number")
            }
        }
    }
}

impl Error for ProfileError {}
