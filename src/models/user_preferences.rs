use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;

use crate::error::AppError;

/// A single dietary or allergy restriction the user can switch on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PreferenceFlag {
    #[serde(rename = "isVegetarian")]
    Vegetarian,
    #[serde(rename = "isVegan")]
    Vegan,
    #[serde(rename = "isHalal")]
    Halal,
    #[serde(rename = "isGlutenFree")]
    GlutenFree,
    #[serde(rename = "hasNutAllergy")]
    NutAllergy,
    #[serde(rename = "hasDairyAllergy")]
    DairyAllergy,
    #[serde(rename = "hasEggAllergy")]
    EggAllergy,
    #[serde(rename = "hasFishAllergy")]
    FishAllergy,
    #[serde(rename = "hasShellfishAllergy")]
    ShellfishAllergy,
}

impl PreferenceFlag {
    /// Every recognized flag, in storage order
    pub const ALL: [PreferenceFlag; 9] = [
        PreferenceFlag::Vegetarian,
        PreferenceFlag::Vegan,
        PreferenceFlag::Halal,
        PreferenceFlag::NutAllergy,
        PreferenceFlag::GlutenFree,
        PreferenceFlag::DairyAllergy,
        PreferenceFlag::EggAllergy,
        PreferenceFlag::FishAllergy,
        PreferenceFlag::ShellfishAllergy,
    ];

    /// Key under which the flag is persisted
    pub fn key(&self) -> &'static str {
        match self {
            PreferenceFlag::Vegetarian => "isVegetarian",
            PreferenceFlag::Vegan => "isVegan",
            PreferenceFlag::Halal => "isHalal",
            PreferenceFlag::GlutenFree => "isGlutenFree",
            PreferenceFlag::NutAllergy => "hasNutAllergy",
            PreferenceFlag::DairyAllergy => "hasDairyAllergy",
            PreferenceFlag::EggAllergy => "hasEggAllergy",
            PreferenceFlag::FishAllergy => "hasFishAllergy",
            PreferenceFlag::ShellfishAllergy => "hasShellfishAllergy",
        }
    }
}

impl Display for PreferenceFlag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.key())
    }
}

impl FromStr for PreferenceFlag {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PreferenceFlag::ALL
            .into_iter()
            .find(|flag| flag.key() == s)
            .ok_or_else(|| AppError::InvalidInput(format!("Unknown preference flag: {}", s)))
    }
}

/// Dietary and allergy preferences of the user
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    pub is_vegetarian: bool,
    pub is_vegan: bool,
    pub is_halal: bool,
    pub has_nut_allergy: bool,
    pub is_gluten_free: bool,
    pub has_dairy_allergy: bool,
    pub has_egg_allergy: bool,
    pub has_fish_allergy: bool,
    pub has_shellfish_allergy: bool,
}

impl UserPreferences {
    /// Creates preferences with every flag off
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, flag: PreferenceFlag) -> bool {
        match flag {
            PreferenceFlag::Vegetarian => self.is_vegetarian,
            PreferenceFlag::Vegan => self.is_vegan,
            PreferenceFlag::Halal => self.is_halal,
            PreferenceFlag::GlutenFree => self.is_gluten_free,
            PreferenceFlag::NutAllergy => self.has_nut_allergy,
            PreferenceFlag::DairyAllergy => self.has_dairy_allergy,
            PreferenceFlag::EggAllergy => self.has_egg_allergy,
            PreferenceFlag::FishAllergy => self.has_fish_allergy,
            PreferenceFlag::ShellfishAllergy => self.has_shellfish_allergy,
        }
    }

    /// Sets a flag, returning whether the value changed
    pub fn set(&mut self, flag: PreferenceFlag, value: bool) -> bool {
        let slot = match flag {
            PreferenceFlag::Vegetarian => &mut self.is_vegetarian,
            PreferenceFlag::Vegan => &mut self.is_vegan,
            PreferenceFlag::Halal => &mut self.is_halal,
            PreferenceFlag::GlutenFree => &mut self.is_gluten_free,
            PreferenceFlag::NutAllergy => &mut self.has_nut_allergy,
            PreferenceFlag::DairyAllergy => &mut self.has_dairy_allergy,
            PreferenceFlag::EggAllergy => &mut self.has_egg_allergy,
            PreferenceFlag::FishAllergy => &mut self.has_fish_allergy,
            PreferenceFlag::ShellfishAllergy => &mut self.has_shellfish_allergy,
        };
        let changed = *slot != value;
        *slot = value;
        changed
    }

    /// Flags that are currently switched on
    pub fn active_flags(&self) -> Vec<PreferenceFlag> {
        PreferenceFlag::ALL
            .into_iter()
            .filter(|flag| self.get(*flag))
            .collect()
    }
}

/// Partial update; absent fields keep their current value
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct PreferencesPatch {
    pub is_vegetarian: Option<bool>,
    pub is_vegan: Option<bool>,
    pub is_halal: Option<bool>,
    pub has_nut_allergy: Option<bool>,
    pub is_gluten_free: Option<bool>,
    pub has_dairy_allergy: Option<bool>,
    pub has_egg_allergy: Option<bool>,
    pub has_fish_allergy: Option<bool>,
    pub has_shellfish_allergy: Option<bool>,
}

impl PreferencesPatch {
    /// The (flag, value) pairs carried by this patch
    pub fn changes(&self) -> Vec<(PreferenceFlag, bool)> {
        [
            (PreferenceFlag::Vegetarian, self.is_vegetarian),
            (PreferenceFlag::Vegan, self.is_vegan),
            (PreferenceFlag::Halal, self.is_halal),
            (PreferenceFlag::NutAllergy, self.has_nut_allergy),
            (PreferenceFlag::GlutenFree, self.is_gluten_free),
            (PreferenceFlag::DairyAllergy, self.has_dairy_allergy),
            (PreferenceFlag::EggAllergy, self.has_egg_allergy),
            (PreferenceFlag::FishAllergy, self.has_fish_allergy),
            (PreferenceFlag::ShellfishAllergy, self.has_shellfish_allergy),
        ]
        .into_iter()
        .filter_map(|(flag, value)| value.map(|v| (flag, v)))
        .collect()
    }
}
