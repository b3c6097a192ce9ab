//! Item categories.

use serde::{Deserialize, Serialize};

/// Category of a catalog item.
///
/// The product service uses Russian labels on the wire; they are kept
/// verbatim for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "софт-скил")]
    SoftSkill,
    #[serde(rename = "хард-скил")]
    HardSkill,
    #[serde(rename = "другое")]
    Other,
    #[serde(rename = "дополнительное")]
    Additional,
    #[serde(rename = "кнопка")]
    Button,
}

impl Category {
    /// Label as sent by the product service.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::SoftSkill => "софт-скил",
            Category::HardSkill => "хард-скил",
            Category::Other => "другое",
            Category::Additional => "дополнительное",
            Category::Button => "кнопка",
        }
    }

    /// CSS modifier class for the category badge.
    pub fn css_modifier(&self) -> &'static str {
        match self {
            Category::SoftSkill => "card__category_soft",
            Category::HardSkill => "card__category_hard",
            Category::Other => "card__category_other",
            Category::Additional => "card__category_additional",
            Category::Button => "card__category_button",
        }
    }

    /// Parse a wire label.
    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "софт-скил" => Some(Category::SoftSkill),
            "хард-скил" => Some(Category::HardSkill),
            "другое" => Some(Category::Other),
            "дополнительное" => Some(Category::Additional),
            "кнопка" => Some(Category::Button),
            _ => None,
        }
    }
}
