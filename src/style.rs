use std::fmt;

use eframe::egui::Color32;

pub const DEFAULT_RADIUS: f32 = 6.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TypeTag {
    Person,
    Organization,
    Location,
    Date,
    Money,
    Unknown,
}

impl TypeTag {
    pub const ALL: [TypeTag; 6] = [
        Self::Person,
        Self::Organization,
        Self::Location,
        Self::Date,
        Self::Money,
        Self::Unknown,
    ];

    /// Case-insensitive; anything unrecognized lands in `Unknown`.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_ascii_uppercase().as_str() {
            "PERSON" | "PER" => Self::Person,
            "ORGANIZATION" | "ORGANISATION" | "ORG" => Self::Organization,
            "LOCATION" | "LOC" | "GPE" => Self::Location,
            "DATE" => Self::Date,
            "MONEY" => Self::Money,
            _ => Self::Unknown,
        }
    }

    /// Like [`TypeTag::parse`], but `None` for names that are not a known tag.
    /// `UNKNOWN` and `OTHER` name the fallback bucket explicitly.
    pub fn parse_known(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "UNKNOWN" | "OTHER" => Some(Self::Unknown),
            _ => match Self::parse(raw) {
                Self::Unknown => None,
                tag => Some(tag),
            },
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Person => "PERSON",
            Self::Organization => "ORGANIZATION",
            Self::Location => "LOCATION",
            Self::Date => "DATE",
            Self::Money => "MONEY",
            Self::Unknown => "UNKNOWN",
        }
    }

    fn slot(self) -> usize {
        match self {
            Self::Person => 0,
            Self::Organization => 1,
            Self::Location => 2,
            Self::Date => 3,
            Self::Money => 4,
            Self::Unknown => 5,
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeStyle {
    pub radius: f32,
    pub color: Color32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StyleTable {
    entries: [NodeStyle; 6],
}

impl Default for StyleTable {
    fn default() -> Self {
        Self {
            entries: [
                NodeStyle {
                    radius: 10.0,
                    color: Color32::from_rgb(0xe7, 0x4c, 0x3c),
                },
                NodeStyle {
                    radius: 12.0,
                    color: Color32::from_rgb(0x1a, 0xbc, 0x9c),
                },
                NodeStyle {
                    radius: 8.0,
                    color: Color32::from_rgb(0x34, 0x98, 0xdb),
                },
                NodeStyle {
                    radius: DEFAULT_RADIUS,
                    color: Color32::from_rgb(0x2e, 0xcc, 0x71),
                },
                NodeStyle {
                    radius: DEFAULT_RADIUS,
                    color: Color32::from_rgb(0xf1, 0xc4, 0x0f),
                },
                NodeStyle {
                    radius: DEFAULT_RADIUS,
                    color: Color32::from_rgb(0x9b, 0x59, 0xb6),
                },
            ],
        }
    }
}

impl StyleTable {
    pub fn style(&self, tag: TypeTag) -> NodeStyle {
        self.entries[tag.slot()]
    }

    pub fn radius(&self, tag: TypeTag) -> f32 {
        self.style(tag).radius
    }

    pub fn color(&self, tag: TypeTag) -> Color32 {
        self.style(tag).color
    }

    pub fn set(&mut self, tag: TypeTag, style: NodeStyle) {
        self.entries[tag.slot()] = style;
    }
}
