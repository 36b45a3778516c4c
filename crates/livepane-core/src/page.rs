//! Page templates and source collections.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Logical template a preview payload renders into.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PageKind {
    /// Homepage.
    #[default]
    Home,
    /// Apartment detail page.
    Apartments,
    /// FAQ page.
    Faq,
    /// Exchange students landing page.
    ExchangeStudents,
    /// Guide article.
    Guide,
    /// Generic content page.
    ContentPage,
}

impl PageKind {
    /// All page kinds.
    pub const ALL: [PageKind; 6] = [
        PageKind::Home,
        PageKind::Apartments,
        PageKind::Faq,
        PageKind::ExchangeStudents,
        PageKind::Guide,
        PageKind::ContentPage,
    ];

    /// Wire identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Apartments => "apartments",
            Self::Faq => "faq",
            Self::ExchangeStudents => "exchange-students",
            Self::Guide => "guide",
            Self::ContentPage => "content-page",
        }
    }

    /// Parse a wire identifier.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == value)
    }

    /// Collection the page's entries live in.
    pub fn collection(&self) -> Collection {
        match self {
            Self::Home | Self::Faq | Self::ExchangeStudents => Collection::Pages,
            Self::Apartments => Collection::Apartments,
            Self::Guide => Collection::Guides,
            Self::ContentPage => Collection::ContentPages,
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// CMS collection an entry is sourced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Singleton pages (home, faq, ...).
    Pages,
    /// Apartment listings.
    Apartments,
    /// Guide articles.
    Guides,
    /// Free-form content pages.
    ContentPages,
}

impl Collection {
    /// Wire identifier.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pages => "pages",
            Self::Apartments => "apartments",
            Self::Guides => "guides",
            Self::ContentPages => "content_pages",
        }
    }
}
