//! Ordered, filtered page listings.

use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    document::{Document, Page, PageId, Viewer},
    preferences::PreferenceRecord,
};

/// Which pages the catalog lists.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Filter {
    /// Everything not hidden.
    #[default]
    All,
    Favorites,
    Hidden,
}

impl Filter {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Favorites => "favorites",
            Self::Hidden => "hidden",
        }
    }

    const fn admits(self, is_favorite: bool, is_hidden: bool) -> bool {
        match self {
            Self::All => !is_hidden,
            Self::Favorites => is_favorite,
            Self::Hidden => is_hidden,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("unknown filter {0:?}")]
pub struct ParseFilterError(pub String);

impl FromStr for Filter {
    type Err = ParseFilterError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "all" => Ok(Self::All),
            "favorites" => Ok(Self::Favorites),
            "hidden" => Ok(Self::Hidden),
            other => Err(ParseFilterError(other.to_owned())),
        }
    }
}

/// One selectable entry of the catalog.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSummary {
    pub id: PageId,
    pub name: String,
    pub is_favorite: bool,
    pub is_hidden: bool,
}

/// Content pages the viewer may observe, by sort key then insertion order.
pub fn eligible_pages<'d, V>(document: &'d Document, viewer: &V) -> Vec<&'d Page>
where
    V: Viewer + ?Sized,
{
    let mut pages: Vec<&Page> = document
        .pages
        .iter()
        .filter(|page| !page.is_metadata() && viewer.can_observe(page))
        .collect();
    // `sort_by_key` is stable, so equal keys keep store order.
    pages.sort_by_key(|page| page.sort);
    pages
}

/// Ids of [`eligible_pages`], ignoring the filter. Drives turn direction.
pub fn page_order<V>(document: &Document, viewer: &V) -> Vec<PageId>
where
    V: Viewer + ?Sized,
{
    eligible_pages(document, viewer)
        .into_iter()
        .map(|page| page.id.clone())
        .collect()
}

pub fn catalog<V>(
    document: &Document,
    preferences: &PreferenceRecord,
    filter: Filter,
    viewer: &V,
) -> Vec<PageSummary>
where
    V: Viewer + ?Sized,
{
    eligible_pages(document, viewer)
        .into_iter()
        .filter_map(|page| {
            let is_favorite = preferences.is_favorite(&page.id);
            let is_hidden = preferences.is_hidden(&page.id);
            filter.admits(is_favorite, is_hidden).then(|| PageSummary {
                id: page.id.clone(),
                name: page.name.clone(),
                is_favorite,
                is_hidden,
            })
        })
        .collect()
}
