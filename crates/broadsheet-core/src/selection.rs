//! Reconciles the selected/viewed page against the current catalog.

use crate::{catalog::PageSummary, document::PageId};

/// `selected` is what the page selector shows; `viewed` is the content on screen.
/// They differ only while a page turn is in flight.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Selection {
    pub selected: Option<PageId>,
    pub viewed: Option<PageId>,
}

impl Selection {
    pub fn of(page: PageId) -> Self {
        Self {
            selected: Some(page.clone()),
            viewed: Some(page),
        }
    }
}

/// A selection still listed in `catalog` survives; anything else falls back to
/// the first entry, or to nothing when the catalog is empty.
///
/// Callers must not run this while a page turn is in flight.
pub fn resolve(catalog: &[PageSummary], current: &Selection) -> Selection {
    let still_listed = current
        .selected
        .as_ref()
        .filter(|selected| catalog.iter().any(|page| &page.id == *selected));

    match still_listed {
        Some(selected) => Selection {
            selected: Some(selected.clone()),
            viewed: current.viewed.clone().or_else(|| Some(selected.clone())),
        },
        None => catalog
            .first()
            .map(|page| Selection::of(page.id.clone()))
            .unwrap_or_default(),
    }
}
