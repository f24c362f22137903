//! Snapshot handed to the rendering surface on every refresh.

use serde::Serialize;

use crate::{
    catalog::{Filter, PageSummary},
    document::{Page, PageId},
};

/// The page whose body is on screen.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct ContentPage {
    pub id: PageId,
    pub name: String,
    pub content: String,
}

impl From<&Page> for ContentPage {
    fn from(page: &Page) -> Self {
        Self {
            id: page.id.clone(),
            name: page.name.clone(),
            content: page.content.clone(),
        }
    }
}

/// Values the surface restores on its selectors after each redraw.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlBindings {
    pub filter_value: Filter,
    pub page_value: Option<PageId>,
    /// Selector and buttons stay disabled while a page turn is in flight.
    pub input_locked: bool,
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderContext {
    pub title: String,
    pub pages: Vec<PageSummary>,
    pub selected_page_id: Option<PageId>,
    /// Resolved from the viewed page, which lags the selection mid-turn.
    pub content_page: Option<ContentPage>,
    pub filter: Filter,
    pub is_favorite: bool,
    pub is_hidden: bool,
    pub animation_class: Option<&'static str>,
    pub ad_content: Option<String>,
    pub controls: ControlBindings,
}
