//! Documents, pages and the store they are resolved from.

pub mod memory;

use core::fmt;
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Name of the reserved page that carries per-actor preference flags.
pub const METADATA_PAGE_NAME: &str = "metadata";

/// Placeholder body written into a freshly created metadata page.
pub const METADATA_PAGE_BODY: &str = "<p>SYSTEM DATA - DO NOT DELETE</p>";

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(value: impl Into<String>) -> Self {
                Self(value.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(value: &str) -> Self {
                Self::new(value)
            }
        }
    };
}

string_id!(
    /// Opaque identifier a document is resolved by.
    DocumentId
);
string_id!(
    /// Identifier of a page, unique within its document.
    PageId
);
string_id!(
    /// Key preferences are stored under: the controlled character, else the user.
    ActorKey
);

/// Ordered access levels a user can hold on a page.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PermissionLevel {
    #[default]
    None,
    Limited,
    Observer,
    Owner,
}

#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct Ownership {
    #[serde(default)]
    pub default: PermissionLevel,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub users: BTreeMap<String, PermissionLevel>,
}

impl Ownership {
    pub fn with_default(default: PermissionLevel) -> Self {
        Self {
            default,
            users: BTreeMap::new(),
        }
    }

    /// Explicit per-user grants win over the default level.
    pub fn level_for(&self, user_id: &str) -> PermissionLevel {
        self.users.get(user_id).copied().unwrap_or(self.default)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: PageId,
    pub name: String,
    #[serde(default)]
    pub sort: i64,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub ownership: Ownership,
    /// Flag payloads grouped by scope, then key.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub flags: BTreeMap<String, BTreeMap<String, Value>>,
}

impl Page {
    pub fn new(id: impl Into<String>, name: impl Into<String>, sort: i64) -> Self {
        Self {
            id: PageId::new(id),
            name: name.into(),
            sort,
            content: String::new(),
            ownership: Ownership::default(),
            flags: BTreeMap::new(),
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn with_ownership(mut self, ownership: Ownership) -> Self {
        self.ownership = ownership;
        self
    }

    pub fn is_metadata(&self) -> bool {
        self.name == METADATA_PAGE_NAME
    }

    pub fn flag(&self, scope: &str, key: &str) -> Option<&Value> {
        self.flags.get(scope).and_then(|entries| entries.get(key))
    }

    pub fn set_flag(&mut self, scope: &str, key: &str, value: Value) {
        self.flags
            .entry(scope.to_owned())
            .or_default()
            .insert(key.to_owned(), value);
    }
}

/// A container of pages. `pages` keeps store insertion order.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub uuid: DocumentId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub pages: Vec<Page>,
}

impl Document {
    pub fn new(uuid: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uuid: DocumentId::new(uuid),
            name: name.into(),
            pages: Vec::new(),
        }
    }

    pub fn with_page(mut self, page: Page) -> Self {
        self.pages.push(page);
        self
    }

    pub fn page(&self, id: &PageId) -> Option<&Page> {
        self.pages.iter().find(|page| &page.id == id)
    }

    pub fn page_mut(&mut self, id: &PageId) -> Option<&mut Page> {
        self.pages.iter_mut().find(|page| &page.id == id)
    }

    pub fn metadata_page(&self) -> Option<&Page> {
        self.pages.iter().find(|page| page.is_metadata())
    }
}

/// Fields for a page the store should create.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PageDraft {
    pub name: String,
    pub content: String,
    pub default_permission: PermissionLevel,
}

impl PageDraft {
    pub fn metadata() -> Self {
        Self {
            name: METADATA_PAGE_NAME.to_owned(),
            content: METADATA_PAGE_BODY.to_owned(),
            default_permission: PermissionLevel::Owner,
        }
    }
}

/// Abstract document backend.
pub trait DocumentStore {
    type Error: fmt::Debug;

    /// Answer from already-resolved state without touching the backend.
    fn cached_document(&self, _id: &DocumentId) -> Option<Document> {
        None
    }

    /// Resolve a document, `Ok(None)` when the id is unknown.
    fn load_document(&mut self, id: &DocumentId) -> Result<Option<Document>, Self::Error>;

    /// Append a page to a document; the store assigns its id and sort key.
    fn create_page(&mut self, document: &DocumentId, draft: PageDraft)
    -> Result<Page, Self::Error>;

    fn set_default_permission(
        &mut self,
        document: &DocumentId,
        page: &PageId,
        level: PermissionLevel,
    ) -> Result<(), Self::Error>;

    fn write_flag(
        &mut self,
        document: &DocumentId,
        page: &PageId,
        scope: &str,
        key: &str,
        value: Value,
    ) -> Result<(), Self::Error>;

    /// Cached lookup first, then a backend load.
    fn resolve_document(&mut self, id: &DocumentId) -> Result<Option<Document>, Self::Error> {
        if let Some(document) = self.cached_document(id) {
            return Ok(Some(document));
        }
        self.load_document(id)
    }
}

/// Who is reading, and what they may see.
pub trait Viewer {
    fn user_id(&self) -> &str;

    fn character_id(&self) -> Option<&str>;

    /// Privileged viewers see every page and may create the metadata page.
    fn is_privileged(&self) -> bool;

    fn actor_key(&self) -> ActorKey {
        ActorKey::new(self.character_id().unwrap_or(self.user_id()))
    }

    fn permission_for(&self, page: &Page) -> PermissionLevel {
        if self.is_privileged() {
            PermissionLevel::Owner
        } else {
            page.ownership.level_for(self.user_id())
        }
    }

    fn can_observe(&self, page: &Page) -> bool {
        self.permission_for(page) >= PermissionLevel::Observer
    }
}

/// Plain viewer description supplied by the host session.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct SessionViewer {
    pub user_id: String,
    pub character_id: Option<String>,
    pub privileged: bool,
}

impl SessionViewer {
    pub fn player(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            character_id: None,
            privileged: false,
        }
    }

    pub fn gamemaster(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            character_id: None,
            privileged: true,
        }
    }

    pub fn with_character(mut self, character_id: impl Into<String>) -> Self {
        self.character_id = Some(character_id.into());
        self
    }
}

impl Viewer for SessionViewer {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    fn character_id(&self) -> Option<&str> {
        self.character_id.as_deref()
    }

    fn is_privileged(&self) -> bool {
        self.privileged
    }
}
