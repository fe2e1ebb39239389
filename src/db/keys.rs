//! Typed cache keys
//!
//! The data layer shares one [`TtlCache`] across every record kind. Each key
//! carries the type stored under it, so reading `project-<slug>` can only ever
//! produce a [`Project`].

use std::borrow::Cow;
use std::collections::BTreeMap;
use std::marker::PhantomData;

use crate::cache::TtlCache;
use crate::models::{Configuration, Content, Credentials, Menu, Project, Route, Theme, User};

/// Everything the data layer keeps in the cache.
#[derive(Debug, Clone)]
pub enum CachedRecord {
    User(User),
    Menu(Menu),
    Configuration(Configuration),
    Credentials(Credentials),
    Routes(BTreeMap<String, Route>),
    Themes(BTreeMap<String, Theme>),
    Projects(Vec<Project>),
    Project(Project),
    Contents(Vec<Content>),
    Content(Content),
}

/// Conversion between a record type and its [`CachedRecord`] variant.
pub trait Cacheable: Sized {
    fn into_cached(self) -> CachedRecord;
    fn from_cached(record: CachedRecord) -> Option<Self>;
}

macro_rules! cacheable {
    ($($variant:ident => $ty:ty),* $(,)?) => {
        $(
            impl Cacheable for $ty {
                fn into_cached(self) -> CachedRecord {
                    CachedRecord::$variant(self)
                }

                fn from_cached(record: CachedRecord) -> Option<Self> {
                    match record {
                        CachedRecord::$variant(value) => Some(value),
                        _ => None,
                    }
                }
            }
        )*
    };
}

cacheable! {
    User => User,
    Menu => Menu,
    Configuration => Configuration,
    Credentials => Credentials,
    Routes => BTreeMap<String, Route>,
    Themes => BTreeMap<String, Theme>,
    Projects => Vec<Project>,
    Project => Project,
    Contents => Vec<Content>,
    Content => Content,
}

// == Cache Key ==
/// A cache key bound to the type of value stored under it.
pub struct CacheKey<T> {
    name: Cow<'static, str>,
    kind: PhantomData<fn() -> T>,
}

impl<T> CacheKey<T> {
    const fn fixed(name: &'static str) -> Self {
        Self {
            name: Cow::Borrowed(name),
            kind: PhantomData,
        }
    }

    fn owned(name: String) -> Self {
        Self {
            name: Cow::Owned(name),
            kind: PhantomData,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.name
    }
}

impl<T> std::fmt::Debug for CacheKey<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("CacheKey").field(&self.name).finish()
    }
}

pub const USER: CacheKey<User> = CacheKey::fixed("user");
pub const MENU: CacheKey<Menu> = CacheKey::fixed("menu");
pub const CONFIGURATION: CacheKey<Configuration> = CacheKey::fixed("configuration");
pub const CREDENTIALS: CacheKey<Credentials> = CacheKey::fixed("credentials");
pub const ROUTES: CacheKey<BTreeMap<String, Route>> = CacheKey::fixed("routes");
pub const THEMES: CacheKey<BTreeMap<String, Theme>> = CacheKey::fixed("themes");
pub const PROJECTS: CacheKey<Vec<Project>> = CacheKey::fixed("projects");
pub const CONTENTS: CacheKey<Vec<Content>> = CacheKey::fixed("contents");

pub fn project(slug: &str) -> CacheKey<Project> {
    CacheKey::owned(format!("project-{}", slug))
}

pub fn content(slug: &str) -> CacheKey<Content> {
    CacheKey::owned(format!("content-{}", slug))
}

// == Typed access ==
impl TtlCache<CachedRecord> {
    /// Typed [`TtlCache::get`].
    pub fn get_record<T: Cacheable>(&self, key: &CacheKey<T>) -> Option<T> {
        self.get(key.as_str()).and_then(T::from_cached)
    }

    /// Typed [`TtlCache::set`], using the default TTL.
    pub fn set_record<T: Cacheable>(&self, key: &CacheKey<T>, value: T) {
        self.set(key.as_str(), value.into_cached());
    }

    /// Typed [`TtlCache::generation`].
    pub fn record_generation<T>(&self, key: &CacheKey<T>) -> u64 {
        self.generation(key.as_str())
    }

    /// Typed [`TtlCache::set_if_generation`].
    pub fn fill_record<T: Cacheable>(&self, key: &CacheKey<T>, generation: u64, value: T) -> bool {
        self.set_if_generation(key.as_str(), generation, value.into_cached())
    }

    pub fn invalidate<T>(&self, key: &CacheKey<T>) {
        self.delete(key.as_str());
    }
}
