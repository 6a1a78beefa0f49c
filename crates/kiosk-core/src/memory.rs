#![forbid(unsafe_code)]

//! In-memory host implementations.
//!
//! These back the test suites and any headless consumer that wants to drive
//! the controllers without a browser. Time is host-driven: nothing fires
//! until [`ManualScheduler::advance`] is called.

use core::time::Duration;
use std::collections::BTreeMap;

use crate::host::{
    DelegateTarget, DocumentHost, KeyValueStore, Navigator, Scheduler, StorageError, TimerId,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum StorageMode {
    #[default]
    Available,
    ReadOnly,
    Unavailable,
}

/// `localStorage`-like map with switchable failure modes.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    items: BTreeMap<String, String>,
    mode: StorageMode,
}

impl MemoryStorage {
    /// Empty, fully working storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Storage where every access fails with [`StorageError::Unavailable`].
    #[must_use]
    pub fn unavailable() -> Self {
        Self {
            items: BTreeMap::new(),
            mode: StorageMode::Unavailable,
        }
    }

    /// Keep current contents but reject writes as if over quota.
    #[must_use]
    pub fn read_only(mut self) -> Self {
        self.mode = StorageMode::ReadOnly;
        self
    }

    /// Seed a value directly, bypassing the failure mode.
    pub fn insert(&mut self, key: &str, value: &str) {
        self.items.insert(key.to_owned(), value.to_owned());
    }

    /// Inspect a value directly, bypassing the failure mode.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }
}

impl KeyValueStore for MemoryStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        match self.mode {
            StorageMode::Unavailable => Err(StorageError::Unavailable),
            StorageMode::Available | StorageMode::ReadOnly => Ok(self.items.get(key).cloned()),
        }
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        match self.mode {
            StorageMode::Unavailable => Err(StorageError::Unavailable),
            StorageMode::ReadOnly => Err(StorageError::Backend("QuotaExceededError".to_owned())),
            StorageMode::Available => {
                self.items.insert(key.to_owned(), value.to_owned());
                Ok(())
            }
        }
    }
}

/// Minimal element description for selector matching.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemoryElement {
    tag: String,
    id: Option<String>,
    classes: Vec<String>,
}

impl MemoryElement {
    /// Element with the given tag name.
    #[must_use]
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            id: None,
            classes: Vec::new(),
        }
    }

    /// Set the element id.
    #[must_use]
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = Some(id.to_owned());
        self
    }

    /// Add a class.
    #[must_use]
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_owned());
        self
    }

    /// Match against a selector list of compound selectors
    /// (`tag`, `.class`, `#id` and combinations such as `button.theme-toggle`).
    ///
    /// Combinators and attribute selectors are not supported and never match.
    #[must_use]
    pub fn matches(&self, selector: &str) -> bool {
        selector
            .split(',')
            .map(str::trim)
            .any(|compound| self.matches_compound(compound))
    }

    fn matches_compound(&self, compound: &str) -> bool {
        if compound.is_empty() || compound.contains(|c: char| c.is_whitespace() || "[]>+~:".contains(c))
        {
            return false;
        }
        let mut rest = compound;
        let tag_end = rest.find(['.', '#']).unwrap_or(rest.len());
        let tag = &rest[..tag_end];
        if !tag.is_empty() && tag != "*" && !tag.eq_ignore_ascii_case(&self.tag) {
            return false;
        }
        rest = &rest[tag_end..];
        while let Some(marker) = rest.chars().next() {
            let body = &rest[1..];
            let end = body.find(['.', '#']).unwrap_or(body.len());
            let name = &body[..end];
            if name.is_empty() {
                return false;
            }
            let ok = match marker {
                '.' => self.classes.iter().any(|class| class == name),
                _ => self.id.as_deref() == Some(name),
            };
            if !ok {
                return false;
            }
            rest = &body[end..];
        }
        true
    }
}

/// An event target together with its ancestors, innermost first.
#[derive(Debug, Clone, Default)]
pub struct ElementChain {
    path: Vec<MemoryElement>,
}

impl ElementChain {
    /// Build a chain from the target outwards to the root.
    #[must_use]
    pub fn new(path: Vec<MemoryElement>) -> Self {
        Self { path }
    }
}

impl DelegateTarget for ElementChain {
    fn closest(&self, selector: &str) -> bool {
        self.path.iter().any(|element| element.matches(selector))
    }
}

#[derive(Debug, Clone)]
struct MemoryNode {
    element: MemoryElement,
    text: String,
}

/// Root attributes plus a flat list of elements with text content.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocument {
    attributes: BTreeMap<String, String>,
    nodes: Vec<MemoryNode>,
}

impl MemoryDocument {
    /// Empty document with no root attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an element with initial text; returns its index.
    pub fn append(&mut self, element: MemoryElement, text: &str) -> usize {
        self.nodes.push(MemoryNode {
            element,
            text: text.to_owned(),
        });
        self.nodes.len() - 1
    }

    /// Text content of the element at `index`.
    #[must_use]
    pub fn text(&self, index: usize) -> Option<&str> {
        self.nodes.get(index).map(|node| node.text.as_str())
    }

    /// Text content of every element matching `selector`, in document order.
    #[must_use]
    pub fn texts(&self, selector: &str) -> Vec<&str> {
        self.nodes
            .iter()
            .filter(|node| node.element.matches(selector))
            .map(|node| node.text.as_str())
            .collect()
    }
}

impl DocumentHost for MemoryDocument {
    fn root_attribute(&self, name: &str) -> Option<String> {
        self.attributes.get(name).cloned()
    }

    fn set_root_attribute(&mut self, name: &str, value: &str) {
        self.attributes.insert(name.to_owned(), value.to_owned());
    }

    fn remove_root_attribute(&mut self, name: &str) {
        self.attributes.remove(name);
    }

    fn set_text_all(&mut self, selector: &str, text: &str) -> usize {
        let mut updated = 0;
        for node in self
            .nodes
            .iter_mut()
            .filter(|node| node.element.matches(selector))
        {
            text.clone_into(&mut node.text);
            updated += 1;
        }
        updated
    }
}

/// Deterministic timer queue driven by the host.
#[derive(Debug, Clone, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    pending: BTreeMap<TimerId, Duration>,
}

impl ManualScheduler {
    /// Scheduler with the clock at `0` and nothing pending.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Current monotonic time.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// Number of timeouts still pending.
    #[must_use]
    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    /// Whether `id` is still pending.
    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.contains_key(&id)
    }

    /// Advance the clock by `dt` and return the timeouts that became due,
    /// in deadline order. Returned timeouts are no longer pending.
    pub fn advance(&mut self, dt: Duration) -> Vec<TimerId> {
        self.now = self.now.saturating_add(dt);
        let mut due: Vec<(Duration, TimerId)> = self
            .pending
            .iter()
            .filter(|&(_, &deadline)| deadline <= self.now)
            .map(|(&id, &deadline)| (deadline, id))
            .collect();
        due.sort_unstable();
        for (_, id) in &due {
            self.pending.remove(id);
        }
        due.into_iter().map(|(_, id)| id).collect()
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&mut self, delay: Duration) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.pending.insert(id, self.now.saturating_add(delay));
        id
    }

    fn cancel(&mut self, id: TimerId) {
        self.pending.remove(&id);
    }
}

/// Navigator that records every navigation instead of leaving the page.
#[derive(Debug, Clone, Default)]
pub struct RecordingNavigator {
    path: String,
    visits: Vec<String>,
}

impl RecordingNavigator {
    /// Start at `path`.
    #[must_use]
    pub fn at(path: &str) -> Self {
        Self {
            path: path.to_owned(),
            visits: Vec::new(),
        }
    }

    /// Move to `path` without recording a navigation (user-driven link click).
    pub fn set_path(&mut self, path: &str) {
        path.clone_into(&mut self.path);
    }

    /// Every `navigate` call, in order.
    #[must_use]
    pub fn visits(&self) -> &[String] {
        &self.visits
    }
}

impl Navigator for RecordingNavigator {
    fn current_path(&self) -> String {
        self.path.clone()
    }

    fn navigate(&mut self, href: &str) {
        href.clone_into(&mut self.path);
        self.visits.push(href.to_owned());
    }
}
