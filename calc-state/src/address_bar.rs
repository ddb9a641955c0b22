use std::cell::RefCell;
use std::rc::Rc;

use tracing::debug;

use crate::QueryString;

/// The page URL, shared by every mounted calculator.
///
/// All reads and writes of the query string go through this trait.
pub trait AddressBar {
    /// Full URL of the current entry.
    fn href(&self) -> String;

    fn query(&self) -> QueryString;

    /// Rewrites the current entry without adding to history.
    fn replace_state(
        &mut self,
        query: &QueryString,
    );

    /// Adds a new history entry after the current one, discarding any
    /// forward entries.
    fn push_state(
        &mut self,
        query: &QueryString,
    );
}

pub type SharedAddressBar = Rc<RefCell<dyn AddressBar>>;

/// What a back, forward or navigate landed on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationEvent {
    pub href: String,
    pub query: QueryString,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct HistoryEntry {
    base: String,
    query: QueryString,
}

impl HistoryEntry {
    /// Splits off the query and drops any fragment.
    fn from_url(url: &str) -> Self {
        let without_fragment = url.split_once('#').map_or(url, |(head, _)| head);
        let (base, query) = without_fragment
            .split_once('?')
            .unwrap_or((without_fragment, ""));
        Self {
            base: base.to_string(),
            query: QueryString::parse(query),
        }
    }

    fn href(&self) -> String {
        if self.query.is_empty() {
            self.base.clone()
        } else {
            format!("{}?{}", self.base, self.query)
        }
    }

    fn event(&self) -> NavigationEvent {
        NavigationEvent {
            href: self.href(),
            query: self.query.clone(),
        }
    }
}

/// In-memory browser history: a list of entries and a cursor.
#[derive(Debug, Clone)]
pub struct MemoryAddressBar {
    entries: Vec<HistoryEntry>,
    cursor: usize,
}

impl MemoryAddressBar {
    pub fn new(url: &str) -> Self {
        Self {
            entries: vec![HistoryEntry::from_url(url)],
            cursor: 0,
        }
    }

    /// Wraps a new address bar for sharing between sessions.
    pub fn shared(url: &str) -> Rc<RefCell<Self>> {
        Rc::new(RefCell::new(Self::new(url)))
    }

    fn current(&self) -> &HistoryEntry {
        &self.entries[self.cursor]
    }

    fn current_mut(&mut self) -> &mut HistoryEntry {
        &mut self.entries[self.cursor]
    }

    fn push_entry(
        &mut self,
        entry: HistoryEntry,
    ) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(entry);
        self.cursor = self.entries.len() - 1;
    }

    /// Moves one entry back. `None` at the first entry.
    pub fn back(&mut self) -> Option<NavigationEvent> {
        if self.cursor == 0 {
            return None;
        }
        self.cursor -= 1;
        Some(self.current().event())
    }

    /// Moves one entry forward. `None` at the last entry.
    pub fn forward(&mut self) -> Option<NavigationEvent> {
        if self.cursor + 1 >= self.entries.len() {
            return None;
        }
        self.cursor += 1;
        Some(self.current().event())
    }

    /// Opens `url` as a new entry, as following a link would.
    pub fn navigate(
        &mut self,
        url: &str,
    ) -> NavigationEvent {
        self.push_entry(HistoryEntry::from_url(url));
        self.current().event()
    }

    /// Number of history entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Index of the current entry.
    pub fn position(&self) -> usize {
        self.cursor
    }
}

impl AddressBar for MemoryAddressBar {
    fn href(&self) -> String {
        self.current().href()
    }

    fn query(&self) -> QueryString {
        self.current().query.clone()
    }

    fn replace_state(
        &mut self,
        query: &QueryString,
    ) {
        debug!(query = %query, "replace_state");
        self.current_mut().query = query.clone();
    }

    fn push_state(
        &mut self,
        query: &QueryString,
    ) {
        debug!(query = %query, "push_state");
        let base = self.current().base.clone();
        self.push_entry(HistoryEntry {
            base,
            query: query.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const PAGE: &str = "https://calc.example/tools";

    #[test]
    fn new_splits_query_and_drops_fragment() {
        let bar = MemoryAddressBar::new("https://calc.example/tools?in=emi&emi_tenure=36#result");

        assert_eq!(bar.query().get("emi_tenure"), Some("36"));
        assert_eq!(bar.href(), "https://calc.example/tools?in=emi&emi_tenure=36");
    }

    #[test]
    fn href_without_query_has_no_question_mark() {
        let bar = MemoryAddressBar::new(PAGE);

        assert_eq!(bar.href(), PAGE);
    }

    #[test]
    fn replace_state_keeps_history_length() {
        let mut bar = MemoryAddressBar::new(PAGE);

        bar.replace_state(&QueryString::parse("emi_tenure=12"));
        bar.replace_state(&QueryString::parse("emi_tenure=18"));

        assert_eq!(bar.len(), 1);
        assert_eq!(bar.href(), format!("{PAGE}?emi_tenure=18"));
    }

    #[test]
    fn back_and_forward_move_cursor() {
        let mut bar = MemoryAddressBar::new(PAGE);
        bar.push_state(&QueryString::parse("in=emi"));
        bar.push_state(&QueryString::parse("in=rd"));

        let back = bar.back().unwrap();
        assert_eq!(back.query.get("in"), Some("emi"));
        assert_eq!(bar.back().unwrap().href, PAGE);
        assert_eq!(bar.back(), None);

        assert_eq!(bar.forward().unwrap().query.get("in"), Some("emi"));
        assert_eq!(bar.position(), 1);
    }

    #[test]
    fn push_after_back_discards_forward_entries() {
        let mut bar = MemoryAddressBar::new(PAGE);
        bar.push_state(&QueryString::parse("in=emi"));
        bar.push_state(&QueryString::parse("in=rd"));
        bar.back();

        bar.push_state(&QueryString::parse("in=fd"));

        assert_eq!(bar.len(), 3);
        assert_eq!(bar.forward(), None);
        assert_eq!(bar.query().get("in"), Some("fd"));
    }

    #[test]
    fn navigate_uses_new_base() {
        let mut bar = MemoryAddressBar::new(PAGE);

        let event = bar.navigate("https://other.example/share?in=sip");

        assert_eq!(event.href, "https://other.example/share?in=sip");
        assert_eq!(bar.len(), 2);
    }
}
