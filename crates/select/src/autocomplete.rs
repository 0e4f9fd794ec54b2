//! The autocomplete control.

use std::cell::Cell;
use std::rc::Rc;

use crate::dismiss::{PointerHub, Region, Subscription};
use crate::filter::filter_candidates;
use crate::label::{KeyFn, Labeler, safe_label};
use crate::sequence::{SearchSequencer, SearchTicket};

/// Behavior knobs of one control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AutocompleteConfig {
    /// Case-folded, trimmed characters required before filtering kicks in.
    pub min_chars: usize,
    /// Below `min_chars`, show the first `max_items` candidates instead of nothing.
    pub show_all_when_empty: bool,
    pub max_items: usize,
    /// After a selection, empty the text box instead of showing the label.
    pub clear_on_select: bool,
}

impl Default for AutocompleteConfig {
    fn default() -> Self {
        Self {
            min_chars: 0,
            show_all_when_empty: true,
            max_items: 50,
            clear_on_select: false,
        }
    }
}

/// A server-side search the caller should run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchRequest {
    pub ticket: SearchTicket,
    /// Trimmed input text.
    pub query: String,
}

/// One rendered result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultRow {
    /// Position in the current filtered list; pass to [`Autocomplete::select_row`].
    pub position: usize,
    /// Rendering identity only.
    pub key: String,
    pub label: String,
}

/// What the results list looks like right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResultsView {
    Closed,
    /// Open, but the filter matched nothing.
    NothingFound,
    Rows(Vec<ResultRow>),
}

type SearchHook = Box<dyn FnMut(SearchRequest)>;

/// Pick-one-by-typing control over a candidate list.
///
/// With a search hook configured, every keystroke (and focus) also emits a
/// [`SearchRequest`]. Results come back through [`Autocomplete::deliver`] and
/// replace the candidate list only when they answer the latest request.
pub struct Autocomplete<T> {
    config: AutocompleteConfig,
    candidates: Vec<T>,
    labeler: Box<dyn Labeler<T>>,
    key: Option<KeyFn<T>>,
    search: Option<SearchHook>,
    sequencer: SearchSequencer,
    text: String,
    selected: Option<T>,
    open: Rc<Cell<bool>>,
    bounds: Rc<Cell<Region>>,
    mounted: Option<Subscription>,
}

impl<T> core::fmt::Debug for Autocomplete<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Autocomplete")
            .field("config", &self.config)
            .field("candidates", &self.candidates.len())
            .field("text", &self.text)
            .field("open", &self.open.get())
            .field("mounted", &self.mounted.is_some())
            .finish()
    }
}

impl<T: Clone> Autocomplete<T> {
    pub fn new(labeler: impl Labeler<T> + 'static) -> Self {
        Self {
            config: AutocompleteConfig::default(),
            candidates: Vec::new(),
            labeler: Box::new(labeler),
            key: None,
            search: None,
            sequencer: SearchSequencer::new(),
            text: String::new(),
            selected: None,
            open: Rc::new(Cell::new(false)),
            bounds: Rc::new(Cell::new(Region::default())),
            mounted: None,
        }
    }

    pub fn with_config(mut self, config: AutocompleteConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_key(mut self, key: impl Fn(&T) -> Option<String> + 'static) -> Self {
        self.key = Some(Box::new(key));
        self
    }

    pub fn with_search(mut self, hook: impl FnMut(SearchRequest) + 'static) -> Self {
        self.search = Some(Box::new(hook));
        self
    }

    pub fn with_candidates(mut self, candidates: Vec<T>) -> Self {
        self.candidates = candidates;
        self
    }

    pub fn config(&self) -> &AutocompleteConfig {
        &self.config
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_open(&self) -> bool {
        self.open.get()
    }

    pub fn selected(&self) -> Option<&T> {
        self.selected.as_ref()
    }

    pub fn candidates(&self) -> &[T] {
        &self.candidates
    }

    pub fn label_of(&self, item: &T) -> String {
        safe_label(self.labeler.as_ref(), item)
    }

    /// Replace the candidate list unconditionally (locally loaded lists).
    pub fn set_candidates(&mut self, candidates: Vec<T>) {
        self.candidates = candidates;
    }

    /// Replace the candidate list with search results, unless a newer search
    /// has been issued since `ticket`. Returns whether the results were applied.
    pub fn deliver(&mut self, ticket: SearchTicket, candidates: Vec<T>) -> bool {
        if !self.sequencer.is_latest(ticket) {
            tracing::debug!(
                ticket = ticket.get(),
                latest = self.sequencer.latest().map(|t| t.get()),
                "discarding stale search results"
            );
            return false;
        }
        self.candidates = candidates;
        true
    }

    /// Keystroke: store text, open, and request a search with the trimmed text.
    pub fn input(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.open.set(true);
        self.request_search();
    }

    /// Focus: open and request a search with the current trimmed text.
    pub fn focus(&mut self) {
        self.open.set(true);
        self.request_search();
    }

    pub fn close(&mut self) {
        self.open.set(false);
    }

    /// Forget the chosen item and empty the text box.
    pub fn clear(&mut self) {
        self.selected = None;
        self.text.clear();
    }

    fn request_search(&mut self) {
        let Some(hook) = self.search.as_mut() else {
            return;
        };
        let ticket = self.sequencer.issue();
        hook(SearchRequest {
            ticket,
            query: self.text.trim().to_string(),
        });
    }

    /// Candidates matching the current text, in candidate order.
    pub fn filtered(&self) -> Vec<&T> {
        self.filtered_positions()
            .into_iter()
            .map(|pos| &self.candidates[pos])
            .collect()
    }

    fn filtered_positions(&self) -> Vec<usize> {
        filter_candidates(&self.candidates, self.labeler.as_ref(), &self.text, &self.config)
    }

    pub fn view(&self) -> ResultsView {
        if !self.open.get() {
            return ResultsView::Closed;
        }
        let rows: Vec<ResultRow> = self
            .filtered_positions()
            .into_iter()
            .enumerate()
            .map(|(position, idx)| {
                let item = &self.candidates[idx];
                let label = self.label_of(item);
                let key = self
                    .key
                    .as_ref()
                    .and_then(|key| key(item))
                    .unwrap_or_else(|| label.clone());
                ResultRow { position, key, label }
            })
            .collect();
        if rows.is_empty() {
            ResultsView::NothingFound
        } else {
            ResultsView::Rows(rows)
        }
    }

    /// Click on a rendered row: emit the full item, close, update the text box.
    pub fn select_row(&mut self, position: usize) -> Option<T> {
        let idx = *self.filtered_positions().get(position)?;
        let item = self.candidates[idx].clone();
        self.text = if self.config.clear_on_select {
            String::new()
        } else {
            self.label_of(&item)
        };
        self.open.set(false);
        self.selected = Some(item.clone());
        Some(item)
    }

    /// Attach the outside-click listener. Idempotent while mounted.
    pub fn mount(&mut self, hub: &PointerHub, bounds: Region) {
        self.bounds.set(bounds);
        if self.mounted.is_some() {
            return;
        }
        let open = Rc::clone(&self.open);
        let region = Rc::clone(&self.bounds);
        self.mounted = Some(hub.subscribe(move |at| {
            if !region.get().contains(at) {
                open.set(false);
            }
        }));
    }

    /// Layout changed.
    pub fn set_bounds(&mut self, bounds: Region) {
        self.bounds.set(bounds);
    }

    /// Detach the outside-click listener.
    pub fn unmount(&mut self) {
        self.mounted = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dismiss::Point;
    use std::cell::RefCell;

    #[derive(Debug, Clone, PartialEq)]
    struct Fruit {
        id: Option<u32>,
        name: &'static str,
    }

    fn fruit(id: Option<u32>, name: &'static str) -> Fruit {
        Fruit { id, name }
    }

    fn basket() -> Vec<Fruit> {
        vec![
            fruit(Some(1), "Apple"),
            fruit(Some(2), "Banana"),
            fruit(None, "Pineapple"),
        ]
    }

    fn control() -> Autocomplete<Fruit> {
        Autocomplete::new(|f: &Fruit| Some(f.name.to_string()))
            .with_key(|f: &Fruit| f.id.map(|id| id.to_string()))
            .with_candidates(basket())
    }

    fn row_labels(view: &ResultsView) -> Vec<String> {
        match view {
            ResultsView::Rows(rows) => rows.iter().map(|r| r.label.clone()).collect(),
            _ => Vec::new(),
        }
    }

    #[test]
    fn starts_closed() {
        let ac = control();
        assert!(!ac.is_open());
        assert_eq!(ac.view(), ResultsView::Closed);
    }

    #[test]
    fn typing_opens_and_filters() {
        let mut ac = control();
        ac.input("apple");
        assert!(ac.is_open());
        assert_eq!(row_labels(&ac.view()), vec!["Apple", "Pineapple"]);
    }

    #[test]
    fn no_match_renders_placeholder() {
        let mut ac = control();
        ac.input("kiwi");
        assert_eq!(ac.view(), ResultsView::NothingFound);
    }

    #[test]
    fn rows_fall_back_to_label_key() {
        let mut ac = control();
        ac.focus();
        let ResultsView::Rows(rows) = ac.view() else {
            panic!("expected rows");
        };
        let keys: Vec<_> = rows.iter().map(|r| r.key.as_str()).collect();
        assert_eq!(keys, vec!["1", "2", "Pineapple"]);
    }

    #[test]
    fn unlabeled_candidate_renders_empty_label() {
        let mut ac = Autocomplete::new(|n: &i32| if *n == 0 { None } else { Some(n.to_string()) })
            .with_candidates(vec![0, 5]);
        ac.focus();
        assert_eq!(row_labels(&ac.view()), vec!["", "5"]);
    }

    #[test]
    fn selecting_emits_full_item_and_shows_label() {
        let mut ac = control();
        ac.input("ban");
        let picked = ac.select_row(0).unwrap();
        assert_eq!(picked, fruit(Some(2), "Banana"));
        assert_eq!(ac.text(), "Banana");
        assert!(!ac.is_open());
        assert_eq!(ac.selected(), Some(&picked));
    }

    #[test]
    fn clear_on_select_empties_text() {
        let mut ac = control().with_config(AutocompleteConfig {
            clear_on_select: true,
            ..AutocompleteConfig::default()
        });
        ac.input("pine");
        assert_eq!(ac.select_row(0).unwrap().name, "Pineapple");
        assert_eq!(ac.text(), "");
    }

    #[test]
    fn selecting_outside_filtered_range_is_none() {
        let mut ac = control();
        ac.input("apple");
        assert_eq!(ac.select_row(2), None);
        assert!(ac.is_open());
    }

    #[test]
    fn search_hook_receives_trimmed_text_on_input_and_focus() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut ac = control().with_search(move |req| sink.borrow_mut().push(req));

        ac.input("  ann ");
        ac.close();
        ac.focus();

        let seen = seen.borrow();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].query, "ann");
        assert_eq!(seen[1].query, "ann");
        assert!(seen[0].ticket < seen[1].ticket);
    }

    #[test]
    fn stale_search_results_are_discarded() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        let mut ac = Autocomplete::new(|s: &String| Some(s.clone()))
            .with_search(move |req: SearchRequest| sink.borrow_mut().push(req.ticket));

        ac.input("a");
        ac.input("an");
        let (older, newer) = {
            let seen = seen.borrow();
            (seen[0], seen[1])
        };

        // Newer response arrives first, older one straggles in afterwards.
        assert!(ac.deliver(newer, vec!["Anna".to_string()]));
        assert!(!ac.deliver(older, vec!["Alex".to_string(), "Anna".to_string()]));

        assert_eq!(ac.candidates(), ["Anna".to_string()]);
    }

    #[test]
    fn outside_pointer_down_closes_without_touching_text_or_selection() {
        let hub = PointerHub::new();
        let mut ac = control();
        ac.mount(&hub, Region::new(0.0, 0.0, 200.0, 40.0));

        ac.input("ban");
        ac.select_row(0);
        ac.input("Banana pie");
        assert!(ac.is_open());

        hub.pointer_down(Point::new(10.0, 20.0));
        assert!(ac.is_open(), "click inside keeps the list open");

        hub.pointer_down(Point::new(500.0, 500.0));
        assert!(!ac.is_open());
        assert_eq!(ac.text(), "Banana pie");
        assert_eq!(ac.selected().map(|f| f.name), Some("Banana"));
    }

    #[test]
    fn mount_is_idempotent_and_teardown_detaches() {
        let hub = PointerHub::new();
        let mut ac = control();

        ac.mount(&hub, Region::new(0.0, 0.0, 10.0, 10.0));
        ac.mount(&hub, Region::new(0.0, 0.0, 20.0, 20.0));
        assert_eq!(hub.listener_count(), 1);

        ac.unmount();
        assert_eq!(hub.listener_count(), 0);

        ac.mount(&hub, Region::default());
        drop(ac);
        assert_eq!(hub.listener_count(), 0);
    }

    #[test]
    fn remount_uses_latest_bounds() {
        let hub = PointerHub::new();
        let mut ac = control();
        ac.mount(&hub, Region::new(0.0, 0.0, 10.0, 10.0));
        ac.set_bounds(Region::new(100.0, 100.0, 10.0, 10.0));

        ac.focus();
        hub.pointer_down(Point::new(105.0, 105.0));
        assert!(ac.is_open());
        hub.pointer_down(Point::new(5.0, 5.0));
        assert!(!ac.is_open());
    }
}
