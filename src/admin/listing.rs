//! List controller for the admin tables: free-text search plus client-side
//! pagination over an already-fetched collection. Filtering never touches
//! the store and never re-sorts; rows keep the order the store returned.

use crate::db::models::{Blog, Enquiry, Portfolio};

/// An entity the admin search box can match against. Each kind designates
/// two text fields; the match is a case-insensitive substring test.
pub trait Searchable {
    fn search_fields(&self) -> [&str; 2];

    fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return true;
        }
        let needle = query.to_lowercase();
        self.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }
}

impl Searchable for Blog {
    fn search_fields(&self) -> [&str; 2] {
        [&self.title, self.excerpt.as_deref().unwrap_or("")]
    }
}

impl Searchable for Portfolio {
    fn search_fields(&self) -> [&str; 2] {
        [&self.title, self.description.as_deref().unwrap_or("")]
    }
}

impl Searchable for Enquiry {
    fn search_fields(&self) -> [&str; 2] {
        [&self.name, &self.message]
    }
}

/// One page of a filtered collection.
#[derive(Debug)]
pub struct ListView<'a, T> {
    pub items: Vec<&'a T>,
    /// Page actually shown after clamping.
    pub page: usize,
    pub total_pages: usize,
    /// Total matches across all pages.
    pub total: usize,
}

/// Filter `items` by `query`, then slice out page `page` of size `page_size`.
/// `total_pages = ceil(matches / page_size)`; the requested page is clamped
/// into `[1, max(1, total_pages)]`, so asking for a page past the end yields
/// the last non-empty page rather than an empty slice.
pub fn view<'a, T: Searchable>(
    items: &'a [T],
    query: &str,
    page: usize,
    page_size: usize,
) -> ListView<'a, T> {
    let page_size = page_size.max(1);
    let filtered: Vec<&T> = items.iter().filter(|item| item.matches(query)).collect();

    let total = filtered.len();
    let total_pages = total.div_ceil(page_size);
    let page = page.clamp(1, total_pages.max(1));

    let start = (page - 1) * page_size;
    let items = filtered
        .into_iter()
        .skip(start)
        .take(page_size)
        .collect();

    ListView {
        items,
        page,
        total_pages,
        total,
    }
}

/// Stateful wrapper used by the admin tables: holds the fetched collection,
/// the search box contents and the current page. Changing the query or
/// replacing the collection snaps back to page 1 so a narrowed result set
/// can never leave an out-of-range, empty page on screen.
#[derive(Debug)]
pub struct ListState<T: Searchable> {
    items: Vec<T>,
    query: String,
    page: usize,
    page_size: usize,
}

impl<T: Searchable> ListState<T> {
    pub fn new(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            query: String::new(),
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// Replace the backing collection wholesale (a fresh list fetch after a
    /// mutation). Resets to page 1.
    pub fn replace_items(&mut self, items: Vec<T>) {
        self.items = items;
        self.page = 1;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        let query = query.into();
        if query != self.query {
            self.query = query;
            self.page = 1;
        }
    }

    /// Requested page is clamped when the view is produced.
    pub fn set_page(&mut self, page: usize) {
        self.page = page.max(1);
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn view(&self) -> ListView<'_, T> {
        view(&self.items, &self.query, self.page, self.page_size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Row {
        title: String,
        body: String,
    }

    impl Row {
        fn new(title: &str, body: &str) -> Self {
            Self {
                title: title.to_string(),
                body: body.to_string(),
            }
        }
    }

    impl Searchable for Row {
        fn search_fields(&self) -> [&str; 2] {
            [&self.title, &self.body]
        }
    }

    fn rows(n: usize) -> Vec<Row> {
        (0..n).map(|i| Row::new(&format!("item {i}"), "")).collect()
    }

    #[test]
    fn test_filter_is_case_insensitive_substring() {
        let items = vec![
            Row::new("Brand Refresh", "visual identity"),
            Row::new("App Redesign", "mobile UI"),
            Row::new("Mural", "paint"),
        ];
        let v = view(&items, "RE", 1, 10);
        assert_eq!(v.total, 2);
        assert_eq!(v.items[0].title, "Brand Refresh");
        assert_eq!(v.items[1].title, "App Redesign");
    }

    #[test]
    fn test_filter_matches_second_field() {
        let items = vec![Row::new("Mural", "large scale paint job")];
        assert_eq!(view(&items, "paint", 1, 10).total, 1);
    }

    #[test]
    fn test_filter_preserves_arrival_order() {
        let items = vec![Row::new("b", ""), Row::new("a", ""), Row::new("c", "")];
        let v = view(&items, "", 1, 10);
        let titles: Vec<&str> = v.items.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["b", "a", "c"]);
    }

    #[test]
    fn test_pagination_slices() {
        let items = rows(7);
        let v = view(&items, "", 2, 3);
        assert_eq!(v.total_pages, 3);
        assert_eq!(v.items.len(), 3);
        assert_eq!(v.items[0].title, "item 3");
    }

    #[test]
    fn test_page_past_end_clamps_to_last() {
        let items = rows(7);
        let v = view(&items, "", 9, 3);
        assert_eq!(v.page, 3);
        assert_eq!(v.items.len(), 1);
    }

    #[test]
    fn test_empty_collection_clamps_to_page_one() {
        let items: Vec<Row> = Vec::new();
        let v = view(&items, "", 5, 3);
        assert_eq!(v.page, 1);
        assert_eq!(v.total_pages, 0);
        assert!(v.items.is_empty());
    }

    #[test]
    fn test_delete_on_last_page_reclamps_down_by_one() {
        // 7 items, page size 3: page 3 holds one item. After the delete and
        // re-list there are 6 items, so the same page request clamps to 2.
        let before = rows(7);
        assert_eq!(view(&before, "", 3, 3).items.len(), 1);

        let after = rows(6);
        let v = view(&after, "", 3, 3);
        assert_eq!(v.page, 2);
        assert_eq!(v.items.len(), 3);
    }

    #[test]
    fn test_query_change_resets_page() {
        let mut state = ListState::new(3);
        state.replace_items(rows(9));
        state.set_page(3);
        assert_eq!(state.page(), 3);

        state.set_query("item");
        assert_eq!(state.page(), 1);

        // Same query again is not a change.
        state.set_page(2);
        state.set_query("item");
        assert_eq!(state.page(), 2);
    }

    #[test]
    fn test_refresh_resets_page() {
        let mut state = ListState::new(3);
        state.replace_items(rows(9));
        state.set_page(3);
        state.replace_items(rows(8));
        assert_eq!(state.page(), 1);
    }

    #[test]
    fn test_view_is_subsequence_of_source() {
        let items = vec![
            Row::new("alpha", ""),
            Row::new("beta", ""),
            Row::new("alpaca", ""),
        ];
        let v = view(&items, "al", 1, 10);
        let titles: Vec<&str> = v.items.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["alpha", "alpaca"]);
    }
}
