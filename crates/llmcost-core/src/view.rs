//! View derivation for cost-annotated model sets
//!
//! This module derives the two projections the presentation layer consumes:
//!
//! - the **table view**: provider and search filtering followed by a stable
//!   sort that pins selected models to the top
//! - the **chart view**: either the user's selection (bypassing the table
//!   filters entirely) or the top N paid models of the table view
//!
//! Everything here is a pure function of its inputs. The caller owns the
//! [`ViewState`] and recomputes the views whenever it changes.
//!
//! # Examples
//!
//! ```
//! use llmcost_core::view::{ModelFilter, SortField, SortSpec, ViewState};
//!
//! let state = ViewState::new()
//!     .with_filter(ModelFilter::new().with_provider("OpenAI").with_search("gpt"))
//!     .with_sort(SortSpec::descending(SortField::ContextWindow));
//!
//! let derived = state.derive(&[]);
//! assert!(derived.table.is_empty());
//! ```

use crate::types::{CostBreakdown, ModelId, ModelRecord};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

/// Default number of entries in the automatic chart view
pub const DEFAULT_CHART_CAP: usize = 15;

/// Provider filter value meaning "no provider restriction"
pub const ALL_PROVIDERS: &str = "All";

/// Column the table view is sorted by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortField {
    /// Display name, lexicographic
    Name,
    /// Provider label, lexicographic
    Provider,
    /// Input price per million tokens
    InputPrice,
    /// Output price per million tokens
    OutputPrice,
    /// Total cost of the request
    #[default]
    TotalCost,
    /// Context window size
    ContextWindow,
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

/// Sort key and direction; defaults to total cost ascending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Ascending sort on `field`
    pub fn ascending(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Ascending,
        }
    }

    /// Descending sort on `field`
    pub fn descending(field: SortField) -> Self {
        Self {
            field,
            direction: SortDirection::Descending,
        }
    }

    /// Compare two rows on this spec's field and direction
    pub fn compare(&self, a: &CostBreakdown, b: &CostBreakdown) -> Ordering {
        let ordering = match self.field {
            SortField::Name => a.model.name.cmp(&b.model.name),
            SortField::Provider => a.model.provider.cmp(&b.model.provider),
            SortField::InputPrice => a
                .model
                .input_price_per_million
                .total_cmp(&b.model.input_price_per_million),
            SortField::OutputPrice => a
                .model
                .output_price_per_million
                .total_cmp(&b.model.output_price_per_million),
            SortField::TotalCost => a.total_cost.total_cmp(&b.total_cost),
            SortField::ContextWindow => a.model.context_window.cmp(&b.model.context_window),
        };

        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Provider and free-text filter for the table view
///
/// Both criteria are optional and combine with AND.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModelFilter {
    /// Provider label to keep; `None` keeps every provider
    pub provider: Option<String>,
    /// Case-insensitive substring matched against name or id
    pub search: Option<String>,
}

impl ModelFilter {
    /// Create a new filter with no restrictions
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict to one provider; `"All"` (any case) or blank clears the restriction
    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        let provider = provider.into();
        let provider = provider.trim();
        self.provider = if provider.is_empty() || provider.eq_ignore_ascii_case(ALL_PROVIDERS) {
            None
        } else {
            Some(provider.to_string())
        };
        self
    }

    /// Set the search text; blank text clears it
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        let search = search.trim();
        self.search = if search.is_empty() {
            None
        } else {
            Some(search.to_lowercase())
        };
        self
    }

    /// Check if a model passes the filter
    pub fn matches(&self, model: &ModelRecord) -> bool {
        if let Some(provider) = &self.provider {
            if !model.provider.eq_ignore_ascii_case(provider) {
                return false;
            }
        }

        if let Some(search) = &self.search {
            let in_name = model.name.to_lowercase().contains(search.as_str());
            let in_id = model.id.as_str().to_lowercase().contains(search.as_str());
            if !in_name && !in_id {
                return false;
            }
        }

        true
    }
}

/// Ordered set of pinned model ids
///
/// Insertion order is kept because the chart shows selected models in the
/// order the user picked them.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    ids: Vec<ModelId>,
}

impl Selection {
    /// Create an empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a selection, dropping duplicate ids
    pub fn from_ids<I, T>(ids: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ModelId>,
    {
        let mut selection = Self::new();
        for id in ids {
            selection.insert(id.into());
        }
        selection
    }

    /// Add an id; returns false if it was already selected
    pub fn insert(&mut self, id: ModelId) -> bool {
        if self.contains(&id) {
            return false;
        }
        self.ids.push(id);
        true
    }

    /// Remove an id; returns false if it was not selected
    pub fn remove(&mut self, id: &ModelId) -> bool {
        let before = self.ids.len();
        self.ids.retain(|selected| selected != id);
        self.ids.len() != before
    }

    /// Select the id if absent, deselect it if present
    pub fn toggle(&mut self, id: ModelId) {
        if !self.remove(&id) {
            self.ids.push(id);
        }
    }

    pub fn contains(&self, id: &ModelId) -> bool {
        self.ids.contains(id)
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ModelId> {
        self.ids.iter()
    }
}

/// How the chart view picks its rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartMode {
    /// The most expensive cost-positive rows of the table view
    TopPaid { cap: usize },
    /// Exactly the selected models, in selection order
    Selected(Vec<ModelId>),
}

impl ChartMode {
    /// Resolve the mode for the current selection
    ///
    /// A non-empty selection always wins over the automatic top-N view.
    pub fn resolve(selection: &Selection, cap: usize) -> Self {
        if selection.is_empty() {
            ChartMode::TopPaid { cap }
        } else {
            ChartMode::Selected(selection.iter().cloned().collect())
        }
    }
}

/// Caller-held view state
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub filter: ModelFilter,
    pub sort: SortSpec,
    pub selection: Selection,
    pub chart_cap: usize,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            filter: ModelFilter::default(),
            sort: SortSpec::default(),
            selection: Selection::default(),
            chart_cap: DEFAULT_CHART_CAP,
        }
    }
}

impl ViewState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_filter(mut self, filter: ModelFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_selection(mut self, selection: Selection) -> Self {
        self.selection = selection;
        self
    }

    pub fn with_chart_cap(mut self, cap: usize) -> Self {
        self.chart_cap = cap;
        self
    }

    /// Current chart mode
    pub fn chart_mode(&self) -> ChartMode {
        ChartMode::resolve(&self.selection, self.chart_cap)
    }

    /// Derive both views in one pass
    pub fn derive<'a>(&self, rows: &'a [CostBreakdown]) -> DerivedView<'a> {
        let table = table_view(rows, &self.filter, &self.sort, &self.selection);
        let mode = self.chart_mode();
        let chart = chart_view(rows, &table, &mode);
        DerivedView { table, chart, mode }
    }
}

/// Output of [`ViewState::derive`]
#[derive(Debug, Clone)]
pub struct DerivedView<'a> {
    /// Filtered and sorted table rows
    pub table: Vec<&'a CostBreakdown>,
    /// Rows for the chart
    pub chart: Vec<&'a CostBreakdown>,
    /// The mode the chart rows were picked with
    pub mode: ChartMode,
}

/// Filter then sort rows for the table
pub fn table_view<'a>(
    rows: &'a [CostBreakdown],
    filter: &ModelFilter,
    sort: &SortSpec,
    selection: &Selection,
) -> Vec<&'a CostBreakdown> {
    let mut table: Vec<&CostBreakdown> =
        rows.iter().filter(|row| filter.matches(&row.model)).collect();
    sort_rows(&mut table, sort, selection);
    table
}

/// Stable sort with selected rows pinned ahead of unselected ones
pub fn sort_rows(rows: &mut [&CostBreakdown], sort: &SortSpec, selection: &Selection) {
    if selection.is_empty() {
        rows.sort_by(|a, b| sort.compare(a, b));
        return;
    }

    rows.sort_by(|a, b| {
        let a_pinned = selection.contains(a.id());
        let b_pinned = selection.contains(b.id());
        b_pinned
            .cmp(&a_pinned)
            .then_with(|| sort.compare(a, b))
    });
}

/// Rows for the chart under the given mode
///
/// `Selected` looks ids up in the full row set so table filters do not apply.
/// Ids that are not present in `rows` are skipped.
pub fn chart_view<'a>(
    rows: &'a [CostBreakdown],
    table: &[&'a CostBreakdown],
    mode: &ChartMode,
) -> Vec<&'a CostBreakdown> {
    match mode {
        ChartMode::Selected(ids) => {
            let by_id: HashMap<&ModelId, &CostBreakdown> =
                rows.iter().map(|row| (row.id(), row)).collect();
            ids.iter().filter_map(|id| by_id.get(id).copied()).collect()
        }
        ChartMode::TopPaid { cap } => {
            let mut paid: Vec<&CostBreakdown> = table
                .iter()
                .copied()
                .filter(|row| row.total_cost > 0.0)
                .collect();
            paid.sort_by(|a, b| b.total_cost.total_cmp(&a.total_cost));
            paid.truncate(*cap);
            paid
        }
    }
}

/// Number of models per provider label
pub fn provider_counts<'a, I>(models: I) -> BTreeMap<String, usize>
where
    I: IntoIterator<Item = &'a ModelRecord>,
{
    let mut counts = BTreeMap::new();
    for model in models {
        *counts.entry(model.provider.clone()).or_insert(0) += 1;
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: &str, provider: &str, total: f64) -> CostBreakdown {
        CostBreakdown::new(
            ModelRecord {
                id: ModelId::new(id),
                name: id.rsplit('/').next().unwrap_or(id).to_string(),
                provider: provider.to_string(),
                input_price_per_million: total,
                output_price_per_million: total * 2.0,
                context_window: 1000,
            },
            total / 2.0,
            total / 2.0,
        )
    }

    fn priced(id: &str, input: f64, output: f64, context_window: u64) -> CostBreakdown {
        let mut breakdown = row(id, "X", 1.0);
        breakdown.model.input_price_per_million = input;
        breakdown.model.output_price_per_million = output;
        breakdown.model.context_window = context_window;
        breakdown
    }

    fn sorted(rows: &[CostBreakdown], sort: SortSpec) -> Vec<String> {
        ids(&table_view(rows, &ModelFilter::new(), &sort, &Selection::new()))
    }

    fn ids(rows: &[&CostBreakdown]) -> Vec<String> {
        rows.iter().map(|r| r.id().to_string()).collect()
    }

    #[test]
    fn test_selected_rows_are_pinned_and_sort_is_stable() {
        let rows = vec![
            row("x/a", "X", 5.0),
            row("x/b", "X", 1.0),
            row("x/c", "X", 5.0),
        ];
        let selection = Selection::from_ids(["x/a"]);
        let table = table_view(&rows, &ModelFilter::new(), &SortSpec::default(), &selection);
        assert_eq!(ids(&table), vec!["x/a", "x/b", "x/c"]);
    }

    #[test]
    fn test_ties_keep_input_order_when_descending() {
        let rows = vec![
            row("x/first", "X", 5.0),
            row("x/low", "X", 1.0),
            row("x/second", "X", 5.0),
        ];
        let table = table_view(
            &rows,
            &ModelFilter::new(),
            &SortSpec::descending(SortField::TotalCost),
            &Selection::new(),
        );
        assert_eq!(ids(&table), vec!["x/first", "x/second", "x/low"]);
    }

    #[test]
    fn test_pinning_applies_in_both_directions() {
        let rows = vec![
            row("x/cheap", "X", 1.0),
            row("x/mid", "X", 2.0),
            row("x/dear", "X", 3.0),
        ];
        let selection = Selection::from_ids(["x/mid"]);
        let asc = table_view(&rows, &ModelFilter::new(), &SortSpec::default(), &selection);
        let desc = table_view(
            &rows,
            &ModelFilter::new(),
            &SortSpec::descending(SortField::TotalCost),
            &selection,
        );
        assert_eq!(ids(&asc), vec!["x/mid", "x/cheap", "x/dear"]);
        assert_eq!(ids(&desc), vec!["x/mid", "x/dear", "x/cheap"]);
    }

    #[test]
    fn test_string_fields_sort_lexicographically() {
        let rows = vec![
            row("b/zeta", "Beta", 1.0),
            row("a/alpha", "Alpha", 2.0),
            row("c/mu", "Gamma", 3.0),
        ];
        let by_name = table_view(
            &rows,
            &ModelFilter::new(),
            &SortSpec::ascending(SortField::Name),
            &Selection::new(),
        );
        assert_eq!(ids(&by_name), vec!["a/alpha", "c/mu", "b/zeta"]);

        let by_provider = table_view(
            &rows,
            &ModelFilter::new(),
            &SortSpec::descending(SortField::Provider),
            &Selection::new(),
        );
        assert_eq!(ids(&by_provider), vec!["c/mu", "b/zeta", "a/alpha"]);
    }

    #[test]
    fn test_numeric_fields_sort_both_ways() {
        // x/a and x/d tie on every field
        let rows = vec![
            priced("x/a", 5.0, 1.0, 8_000),
            priced("x/b", 1.0, 9.0, 200_000),
            priced("x/c", 3.0, 4.0, 32_000),
            priced("x/d", 5.0, 1.0, 8_000),
        ];

        assert_eq!(
            sorted(&rows, SortSpec::ascending(SortField::InputPrice)),
            vec!["x/b", "x/c", "x/a", "x/d"]
        );
        assert_eq!(
            sorted(&rows, SortSpec::descending(SortField::InputPrice)),
            vec!["x/a", "x/d", "x/c", "x/b"]
        );
        assert_eq!(
            sorted(&rows, SortSpec::ascending(SortField::OutputPrice)),
            vec!["x/a", "x/d", "x/c", "x/b"]
        );
        assert_eq!(
            sorted(&rows, SortSpec::descending(SortField::OutputPrice)),
            vec!["x/b", "x/c", "x/a", "x/d"]
        );
        assert_eq!(
            sorted(&rows, SortSpec::ascending(SortField::ContextWindow)),
            vec!["x/a", "x/d", "x/c", "x/b"]
        );
        assert_eq!(
            sorted(&rows, SortSpec::descending(SortField::ContextWindow)),
            vec!["x/b", "x/c", "x/a", "x/d"]
        );
    }

    #[test]
    fn test_provider_and_search_filter() {
        let rows = vec![
            row("openai/gpt-4o", "OpenAI", 1.0),
            row("openai/o1-mini", "OpenAI", 2.0),
            row("anthropic/claude-3", "Anthropic", 3.0),
        ];
        let filter = ModelFilter::new().with_provider("openai").with_search("GPT");
        let table = table_view(&rows, &filter, &SortSpec::default(), &Selection::new());
        assert_eq!(ids(&table), vec!["openai/gpt-4o"]);
    }

    #[test]
    fn test_search_matches_id_when_name_differs() {
        let mut named = row("mistralai/mistral-large", "Mistral", 1.0);
        named.model.name = "Large 2".to_string();
        let rows = vec![named];
        let filter = ModelFilter::new().with_search("mistral-large");
        assert_eq!(
            table_view(&rows, &filter, &SortSpec::default(), &Selection::new()).len(),
            1
        );
    }

    #[test]
    fn test_all_provider_clears_filter() {
        let filter = ModelFilter::new().with_provider("all");
        assert_eq!(filter.provider, None);
        let filter = ModelFilter::new().with_provider("  ");
        assert_eq!(filter.provider, None);
    }

    #[test]
    fn test_selection_mode_bypasses_filter() {
        let rows = vec![
            row("openai/gpt-4o", "OpenAI", 1.0),
            row("google/gemini-pro", "Google", 2.0),
        ];
        let state = ViewState::new()
            .with_filter(ModelFilter::new().with_provider("OpenAI"))
            .with_selection(Selection::from_ids(["google/gemini-pro", "openai/gpt-4o"]));
        let derived = state.derive(&rows);

        assert_eq!(ids(&derived.table), vec!["openai/gpt-4o"]);
        assert_eq!(
            ids(&derived.chart),
            vec!["google/gemini-pro", "openai/gpt-4o"]
        );
        assert!(matches!(derived.mode, ChartMode::Selected(_)));
    }

    #[test]
    fn test_selected_chart_includes_free_models_and_skips_unknown_ids() {
        let rows = vec![row("x/free", "X", 0.0)];
        let mode = ChartMode::resolve(&Selection::from_ids(["x/free", "x/missing"]), 15);
        let chart = chart_view(&rows, &[], &mode);
        assert_eq!(ids(&chart), vec!["x/free"]);
    }

    #[test]
    fn test_top_paid_caps_and_orders() {
        let mut rows: Vec<CostBreakdown> = (1..=20)
            .map(|i| row(&format!("x/m{i}"), "X", i as f64))
            .collect();
        rows.push(row("x/free", "X", 0.0));

        let derived = ViewState::new().derive(&rows);
        assert_eq!(derived.mode, ChartMode::TopPaid { cap: 15 });
        assert_eq!(derived.chart.len(), 15);
        assert_eq!(derived.chart[0].id().as_str(), "x/m20");
        assert!(derived.chart.iter().all(|r| r.total_cost > 0.0));
        assert!(
            derived
                .chart
                .windows(2)
                .all(|w| w[0].total_cost >= w[1].total_cost)
        );
    }

    #[test]
    fn test_top_paid_respects_table_filter() {
        let rows = vec![
            row("openai/gpt-4o", "OpenAI", 1.0),
            row("google/gemini-pro", "Google", 2.0),
        ];
        let state = ViewState::new().with_filter(ModelFilter::new().with_provider("OpenAI"));
        let derived = state.derive(&rows);
        assert_eq!(ids(&derived.chart), vec!["openai/gpt-4o"]);
    }

    #[test]
    fn test_selection_toggle_and_dedup() {
        let mut selection = Selection::from_ids(["a/1", "a/2", "a/1"]);
        assert_eq!(selection.len(), 2);
        selection.toggle(ModelId::new("a/1"));
        assert!(!selection.contains(&ModelId::new("a/1")));
        selection.toggle(ModelId::new("a/1"));
        let order: Vec<&str> = selection.iter().map(ModelId::as_str).collect();
        assert_eq!(order, vec!["a/2", "a/1"]);
    }

    #[test]
    fn test_provider_listing() {
        let rows = vec![
            row("openai/gpt-4o", "OpenAI", 1.0),
            row("google/gemini-pro", "Google", 2.0),
            row("openai/o1", "OpenAI", 3.0),
        ];
        let counts = provider_counts(rows.iter().map(|r| &r.model));
        assert_eq!(counts.keys().collect::<Vec<_>>(), vec!["Google", "OpenAI"]);
        assert_eq!(counts["OpenAI"], 2);
        assert_eq!(counts["Google"], 1);
    }
}
