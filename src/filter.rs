use std::collections::BTreeSet;
use std::fmt;

use derive_setters::Setters;

use crate::lead::{Lead, LeadId, LeadStatus};

/// Either "All" or a single accepted value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Choice<T> {
    All,
    Is(T),
}

impl<T> Default for Choice<T> {
    fn default() -> Self {
        Choice::All
    }
}

impl<T: PartialEq + Clone> Choice<T> {
    pub fn admits(&self, value: &T) -> bool {
        match self {
            Choice::All => true,
            Choice::Is(v) => v == value,
        }
    }

    /// Steps through `All, options[0], .., options[n-1], All`.
    pub fn next(&self, options: &[T]) -> Self {
        let pos = match self {
            Choice::All => None,
            Choice::Is(v) => options.iter().position(|o| o == v),
        };
        match pos {
            None => options.first().cloned().map_or(Choice::All, Choice::Is),
            Some(i) => options.get(i + 1).cloned().map_or(Choice::All, Choice::Is),
        }
    }

    /// Reverse of [`Choice::next`].
    pub fn prev(&self, options: &[T]) -> Self {
        let pos = match self {
            Choice::All => None,
            Choice::Is(v) => options.iter().position(|o| o == v),
        };
        match pos {
            None => options.last().cloned().map_or(Choice::All, Choice::Is),
            Some(0) => Choice::All,
            Some(i) => Choice::Is(options[i - 1].clone()),
        }
    }
}

impl<T: fmt::Display> fmt::Display for Choice<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::All => f.write_str("All"),
            Choice::Is(v) => v.fmt(f),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Period {
    Today,
    Last7Days,
    #[default]
    Last30Days,
    ThisMonth,
}

impl Period {
    pub const ALL: [Period; 4] = [
        Period::Today,
        Period::Last7Days,
        Period::Last30Days,
        Period::ThisMonth,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Period::Today => "Today",
            Period::Last7Days => "Last 7 days",
            Period::Last30Days => "Last 30 days",
            Period::ThisMonth => "This month",
        }
    }

    pub fn next(self) -> Self {
        let idx = Period::ALL.iter().position(|&p| p == self).unwrap_or(0);
        Period::ALL[(idx + 1) % Period::ALL.len()]
    }
}

/// Transient filter state of the leads page.
///
/// `tab` and `status` both constrain the lead status and are applied
/// independently. `period` is carried for display only.
#[derive(Debug, Clone, Default, PartialEq, Setters)]
#[setters(prefix = "with_")]
pub struct FilterState {
    #[setters(into)]
    pub query: String,
    pub tab: Choice<LeadStatus>,
    pub owner: Choice<String>,
    pub origin: Choice<String>,
    pub status: Choice<LeadStatus>,
    pub period: Period,
}

impl FilterState {
    pub fn matches(&self, lead: &Lead) -> bool {
        self.tab.admits(&lead.status)
            && self.owner.admits(&lead.owner)
            && self.origin.admits(&lead.origin)
            && self.status.admits(&lead.status)
            && self.matches_query(lead)
    }

    fn matches_query(&self, lead: &Lead) -> bool {
        if self.query.is_empty() {
            return true;
        }
        let q = self.query.to_lowercase();
        lead.name.to_lowercase().contains(&q) || lead.email.to_lowercase().contains(&q)
    }

    /// Indices into `leads` of the visible records, in original order.
    pub fn apply(&self, leads: &[Lead]) -> Vec<usize> {
        leads
            .iter()
            .enumerate()
            .filter(|(_, lead)| self.matches(lead))
            .map(|(idx, _)| idx)
            .collect()
    }
}

/// Ids of the rows produced by [`FilterState::apply`].
pub fn visible_ids(leads: &[Lead], rows: &[usize]) -> Vec<LeadId> {
    rows.iter().map(|&r| leads[r].id).collect()
}

/// Selected lead ids. Not reconciled with the visible rows when filters
/// change, so ids hidden by a later filter stay selected.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ids: BTreeSet<LeadId>,
}

impl Selection {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: LeadId) -> bool {
        self.ids.contains(&id)
    }

    pub fn ids(&self) -> impl Iterator<Item = LeadId> + '_ {
        self.ids.iter().copied()
    }

    pub fn toggle(&mut self, id: LeadId) {
        if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    /// State of the header checkbox for the given visible ids.
    pub fn all_selected(&self, visible: &[LeadId]) -> bool {
        !visible.is_empty() && self.ids.len() == visible.len()
    }

    /// Replaces the selection with `visible` when `checked`, empties it otherwise.
    pub fn select_all(&mut self, checked: bool, visible: &[LeadId]) {
        self.ids = if checked {
            visible.iter().copied().collect()
        } else {
            BTreeSet::new()
        };
    }

    /// Flips the header checkbox.
    pub fn toggle_all(&mut self, visible: &[LeadId]) {
        let checked = !self.all_selected(visible);
        self.select_all(checked, visible);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lead::seed_leads;

    fn ids(filters: &FilterState) -> Vec<LeadId> {
        let leads = seed_leads();
        visible_ids(&leads, &filters.apply(&leads))
    }

    #[test]
    fn defaults_show_everything_in_order() {
        assert_eq!(ids(&FilterState::default()), vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn tab_new_shows_new_leads() {
        let f = FilterState::default().with_tab(Choice::Is(LeadStatus::New));
        assert_eq!(ids(&f), vec![1, 5]);
    }

    #[test]
    fn query_is_case_insensitive_on_name() {
        for q in ["bruna", "BRUNA", "BrUnA"] {
            assert_eq!(ids(&FilterState::default().with_query(q)), vec![2]);
        }
    }

    #[test]
    fn query_matches_email() {
        let f = FilterState::default().with_query("@dominio.com");
        assert_eq!(ids(&f), vec![3, 4]);
    }

    #[test]
    fn query_does_not_match_phone_or_owner() {
        assert!(ids(&FilterState::default().with_query("99814")).is_empty());
        assert!(ids(&FilterState::default().with_query("melissa")).is_empty());
    }

    #[test]
    fn owner_and_origin_combine() {
        let f = FilterState::default()
            .with_owner(Choice::Is("Lu Vieira".to_string()))
            .with_origin(Choice::Is("Capturador 123".to_string()));
        assert_eq!(ids(&f), vec![1]);
    }

    #[test]
    fn tab_and_status_filter_must_both_pass() {
        let conflicting = FilterState::default()
            .with_tab(Choice::Is(LeadStatus::New))
            .with_status(Choice::Is(LeadStatus::Archived));
        assert!(ids(&conflicting).is_empty());

        let agreeing = FilterState::default()
            .with_tab(Choice::Is(LeadStatus::InProgress))
            .with_status(Choice::Is(LeadStatus::InProgress));
        assert_eq!(ids(&agreeing), vec![2, 4]);

        let status_only = FilterState::default().with_status(Choice::Is(LeadStatus::Archived));
        assert_eq!(ids(&status_only), vec![3]);
    }

    #[test]
    fn period_does_not_filter() {
        for p in Period::ALL {
            assert_eq!(ids(&FilterState::default().with_period(p)), vec![1, 2, 3, 4, 5]);
        }
    }

    #[test]
    fn derivation_is_an_ordered_subset_and_idempotent() {
        let leads = seed_leads();
        let owners = [Choice::All, Choice::Is("Diego".to_string())];
        let tabs = [Choice::All, Choice::Is(LeadStatus::New), Choice::Is(LeadStatus::Archived)];
        for owner in &owners {
            for tab in &tabs {
                for q in ["", "a", "zzz"] {
                    let f = FilterState::default()
                        .with_owner(owner.clone())
                        .with_tab(tab.clone())
                        .with_query(q);
                    let rows = f.apply(&leads);
                    assert!(rows.windows(2).all(|w| w[0] < w[1]));
                    assert!(rows.iter().all(|&r| r < leads.len()));
                    assert_eq!(rows, f.apply(&leads));
                }
            }
        }
    }

    #[test]
    fn choice_cycles_through_options() {
        let opts = vec!["a".to_string(), "b".to_string()];
        let c = Choice::All.next(&opts);
        assert_eq!(c, Choice::Is("a".to_string()));
        let c = c.next(&opts);
        assert_eq!(c, Choice::Is("b".to_string()));
        assert_eq!(c.next(&opts), Choice::All);
        assert_eq!(Choice::All.prev(&opts), Choice::Is("b".to_string()));
        assert_eq!(Choice::Is("a".to_string()).prev(&opts), Choice::All);
    }

    #[test]
    fn select_all_selects_only_visible() {
        let leads = seed_leads();
        let f = FilterState::default().with_tab(Choice::Is(LeadStatus::New));
        let visible = visible_ids(&leads, &f.apply(&leads));
        assert_eq!(visible.len(), 2);

        let mut sel = Selection::default();
        sel.toggle_all(&visible);
        assert_eq!(sel.ids().collect::<Vec<_>>(), vec![1, 5]);
        assert!(sel.all_selected(&visible));

        sel.toggle_all(&visible);
        assert!(sel.is_empty());
    }

    #[test]
    fn selection_keeps_hidden_ids_after_filter_change() {
        let leads = seed_leads();
        let mut sel = Selection::default();
        let all = visible_ids(&leads, &FilterState::default().apply(&leads));
        sel.select_all(true, &all);

        let f = FilterState::default().with_query("bruna");
        let visible = visible_ids(&leads, &f.apply(&leads));
        assert_eq!(visible, vec![2]);
        assert_eq!(sel.len(), 5);
        assert!(!sel.all_selected(&visible));
    }

    #[test]
    fn header_checkbox_unchecked_for_empty_view() {
        let mut sel = Selection::default();
        assert!(!sel.all_selected(&[]));
        sel.toggle_all(&[]);
        assert!(sel.is_empty());
    }

    #[test]
    fn toggle_row_adds_and_removes() {
        let mut sel = Selection::default();
        sel.toggle(3);
        sel.toggle(1);
        assert!(sel.contains(3));
        sel.toggle(3);
        assert_eq!(sel.ids().collect::<Vec<_>>(), vec![1]);
    }
}
