use std::collections::HashSet;

use crate::registry::model::{AppEntry, CatalogKind, TweakEntry};

/// Shared view of an app or a tweak for filtering and selection.
pub trait CatalogItem {
    const KIND: CatalogKind;

    /// Identity used in the selection set: app name or tweak id.
    fn key(&self) -> &str;
    fn in_category(&self, category: &str) -> bool;
    fn search_fields(&self) -> Vec<&str>;
    fn categories(&self) -> Vec<&str>;
}

impl CatalogItem for AppEntry {
    const KIND: CatalogKind = CatalogKind::Apps;

    fn key(&self) -> &str {
        &self.name
    }

    fn in_category(&self, category: &str) -> bool {
        self.category == category
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.description.as_str(), self.category.as_str()]
    }

    fn categories(&self) -> Vec<&str> {
        vec![self.category.as_str()]
    }
}

impl CatalogItem for TweakEntry {
    const KIND: CatalogKind = CatalogKind::Tweaks;

    fn key(&self) -> &str {
        &self.id
    }

    fn in_category(&self, category: &str) -> bool {
        self.categories.iter().any(|c| c == category)
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.id.as_str(), self.title.as_str(), self.description.as_str()];
        fields.extend(self.categories.iter().map(String::as_str));
        fields
    }

    fn categories(&self) -> Vec<&str> {
        self.categories.iter().map(String::as_str).collect()
    }
}

/// What the user has picked and how the catalogs are currently filtered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    pub selected_app_names: HashSet<String>,
    pub selected_tweak_ids: HashSet<String>,
    pub active_app_categories: HashSet<String>,
    pub active_tweak_categories: HashSet<String>,
    pub search_text: String,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    fn selected_mut(&mut self, kind: CatalogKind) -> &mut HashSet<String> {
        match kind {
            CatalogKind::Apps => &mut self.selected_app_names,
            CatalogKind::Tweaks => &mut self.selected_tweak_ids,
        }
    }

    pub fn selected(&self, kind: CatalogKind) -> &HashSet<String> {
        match kind {
            CatalogKind::Apps => &self.selected_app_names,
            CatalogKind::Tweaks => &self.selected_tweak_ids,
        }
    }

    pub fn active_categories(&self, kind: CatalogKind) -> &HashSet<String> {
        match kind {
            CatalogKind::Apps => &self.active_app_categories,
            CatalogKind::Tweaks => &self.active_tweak_categories,
        }
    }

    fn active_categories_mut(&mut self, kind: CatalogKind) -> &mut HashSet<String> {
        match kind {
            CatalogKind::Apps => &mut self.active_app_categories,
            CatalogKind::Tweaks => &mut self.active_tweak_categories,
        }
    }

    pub fn toggle_app(&mut self, name: &str) {
        toggle(&mut self.selected_app_names, name);
    }

    pub fn toggle_tweak(&mut self, id: &str) {
        toggle(&mut self.selected_tweak_ids, id);
    }

    pub fn is_selected<T: CatalogItem>(&self, item: &T) -> bool {
        self.selected(T::KIND).contains(item.key())
    }

    /// Select every visible entry of `category`; hidden entries are untouched.
    pub fn select_all_in_category<T: CatalogItem>(&mut self, category: &str, visible: &[&T]) {
        let selected = self.selected_mut(T::KIND);
        for item in visible.iter().filter(|item| item.in_category(category)) {
            selected.insert(item.key().to_string());
        }
    }

    pub fn deselect_all_in_category<T: CatalogItem>(&mut self, category: &str, visible: &[&T]) {
        let selected = self.selected_mut(T::KIND);
        for item in visible.iter().filter(|item| item.in_category(category)) {
            selected.remove(item.key());
        }
    }

    pub fn toggle_category_filter(&mut self, kind: CatalogKind, category: &str) {
        toggle(self.active_categories_mut(kind), category);
    }

    pub fn set_search_text(&mut self, text: impl Into<String>) {
        self.search_text = text.into();
    }

    pub fn clear(&mut self, kind: CatalogKind) {
        self.selected_mut(kind).clear();
    }

    pub fn clear_all(&mut self) {
        self.selected_app_names.clear();
        self.selected_tweak_ids.clear();
    }

    pub fn total_selected(&self) -> usize {
        self.selected_app_names.len() + self.selected_tweak_ids.len()
    }

    pub fn matches_search<T: CatalogItem>(&self, item: &T) -> bool {
        if self.search_text.trim().is_empty() {
            return true;
        }
        let needle = self.search_text.to_lowercase();
        item.search_fields()
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn matches_category<T: CatalogItem>(&self, item: &T) -> bool {
        let active = self.active_categories(T::KIND);
        active.is_empty() || item.categories().iter().any(|c| active.contains(*c))
    }

    pub fn is_visible<T: CatalogItem>(&self, item: &T) -> bool {
        self.matches_search(item) && self.matches_category(item)
    }

    pub fn visible<'a, T: CatalogItem>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.is_visible(*item)).collect()
    }

    pub fn visible_apps<'a>(&self, apps: &'a [AppEntry]) -> Vec<&'a AppEntry> {
        self.visible(apps)
    }

    pub fn visible_tweaks<'a>(&self, tweaks: &'a [TweakEntry]) -> Vec<&'a TweakEntry> {
        self.visible(tweaks)
    }

    /// Selected entries in catalog order.
    pub fn chosen<'a, T: CatalogItem>(&self, items: &'a [T]) -> Vec<&'a T> {
        items.iter().filter(|item| self.is_selected(*item)).collect()
    }

    pub fn selected_apps<'a>(&self, apps: &'a [AppEntry]) -> Vec<&'a AppEntry> {
        self.chosen(apps)
    }

    pub fn selected_tweaks<'a>(&self, tweaks: &'a [TweakEntry]) -> Vec<&'a TweakEntry> {
        self.chosen(tweaks)
    }
}

fn toggle(set: &mut HashSet<String>, key: &str) {
    if !set.remove(key) {
        set.insert(key.to_string());
    }
}

/// Group visible entries under each known category, in the order given.
/// A tweak listed in several categories appears under each of them.
pub fn group_by_category<'a, T: CatalogItem>(
    visible: &[&'a T],
    known: &[&str],
) -> Vec<(String, Vec<&'a T>)> {
    known
        .iter()
        .map(|category| {
            let members = visible
                .iter()
                .copied()
                .filter(|item| item.in_category(category))
                .collect();
            (category.to_string(), members)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::model::TweakScripts;

    fn app(name: &str, category: &str, info: &str) -> AppEntry {
        AppEntry {
            name: name.to_string(),
            package_id: Some(format!("{name}.{name}")),
            alt_package_id: None,
            category: category.to_string(),
            description: info.to_string(),
            warning: None,
            icon_url: None,
            homepage_url: None,
        }
    }

    fn tweak(id: &str, categories: &[&str]) -> TweakEntry {
        TweakEntry {
            id: id.to_string(),
            title: id.to_uppercase(),
            description: format!("{id} description"),
            categories: categories.iter().map(|c| c.to_string()).collect(),
            recommended: false,
            reversible: true,
            scripts: TweakScripts {
                apply: format!("apply {id}"),
                unapply: Some(format!("undo {id}")),
            },
        }
    }

    #[test]
    fn toggling_twice_restores_membership() {
        let mut selection = Selection::new();
        selection.toggle_app("Foo");
        assert!(selection.selected_app_names.contains("Foo"));
        selection.toggle_app("Foo");
        assert!(!selection.selected_app_names.contains("Foo"));

        selection.toggle_tweak("t");
        selection.toggle_tweak("t");
        selection.toggle_tweak("t");
        selection.toggle_tweak("t");
        assert!(selection.selected_tweak_ids.is_empty());
    }

    #[test]
    fn select_then_deselect_category_restores_visible_entries_only() {
        let apps = vec![
            app("Firefox", "browsers", "web"),
            app("Chrome", "browsers", "web"),
            app("Discord", "communication", "chat"),
        ];
        let mut selection = Selection::new();
        selection.toggle_app("Discord");
        selection.set_search_text("fire");
        let before = selection.clone();

        let visible = selection.visible_apps(&apps);
        selection.select_all_in_category("browsers", &visible);
        assert!(selection.selected_app_names.contains("Firefox"));
        assert!(!selection.selected_app_names.contains("Chrome"));

        selection.deselect_all_in_category("browsers", &visible);
        assert_eq!(selection, before);
        assert!(selection.selected_app_names.contains("Discord"));
    }

    #[test]
    fn deselect_category_leaves_hidden_selection() {
        let apps = vec![app("Firefox", "browsers", "web"), app("Chrome", "browsers", "web")];
        let mut selection = Selection::new();
        selection.toggle_app("Chrome");
        selection.set_search_text("firefox");
        let visible = selection.visible_apps(&apps);
        selection.deselect_all_in_category("browsers", &visible);
        assert!(selection.selected_app_names.contains("Chrome"));
    }

    #[test]
    fn search_is_case_insensitive_over_name_description_and_category() {
        let apps = vec![
            app("VLC", "multimedia", "Plays everything"),
            app("Git", "development", "Version control"),
        ];
        let mut selection = Selection::new();

        selection.set_search_text("vlc");
        assert_eq!(selection.visible_apps(&apps).len(), 1);

        selection.set_search_text("VERSION");
        assert_eq!(selection.visible_apps(&apps)[0].name, "Git");

        selection.set_search_text("Multi");
        assert_eq!(selection.visible_apps(&apps)[0].name, "VLC");

        selection.set_search_text("   ");
        assert_eq!(selection.visible_apps(&apps).len(), 2);
    }

    #[test]
    fn empty_filter_matches_everything() {
        let tweaks = vec![tweak("a", &["Privacy"]), tweak("b", &["Gaming", "GPU"])];
        let mut selection = Selection::new();
        assert_eq!(selection.visible_tweaks(&tweaks).len(), 2);

        selection.toggle_category_filter(CatalogKind::Tweaks, "GPU");
        let visible = selection.visible_tweaks(&tweaks);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "b");

        selection.toggle_category_filter(CatalogKind::Tweaks, "GPU");
        assert_eq!(selection.visible_tweaks(&tweaks).len(), 2);
    }

    #[test]
    fn tweak_matches_any_active_category() {
        let tweaks = vec![tweak("a", &["Privacy"]), tweak("b", &["Gaming", "Network"])];
        let mut selection = Selection::new();
        selection.toggle_category_filter(CatalogKind::Tweaks, "Network");
        selection.toggle_category_filter(CatalogKind::Tweaks, "Privacy");
        assert_eq!(selection.visible_tweaks(&tweaks).len(), 2);
        assert!(selection.active_app_categories.is_empty());
    }

    #[test]
    fn selected_entries_follow_catalog_order() {
        let tweaks = vec![tweak("first", &["General"]), tweak("second", &["General"])];
        let mut selection = Selection::new();
        selection.toggle_tweak("second");
        selection.toggle_tweak("first");
        let ids: Vec<_> = selection
            .selected_tweaks(&tweaks)
            .iter()
            .map(|t| t.id.as_str())
            .collect();
        assert_eq!(ids, ["first", "second"]);
    }

    #[test]
    fn grouping_places_multi_category_tweaks_under_each() {
        let tweaks = vec![tweak("a", &["Gaming", "GPU"]), tweak("b", &["Gaming"])];
        let visible: Vec<&TweakEntry> = tweaks.iter().collect();
        let groups = group_by_category(&visible, &["Gaming", "GPU", "Privacy"]);
        assert_eq!(groups[0].1.len(), 2);
        assert_eq!(groups[1].1.len(), 1);
        assert!(groups[2].1.is_empty());
    }
}
