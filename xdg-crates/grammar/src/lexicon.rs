use std::sync::Arc;

use xdg_core::containers::HashMap;

use crate::entry::LexEntry;

/// Where the lexical entries of a language come from.
pub trait Lexicon {
    /// The entries of a surface form, in load order.
    fn entries(&self, form: &str) -> &[Arc<LexEntry>];

    /// The entry with the given name.
    fn entry(&self, name: &str) -> Option<&Arc<LexEntry>>;

    /// The entries with part of speech `pos` and root `root`, used for forms that are only known
    /// through a morphological analysis.
    fn entries_for_root(&self, pos: &str, root: &str) -> &[Arc<LexEntry>];
}

/// A [`Lexicon`] held in memory, indexed by form, name and root.
#[derive(Clone, Debug, Default)]
pub struct MapLexicon {
    forms: HashMap<String, Vec<Arc<LexEntry>>>,
    names: HashMap<String, Arc<LexEntry>>,
    roots: HashMap<(String, String), Vec<Arc<LexEntry>>>,
}

impl MapLexicon {
    pub fn new(entries: impl IntoIterator<Item = (String, LexEntry)>) -> MapLexicon {
        let mut lexicon = MapLexicon::default();
        for (form, entry) in entries {
            lexicon.insert(form, entry);
        }
        lexicon
    }

    pub fn insert(&mut self, form: String, entry: LexEntry) {
        let entry = Arc::new(entry);
        if let Some(root) = &entry.root {
            self.roots
                .entry((entry.pos.clone(), root.clone()))
                .or_default()
                .push(Arc::clone(&entry));
        }
        let _ = self.names.insert(entry.name.clone(), Arc::clone(&entry));
        self.forms.entry(form).or_default().push(entry);
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Every entry, in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<LexEntry>> + '_ {
        self.names.values()
    }
}

impl Lexicon for MapLexicon {
    fn entries(&self, form: &str) -> &[Arc<LexEntry>] {
        self.forms.get(form).map_or(&[], Vec::as_slice)
    }

    fn entry(&self, name: &str) -> Option<&Arc<LexEntry>> {
        self.names.get(name)
    }

    fn entries_for_root(&self, pos: &str, root: &str) -> &[Arc<LexEntry>] {
        self.roots
            .get(&(pos.to_owned(), root.to_owned()))
            .map_or(&[], Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::Lexicon;
    use super::MapLexicon;
    use crate::entry::LexEntry;

    fn entry(name: &str, pos: &str, root: Option<&str>) -> LexEntry {
        LexEntry {
            name: name.to_owned(),
            id: 0,
            pos: pos.to_owned(),
            root: root.map(str::to_owned),
            word: None,
            dims: BTreeMap::new(),
            crosslexes: BTreeMap::new(),
            empty_nodes: Vec::new(),
        }
    }

    #[test]
    fn entries_are_found_by_form_name_and_root() {
        let lexicon = MapLexicon::new([
            ("barks".to_owned(), entry("bark_v", "v", Some("bark"))),
            ("bark".to_owned(), entry("bark_n", "n", Some("bark"))),
            ("barks".to_owned(), entry("barks_n", "n", None)),
        ]);

        assert_eq!(lexicon.entries("barks").len(), 2);
        assert_eq!(lexicon.entries("meows").len(), 0);
        assert_eq!(lexicon.entry("bark_n").map(|e| e.pos.as_str()), Some("n"));
        assert_eq!(lexicon.entries_for_root("v", "bark")[0].name, "bark_v");
        assert_eq!(lexicon.len(), 3);
    }
}
