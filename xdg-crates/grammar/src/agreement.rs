use xdg_core::containers::HashMap;
use xdg_core::containers::IntSet;

use crate::feature::FeatureId;

/// A feature of one language, as `(language, feature)`.
pub type QualifiedFeature = (String, FeatureId);

/// The agreement maps of a grammar, stored in both directions.
///
/// A map from feature `f` of language `a` to feature `g` of language `b` gives, for every value
/// code of `f`, the codes of `g` it is compatible with.
#[derive(Clone, Debug, Default)]
pub struct AgreementMaps {
    maps: HashMap<(QualifiedFeature, QualifiedFeature), Vec<IntSet>>,
}

impl AgreementMaps {
    /// Add the map `source -> target` given by `forward`, together with its reverse over
    /// `num_target_values` target values.
    pub(crate) fn insert(
        &mut self,
        source: QualifiedFeature,
        target: QualifiedFeature,
        forward: Vec<IntSet>,
        num_target_values: u32,
    ) {
        let mut backward = vec![IntSet::new(); num_target_values as usize];
        for (source_value, targets) in forward.iter().enumerate() {
            for target_value in targets {
                let _ = backward[target_value as usize].insert(source_value as u32);
            }
        }
        let _ = self
            .maps
            .insert((target.clone(), source.clone()), backward);
        let _ = self.maps.insert((source, target), forward);
    }

    /// The map from `source` to `target`, if the grammar defines one in either direction.
    pub fn get(
        &self,
        source: (&str, FeatureId),
        target: (&str, FeatureId),
    ) -> Option<&[IntSet]> {
        let key = (
            (source.0.to_owned(), source.1),
            (target.0.to_owned(), target.1),
        );
        self.maps.get(&key).map(Vec::as_slice)
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use xdg_core::containers::IntSet;

    use super::AgreementMaps;

    #[test]
    fn maps_are_available_in_both_directions() {
        let mut maps = AgreementMaps::default();
        maps.insert(
            ("grn".to_owned(), 0),
            ("que".to_owned(), 2),
            vec![IntSet::from([0, 1]), IntSet::from([1])],
            3,
        );

        assert_eq!(
            maps.get(("grn", 0), ("que", 2)),
            Some(&[IntSet::from([0, 1]), IntSet::from([1])][..])
        );
        assert_eq!(
            maps.get(("que", 2), ("grn", 0)),
            Some(&[IntSet::from([0]), IntSet::from([0, 1]), IntSet::new()][..])
        );
        assert_eq!(maps.get(("grn", 1), ("que", 2)), None);
    }
}
