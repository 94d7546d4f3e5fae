use itertools::Itertools;

use super::Constraint;
use crate::basic_types::ConstraintOperationError;
use crate::containers::IntSet;
use crate::engine::propagation::PropagatorTag;
use crate::engine::variables::SetVar;
use crate::engine::Model;
use crate::propagators::IntersectionSelection;
use crate::propagators::SubsetUnion;
use crate::propagators::SupersetIntersection;
use crate::propagators::UnionSelection;

/// Creates the [`Constraint`] `main = parts[0] ∪ parts[1] ∪ ...`.
pub fn union(main: SetVar, parts: impl IntoIterator<Item = SetVar>) -> impl Constraint {
    Union {
        main,
        parts: parts.into_iter().collect(),
    }
}

/// Creates the [`Constraint`] `main = parts[0] ∩ parts[1] ∩ ...`; `parts` must not be empty.
pub fn intersection(main: SetVar, parts: impl IntoIterator<Item = SetVar>) -> impl Constraint {
    Intersection {
        main,
        parts: parts.into_iter().collect(),
    }
}

/// Creates the [`Constraint`] that `parts` are pairwise disjoint and their union is `main`.
pub fn partition(main: SetVar, parts: impl IntoIterator<Item = SetVar>) -> impl Constraint {
    Partition {
        main,
        parts: parts.into_iter().collect(),
    }
}

/// Creates the [`Constraint`] that `sets` are pairwise disjoint.
pub fn disjoint(sets: impl IntoIterator<Item = SetVar>) -> impl Constraint {
    Disjoint {
        sets: sets.into_iter().collect(),
    }
}

/// Creates the [`Constraint`] `subset ⊆ superset`.
pub fn inclusion(subset: SetVar, superset: SetVar) -> impl Constraint {
    Inclusion { subset, superset }
}

/// Creates the [`Constraint`] `a = b`.
pub fn equality(a: SetVar, b: SetVar) -> impl Constraint {
    vec![inclusion(a, b), inclusion(b, a)]
}

#[derive(Debug)]
struct Union {
    main: SetVar,
    parts: Vec<SetVar>,
}

impl Constraint for Union {
    fn post(self, model: &mut Model, tag: &PropagatorTag) -> Result<(), ConstraintOperationError> {
        let selector = model.set_constant(IntSet::range(0, self.parts.len() as u32));
        UnionSelection::new(self.main, selector, self.parts).post(model, tag)
    }
}

#[derive(Debug)]
struct Intersection {
    main: SetVar,
    parts: Vec<SetVar>,
}

impl Constraint for Intersection {
    fn post(self, model: &mut Model, tag: &PropagatorTag) -> Result<(), ConstraintOperationError> {
        let selector = model.set_constant(IntSet::range(0, self.parts.len() as u32));
        IntersectionSelection::new(self.main, selector, self.parts).post(model, tag)
    }
}

#[derive(Debug)]
struct Partition {
    main: SetVar,
    parts: Vec<SetVar>,
}

impl Constraint for Partition {
    fn post(self, model: &mut Model, tag: &PropagatorTag) -> Result<(), ConstraintOperationError> {
        disjoint(self.parts.iter().copied()).post(model, tag)?;
        union(self.main, self.parts).post(model, tag)
    }
}

#[derive(Debug)]
struct Disjoint {
    sets: Vec<SetVar>,
}

impl Constraint for Disjoint {
    fn post(self, model: &mut Model, tag: &PropagatorTag) -> Result<(), ConstraintOperationError> {
        let empty = model.set_constant(IntSet::new());
        self.sets
            .iter()
            .tuple_combinations()
            .map(|(&a, &b)| SupersetIntersection::new(empty, a, b))
            .collect_vec()
            .post(model, tag)
    }
}

#[derive(Debug)]
struct Inclusion {
    subset: SetVar,
    superset: SetVar,
}

impl Constraint for Inclusion {
    fn post(self, model: &mut Model, tag: &PropagatorTag) -> Result<(), ConstraintOperationError> {
        let empty = model.set_constant(IntSet::new());
        SubsetUnion::new(self.subset, self.superset, empty).post(model, tag)
    }
}

#[cfg(test)]
mod tests {
    use super::disjoint;
    use super::equality;
    use super::intersection;
    use super::partition;
    use super::union;
    use crate::engine::test_model::TestModel;

    #[test]
    fn union_collects_the_parts() {
        let mut model = TestModel::default();
        let main = model.new_set_variable([], 0..10);
        let a = model.set_constant([1, 2]);
        let b = model.new_set_variable([5], [5, 6]);
        model.post(union(main, [a, b]));

        let space = model.propagate();
        space.assert_lower(main, [1, 2, 5]);
        space.assert_upper(main, [1, 2, 5, 6]);
    }

    #[test]
    fn intersection_keeps_the_common_part() {
        let mut model = TestModel::default();
        let main = model.new_set_variable([], 0..10);
        let a = model.set_constant([1, 2, 3]);
        let b = model.set_constant([2, 3, 4]);
        model.post(intersection(main, [a, b]));

        let space = model.propagate();
        space.assert_lower(main, [2, 3]);
        space.assert_upper(main, [2, 3]);
    }

    #[test]
    fn partition_splits_without_overlap() {
        let mut model = TestModel::default();
        let eqdown = model.new_set_variable([], 0..4);
        let own = model.set_constant([2]);
        let down = model.new_set_variable([], 0..4);
        model.post(partition(eqdown, [own, down]));

        let space = model.propagate();
        space.assert_lower(eqdown, [2]);
        space.assert_upper(down, [0, 1, 3]);
    }

    #[test]
    fn disjoint_sets_exclude_each_others_elements() {
        let mut model = TestModel::default();
        let a = model.new_set_variable([0], 0..3);
        let b = model.new_set_variable([1], 0..3);
        let c = model.new_set_variable([], 0..3);
        model.post(disjoint([a, b, c]));

        let space = model.propagate();
        space.assert_upper(a, [0, 2]);
        space.assert_upper(b, [1, 2]);
        space.assert_upper(c, [2]);
    }

    #[test]
    fn equality_unifies_both_bounds() {
        let mut model = TestModel::default();
        let a = model.new_set_variable([1], [0, 1, 2]);
        let b = model.new_set_variable([], [1, 2, 3]);
        model.post(equality(a, b));

        let space = model.propagate();
        space.assert_lower(b, [1]);
        space.assert_upper(a, [1, 2]);
        space.assert_upper(b, [1, 2]);
    }
}
