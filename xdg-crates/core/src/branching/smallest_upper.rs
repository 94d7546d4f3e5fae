use super::Choice;
use super::Distributor;
use crate::engine::propagation::ReadDomains;
use crate::engine::variables::VarRef;
use crate::engine::Space;

/// Distributes on the undetermined core variable with the fewest candidate values (the domain of
/// an integer variable, the upper bound of a set variable), on its smallest undecided value.
///
/// Ties are broken in favour of the variable that was made core first.
#[derive(Clone, Copy, Debug, Default)]
pub struct SmallestUpper;

fn size(space: &Space, variable: VarRef) -> usize {
    match variable {
        VarRef::Int(var) => space.domain(var).len(),
        VarRef::Set(var) => space.upper(var).len(),
    }
}

impl Distributor for SmallestUpper {
    fn choose(&mut self, space: &Space) -> Option<Choice> {
        let mut best: Option<(usize, VarRef)> = None;
        for variable in space.undetermined_core() {
            let size = size(space, variable);
            if best.is_none_or(|(best_size, _)| size < best_size) {
                best = Some((size, variable));
            }
        }
        let (_, variable) = best?;
        Choice::on_smallest_value(space, variable)
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::SmallestUpper;
    use crate::branching::Distributor;
    use crate::containers::IntSet;
    use crate::engine::Model;
    use crate::engine::Space;
    use crate::engine::SpaceOptions;
    use crate::propagators::BasicConstraint;

    #[test]
    fn the_smallest_candidate_set_wins() {
        let mut model = Model::default();
        let x = model.new_int_var("x", IntSet::range(0, 5));
        let s = model.new_set_var("s", IntSet::from([1]), IntSet::from([1, 4, 6]));
        let y = model.new_int_var("y", IntSet::from([2, 7, 9]));
        model.make_core(x);
        model.make_core(s);
        model.make_core(y);
        let space = Space::root(Rc::new(model), SpaceOptions::default());

        let choice = SmallestUpper.choose(&space).expect("variables are undetermined");
        assert_eq!(choice.variable, s.into());
        assert_eq!(choice.positive, BasicConstraint::Superset(s, IntSet::from([1, 4])));
        assert_eq!(choice.negative, BasicConstraint::Subset(s, IntSet::from([1, 6])));
    }

    #[test]
    fn determined_variables_are_skipped() {
        let mut model = Model::default();
        let x = model.new_int_var("x", IntSet::singleton(3));
        let y = model.new_int_var("y", IntSet::range(0, 9));
        model.make_core(x);
        model.make_core(y);
        let space = Space::root(Rc::new(model), SpaceOptions::default());

        let choice = SmallestUpper.choose(&space).expect("y is undetermined");
        assert_eq!(choice.variable, y.into());
    }

    #[test]
    fn nothing_to_choose_when_everything_is_determined() {
        let mut model = Model::default();
        let x = model.new_int_var("x", IntSet::singleton(3));
        model.make_core(x);
        let space = Space::root(Rc::new(model), SpaceOptions::default());

        assert_eq!(SmallestUpper.choose(&space), None);
    }
}
