use std::fmt::Display;

use itertools::Itertools;

/// The value of an agreement feature: a tuple of small integers, e.g. person, number and gender.
pub type FeatureValue = Vec<u8>;

/// The position of a feature within its language.
pub type FeatureId = u32;

/// An agreement feature together with its admissible values. Values are referred to by their
/// index in [`Feature::values`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feature {
    name: String,
    values: Vec<FeatureValue>,
}

impl Feature {
    pub fn new(name: impl Into<String>, values: Vec<FeatureValue>) -> Feature {
        Feature {
            name: name.into(),
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[FeatureValue] {
        &self.values
    }

    pub fn num_values(&self) -> u32 {
        self.values.len() as u32
    }

    pub fn code(&self, value: &[u8]) -> Option<u32> {
        self.values
            .iter()
            .position(|candidate| candidate.as_slice() == value)
            .map(|index| index as u32)
    }

    pub fn value(&self, code: u32) -> Option<&FeatureValue> {
        self.values.get(code as usize)
    }
}

/// Displays a feature value as `(0,1,2)`.
#[derive(Clone, Copy, Debug)]
pub struct DisplayValue<'a>(pub &'a [u8]);

impl Display for DisplayValue<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({})", self.0.iter().join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::DisplayValue;
    use super::Feature;

    #[test]
    fn values_are_coded_by_position() {
        let feature = Feature::new("sbj", vec![vec![0, 0, 0], vec![0, 0, 1], vec![2, 1, 0]]);
        assert_eq!(feature.code(&[0, 0, 1]), Some(1));
        assert_eq!(feature.code(&[1, 1, 1]), None);
        assert_eq!(feature.value(2), Some(&vec![2, 1, 0]));
        assert_eq!(DisplayValue(&[2, 1, 0]).to_string(), "(2,1,0)");
    }
}
