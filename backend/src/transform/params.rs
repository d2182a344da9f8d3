//! Parameter space: the Cartesian product of every parameter's values.

use crate::models::Parameter;

/// Parameters in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParameterSpace {
    parameters: Vec<Parameter>,
}

impl ParameterSpace {
    pub fn new(parameters: Vec<Parameter>) -> Self {
        Self { parameters }
    }

    pub fn names(&self) -> Vec<String> {
        self.parameters.iter().map(|p| p.name.clone()).collect()
    }

    /// Π n_i, without building the product. Saturates at `usize::MAX`.
    pub fn combination_count(&self) -> usize {
        self.parameters
            .iter()
            .try_fold(1usize, |count, p| count.checked_mul(p.values.len()))
            .unwrap_or(usize::MAX)
    }

    /// Every parameter set, the last parameter varying fastest.
    pub fn combinations(&self) -> Vec<Vec<String>> {
        self.parameters.iter().fold(vec![Vec::new()], |sets, parameter| {
            sets.iter()
                .flat_map(|prefix| {
                    parameter.values.iter().map(move |value| {
                        let mut set = prefix.clone();
                        set.push(value.clone());
                        set
                    })
                })
                .collect()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_product_order() {
        let space = ParameterSpace::new(vec![Parameter::parse("a", "1,2"), Parameter::parse("b", "x,y,z")]);
        let sets = space.combinations();
        assert_eq!(space.combination_count(), 6);
        assert_eq!(sets.len(), 6);
        assert_eq!(sets[0], vec!["1", "x"]);
        assert_eq!(sets[1], vec!["1", "y"]);
        assert_eq!(sets[3], vec!["2", "x"]);
        assert_eq!(sets[5], vec!["2", "z"]);
    }

    #[test]
    fn test_single_parameter() {
        let space = ParameterSpace::new(vec![Parameter::parse("temp", "0,1")]);
        assert_eq!(space.combinations(), vec![vec!["0"], vec!["1"]]);
        assert_eq!(space.names(), vec!["temp"]);
    }

    #[test]
    fn test_count_saturates_instead_of_overflowing() {
        // 10^20 > u64::MAX
        let space = ParameterSpace::new(
            (0..20)
                .map(|i| Parameter::parse(format!("p{}", i), "0,1,2,3,4,5,6,7,8,9"))
                .collect(),
        );
        assert_eq!(space.combination_count(), usize::MAX);
    }

    #[test]
    fn test_empty_space_has_one_set() {
        let space = ParameterSpace::default();
        assert_eq!(space.combination_count(), 1);
        assert_eq!(space.combinations(), vec![Vec::<String>::new()]);
    }

    #[test]
    fn test_single_value_without_comma() {
        let space = ParameterSpace::new(vec![Parameter::parse("seed", "42")]);
        assert_eq!(space.combinations(), vec![vec!["42"]]);
    }
}
