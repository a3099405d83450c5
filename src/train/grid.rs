//! Parameter-grid expansion for exhaustive search

use crate::model::{ParamGrid, ParamMap, ParamValue};

/// Generate every parameter combination in the grid
///
/// The Cartesian product is enumerated in a deterministic order: parameter
/// names ascend lexicographically and the first name varies slowest. An
/// empty grid yields a single empty combination, so a search over it still
/// evaluates the estimator's defaults once.
pub fn combinations(grid: &ParamGrid) -> Vec<ParamMap> {
    let entries: Vec<(&String, &Vec<ParamValue>)> = grid.iter().collect();
    cartesian_product(&entries)
}

fn cartesian_product(entries: &[(&String, &Vec<ParamValue>)]) -> Vec<ParamMap> {
    let Some(((name, values), rest)) = entries.split_first() else {
        return vec![ParamMap::new()];
    };
    let rest_combos = cartesian_product(rest);

    values
        .iter()
        .flat_map(|value| {
            rest_combos.iter().map(move |combo| {
                let mut next = combo.clone();
                next.insert((*name).clone(), value.clone());
                next
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(entries: &[(&str, Vec<ParamValue>)]) -> ParamGrid {
        entries
            .iter()
            .map(|(name, values)| (name.to_string(), values.clone()))
            .collect()
    }

    #[test]
    fn test_empty_grid_yields_one_empty_combination() {
        let combos = combinations(&ParamGrid::new());
        assert_eq!(combos.len(), 1);
        assert!(combos[0].is_empty());
    }

    #[test]
    fn test_single_param_grid() {
        let g = grid(&[(
            "alpha",
            vec![ParamValue::Float(0.1), ParamValue::Float(1.0)],
        )]);
        let combos = combinations(&g);
        assert_eq!(combos.len(), 2);
        assert_eq!(combos[0].get("alpha"), Some(&ParamValue::Float(0.1)));
        assert_eq!(combos[1].get("alpha"), Some(&ParamValue::Float(1.0)));
    }

    #[test]
    fn test_combination_count_is_product_of_list_lengths() {
        let g = grid(&[
            (
                "alpha",
                vec![
                    ParamValue::Float(0.1),
                    ParamValue::Float(1.0),
                    ParamValue::Float(10.0),
                ],
            ),
            (
                "fit_intercept",
                vec![ParamValue::Bool(true), ParamValue::Bool(false)],
            ),
        ]);
        let combos = combinations(&g);
        assert_eq!(combos.len(), 6);
        // Every combination carries every parameter
        assert!(combos
            .iter()
            .all(|c| c.contains_key("alpha") && c.contains_key("fit_intercept")));
    }

    #[test]
    fn test_enumeration_order_is_deterministic() {
        let g = grid(&[
            ("a", vec![ParamValue::Int(1), ParamValue::Int(2)]),
            ("b", vec![ParamValue::Int(10), ParamValue::Int(20)]),
        ]);
        let first = combinations(&g);
        let second = combinations(&g);
        assert_eq!(first, second);
        // "a" ascends lexicographically first, so it varies slowest
        assert_eq!(first[0].get("a"), Some(&ParamValue::Int(1)));
        assert_eq!(first[0].get("b"), Some(&ParamValue::Int(10)));
        assert_eq!(first[1].get("b"), Some(&ParamValue::Int(20)));
        assert_eq!(first[2].get("a"), Some(&ParamValue::Int(2)));
    }
}
