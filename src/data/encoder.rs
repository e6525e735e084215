use crate::error::{NnError, Result};

/// Indicator vector of length `classes` with `1.0` at the 1-based `class`.
pub fn one_hot(class: usize, classes: usize) -> Result<Vec<f64>> {
    if class == 0 || class > classes {
        return Err(NnError::InvalidClass { class, classes });
    }
    let mut v = vec![0.0; classes];
    v[class - 1] = 1.0;
    Ok(v)
}

/// Expands per-category counts into class labels: `[2, 1]` → `[1, 1, 2]`.
pub fn class_indices(counts: &[usize]) -> Vec<usize> {
    counts.iter()
        .enumerate()
        .flat_map(|(i, &n)| std::iter::repeat(i + 1).take(n))
        .collect()
}

/// Index of the maximum element (0-based). Ties resolve to the first.
pub fn argmax(v: &[f64]) -> usize {
    v.iter()
        .enumerate()
        .fold(None, |best: Option<(usize, f64)>, (i, &x)| match best {
            Some((_, b)) if b >= x => best,
            _ => Some((i, x)),
        })
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// 1-based class of the largest entry; inverse of [`one_hot`].
pub fn decode(v: &[f64]) -> usize {
    argmax(v) + 1
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn class_indices_follow_category_order() {
        assert_eq!(class_indices(&[3, 2, 1]), vec![1, 1, 1, 2, 2, 3]);
        assert_eq!(class_indices(&[0, 2]), vec![2, 2]);
        assert!(class_indices(&[]).is_empty());
    }

    #[test]
    fn argmax_prefers_first_maximum() {
        assert_eq!(argmax(&[0.2, 0.5, 0.5]), 1);
        assert_eq!(argmax(&[-1.0]), 0);
        assert_eq!(decode(&[0.1, 0.1, 0.8]), 3);
    }

    #[test]
    fn out_of_range_classes_are_rejected() {
        assert!(matches!(one_hot(0, 3), Err(NnError::InvalidClass { class: 0, classes: 3 })));
        assert!(matches!(one_hot(4, 3), Err(NnError::InvalidClass { class: 4, classes: 3 })));
    }

    proptest! {
        #[test]
        fn one_hot_has_single_active_entry(classes in 1usize..12, seed in 0usize..1000) {
            let class = seed % classes + 1;
            let v = one_hot(class, classes).unwrap();
            prop_assert_eq!(v.len(), classes);
            prop_assert_eq!(v.iter().sum::<f64>(), 1.0);
            prop_assert_eq!(v.iter().filter(|&&x| x != 0.0).count(), 1);
            prop_assert_eq!(v[class - 1], 1.0);
            prop_assert_eq!(decode(&v), class);
        }
    }
}
