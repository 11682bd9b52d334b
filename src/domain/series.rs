//! Named numeric series with a timestamp index and result metadata.

use crate::domain::indicator::Category;
use chrono::NaiveDateTime;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    pub name: String,
    pub index: Vec<NaiveDateTime>,
    pub values: Vec<f64>,
    pub category: Option<Category>,
    pub alias: Option<String>,
    pub elapsed: Option<Duration>,
}

impl Series {
    pub fn new(name: impl Into<String>, index: Vec<NaiveDateTime>, values: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            index,
            values,
            category: None,
            alias: None,
            elapsed: None,
        }
    }

    /// A new series sharing this series' index.
    pub fn derive(&self, name: impl Into<String>, values: Vec<f64>) -> Self {
        Self::new(name, self.index.clone(), values)
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.category = Some(category);
        self
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Shift values by `offset` rows, keeping the index. Positive offsets move
    /// values later in time; vacated slots become NaN.
    pub fn shift(mut self, offset: i64) -> Self {
        let n = self.values.len();
        if offset == 0 || n == 0 {
            return self;
        }
        let k = offset.unsigned_abs() as usize;
        let mut shifted = vec![f64::NAN; n];
        if k < n {
            if offset > 0 {
                shifted[k..].copy_from_slice(&self.values[..n - k]);
            } else {
                shifted[..n - k].copy_from_slice(&self.values[k..]);
            }
        }
        self.values = shifted;
        self
    }

    pub fn fill_nan(&mut self, value: f64) {
        for v in self.values.iter_mut().filter(|v| v.is_nan()) {
            *v = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn sample(values: Vec<f64>) -> Series {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let index = (0..values.len())
            .map(|i| start + chrono::Duration::days(i as i64))
            .collect();
        Series::new("close", index, values)
    }

    #[test]
    fn shift_forward_fills_head_with_nan() {
        let s = sample(vec![1.0, 2.0, 3.0]).shift(1);
        assert!(s.values[0].is_nan());
        assert_eq!(&s.values[1..], &[1.0, 2.0]);
    }

    #[test]
    fn shift_backward_fills_tail_with_nan() {
        let s = sample(vec![1.0, 2.0, 3.0]).shift(-2);
        assert_eq!(s.values[0], 3.0);
        assert!(s.values[1].is_nan());
        assert!(s.values[2].is_nan());
    }

    #[test]
    fn shift_past_length_is_all_nan() {
        let s = sample(vec![1.0, 2.0]).shift(5);
        assert!(s.values.iter().all(|v| v.is_nan()));
        assert_eq!(s.index.len(), 2);
    }

    #[test]
    fn fill_nan_replaces_only_nan() {
        let mut s = sample(vec![1.0, f64::NAN, 3.0]);
        s.fill_nan(0.0);
        assert_eq!(s.values, vec![1.0, 0.0, 3.0]);
    }

    #[test]
    fn derive_keeps_index_and_drops_metadata() {
        let mut base = sample(vec![1.0, 2.0]).with_category(Category::Overlap);
        base.alias = Some("x".into());
        let derived = base.derive("out", vec![5.0, 6.0]);
        assert_eq!(derived.index, base.index);
        assert_eq!(derived.name, "out");
        assert!(derived.category.is_none());
        assert!(derived.alias.is_none());
    }
}
