use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One income band of a progressive tax schedule.
///
/// `min` is exclusive and `max` inclusive, so a slab table where each `min`
/// equals the previous `max` covers every income exactly once. `max: None`
/// marks the unbounded top slab.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TaxSlab {
    pub min: f64,
    pub max: Option<f64>,
    pub rate_percent: f64,
}

impl TaxSlab {
    pub const fn new(
        min: f64,
        max: f64,
        rate_percent: f64,
    ) -> Self {
        Self {
            min,
            max: Some(max),
            rate_percent,
        }
    }

    pub const fn unbounded(
        min: f64,
        rate_percent: f64,
    ) -> Self {
        Self {
            min,
            max: None,
            rate_percent,
        }
    }
}

/// Errors reported when a list of slabs does not form a valid schedule.
#[derive(Debug, Error, PartialEq)]
pub enum SlabTableError {
    #[error("slab table is empty")]
    Empty,

    #[error("first slab must start at 0, got {0}")]
    FirstMinNotZero(f64),

    #[error("slab {index} has a non-finite bound")]
    NonFiniteBound { index: usize },

    #[error("slab {index} has max {max} which is not above its min {min}")]
    EmptyRange { index: usize, min: f64, max: f64 },

    #[error("slab {index} starts at {min} but the previous slab ends at {previous_max}")]
    NotContiguous {
        index: usize,
        min: f64,
        previous_max: f64,
    },

    #[error("slab {index} is unbounded but is not the last slab")]
    UnboundedNotLast { index: usize },

    #[error("slab {index} has rate {rate}%, expected a value between 0 and 100")]
    InvalidRate { index: usize, rate: f64 },
}

/// A validated progressive schedule: non-empty, starting at zero, contiguous,
/// ascending, with at most the last slab unbounded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<TaxSlab>", into = "Vec<TaxSlab>")]
pub struct SlabTable {
    slabs: Vec<TaxSlab>,
}

impl SlabTable {
    /// Validates `slabs` and wraps them.
    ///
    /// # Errors
    ///
    /// Returns the first [`SlabTableError`] found, scanning in order.
    pub fn new(slabs: Vec<TaxSlab>) -> Result<Self, SlabTableError> {
        let first = slabs.first().ok_or(SlabTableError::Empty)?;
        if first.min != 0.0 {
            return Err(SlabTableError::FirstMinNotZero(first.min));
        }

        let last_index = slabs.len() - 1;
        let mut previous_max: Option<f64> = None;
        for (index, slab) in slabs.iter().enumerate() {
            if !slab.min.is_finite() || slab.max.is_some_and(|max| !max.is_finite()) {
                return Err(SlabTableError::NonFiniteBound { index });
            }
            if !slab.rate_percent.is_finite() || !(0.0..=100.0).contains(&slab.rate_percent) {
                return Err(SlabTableError::InvalidRate {
                    index,
                    rate: slab.rate_percent,
                });
            }
            if let Some(previous_max) = previous_max {
                if slab.min != previous_max {
                    return Err(SlabTableError::NotContiguous {
                        index,
                        min: slab.min,
                        previous_max,
                    });
                }
            }
            match slab.max {
                Some(max) if max <= slab.min => {
                    return Err(SlabTableError::EmptyRange {
                        index,
                        min: slab.min,
                        max,
                    });
                }
                Some(max) => previous_max = Some(max),
                None if index != last_index => {
                    return Err(SlabTableError::UnboundedNotLast { index });
                }
                None => {}
            }
        }

        Ok(Self { slabs })
    }

    /// Wraps slabs that are known to be valid (built-in regime tables).
    pub(crate) fn from_trusted(slabs: Vec<TaxSlab>) -> Self {
        debug_assert!(Self::new(slabs.clone()).is_ok());
        Self { slabs }
    }

    pub fn slabs(&self) -> &[TaxSlab] {
        &self.slabs
    }

    /// Whether the top slab has no upper bound.
    pub fn is_open_ended(&self) -> bool {
        self.slabs.last().is_some_and(|slab| slab.max.is_none())
    }
}

impl TryFrom<Vec<TaxSlab>> for SlabTable {
    type Error = SlabTableError;

    fn try_from(slabs: Vec<TaxSlab>) -> Result<Self, Self::Error> {
        Self::new(slabs)
    }
}

impl From<SlabTable> for Vec<TaxSlab> {
    fn from(table: SlabTable) -> Self {
        table.slabs
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn valid_slabs() -> Vec<TaxSlab> {
        vec![
            TaxSlab::new(0.0, 300000.0, 0.0),
            TaxSlab::new(300000.0, 600000.0, 5.0),
            TaxSlab::unbounded(600000.0, 10.0),
        ]
    }

    #[test]
    fn accepts_contiguous_schedule() {
        let table = SlabTable::new(valid_slabs()).unwrap();

        assert_eq!(table.slabs().len(), 3);
        assert!(table.is_open_ended());
    }

    #[test]
    fn accepts_bounded_top_slab() {
        let table = SlabTable::new(vec![TaxSlab::new(0.0, 1000.0, 10.0)]).unwrap();

        assert!(!table.is_open_ended());
    }

    #[test]
    fn rejects_empty_table() {
        assert_eq!(SlabTable::new(vec![]), Err(SlabTableError::Empty));
    }

    #[test]
    fn rejects_first_slab_not_starting_at_zero() {
        let result = SlabTable::new(vec![TaxSlab::unbounded(100.0, 5.0)]);

        assert_eq!(result, Err(SlabTableError::FirstMinNotZero(100.0)));
    }

    #[test]
    fn rejects_gap_between_slabs() {
        let mut slabs = valid_slabs();
        slabs[1].min = 350000.0;

        let result = SlabTable::new(slabs);

        assert_eq!(
            result,
            Err(SlabTableError::NotContiguous {
                index: 1,
                min: 350000.0,
                previous_max: 300000.0,
            })
        );
    }

    #[test]
    fn rejects_unsorted_slabs() {
        let slabs = vec![
            TaxSlab::new(0.0, 300000.0, 0.0),
            TaxSlab::unbounded(600000.0, 10.0),
            TaxSlab::new(300000.0, 600000.0, 5.0),
        ];

        let result = SlabTable::new(slabs);

        assert_eq!(
            result,
            Err(SlabTableError::NotContiguous {
                index: 1,
                min: 600000.0,
                previous_max: 300000.0,
            })
        );
    }

    #[test]
    fn rejects_unbounded_slab_before_the_end() {
        let slabs = vec![
            TaxSlab::unbounded(0.0, 0.0),
            TaxSlab::unbounded(300000.0, 5.0),
        ];

        assert_eq!(
            SlabTable::new(slabs),
            Err(SlabTableError::UnboundedNotLast { index: 0 })
        );
    }

    #[test]
    fn rejects_inverted_range() {
        let slabs = vec![TaxSlab::new(0.0, 0.0, 5.0)];

        assert_eq!(
            SlabTable::new(slabs),
            Err(SlabTableError::EmptyRange {
                index: 0,
                min: 0.0,
                max: 0.0,
            })
        );
    }

    #[test]
    fn rejects_rate_above_hundred_percent() {
        let slabs = vec![TaxSlab::unbounded(0.0, 120.0)];

        assert_eq!(
            SlabTable::new(slabs),
            Err(SlabTableError::InvalidRate {
                index: 0,
                rate: 120.0,
            })
        );
    }

    #[test]
    fn rejects_infinite_bound() {
        let slabs = vec![TaxSlab::new(0.0, f64::INFINITY, 5.0)];

        assert_eq!(
            SlabTable::new(slabs),
            Err(SlabTableError::NonFiniteBound { index: 0 })
        );
    }
}
