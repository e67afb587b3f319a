use serde::{Deserialize, Serialize};

/// What a write does when its index expression reaches outside the array.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutOfRangeWrites {
    /// Return [`IndexError::IndexOutOfRange`].
    ///
    /// [`IndexError::IndexOutOfRange`]: super::IndexError::IndexOutOfRange
    #[default]
    Error,
    /// Leave the array unchanged and return `Ok`.
    Ignore,
}

/// Per-array indexing behaviour.
///
/// ```
/// use dimarray::{IndexOptions, OutOfRangeWrites};
/// let options: IndexOptions = serde_json::from_str(r#"{"out_of_range_writes": "ignore"}"#).unwrap();
/// assert_eq!(options.out_of_range_writes, OutOfRangeWrites::Ignore);
/// assert_eq!(serde_json::from_str::<IndexOptions>("{}").unwrap(), IndexOptions::default());
/// ```
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexOptions {
    pub out_of_range_writes: OutOfRangeWrites,
}

impl IndexOptions {
    /// Options that silently skip out-of-range writes.
    pub fn lenient() -> Self { Self {out_of_range_writes: OutOfRangeWrites::Ignore} }
}
