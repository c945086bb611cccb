use super::Key;

/// The active filter condition on one dimension
///
/// A range is inclusive at the low end and exclusive at the high end. A
/// degenerate range (`low >= high`, or bounds of a different kind than the
/// dimension's keys) admits no records at all; transient drag states must
/// never raise an error.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Predicate {
    /// No restriction
    #[default]
    None,
    /// Keys in `[low, high)`
    Range { low: Key, high: Key },
    /// Keys equal to the given value
    Exact(Key),
}

impl Predicate {
    /// Whether this predicate restricts the record set
    pub fn is_active(&self) -> bool {
        !matches!(self, Predicate::None)
    }

    /// Whether the given key satisfies this predicate
    pub fn admits(&self, key: &Key) -> bool {
        match self {
            Predicate::None => true,
            Predicate::Exact(value) => key == value,
            Predicate::Range { low, high } => {
                if !low.same_variant(key) || !high.same_variant(key) {
                    return false;
                }
                low <= key && key < high
            }
        }
    }

    /// Whether a range predicate can never admit anything
    pub fn is_degenerate(&self) -> bool {
        match self {
            Predicate::Range { low, high } => low >= high || !low.same_variant(high),
            _ => false,
        }
    }
}
