use core::fmt;

/// Raw value of an abstained vote in a label matrix.
pub const ABSTAIN: i8 = -1;

/// Vote of a labeling function for a binary relation.
#[derive(Debug, Clone, Copy, Hash, PartialEq, Eq)]
#[repr(i8)]
pub enum Label {
    /// Not enough evidence to vote.
    Abstain = -1,

    /// The two mentions are not in the relation.
    Negative = 0,

    /// The two mentions are in the relation.
    Positive = 1,
}

impl Label {
    /// Returns the value stored in a label matrix.
    #[inline(always)]
    pub const fn as_i8(self) -> i8 {
        self as i8
    }

    /// Converts a raw matrix value to a label.
    ///
    /// # Arguments
    ///
    /// * `value` - A raw value.
    ///
    /// # Returns
    ///
    /// `None` if `value` is not one of `-1`, `0`, `1`.
    pub const fn from_i8(value: i8) -> Option<Self> {
        match value {
            -1 => Some(Self::Abstain),
            0 => Some(Self::Negative),
            1 => Some(Self::Positive),
            _ => None,
        }
    }

    pub const fn is_abstain(self) -> bool {
        matches!(self, Self::Abstain)
    }
}

impl From<Label> for i8 {
    fn from(label: Label) -> Self {
        label.as_i8()
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Abstain => write!(f, "ABSTAIN"),
            Self::Negative => write!(f, "NEGATIVE"),
            Self::Positive => write!(f, "POSITIVE"),
        }
    }
}
