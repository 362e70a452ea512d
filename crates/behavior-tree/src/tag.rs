//! Typed action and condition tags.
//!
//! Hosts declare their vocabularies as plain enums, typically deriving
//! `strum::{Display, EnumString, EnumIter}`. The core only reserves the
//! literals it interprets itself: `None` for both kinds, plus `True` and
//! `False` for conditions.

use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

/// Label of the "nothing bound" tag, shared by actions and conditions.
pub const NONE_LABEL: &str = "None";
pub const TRUE_LABEL: &str = "True";
pub const FALSE_LABEL: &str = "False";

/// A host-defined tag usable as a binding key.
pub trait Tag:
    Copy + Eq + Hash + fmt::Debug + fmt::Display + FromStr + Send + Sync + 'static
{
}

impl<T> Tag for T where
    T: Copy + Eq + Hash + fmt::Debug + fmt::Display + FromStr + Send + Sync + 'static
{
}

/// Action tag as written on an Action record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActTag<A> {
    /// Nothing to run; the action node succeeds without queueing work.
    None,
    Bound(A),
}

impl<A: Tag> ActTag<A> {
    /// Parses a serialized tag, returning `None` when the label is neither the
    /// reserved literal nor a variant of `A`.
    pub fn parse(label: &str) -> Option<Self> {
        if label == NONE_LABEL {
            return Some(ActTag::None);
        }
        A::from_str(label).ok().map(ActTag::Bound)
    }
}

impl<A: fmt::Display> fmt::Display for ActTag<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActTag::None => f.write_str(NONE_LABEL),
            ActTag::Bound(tag) => write!(f, "{}", tag),
        }
    }
}

/// Condition tag as written on a Conditional record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConditionTag<C> {
    /// No condition; the node always fails.
    None,
    /// Literal `true`, compared directly against the expected value.
    True,
    /// Literal `false`, compared directly against the expected value.
    False,
    Bound(C),
}

impl<C: Tag> ConditionTag<C> {
    /// Parses a serialized tag. Reserved literals win over host variants with
    /// the same name.
    pub fn parse(label: &str) -> Option<Self> {
        match label {
            NONE_LABEL => Some(ConditionTag::None),
            TRUE_LABEL => Some(ConditionTag::True),
            FALSE_LABEL => Some(ConditionTag::False),
            other => C::from_str(other).ok().map(ConditionTag::Bound),
        }
    }

    /// The literal value for `True`/`False`, `None` for everything else.
    pub fn literal(&self) -> Option<bool> {
        match self {
            ConditionTag::True => Some(true),
            ConditionTag::False => Some(false),
            _ => None,
        }
    }
}

impl<C: fmt::Display> fmt::Display for ConditionTag<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionTag::None => f.write_str(NONE_LABEL),
            ConditionTag::True => f.write_str(TRUE_LABEL),
            ConditionTag::False => f.write_str(FALSE_LABEL),
            ConditionTag::Bound(tag) => write!(f, "{}", tag),
        }
    }
}
