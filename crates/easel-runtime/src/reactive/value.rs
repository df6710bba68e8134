#![forbid(unsafe_code)]

//! Value conversions used by node bindings and size queries.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};

/// A value that can be projected onto, and read back from, a UI node.
pub trait BindValue: Clone + 'static {
    /// Text written into display, label, and input nodes.
    fn to_display(&self) -> String;

    /// Whether a togglable node should carry its presence flag.
    fn is_truthy(&self) -> bool;

    /// Parse input content typed by the user. `None` leaves the store alone.
    fn parse_input(input: &str) -> Option<Self>;
}

impl BindValue for String {
    fn to_display(&self) -> String {
        self.clone()
    }

    fn is_truthy(&self) -> bool {
        !self.is_empty()
    }

    fn parse_input(input: &str) -> Option<Self> {
        Some(input.to_string())
    }
}

impl BindValue for bool {
    fn to_display(&self) -> String {
        self.to_string()
    }

    fn is_truthy(&self) -> bool {
        *self
    }

    fn parse_input(input: &str) -> Option<Self> {
        match input.trim() {
            "true" | "on" | "1" => Some(true),
            "false" | "off" | "0" | "" => Some(false),
            _ => None,
        }
    }
}

macro_rules! impl_bind_value_int {
    ($($t:ty),*) => {$(
        impl BindValue for $t {
            fn to_display(&self) -> String {
                self.to_string()
            }

            fn is_truthy(&self) -> bool {
                *self != 0
            }

            fn parse_input(input: &str) -> Option<Self> {
                input.trim().parse().ok()
            }
        }
    )*};
}

impl_bind_value_int!(i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);

macro_rules! impl_bind_value_float {
    ($($t:ty),*) => {$(
        impl BindValue for $t {
            fn to_display(&self) -> String {
                self.to_string()
            }

            fn is_truthy(&self) -> bool {
                *self != 0.0 && !self.is_nan()
            }

            fn parse_input(input: &str) -> Option<Self> {
                input.trim().parse().ok()
            }
        }
    )*};
}

impl_bind_value_float!(f32, f64);

impl<T: BindValue> BindValue for Option<T> {
    fn to_display(&self) -> String {
        self.as_ref().map(BindValue::to_display).unwrap_or_default()
    }

    fn is_truthy(&self) -> bool {
        self.as_ref().is_some_and(BindValue::is_truthy)
    }

    fn parse_input(input: &str) -> Option<Self> {
        if input.is_empty() {
            Some(None)
        } else {
            T::parse_input(input).map(Some)
        }
    }
}

/// A value with a natural element count.
pub trait ValueLen {
    fn value_len(&self) -> usize;
}

impl ValueLen for String {
    fn value_len(&self) -> usize {
        self.chars().count()
    }
}

impl ValueLen for &'static str {
    fn value_len(&self) -> usize {
        self.chars().count()
    }
}

impl<T> ValueLen for Vec<T> {
    fn value_len(&self) -> usize {
        self.len()
    }
}

impl<T> ValueLen for VecDeque<T> {
    fn value_len(&self) -> usize {
        self.len()
    }
}

impl<K, V, S> ValueLen for HashMap<K, V, S> {
    fn value_len(&self) -> usize {
        self.len()
    }
}

impl<T, S> ValueLen for HashSet<T, S> {
    fn value_len(&self) -> usize {
        self.len()
    }
}

impl<K, V> ValueLen for BTreeMap<K, V> {
    fn value_len(&self) -> usize {
        self.len()
    }
}

impl<T> ValueLen for BTreeSet<T> {
    fn value_len(&self) -> usize {
        self.len()
    }
}

impl<T: ValueLen> ValueLen for Option<T> {
    fn value_len(&self) -> usize {
        self.as_ref().map_or(0, ValueLen::value_len)
    }
}
