//! Three-state presence model.
//!
//! A decoded field is in one of three states: present with a value, present
//! as JSON `null`, or not present in the object at all. Collapsing the last
//! two into one state is exactly the ambiguity this crate exists to avoid,
//! so the distinction is carried as an explicit enum rather than a sentinel.

/// Presence of a field value: `Present(value)`, `Null`, or `Absent`.
///
/// `Null` means the wire key was present and explicitly `null`; `Absent`
/// means the key did not appear in the JSON object.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Presence<T> {
    Present(T),
    Null,
    #[default]
    Absent,
}

impl<T> Presence<T> {
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    /// True when there is no value to encode (`Null` or `Absent`).
    pub fn is_missing(&self) -> bool {
        !self.is_present()
    }

    /// Converts from `&Presence<T>` to `Presence<&T>`.
    pub fn as_ref(&self) -> Presence<&T> {
        match self {
            Self::Present(v) => Presence::Present(v),
            Self::Null => Presence::Null,
            Self::Absent => Presence::Absent,
        }
    }

    /// Maps the contained value, preserving `Null` and `Absent`.
    pub fn map<U, F: FnOnce(T) -> U>(self, f: F) -> Presence<U> {
        match self {
            Self::Present(v) => Presence::Present(f(v)),
            Self::Null => Presence::Null,
            Self::Absent => Presence::Absent,
        }
    }

    /// Collapses to an `Option`, losing the `Null` vs `Absent` distinction.
    pub fn into_option(self) -> Option<T> {
        match self {
            Self::Present(v) => Some(v),
            _ => None,
        }
    }

    pub fn unwrap_or(self, default: T) -> T {
        match self {
            Self::Present(v) => v,
            _ => default,
        }
    }
}

impl<T> From<Option<T>> for Presence<T> {
    fn from(opt: Option<T>) -> Self {
        match opt {
            Some(v) => Self::Present(v),
            None => Self::Null,
        }
    }
}

impl<T: std::fmt::Display> std::fmt::Display for Presence<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Present(v) => write!(f, "{v}"),
            Self::Null => write!(f, "null"),
            Self::Absent => write!(f, "Absent"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_is_not_null_and_not_a_value() {
        let absent: Presence<i64> = Presence::Absent;
        assert_ne!(absent, Presence::Null);
        assert_ne!(absent, Presence::Present(0));
        assert!(absent.is_absent());
        assert!(!absent.is_present());
    }

    #[test]
    fn default_is_absent() {
        let p: Presence<String> = Presence::default();
        assert!(p.is_absent());
    }

    #[test]
    fn display_absent() {
        let absent: Presence<i64> = Presence::Absent;
        assert_eq!(absent.to_string(), "Absent");
        assert_eq!(Presence::<i64>::Null.to_string(), "null");
        assert_eq!(Presence::Present(7).to_string(), "7");
    }

    #[test]
    fn into_option_collapses_null_and_absent() {
        assert_eq!(Presence::Present(1).into_option(), Some(1));
        assert_eq!(Presence::<i64>::Null.into_option(), None);
        assert_eq!(Presence::<i64>::Absent.into_option(), None);
    }

    #[test]
    fn map_preserves_state() {
        assert_eq!(Presence::Present(2).map(|v| v * 2), Presence::Present(4));
        assert_eq!(Presence::<i64>::Null.map(|v| v * 2), Presence::Null);
        assert_eq!(Presence::<i64>::Absent.map(|v| v * 2), Presence::Absent);
    }

    #[test]
    fn from_option() {
        assert_eq!(Presence::from(Some(1)), Presence::Present(1));
        assert_eq!(Presence::<i64>::from(None), Presence::Null);
    }

    #[test]
    fn is_missing_covers_null_and_absent() {
        assert!(Presence::<i64>::Null.is_missing());
        assert!(Presence::<i64>::Absent.is_missing());
        assert!(!Presence::Present(1).is_missing());
    }
}
