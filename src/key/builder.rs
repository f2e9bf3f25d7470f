//! Cache key builder.

use std::fmt::{self, Display};

use super::{KeyPart, KeySource};
use crate::cache::CacheKey;

/// Separator placed between key parts.
pub const KEY_SEPARATOR: &str = ".";

/// Builds a cache key from an ordered sequence of values.
///
/// Every value maps to at least one [`KeyPart`]; building never fails.
///
/// ```
/// use memocache::CacheKeyBuilder;
///
/// let key = CacheKeyBuilder::make(&[&"report", &2024])
///     .append(&[&vec![1, 2], &None::<u8>])
///     .build();
/// assert_eq!(key, "report.2024.1.2.null");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheKeyBuilder {
    parts: Vec<KeyPart>,
}

impl CacheKeyBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a builder seeded with `parts`.
    pub fn make(parts: &[&dyn KeySource]) -> Self {
        let mut builder = Self::new();
        builder.append(parts);
        builder
    }

    /// Append each value in order.
    pub fn append(&mut self, parts: &[&dyn KeySource]) -> &mut Self {
        for part in parts {
            part.append_to(self);
        }
        self
    }

    /// Append a single value.
    pub fn append_one<T: KeySource + ?Sized>(&mut self, value: &T) -> &mut Self {
        value.append_to(self);
        self
    }

    /// Push a raw part.
    pub fn push_part(&mut self, part: KeyPart) -> &mut Self {
        self.parts.push(part);
        self
    }

    /// Push the display string of `value`.
    pub fn push_display<T: Display + ?Sized>(&mut self, value: &T) -> &mut Self {
        self.push_part(KeyPart::Value(value.to_string()))
    }

    /// Push a type name in place of a value.
    ///
    /// Values without their own string form are keyed by kind only. This
    /// never inspects the value, so a `KeySource` impl that builds keys of
    /// its own cannot recurse through here.
    pub fn push_type_tag(&mut self, name: &str) -> &mut Self {
        self.push_part(KeyPart::TypeTag(name.to_string()))
    }

    /// Parts collected so far.
    pub fn parts(&self) -> &[KeyPart] {
        &self.parts
    }

    /// Join all parts with [`KEY_SEPARATOR`].
    pub fn build(&self) -> CacheKey {
        self.parts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(KEY_SEPARATOR)
    }
}

impl Display for CacheKeyBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Undefined;
    use chrono::{FixedOffset, NaiveDate, TimeZone, Utc};
    use std::time::{Duration, UNIX_EPOCH};

    struct Widget {
        #[allow(dead_code)]
        id: u32,
    }

    impl KeySource for Widget {}

    struct Money(u64);

    impl Display for Money {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}USD", self.0)
        }
    }

    crate::display_key_source!(Money);

    #[test]
    fn test_widget_example() {
        let widget = Widget { id: 7 };
        let key = CacheKeyBuilder::make(&[&"tok", &widget])
            .append(&[&5, &"x"])
            .build();
        assert_eq!(key, "tok.Widget.5.x");
    }

    #[test]
    fn test_deterministic() {
        let build = || {
            CacheKeyBuilder::make(&[&"a", &vec![1.5, 2.0], &Some(true)])
                .append(&[&'c', &Money(4)])
                .build()
        };
        let first = build();
        assert_eq!(first, build());
        assert_eq!(first, "a.1.5.2.true.c.4USD");
    }

    #[test]
    fn test_flattening() {
        let nested = CacheKeyBuilder::make(&[&(1, vec![2, 3])]).build();
        let flat = CacheKeyBuilder::make(&[&vec![1, 2, 3]]).build();
        assert_eq!(nested, flat);

        let deep = CacheKeyBuilder::make(&[&vec![vec![vec![1]], vec![vec![2, 3]]]]).build();
        assert_eq!(deep, "1.2.3");
    }

    #[test]
    fn test_null_and_undefined() {
        assert_eq!(CacheKeyBuilder::make(&[&None::<i32>]).build(), "null");
        assert_eq!(CacheKeyBuilder::make(&[&Undefined]).build(), "undefined");
        assert_eq!(CacheKeyBuilder::make(&[&()]).build(), "undefined");

        let sentinels = CacheKeyBuilder::make(&[&None::<i32>, &Undefined]);
        assert_eq!(sentinels.parts(), &[KeyPart::Null, KeyPart::Undefined]);

        // Sentinels are not type-tagged: a literal string renders the same.
        let literal = CacheKeyBuilder::make(&[&"null", &"undefined"]);
        assert_ne!(sentinels.parts(), literal.parts());
        assert_eq!(sentinels.build(), literal.build());
    }

    #[test]
    fn test_equal_instants_collide() {
        let utc = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
        let offset = FixedOffset::east_opt(3600)
            .unwrap()
            .with_ymd_and_hms(2024, 3, 1, 13, 0, 0)
            .unwrap();

        let a = CacheKeyBuilder::make(&[&utc]).build();
        let b = CacheKeyBuilder::make(&[&offset]).build();
        assert_eq!(a, b);
        assert_eq!(a, utc.timestamp_millis().to_string());
    }

    #[test]
    fn test_equal_naive_instants_collide() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        let naive = day.and_hms_opt(12, 0, 0).unwrap();
        let same = day.and_hms_milli_opt(12, 0, 0, 0).unwrap();
        let utc = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        let a = CacheKeyBuilder::make(&[&naive]).build();
        let b = CacheKeyBuilder::make(&[&same]).build();
        assert_eq!(a, b);
        assert_eq!(a, CacheKeyBuilder::make(&[&utc]).build());
    }

    #[test]
    fn test_equal_system_times_collide() {
        let millis = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap().timestamp_millis();
        let a = UNIX_EPOCH + Duration::from_millis(millis as u64);
        let b = UNIX_EPOCH + Duration::from_secs(millis as u64 / 1000);

        let key = CacheKeyBuilder::make(&[&a]).build();
        assert_eq!(key, CacheKeyBuilder::make(&[&b]).build());
        assert_eq!(key, millis.to_string());
    }

    #[test]
    fn test_same_type_collides() {
        let a = CacheKeyBuilder::make(&[&Widget { id: 1 }]).build();
        let b = CacheKeyBuilder::make(&[&Widget { id: 2 }]).build();
        assert_eq!(a, b);
        assert_eq!(a, "Widget");
    }

    #[test]
    fn test_chained_append() {
        let mut builder = CacheKeyBuilder::new();
        builder.append_one("a").append_one(&[1u8, 2]).append(&[&Money(1)]);
        assert_eq!(builder.parts().len(), 4);
        assert_eq!(builder.to_string(), "a.1.2.1USD");
    }

    #[test]
    fn test_empty_builder() {
        assert_eq!(CacheKeyBuilder::new().build(), "");
    }
}
