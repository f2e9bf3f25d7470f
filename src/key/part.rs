//! Key parts and the [`KeySource`] trait.

use std::collections::VecDeque;
use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::{DateTime, NaiveDateTime, TimeZone};

use super::CacheKeyBuilder;

/// One serialized fragment of a cache key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KeyPart {
    /// An explicit null value.
    Null,
    /// An absent value.
    Undefined,
    /// A point in time, as milliseconds since the Unix epoch.
    Millis(i64),
    /// The string form of a value with its own string conversion.
    Value(String),
    /// The short type name of a value without a string conversion.
    TypeTag(String),
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyPart::Null => write!(f, "null"),
            KeyPart::Undefined => write!(f, "undefined"),
            KeyPart::Millis(ms) => write!(f, "{}", ms),
            KeyPart::Value(s) => write!(f, "{}", s),
            KeyPart::TypeTag(name) => write!(f, "{}", name),
        }
    }
}

/// Marker for an absent value. Appends the `undefined` sentinel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Undefined;

/// A value that can contribute to a cache key.
///
/// The default implementation appends the short name of the implementing
/// type, so every instance of a type maps to the same part:
///
/// ```
/// use memocache::{CacheKeyBuilder, KeySource};
///
/// struct Widget {
///     _id: u32,
/// }
///
/// impl KeySource for Widget {}
///
/// let key = CacheKeyBuilder::make(&[&"tok", &Widget { _id: 1 }])
///     .append(&[&5, &"x"])
///     .build();
/// assert_eq!(key, "tok.Widget.5.x");
/// ```
///
/// Types with a meaningful string form should override [`append_to`]
/// and call [`CacheKeyBuilder::push_display`], or use
/// [`display_key_source!`](crate::display_key_source).
///
/// [`append_to`]: KeySource::append_to
pub trait KeySource {
    /// Append this value's parts to `builder`.
    fn append_to(&self, builder: &mut CacheKeyBuilder) {
        builder.push_type_tag(short_type_name(std::any::type_name::<Self>()));
    }
}

/// Strip the module path and generic parameters from a type name.
///
/// `my_app::ui::Widget<alloc::string::String>` becomes `Widget`.
pub fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Implement [`KeySource`] through the type's [`Display`](fmt::Display) impl.
///
/// ```
/// use std::fmt;
/// use memocache::{display_key_source, CacheKeyBuilder};
///
/// struct Money(u64);
///
/// impl fmt::Display for Money {
///     fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
///         write!(f, "${}", self.0)
///     }
/// }
///
/// display_key_source!(Money);
///
/// assert_eq!(CacheKeyBuilder::make(&[&Money(3)]).build(), "$3");
/// ```
#[macro_export]
macro_rules! display_key_source {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::KeySource for $ty {
                fn append_to(&self, builder: &mut $crate::CacheKeyBuilder) {
                    builder.push_display(self);
                }
            }
        )+
    };
}

display_key_source!(
    i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize, f32, f64, bool, char, str,
    String
);

impl KeySource for KeyPart {
    fn append_to(&self, builder: &mut CacheKeyBuilder) {
        builder.push_part(self.clone());
    }
}

impl KeySource for Undefined {
    fn append_to(&self, builder: &mut CacheKeyBuilder) {
        builder.push_part(KeyPart::Undefined);
    }
}

// A free function has no receiver.
impl KeySource for () {
    fn append_to(&self, builder: &mut CacheKeyBuilder) {
        builder.push_part(KeyPart::Undefined);
    }
}

impl<T: KeySource> KeySource for Option<T> {
    fn append_to(&self, builder: &mut CacheKeyBuilder) {
        match self {
            Some(value) => value.append_to(builder),
            None => {
                builder.push_part(KeyPart::Null);
            }
        }
    }
}

impl<T: KeySource + ?Sized> KeySource for &T {
    fn append_to(&self, builder: &mut CacheKeyBuilder) {
        (**self).append_to(builder);
    }
}

impl<T: KeySource + ?Sized> KeySource for Box<T> {
    fn append_to(&self, builder: &mut CacheKeyBuilder) {
        (**self).append_to(builder);
    }
}

impl<T: KeySource + ?Sized> KeySource for std::sync::Arc<T> {
    fn append_to(&self, builder: &mut CacheKeyBuilder) {
        (**self).append_to(builder);
    }
}

// Sequences flatten into their elements.

impl<T: KeySource> KeySource for [T] {
    fn append_to(&self, builder: &mut CacheKeyBuilder) {
        for item in self {
            item.append_to(builder);
        }
    }
}

impl<T: KeySource, const N: usize> KeySource for [T; N] {
    fn append_to(&self, builder: &mut CacheKeyBuilder) {
        self.as_slice().append_to(builder);
    }
}

impl<T: KeySource> KeySource for Vec<T> {
    fn append_to(&self, builder: &mut CacheKeyBuilder) {
        self.as_slice().append_to(builder);
    }
}

impl<T: KeySource> KeySource for VecDeque<T> {
    fn append_to(&self, builder: &mut CacheKeyBuilder) {
        for item in self {
            item.append_to(builder);
        }
    }
}

macro_rules! tuple_key_source {
    ($($name:ident $var:ident),+) => {
        impl<$($name: KeySource),+> KeySource for ($($name,)+) {
            fn append_to(&self, builder: &mut CacheKeyBuilder) {
                let ($($var,)+) = self;
                $($var.append_to(builder);)+
            }
        }
    };
}

tuple_key_source!(A a);
tuple_key_source!(A a, B b);
tuple_key_source!(A a, B b, C c);
tuple_key_source!(A a, B b, C c, D d);
tuple_key_source!(A a, B b, C c, D d, E e);
tuple_key_source!(A a, B b, C c, D d, E e, F f);
tuple_key_source!(A a, B b, C c, D d, E e, F f, G g);
tuple_key_source!(A a, B b, C c, D d, E e, F f, G g, H h);

// Dates become their instant, so equal instants collide.

impl<Tz: TimeZone> KeySource for DateTime<Tz> {
    fn append_to(&self, builder: &mut CacheKeyBuilder) {
        builder.push_part(KeyPart::Millis(self.timestamp_millis()));
    }
}

impl KeySource for NaiveDateTime {
    fn append_to(&self, builder: &mut CacheKeyBuilder) {
        builder.push_part(KeyPart::Millis(self.and_utc().timestamp_millis()));
    }
}

impl KeySource for SystemTime {
    fn append_to(&self, builder: &mut CacheKeyBuilder) {
        let millis = match self.duration_since(UNIX_EPOCH) {
            Ok(after) => i64::try_from(after.as_millis()).unwrap_or(i64::MAX),
            Err(before) => i64::try_from(before.duration().as_millis())
                .map_or(i64::MIN, |millis| -millis),
        };
        builder.push_part(KeyPart::Millis(millis));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("my_app::ui::Widget"), "Widget");
        assert_eq!(
            short_type_name("my_app::Wrapper<alloc::string::String>"),
            "Wrapper"
        );
        assert_eq!(short_type_name("Plain"), "Plain");
    }

    #[test]
    fn test_key_part_display() {
        assert_eq!(KeyPart::Null.to_string(), "null");
        assert_eq!(KeyPart::Undefined.to_string(), "undefined");
        assert_eq!(KeyPart::Millis(-5).to_string(), "-5");
        assert_eq!(KeyPart::TypeTag("Widget".into()).to_string(), "Widget");
    }

    #[test]
    fn test_system_time_before_epoch() {
        let before = UNIX_EPOCH - std::time::Duration::from_millis(1500);
        let key = CacheKeyBuilder::make(&[&before]).build();
        assert_eq!(key, "-1500");
    }

    #[test]
    fn test_system_time_millis_saturate() {
        let far = UNIX_EPOCH + std::time::Duration::from_secs(10_000_000_000_000_000);
        let key = CacheKeyBuilder::make(&[&far]).build();
        assert_eq!(key, i64::MAX.to_string());
    }
}
