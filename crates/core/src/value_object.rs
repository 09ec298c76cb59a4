//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. Two account
/// holders with the same name, address and phone number are the same holder;
/// two amounts of `10.00` are the same amount.
///
/// Types that are used as map keys should additionally derive `Eq + Hash`, so
/// that hashing agrees with value equality.
///
/// ```ignore
/// #[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// struct CountryCode(String);
///
/// impl ValueObject for CountryCode {}
/// ```
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
