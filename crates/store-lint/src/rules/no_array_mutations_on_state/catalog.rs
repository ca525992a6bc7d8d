//! Array methods that modify their receiver in place.

/// `Array.prototype` methods that mutate the array they are called on.
///
/// Anything missing here is a silent false negative, there is no configuration
/// to extend it.
pub const MUTATING_ARRAY_METHODS: &[&str] = &[
    "push",
    "pop",
    "shift",
    "unshift",
    "splice",
    "sort",
    "reverse",
    "fill",
    "copyWithin",
];

/// Returns true if calling `name` on an array changes that array.
pub fn is_mutating(name: &str) -> bool {
    MUTATING_ARRAY_METHODS.contains(&name)
}
