//! Validators deciding whether a cached value may still be served.

use std::sync::Arc;

/// Predicate over a value read from the cache tier.
pub trait ObjectValidator<T: ?Sized>: Send + Sync {
    fn is_valid(&self, value: &T) -> bool;
}

/// Accepts every value.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultObjectValidator;

impl<T: ?Sized> ObjectValidator<T> for DefaultObjectValidator {
    fn is_valid(&self, _value: &T) -> bool {
        true
    }
}

/// Values that may or may not be a collection of elements.
pub trait Collection {
    type Item;

    /// Elements of the collection, or `None` when the value is not one.
    fn elements(&self) -> Option<&[Self::Item]>;
}

impl<T> Collection for Vec<T> {
    type Item = T;

    fn elements(&self) -> Option<&[T]> {
        Some(self.as_slice())
    }
}

impl<T> Collection for [T] {
    type Item = T;

    fn elements(&self) -> Option<&[T]> {
        Some(self)
    }
}

impl Collection for serde_json::Value {
    type Item = Self;

    fn elements(&self) -> Option<&[Self]> {
        self.as_array().map(Vec::as_slice)
    }
}

/// Valid only for a non-empty collection whose every element passes the
/// wrapped validator.
#[derive(Debug, Clone, Copy, Default)]
pub struct ArrayValidator<V> {
    inner: V,
}

impl<V> ArrayValidator<V> {
    pub const fn new(inner: V) -> Self {
        Self { inner }
    }
}

impl<C, V> ObjectValidator<C> for ArrayValidator<V>
where
    C: Collection + ?Sized,
    V: ObjectValidator<C::Item>,
{
    fn is_valid(&self, value: &C) -> bool {
        match value.elements() {
            Some([]) | None => false,
            Some(elements) => elements.iter().all(|e| self.inner.is_valid(e)),
        }
    }
}

impl<T: ?Sized, V: ObjectValidator<T> + ?Sized> ObjectValidator<T> for &V {
    fn is_valid(&self, value: &T) -> bool {
        (**self).is_valid(value)
    }
}

impl<T: ?Sized, V: ObjectValidator<T> + ?Sized> ObjectValidator<T> for Arc<V> {
    fn is_valid(&self, value: &T) -> bool {
        (**self).is_valid(value)
    }
}

/// Validator built from a plain function or closure.
pub struct FnValidator<F>(F);

impl<F> FnValidator<F> {
    pub const fn new(predicate: F) -> Self {
        Self(predicate)
    }
}

impl<T: ?Sized, F> ObjectValidator<T> for FnValidator<F>
where
    F: Fn(&T) -> bool + Send + Sync,
{
    fn is_valid(&self, value: &T) -> bool {
        (self.0)(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_default_accepts_everything() {
        assert!(DefaultObjectValidator.is_valid(&0));
        assert!(DefaultObjectValidator.is_valid("anything"));
        assert!(DefaultObjectValidator.is_valid(&Vec::<u8>::new()));
    }

    #[test]
    fn test_array_rejects_empty_and_non_collections() {
        let validator = ArrayValidator::new(DefaultObjectValidator);
        assert!(!validator.is_valid(&Vec::<u32>::new()));
        assert!(!validator.is_valid(&json!({"title": "X"})));
        assert!(!validator.is_valid(&json!("X")));
        assert!(!validator.is_valid(&json!([])));
        assert!(validator.is_valid(&json!([{"title": "X"}])));
    }

    #[test]
    fn test_array_requires_every_element() {
        let positive = FnValidator::new(|n: &i32| *n > 0);
        let validator = ArrayValidator::new(positive);
        assert!(validator.is_valid(&vec![1, 2, 3]));
        assert!(!validator.is_valid(&vec![1, -2, 3]));
        assert!(validator.is_valid(&[7][..]));
    }

    #[test]
    fn test_array_short_circuits() {
        let calls = AtomicUsize::new(0);
        let counting = FnValidator::new(|n: &i32| {
            calls.fetch_add(1, Ordering::SeqCst);
            *n > 0
        });
        let validator = ArrayValidator::new(&counting);
        assert!(!validator.is_valid(&vec![1, -1, 5, 6]));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_nested_arrays() {
        let validator = ArrayValidator::new(ArrayValidator::new(DefaultObjectValidator));
        assert!(validator.is_valid(&vec![vec![1], vec![2, 3]]));
        assert!(!validator.is_valid(&vec![vec![1], vec![]]));
    }
}
