use std::sync::Arc;

/// Read side of a published value.
pub trait DataProvider<T>: Send + Sync {
    /// The current value, or `None` before anything was published.
    fn data(&self) -> Option<Arc<T>>;
}

/// A value fixed at construction.
#[derive(Debug)]
pub struct StaticDataProvider<T> {
    value: Arc<T>,
}

impl<T> StaticDataProvider<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: Arc::new(value),
        }
    }
}

impl<T: Send + Sync> DataProvider<T> for StaticDataProvider<T> {
    fn data(&self) -> Option<Arc<T>> {
        Some(self.value.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn static_provider_returns_same_snapshot() {
        let provider = StaticDataProvider::new(vec![1, 2, 3]);
        let first = provider.data().expect("value should be present");
        let second = provider.data().expect("value should be present");
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(*first, vec![1, 2, 3]);
    }
}
