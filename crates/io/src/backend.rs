use crate::error::StoreError;

/// A durable string-to-string map.
///
/// Implementations report their own failures and never interpret values.
/// Absence is `Ok(None)`, not an error.
pub trait Backend {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError>;

    fn write(&mut self, key: &str, text: &str) -> Result<(), StoreError>;

    /// Deleting an absent key succeeds.
    fn delete(&mut self, key: &str) -> Result<(), StoreError>;

    /// Short name for log lines.
    fn name(&self) -> &'static str;
}

impl<B: Backend + ?Sized> Backend for Box<B> {
    fn read(&self, key: &str) -> Result<Option<String>, StoreError> {
        (**self).read(key)
    }

    fn write(&mut self, key: &str, text: &str) -> Result<(), StoreError> {
        (**self).write(key, text)
    }

    fn delete(&mut self, key: &str) -> Result<(), StoreError> {
        (**self).delete(key)
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}
