use std::collections::HashMap;
use std::sync::{ Arc, Mutex };

use async_trait::async_trait;

use super::{ StorageBackend, StoreError };

/// Non-durable backend. Clones share the same map, which lets a store be
/// reopened over the same data in tests.
#[derive(Clone, Default)]
pub struct MemoryBackend {
    map: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl MemoryBackend {
    // A writer that panicked mid-insert leaves the map usable; recover the
    // guard rather than propagating the poison.
    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.map.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[async_trait]
impl StorageBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.lock().get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<(), StoreError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn survives_a_poisoned_lock() {
        let backend = MemoryBackend::new();
        backend.put("thunder-theme", "dark").await.unwrap();

        let clone = backend.clone();
        let _ = std::thread::spawn(move || {
            let _guard = clone.map.lock().unwrap();
            panic!("poison the lock");
        })
        .join();

        assert_eq!(
            backend.get("thunder-theme").await.unwrap().as_deref(),
            Some("dark")
        );
        backend.put("thunder-theme", "light").await.unwrap();
        assert_eq!(
            backend.get("thunder-theme").await.unwrap().as_deref(),
            Some("light")
        );
    }
}
