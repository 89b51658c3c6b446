// ID Provider Port (for deterministic testing)

/// Source of collision-free tokens for staging directories and output files
pub trait IdProvider: Send + Sync {
    /// Generate a new unique token, safe to use as a file name
    fn generate_id(&self) -> String;
}

/// UUID v4 provider (production), hex without hyphens
pub struct UuidProvider;

impl IdProvider for UuidProvider {
    fn generate_id(&self) -> String {
        uuid::Uuid::new_v4().simple().to_string()
    }
}

pub mod mocks {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Deterministic ids: id-1, id-2, ...
    #[derive(Default)]
    pub struct SequentialIdProvider {
        next: AtomicU64,
    }

    impl SequentialIdProvider {
        pub fn new() -> Self {
            Self::default()
        }
    }

    impl IdProvider for SequentialIdProvider {
        fn generate_id(&self) -> String {
            format!("id-{}", self.next.fetch_add(1, Ordering::SeqCst) + 1)
        }
    }
}
