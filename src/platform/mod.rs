//! Platform abstraction layer
//!
//! Handles browser/native differences for:
//! - Wall-clock time
//! - Storage (LocalStorage on web, nothing on native)

/// Current Unix time in milliseconds
#[cfg(target_arch = "wasm32")]
pub fn now_ms() -> f64 {
    js_sys::Date::now()
}

#[cfg(not(target_arch = "wasm32"))]
pub fn now_ms() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

/// Key/value storage backed by LocalStorage (WASM only)
#[cfg(target_arch = "wasm32")]
pub mod storage {
    fn local_storage() -> Option<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
    }

    pub fn get_item(key: &str) -> Option<String> {
        local_storage()?.get_item(key).ok()?
    }

    /// Returns false if storage is unavailable or the write was refused
    pub fn set_item(key: &str, value: &str) -> bool {
        local_storage()
            .map(|s| s.set_item(key, value).is_ok())
            .unwrap_or(false)
    }
}

/// Native stubs
#[cfg(not(target_arch = "wasm32"))]
pub mod storage {
    pub fn get_item(_key: &str) -> Option<String> {
        None
    }

    pub fn set_item(_key: &str, _value: &str) -> bool {
        // No-op for native
        false
    }
}
