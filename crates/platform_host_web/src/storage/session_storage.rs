//! `sessionStorage`-backed session store implementation.

use platform_host::SessionStore;

#[derive(Debug, Clone, Copy, Default)]
/// Browser session store backed by `window.sessionStorage`.
pub struct WebSessionStore;

impl WebSessionStore {
    #[cfg(target_arch = "wasm32")]
    fn storage() -> Result<web_sys::Storage, String> {
        web_sys::window()
            .and_then(|w| w.session_storage().ok().flatten())
            .ok_or_else(|| "sessionStorage unavailable".to_string())
    }
}

impl SessionStore for WebSessionStore {
    fn load_raw(&self, key: &str) -> Option<String> {
        #[cfg(target_arch = "wasm32")]
        {
            Self::storage().ok()?.get_item(key).ok().flatten()
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            None
        }
    }

    fn save_raw(&self, key: &str, raw: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            Self::storage()?
                .set_item(key, raw)
                .map_err(|e| format!("sessionStorage set_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = (key, raw);
            Ok(())
        }
    }

    fn remove(&self, key: &str) -> Result<(), String> {
        #[cfg(target_arch = "wasm32")]
        {
            Self::storage()?
                .remove_item(key)
                .map_err(|e| format!("sessionStorage remove_item failed: {e:?}"))
        }

        #[cfg(not(target_arch = "wasm32"))]
        {
            let _ = key;
            Ok(())
        }
    }
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn native_fallback_is_inert() {
        let store = WebSessionStore;
        assert_eq!(store.load_raw("logged_in"), None);
        assert!(store.save_raw("logged_in", "true").is_ok());
        assert!(store.remove("logged_in").is_ok());
    }
}
