//! External URL opening for start-menu links.

/// Opens `url` in a new browsing context.
///
/// # Errors
///
/// Returns an error when the browser refuses to open the URL (for example a popup blocker).
pub fn open_external_url(url: &str) -> Result<(), String> {
    #[cfg(target_arch = "wasm32")]
    {
        let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;
        match window.open_with_url_and_target(url, "_blank") {
            Ok(Some(_)) => Ok(()),
            Ok(None) => Err(format!("browser blocked opening `{url}`")),
            Err(e) => Err(format!("window.open failed: {e:?}")),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = url;
        Err("external URLs are unsupported on this target".to_string())
    }
}
