use std::cell::RefCell;
use std::ffi::CString;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Store an error message for later retrieval via `fa_last_error`.
pub fn set_last_error(msg: String) {
    tracing::debug!(%msg, "ffi call failed");
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Take the last error message, leaving `None` in its place.
pub fn take_last_error() -> Option<CString> {
    LAST_ERROR.with(|e| e.borrow_mut().take())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_take_clears() {
        set_last_error("tensor 2: matrix is singular".to_string());
        let msg = take_last_error().unwrap();
        assert_eq!(msg.to_str().unwrap(), "tensor 2: matrix is singular");
        assert!(take_last_error().is_none());
    }
}
