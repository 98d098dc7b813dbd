pub mod batch;
mod error;
mod types;

pub use error::*;
pub use types::*;

use std::ffi::CString;
use std::os::raw::c_char;

use tracing_subscriber::EnvFilter;

/// Execute a closure that returns an `FAStatus`, catching any panics
/// and converting them into `FAStatus::ErrorInternal`.
fn catch_panic<F: FnOnce() -> FAStatus + std::panic::UnwindSafe>(f: F) -> FAStatus {
    match std::panic::catch_unwind(f) {
        Ok(status) => status,
        Err(_) => {
            set_last_error("internal panic".to_string());
            FAStatus::ErrorInternal
        }
    }
}

fn report(result: Result<(), batch::BatchError>) -> FAStatus {
    match result {
        Ok(()) => FAStatus::Ok,
        Err(e) => {
            let status = FAStatus::from(&e.source);
            set_last_error(e.to_string());
            status
        }
    }
}

fn batch_len(params: &FABatchParams) -> Option<usize> {
    let len = params.input_len();
    if len.is_none() {
        set_last_error(format!("batch of {} tensors overflows", params.count));
    }
    len
}

/// Invert `params.count` packed 3x3 tensors.
///
/// `input` and `output` each hold `count * cells` doubles, where `cells` is
/// 9, 6 or 3 for general, symmetric and diagonal packing. Each inverse is
/// written in the packing of its input.
///
/// # Safety
/// `input` must be readable and `output` writable for that many doubles,
/// and the two must not overlap.
#[no_mangle]
pub unsafe extern "C" fn fa_batch_inverse(
    params: FABatchParams,
    input: *const f64,
    output: *mut f64,
) -> FAStatus {
    catch_panic(|| {
        if input.is_null() || output.is_null() {
            set_last_error("null argument".to_string());
            return FAStatus::ErrorInvalidArgument;
        }
        let Some(len) = batch_len(&params) else {
            return FAStatus::ErrorInvalidArgument;
        };
        let input = unsafe { std::slice::from_raw_parts(input, len) };
        let output = unsafe { std::slice::from_raw_parts_mut(output, len) };
        report(batch::inverse(params.packing.into(), input, output))
    })
}

/// Principal invariants of `params.count` packed 3x3 tensors.
///
/// # Safety
/// `input` must be readable for `count * cells` doubles; `i1`, `i2` and `i3`
/// must each be writable for `count` doubles.
#[no_mangle]
pub unsafe extern "C" fn fa_batch_invariants(
    params: FABatchParams,
    input: *const f64,
    i1: *mut f64,
    i2: *mut f64,
    i3: *mut f64,
) -> FAStatus {
    catch_panic(|| {
        if input.is_null() || i1.is_null() || i2.is_null() || i3.is_null() {
            set_last_error("null argument".to_string());
            return FAStatus::ErrorInvalidArgument;
        }
        let Some(len) = batch_len(&params) else {
            return FAStatus::ErrorInvalidArgument;
        };
        let n = params.count;
        let input = unsafe { std::slice::from_raw_parts(input, len) };
        let (i1, i2, i3) = unsafe {
            (
                std::slice::from_raw_parts_mut(i1, n),
                std::slice::from_raw_parts_mut(i2, n),
                std::slice::from_raw_parts_mut(i3, n),
            )
        };
        report(batch::invariants_of(
            params.packing.into(),
            input,
            i1,
            i2,
            i3,
        ))
    })
}

/// Eigenvalues of `params.count` packed symmetric or diagonal 3x3 tensors,
/// three per tensor. Symmetric tensors yield the smallest, largest and
/// middle eigenvalue in that order; diagonal tensors yield their diagonal.
///
/// # Safety
/// `input` must be readable for `count * cells` doubles and `output`
/// writable for `count * 3` doubles.
#[no_mangle]
pub unsafe extern "C" fn fa_batch_eigenvalues(
    params: FABatchParams,
    input: *const f64,
    output: *mut f64,
) -> FAStatus {
    catch_panic(|| {
        if input.is_null() || output.is_null() {
            set_last_error("null argument".to_string());
            return FAStatus::ErrorInvalidArgument;
        }
        let Some(len) = batch_len(&params) else {
            return FAStatus::ErrorInvalidArgument;
        };
        let Some(out_len) = params.count.checked_mul(3) else {
            set_last_error(format!("batch of {} tensors overflows", params.count));
            return FAStatus::ErrorInvalidArgument;
        };
        let input = unsafe { std::slice::from_raw_parts(input, len) };
        let output = unsafe { std::slice::from_raw_parts_mut(output, out_len) };
        report(batch::eigenvalues(params.packing.into(), input, output))
    })
}

/// Install a stderr logger for the engine's diagnostics.
///
/// `verbosity` 0 logs warnings, 1 info, 2 debug and anything higher trace.
/// `RUST_LOG` takes precedence when set. Only the first call in a process
/// installs a logger; later calls return `ErrorInternal`.
#[no_mangle]
pub extern "C" fn fa_logging_init(verbosity: u32) -> FAStatus {
    catch_panic(|| {
        let level = match verbosity {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
        match tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .try_init()
        {
            Ok(()) => FAStatus::Ok,
            Err(e) => {
                set_last_error(format!("logger already installed: {}", e));
                FAStatus::ErrorInternal
            }
        }
    })
}

/// Retrieve the last error message.
///
/// Returns a pointer to a C string describing the most recent error, or
/// null if no error has occurred. The caller must free the returned string
/// with `fa_free_string`.
#[no_mangle]
pub extern "C" fn fa_last_error() -> *const c_char {
    match error::take_last_error() {
        Some(e) => e.into_raw(),
        None => std::ptr::null(),
    }
}

/// Free a string previously returned by `fa_last_error`.
///
/// # Safety
/// `s` must come from `fa_last_error` and must not be freed twice.
#[no_mangle]
pub unsafe extern "C" fn fa_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    fn last_error() -> String {
        let ptr = fa_last_error();
        assert!(!ptr.is_null());
        let msg = unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned();
        unsafe { fa_free_string(ptr as *mut c_char) };
        msg
    }

    #[test]
    fn test_batch_inverse_general() {
        let params = FABatchParams::default();
        let input = [4.0, 7.0, 0.0, 2.0, 6.0, 0.0, 0.0, 0.0, 1.0];
        let mut output = [0.0; 9];
        let status = unsafe { fa_batch_inverse(params, input.as_ptr(), output.as_mut_ptr()) };
        assert_eq!(status, FAStatus::Ok);
        approx::assert_relative_eq!(output[0], 0.6, epsilon = 1e-12);
        approx::assert_relative_eq!(output[1], -0.7, epsilon = 1e-12);
        assert_eq!(output[8], 1.0);
    }

    #[test]
    fn test_batch_inverse_singular_reports_position() {
        let params = FABatchParams {
            packing: FAPacking::Diagonal,
            count: 2,
        };
        let input = [1.0, 1.0, 1.0, 1.0, 0.0, 1.0];
        let mut output = [0.0; 6];
        let status = unsafe { fa_batch_inverse(params, input.as_ptr(), output.as_mut_ptr()) };
        assert_eq!(status, FAStatus::ErrorSingular);
        assert!(last_error().starts_with("tensor 1:"));
    }

    #[test]
    fn test_null_arguments() {
        let params = FABatchParams::default();
        let mut output = [0.0; 9];
        let status = unsafe { fa_batch_inverse(params, std::ptr::null(), output.as_mut_ptr()) };
        assert_eq!(status, FAStatus::ErrorInvalidArgument);
        assert_eq!(last_error(), "null argument");
    }

    #[test]
    fn test_batch_invariants() {
        let params = FABatchParams {
            packing: FAPacking::Symmetric,
            count: 1,
        };
        let input = [1.0, 0.0, 0.0, 2.0, 0.0, 3.0];
        let (mut i1, mut i2, mut i3) = (0.0, 0.0, 0.0);
        let status =
            unsafe { fa_batch_invariants(params, input.as_ptr(), &mut i1, &mut i2, &mut i3) };
        assert_eq!(status, FAStatus::Ok);
        assert_eq!((i1, i2, i3), (6.0, 11.0, 6.0));
    }

    #[test]
    fn test_batch_eigenvalues_rejects_general() {
        let params = FABatchParams::default();
        let input = [0.0; 9];
        let mut output = [0.0; 3];
        let status =
            unsafe { fa_batch_eigenvalues(params, input.as_ptr(), output.as_mut_ptr()) };
        assert_eq!(status, FAStatus::ErrorUnsupported);
        assert_eq!(
            last_error(),
            "tensor 0: eigenvalues is not defined for general matrices"
        );
    }

    #[test]
    fn test_no_error_is_null() {
        let _ = error::take_last_error();
        assert!(fa_last_error().is_null());
    }
}
