//! System `iconv(3)` backend.

use std::ffi::CString;
use std::io;
use std::ptr;

use libc::{c_char, c_int, c_void, size_t};
use log::debug;

use crate::error::{Error, Result};
use crate::primitive::{Primitive, Progress, Signal};

type IconvT = *mut c_void;

#[cfg_attr(target_os = "macos", link(name = "iconv"))]
unsafe extern "C" {
    fn iconv_open(tocode: *const c_char, fromcode: *const c_char) -> IconvT;
    fn iconv(
        cd: IconvT,
        inbuf: *mut *mut c_char,
        inbytesleft: *mut size_t,
        outbuf: *mut *mut c_char,
        outbytesleft: *mut size_t,
    ) -> size_t;
    fn iconv_close(cd: IconvT) -> c_int;
}

fn last_errno() -> i32 {
    io::Error::last_os_error().raw_os_error().unwrap_or(0)
}

/// An open `iconv` conversion descriptor.
///
/// Closed exactly once, by [`Iconv::close`] or on drop. Nothing closes it if
/// the process aborts.
#[derive(Debug)]
pub struct Iconv {
    cd: IconvT,
}

// The descriptor is plain heap state owned by this value; it may move
// between threads but must not be used from two at once (no `Sync`).
unsafe impl Send for Iconv {}

impl Iconv {
    /// Open a descriptor converting from `source` to `target`.
    ///
    /// Names are handed to the system as given; callers wanting alias fixup
    /// go through [`crate::Converter`].
    pub fn open(source: &str, target: &str) -> Result<Self> {
        let unsupported = |code| Error::UnsupportedConversion {
            source_encoding: source.to_string(),
            target_encoding: target.to_string(),
            code,
        };
        let from = CString::new(source).map_err(|_| unsupported(libc::EINVAL))?;
        let to = CString::new(target).map_err(|_| unsupported(libc::EINVAL))?;

        // iconv_open takes (to, from)
        let cd = unsafe { iconv_open(to.as_ptr(), from.as_ptr()) };
        if cd as isize == -1 {
            let code = last_errno();
            debug!("iconv_open({target}, {source}) failed: os error {code}");
            return Err(unsupported(code));
        }

        debug!("opened iconv descriptor {source} -> {target}");
        Ok(Self { cd })
    }

    /// Close the descriptor now, reporting a failure from `iconv_close`.
    pub fn close(mut self) -> Result<()> {
        let cd = std::mem::replace(&mut self.cd, ptr::null_mut());
        if unsafe { iconv_close(cd) } == -1 {
            return Err(Error::OtherSystemError { code: last_errno() });
        }
        Ok(())
    }

    fn call(&mut self, input: Option<&[u8]>, output: &mut [u8]) -> Progress {
        let (mut inbuf, mut inleft) = match input {
            Some(input) => (input.as_ptr() as *mut c_char, input.len()),
            None => (ptr::null_mut(), 0),
        };
        let in_total = inleft;
        let mut outbuf = output.as_mut_ptr() as *mut c_char;
        let mut outleft = output.len();

        let inbuf_ptr = if input.is_some() {
            &mut inbuf as *mut *mut c_char
        } else {
            ptr::null_mut()
        };
        let inleft_ptr = if input.is_some() {
            &mut inleft as *mut size_t
        } else {
            ptr::null_mut()
        };

        // iconv never writes through the input pointer
        let rv = unsafe { iconv(self.cd, inbuf_ptr, inleft_ptr, &mut outbuf, &mut outleft) };
        let read = in_total - inleft;
        let written = output.len() - outleft;

        if rv == size_t::MAX {
            Progress::failed(read, written, Signal::from_errno(last_errno()))
        } else {
            Progress::done(read, written)
        }
    }
}

impl Primitive for Iconv {
    fn reset(&mut self) {
        unsafe {
            iconv(
                self.cd,
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null_mut(),
                ptr::null_mut(),
            );
        }
    }

    fn step(&mut self, input: &[u8], output: &mut [u8]) -> Progress {
        self.call(Some(input), output)
    }

    fn flush(&mut self, output: &mut [u8]) -> Progress {
        self.call(None, output)
    }
}

impl Drop for Iconv {
    fn drop(&mut self) {
        if !self.cd.is_null() {
            unsafe {
                iconv_close(self.cd);
            }
        }
    }
}
