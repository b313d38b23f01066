//! Raw call boundary types
//!
//! The native component takes every argument as a Go string: a `(pointer, length)`
//! pair passed by value. [`CallBuffer`] owns the bytes and lends a [`GoString`] only for
//! the duration of a closure, so the pointer cannot outlive the buffer.

use hazetunnel_core::Result;
use serde::Serialize;
use std::ffi::c_char;
use std::marker::PhantomData;

/// Go's string header
#[repr(C)]
#[derive(Debug, Clone, Copy)]
pub struct GoString<'a> {
    p: *const c_char,
    n: isize,
    _buffer: PhantomData<&'a [u8]>,
}

impl GoString<'_> {
    /// Length in bytes
    pub fn len(&self) -> usize {
        self.n as usize
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }
}

/// Signature shared by every exported entry point
pub type RawEntryPoint = unsafe extern "C" fn(GoString<'_>);

/// Owned argument for one foreign call
///
/// The bytes are passed as-is; no NUL terminator is added and embedded NULs survive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallBuffer {
    bytes: Vec<u8>,
}

impl CallBuffer {
    /// Serialize `value` as compact JSON
    pub fn from_json<T: Serialize + ?Sized>(value: &T) -> Result<Self> {
        Ok(Self {
            bytes: serde_json::to_vec(value)?,
        })
    }

    /// Pass `text` verbatim
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            bytes: text.into().into_bytes(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// The buffer as UTF-8, if it is valid
    pub fn as_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.bytes).ok()
    }

    /// Lend the buffer to `f` as a Go string
    pub fn with_raw<R>(&self, f: impl FnOnce(GoString<'_>) -> R) -> R {
        let raw = GoString {
            p: self.bytes.as_ptr().cast::<c_char>(),
            n: self.bytes.len() as isize,
            _buffer: PhantomData,
        };
        f(raw)
    }
}
