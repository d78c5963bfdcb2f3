//! Booby traps for finding out why data is rejected.
//!
//! The decoder only ever reports one of three error categories, which
//! makes it hard to tell which rule a particular input violates. Every
//! place in the decoder that first produces an error wraps it in the
//! `xerr!()` macro defined here:
//!
//! ```rust,ignore
//! if len != 1 {
//!     xerr!(return Err(Error::InvalidFormat))
//! }
//! ```
//!
//! Normally, the macro simply expands to the expression it wraps. When the
//! crate is built with the `extra-debug` feature, it panics instead and
//! names the source location and the rejected expression. Run with
//! `RUST_BACKTRACE=1` to see how the decoder got there.

#[cfg(feature = "extra-debug")]
#[allow(unused_macros)]
macro_rules! xerr {
    ($test:expr) => {
        panic!(
            "decoder rejected input at {}:{}: {}",
            file!(), line!(), stringify!($test)
        )
    };
}

#[cfg(not(feature = "extra-debug"))]
#[allow(unused_macros)]
macro_rules! xerr {
    ($test:expr) => { $test };
}
