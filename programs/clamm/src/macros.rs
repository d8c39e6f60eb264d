//! Guard macros shared by handlers and logic

/// Return `Err($err)` unless `$cond` holds
#[macro_export]
macro_rules! require {
    ($cond:expr, $err:expr $(,)?) => {
        if !($cond) {
            return Err($err);
        }
    };
}
