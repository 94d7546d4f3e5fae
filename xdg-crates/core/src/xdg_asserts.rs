//! Assertions graded by cost. Simple checks always run; moderate and advanced checks only with
//! the `debug-checks` feature or in tests.

pub const XDG_ASSERT_SIMPLE: u8 = 1;
pub const XDG_ASSERT_MODERATE: u8 = 2;
pub const XDG_ASSERT_ADVANCED: u8 = 3;

/// The most expensive grade of assertion that is checked.
pub const XDG_ASSERT_LEVEL_DEFINITION: u8 = if cfg!(any(test, feature = "debug-checks")) {
    XDG_ASSERT_ADVANCED
} else {
    XDG_ASSERT_SIMPLE
};

#[macro_export]
#[doc(hidden)]
macro_rules! xdg_assert_at {
    ($level:ident, $($arg:tt)*) => {
        if $crate::xdg_asserts::XDG_ASSERT_LEVEL_DEFINITION >= $crate::xdg_asserts::$level {
            assert!($($arg)*);
        }
    };
}

/// Cheap checks, e.g. argument validation.
#[macro_export]
macro_rules! xdg_assert_simple {
    ($($arg:tt)*) => { $crate::xdg_assert_at!(XDG_ASSERT_SIMPLE, $($arg)*) };
}

/// Checks that are constant time but sit on hot paths.
#[macro_export]
macro_rules! xdg_assert_moderate {
    ($($arg:tt)*) => { $crate::xdg_assert_at!(XDG_ASSERT_MODERATE, $($arg)*) };
}

/// Checks linear in the size of a domain or a model.
#[macro_export]
macro_rules! xdg_assert_advanced {
    ($($arg:tt)*) => { $crate::xdg_assert_at!(XDG_ASSERT_ADVANCED, $($arg)*) };
}
