//! Search statistics, printed as `{prefix} {name}={value}` lines once
//! [`configure_statistic_logging`] has been called.
mod mean;
mod sink;
mod statistic_logger;

use std::fmt::Display;
use std::fmt::Write;

pub use mean::Mean;
pub use sink::configure_statistic_logging;
pub use sink::log_statistic;
pub use sink::log_statistic_postfix;
pub use statistic_logger::StatisticLogger;

/// Something that can be written out through a [`StatisticLogger`].
pub trait Statistic {
    fn log(&self, logger: StatisticLogger);
}

impl<Value: Display> Statistic for Value {
    fn log(&self, mut logger: StatisticLogger) {
        let _ = write!(logger, "{self}");
    }
}

/// Declares a struct of public counters whose [`Statistic`] implementation logs every field
/// under its own name.
///
/// ```rust
/// # use xdg_core::create_statistics_struct;
/// create_statistics_struct!(ParseStatistics {
///     num_words: usize,
/// });
///
/// assert_eq!(ParseStatistics::default().num_words, 0);
/// ```
#[macro_export]
macro_rules! create_statistics_struct {
    (
        $(#[$meta:meta])*
        $name:ident {
            $($(#[$field_meta:meta])* $field:ident : $type:ty),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, Default)]
        pub struct $name {
            $($(#[$field_meta])* pub $field: $type,)+
        }

        impl $crate::statistics::Statistic for $name {
            fn log(&self, logger: $crate::statistics::StatisticLogger) {
                $(
                    let field = logger.attach_to_prefix(stringify!($field));
                    $crate::statistics::Statistic::log(&self.$field, field);
                )+
            }
        }
    };
}
