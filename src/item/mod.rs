#[cfg(feature = "console")]
/// This module provides a console item writer printing one record per line.
pub mod console;

#[cfg(feature = "csv")]
/// This module provides a CSV item reader for phrase lists.
pub mod csv;

#[cfg(feature = "json")]
/// This module provides a JSON item writer producing a single array document.
pub mod json;
