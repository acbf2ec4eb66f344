use std::{
    cell::RefCell,
    fs,
    path::{Path, PathBuf},
};

use log::{debug, info};
use serde::Serialize;
use serde_json::{ser::PrettyFormatter, Serializer};

use crate::{
    core::item::{ItemWriter, ItemWriterResult},
    BatchError,
};

/// Writes all items as a single JSON array.
///
/// Items are kept in memory, in arrival order, until `close`. The whole
/// document is then serialized into memory and written over the destination
/// in one call, so a step that fails before `close` leaves the destination
/// untouched. An existing destination keeps its permissions and symlinks are
/// written through. Non-ASCII text is written literally.
pub struct JsonItemWriter<T> {
    path: PathBuf,
    indent: Vec<u8>,
    pretty_formatter: bool,
    items: RefCell<Vec<T>>,
}

impl<T> JsonItemWriter<T> {
    fn file_error(&self, message: impl ToString) -> BatchError {
        BatchError::FileWrite {
            path: self.path.clone(),
            message: message.to_string(),
        }
    }
}

impl<T: Serialize> JsonItemWriter<T> {
    fn serialize_items(&self) -> Result<Vec<u8>, BatchError> {
        let items = self.items.borrow();
        let mut buf = Vec::new();

        let result = if self.pretty_formatter {
            let formatter = PrettyFormatter::with_indent(&self.indent);
            let mut serializer = Serializer::with_formatter(&mut buf, formatter);
            items.serialize(&mut serializer)
        } else {
            serde_json::to_writer(&mut buf, &*items)
        };

        result.map_err(|error| self.file_error(error))?;
        Ok(buf)
    }
}

impl<T: Serialize + Clone> ItemWriter<T> for JsonItemWriter<T> {
    fn write(&self, items: &[T]) -> ItemWriterResult {
        self.items.borrow_mut().extend_from_slice(items);
        Ok(())
    }

    fn open(&self) -> ItemWriterResult {
        self.items.borrow_mut().clear();
        Ok(())
    }

    fn close(&self) -> ItemWriterResult {
        let count = self.items.borrow().len();
        debug!("Serializing {} items to {}", count, self.path.display());

        let document = self.serialize_items()?;
        fs::write(&self.path, document).map_err(|error| self.file_error(error))?;

        info!("Wrote {} items to {}", count, self.path.display());
        Ok(())
    }
}

/// Builder for a [`JsonItemWriter`].
///
/// Pretty printing with a two-space indent is the default.
pub struct JsonItemWriterBuilder {
    indent: Vec<u8>,
    pretty_formatter: bool,
}

impl Default for JsonItemWriterBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl JsonItemWriterBuilder {
    /// Creates a new `JsonItemWriterBuilder` with a two-space indent and
    /// pretty printing enabled.
    pub fn new() -> Self {
        Self {
            indent: b"  ".to_vec(),
            pretty_formatter: true,
        }
    }

    /// Sets the indentation used by the pretty formatter.
    ///
    /// # Parameters
    /// - `indent`: bytes written once per nesting level, `b"  "` by default
    ///
    /// # Returns
    /// The builder instance for method chaining
    pub fn indent(mut self, indent: &[u8]) -> Self {
        self.indent = indent.to_vec();
        self
    }

    /// Sets whether the document is pretty printed or written compact.
    ///
    /// # Parameters
    /// - `yes`: `true` for indented output (default), `false` for one line
    ///
    /// # Returns
    /// The builder instance for method chaining
    pub fn pretty_formatter(mut self, yes: bool) -> Self {
        self.pretty_formatter = yes;
        self
    }

    /// Creates a `JsonItemWriter` targeting `path`.
    ///
    /// Nothing touches the file system before the writer is closed.
    ///
    /// # Parameters
    /// - `path`: destination of the JSON document
    ///
    /// # Returns
    /// A writer buffering items of type `T`
    pub fn from_path<T, P: AsRef<Path>>(self, path: P) -> JsonItemWriter<T> {
        JsonItemWriter {
            path: path.as_ref().to_path_buf(),
            indent: self.indent,
            pretty_formatter: self.pretty_formatter,
            items: RefCell::new(Vec::new()),
        }
    }
}
