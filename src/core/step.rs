use std::{
    cell::Cell,
    time::{Duration, Instant},
};

use log::{debug, error, info};
use uuid::Uuid;

use crate::BatchError;

use super::{
    build_name,
    item::{ItemProcessor, ItemReader, ItemWriter},
};

type StepResult<T> = Result<T, BatchError>;

/// Lifecycle of a step. Any error status is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Starting,
    Success,
    ReadError,
    ProcessorError,
    WriteError,
}

/// Timing and counters of one step execution.
#[derive(Debug)]
pub struct StepExecution {
    pub start: Instant,
    pub end: Instant,
    pub duration: Duration,
    pub status: StepStatus,
    pub read_count: usize,
    pub write_count: usize,
}

/// A unit of work run by a job.
pub trait Step {
    /// Runs the step to completion or to its first error.
    fn execute(&self) -> StepResult<StepExecution>;

    fn get_name(&self) -> &str;

    fn get_status(&self) -> StepStatus;
}

/// Chunk-oriented step: reads `chunk_size` items, processes them in order,
/// then hands the chunk to the writer.
///
/// There is no skip policy. The first read, process or write error ends the
/// step and `close` is not called on the writer, so writers that only emit on
/// `close` leave nothing behind.
pub struct StepInstance<'a, I, O> {
    id: Uuid,
    name: String,
    reader: &'a dyn ItemReader<I>,
    processor: &'a dyn ItemProcessor<I, O>,
    writer: &'a dyn ItemWriter<O>,
    chunk_size: usize,
    status: Cell<StepStatus>,
    read_count: Cell<usize>,
    write_count: Cell<usize>,
    read_error_count: Cell<usize>,
    process_error_count: Cell<usize>,
    write_error_count: Cell<usize>,
}

impl<I, O> Step for StepInstance<'_, I, O> {
    fn execute(&self) -> StepResult<StepExecution> {
        let start = Instant::now();

        info!("Start of step: {}, id: {}", self.name, self.id);

        self.writer
            .open()
            .inspect_err(|err| self.fail_write(err, 0))?;

        let mut read_items: Vec<I> = Vec::with_capacity(self.chunk_size);

        loop {
            let exhausted = self.read_chunk(&mut read_items)?;

            if !read_items.is_empty() {
                let processed_items = self.process_chunk(&read_items)?;
                self.write_chunk(&processed_items)?;
            }

            if exhausted {
                break;
            }
        }

        self.writer
            .close()
            .inspect_err(|err| self.fail_write(err, 0))?;

        self.status.set(StepStatus::Success);

        info!(
            "End of step: {}, id: {}, read: {}, written: {}",
            self.name,
            self.id,
            self.read_count.get(),
            self.write_count.get()
        );

        Ok(StepExecution {
            start,
            end: Instant::now(),
            duration: start.elapsed(),
            status: StepStatus::Success,
            read_count: self.read_count.get(),
            write_count: self.write_count.get(),
        })
    }

    fn get_name(&self) -> &str {
        &self.name
    }

    fn get_status(&self) -> StepStatus {
        self.status.get()
    }
}

impl<I, O> StepInstance<'_, I, O> {
    pub fn get_read_count(&self) -> usize {
        self.read_count.get()
    }

    pub fn get_write_count(&self) -> usize {
        self.write_count.get()
    }

    pub fn get_read_error_count(&self) -> usize {
        self.read_error_count.get()
    }

    pub fn get_process_error_count(&self) -> usize {
        self.process_error_count.get()
    }

    pub fn get_write_error_count(&self) -> usize {
        self.write_error_count.get()
    }

    /// Fills `read_items` with at most `chunk_size` items.
    /// Returns `true` once the reader is exhausted.
    fn read_chunk(&self, read_items: &mut Vec<I>) -> StepResult<bool> {
        debug!("Start reading chunk");
        read_items.clear();

        while read_items.len() < self.chunk_size {
            match self.reader.read() {
                Ok(Some(item)) => {
                    read_items.push(item);
                    self.read_count.set(self.read_count.get() + 1);
                }
                Ok(None) => {
                    debug!("End reading chunk: FINISHED");
                    return Ok(true);
                }
                Err(err) => {
                    self.read_error_count.set(self.read_error_count.get() + 1);
                    self.status.set(StepStatus::ReadError);
                    error!("Error occurred during read item: {}", err);
                    return Err(err);
                }
            }
        }

        debug!("End reading chunk: FULL");
        Ok(false)
    }

    fn process_chunk(&self, read_items: &[I]) -> StepResult<Vec<O>> {
        debug!("Start processing chunk");

        let mut processed_items = Vec::with_capacity(read_items.len());
        for item in read_items {
            match self.processor.process(item) {
                Ok(processed) => processed_items.push(processed),
                Err(err) => {
                    self.process_error_count
                        .set(self.process_error_count.get() + 1);
                    self.status.set(StepStatus::ProcessorError);
                    error!("Error occurred during process item: {}", err);
                    return Err(err);
                }
            }
        }

        debug!("End processing chunk");
        Ok(processed_items)
    }

    fn write_chunk(&self, processed_items: &[O]) -> StepResult<()> {
        debug!("Start writing chunk");

        self.writer
            .write(processed_items)
            .and_then(|()| self.writer.flush())
            .inspect_err(|err| self.fail_write(err, processed_items.len()))?;

        self.write_count
            .set(self.write_count.get() + processed_items.len());

        debug!("End writing chunk");
        Ok(())
    }

    fn fail_write(&self, err: &BatchError, item_count: usize) {
        self.write_error_count
            .set(self.write_error_count.get() + item_count);
        self.status.set(StepStatus::WriteError);
        error!("ItemWriter error: {}", err);
    }
}

/// Builder for a [`StepInstance`].
///
/// Reader, processor and writer are required; the chunk size defaults to 1,
/// which streams every item to the writer as soon as it is processed.
pub struct StepBuilder<'a, I, O> {
    name: String,
    reader: Option<&'a dyn ItemReader<I>>,
    processor: Option<&'a dyn ItemProcessor<I, O>>,
    writer: Option<&'a dyn ItemWriter<O>>,
    chunk_size: usize,
}

impl<'a, I, O> StepBuilder<'a, I, O> {
    /// Creates a builder with no parts and a chunk size of 1.
    ///
    /// # Parameters
    /// - `name`: Name used in logs and errors; an empty name is replaced by a
    ///   random one on `build`
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            reader: None,
            processor: None,
            writer: None,
            chunk_size: 1,
        }
    }

    /// Sets the reader the step pulls items from.
    ///
    /// # Parameters
    /// - `reader`: Source of input items, borrowed for the step's lifetime
    ///
    /// # Returns
    /// The updated builder
    pub fn reader(mut self, reader: &'a impl ItemReader<I>) -> Self {
        self.reader = Some(reader);
        self
    }

    /// Sets the processor applied to every item read.
    ///
    /// # Parameters
    /// - `processor`: Maps each input item to an output item; its error ends
    ///   the step
    ///
    /// # Returns
    /// The updated builder
    pub fn processor(mut self, processor: &'a impl ItemProcessor<I, O>) -> Self {
        self.processor = Some(processor);
        self
    }

    /// Sets the writer receiving processed chunks.
    ///
    /// # Parameters
    /// - `writer`: Sink for output items; `open` and `close` frame the run
    ///
    /// # Returns
    /// The updated builder
    pub fn writer(mut self, writer: &'a impl ItemWriter<O>) -> Self {
        self.writer = Some(writer);
        self
    }

    /// Sets the commit interval. A size of 0 is treated as 1.
    ///
    /// # Parameters
    /// - `chunk_size`: Number of items read and processed before each write
    ///
    /// # Returns
    /// The updated builder
    pub fn chunk(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Builds the step.
    ///
    /// # Returns
    /// - `Ok(StepInstance)` when reader, processor and writer are set
    /// - `Err(BatchError::Step)` naming the first missing part
    pub fn build(self) -> StepResult<StepInstance<'a, I, O>> {
        let name = if self.name.is_empty() {
            build_name()
        } else {
            self.name
        };

        let missing = |part: &str| BatchError::Step(format!("{}: no {} configured", name, part));

        let reader = self.reader.ok_or_else(|| missing("reader"))?;
        let processor = self.processor.ok_or_else(|| missing("processor"))?;
        let writer = self.writer.ok_or_else(|| missing("writer"))?;

        Ok(StepInstance {
            id: Uuid::new_v4(),
            name,
            reader,
            processor,
            writer,
            chunk_size: self.chunk_size,
            status: Cell::new(StepStatus::Starting),
            read_count: Cell::new(0),
            write_count: Cell::new(0),
            read_error_count: Cell::new(0),
            process_error_count: Cell::new(0),
            write_error_count: Cell::new(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use crate::{
        core::item::{
            ItemProcessor, ItemProcessorResult, ItemReader, ItemReaderResult, ItemWriter,
            ItemWriterResult,
        },
        BatchError,
    };

    use super::{Step, StepBuilder, StepStatus};

    /// Hands every item through unchanged.
    struct PassThroughProcessor;

    impl<I: Clone> ItemProcessor<I, I> for PassThroughProcessor {
        fn process(&self, item: &I) -> ItemProcessorResult<I> {
            Ok(item.clone())
        }
    }

    struct VecReader {
        items: RefCell<Vec<Result<u32, BatchError>>>,
    }

    impl VecReader {
        fn new(mut items: Vec<Result<u32, BatchError>>) -> Self {
            items.reverse();
            Self {
                items: RefCell::new(items),
            }
        }
    }

    impl ItemReader<u32> for VecReader {
        fn read(&self) -> ItemReaderResult<u32> {
            self.items.borrow_mut().pop().transpose()
        }
    }

    #[derive(Default)]
    struct RecordingWriter {
        chunks: RefCell<Vec<Vec<u32>>>,
        closed: RefCell<bool>,
    }

    impl ItemWriter<u32> for RecordingWriter {
        fn write(&self, items: &[u32]) -> ItemWriterResult {
            self.chunks.borrow_mut().push(items.to_vec());
            Ok(())
        }

        fn close(&self) -> ItemWriterResult {
            *self.closed.borrow_mut() = true;
            Ok(())
        }
    }

    struct RejectOdd;

    impl ItemProcessor<u32, u32> for RejectOdd {
        fn process(&self, item: &u32) -> ItemProcessorResult<u32> {
            if item % 2 == 1 {
                Err(BatchError::ItemProcessor(format!("odd item {}", item)))
            } else {
                Ok(*item)
            }
        }
    }

    #[test]
    fn items_are_written_in_chunks_and_in_order() {
        let reader = VecReader::new(vec![Ok(1), Ok(2), Ok(3), Ok(4), Ok(5)]);
        let writer = RecordingWriter::default();
        let processor = PassThroughProcessor;

        let step = StepBuilder::new("chunks")
            .reader(&reader)
            .processor(&processor)
            .writer(&writer)
            .chunk(2)
            .build()
            .unwrap();

        let execution = step.execute().unwrap();

        assert_eq!(execution.status, StepStatus::Success);
        assert_eq!(execution.read_count, 5);
        assert_eq!(execution.write_count, 5);
        assert_eq!(
            *writer.chunks.borrow(),
            vec![vec![1, 2], vec![3, 4], vec![5]]
        );
        assert!(*writer.closed.borrow());
    }

    #[test]
    fn read_error_aborts_without_closing_writer() {
        let reader = VecReader::new(vec![
            Ok(2),
            Err(BatchError::ItemReader("broken row".to_string())),
            Ok(4),
        ]);
        let writer = RecordingWriter::default();
        let processor = PassThroughProcessor;

        let step = StepBuilder::new("read-error")
            .reader(&reader)
            .processor(&processor)
            .writer(&writer)
            .build()
            .unwrap();

        let result = step.execute();

        assert!(matches!(result, Err(BatchError::ItemReader(_))));
        assert_eq!(step.get_status(), StepStatus::ReadError);
        assert_eq!(step.get_read_count(), 1);
        assert_eq!(step.get_write_count(), 1);
        assert_eq!(step.get_read_error_count(), 1);
        assert!(!*writer.closed.borrow());
    }

    #[test]
    fn processor_error_stops_the_chunk() {
        let reader = VecReader::new(vec![Ok(2), Ok(3), Ok(4)]);
        let writer = RecordingWriter::default();

        let step = StepBuilder::new("process-error")
            .reader(&reader)
            .processor(&RejectOdd)
            .writer(&writer)
            .chunk(10)
            .build()
            .unwrap();

        let result = step.execute();

        assert!(matches!(result, Err(BatchError::ItemProcessor(_))));
        assert_eq!(step.get_status(), StepStatus::ProcessorError);
        assert_eq!(step.get_process_error_count(), 1);
        assert!(writer.chunks.borrow().is_empty());
    }

    #[test]
    fn build_fails_without_writer() {
        let reader = VecReader::new(vec![]);
        let processor = PassThroughProcessor;

        let result = StepBuilder::<u32, u32>::new("incomplete")
            .reader(&reader)
            .processor(&processor)
            .build();

        assert!(matches!(result, Err(BatchError::Step(_))));
    }

    #[test]
    fn build_error_names_the_first_missing_part() {
        let writer = RecordingWriter::default();

        let result = StepBuilder::<u32, u32>::new("partial").writer(&writer).build();

        match result {
            Err(BatchError::Step(message)) => assert_eq!(message, "partial: no reader configured"),
            Err(other) => panic!("expected a step error, got {:?}", other),
            Ok(_) => panic!("expected a step error"),
        }
    }

    #[test]
    fn zero_chunk_size_is_clamped() {
        let reader = VecReader::new(vec![Ok(8), Ok(6)]);
        let writer = RecordingWriter::default();
        let processor = PassThroughProcessor;

        let step = StepBuilder::new("")
            .reader(&reader)
            .processor(&processor)
            .writer(&writer)
            .chunk(0)
            .build()
            .unwrap();

        step.execute().unwrap();

        assert_eq!(step.get_name().len(), 8);
        assert_eq!(*writer.chunks.borrow(), vec![vec![8], vec![6]]);
    }
}
