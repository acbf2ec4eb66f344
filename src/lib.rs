#![cfg_attr(docsrs, feature(doc_cfg))]

/*!
 # Phrase Batch

 Reads a CSV list of Japanese/English phrase pairs with a difficulty level,
 prints every pair, or converts the whole list into a JSON document.

 The crate is built around small batch building blocks:

- **ItemReader:** yields input items one at a time. [`item::csv::CsvItemReader`]
  resolves the `Column1`/`Column2`/`Column3` headers and yields raw rows.
- **ItemProcessor:** turns an input item into an output item.
  [`phrase::PhraseProcessor`] trims every field and, in numeric mode, parses
  the level as an integer.
- **ItemWriter:** consumes processed items a chunk at a time.
  [`item::console::ConsoleItemWriter`] prints one line per record,
  [`item::json::JsonItemWriter`] writes one JSON array once every row is done.
- **Step / Job:** a step wires a reader, a processor and a writer together;
  a job runs steps in order and stops at the first error.

 ## Features

| **Feature** | **Description**                                        |
|-------------|--------------------------------------------------------|
| csv         | Enables the CSV `ItemReader`                           |
| json        | Enables the JSON `ItemWriter`                          |
| console     | Enables the console `ItemWriter`                       |
| full        | Enables all available features (default)               |

 ## Output format

 The JSON document is an array of objects with the keys `和文` (Japanese
 text), `英文` (English text) and `chapter` (the level, as an integer),
 indented with two spaces, Japanese text kept literal. This is the format
 the quiz front end reads:

```text
[
  {
    "和文": "犬",
    "英文": "Dog",
    "chapter": 1
  }
]
```

 ## Getting Started

```rust
# use phrase_batch::{
#     core::{
#         job::{Job, JobBuilder},
#         step::StepBuilder,
#     },
#     error::BatchError,
#     item::csv::csv_reader::CsvItemReaderBuilder,
#     item::json::json_writer::JsonItemWriterBuilder,
#     phrase::{LevelMode, PhraseProcessor, PhraseRecord},
# };
# use std::env::temp_dir;
fn main() -> Result<(), BatchError> {
    let csv = "Column1,Column2,Column3
 犬 ,Dog,1
猫, Cat ,2";

    let reader = CsvItemReaderBuilder::new().from_reader(csv.as_bytes())?;

    let processor = PhraseProcessor::new(LevelMode::Numeric);

    let writer = JsonItemWriterBuilder::new()
        .from_path::<PhraseRecord, _>(temp_dir().join("phrases.json"));

    let step = StepBuilder::new("convert")
        .reader(&reader)
        .processor(&processor)
        .writer(&writer)
        .chunk(10)
        .build()?;

    let job = JobBuilder::new().start(&step).build();
    job.run()?;

    Ok(())
}
```
 */

/// Core module for batch operations
pub mod core;

/// Error types for batch operations
pub mod error;

#[doc(inline)]
pub use error::*;

/// Phrase records and the row transformation
pub mod phrase;

/// Set of items readers / writers
pub mod item;

#[cfg(feature = "csv")]
/// Print and convert runs over a phrase list
pub mod pipeline;
