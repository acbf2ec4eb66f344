/// JSON emission.
///
/// [`JsonItemWriter`] collects every item of a step and writes them once, as
/// a pretty-printed JSON array, when the step completes successfully.
///
/// # Examples
///
/// ```
/// use phrase_batch::item::json::json_writer::JsonItemWriterBuilder;
/// use phrase_batch::core::item::ItemWriter;
/// use phrase_batch::phrase::{Level, PhraseRecord};
///
/// let path = std::env::temp_dir().join("phrase_batch_doc_example.json");
///
/// let writer = JsonItemWriterBuilder::new().from_path::<PhraseRecord, _>(&path);
///
/// let records = vec![PhraseRecord {
///     japanese: "犬".to_string(),
///     english: "Dog".to_string(),
///     level: Level::Numeric(1),
/// }];
///
/// writer.open().unwrap();
/// writer.write(&records).unwrap();
/// writer.close().unwrap();
///
/// // [
/// //   {
/// //     "和文": "犬",
/// //     "英文": "Dog",
/// //     "chapter": 1
/// //   }
/// // ]
/// # std::fs::remove_file(&path).unwrap();
/// ```
pub mod json_writer;

pub use json_writer::{JsonItemWriter, JsonItemWriterBuilder};
