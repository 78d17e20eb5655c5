//! In-memory columnar tables and the parquet codec.

use arrow::datatypes::SchemaRef;
use arrow::record_batch::RecordBatch;
use bytes::Bytes;
use parquet::arrow::ArrowWriter;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;
use snafu::prelude::*;

use crate::error::{BatchReadSnafu, DecodeSnafu, EncodeSnafu, TableError};

/// An in-memory columnar table: an Arrow schema plus its record batches.
#[derive(Debug, Clone)]
pub struct Table {
    schema: SchemaRef,
    batches: Vec<RecordBatch>,
}

impl Table {
    pub fn new(schema: SchemaRef, batches: Vec<RecordBatch>) -> Self {
        Self { schema, batches }
    }

    pub fn schema(&self) -> &SchemaRef {
        &self.schema
    }

    pub fn batches(&self) -> &[RecordBatch] {
        &self.batches
    }

    /// Column names in schema order.
    pub fn column_names(&self) -> Vec<String> {
        self.schema
            .fields()
            .iter()
            .map(|field| field.name().clone())
            .collect()
    }

    /// Total row count across all batches.
    pub fn num_rows(&self) -> usize {
        self.batches.iter().map(RecordBatch::num_rows).sum()
    }
}

/// Reads and writes tables as parquet bytes.
pub struct TableCodec;

impl TableCodec {
    /// Decode parquet bytes into a table.
    ///
    /// `path` is carried for error context only.
    pub fn decode(bytes: Bytes, path: &str) -> Result<Table, TableError> {
        let builder =
            ParquetRecordBatchReaderBuilder::try_new(bytes).context(DecodeSnafu { path })?;
        let schema = builder.schema().clone();
        let reader = builder.build().context(DecodeSnafu { path })?;

        let batches = reader
            .collect::<Result<Vec<_>, _>>()
            .context(BatchReadSnafu { path })?;

        Ok(Table::new(schema, batches))
    }

    /// Encode a table as snappy-compressed parquet bytes.
    pub fn encode(table: &Table) -> Result<Bytes, TableError> {
        let props = WriterProperties::builder()
            .set_compression(Compression::SNAPPY)
            .build();

        let mut buf = Vec::new();
        let mut writer = ArrowWriter::try_new(&mut buf, table.schema().clone(), Some(props))
            .context(EncodeSnafu)?;

        for batch in table.batches() {
            writer.write(batch).context(EncodeSnafu)?;
        }
        writer.close().context(EncodeSnafu)?;

        Ok(Bytes::from(buf))
    }
}
