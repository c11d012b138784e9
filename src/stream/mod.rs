//! Incremental decoder for the object stream export document.
//!
//! The export is one top-level JSON array carrying, in fixed order: an
//! identifier scalar, the object record array, the value row array, and two
//! header string arrays. The decoder walks that protocol as an explicit
//! state machine and hands each record to a [`RecordSink`] the moment it is
//! decoded — the document is never materialized in memory, so peak memory
//! is bounded by one record plus whatever the sink accumulates.
//!
//! Structural violations (wrong element shape, premature end, trailing
//! data) abort immediately with an error naming the state that was being
//! read. Sink errors abort the same way and surface typed, not as
//! stringified serde messages.

use std::fmt;
use std::io::Read;

use serde::de::{self, DeserializeSeed, Deserializer, IgnoredAny, SeqAccess, Visitor};

use crate::error::RegionpolyError;
use crate::ir::{ObjectRecord, Scalar};

/// Decode positions of the export protocol, in document order. Used in
/// structural error messages to name what the decoder was expecting.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamState {
    ExpectId,
    ExpectObjects,
    ExpectRows,
    ExpectHeaders,
    ExpectLongHeaders,
    ExpectEnd,
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StreamState::ExpectId => "the leading identifier scalar",
            StreamState::ExpectObjects => "the object record array",
            StreamState::ExpectRows => "the value row array",
            StreamState::ExpectHeaders => "the short header array",
            StreamState::ExpectLongHeaders => "the long header array",
            StreamState::ExpectEnd => "the end of the export array",
        };
        f.write_str(name)
    }
}

/// Consumer of the typed records the decoder yields, one at a time and in
/// document order. Any error returned from a sink method aborts the decode.
pub trait RecordSink {
    /// The identifier scalar that leads the export array.
    fn id(&mut self, id: Scalar) -> Result<(), RegionpolyError>;

    /// One object record; called before the next record is decoded.
    fn object(&mut self, record: ObjectRecord) -> Result<(), RegionpolyError>;

    /// One tabular value row.
    fn row(&mut self, row: Vec<Scalar>) -> Result<(), RegionpolyError>;

    /// The short header list.
    fn headers(&mut self, headers: Vec<String>) -> Result<(), RegionpolyError>;

    /// The long header list.
    fn long_headers(&mut self, headers: Vec<String>) -> Result<(), RegionpolyError>;
}

/// Decodes one export document from `reader`, driving `sink`.
pub fn decode_stream<R, S>(reader: R, sink: &mut S) -> Result<(), RegionpolyError>
where
    R: Read,
    S: RecordSink,
{
    let mut state = StreamState::ExpectId;
    let mut aborted: Option<RegionpolyError> = None;

    let mut deserializer = serde_json::Deserializer::from_reader(reader);
    let result = DocumentSeed {
        state: &mut state,
        aborted: &mut aborted,
        sink,
    }
    .deserialize(&mut deserializer);

    match result {
        Ok(()) => {
            // Anything after the closing bracket is a structural error too.
            deserializer
                .end()
                .map_err(|source| RegionpolyError::Structure {
                    expected: StreamState::ExpectEnd,
                    source,
                })
        }
        Err(source) => Err(match aborted.take() {
            Some(sink_error) => sink_error,
            None => RegionpolyError::Structure {
                expected: state,
                source,
            },
        }),
    }
}

/// Stashes a sink error so it can be recovered typed after serde unwinds.
fn abort<E: de::Error>(slot: &mut Option<RegionpolyError>, error: RegionpolyError) -> E {
    let message = error.to_string();
    *slot = Some(error);
    E::custom(message)
}

/// Seed for the top-level export array; owns the state machine.
struct DocumentSeed<'a, S> {
    state: &'a mut StreamState,
    aborted: &'a mut Option<RegionpolyError>,
    sink: &'a mut S,
}

impl<'de, S: RecordSink> DeserializeSeed<'de> for DocumentSeed<'_, S> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_seq(self)
    }
}

impl<'de, S: RecordSink> Visitor<'de> for DocumentSeed<'_, S> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a top-level export array")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<(), A::Error> {
        *self.state = StreamState::ExpectId;
        let id: Scalar = seq
            .next_element()?
            .ok_or_else(|| de::Error::custom("export array ended before the identifier"))?;
        self.sink
            .id(id)
            .map_err(|e| abort(&mut *self.aborted, e))?;

        *self.state = StreamState::ExpectObjects;
        seq.next_element_seed(ObjectArraySeed {
            aborted: &mut *self.aborted,
            sink: &mut *self.sink,
        })?
        .ok_or_else(|| de::Error::custom("export array ended before the object records"))?;

        *self.state = StreamState::ExpectRows;
        seq.next_element_seed(RowArraySeed {
            aborted: &mut *self.aborted,
            sink: &mut *self.sink,
        })?
        .ok_or_else(|| de::Error::custom("export array ended before the value rows"))?;

        *self.state = StreamState::ExpectHeaders;
        let headers: Vec<String> = seq
            .next_element()?
            .ok_or_else(|| de::Error::custom("export array ended before the short headers"))?;
        self.sink
            .headers(headers)
            .map_err(|e| abort(&mut *self.aborted, e))?;

        *self.state = StreamState::ExpectLongHeaders;
        let long_headers: Vec<String> = seq
            .next_element()?
            .ok_or_else(|| de::Error::custom("export array ended before the long headers"))?;
        self.sink
            .long_headers(long_headers)
            .map_err(|e| abort(&mut *self.aborted, e))?;

        *self.state = StreamState::ExpectEnd;
        if seq.next_element::<IgnoredAny>()?.is_some() {
            return Err(de::Error::custom(
                "unexpected trailing element after the long header array",
            ));
        }
        Ok(())
    }
}

/// Seed for the object record array; each record is handed to the sink as
/// soon as it is decoded.
struct ObjectArraySeed<'a, S> {
    aborted: &'a mut Option<RegionpolyError>,
    sink: &'a mut S,
}

impl<'de, S: RecordSink> DeserializeSeed<'de> for ObjectArraySeed<'_, S> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_seq(self)
    }
}

impl<'de, S: RecordSink> Visitor<'de> for ObjectArraySeed<'_, S> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an array of object records")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<(), A::Error> {
        while let Some(record) = seq.next_element::<ObjectRecord>()? {
            self.sink
                .object(record)
                .map_err(|e| abort(&mut *self.aborted, e))?;
        }
        Ok(())
    }
}

/// Seed for the value row array.
struct RowArraySeed<'a, S> {
    aborted: &'a mut Option<RegionpolyError>,
    sink: &'a mut S,
}

impl<'de, S: RecordSink> DeserializeSeed<'de> for RowArraySeed<'_, S> {
    type Value = ();

    fn deserialize<D: Deserializer<'de>>(self, deserializer: D) -> Result<(), D::Error> {
        deserializer.deserialize_seq(self)
    }
}

impl<'de, S: RecordSink> Visitor<'de> for RowArraySeed<'_, S> {
    type Value = ();

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("an array of value rows")
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<(), A::Error> {
        while let Some(row) = seq.next_element::<Vec<Scalar>>()? {
            self.sink
                .row(row)
                .map_err(|e| abort(&mut *self.aborted, e))?;
        }
        Ok(())
    }
}
