//! CSV/TSV ingest and export (spec §6).

use crate::error::IoError;
use kgl_core::{RawTriple, TripleStore};
use std::io::{Read, Write};

/// Reads `subject, predicate, object` rows from `reader` and adds each to
/// `store`. Empty rows and rows failing validation are skipped; `add`
/// already implements that skip behavior in non-strict mode.
pub fn ingest(
    reader: impl Read,
    delimiter: u8,
    store: &mut TripleStore,
    namespace: &str,
) -> Result<usize, IoError> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut inserted = 0;
    for record in rdr.records() {
        let record = record?;
        if record.len() < 3 {
            tracing::debug!(fields = record.len(), "skipping short csv row");
            continue;
        }
        let (subject, predicate, object) = (&record[0], &record[1], &record[2]);
        if subject.trim().is_empty() && object.trim().is_empty() {
            tracing::debug!("skipping csv row with empty subject and object");
            continue;
        }
        inserted += store.add(RawTriple::new(subject, predicate, object), namespace)?;
    }
    Ok(inserted)
}

/// Writes every triple in `namespace`, in insertion order, as one row per
/// edge using `delimiter`.
pub fn export(writer: impl Write, delimiter: u8, store: &TripleStore, namespace: &str) -> Result<(), IoError> {
    let mut wtr = csv::WriterBuilder::new().delimiter(delimiter).from_writer(writer);
    for triple in store.triples(namespace) {
        wtr.write_record([
            triple.subject.as_str(),
            triple.predicate.as_str(),
            triple.object.as_str(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub const CSV_DELIMITER: u8 = b',';
pub const TSV_DELIMITER: u8 = b'\t';

#[cfg(test)]
mod tests {
    use super::*;
    use kgl_core::{StoreConfig, DEFAULT_NAMESPACE};

    #[test]
    fn ingests_csv_rows() {
        let mut store = TripleStore::new(StoreConfig::default());
        let data = "James,Likes,Coffee\nAnna,Likes,Tea\n";
        let n = ingest(data.as_bytes(), CSV_DELIMITER, &mut store, DEFAULT_NAMESPACE).unwrap();
        assert_eq!(n, 2);
        assert_eq!(store.triples(DEFAULT_NAMESPACE).len(), 2);
    }

    #[test]
    fn skips_short_rows() {
        let mut store = TripleStore::new(StoreConfig::default());
        let data = "James,Likes\n";
        let n = ingest(data.as_bytes(), CSV_DELIMITER, &mut store, DEFAULT_NAMESPACE).unwrap();
        assert_eq!(n, 0);
    }

    #[test]
    fn export_round_trips_insertion_order() {
        let mut store = TripleStore::new(StoreConfig::default());
        store.add(RawTriple::new("james", "likes", "coffee"), DEFAULT_NAMESPACE).unwrap();
        store.add(RawTriple::new("anna", "likes", "tea"), DEFAULT_NAMESPACE).unwrap();

        let mut buf = Vec::new();
        export(&mut buf, CSV_DELIMITER, &store, DEFAULT_NAMESPACE).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "james,likes,coffee\nanna,likes,tea\n");
    }
}
