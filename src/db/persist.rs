use rusqlite::types::ToSql;
use tracing::{info, warn};

use crate::db::Store;
use crate::fields::{descriptor, FIELDS, LISTINGS, PICTURES, PICTURE_FIELD, SELLERS};
use crate::models::{DraftRecord, FieldValue};

/// Collect (column, value) pairs for the scalar draft fields bound to
/// `table`, in descriptor-table order.
fn table_group<'a>(record: &'a DraftRecord, table: &str) -> (Vec<&'static str>, Vec<&'a dyn ToSql>) {
    let mut columns = Vec::new();
    let mut values: Vec<&dyn ToSql> = Vec::new();
    for desc in FIELDS {
        if desc.table != table {
            continue;
        }
        match record.get(desc.name) {
            Some(FieldValue::Scalar(value)) => {
                columns.push(desc.column);
                values.push(value);
            }
            Some(FieldValue::Many(_)) => {
                warn!(
                    "Field {} has multiple values, cannot store in column {}.{}",
                    desc.name, desc.table, desc.column
                );
            }
            None => {}
        }
    }
    (columns, values)
}

/// Write one draft record across the three tables: seller first (to get its
/// id), then the listing (embedding seller id and canonical URL), then one
/// row per picture URL (embedding the listing id).
///
/// Each insert is a single atomic statement; there is no cross-table
/// transaction, so an earlier row survives a later failure. A failed insert
/// is logged and yields no id; pictures are skipped entirely when the
/// listing row was not written.
pub fn persist(store: &Store, record: &DraftRecord) {
    info!("Saving listing fields for {} into the database...", record.page_url);

    let (columns, values) = table_group(record, SELLERS);
    let seller_id = store.insert(SELLERS, &columns, &values);

    let (mut columns, mut values) = table_group(record, LISTINGS);
    columns.push("seller_id");
    values.push(&seller_id);
    columns.push("page_url");
    values.push(&record.page_url);
    let listing_id = store.insert(LISTINGS, &columns, &values);

    let Some(listing_id) = listing_id else {
        warn!(
            "Listing row for {} was not written, skipping its pictures",
            record.page_url
        );
        return;
    };

    if let Some(pictures) = record.get(PICTURE_FIELD) {
        let column = descriptor(PICTURE_FIELD).map_or("picture_url", |d| d.column);
        for picture_url in pictures.values() {
            store.insert(PICTURES, &["listing_id", column], &[&listing_id, picture_url]);
        }
    }

    info!("Saved {}", record.page_url);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing::temp_store;
    use crate::models::DraftRecord;

    fn full_record(url: &str) -> DraftRecord {
        let mut record = DraftRecord::new(url);
        record
            .fields
            .insert("title", FieldValue::Scalar("iPhone 12".into()));
        record
            .fields
            .insert("price", FieldValue::Scalar("5000 грн".into()));
        record
            .fields
            .insert("seller_name", FieldValue::Scalar("Oleh".into()));
        record.fields.insert(
            PICTURE_FIELD,
            FieldValue::Many(vec!["a.jpg".into(), "b.jpg".into()]),
        );
        record
    }

    #[test]
    fn persist_writes_all_three_tables_in_dependency_order() {
        let store = temp_store("persist_full");
        persist(&store, &full_record("https://example.com/ad/1"));

        let conn = store.test_conn();
        let (listing_id, seller_id, title): (i64, i64, String) = conn
            .query_row(
                "SELECT id, seller_id, title FROM listings WHERE page_url = ?1",
                ["https://example.com/ad/1"],
                |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?)),
            )
            .unwrap();
        assert_eq!(title, "iPhone 12");

        let seller_name: String = conn
            .query_row("SELECT name FROM sellers WHERE id = ?1", [seller_id], |r| {
                r.get(0)
            })
            .unwrap();
        assert_eq!(seller_name, "Oleh");

        let pictures: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM listing_pictures WHERE listing_id = ?1",
                [listing_id],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(pictures, 2);
    }

    #[test]
    fn empty_seller_group_still_creates_a_seller_row() {
        let store = temp_store("persist_no_seller");
        let mut record = DraftRecord::new("https://example.com/ad/2");
        record
            .fields
            .insert("title", FieldValue::Scalar("bare".into()));
        persist(&store, &record);

        let conn = store.test_conn();
        let sellers: i64 = conn
            .query_row("SELECT COUNT(*) FROM sellers", [], |r| r.get(0))
            .unwrap();
        assert_eq!(sellers, 1);
        let seller_id: Option<i64> = conn
            .query_row(
                "SELECT seller_id FROM listings WHERE page_url = ?1",
                ["https://example.com/ad/2"],
                |r| r.get(0),
            )
            .unwrap();
        assert!(seller_id.is_some());
    }

    #[test]
    fn repeat_persist_for_same_url_adds_no_listing_row() {
        let store = temp_store("persist_repeat");
        let record = full_record("https://example.com/ad/3");
        persist(&store, &record);
        persist(&store, &record);

        let conn = store.test_conn();
        let listings: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM listings WHERE page_url = ?1",
                ["https://example.com/ad/3"],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(listings, 1);
        // Failed second listing insert must not leave dangling pictures
        let pictures: i64 = conn
            .query_row("SELECT COUNT(*) FROM listing_pictures", [], |r| r.get(0))
            .unwrap();
        assert_eq!(pictures, 2);
    }

    #[test]
    fn multi_valued_scalar_column_is_skipped_not_fatal() {
        let store = temp_store("persist_multi");
        let mut record = full_record("https://example.com/ad/4");
        record.fields.insert(
            "seller_name",
            FieldValue::Many(vec!["one".into(), "two".into()]),
        );
        persist(&store, &record);

        let conn = store.test_conn();
        let seller_name: Option<String> = conn
            .query_row("SELECT name FROM sellers LIMIT 1", [], |r| r.get(0))
            .unwrap();
        assert!(seller_name.is_none());
        assert!(store.listing_exists("https://example.com/ad/4"));
    }
}
