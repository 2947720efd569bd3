//! Records - rows decoded into ordered field-name-to-value maps

use serde_json::{Map, Value};
use sqlx::any::AnyRow;
use sqlx::{Column, Row, TypeInfo, ValueRef};

/// One storage row, keyed by column name in storage order.
pub type Record = Map<String, Value>;

/// Column-to-value input for inserts and updates, iterated in insertion order.
pub type Fields = Map<String, Value>;

/// Decode every column of a row into a [`Record`].
pub fn decode_row(row: &AnyRow) -> Result<Record, sqlx::Error> {
    let mut record = Record::new();
    for column in row.columns() {
        let value = decode_column(row, column.ordinal())?;
        record.insert(column.name().to_owned(), value);
    }
    Ok(record)
}

fn decode_column(row: &AnyRow, index: usize) -> Result<Value, sqlx::Error> {
    let raw = row.try_get_raw(index)?;
    if raw.is_null() {
        return Ok(Value::Null);
    }

    let type_name = raw.type_info().name().to_owned();
    let value = match type_name.as_str() {
        "BOOLEAN" => Value::from(row.try_get::<bool, _>(index)?),
        "SMALLINT" => Value::from(row.try_get::<i16, _>(index)?),
        "INTEGER" => Value::from(row.try_get::<i32, _>(index)?),
        "BIGINT" => Value::from(row.try_get::<i64, _>(index)?),
        "REAL" => Value::from(row.try_get::<f32, _>(index)?),
        "DOUBLE" => Value::from(row.try_get::<f64, _>(index)?),
        "BLOB" => blob_value(row.try_get::<Vec<u8>, _>(index)?),
        _ => Value::from(row.try_get::<String, _>(index)?),
    };
    Ok(value)
}

/// MySQL reports TEXT columns as BLOB through the Any driver, so valid
/// UTF-8 is served as a string and anything else as a byte array.
fn blob_value(bytes: Vec<u8>) -> Value {
    match String::from_utf8(bytes) {
        Ok(text) => Value::String(text),
        Err(e) => Value::from(e.into_bytes()),
    }
}

/// Integer `id` of a record, if it has one.
pub fn record_id(record: &Record) -> Option<i64> {
    record.get("id").and_then(Value::as_i64)
}
