use crate::{
    buffer::Buffer,
    error::Result,
    raw::BsonRef,
    spec::{BinarySubtype, ElementType},
};

/// Writes the type tag and field name of an element.
pub(super) fn write_key(buf: &mut Buffer, element_type: ElementType, name: &str) -> Result<()> {
    buf.append_u8(element_type as u8)?;
    buf.append_cstring(name)
}

/// Writes one complete element. On failure the buffer is rolled back to where the element
/// started, so a failed append never leaves a partial element behind.
pub(super) fn write_element(buf: &mut Buffer, name: &str, value: BsonRef<'_>) -> Result<()> {
    let start = buf.len();
    let result = write_key(buf, value.element_type(), name).and_then(|_| write_value(buf, value));
    if result.is_err() {
        buf.truncate(start);
    }
    result
}

/// Writes an already encoded payload under a new name.
pub(super) fn write_encoded(
    buf: &mut Buffer,
    element_type: ElementType,
    name: &str,
    payload: &[u8],
) -> Result<()> {
    let start = buf.len();
    let result = write_key(buf, element_type, name).and_then(|_| buf.append(payload));
    if result.is_err() {
        buf.truncate(start);
    }
    result
}

fn write_value(buf: &mut Buffer, value: BsonRef<'_>) -> Result<()> {
    match value {
        BsonRef::Int32(i) => buf.append_i32(i),
        BsonRef::String(s) => buf.append_string(s),
        BsonRef::Document(d) => buf.append(d.as_bytes()),
        BsonRef::Array(a) => buf.append(a.as_bytes()),
        BsonRef::Binary(b) => {
            let len = b.len();
            buf.append_i32(len)?;
            buf.append_u8(b.subtype.into())?;
            if let BinarySubtype::BinaryOld = b.subtype {
                buf.append_i32(len - 4)?;
            }
            buf.append(b.bytes)
        }
        BsonRef::Boolean(b) => buf.append_u8(b as u8),
        BsonRef::DateTime(dt) => buf.append_i64(dt.timestamp_millis()),
        BsonRef::DbPointer(dbp) => {
            buf.append_string(dbp.namespace)?;
            buf.append(&dbp.id.bytes())
        }
        BsonRef::Decimal128(d) => buf.append(&d.bytes()),
        BsonRef::Double(d) => buf.append_f64(d),
        BsonRef::Int64(i) => buf.append_i64(i),
        BsonRef::RegularExpression(re) => {
            buf.append_cstring(re.pattern)?;
            buf.append_cstring(re.options)
        }
        BsonRef::JavaScriptCode(js) => buf.append_string(js),
        BsonRef::JavaScriptCodeWithScope(code_w_scope) => {
            buf.append_i32(code_w_scope.len())?;
            buf.append_string(code_w_scope.code)?;
            buf.append(code_w_scope.scope.as_bytes())
        }
        BsonRef::Timestamp(ts) => buf.append(&ts.to_le_bytes()),
        BsonRef::ObjectId(oid) => buf.append(&oid.bytes()),
        BsonRef::Symbol(s) => buf.append_string(s),
        BsonRef::Null | BsonRef::Undefined | BsonRef::MinKey | BsonRef::MaxKey => Ok(()),
    }
}
