use speedgate_types::RecordList;

/// Orders records ascending by label.
///
/// Byte-wise comparison: case-sensitive and independent of locale. The sort is
/// stable, so records sharing a label keep their relative order.
pub fn sort_by_label(mut records: RecordList) -> RecordList {
    records.sort_by(|a, b| a.label.cmp(&b.label));
    records
}
