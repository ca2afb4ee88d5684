//! Row normalization

use crate::models::DeviceRecord;
use crate::parser::ColumnIndices;
use csv::StringRecord;
use devicenames_common::DeviceKey;

/// Build a [`DeviceRecord`] from a data row.
///
/// Returns `None` when the row is too short to hold every required column.
/// Fields past the required ones are ignored. Branding and model are
/// lowercased through [`DeviceKey`]; the marketing name is copied verbatim.
pub fn normalize(record: &StringRecord, columns: &ColumnIndices) -> Option<DeviceRecord> {
    if record.len() < columns.min_field_count() {
        return None;
    }

    let retail_branding = record.get(columns.retail_branding)?;
    let marketing_name = record.get(columns.marketing_name)?;
    let model = record.get(columns.model)?;

    Some(DeviceRecord {
        key: DeviceKey::new(retail_branding, model),
        marketing_name: marketing_name.to_string(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const COLUMNS: ColumnIndices = ColumnIndices {
        retail_branding: 0,
        marketing_name: 1,
        model: 3,
    };

    #[test]
    fn test_keys_are_lowercased_and_name_preserved() {
        let row = StringRecord::from(vec!["Samsung", "Galaxy S21 5G", "o1s", "SM-G991B"]);
        let device = normalize(&row, &COLUMNS).unwrap();
        assert_eq!(device.retail_branding(), "samsung");
        assert_eq!(device.model(), "sm-g991b");
        assert_eq!(device.marketing_name, "Galaxy S21 5G");
    }

    #[test]
    fn test_short_row_is_rejected() {
        let row = StringRecord::from(vec!["Samsung", "Galaxy S21 5G", "o1s"]);
        assert!(normalize(&row, &COLUMNS).is_none());
    }

    #[test]
    fn test_extra_fields_are_ignored() {
        let row = StringRecord::from(vec!["Google", "Pixel 8", "shiba", "Pixel 8", "x", "y"]);
        let device = normalize(&row, &COLUMNS).unwrap();
        assert_eq!(device.model(), "pixel 8");
        assert_eq!(device.marketing_name, "Pixel 8");
    }

    #[test]
    fn test_fields_are_not_trimmed() {
        let row = StringRecord::from(vec![" Acme", " Phone ", "d", "M1 "]);
        let device = normalize(&row, &COLUMNS).unwrap();
        assert_eq!(device.retail_branding(), " acme");
        assert_eq!(device.marketing_name, " Phone ");
        assert_eq!(device.model(), "m1 ");
    }
}
