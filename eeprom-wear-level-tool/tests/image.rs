use eeprom_wear_level::{RegionConfig, WriteOutcome};
use eeprom_wear_level_tool::{ByteOrder, EepromImage, Record, inspect, write_value};
use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

fn region() -> RegionConfig {
    RegionConfig::new(0x10, 0x1F)
}

#[test]
fn written_values_survive_a_file_roundtrip() {
    let mut image = EepromImage::new(64).unwrap();
    for value in [5, 12, 9, 20] {
        write_value(&mut image, region(), ByteOrder::Big, value).unwrap();
    }

    let file = NamedTempFile::new().unwrap();
    image.to_file(file.path()).unwrap();
    let mut image = EepromImage::from_file(file.path()).unwrap();
    assert_eq!(image.len(), 64);

    let report = inspect(&mut image, region(), ByteOrder::Big).unwrap();
    assert_eq!(report.highest, 20);
    assert_eq!(report.cursor, Some(0x18));
    assert_eq!(
        report.records,
        vec![
            Record {
                address: 0x10,
                value: 5,
                raw: "00000005".to_string(),
                cursor: false,
            },
            Record {
                address: 0x14,
                value: 12,
                raw: "0000000c".to_string(),
                cursor: false,
            },
            Record {
                address: 0x18,
                value: 20,
                raw: "00000014".to_string(),
                cursor: true,
            },
            Record {
                address: 0x1C,
                value: 0,
                raw: "00000000".to_string(),
                cursor: false,
            },
        ]
    );
}

#[test]
fn write_reports_outcome() {
    let mut image = EepromImage::new(64).unwrap();
    let config = region().with_overflow_ceiling(100);

    assert_eq!(
        write_value(&mut image, config, ByteOrder::Little, 50).unwrap(),
        WriteOutcome::Written { address: 0x10 }
    );
    assert_eq!(image.as_bytes()[0x10..0x14].to_vec(), vec![50, 0, 0, 0]);
    assert_eq!(
        write_value(&mut image, config, ByteOrder::Little, 50).unwrap(),
        WriteOutcome::RejectedStale { highest: 50 }
    );
    assert_eq!(
        write_value(&mut image, config, ByteOrder::Little, 101).unwrap(),
        WriteOutcome::ResetPerformed
    );
    assert!(image.as_bytes().iter().all(|&b| b == 0));
}

#[test]
fn csv_export() {
    let mut image = EepromImage::new(32).unwrap();
    let config = RegionConfig::new(0, 7).with_record_size(2);
    write_value(&mut image, config, ByteOrder::Big, 0x0102).unwrap();

    let report = inspect(&mut image, config, ByteOrder::Big).unwrap();
    let expected = "\
address,value,raw,cursor
0,258,0102,true
2,0,0000,false
4,0,0000,false
6,0,0000,false
";
    assert_eq!(report.to_csv().unwrap(), expected);

    let file = NamedTempFile::new().unwrap();
    report.to_csv_file(file.path()).unwrap();
    assert_eq!(std::fs::read_to_string(file.path()).unwrap(), expected);
}

#[test]
fn clearing() {
    let mut image = EepromImage::from_bytes(vec![0xFF; 48]).unwrap();

    eeprom_wear_level_tool::clear_range(&mut image, region()).unwrap();
    assert!(image.as_bytes()[0x10..0x20].iter().all(|&b| b == 0));
    assert!(image.as_bytes()[..0x10].iter().all(|&b| b == 0xFF));
    assert!(image.as_bytes()[0x20..].iter().all(|&b| b == 0xFF));

    eeprom_wear_level_tool::clear_whole_storage(&mut image).unwrap();
    assert!(image.as_bytes().iter().all(|&b| b == 0));
}

#[test]
fn wipe_image_smaller_than_a_record() {
    let mut image = EepromImage::from_bytes(vec![0xAB; 3]).unwrap();
    eeprom_wear_level_tool::clear_whole_storage(&mut image).unwrap();
    assert_eq!(image.as_bytes().to_vec(), vec![0, 0, 0]);

    let mut image = EepromImage::new(1).unwrap();
    eeprom_wear_level_tool::clear_whole_storage(&mut image).unwrap();
    assert_eq!(image.as_bytes().to_vec(), vec![0]);
}

#[test]
fn invalid_region_is_reported() {
    let mut image = EepromImage::new(16).unwrap();
    let result = inspect(&mut image, RegionConfig::new(32, 40), ByteOrder::Big);
    assert!(matches!(
        result,
        Err(eeprom_wear_level_tool::Error::WearLeveling(
            eeprom_wear_level::error::Error::AddressOutOfRange(32)
        ))
    ));
}
