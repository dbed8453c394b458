use crc::Crc;

use crate::header::CHECKSUM_FIELD;

/// [CRC32 error-detecting algorithm](https://en.wikipedia.org/wiki/Cyclic_redundancy_check)
/// used by the firmware to checksum stored configs.
///
/// The firmware runs the reflected `0xEDB88320` polynomial with an all-ones
/// seed and a final complement, which is exactly CRC-32/ISO-HDLC.
pub const CONFIG_CRC32: Crc<u32> = Crc::<u32>::new(&crc::CRC_32_ISO_HDLC);

/// Computes the checksum of a config blob the way the firmware does.
///
/// Every byte is covered except the header's own checksum field. Blobs
/// shorter than the header are checksummed over whatever is present.
pub fn config_checksum(blob: &[u8]) -> u32 {
    let mut digest = CONFIG_CRC32.digest();
    digest.update(&blob[..CHECKSUM_FIELD.start.min(blob.len())]);
    digest.update(blob.get(CHECKSUM_FIELD.end..).unwrap_or_default());
    digest.finalize()
}

#[cfg(test)]
mod tests {
    use super::{CONFIG_CRC32, config_checksum};

    #[test]
    fn check_value() {
        assert_eq!(CONFIG_CRC32.checksum(b"123456789"), 0xCBF4_3926);
    }

    #[test]
    fn skips_checksum_field() {
        let mut blob = [0x5Au8; 32];
        let before = config_checksum(&blob);

        blob[8..12].copy_from_slice(&[0xDE, 0xAD, 0xBE, 0xEF]);
        assert_eq!(config_checksum(&blob), before);

        blob[12] = 0;
        assert_ne!(config_checksum(&blob), before);
    }

    #[test]
    fn short_blob() {
        // Only the first 8 bytes are covered; nothing panics.
        assert_eq!(config_checksum(&[1, 2, 3]), CONFIG_CRC32.checksum(&[1, 2, 3]));
        assert_eq!(
            config_checksum(&[1, 2, 3, 4, 5, 6, 7, 8, 9, 10]),
            CONFIG_CRC32.checksum(&[1, 2, 3, 4, 5, 6, 7, 8])
        );
    }
}
