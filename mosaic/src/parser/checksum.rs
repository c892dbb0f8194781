use crc::{Crc, Digest, CRC_16_XMODEM};

use crate::{
    constants::{SBF_CHECKSUM_OFFSET, SBF_ID_OFFSET, SBF_LENGTH_OFFSET},
    ParserError,
};

/// CRC-CCITT as used by SBF: polynomial 0x1021, zero initial value, no reflection.
static SBF_CRC: Crc<u16> = Crc::<u16>::new(&CRC_16_XMODEM);

/// Single-shot SBF checksum over `bytes`.
pub fn sbf_checksum(bytes: &[u8]) -> u16 {
    SBF_CRC.checksum(bytes)
}

/// SBF checksum calculator supporting both streaming and single-shot validation
pub(crate) struct SbfChecksumCalc {
    digest: Digest<'static, u16>,
}

impl Default for SbfChecksumCalc {
    fn default() -> Self {
        Self::new()
    }
}

impl SbfChecksumCalc {
    pub(crate) fn new() -> Self {
        Self {
            digest: SBF_CRC.digest(),
        }
    }

    pub(crate) fn update(&mut self, bytes: &[u8]) {
        self.digest.update(bytes);
    }

    pub(crate) fn result(self) -> u16 {
        self.digest.finalize()
    }

    pub(crate) fn validate_result(self, received: u16) -> Result<(), ParserError> {
        let calculated = self.result();
        if calculated == received {
            Ok(())
        } else {
            Err(ParserError::InvalidChecksum {
                expect: received,
                got: calculated,
            })
        }
    }

    /// Validates a complete block whose slice ends at its declared length.
    ///
    /// The CRC covers everything after the checksum field: ID, length and body.
    pub(crate) fn validate_block(block: &[u8]) -> Result<(), ParserError> {
        debug_assert!(block.len() >= SBF_LENGTH_OFFSET + 2);
        let received = u16::from_le_bytes([
            block[SBF_CHECKSUM_OFFSET],
            block[SBF_CHECKSUM_OFFSET + 1],
        ]);
        let mut calc = Self::new();
        calc.update(&block[SBF_ID_OFFSET..]);
        calc.validate_result(received)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::{SBF_SYNC_CHAR_2, SYNC_CHAR_1};

    // 12-byte block: ID 4007 rev 0, length 12, 4 byte body
    fn valid_block() -> [u8; 12] {
        let mut block = [
            SYNC_CHAR_1,
            SBF_SYNC_CHAR_2,
            0x00,
            0x00, // checksum placeholder
            0xa7,
            0x0f, // ID
            0x0c,
            0x00, // length
            0x01,
            0x02,
            0x03,
            0x04,
        ];
        let crc = sbf_checksum(&block[4..]);
        block[2..4].copy_from_slice(&crc.to_le_bytes());
        block
    }

    #[test]
    fn test_xmodem_check_value() {
        // Standard check value of CRC-16/XMODEM
        assert_eq!(sbf_checksum(b"123456789"), 0x31c3);
    }

    #[test]
    fn test_block_validation_valid() {
        assert_eq!(SbfChecksumCalc::validate_block(&valid_block()), Ok(()));
    }

    #[test]
    fn test_block_validation_single_bit_flip() {
        let mut block = valid_block();
        block[9] ^= 0x10;
        let err = SbfChecksumCalc::validate_block(&block).unwrap_err();
        if let ParserError::InvalidChecksum { expect, got } = err {
            assert_ne!(expect, got);
        } else {
            panic!("unexpected error {err:?}");
        }
    }

    #[test]
    fn test_checksum_field_not_covered() {
        let block = valid_block();
        let mut tampered = block;
        tampered[2] ^= 0xff;
        // the stored value changed, the calculated one did not
        let err = SbfChecksumCalc::validate_block(&tampered).unwrap_err();
        assert_eq!(
            err,
            ParserError::InvalidChecksum {
                expect: u16::from_le_bytes([tampered[2], tampered[3]]),
                got: u16::from_le_bytes([block[2], block[3]]),
            }
        );
    }

    #[test]
    fn test_streaming_vs_single_shot() {
        let block = valid_block();
        let mut calc = SbfChecksumCalc::new();
        calc.update(&block[4..6]);
        calc.update(&block[6..8]);
        calc.update(&block[8..]);
        assert_eq!(calc.result(), sbf_checksum(&block[4..]));
    }
}
