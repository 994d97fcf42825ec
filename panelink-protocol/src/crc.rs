//! CRC-16 used by the panel link
//!
//! The panel firmware checks frames with CRC-16/MODBUS: initial value
//! 0xFFFF, reflected polynomial 0xA001, no final XOR.

/// CRC-16/MODBUS initial register value
const CRC_INIT: u16 = 0xFFFF;

/// Reflected form of polynomial 0x8005
const CRC_POLY_REFLECTED: u16 = 0xA001;

/// Compute the CRC-16 of `data`
pub fn crc16(data: &[u8]) -> u16 {
    let mut crc = CRC_INIT;
    for &byte in data {
        crc ^= byte as u16;
        for _ in 0..8 {
            if crc & 0x0001 != 0 {
                crc = (crc >> 1) ^ CRC_POLY_REFLECTED;
            } else {
                crc >>= 1;
            }
        }
    }
    crc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crc16_check_value() {
        // Standard check input for CRC catalogues
        assert_eq!(crc16(b"123456789"), 0x4B37);
    }

    #[test]
    fn test_crc16_empty() {
        assert_eq!(crc16(&[]), 0xFFFF);
    }

    #[test]
    fn test_crc16_detects_order() {
        assert_ne!(crc16(&[0x01, 0x02]), crc16(&[0x02, 0x01]));
    }
}
