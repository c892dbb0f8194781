//! Typed SBF blocks.
//!
//! Each block is declared with [`sbf_block!`] as a list of `offset => field: type`
//! entries. Offsets count from the first sync byte, so they match the
//! receiver reference guide tables directly. Fields are read one by one in
//! little-endian order; nothing is reinterpreted in place.

use num_traits::{Float, NumCast, PrimInt, Unsigned};

use crate::{
    constants::{
        FLOAT_DO_NOT_USE, SBF_BLOCK_NUMBER_MASK, SBF_CHECKSUM_OFFSET, SBF_ID_OFFSET,
        SBF_LENGTH_OFFSET, SBF_REVISION_SHIFT, SBF_SYNC_CHAR_2, SYNC_CHAR_1,
    },
    parser::sbf_checksum,
    ParserError,
};

/// Fixed-layout scalar stored little-endian inside a block
pub trait LeField: Copy {
    const SIZE: usize;

    /// Reads the value from the start of `bytes`.
    fn read_le(bytes: &[u8]) -> Self;

    /// Writes the value to the start of `out`.
    fn write_le(self, out: &mut [u8]);
}

macro_rules! impl_le_field {
    ($($ty:ty),*) => {
        $(
            impl LeField for $ty {
                const SIZE: usize = core::mem::size_of::<$ty>();

                fn read_le(bytes: &[u8]) -> Self {
                    let mut raw = [0u8; core::mem::size_of::<$ty>()];
                    raw.copy_from_slice(&bytes[..Self::SIZE]);
                    <$ty>::from_le_bytes(raw)
                }

                fn write_le(self, out: &mut [u8]) {
                    out[..Self::SIZE].copy_from_slice(&self.to_le_bytes());
                }
            }
        )*
    };
}

impl_le_field!(u8, i8, u16, i16, u32, i32, f32, f64);

/// Common interface of all typed SBF blocks
pub trait SbfBlock: Sized {
    const NAME: &'static str;
    /// Block number, without revision bits
    const NUMBER: u16;
    /// Minimal length in bytes, header included. Longer blocks carry padding.
    const LEN: usize;

    /// Decodes a complete block. Checksum validation is the caller's job.
    fn parse(block: &[u8]) -> Result<Self, ParserError>;

    /// Receiver time of week in milliseconds
    fn tow(&self) -> u32;

    /// Revision taken from the upper bits of the ID field
    fn revision(&self) -> u8;

    /// Bytes past `LEN` in a longer block
    fn padding(&self) -> &[u8];

    /// Writes the fields into a zeroed block of at least `LEN` bytes.
    fn write_fields(&self, block: &mut [u8]);

    /// Encodes the block with header, padding and a valid checksum.
    fn to_bytes(&self) -> Vec<u8> {
        let padding = self.padding();
        let len = Self::LEN + padding.len();
        let mut block = vec![0u8; len];
        block[0] = SYNC_CHAR_1;
        block[1] = SBF_SYNC_CHAR_2;
        let id = (Self::NUMBER & SBF_BLOCK_NUMBER_MASK)
            | (<u16 as From<u8>>::from(self.revision() & 0x07) << SBF_REVISION_SHIFT);
        id.write_le(&mut block[SBF_ID_OFFSET..]);
        // parsed blocks never exceed SBF_MAX_BLOCK_LEN
        (len as u16).write_le(&mut block[SBF_LENGTH_OFFSET..]);
        self.write_fields(&mut block);
        block[Self::LEN..].copy_from_slice(padding);
        let crc = sbf_checksum(&block[SBF_ID_OFFSET..]);
        crc.write_le(&mut block[SBF_CHECKSUM_OFFSET..]);
        block
    }
}

pub(crate) fn block_revision(block: &[u8]) -> u8 {
    (u16::read_le(&block[SBF_ID_OFFSET..]) >> SBF_REVISION_SHIFT) as u8
}

/// `None` if a float field holds the "do not use" value.
pub fn float_or_dnu<T: Float>(value: T) -> Option<T> {
    let dnu: T = <T as NumCast>::from(FLOAT_DO_NOT_USE)?;
    (value != dnu).then_some(value)
}

/// `None` if an unsigned field holds its all-ones "do not use" value.
pub fn unsigned_or_dnu<T: PrimInt + Unsigned>(value: T) -> Option<T> {
    (value != T::max_value()).then_some(value)
}

/// Declares a block struct and its [`SbfBlock`] implementation.
macro_rules! sbf_block {
    (
        $(#[$meta:meta])*
        $name:ident, number = $number:literal, len = $len:literal {
            $(
                $(#[$fmeta:meta])*
                $offset:literal => $field:ident : $ty:ty
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Default, PartialEq)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        pub struct $name {
            pub revision: u8,
            $(
                $(#[$fmeta])*
                pub $field: $ty,
            )*
            /// Bytes after the known fields, as received
            pub padding: Vec<u8>,
        }

        impl $crate::blocks::SbfBlock for $name {
            const NAME: &'static str = stringify!($name);
            const NUMBER: u16 = $number;
            const LEN: usize = $len;

            fn parse(block: &[u8]) -> Result<Self, $crate::ParserError> {
                if block.len() < Self::LEN {
                    return Err($crate::ParserError::InvalidPacketLen {
                        packet: Self::NAME,
                        expect: Self::LEN,
                        got: block.len(),
                    });
                }
                Ok(Self {
                    revision: $crate::blocks::block_revision(block),
                    $(
                        $field: <$ty as $crate::blocks::LeField>::read_le(&block[$offset..]),
                    )*
                    padding: block[Self::LEN..].to_vec(),
                })
            }

            fn tow(&self) -> u32 {
                self.tow
            }

            fn revision(&self) -> u8 {
                self.revision
            }

            fn padding(&self) -> &[u8] {
                &self.padding
            }

            fn write_fields(&self, block: &mut [u8]) {
                $(
                    $crate::blocks::LeField::write_le(self.$field, &mut block[$offset..]);
                )*
            }
        }
    };
}

mod att_cov_euler;
mod att_euler;
mod pos_cov_geodetic;
mod pvt_cartesian;
mod pvt_geodetic;
mod types;

pub use att_cov_euler::AttCovEuler;
pub use att_euler::AttEuler;
pub use pos_cov_geodetic::PosCovGeodetic;
pub use pvt_cartesian::PvtCartesian;
pub use pvt_geodetic::PvtGeodetic;
pub use types::{AttitudeMode, PvtError, PvtModeFlags, PvtSolution};
