//! Fixed-layout frame decoder.
//!
//! The buffer length is checked once against [`FRAME_LEN`] before any field
//! is read, so every read below stays in bounds. Bytes beyond the fixed
//! layout are ignored. Numeric values pass through untouched, NaN and
//! infinities included.

use std::io::{Cursor, Read};

use byteorder::{LittleEndian, ReadBytesExt};

use crate::error::DecodeError;
use crate::frame::{DecodedFrame, FrameHeader, ItemRecord, Vec3, FRAME_LEN, HEADER_LEN, ITEM_LEN, NAME_LEN};

/// Decode one frame from the start of `data`.
pub fn decode(data: &[u8]) -> Result<DecodedFrame, DecodeError> {
    if data.len() < FRAME_LEN {
        return Err(DecodeError::Truncated {
            needed: FRAME_LEN,
            got: data.len(),
        });
    }

    let mut cursor = Cursor::new(&data[..FRAME_LEN]);

    let frame_number = cursor.read_u32::<LittleEndian>().map_err(|_| truncated(data))?;
    let items_in_block = cursor.read_u8().map_err(|_| truncated(data))?;

    let first = read_item(&mut cursor, data)?;
    let second = read_item(&mut cursor, data)?;
    debug_assert_eq!(cursor.position() as usize, HEADER_LEN + 2 * ITEM_LEN);

    Ok(DecodedFrame {
        header: FrameHeader {
            frame_number,
            items_in_block,
        },
        items: [first, second],
    })
}

/// Keep only printable ASCII (`!` through `~`) from a padded name field.
pub fn decode_name(field: &[u8]) -> String {
    field
        .iter()
        .filter(|b| (0x21..=0x7E).contains(*b))
        .map(|&b| b as char)
        .collect()
}

fn read_item(cursor: &mut Cursor<&[u8]>, data: &[u8]) -> Result<ItemRecord, DecodeError> {
    let item_id = cursor.read_u8().map_err(|_| truncated(data))?;
    let item_data_size = cursor.read_u16::<LittleEndian>().map_err(|_| truncated(data))?;

    let mut name = [0u8; NAME_LEN];
    cursor.read_exact(&mut name).map_err(|_| truncated(data))?;

    let translation = read_vec3(cursor, data)?;
    let rotation = read_vec3(cursor, data)?;

    Ok(ItemRecord {
        item_id,
        item_data_size,
        name: decode_name(&name),
        translation,
        rotation,
    })
}

fn read_vec3(cursor: &mut Cursor<&[u8]>, data: &[u8]) -> Result<Vec3, DecodeError> {
    let x = cursor.read_f64::<LittleEndian>().map_err(|_| truncated(data))?;
    let y = cursor.read_f64::<LittleEndian>().map_err(|_| truncated(data))?;
    let z = cursor.read_f64::<LittleEndian>().map_err(|_| truncated(data))?;
    Ok(Vec3::new(x, y, z))
}

fn truncated(data: &[u8]) -> DecodeError {
    DecodeError::Truncated {
        needed: FRAME_LEN,
        got: data.len(),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Raw contents of one item block.
    pub(crate) struct TestItem<'a> {
        pub id: u8,
        pub data_size: u16,
        pub name: &'a [u8],
        pub translation: [f64; 3],
        pub rotation: [f64; 3],
    }

    impl Default for TestItem<'_> {
        fn default() -> Self {
            Self {
                id: 0,
                data_size: 72,
                name: b"drone",
                translation: [0.0; 3],
                rotation: [0.0; 3],
            }
        }
    }

    fn push_item(buf: &mut Vec<u8>, item: &TestItem<'_>) {
        buf.push(item.id);
        buf.extend_from_slice(&item.data_size.to_le_bytes());
        let mut name = [0u8; NAME_LEN];
        let n = item.name.len().min(NAME_LEN);
        name[..n].copy_from_slice(&item.name[..n]);
        buf.extend_from_slice(&name);
        for v in item.translation.iter().chain(item.rotation.iter()) {
            buf.extend_from_slice(&v.to_le_bytes());
        }
    }

    /// Build a 160-byte frame with the given items.
    pub(crate) fn build_test_frame(frame_number: u32, first: &TestItem<'_>, second: &TestItem<'_>) -> Vec<u8> {
        let mut buf = Vec::with_capacity(FRAME_LEN);
        buf.extend_from_slice(&frame_number.to_le_bytes());
        buf.push(2);
        push_item(&mut buf, first);
        push_item(&mut buf, second);
        buf.resize(FRAME_LEN, 0);
        buf
    }

    #[test]
    fn test_decode_field_offsets() {
        let first = TestItem {
            id: 7,
            data_size: 72,
            name: b"cf1",
            translation: [100.0, -250.5, 1000.0],
            rotation: [0.1, 0.2, 0.3],
        };
        let second = TestItem {
            id: 9,
            data_size: 72,
            name: b"wand",
            translation: [1.0, 2.0, 3.0],
            rotation: [-0.1, -0.2, -0.3],
        };
        let data = build_test_frame(4242, &first, &second);
        assert_eq!(data.len(), FRAME_LEN);
        assert_eq!(data[5], 7);
        assert_eq!(data[80], 9);

        let frame = decode(&data).unwrap();
        assert_eq!(frame.frame_number(), 4242);
        assert_eq!(frame.header.items_in_block, 2);

        let item = frame.primary();
        assert_eq!(item.item_id, 7);
        assert_eq!(item.item_data_size, 72);
        assert_eq!(item.name, "cf1");
        assert_eq!(item.translation, Vec3::new(100.0, -250.5, 1000.0));
        assert_eq!(item.rotation, Vec3::new(0.1, 0.2, 0.3));

        let item = &frame.items[1];
        assert_eq!(item.item_id, 9);
        assert_eq!(item.name, "wand");
        assert_eq!(item.translation, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(item.rotation, Vec3::new(-0.1, -0.2, -0.3));
    }

    #[test]
    fn test_decode_truncated() {
        let data = [0u8; FRAME_LEN - 1];
        assert_eq!(
            decode(&data),
            Err(DecodeError::Truncated {
                needed: FRAME_LEN,
                got: FRAME_LEN - 1
            })
        );
        assert!(matches!(decode(&[]), Err(DecodeError::Truncated { got: 0, .. })));
    }

    #[test]
    fn test_decode_ignores_trailing_bytes() {
        let data = build_test_frame(1, &TestItem::default(), &TestItem::default());
        let mut long = data.clone();
        long.extend_from_slice(&[0xAB; 864]);
        assert_eq!(decode(&long).unwrap(), decode(&data).unwrap());
    }

    #[test]
    fn test_decode_passes_non_finite_values() {
        let first = TestItem {
            translation: [f64::NAN, f64::INFINITY, f64::NEG_INFINITY],
            ..TestItem::default()
        };
        let data = build_test_frame(1, &first, &TestItem::default());
        let item = decode(&data).unwrap().items[0].clone();
        assert!(item.translation.x.is_nan());
        assert_eq!(item.translation.y, f64::INFINITY);
        assert_eq!(item.translation.z, f64::NEG_INFINITY);
    }

    #[test]
    fn test_decode_name_filters_non_printable() {
        let mut field = [0u8; NAME_LEN];
        field[..11].copy_from_slice(b"AB\x00\x00CD  !~\x7f");
        assert_eq!(decode_name(&field), "ABCD!~");
        assert_eq!(decode_name(&[0u8; NAME_LEN]), "");
        assert_eq!(decode_name(b"\x01Crazy\tflie\xff_01\x20"), "Crazyflie_01");
    }

    #[test]
    fn test_decode_empty_name_item() {
        let first = TestItem {
            name: b"",
            ..TestItem::default()
        };
        let data = build_test_frame(3, &first, &TestItem::default());
        assert_eq!(decode(&data).unwrap().primary().name, "");
    }

    proptest! {
        #[test]
        fn prop_decode_is_deterministic(bytes in proptest::collection::vec(any::<u8>(), FRAME_LEN..FRAME_LEN + 64)) {
            let a = decode(&bytes).unwrap();
            let b = decode(&bytes).unwrap();
            // NaN != NaN, so compare float bit patterns.
            prop_assert_eq!(a.header, b.header);
            let bits = |v: &Vec3| [v.x.to_bits(), v.y.to_bits(), v.z.to_bits()];
            for (x, y) in a.items.iter().zip(b.items.iter()) {
                prop_assert_eq!(x.item_id, y.item_id);
                prop_assert_eq!(x.item_data_size, y.item_data_size);
                prop_assert_eq!(&x.name, &y.name);
                prop_assert_eq!(bits(&x.translation), bits(&y.translation));
                prop_assert_eq!(bits(&x.rotation), bits(&y.rotation));
            }
        }

        #[test]
        fn prop_short_buffers_are_truncated(bytes in proptest::collection::vec(any::<u8>(), 0..FRAME_LEN)) {
            let got = bytes.len();
            prop_assert_eq!(decode(&bytes), Err(DecodeError::Truncated { needed: FRAME_LEN, got }));
        }

        #[test]
        fn prop_name_keeps_only_printable(field in proptest::collection::vec(any::<u8>(), NAME_LEN)) {
            let name = decode_name(&field);
            prop_assert!(name.bytes().all(|b| (0x21..=0x7E).contains(&b)));
            let expected: Vec<u8> = field.iter().copied().filter(|b| (0x21..=0x7E).contains(b)).collect();
            prop_assert_eq!(name.into_bytes(), expected);
        }
    }
}
