//! Binary snapshot archive: layout, rank limits, truncation and step hint.

use num_complex::Complex64;
use statevec_codec::{
    decode_binary, decode_binary_with, encode_binary, encode_binary_to_vec, encode_binary_with,
    BinaryDecoder, BinaryEncoder, CodecError, CodecOptions, ComplexBuffer, Shape, Snapshot,
    MAX_RANK,
};

fn ramp(n: usize) -> ComplexBuffer {
    (0..n)
        .map(|i| Complex64::new(i as f64 + 0.25, -(i as f64)))
        .collect()
}

fn header_bytes(rank: i32, extents: &[i32]) -> Vec<u8> {
    let mut out = rank.to_ne_bytes().to_vec();
    for e in extents {
        out.extend_from_slice(&e.to_ne_bytes());
    }
    out
}

// ---------------------------------------------------------------------------
// Layout
// ---------------------------------------------------------------------------

#[test]
fn layout_matches_hand_built_archive() {
    let shape = Shape::new(vec![2, 3]);
    let mut expected = header_bytes(2, &[2, 3]);
    let mut values = Vec::new();
    for i in 0..2 {
        for j in 0..3 {
            let v = Complex64::new((10 * i + j) as f64, -((10 * i + j) as f64));
            expected.extend_from_slice(&v.re.to_ne_bytes());
            expected.extend_from_slice(&v.im.to_ne_bytes());
            values.push(v);
        }
    }
    expected.extend_from_slice(&4.5f64.to_ne_bytes());
    expected.extend_from_slice(&1.0f64.to_ne_bytes());

    let buffer = ComplexBuffer::from_complex(&values);
    let mut archive = Vec::new();
    encode_binary(&mut archive, &shape, &buffer, 4.5).unwrap();
    assert_eq!(archive, expected);
    assert_eq!(archive.len(), 4 + 2 * 4 + 6 * 16 + 16);
}

#[test]
fn decode_is_row_major_last_axis_fastest() {
    let mut archive = header_bytes(2, &[2, 3]);
    for i in 0..2 {
        for j in 0..3 {
            archive.extend_from_slice(&((10 * i + j) as f64).to_ne_bytes());
            archive.extend_from_slice(&0.0f64.to_ne_bytes());
        }
    }
    archive.extend_from_slice(&0.0f64.to_ne_bytes());
    archive.extend_from_slice(&0.1f64.to_ne_bytes());

    let snapshot = decode_binary(&archive).unwrap();
    assert_eq!(snapshot.shape.extents(), &[2, 3]);
    assert_eq!(
        snapshot.buffer.as_slice(),
        &[0.0, 0.0, 1.0, 0.0, 2.0, 0.0, 10.0, 0.0, 11.0, 0.0, 12.0, 0.0]
    );
    for i in 0..2 {
        for j in 0..3 {
            let pos = snapshot.shape.linear_index(&[i, j]).unwrap();
            assert_eq!(snapshot.buffer.get(pos).unwrap().re, (10 * i + j) as f64);
        }
    }
    let array = snapshot.to_array().unwrap();
    assert_eq!(array[[1, 2]], Complex64::new(12.0, 0.0));
    assert_eq!(snapshot.step_hint, 0.1);
}

#[test]
fn every_rank_roundtrips() {
    for rank in 1..=MAX_RANK {
        let extents: Vec<usize> = (0..rank).map(|axis| 1 + axis % 3).collect();
        let shape = Shape::new(extents);
        let buffer = ramp(shape.element_count().unwrap());
        let mut archive = Vec::new();
        encode_binary(&mut archive, &shape, &buffer, rank as f64).unwrap();
        let (decoded_shape, decoded, time, step_hint) = decode_binary(&archive).unwrap().into_parts();
        assert_eq!(decoded_shape, shape, "rank {rank}");
        assert_eq!(decoded, buffer, "rank {rank}");
        assert_eq!(time, rank as f64);
        assert_eq!(step_hint, 1.0);
    }
}

// ---------------------------------------------------------------------------
// Rank limits
// ---------------------------------------------------------------------------

#[test]
fn rank_zero_and_above_max_are_rejected() {
    for rank in [0, MAX_RANK as i32 + 1, -1] {
        let archive = header_bytes(rank, &[]);
        match decode_binary(&archive) {
            Err(CodecError::UnsupportedRank { rank: r, max }) => {
                assert_eq!(r, i64::from(rank));
                assert_eq!(max, MAX_RANK);
            }
            other => panic!("rank {rank}: expected UnsupportedRank, got {other:?}"),
        }
    }
}

#[test]
fn max_rank_minimal_shape_decodes() {
    let mut archive = header_bytes(MAX_RANK as i32, &[1; MAX_RANK]);
    archive.extend_from_slice(&2.0f64.to_ne_bytes());
    archive.extend_from_slice(&3.0f64.to_ne_bytes());
    archive.extend_from_slice(&0.0f64.to_ne_bytes());
    archive.extend_from_slice(&1.0f64.to_ne_bytes());
    let snapshot = decode_binary(&archive).unwrap();
    assert_eq!(snapshot.shape.rank(), MAX_RANK);
    assert_eq!(snapshot.buffer.as_slice(), &[2.0, 3.0]);
}

#[test]
fn encode_rejects_rank_before_touching_sink() {
    let shape = Shape::new(vec![1; MAX_RANK + 1]);
    let mut sink = Vec::new();
    let err = encode_binary(&mut sink, &shape, &ramp(1), 0.0).unwrap_err();
    assert!(matches!(err, CodecError::UnsupportedRank { rank: 12, max: 11 }));
    assert!(sink.is_empty());

    let err = encode_binary(&mut sink, &Shape::new(vec![]), &ramp(1), 0.0).unwrap_err();
    assert!(matches!(err, CodecError::UnsupportedRank { rank: 0, .. }));
    assert!(sink.is_empty());
}

#[test]
fn configured_max_rank_is_honoured() {
    let options = CodecOptions::default().with_max_rank(14);
    let shape = Shape::new(vec![1; 13]);
    let mut archive = Vec::new();
    encode_binary_with(&mut archive, &shape, &ramp(1), 0.0, &options).unwrap();
    assert!(decode_binary(&archive).is_err());
    assert_eq!(decode_binary_with(&archive, &options).unwrap().shape, shape);

    let strict = CodecOptions::default().with_max_rank(1);
    let archive = encode_binary_to_vec(&Shape::new(vec![1, 1]), &ramp(1), 0.0, 1.0).unwrap();
    assert!(matches!(
        decode_binary_with(&archive, &strict),
        Err(CodecError::UnsupportedRank { rank: 2, max: 1 })
    ));
}

// ---------------------------------------------------------------------------
// Empty arrays
// ---------------------------------------------------------------------------

#[test]
fn zero_element_array_keeps_metadata() {
    let shape = Shape::new(vec![3, 0, 2]);
    let mut archive = Vec::new();
    encode_binary(&mut archive, &shape, &ComplexBuffer::new(), 7.0).unwrap();
    assert_eq!(archive.len(), 4 + 3 * 4 + 16);

    let (snapshot, consumed) = BinaryDecoder::new().decode_with_consumed(&archive).unwrap();
    assert_eq!(consumed, archive.len());
    assert_eq!(snapshot.shape, shape);
    assert!(snapshot.buffer.is_empty());
    assert_eq!(snapshot.time, 7.0);
    assert_eq!(snapshot.step_hint, 1.0);
}

// ---------------------------------------------------------------------------
// Truncation and corrupt headers
// ---------------------------------------------------------------------------

#[test]
fn every_truncation_is_reported() {
    let shape = Shape::new(vec![2, 2]);
    let archive = encode_binary_to_vec(&shape, &ramp(4), 1.0, 0.5).unwrap();
    for cut in 0..archive.len() {
        match decode_binary(&archive[..cut]) {
            Err(CodecError::TruncatedStream {
                offset,
                needed,
                available,
            }) => {
                assert!(offset <= cut, "cut {cut}");
                assert!(needed > available, "cut {cut}");
            }
            other => panic!("cut {cut}: expected TruncatedStream, got {other:?}"),
        }
    }
    assert!(decode_binary(&archive).is_ok());
}

#[test]
fn trailing_bytes_are_not_consumed() {
    let mut archive = encode_binary_to_vec(&Shape::new(vec![1]), &ramp(1), 0.0, 1.0).unwrap();
    let len = archive.len();
    archive.extend_from_slice(b"tail");
    let (_, consumed) = BinaryDecoder::new().decode_with_consumed(&archive).unwrap();
    assert_eq!(consumed, len);
}

#[test]
fn negative_extent_is_rejected() {
    let archive = header_bytes(2, &[4, -3]);
    assert!(matches!(
        decode_binary(&archive),
        Err(CodecError::InvalidExtent {
            axis: 1,
            extent: -3
        })
    ));
}

#[test]
fn huge_extents_fail_without_allocating() {
    let archive = header_bytes(2, &[i32::MAX, i32::MAX]);
    assert!(matches!(
        decode_binary(&archive),
        Err(CodecError::TruncatedStream { .. })
    ));
}

#[test]
fn huge_rank_on_short_stream_is_truncated() {
    let options = CodecOptions::default().with_max_rank(usize::MAX);
    let archive = i32::MAX.to_ne_bytes();
    match decode_binary_with(&archive, &options) {
        Err(CodecError::TruncatedStream {
            offset,
            needed,
            available,
        }) => {
            assert_eq!(offset, 4);
            assert_eq!(needed, i32::MAX as usize * 4);
            assert_eq!(available, 0);
        }
        other => panic!("expected TruncatedStream, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Encoder validation
// ---------------------------------------------------------------------------

#[test]
fn buffer_must_match_shape() {
    let err = encode_binary_to_vec(&Shape::new(vec![2, 2]), &ramp(3), 0.0, 1.0).unwrap_err();
    assert!(matches!(
        err,
        CodecError::ShapeMismatch {
            expected: 4,
            actual: 3
        }
    ));
}

#[test]
fn extent_must_fit_archive_integer() {
    let mut encoder = BinaryEncoder::new();
    let err = encoder
        .write_shape(&Shape::new(vec![i32::MAX as usize + 1]))
        .unwrap_err();
    assert!(matches!(err, CodecError::InvalidExtent { axis: 0, .. }));
    assert!(encoder.writer.is_empty());
}

#[test]
fn shape_header_is_checked_before_payload() {
    let mut encoder = BinaryEncoder::new();
    let shape = Shape::new(vec![2, i32::MAX as usize + 1]);
    let err = encoder
        .encode_values(&shape, ramp(3).iter(), 0.0, 1.0)
        .unwrap_err();
    assert!(matches!(err, CodecError::InvalidExtent { axis: 1, .. }));
    assert!(encoder.writer.is_empty());

    let archive = encoder
        .encode_values(&Shape::new(vec![3]), ramp(3).iter(), 0.0, 1.0)
        .unwrap();
    assert_eq!(&archive[..8], &header_bytes(1, &[3])[..]);
}

// ---------------------------------------------------------------------------
// Step hint
// ---------------------------------------------------------------------------

#[test]
fn step_hint_sentinel_and_explicit_value() {
    let shape = Shape::new(vec![1]);
    let mut archive = Vec::new();
    encode_binary(&mut archive, &shape, &ramp(1), 0.0).unwrap();
    assert_eq!(decode_binary(&archive).unwrap().step_hint, 1.0);

    let options = CodecOptions::default().with_step_hint_sentinel(0.25);
    let mut archive = Vec::new();
    encode_binary_with(&mut archive, &shape, &ramp(1), 0.0, &options).unwrap();
    assert_eq!(decode_binary(&archive).unwrap().step_hint, 0.25);

    let archive = encode_binary_to_vec(&shape, &ramp(1), 0.0, 0.003).unwrap();
    assert_eq!(decode_binary(&archive).unwrap().step_hint, 0.003);
}

#[test]
fn snapshot_encode_preserves_its_step_hint() {
    let snapshot = Snapshot::new(Shape::new(vec![2]), ramp(2), 3.5, 0.02).unwrap();
    let decoded = Snapshot::decode(&snapshot.encode().unwrap()).unwrap();
    assert_eq!(decoded, snapshot);
}
