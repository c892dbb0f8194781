use mosaic::{
    locate, sbf_checksum, AttCovEuler, AttEuler, ByteWindow, Decoder, DecoderConfig, Located,
    MessageId, NavSatStatus, Outcome, ParserError, PosCovGeodetic, PvtCartesian, PvtGeodetic,
    Record, RecordKind, Request, SbfBlock, TimeSource, Timestamp,
};

// Block 3847 with 16 body bytes, valid checksum
static UNKNOWN_BLOCK: [u8; 28] = [
    0x24, 0x40, 0xc7, 0x4f, 0x07, 0x0f, 0x1c, 0x00, 0x00, 0x70, 0x99, 0x14, 0x01, 0x02, 0x03,
    0x04, 0x05, 0x06, 0x07, 0x08, 0x09, 0x0a, 0x0b, 0x0c, 0x0d, 0x0e, 0x0f, 0x10,
];

fn geodetic(tow: u32) -> PvtGeodetic {
    PvtGeodetic {
        tow,
        wnc: 2300,
        mode: 2,
        latitude: 0.82,
        longitude: 0.14,
        height: 480.25,
        nr_sv: 12,
        ..Default::default()
    }
}

fn pos_cov(tow: u32) -> PosCovGeodetic {
    PosCovGeodetic {
        tow,
        cov_latlat: 0.25,
        cov_lonlon: 0.36,
        cov_hgthgt: 1.44,
        cov_latlon: 0.01,
        ..Default::default()
    }
}

fn decode_one(decoder: &mut Decoder, bytes: &[u8]) -> Outcome {
    let mut window = ByteWindow::new(bytes);
    decoder.decode(&mut window, Request::Any).unwrap()
}

#[test]
fn test_decode_echoes_block() {
    let mut decoder = Decoder::default();
    let bytes = geodetic(345_600_000).to_bytes();
    let Outcome::Decoded(Record::PvtGeodetic(pvt)) = decode_one(&mut decoder, &bytes) else {
        panic!("PVTGeodetic not decoded");
    };
    assert_eq!(pvt.data.to_bytes(), bytes);
    assert_eq!(pvt.header.seq, 0);
}

/// Rewrites the length field and checksum after the body was edited.
fn reseal(mut block: Vec<u8>) -> Vec<u8> {
    let len = block.len() as u16;
    block[6..8].copy_from_slice(&len.to_le_bytes());
    let crc = sbf_checksum(&block[4..]);
    block[2..4].copy_from_slice(&crc.to_le_bytes());
    block
}

#[test]
fn test_decode_echoes_reserved_and_padding() {
    let mut decoder = Decoder::default();

    let mut pvt = geodetic(345_600_000).to_bytes();
    pvt[95] = 0xab;
    pvt.extend_from_slice(&[0xde, 0xad, 0xbe, 0xef, 1, 2, 3, 4]);
    let pvt = reseal(pvt);
    let Outcome::Decoded(Record::PvtGeodetic(decoded)) = decode_one(&mut decoder, &pvt) else {
        panic!("PVTGeodetic not decoded");
    };
    assert_eq!(decoded.data.reserved, 0xab);
    assert_eq!(decoded.data.padding, [0xde, 0xad, 0xbe, 0xef, 1, 2, 3, 4]);
    assert_eq!(decoded.data.to_bytes(), pvt);

    let mut att = AttEuler {
        tow: 345_600_000,
        heading: 12.5,
        ..Default::default()
    }
    .to_bytes();
    att[18] = 0x5a;
    att[19] = 0xa5;
    let att = reseal(att);
    let Outcome::Decoded(Record::AttEuler(decoded)) = decode_one(&mut decoder, &att) else {
        panic!("AttEuler not decoded");
    };
    assert_eq!(decoded.data.to_bytes(), att);

    let mut att_cov = AttCovEuler {
        tow: 345_600_000,
        ..Default::default()
    }
    .to_bytes();
    att_cov[14] = 0x77;
    let att_cov = reseal(att_cov);
    let Outcome::Decoded(Record::AttCovEuler(decoded)) = decode_one(&mut decoder, &att_cov) else {
        panic!("AttCovEuler not decoded");
    };
    assert_eq!(decoded.data.to_bytes(), att_cov);
}

// Block 3847 is deliberately absent from the dispatch table. A valid block
// without a decode routine comes out as NotHandled instead of a typed record
// with sequence 0; adding 3847 to RecordKind changes this test.
#[test]
fn test_decode_unknown_block() {
    let mut decoder = Decoder::default();

    let window = ByteWindow::new(&UNKNOWN_BLOCK);
    let Located::Frame(frame) = locate(&window) else {
        panic!("block not framed");
    };
    assert_eq!(frame.id, MessageId::Sbf(3847));
    assert_eq!(frame.len(), 28);
    assert_eq!(
        sbf_checksum(&UNKNOWN_BLOCK[4..]),
        u16::from_le_bytes([UNKNOWN_BLOCK[2], UNKNOWN_BLOCK[3]])
    );

    let mut window = ByteWindow::new(&UNKNOWN_BLOCK);
    assert_eq!(
        decoder.decode(&mut window, Request::Any),
        Ok(Outcome::NotHandled(MessageId::Sbf(3847)))
    );
    assert!(window.is_empty());
}

#[test]
fn test_decode_stamp_from_tow() {
    let mut decoder = Decoder::default();
    let tow = 123_456_789;
    let Outcome::Decoded(record) = decode_one(&mut decoder, &geodetic(tow).to_bytes()) else {
        panic!("PVTGeodetic not decoded");
    };
    let expected = Timestamp::from_tow(tow, 18);
    assert_eq!(record.stamp().nsec, 789_000_000);
    // both conversions pick the same week unless the clock crossed a week boundary in between
    assert!((record.stamp().sec - expected.sec).abs() <= 1);
}

#[test]
fn test_decode_local_time() {
    let config = DecoderConfig {
        time_source: TimeSource::Local,
        frame_id: "base".to_owned(),
        ..Default::default()
    };
    let mut decoder = Decoder::new(config);
    let before = Timestamp::now();
    let Outcome::Decoded(record) = decode_one(&mut decoder, &geodetic(1).to_bytes()) else {
        panic!("PVTGeodetic not decoded");
    };
    let after = Timestamp::now();
    assert!(before <= record.stamp() && record.stamp() <= after);
    assert_eq!(record.header().frame_id, "base");
}

#[test]
fn test_checksum_failure_resumes_after_block() {
    let mut decoder = Decoder::default();
    let mut data = geodetic(1000).to_bytes();
    data[30] ^= 0x04;
    let declared = data.len();
    data.extend_from_slice(&geodetic(2000).to_bytes());

    let mut window = ByteWindow::new(&data);
    let outcome = decoder.decode(&mut window, Request::Any).unwrap();
    assert!(matches!(
        outcome,
        Outcome::ValidationFailed(ParserError::InvalidChecksum { .. })
    ));
    assert_eq!(window.position(), declared);
    let Located::Frame(frame) = locate(&window) else {
        panic!("next block not found");
    };
    assert_eq!(frame.offset, 0);
    assert_eq!(frame.id, MessageId::Sbf(4007));
    assert_eq!(decoder.counters().get(RecordKind::PvtGeodetic), 0);
}

#[test]
fn test_prefix_needs_more_data() {
    let mut decoder = Decoder::default();
    let block = geodetic(1000).to_bytes();
    let line = b"$GPGGA,120000.00,4717.11399,N,00833.91590,E,4,08,1.01,499.6,M,48.0,M,,0*66\r\n";
    let prefixes = [
        &block[..1],
        &block[..7],
        &block[..block.len() - 1],
        &line[..1],
        &line[..40],
        &line[..line.len() - 1],
    ];
    for prefix in prefixes {
        let mut window = ByteWindow::new(prefix);
        let outcome = decoder.decode(&mut window, Request::Any).unwrap();
        assert!(matches!(outcome, Outcome::NeedMoreData { .. }));
        assert_eq!(window.remaining(), prefix.len());
    }
}

#[test]
fn test_locate_idempotent() {
    let mut data = vec![0x11, 0x22];
    data.extend_from_slice(&pos_cov(5).to_bytes());
    let window = ByteWindow::new(&data);
    let first = locate(&window);
    let second = locate(&window);
    assert_eq!(first, second);
    assert!(matches!(first, Located::Frame(ref frame) if frame.offset == 2));
}

#[test]
fn test_composite_waits_for_dependencies() {
    let mut decoder = Decoder::default();
    let mut empty = ByteWindow::new(&[]);
    assert_eq!(
        decoder.decode(&mut empty, Request::Kind(RecordKind::NavSatFix)),
        Ok(Outcome::DependencyUnavailable(RecordKind::NavSatFix))
    );

    decode_one(&mut decoder, &geodetic(4000).to_bytes());
    assert_eq!(
        decoder.decode(&mut empty, Request::Kind(RecordKind::NavSatFix)),
        Ok(Outcome::DependencyUnavailable(RecordKind::NavSatFix))
    );

    decode_one(&mut decoder, &pos_cov(4000).to_bytes());
    let Ok(Outcome::Decoded(Record::NavSatFix(fix))) =
        decoder.decode(&mut empty, Request::Kind(RecordKind::NavSatFix))
    else {
        panic!("NavSatFix not synthesized");
    };
    assert_eq!(fix.header.seq, 0);
    assert_eq!(fix.data.status, NavSatStatus::GbasFix);
    assert_eq!(fix.data.latitude, 0.82f64.to_degrees());
    assert_eq!(fix.data.altitude, 480.25);
    assert_eq!(fix.data.position_covariance[0], f64::from(0.36f32));
    assert_eq!(fix.data.position_covariance[1], f64::from(0.01f32));
    assert_eq!(fix.data.position_covariance[4], f64::from(0.25f32));
    assert_eq!(decoder.counters().get(RecordKind::NavSatFix), 1);
}

#[test]
fn test_gps_fix_needs_attitude() {
    let mut decoder = Decoder::default();
    let mut empty = ByteWindow::new(&[]);
    decode_one(&mut decoder, &geodetic(4000).to_bytes());
    decode_one(&mut decoder, &pos_cov(4000).to_bytes());
    assert_eq!(
        decoder.decode(&mut empty, Request::Kind(RecordKind::GpsFix)),
        Ok(Outcome::DependencyUnavailable(RecordKind::GpsFix))
    );

    let att = AttEuler {
        tow: 4000,
        nr_sv: 8,
        mode: 2,
        heading: 12.5,
        pitch: -0.75,
        roll: 0.5,
        ..Default::default()
    };
    let att_cov = AttCovEuler {
        tow: 4000,
        cov_headhead: 0.04,
        cov_pitchpitch: 0.09,
        cov_rollroll: 0.16,
        ..Default::default()
    };
    decode_one(&mut decoder, &att.to_bytes());
    decode_one(&mut decoder, &att_cov.to_bytes());
    let Ok(Outcome::Decoded(Record::GpsFix(fix))) =
        decoder.decode(&mut empty, Request::Kind(RecordKind::GpsFix))
    else {
        panic!("GpsFix not synthesized");
    };
    assert_eq!(fix.data.heading, 12.5);
    assert_eq!(fix.data.satellites_used, 12);
    assert!((fix.data.position_std[0] - 0.5).abs() < 1e-6);
    assert!((fix.data.attitude_std[1] - 0.3).abs() < 1e-6);
    // synthesizing does not touch the window or the inputs' counters
    assert_eq!(empty.position(), 0);
    assert_eq!(decoder.counters().get(RecordKind::AttEuler), 1);
}

#[test]
fn test_sequence_counters_independent() {
    let mut decoder = Decoder::default();
    let mut data = Vec::new();
    for tow in [1000, 2000, 3000] {
        data.extend_from_slice(&geodetic(tow).to_bytes());
    }
    let mut window = ByteWindow::new(&data);
    for expected in 0..3 {
        let Ok(Outcome::Decoded(record)) = decoder.decode(&mut window, Request::Any) else {
            panic!("PVTGeodetic not decoded");
        };
        assert_eq!(record.kind(), RecordKind::PvtGeodetic);
        assert_eq!(record.seq(), expected);
    }
    assert_eq!(decoder.counters().get(RecordKind::PvtCartesian), 0);

    let cartesian = PvtCartesian {
        tow: 1000,
        ..Default::default()
    };
    let Outcome::Decoded(record) = decode_one(&mut decoder, &cartesian.to_bytes()) else {
        panic!("PVTCartesian not decoded");
    };
    assert_eq!(record.seq(), 0);
}

#[test]
fn test_requested_kind_skips_others() {
    let mut decoder = Decoder::default();
    let mut data = pos_cov(1).to_bytes();
    data.extend_from_slice(&geodetic(1).to_bytes());
    let mut window = ByteWindow::new(&data);
    let request = Request::Kind(RecordKind::PvtGeodetic);
    assert_eq!(
        decoder.decode(&mut window, request),
        Ok(Outcome::NotHandled(MessageId::Sbf(5906)))
    );
    assert_eq!(window.position(), PosCovGeodetic::LEN);
    assert!(matches!(
        decoder.decode(&mut window, request),
        Ok(Outcome::Decoded(Record::PvtGeodetic(_)))
    ));
    // the skipped block did not feed the cache
    assert!(decoder.cache().pos_cov_geodetic().is_none());
}

#[test]
fn test_sentence_through_decoder() {
    let mut decoder = Decoder::default();
    let line = b"$GNGGA,092725.00,4717.11399,S,00833.91590,W,1,08,1.01,499.6,M,48.0,M,,*4A\r\n";
    let Outcome::Decoded(Record::Gga(gga)) = decode_one(&mut decoder, line) else {
        panic!("GGA not decoded");
    };
    assert_eq!(gga.data.message_id, "$GNGGA");
    assert_eq!(gga.data.num_satellites, 8);
    assert_eq!(gga.header.seq, 0);

    let mut bad = line.to_vec();
    bad[10] = b'9';
    assert!(matches!(
        decode_one(&mut decoder, &bad),
        Outcome::ValidationFailed(ParserError::Sentence(_))
    ));
    assert_eq!(
        decode_one(&mut decoder, b"$GPGSV,1,1,00*79\r\n"),
        Outcome::NotHandled(MessageId::Nmea("$GPGSV".into()))
    );
}

#[test]
fn test_unframeable_skips_sync() {
    let mut decoder = Decoder::default();
    let mut data = vec![0x00];
    data.extend_from_slice(&geodetic(1).to_bytes());
    data[7] = 0x05; // length 5
    let mut window = ByteWindow::new(&data);
    assert_eq!(
        decoder.decode(&mut window, Request::Any),
        Err(ParserError::InvalidBlockLength { len: 5 })
    );
    assert_eq!(window.position(), 3);
}

#[test]
fn test_no_sync_consumes_window() {
    let mut decoder = Decoder::default();
    let mut window = ByteWindow::new(b"\x00\x01\x02 no sync here");
    assert_eq!(
        decoder.decode(&mut window, Request::Any),
        Ok(Outcome::NeedMoreData { required: None })
    );
    assert!(window.is_empty());
}
