use mosaic::{
    AttCovEuler, AttEuler, Parser, ParserError, PosCovGeodetic, PvtGeodetic, Record, RecordKind,
    SbfBlock,
};
use rand::RngExt;

static GGA_LINE: &[u8] =
    b"$GPGGA,120000.00,4717.11399,N,00833.91590,E,4,08,1.01,499.6,M,48.0,M,,0*66\r\n";

#[derive(Debug, Default, PartialEq)]
struct Meta {
    pvt_geodetic: usize,
    pos_cov_geodetic: usize,
    att_euler: usize,
    att_cov_euler: usize,
    gga: usize,
    response: usize,
    wrong_chksum: usize,
    other_errors: usize,
}

/// One epoch as a receiver configured for PVT, attitude and GGA output would
/// send it, with a corrupted block every tenth epoch.
fn epoch(tow: u32, corrupt: bool) -> Vec<u8> {
    let mut data = PvtGeodetic {
        tow,
        mode: 4,
        nr_sv: 20,
        ..Default::default()
    }
    .to_bytes();
    let mut cov = PosCovGeodetic {
        tow,
        cov_latlat: 0.0001,
        ..Default::default()
    }
    .to_bytes();
    if corrupt {
        cov[20] ^= 0x80;
    }
    data.extend_from_slice(&cov);
    data.extend_from_slice(
        &AttEuler {
            tow,
            heading: 271.5,
            ..Default::default()
        }
        .to_bytes(),
    );
    data.extend_from_slice(
        &AttCovEuler {
            tow,
            ..Default::default()
        }
        .to_bytes(),
    );
    data.extend_from_slice(GGA_LINE);
    data
}

#[test]
fn test_parse_random_chunks() {
    const EPOCHS: u32 = 500;
    const MAX_SIZE: usize = 100;

    let mut stream = b"$R: setSBFOutput, Stream1, COM1, PVTGeodetic+AttEuler\r\n".to_vec();
    for i in 0..EPOCHS {
        stream.extend_from_slice(&epoch(100_000 + i * 100, i % 10 == 9));
    }

    let mut rng = rand::rng();
    let mut parser = Parser::default();
    let mut meta = Meta::default();
    let mut last_tow = None;
    let mut i = 0;
    while i < stream.len() {
        let chunk: usize = rng.random_range(1..MAX_SIZE);
        let chunk = (stream.len() - i).min(chunk);
        for record in parser.consume(&stream[i..i + chunk]) {
            match record {
                Ok(Record::PvtGeodetic(pvt)) => {
                    assert_eq!(pvt.header.seq as usize, meta.pvt_geodetic);
                    if let Some(last) = last_tow {
                        assert!(pvt.data.tow > last);
                    }
                    last_tow = Some(pvt.data.tow);
                    meta.pvt_geodetic += 1;
                },
                Ok(Record::PosCovGeodetic(_)) => meta.pos_cov_geodetic += 1,
                Ok(Record::AttEuler(att)) => {
                    assert_eq!(att.data.heading, 271.5);
                    meta.att_euler += 1;
                },
                Ok(Record::AttCovEuler(_)) => meta.att_cov_euler += 1,
                Ok(Record::Gga(_)) => meta.gga += 1,
                Ok(Record::Response(_)) => meta.response += 1,
                Ok(other) => panic!("unexpected {:?}", other.kind()),
                Err(ParserError::InvalidChecksum { .. }) => meta.wrong_chksum += 1,
                Err(_) => meta.other_errors += 1,
            }
        }
        i += chunk;
    }

    let corrupted = (EPOCHS / 10) as usize;
    let epochs = EPOCHS as usize;
    assert_eq!(
        meta,
        Meta {
            pvt_geodetic: epochs,
            pos_cov_geodetic: epochs - corrupted,
            att_euler: epochs,
            att_cov_euler: epochs,
            gga: epochs,
            response: 1,
            wrong_chksum: corrupted,
            other_errors: 0,
        }
    );
    assert!(parser.is_buffer_empty());
    assert_eq!(
        parser.decoder().counters().get(RecordKind::PosCovGeodetic) as usize,
        epochs - corrupted
    );
}
